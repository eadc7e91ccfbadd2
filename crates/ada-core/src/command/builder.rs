//! Command Builder: valida parámetros localmente y renderiza la invocación.
//!
//! Orden de tokens: grupo (`legacy` o la era), subcomando, flag de era (sólo
//! legacy), argumentos en el orden del descriptor y por último la red.
use std::collections::BTreeSet;

use ada_domain::{check_margin, check_metadata_url, PoolRelay, Quantity, TxIn};

use crate::command::args::{Arg, ArgKind, ArgSpec, Params, Presence};
use crate::command::operation::{Operation, OperationDescriptor};
use crate::command::spec::CommandSpec;
use crate::config::OperationContext;
use crate::errors::{AdaError, AdaResult};

pub struct CommandBuilder;

impl CommandBuilder {
    /// Falla con `InvalidParameters` antes de que exista ningún proceso.
    pub fn build(operation: Operation, params: &Params, ctx: &OperationContext) -> AdaResult<CommandSpec> {
        let desc = operation.descriptor();
        let rendering = ctx.group_rendering()?;
        let path = desc.path_for(ctx.legacy()).ok_or_else(|| {
                                                  AdaError::Configuration(format!("{} is not available under the legacy command group", desc.name))
                                              })?;
        validate(desc, params, ctx)?;

        let mut tokens = vec![rendering.group.to_string()];
        tokens.extend(path.iter().map(|s| s.to_string()));
        if let Some(flag) = rendering.era_flag {
            tokens.push(flag.to_string());
        }
        for spec in desc.args {
            if spec.kind == ArgKind::Switch {
                if params.has_switch(spec.arg) {
                    tokens.push(spec.arg.flag().to_string());
                }
                continue;
            }
            for value in params.values(spec.arg) {
                if spec.kind == ArgKind::Relay {
                    let relay = value.parse::<PoolRelay>().map_err(|e| AdaError::invalid(desc.name, e.to_string()))?;
                    tokens.extend([relay.host_flag().to_string(),
                                   relay.host(),
                                   PoolRelay::PORT_FLAG.to_string(),
                                   relay.port().to_string()]);
                    continue;
                }
                tokens.push(spec.arg.flag().to_string());
                tokens.push(value.clone());
            }
        }
        if desc.takes_network {
            tokens.extend(ctx.network().args());
        }
        Ok(CommandSpec::new(operation, ctx.cli_path().to_path_buf(), tokens, ctx.stamp()))
    }

    /// Inversa de `build` sobre los tokens (sin el ejecutable). No vuelve a
    /// comprobar archivos: sólo reconstruye operación y parámetros.
    pub fn decode(tokens: &[String], ctx: &OperationContext) -> AdaResult<(Operation, Params)> {
        let rendering = ctx.group_rendering()?;
        let (group, tail) = tokens.split_first()
                                  .ok_or_else(|| AdaError::invalid("decode", "empty command"))?;
        if group != rendering.group {
            return Err(AdaError::Configuration(format!("command group '{group}' does not match context group '{}'",
                                                       rendering.group)));
        }
        let (operation, path_len) =
            Operation::ALL.iter()
                          .filter_map(|op| {
                              let path = op.descriptor().path_for(ctx.legacy())?;
                              let matches = tail.len() >= path.len() && tail.iter().zip(path.iter()).all(|(a, b)| a == b);
                              matches.then_some((*op, path.len()))
                          })
                          .max_by_key(|(_, len)| *len)
                          .ok_or_else(|| AdaError::invalid("decode", format!("unknown subcommand in {tail:?}")))?;
        let desc = operation.descriptor();
        let mut rest = &tail[path_len..];

        if let Some(flag) = rendering.era_flag {
            match rest.split_first() {
                Some((t, r)) if t == flag => rest = r,
                _ => return Err(AdaError::invalid(desc.name, format!("missing era flag {flag}"))),
            }
        }
        if desc.takes_network {
            let net = ctx.network().args();
            if !rest.ends_with(&net) {
                return Err(AdaError::invalid(desc.name, format!("missing network flag {}", net.join(" "))));
            }
            rest = &rest[..rest.len() - net.len()];
        }

        let mut params = Params::new();
        let mut i = 0;
        while i < rest.len() {
            let flag = &rest[i];
            if PoolRelay::HOST_FLAGS.contains(&flag.as_str()) {
                let spec = desc.args
                               .iter()
                               .find(|s| s.kind == ArgKind::Relay)
                               .ok_or_else(|| AdaError::invalid(desc.name, format!("unknown argument {flag}")))?;
                let relay = match &rest[i + 1..] {
                    [host, port_flag, port, ..] if port_flag == PoolRelay::PORT_FLAG => {
                        PoolRelay::from_flag(flag, host, port).map_err(|e| AdaError::invalid(desc.name, e.to_string()))?
                    }
                    _ => return Err(AdaError::invalid(desc.name, format!("{flag} without host and {}", PoolRelay::PORT_FLAG))),
                };
                params.push(spec.arg, relay.to_string());
                i += 4;
                continue;
            }
            let spec = desc.args
                           .iter()
                           .find(|s| s.arg.flag() == flag)
                           .ok_or_else(|| AdaError::invalid(desc.name, format!("unknown argument {flag}")))?;
            if spec.kind == ArgKind::Switch {
                params.set_switch(spec.arg);
                i += 1;
            } else {
                let value = rest.get(i + 1)
                                .ok_or_else(|| AdaError::invalid(desc.name, format!("{flag} without value")))?;
                params.push(spec.arg, value.clone());
                i += 2;
            }
        }
        Ok((operation, params))
    }
}

fn validate(desc: &OperationDescriptor, params: &Params, ctx: &OperationContext) -> AdaResult<()> {
    let op = desc.name;
    for arg in params.args() {
        let spec = desc.spec_for(arg)
                       .ok_or_else(|| AdaError::invalid(op, format!("unknown argument {}", arg.flag())))?;
        let is_switch = spec.kind == ArgKind::Switch;
        if is_switch && !params.values(arg).is_empty() {
            return Err(AdaError::invalid(op, format!("{} takes no value", arg.flag())));
        }
        if !is_switch && params.has_switch(arg) {
            return Err(AdaError::invalid(op, format!("{} requires a value", arg.flag())));
        }
    }

    for spec in desc.args {
        let count = if spec.kind == ArgKind::Switch {
            usize::from(params.has_switch(spec.arg))
        } else {
            params.values(spec.arg).len()
        };
        let flag = spec.arg.flag();
        match spec.presence {
            Presence::Required if count == 0 => return Err(AdaError::invalid(op, format!("missing required argument {flag}"))),
            Presence::Required | Presence::Optional if count > 1 => {
                return Err(AdaError::invalid(op, format!("{flag} given {count} times")));
            }
            Presence::AtLeastOne if count == 0 => return Err(AdaError::invalid(op, format!("at least one {flag} is required"))),
            _ => {}
        }
        for value in params.values(spec.arg) {
            check_value(op, spec, value, ctx)?;
        }
    }

    for group in desc.one_of {
        let present = group.iter().filter(|a| params.contains(**a)).count();
        if present != 1 {
            let flags: Vec<&str> = group.iter().map(Arg::flag).collect();
            return Err(AdaError::invalid(op, format!("exactly one of {} is required", flags.join(", "))));
        }
    }

    let mut outputs = BTreeSet::new();
    for spec in desc.args.iter().filter(|s| matches!(s.kind, ArgKind::OutputFile { .. })) {
        for value in params.values(spec.arg) {
            if !outputs.insert(ctx.resolve_path(value)) {
                return Err(AdaError::invalid(op, format!("output path '{value}' used twice")));
            }
        }
    }
    Ok(())
}

fn check_value(op: &str, spec: &ArgSpec, value: &str, ctx: &OperationContext) -> AdaResult<()> {
    let flag = spec.arg.flag();
    if value.trim().is_empty() {
        return Err(AdaError::invalid(op, format!("{flag} is empty")));
    }
    // un valor con forma de flag haría ambigua la línea de comandos
    if value.starts_with("--") {
        return Err(AdaError::invalid(op, format!("{flag} value '{value}' looks like a flag")));
    }
    match spec.kind {
        ArgKind::Text | ArgKind::Switch => Ok(()),
        ArgKind::TxIn => {
            if TxIn::is_valid(value) {
                Ok(())
            } else {
                Err(AdaError::invalid(op, format!("{flag} '{value}' is not <64 hex>#<index>")))
            }
        }
        ArgKind::UInt => {
            if value.bytes().all(|b| b.is_ascii_digit()) && value.parse::<u64>().is_ok() {
                Ok(())
            } else {
                Err(AdaError::invalid(op, format!("{flag} '{value}' is not an unsigned integer")))
            }
        }
        ArgKind::Amount => match value.parse::<Quantity>() {
            Ok(q) if !q.is_negative() => Ok(()),
            _ => Err(AdaError::invalid(op, format!("{flag} '{value}' is not a non-negative integer amount"))),
        },
        ArgKind::Hex => {
            if value.len() % 2 == 0 && value.bytes().all(|b| b.is_ascii_hexdigit()) {
                Ok(())
            } else {
                Err(AdaError::invalid(op, format!("{flag} '{value}' is not hex")))
            }
        }
        ArgKind::Choice(options) => {
            if options.contains(&value) {
                Ok(())
            } else {
                Err(AdaError::invalid(op, format!("{flag} must be one of {}", options.join("|"))))
            }
        }
        ArgKind::Margin => check_margin(value).map_err(|e| AdaError::invalid(op, format!("{flag}: {e}"))),
        ArgKind::MetadataUrl => check_metadata_url(value).map_err(|e| AdaError::invalid(op, format!("{flag}: {e}"))),
        ArgKind::Relay => value.parse::<PoolRelay>()
                               .map(|_| ())
                               .map_err(|e| AdaError::invalid(op, format!("{flag}: {e}"))),
        ArgKind::InputFile => {
            let path = ctx.resolve_path(value);
            if path.is_file() {
                Ok(())
            } else {
                Err(AdaError::invalid(op, format!("{flag} file '{}' does not exist", path.display())))
            }
        }
        ArgKind::OutputFile { exclusive } => {
            let path = ctx.resolve_path(value);
            if path.is_dir() {
                return Err(AdaError::invalid(op, format!("{flag} '{}' is a directory", path.display())));
            }
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    return Err(AdaError::invalid(op, format!("{flag} directory '{}' does not exist", parent.display())));
                }
            }
            if exclusive && path.symlink_metadata().is_ok() {
                return Err(AdaError::invalid(op, format!("refusing to overwrite existing {}", path.display())));
            }
            Ok(())
        }
    }
}
