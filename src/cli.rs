//! Argumentos del binario `adaops`.
//!
//! ```text
//! adaops tip
//! adaops utxo --address <ADDR>
//! adaops balance --address <ADDR>
//! adaops rotate-kes --cold-skey <F> --counter <F> (--genesis <F> | --slots-per-period <N> | --kes-period <N>)
//!                   [--kes-vkey <F> --kes-skey <F>] [--out <F>] [--verify skip|offline|node]
//!                   [--expected-counter <N>] [--retry]
//! ```
use std::path::PathBuf;

use ada_core::{Connectivity, RetryPolicy};
use ada_workflow::{KesPeriodSource, RotationPlan, VerifyMode, WorkflowError};
use thiserror::Error;

pub const USAGE: &str = "Uso: adaops <tip | utxo --address <ADDR> | balance --address <ADDR> | rotate-kes ...>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing command")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },
    #[error("missing required flag {0}")]
    MissingFlag(&'static str),
    #[error("{0}")]
    Conflict(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tip,
    Utxo { address: String },
    Balance { address: String },
    RotateKes(RotateArgs),
}

impl Command {
    /// Conectividad que exige el comando antes de resolver el contexto.
    pub fn connectivity(&self) -> Connectivity {
        match self {
            Command::RotateKes(args) => args.connectivity(),
            _ => Connectivity::Online,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotateArgs {
    pub kes_vkey: Option<PathBuf>,
    pub kes_skey: Option<PathBuf>,
    pub cold_skey: Option<PathBuf>,
    pub counter: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub period_source: Option<KesPeriodSource>,
    pub verify: Option<VerifyMode>,
    pub expected_counter: Option<u64>,
    pub retry: bool,
}

impl RotateArgs {
    pub fn connectivity(&self) -> Connectivity {
        let needs_tip = !matches!(self.period_source, Some(KesPeriodSource::Fixed(_)));
        if needs_tip || self.verify == Some(VerifyMode::Node) {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }

    pub fn plan(&self) -> Result<RotationPlan, WorkflowError> {
        let mut builder = RotationPlan::builder();
        if let (Some(vkey), Some(skey)) = (&self.kes_vkey, &self.kes_skey) {
            builder = builder.kes_keys(vkey, skey);
        }
        if let (Some(skey), Some(counter)) = (&self.cold_skey, &self.counter) {
            builder = builder.cold_keys(skey, counter);
        }
        if let Some(out) = &self.out {
            builder = builder.op_cert(out);
        }
        if let Some(source) = &self.period_source {
            builder = builder.period_source(source.clone());
        }
        if let Some(mode) = self.verify {
            builder = builder.verify(mode);
        }
        if let Some(expected) = self.expected_counter {
            builder = builder.expected_issue_counter(expected);
        }
        if self.retry {
            builder = builder.read_retry(RetryPolicy::default());
        }
        builder.build()
    }
}

/// `args` sin el nombre del programa.
pub fn parse_args(args: &[String]) -> Result<Command, UsageError> {
    let (command, rest) = args.split_first().ok_or(UsageError::MissingCommand)?;
    match command.as_str() {
        "tip" => {
            if let Some(flag) = rest.first() {
                return Err(UsageError::UnknownFlag(flag.clone()));
            }
            Ok(Command::Tip)
        }
        "utxo" => Ok(Command::Utxo { address: address_flag(rest)? }),
        "balance" => Ok(Command::Balance { address: address_flag(rest)? }),
        "rotate-kes" => parse_rotate(rest).map(Command::RotateKes),
        other => Err(UsageError::UnknownCommand(other.to_string())),
    }
}

fn address_flag(rest: &[String]) -> Result<String, UsageError> {
    let mut address = None;
    let mut it = rest.iter();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--address" => address = Some(value(&mut it, flag)?.to_string()),
            _ => return Err(UsageError::UnknownFlag(flag.clone())),
        }
    }
    address.ok_or(UsageError::MissingFlag("--address"))
}

fn parse_rotate(rest: &[String]) -> Result<RotateArgs, UsageError> {
    let mut args = RotateArgs::default();
    let mut it = rest.iter();
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--kes-vkey" => args.kes_vkey = Some(value(&mut it, flag)?.into()),
            "--kes-skey" => args.kes_skey = Some(value(&mut it, flag)?.into()),
            "--cold-skey" => args.cold_skey = Some(value(&mut it, flag)?.into()),
            "--counter" => args.counter = Some(value(&mut it, flag)?.into()),
            "--out" => args.out = Some(value(&mut it, flag)?.into()),
            "--genesis" => set_source(&mut args, KesPeriodSource::Genesis(value(&mut it, flag)?.into()))?,
            "--slots-per-period" => set_source(&mut args, KesPeriodSource::SlotsPerPeriod(number(&mut it, flag)?))?,
            "--kes-period" => set_source(&mut args, KesPeriodSource::Fixed(number(&mut it, flag)?))?,
            "--expected-counter" => args.expected_counter = Some(number(&mut it, flag)?),
            "--verify" => {
                let raw = value(&mut it, flag)?;
                args.verify = Some(match raw {
                                       "skip" => VerifyMode::Skip,
                                       "offline" => VerifyMode::Offline,
                                       "node" => VerifyMode::Node,
                                       _ => return Err(invalid(flag, raw)),
                                   });
            }
            "--retry" => args.retry = true,
            _ => return Err(UsageError::UnknownFlag(flag.clone())),
        }
    }
    if args.kes_vkey.is_some() != args.kes_skey.is_some() {
        return Err(UsageError::Conflict("--kes-vkey and --kes-skey go together".into()));
    }
    if args.cold_skey.is_none() {
        return Err(UsageError::MissingFlag("--cold-skey"));
    }
    if args.counter.is_none() {
        return Err(UsageError::MissingFlag("--counter"));
    }
    if args.period_source.is_none() {
        return Err(UsageError::MissingFlag("--genesis | --slots-per-period | --kes-period"));
    }
    Ok(args)
}

fn set_source(args: &mut RotateArgs, source: KesPeriodSource) -> Result<(), UsageError> {
    if args.period_source.is_some() {
        return Err(UsageError::Conflict("only one of --genesis, --slots-per-period, --kes-period".into()));
    }
    args.period_source = Some(source);
    Ok(())
}

fn value<'a>(it: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a str, UsageError> {
    match it.next() {
        Some(v) if !v.starts_with("--") => Ok(v.as_str()),
        _ => Err(UsageError::MissingValue(flag.to_string())),
    }
}

fn number<'a>(it: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<u64, UsageError> {
    let raw = value(it, flag)?;
    raw.parse::<u64>().map_err(|_| invalid(flag, raw))
}

fn invalid(flag: &str, value: &str) -> UsageError {
    UsageError::InvalidValue { flag: flag.to_string(),
                               value: value.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn simple_queries() {
        assert_eq!(parse_args(&args("tip")), Ok(Command::Tip));
        assert_eq!(parse_args(&args("utxo --address addr_test1xyz")),
                   Ok(Command::Utxo { address: "addr_test1xyz".into() }));
        assert_eq!(parse_args(&args("balance")), Err(UsageError::MissingFlag("--address")));
        assert_eq!(parse_args(&args("utxo --address")), Err(UsageError::MissingValue("--address".into())));
        assert_eq!(parse_args(&[]), Err(UsageError::MissingCommand));
        assert!(matches!(parse_args(&args("mint")), Err(UsageError::UnknownCommand(_))));
    }

    #[test]
    fn rotate_kes_offline_with_fixed_period() {
        let cmd = parse_args(&args("rotate-kes --cold-skey cold.skey --counter cold.counter --kes-period 412 --expected-counter 3")).unwrap();
        assert_eq!(cmd.connectivity(), Connectivity::Offline);
        let Command::RotateKes(rotate) = cmd else { panic!("esperaba rotate-kes") };
        let plan = rotate.plan().unwrap();
        assert_eq!(plan.period_source, KesPeriodSource::Fixed(412));
        assert_eq!(plan.expected_issue_counter, Some(3));
        assert_eq!(plan.op_cert, PathBuf::from("node.cert"));
        assert!(plan.read_retry.is_none());
    }

    #[test]
    fn rotate_kes_needs_the_node_for_tip_or_node_verification() {
        let base = "rotate-kes --cold-skey c.skey --counter c.counter";
        let genesis = parse_args(&args(&format!("{base} --genesis shelley.json --retry"))).unwrap();
        assert_eq!(genesis.connectivity(), Connectivity::Online);
        let node = parse_args(&args(&format!("{base} --kes-period 5 --verify node"))).unwrap();
        assert_eq!(node.connectivity(), Connectivity::Online);
    }

    #[test]
    fn rotate_kes_rejects_bad_combinations() {
        let base = "rotate-kes --cold-skey c.skey --counter c.counter";
        assert!(matches!(parse_args(&args(&format!("{base} --kes-period 1 --slots-per-period 129600"))),
                         Err(UsageError::Conflict(_))));
        assert!(matches!(parse_args(&args(&format!("{base} --kes-period 1 --kes-vkey k.vkey"))),
                         Err(UsageError::Conflict(_))));
        assert!(matches!(parse_args(&args(&format!("{base} --kes-period x"))),
                         Err(UsageError::InvalidValue { .. })));
        assert!(matches!(parse_args(&args(&format!("{base} --kes-period 1 --verify maybe"))),
                         Err(UsageError::InvalidValue { .. })));
        assert_eq!(parse_args(&args("rotate-kes --counter c.counter --kes-period 1")),
                   Err(UsageError::MissingFlag("--cold-skey")));
    }

    #[test]
    fn zero_slots_per_period_is_refused_by_the_plan() {
        let cmd = parse_args(&args("rotate-kes --cold-skey c.skey --counter c.counter --slots-per-period 0")).unwrap();
        let Command::RotateKes(rotate) = cmd else { panic!("esperaba rotate-kes") };
        assert!(matches!(rotate.plan(), Err(WorkflowError::Plan(_))));
    }
}
