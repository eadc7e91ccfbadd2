//! Trait de ejecución y precondiciones comunes a todo runner.
use std::path::Path;

use crate::command::{CommandSpec, Connectivity};
use crate::config::OperationContext;
use crate::errors::{AdaError, AdaResult};
use crate::exec::ExecutionResult;

pub trait CommandRunner {
    /// Lanza el proceso. Sólo se llama tras `check_preconditions`.
    fn run_process(&self, spec: &CommandSpec, ctx: &OperationContext) -> AdaResult<ExecutionResult>;

    /// Verifica sello de contexto y socket (si la operación es online) y
    /// luego ejecuta. Sin reintentos.
    fn execute(&self, spec: &CommandSpec, ctx: &OperationContext) -> AdaResult<ExecutionResult> {
        check_preconditions(spec, ctx)?;
        self.run_process(spec, ctx)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run_process(&self, spec: &CommandSpec, ctx: &OperationContext) -> AdaResult<ExecutionResult> {
        (**self).run_process(spec, ctx)
    }

    fn execute(&self, spec: &CommandSpec, ctx: &OperationContext) -> AdaResult<ExecutionResult> {
        (**self).execute(spec, ctx)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run_process(&self, spec: &CommandSpec, ctx: &OperationContext) -> AdaResult<ExecutionResult> {
        (**self).run_process(spec, ctx)
    }

    fn execute(&self, spec: &CommandSpec, ctx: &OperationContext) -> AdaResult<ExecutionResult> {
        (**self).execute(spec, ctx)
    }
}

pub fn check_preconditions(spec: &CommandSpec, ctx: &OperationContext) -> AdaResult<()> {
    if spec.stamp() != ctx.stamp() {
        let s = spec.stamp();
        let c = ctx.stamp();
        return Err(AdaError::Configuration(format!("{} was rendered for era {} (legacy={}, network={}) but the context is era {} (legacy={}, network={})",
                                                   spec.operation().name(),
                                                   s.era,
                                                   s.legacy,
                                                   s.network,
                                                   c.era,
                                                   c.legacy,
                                                   c.network)));
    }
    if spec.connectivity() == Connectivity::Online {
        let socket = ctx.socket_path()
                        .ok_or_else(|| AdaError::SocketUnavailable { path: String::new(),
                                                                     detail: "no node socket path configured".into() })?;
        check_socket(&ctx.resolve_path(socket))?;
    }
    Ok(())
}

fn check_socket(path: &Path) -> AdaResult<()> {
    let unavailable = |detail: String| AdaError::SocketUnavailable { path: path.display().to_string(),
                                                                     detail };
    let meta = std::fs::metadata(path).map_err(|e| unavailable(format!("does not exist: {e}")))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if !meta.file_type().is_socket() {
            return Err(unavailable("path is not a unix socket".into()));
        }
    }
    #[cfg(not(unix))]
    let _ = meta;
    Ok(())
}
