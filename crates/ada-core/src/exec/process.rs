//! Ejecutor real: un subproceso por operación, en `cwd`, con timeout opcional.
use std::io::{self, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use wait_timeout::ChildExt;

use crate::command::CommandSpec;
use crate::config::resolver::SOCKET_KEY;
use crate::config::OperationContext;
use crate::errors::{AdaError, AdaResult};
use crate::exec::{CommandRunner, ExecutionResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

fn execution_error(spec: &CommandSpec, detail: String) -> AdaError {
    AdaError::Execution { operation: spec.operation().name().to_string(),
                          command: spec.command_line(),
                          exit_code: None,
                          stderr: detail }
}

type Drain = Option<JoinHandle<io::Result<Vec<u8>>>>;

// Los pipes se drenan en hilos aparte: una salida grande no puede bloquear la espera.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    pipe.map(|mut p| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                p.read_to_end(&mut buf)?;
                Ok(buf)
            })
        })
}

/// Una lectura cortada nunca llega al parser como salida completa.
fn collect(spec: &CommandSpec, stream: &str, handle: Drain) -> AdaResult<Vec<u8>> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    match handle.join() {
        Ok(Ok(buf)) => Ok(buf),
        Ok(Err(e)) => Err(execution_error(spec, format!("reading {stream} failed: {e}"))),
        Err(_) => Err(execution_error(spec, format!("{stream} reader panicked"))),
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl CommandRunner for ProcessExecutor {
    fn run_process(&self, spec: &CommandSpec, ctx: &OperationContext) -> AdaResult<ExecutionResult> {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.tokens())
           .current_dir(ctx.cwd())
           .stdin(Stdio::null())
           .stdout(Stdio::piped())
           .stderr(Stdio::piped());
        if let Some(socket) = ctx.socket_path() {
            cmd.env(SOCKET_KEY, ctx.resolve_path(socket));
        }
        log::debug!("running {} (cwd {})", spec.display_line(), ctx.cwd().display());

        let started = Instant::now();
        let mut child = cmd.spawn()
                           .map_err(|e| execution_error(spec, format!("failed to spawn {}: {e}", spec.program().display())))?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match ctx.timeout() {
            Some(limit) => match child.wait_timeout(limit) {
                Ok(Some(status)) => status,
                Ok(None) => {
                    reap(&mut child);
                    // Un nieto puede mantener el pipe abierto: los lectores se sueltan.
                    drop((stdout, stderr));
                    log::warn!("{} timed out after {:?}, process killed", spec.operation().name(), limit);
                    return Err(AdaError::Timeout { operation: spec.operation().name().to_string(),
                                                   command: spec.command_line(),
                                                   after: limit });
                }
                Err(e) => {
                    reap(&mut child);
                    return Err(execution_error(spec, format!("wait failed: {e}")));
                }
            },
            None => child.wait().map_err(|e| execution_error(spec, format!("wait failed: {e}")))?,
        };

        let stdout = collect(spec, "stdout", stdout)?;
        let stderr = collect(spec, "stderr", stderr)?;
        let result = ExecutionResult { exit_code: status.code().unwrap_or(-1),
                                       stdout,
                                       stderr,
                                       duration: started.elapsed() };
        log::debug!("{} exited with {} in {:?}", spec.operation().name(), result.exit_code, result.duration);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandBuilder, Operation, Params};

    /// Entrega unos bytes y luego falla, como un pipe cortado.
    struct BrokenPipe {
        sent: bool,
    }

    impl Read for BrokenPipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            self.sent = true;
            buf[..3].copy_from_slice(b"{\"s");
            Ok(3)
        }
    }

    fn tip_spec() -> CommandSpec {
        let ctx = OperationContext::builder().cwd("/tmp").socket_path("node.socket").build().unwrap();
        CommandBuilder::build(Operation::QueryTip, &Params::new(), &ctx).unwrap()
    }

    #[test]
    fn partial_read_is_an_execution_error() {
        let spec = tip_spec();
        match collect(&spec, "stdout", drain(Some(BrokenPipe { sent: false }))) {
            Err(AdaError::Execution { stderr, exit_code, .. }) => {
                assert!(stderr.contains("reading stdout failed"), "{stderr}");
                assert_eq!(exit_code, None);
            }
            other => panic!("esperaba Execution, obtuve {other:?}"),
        }
    }

    #[test]
    fn complete_read_keeps_every_byte() {
        let spec = tip_spec();
        let data = vec![b'x'; 200_000];
        let out = collect(&spec, "stdout", drain(Some(io::Cursor::new(data.clone())))).unwrap();
        assert_eq!(out, data);
        assert!(collect(&spec, "stderr", None).unwrap().is_empty());
    }
}
