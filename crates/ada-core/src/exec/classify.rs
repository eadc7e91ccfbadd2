//! Clasificación de salidas no-cero.
use crate::command::CommandSpec;
use crate::config::OperationContext;
use crate::errors::AdaError;
use crate::exec::ExecutionResult;

/// Fragmentos de stderr con los que el CLI reporta que no pudo conectar al
/// socket del nodo (nodo caído o todavía cargando).
const SOCKET_FAILURE_MARKERS: [&str; 2] = ["Network.Socket.connect", "Connection refused"];

/// Convierte un resultado no-cero en error. Un socket rechazado nunca se
/// reporta como error genérico de ejecución.
pub fn classify_failure(spec: &CommandSpec, ctx: &OperationContext, result: &ExecutionResult) -> AdaError {
    let stderr = result.stderr_text().into_owned();
    if SOCKET_FAILURE_MARKERS.iter().any(|m| stderr.contains(m)) {
        let path = ctx.socket_path()
                      .map(|p| ctx.resolve_path(p).display().to_string())
                      .unwrap_or_default();
        return AdaError::SocketUnavailable { path, detail: stderr };
    }
    AdaError::Execution { operation: spec.operation().name().to_string(),
                          command: spec.command_line(),
                          exit_code: Some(result.exit_code),
                          stderr }
}
