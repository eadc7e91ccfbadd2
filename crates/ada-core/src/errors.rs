//! Taxonomía de errores de la capa de orquestación del CLI.
//!
//! Cada variante es una condición distinta y capturable. Las de ejecución y
//! parseo llevan los tokens del comando y el texto crudo tal cual, para poder
//! reproducir el fallo a mano contra el CLI.
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdaError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid parameters for {operation}: {reason}")]
    InvalidParameters { operation: String, reason: String },
    #[error("node socket unavailable at '{path}': {detail}")]
    SocketUnavailable { path: String, detail: String },
    #[error("{operation} failed (exit {}): {stderr}", .exit_code.map(|c| c.to_string()).unwrap_or_else(|| "none".into()))]
    Execution {
        operation: String,
        command: Vec<String>,
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("unparseable output for {operation}: {reason}")]
    UnparseableOutput {
        operation: String,
        command: Vec<String>,
        raw: String,
        reason: String,
    },
    #[error("{operation} timed out after {}s", .after.as_secs_f64())]
    Timeout {
        operation: String,
        command: Vec<String>,
        after: Duration,
    },
}

/// Discriminante estable de `AdaError` (útil para eventos y logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    InvalidParameters,
    SocketUnavailable,
    Execution,
    UnparseableOutput,
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::InvalidParameters => "invalid_parameters",
            ErrorKind::SocketUnavailable => "socket_unavailable",
            ErrorKind::Execution => "execution",
            ErrorKind::UnparseableOutput => "unparseable_output",
            ErrorKind::Timeout => "timeout",
        }
    }
}

/// Prefijo de stderr que el CLI emite ante cortes transitorios del mux del nodo.
const TRANSIENT_STDERR_PREFIX: &str = "MuxError";

impl AdaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdaError::Configuration(_) => ErrorKind::Configuration,
            AdaError::InvalidParameters { .. } => ErrorKind::InvalidParameters,
            AdaError::SocketUnavailable { .. } => ErrorKind::SocketUnavailable,
            AdaError::Execution { .. } => ErrorKind::Execution,
            AdaError::UnparseableOutput { .. } => ErrorKind::UnparseableOutput,
            AdaError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    pub fn invalid(operation: &str, reason: impl Into<String>) -> Self {
        AdaError::InvalidParameters { operation: operation.to_string(),
                                      reason: reason.into() }
    }

    /// Fallos conocidos como transitorios; sólo éstos admiten reintento en
    /// lecturas puras.
    pub fn is_transient(&self) -> bool {
        match self {
            AdaError::Execution { stderr, .. } => stderr.trim_start().starts_with(TRANSIENT_STDERR_PREFIX),
            _ => false,
        }
    }

    /// Tokens del comando intentado, si el error ocurrió al ejecutar o parsear.
    pub fn command(&self) -> Option<&[String]> {
        match self {
            AdaError::Execution { command, .. } | AdaError::UnparseableOutput { command, .. } | AdaError::Timeout { command, .. } => Some(command),
            _ => None,
        }
    }
}

pub type AdaResult<T> = Result<T, AdaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mux_errors_are_transient() {
        let e = AdaError::Execution { operation: "query tip".into(),
                                      command: vec!["cardano-cli".into()],
                                      exit_code: Some(1),
                                      stderr: "MuxError MuxBearerClosed \"<socket: 11> closed\"".into() };
        assert!(e.is_transient());
        let e = AdaError::Execution { operation: "query tip".into(),
                                      command: vec![],
                                      exit_code: Some(1),
                                      stderr: "Command failed: query tip Error: bad".into() };
        assert!(!e.is_transient());
        assert!(!AdaError::Configuration("x".into()).is_transient());
    }

    #[test]
    fn display_carries_context() {
        let e = AdaError::Execution { operation: "transaction submit".into(),
                                      command: vec![],
                                      exit_code: None,
                                      stderr: "spawn failed".into() };
        assert_eq!(e.to_string(), "transaction submit failed (exit none): spawn failed");
        assert_eq!(e.kind().as_str(), "execution");
    }
}
