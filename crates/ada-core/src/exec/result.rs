use std::borrow::Cow;
use std::time::Duration;

/// Salida cruda de un proceso. Se consume una sola vez: o la parsea el
/// parser (código 0) o se convierte en error con su stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `-1` si el proceso terminó por señal.
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Resultado exitoso con `stdout` dado (útil para runners simulados).
    pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
        Self { exit_code: 0,
               stdout: stdout.into(),
               stderr: Vec::new(),
               duration: Duration::ZERO }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self { exit_code,
               stdout: Vec::new(),
               stderr: stderr.into(),
               duration: Duration::ZERO }
    }
}
