//! Reintento opt-in para lecturas puras ante fallos transitorios conocidos.
use std::thread;
use std::time::Duration;

use crate::command::Operation;
use crate::errors::{AdaError, AdaResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    /// 3 intentos separados por 3 s.
    fn default() -> Self {
        Self { max_attempts: 3,
               delay: Duration::from_secs(3) }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self { max_attempts: 1,
               delay: Duration::ZERO }
    }

    /// Ejecuta `f` reintentando sólo si `operation` es idempotente y el error
    /// es transitorio. Pedir reintento sobre una operación con efectos es un
    /// error de parámetros.
    pub fn run<T, F>(&self, operation: Operation, mut f: F) -> AdaResult<T>
        where F: FnMut() -> AdaResult<T>
    {
        if self.max_attempts > 1 && !operation.is_idempotent() {
            return Err(AdaError::invalid(operation.name(), "retry is only allowed for idempotent read operations"));
        }
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match f() {
                Err(e) if e.is_transient() && attempt < attempts => {
                    log::warn!("{} failed transiently (attempt {attempt}/{attempts}): {e}", operation.name());
                    thread::sleep(self.delay);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
