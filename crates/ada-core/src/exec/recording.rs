//! Runner simulado que registra cada invocación y responde con un guion.
//!
//! Pensado para tests: permite afirmar que una validación falló sin lanzar
//! ningún proceso (`spawn_count() == 0`) y simular efectos del CLI sobre
//! disco mediante respuestas-closure.
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::command::CommandSpec;
use crate::config::OperationContext;
use crate::errors::{AdaError, AdaResult};
use crate::exec::{CommandRunner, ExecutionResult};

pub type Responder = Box<dyn Fn(&CommandSpec, &OperationContext) -> AdaResult<ExecutionResult> + Send>;

#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
    script: Mutex<VecDeque<Responder>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with<F>(&self, f: F)
        where F: Fn(&CommandSpec, &OperationContext) -> AdaResult<ExecutionResult> + Send + 'static
    {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).push_back(Box::new(f));
    }

    pub fn respond_ok(&self, stdout: &str) {
        let out = stdout.to_string();
        self.respond_with(move |_, _| Ok(ExecutionResult::ok(out.clone())));
    }

    pub fn respond_failure(&self, exit_code: i32, stderr: &str) {
        let err = stderr.to_string();
        self.respond_with(move |_, _| Ok(ExecutionResult::failed(exit_code, err.clone())));
    }

    /// Procesos "lanzados" (los que pasaron las precondiciones).
    pub fn spawn_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Tokens de cada invocación, en orden.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn pending_responses(&self) -> usize {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl CommandRunner for RecordingRunner {
    fn run_process(&self, spec: &CommandSpec, ctx: &OperationContext) -> AdaResult<ExecutionResult> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(spec.tokens().to_vec());
        let next = self.script.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
        match next {
            Some(responder) => responder(spec, ctx),
            None => Err(AdaError::Execution { operation: spec.operation().name().to_string(),
                                              command: spec.command_line(),
                                              exit_code: None,
                                              stderr: "no scripted response left".into() }),
        }
    }
}
