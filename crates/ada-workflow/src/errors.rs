//! Errores del orquestador.
use ada_core::envelope::EnvelopeError;
use ada_core::{AdaError, ErrorKind};
use ada_domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::RotationStage;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorkflowError {
    #[error(transparent)]
    Cli(#[from] AdaError),
    #[error("{0}")]
    Envelope(#[from] EnvelopeError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("issue counter guard: expected {expected}, counter file holds {found}")]
    CounterGuard { expected: u64, found: u64 },
    #[error("verification failed: {0}")]
    Verification(String),
    #[error("illegal transition {from} -> {to}")]
    IllegalTransition { from: String, to: String },
    #[error("rotation already terminal ({0})")]
    AlreadyTerminal(String),
    #[error("rotation plan: {0}")]
    Plan(String),
}

impl WorkflowError {
    pub(crate) fn illegal(from: &RotationStage, to: &RotationStage) -> Self {
        WorkflowError::IllegalTransition { from: from.name().to_string(),
                                           to: to.name().to_string() }
    }
}

/// Causa de fallo serializable (va en el journal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCause {
    pub kind: String,
    pub message: String,
}

impl From<&WorkflowError> for FailureCause {
    fn from(e: &WorkflowError) -> Self {
        let kind = match e {
            WorkflowError::Cli(a) => a.kind().as_str(),
            WorkflowError::Envelope(_) => "envelope",
            WorkflowError::Domain(_) => "domain",
            WorkflowError::CounterGuard { .. } => "counter_guard",
            WorkflowError::Verification(_) => "verification",
            WorkflowError::IllegalTransition { .. } => "illegal_transition",
            WorkflowError::AlreadyTerminal(_) => "already_terminal",
            WorkflowError::Plan(_) => "plan",
        };
        FailureCause { kind: kind.to_string(),
                       message: e.to_string() }
    }
}

impl FailureCause {
    /// `true` si el fallo vino del CLI con el discriminante indicado.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind.as_str()
    }
}
