//! Tipos de evento de la rotación y estructura `RotationEvent`.
//!
//! Cada transición del orquestador emite un evento a un `EventStore`
//! append-only. El replay de esos eventos reconstruye el estado completo de
//! la rotación sin depender de estructuras mutables.
use std::path::PathBuf;

use ada_domain::KeyMaterial;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FailureCause;
use crate::state::{RotationStep, WrittenArtifact};

/// Resultado tipado de cada paso terminado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "output", rename_all = "snake_case")]
pub enum StepOutput {
    PeriodFetched {
        /// `None` cuando el periodo vino fijado por el plan.
        slot: Option<u64>,
        kes_period: u64,
    },
    KeysGenerated {
        keys: Vec<KeyMaterial>,
    },
    CertificateIssued {
        certificate: PathBuf,
        counter_before: u64,
        issue_counter: u64,
    },
    Verified {
        kes_period: u64,
        issue_counter: u64,
        counter_after: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationEventKind {
    /// Primer evento de toda rotación: fija el hash del plan y los pasos.
    RotationInitialized { plan_hash: String, steps: Vec<RotationStep> },
    /// Un paso comenzó. No implica éxito.
    StepStarted { step_index: usize, step: RotationStep },
    StepFinished {
        step_index: usize,
        step: RotationStep,
        output: StepOutput,
        artifacts: Vec<WrittenArtifact>,
        fingerprint: String,
    },
    /// Fallo terminal: la rotación no continúa.
    StepFailed {
        step_index: usize,
        step: RotationStep,
        cause: FailureCause,
        artifacts_written: Vec<WrittenArtifact>,
        fingerprint: String,
    },
    RotationCompleted { rotation_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationEvent {
    pub seq: u64,
    pub rotation_id: Uuid,
    pub kind: RotationEventKind,
    pub ts: DateTime<Utc>, // no entra en fingerprints
}
