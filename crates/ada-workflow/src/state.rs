//! Máquina de estados de la rotación KES.
//!
//! Las transiciones válidas son:
//! - `Start` -> `PeriodFetched` -> `KeysGenerated` -> `CertificateIssued`
//! - `CertificateIssued` -> `Verified` -> `Done`
//! - `CertificateIssued` -> `Done` (sin verificación)
//! - cualquier estado no terminal -> `Failed`
//!
//! `Done` y `Failed` son absorbentes. No hay retrocesos.
use std::fmt;
use std::path::PathBuf;

use ada_domain::KeyMaterial;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FailureCause, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationStep {
    FetchPeriod,
    GenerateKeys,
    IssueCertificate,
    Verify,
}

impl RotationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationStep::FetchPeriod => "fetch_period",
            RotationStep::GenerateKeys => "generate_keys",
            RotationStep::IssueCertificate => "issue_certificate",
            RotationStep::Verify => "verify",
        }
    }

    /// Estado al que lleva el paso cuando termina bien.
    pub fn target(&self) -> RotationStage {
        match self {
            RotationStep::FetchPeriod => RotationStage::PeriodFetched,
            RotationStep::GenerateKeys => RotationStage::KeysGenerated,
            RotationStep::IssueCertificate => RotationStage::CertificateIssued,
            RotationStep::Verify => RotationStage::Verified,
        }
    }
}

impl fmt::Display for RotationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    KesVerificationKey,
    KesSigningKey,
    OperationalCertificate,
    IssueCounter,
}

/// Archivo que la rotación dejó en disco. `complete == false`: el paso que
/// lo escribía falló; el archivo se reporta, nunca se borra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenArtifact {
    pub path: PathBuf,
    pub role: ArtifactRole,
    pub complete: bool,
}

impl WrittenArtifact {
    pub fn complete(path: impl Into<PathBuf>, role: ArtifactRole) -> Self {
        Self { path: path.into(),
               role,
               complete: true }
    }

    pub fn partial(path: impl Into<PathBuf>, role: ArtifactRole) -> Self {
        Self { path: path.into(),
               role,
               complete: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationFailure {
    pub step: RotationStep,
    pub cause: FailureCause,
    /// Todo lo escrito hasta el fallo, incluidos los pasos previos.
    pub artifacts_written: Vec<WrittenArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationStage {
    Start,
    PeriodFetched,
    KeysGenerated,
    CertificateIssued,
    Verified,
    Done,
    Failed(RotationFailure),
}

impl RotationStage {
    pub fn name(&self) -> &'static str {
        match self {
            RotationStage::Start => "start",
            RotationStage::PeriodFetched => "period_fetched",
            RotationStage::KeysGenerated => "keys_generated",
            RotationStage::CertificateIssued => "certificate_issued",
            RotationStage::Verified => "verified",
            RotationStage::Done => "done",
            RotationStage::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RotationStage::Done | RotationStage::Failed(_))
    }

    fn allows(&self, next: &RotationStage) -> bool {
        use RotationStage::*;
        match (self, next) {
            (Done, _) | (Failed(_), _) => false,
            (_, Failed(_)) => true,
            (Start, PeriodFetched) | (PeriodFetched, KeysGenerated) | (KeysGenerated, CertificateIssued) => true,
            (CertificateIssued, Verified) | (CertificateIssued, Done) | (Verified, Done) => true,
            _ => false,
        }
    }
}

/// Lo que la verificación comprobó sobre el certificado emitido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub kes_period: u64,
    pub issue_counter: u64,
    pub counter_after: u64,
}

/// Estado acumulado de una rotación; se reconstruye por replay del journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KesRotationState {
    pub rotation_id: Uuid,
    pub stage: RotationStage,
    pub kes_period: Option<u64>,
    pub keys: Vec<KeyMaterial>,
    /// Valor leído del archivo de contador antes de emitir.
    pub counter_before: Option<u64>,
    pub certificate: Option<PathBuf>,
    pub issue_counter: Option<u64>,
    /// `None` si la verificación no corrió (aún o por plan).
    pub verification: Option<VerificationOutcome>,
    pub artifacts: Vec<WrittenArtifact>,
}

impl KesRotationState {
    pub fn new(rotation_id: Uuid) -> Self {
        Self { rotation_id,
               stage: RotationStage::Start,
               kes_period: None,
               keys: Vec::new(),
               counter_before: None,
               certificate: None,
               issue_counter: None,
               verification: None,
               artifacts: Vec::new() }
    }

    /// Avanza hacia `next` si la transición es válida.
    pub fn advance(&mut self, next: RotationStage) -> Result<(), WorkflowError> {
        if self.stage.is_terminal() {
            return Err(WorkflowError::AlreadyTerminal(self.stage.name().to_string()));
        }
        if !self.stage.allows(&next) {
            return Err(WorkflowError::illegal(&self.stage, &next));
        }
        self.stage = next;
        Ok(())
    }

    pub fn failure(&self) -> Option<&RotationFailure> {
        match &self.stage {
            RotationStage::Failed(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.stage == RotationStage::Done
    }

    /// Rutas de todos los artefactos completos.
    pub fn artifact_paths(&self) -> Vec<&PathBuf> {
        self.artifacts.iter().filter(|a| a.complete).map(|a| &a.path).collect()
    }
}
