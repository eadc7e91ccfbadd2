//! Replay del journal: `RotationInstance` con un `StepSlot` por paso y el
//! `KesRotationState` acumulado.
//!
//! El repositorio consume los eventos en orden. Un journal que viole la
//! máquina de estados (p.ej. un `StepFinished` tras un fallo) se rechaza.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::WorkflowError;
use crate::event::{RotationEvent, RotationEventKind, StepOutput};
use crate::state::{KesRotationState, RotationFailure, RotationStage, RotationStep, VerificationOutcome, WrittenArtifact};

/// Estado de un paso en tiempo de ejecución.
///
/// Transiciones: `Pending` -> `Running` -> `FinishedOk` | `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    FinishedOk,
    Failed,
}

#[derive(Debug, Clone)]
pub struct StepSlot {
    pub step: RotationStep,
    pub status: StepStatus,
    pub fingerprint: Option<String>,
    pub artifacts: Vec<WrittenArtifact>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub attempts: u32,
}

#[derive(Debug, Clone)]
pub struct RotationInstance {
    pub id: Uuid,
    pub plan_hash: Option<String>,
    pub steps: Vec<StepSlot>,
    /// Primer paso pendiente.
    pub cursor: usize,
    pub completed: bool,
    pub state: KesRotationState,
}

impl RotationInstance {
    pub fn is_terminal(&self) -> bool {
        self.state.stage.is_terminal()
    }
}

pub trait RotationRepository {
    fn load(&self, rotation_id: Uuid, events: &[RotationEvent]) -> Result<RotationInstance, WorkflowError>;
}

#[derive(Debug, Default)]
pub struct InMemoryRotationRepository;

impl InMemoryRotationRepository {
    pub fn new() -> Self {
        Self
    }
}

fn apply_output(state: &mut KesRotationState, output: &StepOutput) {
    match output {
        StepOutput::PeriodFetched { kes_period, .. } => state.kes_period = Some(*kes_period),
        StepOutput::KeysGenerated { keys } => state.keys = keys.clone(),
        StepOutput::CertificateIssued { certificate,
                                        counter_before,
                                        issue_counter, } => {
            state.certificate = Some(certificate.clone());
            state.counter_before = Some(*counter_before);
            state.issue_counter = Some(*issue_counter);
        }
        StepOutput::Verified { kes_period,
                               issue_counter,
                               counter_after, } => {
            state.verification = Some(VerificationOutcome { kes_period: *kes_period,
                                                            issue_counter: *issue_counter,
                                                            counter_after: *counter_after })
        }
    }
}

impl RotationRepository for InMemoryRotationRepository {
    fn load(&self, rotation_id: Uuid, events: &[RotationEvent]) -> Result<RotationInstance, WorkflowError> {
        let mut state = KesRotationState::new(rotation_id);
        let mut steps: Vec<StepSlot> = Vec::new();
        let mut plan_hash = None;
        let mut completed = false;
        for ev in events {
            match &ev.kind {
                RotationEventKind::RotationInitialized { plan_hash: h, steps: plan_steps } => {
                    plan_hash = Some(h.clone());
                    steps = plan_steps.iter()
                                      .map(|s| StepSlot { step: *s,
                                                          status: StepStatus::Pending,
                                                          fingerprint: None,
                                                          artifacts: vec![],
                                                          started_at: None,
                                                          finished_at: None,
                                                          attempts: 0 })
                                      .collect();
                }
                RotationEventKind::StepStarted { step_index, .. } => {
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Running;
                        slot.started_at = Some(ev.ts);
                        slot.attempts += 1;
                    }
                }
                RotationEventKind::StepFinished { step_index,
                                                  step,
                                                  output,
                                                  artifacts,
                                                  fingerprint, } => {
                    state.advance(step.target())?;
                    apply_output(&mut state, output);
                    state.artifacts.extend(artifacts.iter().cloned());
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::FinishedOk;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.artifacts = artifacts.clone();
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RotationEventKind::StepFailed { step_index,
                                                step,
                                                cause,
                                                artifacts_written,
                                                fingerprint, } => {
                    state.advance(RotationStage::Failed(RotationFailure { step: *step,
                                                                          cause: cause.clone(),
                                                                          artifacts_written: artifacts_written.clone() }))?;
                    if let Some(slot) = steps.get_mut(*step_index) {
                        slot.status = StepStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.artifacts = artifacts_written.iter().filter(|a| !a.complete).cloned().collect();
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RotationEventKind::RotationCompleted { .. } => {
                    state.advance(RotationStage::Done)?;
                    completed = true;
                }
            }
        }
        let cursor = steps.iter()
                          .position(|s| matches!(s.status, StepStatus::Pending | StepStatus::Running))
                          .unwrap_or(steps.len());
        Ok(RotationInstance { id: rotation_id,
                              plan_hash,
                              steps,
                              cursor,
                              completed,
                              state })
    }
}
