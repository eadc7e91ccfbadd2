//! Motor de la rotación KES.
//!
//! Cada llamada a `step` reconstruye la instancia desde el journal, ejecuta
//! el siguiente paso pendiente y registra su resultado. Un fallo lleva la
//! rotación a `Failed`, que es terminal: no hay reintentos automáticos.
use serde_json::json;
use uuid::Uuid;

use ada_core::{CardanoCli, CommandRunner, ProcessExecutor};

use crate::constants::WORKFLOW_VERSION;
use crate::errors::{FailureCause, WorkflowError};
use crate::event::{EventStore, InMemoryEventStore, RotationEvent, RotationEventKind};
use crate::hashing::hash_value;
use crate::plan::RotationPlan;
use crate::repo::{InMemoryRotationRepository, RotationInstance, RotationRepository, StepStatus};
use crate::state::{KesRotationState, RotationStep};
use crate::steps::{run_step, StepRunResult};

pub struct RotationEngine<R = ProcessExecutor, E = InMemoryEventStore, P = InMemoryRotationRepository>
    where R: CommandRunner,
          E: EventStore,
          P: RotationRepository
{
    cli: CardanoCli<R>,
    event_store: E,
    repository: P,
}

impl<R: CommandRunner> RotationEngine<R, InMemoryEventStore, InMemoryRotationRepository> {
    /// Motor con journal en memoria.
    pub fn new(cli: CardanoCli<R>) -> Self {
        Self::with_stores(cli, InMemoryEventStore::default(), InMemoryRotationRepository::new())
    }
}

impl<R, E, P> RotationEngine<R, E, P>
    where R: CommandRunner,
          E: EventStore,
          P: RotationRepository
{
    pub fn with_stores(cli: CardanoCli<R>, event_store: E, repository: P) -> Self {
        Self { cli,
               event_store,
               repository }
    }

    pub fn cli(&self) -> &CardanoCli<R> {
        &self.cli
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    pub fn events(&self, rotation_id: Uuid) -> Vec<RotationEvent> {
        self.event_store.list(rotation_id)
    }

    pub fn load(&self, rotation_id: Uuid) -> Result<RotationInstance, WorkflowError> {
        self.repository.load(rotation_id, &self.event_store.list(rotation_id))
    }

    pub fn state(&self, rotation_id: Uuid) -> Result<KesRotationState, WorkflowError> {
        Ok(self.load(rotation_id)?.state)
    }

    /// Abre una rotación nueva en el journal.
    pub fn start(&mut self, plan: &RotationPlan) -> Uuid {
        let rotation_id = Uuid::new_v4();
        self.event_store.append_kind(rotation_id,
                                     RotationEventKind::RotationInitialized { plan_hash: plan.plan_hash(),
                                                                              steps: plan.steps() });
        log::info!("rotation {rotation_id} started ({} steps)", plan.steps().len());
        rotation_id
    }

    /// Ejecuta el plan completo. Devuelve el estado terminal: `Done` o
    /// `Failed` con los artefactos escritos. `Err` sólo para errores del
    /// propio motor (journal inconsistente, plan distinto).
    pub fn run(&mut self, plan: &RotationPlan) -> Result<KesRotationState, WorkflowError> {
        let rotation_id = self.start(plan);
        self.resume(rotation_id, plan)
    }

    /// Continúa una rotación existente hasta un estado terminal.
    pub fn resume(&mut self, rotation_id: Uuid, plan: &RotationPlan) -> Result<KesRotationState, WorkflowError> {
        loop {
            let state = self.step(rotation_id, plan)?;
            if state.stage.is_terminal() {
                return Ok(state);
            }
        }
    }

    /// Ejecuta el siguiente paso pendiente.
    pub fn step(&mut self, rotation_id: Uuid, plan: &RotationPlan) -> Result<KesRotationState, WorkflowError> {
        let instance = self.load(rotation_id)?;
        let plan_hash = plan.plan_hash();
        match &instance.plan_hash {
            Some(h) if *h == plan_hash => {}
            Some(_) => return Err(WorkflowError::Plan(format!("rotation {rotation_id} was started with a different plan"))),
            None => return Err(WorkflowError::Plan(format!("rotation {rotation_id} is not initialized"))),
        }
        if instance.is_terminal() {
            return Err(WorkflowError::AlreadyTerminal(instance.state.stage.name().to_string()));
        }

        let cursor = instance.cursor;
        if cursor >= instance.steps.len() {
            let fingerprint = self.rotation_fingerprint(&instance, &plan_hash);
            self.event_store
                .append_kind(rotation_id, RotationEventKind::RotationCompleted { rotation_fingerprint: fingerprint });
            log::info!("rotation {rotation_id} done");
            return self.state(rotation_id);
        }
        let slot = &instance.steps[cursor];
        let step = slot.step;
        // Un paso iniciado sin evento de cierre: la emisión pudo haber ocurrido.
        if slot.status == StepStatus::Running && step == RotationStep::IssueCertificate {
            return Err(WorkflowError::Plan(format!("{step} was interrupted in rotation {rotation_id}; inspect {} before issuing again",
                                                   plan.counter.display())));
        }

        self.event_store
            .append_kind(rotation_id, RotationEventKind::StepStarted { step_index: cursor, step });
        match run_step(step, &self.cli, plan, &instance.state) {
            StepRunResult::Success { output, artifacts } => {
                let fingerprint = hash_value(&json!({
                    "workflow_version": WORKFLOW_VERSION,
                    "plan_hash": plan_hash,
                    "step_index": cursor,
                    "step": step,
                    "output": output,
                }));
                self.event_store.append_kind(rotation_id,
                                             RotationEventKind::StepFinished { step_index: cursor,
                                                                               step,
                                                                               output,
                                                                               artifacts,
                                                                               fingerprint });
            }
            StepRunResult::Failure { error, partial } => {
                let cause = FailureCause::from(&error);
                log::warn!("rotation {rotation_id}: {step} failed: {error}");
                let mut artifacts_written = instance.state.artifacts.clone();
                artifacts_written.extend(partial);
                let fingerprint = hash_value(&json!({
                    "workflow_version": WORKFLOW_VERSION,
                    "plan_hash": plan_hash,
                    "step_index": cursor,
                    "step": step,
                    "cause": cause,
                }));
                self.event_store.append_kind(rotation_id,
                                             RotationEventKind::StepFailed { step_index: cursor,
                                                                             step,
                                                                             cause,
                                                                             artifacts_written,
                                                                             fingerprint });
            }
        }
        let instance = self.load(rotation_id)?;
        // tras el último paso, el cierre se registra en la misma llamada
        if !instance.is_terminal() && instance.cursor >= instance.steps.len() {
            return self.step(rotation_id, plan);
        }
        Ok(instance.state)
    }

    fn rotation_fingerprint(&self, instance: &RotationInstance, plan_hash: &str) -> String {
        let step_fps: Vec<&String> = instance.steps.iter().filter_map(|s| s.fingerprint.as_ref()).collect();
        hash_value(&json!({
            "workflow_version": WORKFLOW_VERSION,
            "plan_hash": plan_hash,
            "step_fingerprints": step_fps,
        }))
    }

    /// Fingerprint de cierre de una rotación terminada.
    pub fn rotation_fingerprint_of(&self, rotation_id: Uuid) -> Option<String> {
        self.events(rotation_id).iter().rev().find_map(|e| match &e.kind {
                                                    RotationEventKind::RotationCompleted { rotation_fingerprint } => {
                                                        Some(rotation_fingerprint.clone())
                                                    }
                                                    _ => None,
                                                })
    }
}
