//! ada-workflow: rotación de llaves KES y certificado operacional como
//! máquina de estados con journal de eventos.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod plan;
pub mod repo;
pub mod state;
pub mod steps;

pub use engine::RotationEngine;
pub use errors::{FailureCause, WorkflowError};
pub use event::{EventStore, InMemoryEventStore, RotationEvent, RotationEventKind, StepOutput};
pub use plan::{KesPeriodSource, RotationPlan, RotationPlanBuilder, VerifyMode};
pub use repo::{InMemoryRotationRepository, RotationInstance, RotationRepository, StepSlot, StepStatus};
pub use state::{ArtifactRole, KesRotationState, RotationFailure, RotationStage, RotationStep, VerificationOutcome, WrittenArtifact};
