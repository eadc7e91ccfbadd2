//! Process Executor.
mod classify;
mod process;
mod recording;
mod result;
mod runner;

pub use classify::classify_failure;
pub use process::ProcessExecutor;
pub use recording::{RecordingRunner, Responder};
pub use result::ExecutionResult;
pub use runner::{check_preconditions, CommandRunner};
