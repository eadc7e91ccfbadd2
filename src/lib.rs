//! adaops: automatización de `cardano-cli`.
//!
//! - `ada_domain`: valores del dominio (cantidades, UTxO, llaves, certificados).
//! - `ada_core`: contexto, construcción de comandos, ejecución y parseo.
//! - `ada_workflow`: rotación de llaves KES con journal de eventos.
//! - `cli`: parseo de argumentos del binario `adaops`.
pub mod cli;

pub use ada_core as core;
pub use ada_domain as domain;
pub use ada_workflow as workflow;

pub use ada_core::{AdaError, AdaResult, CardanoCli, ErrorKind, Network, Operation, OperationContext};
pub use ada_workflow::{KesRotationState, RotationEngine, RotationPlan, WorkflowError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_exposes_the_three_layers() {
        let q = domain::Quantity::from(2_000_000u64);
        assert_eq!(q.to_string(), "2000000");
        assert_eq!(ErrorKind::SocketUnavailable.as_str(), "socket_unavailable");
        assert_eq!(workflow::constants::WORKFLOW_VERSION, "K1.0");
    }
}
