use thiserror::Error;

/// Errores de validación de valores de dominio (sin contexto de proceso).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid quantity '{0}'")]
    InvalidQuantity(String),
    #[error("invalid tx-in '{0}': expected <64 hex>#<index>")]
    InvalidTxIn(String),
    #[error("negative change: inputs {inputs} < outputs {outputs} + fee {fee}")]
    NegativeChange { inputs: String, outputs: String, fee: String },
    #[error("slots per KES period must be positive")]
    ZeroSlotsPerPeriod,
    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),
    #[error("invalid asset name: {0}")]
    InvalidAssetName(String),
    #[error("invalid pool metadata: {0}")]
    InvalidPoolMetadata(String),
    #[error("invalid pool relay '{0}'")]
    InvalidRelay(String),
    #[error("invalid pool registration: {0}")]
    InvalidPoolRegistration(String),
}

