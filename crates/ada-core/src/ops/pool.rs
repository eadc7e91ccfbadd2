//! Identificador y metadatos de stake pool.
use std::path::Path;

use ada_domain::{ParsedValue, PoolMetadata, ValueKind};

use crate::client::{unexpected, CardanoCli};
use crate::command::{Arg, Operation, Params};
use crate::errors::{AdaError, AdaResult};
use crate::exec::CommandRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolIdFormat {
    Hex,
    Bech32,
}

impl PoolIdFormat {
    fn as_str(&self) -> &'static str {
        match self {
            PoolIdFormat::Hex => "hex",
            PoolIdFormat::Bech32 => "bech32",
        }
    }
}

fn single_token(operation: Operation, value: ParsedValue) -> AdaResult<String> {
    match value {
        ParsedValue::Raw(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        other => Err(unexpected(operation, ValueKind::Raw, &other)),
    }
}

impl<R: CommandRunner> CardanoCli<R> {
    pub fn pool_id(&self, cold_vkey: impl AsRef<Path>, format: PoolIdFormat) -> AdaResult<String> {
        let params = Params::new().with_path(Arg::ColdVerificationKeyFile, cold_vkey)
                                  .with(Arg::OutputFormat, format.as_str());
        single_token(Operation::StakePoolId, self.run(Operation::StakePoolId, &params)?)
    }

    /// Valida el JSON de metadatos antes de calcular su hash.
    pub fn pool_metadata_hash(&self, metadata: impl AsRef<Path>) -> AdaResult<String> {
        let op = Operation::StakePoolMetadataHash;
        let full = self.context().resolve_path(&metadata);
        PoolMetadata::from_file(&full).and_then(|m| m.validate())
                                      .map_err(|e| AdaError::invalid(op.name(), e.to_string()))?;
        let params = Params::new().with_path(Arg::PoolMetadataFile, metadata);
        single_token(op, self.run(op, &params)?)
    }
}
