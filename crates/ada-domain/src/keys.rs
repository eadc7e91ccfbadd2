//! Descriptores de material de llaves escrito por el CLI.
//!
//! El contenido de los archivos es opaco; sólo se modela ruta, tipo, rol y
//! (para llaves KES) el periodo para el que se generaron.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    Payment,
    Stake,
    StakePoolCold,
    Kes,
    Vrf,
    OpCertCounter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    Signing,
    Verification,
    Counter,
}

impl KeyType {
    /// Interpreta el campo `type` de un text envelope del CLI
    /// (p.ej. `KesVerificationKey_ed25519_kes_2^6`).
    pub fn from_envelope_type(ty: &str) -> Option<(KeyType, KeyRole)> {
        if ty.starts_with("NodeOperationalCertificateIssueCounter") {
            return Some((KeyType::OpCertCounter, KeyRole::Counter));
        }
        let prefixes: [(&str, KeyType); 5] = [("StakePool", KeyType::StakePoolCold),
                                              ("Payment", KeyType::Payment),
                                              ("Stake", KeyType::Stake),
                                              ("Kes", KeyType::Kes),
                                              ("Vrf", KeyType::Vrf)];
        let (rest, key_type) = prefixes.iter().find_map(|(p, k)| ty.strip_prefix(p).map(|r| (r, *k)))?;
        if rest.starts_with("SigningKey") {
            Some((key_type, KeyRole::Signing))
        } else if rest.starts_with("VerificationKey") {
            Some((key_type, KeyRole::Verification))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMaterial {
    pub path: PathBuf,
    pub key_type: KeyType,
    pub role: KeyRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kes_period: Option<u64>,
}

impl KeyMaterial {
    pub fn new(path: impl Into<PathBuf>, key_type: KeyType, role: KeyRole) -> Self {
        Self { path: path.into(),
               key_type,
               role,
               kes_period: None }
    }

    pub fn with_period(mut self, period: u64) -> Self {
        self.kes_period = Some(period);
        self
    }
}
