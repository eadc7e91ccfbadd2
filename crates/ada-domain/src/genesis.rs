//! Parámetros del génesis Shelley usados para calcular el periodo KES.
use std::path::Path;

use serde::Deserialize;

use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelleyGenesis {
    #[serde(rename = "slotsPerKESPeriod")]
    pub slots_per_kes_period: u64,
    #[serde(rename = "maxKESEvolutions")]
    pub max_kes_evolutions: u64,
    #[serde(default)]
    pub epoch_length: Option<u64>,
    #[serde(default)]
    pub network_magic: Option<u64>,
    /// Segundos por slot; puede ser fraccionario.
    #[serde(default)]
    pub slot_length: Option<serde_json::Number>,
}

impl ShelleyGenesis {
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let g: ShelleyGenesis = serde_json::from_str(raw).map_err(|e| DomainError::InvalidGenesis(e.to_string()))?;
        if g.slots_per_kes_period == 0 {
            return Err(DomainError::ZeroSlotsPerPeriod);
        }
        Ok(g)
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path).map_err(|e| DomainError::InvalidGenesis(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    pub fn kes_period_at(&self, slot: u64) -> Result<u64, DomainError> {
        current_kes_period(slot, self.slots_per_kes_period)
    }
}

/// Periodo KES vigente en `slot`: `slot / slots_per_kes_period` (división entera).
pub fn current_kes_period(slot: u64, slots_per_kes_period: u64) -> Result<u64, DomainError> {
    if slots_per_kes_period == 0 {
        return Err(DomainError::ZeroSlotsPerPeriod);
    }
    Ok(slot / slots_per_kes_period)
}
