use serde::Serialize;

/// Punta de la cadena según `query tip`.
///
/// `slot`, `block` y `epoch` son obligatorios; el resto depende de la versión
/// del CLI y puede faltar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainTip {
    pub slot: u64,
    pub block: u64,
    pub epoch: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Se conserva como texto ("100.00"): es informativo y no se usa en cálculos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_progress: Option<String>,
}

impl ChainTip {
    pub fn new(slot: u64, block: u64, epoch: u64) -> Self {
        Self { slot,
               block,
               epoch,
               era: None,
               hash: None,
               sync_progress: None }
    }

    pub fn is_synced(&self) -> bool {
        self.sync_progress.as_deref().map(|p| p == "100.00").unwrap_or(false)
    }
}
