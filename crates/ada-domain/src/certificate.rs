use serde::Serialize;

/// Campos de un certificado operacional relevantes para verificar una
/// rotación KES. `validity` sólo está presente cuando la información viene
/// del nodo (`query kes-period-info`); `notes` guarda las líneas de banner
/// que el CLI imprime alrededor del JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    pub issue_counter: u64,
    pub kes_period: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity: Option<KesValidity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_state_counter: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KesValidity {
    pub current_kes_period: u64,
    pub end_kes_period: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

impl CertificateInfo {
    pub fn new(issue_counter: u64, kes_period: u64) -> Self {
        Self { issue_counter,
               kes_period,
               validity: None,
               node_state_counter: None,
               notes: Vec::new() }
    }

    /// El periodo actual está dentro de `[kes_period, end_kes_period)`.
    pub fn is_valid_now(&self) -> Option<bool> {
        self.validity.as_ref()
            .map(|v| v.current_kes_period >= self.kes_period && v.current_kes_period < v.end_kes_period)
    }
}
