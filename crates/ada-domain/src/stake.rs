use serde::Serialize;

use crate::Quantity;

/// Una entrada de `query stake-address-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StakeAddressInfo {
    pub address: String,
    pub reward_balance: Quantity,
    /// Pool delegado (`delegation` o `stakeDelegation` según versión del CLI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_delegation: Option<String>,
}

