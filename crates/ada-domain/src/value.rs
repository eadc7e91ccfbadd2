//! Unión etiquetada de los valores que devuelve el parser de salida.
use serde::Serialize;
use serde_json::Value;

use crate::{Balance, CertificateInfo, ChainTip, KeyMaterial, Quantity, StakeAddressInfo, UtxoSet};

/// Forma de valor que una operación declara producir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    ChainTip,
    Balance,
    Utxos,
    KeyMaterial,
    CertificateInfo,
    Fee,
    /// Monto en lovelace que no es una comisión (p.ej. UTxO mínima).
    Lovelace,
    TxId,
    /// Hash de 28 bytes en hex (policy id, hash de llave).
    Hash,
    StakeAddresses,
    Json,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParsedValue {
    ChainTip(ChainTip),
    Balance(Balance),
    Utxos(UtxoSet),
    KeyMaterial(Vec<KeyMaterial>),
    CertificateInfo(CertificateInfo),
    Fee(Quantity),
    Lovelace(Quantity),
    TxId(String),
    Hash(String),
    StakeAddresses(Vec<StakeAddressInfo>),
    /// JSON válido sin forma tipada (p.ej. protocol parameters).
    Json(Value),
    /// Texto opaco cuando no aplica ninguna forma estructurada.
    Raw(String),
}

impl ParsedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ParsedValue::ChainTip(_) => ValueKind::ChainTip,
            ParsedValue::Balance(_) => ValueKind::Balance,
            ParsedValue::Utxos(_) => ValueKind::Utxos,
            ParsedValue::KeyMaterial(_) => ValueKind::KeyMaterial,
            ParsedValue::CertificateInfo(_) => ValueKind::CertificateInfo,
            ParsedValue::Fee(_) => ValueKind::Fee,
            ParsedValue::Lovelace(_) => ValueKind::Lovelace,
            ParsedValue::TxId(_) => ValueKind::TxId,
            ParsedValue::Hash(_) => ValueKind::Hash,
            ParsedValue::StakeAddresses(_) => ValueKind::StakeAddresses,
            ParsedValue::Json(_) => ValueKind::Json,
            ParsedValue::Raw(_) => ValueKind::Raw,
        }
    }

    pub fn as_chain_tip(&self) -> Option<&ChainTip> {
        match self {
            ParsedValue::ChainTip(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_utxos(&self) -> Option<&UtxoSet> {
        match self {
            ParsedValue::Utxos(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_certificate(&self) -> Option<&CertificateInfo> {
        match self {
            ParsedValue::CertificateInfo(c) => Some(c),
            _ => None,
        }
    }

    /// Representación JSON estable; los montos se emiten como enteros exactos.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| Value::String(format!("unserializable value: {e}")))
    }
}
