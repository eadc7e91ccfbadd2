//! Saldos y conjuntos de UTxO.
//!
//! `Balance` agrega lovelace y tokens nativos (policy → asset → cantidad);
//! `UtxoSet` conserva el orden por `TxIn` para que las selecciones sean
//! deterministas.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{DomainError, Quantity};

static TX_IN_RE: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{64}#[0-9]+$"));

/// Referencia a una salida de transacción: `<tx hash>#<index>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct TxIn {
    pub tx_hash: String,
    pub index: u32,
}

impl TxIn {
    pub fn is_valid(raw: &str) -> bool {
        match TX_IN_RE.as_ref() {
            Ok(re) => re.is_match(raw),
            Err(_) => false,
        }
    }
}

impl FromStr for TxIn {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if !TxIn::is_valid(raw) {
            return Err(DomainError::InvalidTxIn(raw.to_string()));
        }
        let (hash, idx) = raw.split_once('#').ok_or_else(|| DomainError::InvalidTxIn(raw.to_string()))?;
        let index = idx.parse::<u32>().map_err(|_| DomainError::InvalidTxIn(raw.to_string()))?;
        Ok(TxIn { tx_hash: hash.to_lowercase(),
                  index })
    }
}

impl fmt::Display for TxIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.tx_hash, self.index)
    }
}

impl From<TxIn> for String {
    fn from(t: TxIn) -> String {
        t.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub lovelace: Quantity,
    pub assets: BTreeMap<String, BTreeMap<String, Quantity>>,
}

impl Balance {
    pub fn lovelace(amount: Quantity) -> Self {
        Self { lovelace: amount,
               assets: BTreeMap::new() }
    }

    pub fn add_asset(&mut self, policy: &str, asset: &str, amount: Quantity) {
        let slot = self.assets
                       .entry(policy.to_string())
                       .or_default()
                       .entry(asset.to_string())
                       .or_default();
        *slot = &*slot + &amount;
    }

    /// Suma otro saldo sobre éste (lovelace y cada token por policy/asset).
    pub fn merge(&mut self, other: &Balance) {
        self.lovelace = &self.lovelace + &other.lovelace;
        for (policy, assets) in &other.assets {
            for (asset, amount) in assets {
                self.add_asset(policy, asset, amount.clone());
            }
        }
    }

    pub fn asset(&self, policy: &str, asset: &str) -> Option<&Quantity> {
        self.assets.get(policy).and_then(|m| m.get(asset))
    }
}

/// Conjunto de UTxO de una dirección (o de un `--tx-in` concreto).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UtxoSet {
    pub entries: BTreeMap<TxIn, Balance>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tx_in: TxIn, balance: Balance) {
        self.entries.insert(tx_in, balance);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Saldo combinado de todas las entradas.
    pub fn total(&self) -> Balance {
        let mut acc = Balance::default();
        for b in self.entries.values() {
            acc.merge(b);
        }
        acc
    }

    /// Entradas cuyo tx-in empieza por `prefix` (hash sin índice o tx-in completo).
    pub fn filter_prefix(&self, prefix: &str) -> UtxoSet {
        let entries = self.entries
                          .iter()
                          .filter(|(k, _)| k.to_string().starts_with(&prefix.to_lowercase()))
                          .map(|(k, v)| (k.clone(), v.clone()))
                          .collect();
        UtxoSet { entries }
    }

    /// Primera entrada (orden por tx-in) con al menos `amount` lovelace.
    pub fn first_with_at_least(&self, amount: &Quantity) -> Option<(&TxIn, &Balance)> {
        self.entries.iter().find(|(_, b)| b.lovelace >= *amount)
    }
}

/// Cambio a devolver: `inputs - outputs - fee`. Un cambio negativo es error.
pub fn change(inputs: &Quantity, outputs: &Quantity, fee: &Quantity) -> Result<Quantity, DomainError> {
    let result = inputs.clone() - outputs.clone() - fee.clone();
    if result.is_negative() {
        return Err(DomainError::NegativeChange { inputs: inputs.to_string(),
                                                 outputs: outputs.to_string(),
                                                 fee: fee.to_string() });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "7c0a9b2e4f1d3c5a6b8e9f0a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e";

    fn txin(i: u32) -> TxIn {
        format!("{HASH}#{i}").parse().unwrap()
    }

    #[test]
    fn tx_in_requires_hash_and_index() {
        assert!(TxIn::is_valid(&format!("{HASH}#0")));
        assert!(!TxIn::is_valid(&format!("{HASH}")));
        assert!(!TxIn::is_valid(&format!("{}#1", &HASH[..63])));
        assert!("zz#1".parse::<TxIn>().is_err());
        assert_eq!(txin(3).to_string(), format!("{HASH}#3"));
    }

    #[test]
    fn merge_adds_lovelace_and_assets() {
        let mut a = Balance::lovelace(Quantity::from(5u64));
        a.add_asset("p1", "tok", Quantity::from(2u64));
        let mut b = Balance::lovelace(Quantity::from(7u64));
        b.add_asset("p1", "tok", Quantity::from(3u64));
        b.add_asset("p2", "other", Quantity::from(1u64));
        a.merge(&b);
        assert_eq!(a.lovelace, Quantity::from(12u64));
        assert_eq!(a.asset("p1", "tok"), Some(&Quantity::from(5u64)));
        assert_eq!(a.asset("p2", "other"), Some(&Quantity::from(1u64)));
    }

    #[test]
    fn utxo_selection_and_total() {
        let mut set = UtxoSet::new();
        set.insert(txin(0), Balance::lovelace(Quantity::from(1_000_000u64)));
        set.insert(txin(1), Balance::lovelace(Quantity::from(9_000_000u64)));
        assert_eq!(set.total().lovelace, Quantity::from(10_000_000u64));
        let (picked, _) = set.first_with_at_least(&Quantity::from(2_000_000u64)).unwrap();
        assert_eq!(picked.index, 1);
        assert!(set.first_with_at_least(&Quantity::from(20_000_000u64)).is_none());
        assert_eq!(set.filter_prefix(HASH).len(), 2);
        assert_eq!(set.filter_prefix(&format!("{HASH}#1")).len(), 1);
    }

    #[test]
    fn change_never_goes_negative() {
        let c = change(&Quantity::from(10u64), &Quantity::from(7u64), &Quantity::from(2u64)).unwrap();
        assert_eq!(c, Quantity::from(1u64));
        let err = change(&Quantity::from(10u64), &Quantity::from(9u64), &Quantity::from(2u64)).unwrap_err();
        assert!(matches!(err, DomainError::NegativeChange { .. }));
    }
}
