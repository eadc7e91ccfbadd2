//! Tabla extensible de formas de salida conocidas por operación, era y
//! generación de sintaxis.
//!
//! Las reglas agregadas con `push` tienen prioridad sobre las existentes; las
//! formas se prueban en el orden en que aparecen.
use crate::command::Operation;
use crate::config::Era;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Todo stdout es un documento JSON.
    StrictJson,
    /// JSON rodeado de líneas de banner (p.ej. `✓ The operational certificate ...`).
    BannerJson,
    /// Líneas `clave: valor` o `clave = valor`.
    KeyValueLines,
    /// Tabla de UTxO en texto (`TxHash  TxIx  Amount`).
    UtxoTable,
    /// Entero al inicio (`171397 Lovelace`).
    LeadingInteger,
    /// Etiqueta y entero (`Coin 978370`, `Lovelace 978370`).
    TrailingInteger,
    /// Un único token sin espacios (hashes, ids).
    SingleToken,
    /// Texto libre; siempre decodifica.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeRule {
    pub operation: Operation,
    /// `None`: cualquier era.
    pub era: Option<Era>,
    /// `None`: ambas generaciones; `Some(true)`: sólo legacy.
    pub legacy: Option<bool>,
    pub shapes: Vec<Shape>,
}

impl ShapeRule {
    pub fn new(operation: Operation, shapes: &[Shape]) -> Self {
        Self { operation,
               era: None,
               legacy: None,
               shapes: shapes.to_vec() }
    }

    pub fn for_era(mut self, era: Era) -> Self {
        self.era = Some(era);
        self
    }

    pub fn for_legacy(mut self, legacy: bool) -> Self {
        self.legacy = Some(legacy);
        self
    }

    fn applies(&self, operation: Operation, era: Era, legacy: bool) -> bool {
        self.operation == operation && self.era.map_or(true, |e| e == era) && self.legacy.map_or(true, |l| l == legacy)
    }
}

#[derive(Debug, Clone)]
pub struct ShapeTable {
    rules: Vec<ShapeRule>,
}

impl ShapeTable {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: ShapeRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Formas a probar, de la regla más reciente a la más antigua, sin repetir.
    pub fn shapes_for(&self, operation: Operation, era: Era, legacy: bool) -> Vec<Shape> {
        let mut out: Vec<Shape> = Vec::new();
        for rule in self.rules.iter().rev().filter(|r| r.applies(operation, era, legacy)) {
            for s in &rule.shapes {
                if !out.contains(s) {
                    out.push(*s);
                }
            }
        }
        out
    }
}

impl Default for ShapeTable {
    fn default() -> Self {
        use Shape::*;
        let mut t = ShapeTable::empty();
        t.push(ShapeRule::new(Operation::QueryTip, &[StrictJson, BannerJson, KeyValueLines]));
        t.push(ShapeRule::new(Operation::QueryUtxo, &[StrictJson, UtxoTable]));
        // legacy sin --output-json imprime la tabla
        t.push(ShapeRule::new(Operation::QueryUtxo, &[UtxoTable, StrictJson]).for_legacy(true));
        for op in [Operation::QueryProtocolParameters,
                   Operation::QueryPoolParams,
                   Operation::QueryStakeSnapshot,
                   Operation::QueryStakeAddressInfo]
        {
            t.push(ShapeRule::new(op, &[StrictJson, BannerJson]));
        }
        t.push(ShapeRule::new(Operation::QueryKesPeriodInfo, &[StrictJson, BannerJson, KeyValueLines]));
        t.push(ShapeRule::new(Operation::TxCalculateMinFee, &[LeadingInteger, StrictJson]));
        t.push(ShapeRule::new(Operation::TxCalculateMinRequiredUtxo, &[LeadingInteger, TrailingInteger]));
        t.push(ShapeRule::new(Operation::TxId, &[SingleToken, StrictJson]));
        t.push(ShapeRule::new(Operation::TxPolicyId, &[SingleToken]));
        t.push(ShapeRule::new(Operation::AddressKeyHash, &[SingleToken]));
        t.push(ShapeRule::new(Operation::GovernanceVoteView, &[StrictJson, BannerJson]));
        t.push(ShapeRule::new(Operation::StakePoolId, &[SingleToken]));
        t.push(ShapeRule::new(Operation::StakePoolMetadataHash, &[SingleToken]));
        for op in [Operation::TxBuildRaw,
                   Operation::TxSign,
                   Operation::TxSubmit,
                   Operation::AddressKeyGen,
                   Operation::StakeAddressKeyGen,
                   Operation::NodeKeyGen,
                   Operation::NodeKeyGenKes,
                   Operation::NodeKeyGenVrf,
                   Operation::NodeIssueOpCert,
                   Operation::StakeRegistrationCert,
                   Operation::StakeDeregistrationCert,
                   Operation::StakeDelegationCert,
                   Operation::VoteDelegationCert,
                   Operation::StakePoolDeregistrationCert,
                   Operation::StakePoolRegistrationCert,
                   Operation::GovernanceVoteCreate]
        {
            t.push(ShapeRule::new(op, &[Text]));
        }
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_has_shapes() {
        let t = ShapeTable::default();
        for op in Operation::ALL {
            assert!(!t.shapes_for(op, Era::Conway, false).is_empty(), "{} sin formas", op.name());
        }
    }

    #[test]
    fn specific_rules_take_precedence() {
        let t = ShapeTable::default();
        assert_eq!(t.shapes_for(Operation::QueryUtxo, Era::Conway, false), vec![Shape::StrictJson, Shape::UtxoTable]);
        assert_eq!(t.shapes_for(Operation::QueryUtxo, Era::Babbage, true), vec![Shape::UtxoTable, Shape::StrictJson]);
    }

    #[test]
    fn pushed_rules_extend_the_table() {
        let mut t = ShapeTable::default();
        t.push(ShapeRule::new(Operation::TxSubmit, &[Shape::KeyValueLines]).for_era(Era::Conway));
        assert_eq!(t.shapes_for(Operation::TxSubmit, Era::Conway, false), vec![Shape::KeyValueLines, Shape::Text]);
        assert_eq!(t.shapes_for(Operation::TxSubmit, Era::Babbage, false), vec![Shape::Text]);
    }
}
