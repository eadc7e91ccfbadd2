//! Catálogo de argumentos del CLI y parámetros de una operación.
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Argumento con nombre. Cada variante corresponde a un flag del CLI; el tipo
/// de valor que admite depende de la operación (ver `ArgSpec`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arg {
    Address,
    StakeAddress,
    TxIn,
    TxOut,
    TxFile,
    TxBodyFile,
    OutFile,
    Fee,
    InvalidBefore,
    InvalidHereafter,
    CertificateFile,
    Withdrawal,
    MetadataJsonFile,
    SigningKeyFile,
    VerificationKeyFile,
    TxInCount,
    TxOutCount,
    WitnessCount,
    ProtocolParamsFile,
    StakeVerificationKeyFile,
    StakePoolId,
    ColdVerificationKeyFile,
    ColdSigningKeyFile,
    OpCertCounterFile,
    OpCertCounter,
    KesVerificationKeyFile,
    KesPeriod,
    OpCertFile,
    Epoch,
    KeyRegDepositAmt,
    PoolMetadataFile,
    OutputFormat,
    OutputJson,
    AlwaysAbstain,
    AlwaysNoConfidence,
    DrepKeyHash,
    ByronWitnessCount,
    VrfVerificationKeyFile,
    PoolPledge,
    PoolCost,
    PoolMargin,
    PoolRewardAccountVerificationKeyFile,
    PoolOwnerStakeVerificationKeyFile,
    /// Se renderiza como flag de host más `--pool-relay-port`; `flag()` sólo
    /// lo nombra en los mensajes.
    PoolRelay,
    MetadataUrl,
    MetadataHash,
    Yes,
    No,
    Abstain,
    GovernanceActionTxId,
    GovernanceActionIndex,
    VoteFile,
    ScriptFile,
    PaymentVerificationKeyFile,
}

impl Arg {
    pub fn flag(&self) -> &'static str {
        match self {
            Arg::Address | Arg::StakeAddress => "--address",
            Arg::TxIn => "--tx-in",
            Arg::TxOut => "--tx-out",
            Arg::TxFile => "--tx-file",
            Arg::TxBodyFile => "--tx-body-file",
            Arg::OutFile => "--out-file",
            Arg::Fee => "--fee",
            Arg::InvalidBefore => "--invalid-before",
            Arg::InvalidHereafter => "--invalid-hereafter",
            Arg::CertificateFile => "--certificate-file",
            Arg::Withdrawal => "--withdrawal",
            Arg::MetadataJsonFile => "--metadata-json-file",
            Arg::SigningKeyFile => "--signing-key-file",
            Arg::VerificationKeyFile => "--verification-key-file",
            Arg::TxInCount => "--tx-in-count",
            Arg::TxOutCount => "--tx-out-count",
            Arg::WitnessCount => "--witness-count",
            Arg::ProtocolParamsFile => "--protocol-params-file",
            Arg::StakeVerificationKeyFile => "--stake-verification-key-file",
            Arg::StakePoolId => "--stake-pool-id",
            Arg::ColdVerificationKeyFile => "--cold-verification-key-file",
            Arg::ColdSigningKeyFile => "--cold-signing-key-file",
            Arg::OpCertCounterFile => "--operational-certificate-issue-counter-file",
            Arg::OpCertCounter => "--operational-certificate-issue-counter",
            Arg::KesVerificationKeyFile => "--kes-verification-key-file",
            Arg::KesPeriod => "--kes-period",
            Arg::OpCertFile => "--op-cert-file",
            Arg::Epoch => "--epoch",
            Arg::KeyRegDepositAmt => "--key-reg-deposit-amt",
            Arg::PoolMetadataFile => "--pool-metadata-file",
            Arg::OutputFormat => "--output-format",
            Arg::OutputJson => "--output-json",
            Arg::AlwaysAbstain => "--always-abstain",
            Arg::AlwaysNoConfidence => "--always-no-confidence",
            Arg::DrepKeyHash => "--drep-key-hash",
            Arg::ByronWitnessCount => "--byron-witness-count",
            Arg::VrfVerificationKeyFile => "--vrf-verification-key-file",
            Arg::PoolPledge => "--pool-pledge",
            Arg::PoolCost => "--pool-cost",
            Arg::PoolMargin => "--pool-margin",
            Arg::PoolRewardAccountVerificationKeyFile => "--pool-reward-account-verification-key-file",
            Arg::PoolOwnerStakeVerificationKeyFile => "--pool-owner-stake-verification-key-file",
            Arg::PoolRelay => "--pool-relay",
            Arg::MetadataUrl => "--metadata-url",
            Arg::MetadataHash => "--metadata-hash",
            Arg::Yes => "--yes",
            Arg::No => "--no",
            Arg::Abstain => "--abstain",
            Arg::GovernanceActionTxId => "--governance-action-tx-id",
            Arg::GovernanceActionIndex => "--governance-action-index",
            Arg::VoteFile => "--vote-file",
            Arg::ScriptFile => "--script-file",
            Arg::PaymentVerificationKeyFile => "--payment-verification-key-file",
        }
    }
}

/// Tipo de valor aceptado por un argumento en una operación concreta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Text,
    /// `<64 hex>#<index>`.
    TxIn,
    /// Archivo que debe existir bajo `cwd` antes de lanzar el proceso.
    InputFile,
    /// Archivo que el CLI escribe. `exclusive`: si ya existe, se rechaza.
    OutputFile { exclusive: bool },
    UInt,
    /// Entero exacto no negativo (lovelace).
    Amount,
    Hex,
    Choice(&'static [&'static str]),
    Switch,
    /// Decimal en `[0, 1]`.
    Margin,
    /// URL de hasta 64 bytes.
    MetadataUrl,
    /// `ipv4:<addr>:<port>`, `ipv6:<addr>:<port>` o `dns:<host>:<port>`.
    Relay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Cero o más ocurrencias.
    Repeated,
    /// Una o más ocurrencias.
    AtLeastOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub arg: Arg,
    pub kind: ArgKind,
    pub presence: Presence,
}

impl ArgSpec {
    pub const fn required(arg: Arg, kind: ArgKind) -> Self {
        Self { arg, kind, presence: Presence::Required }
    }

    pub const fn optional(arg: Arg, kind: ArgKind) -> Self {
        Self { arg, kind, presence: Presence::Optional }
    }

    pub const fn repeated(arg: Arg, kind: ArgKind) -> Self {
        Self { arg, kind, presence: Presence::Repeated }
    }

    pub const fn at_least_one(arg: Arg, kind: ArgKind) -> Self {
        Self { arg, kind, presence: Presence::AtLeastOne }
    }
}

/// Parámetros de una operación: valores por argumento (en orden de inserción)
/// y switches sin valor. Se renderizan tal cual; la validación no los
/// reescribe, de modo que `decode(build(p)) == p`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<Arg, Vec<String>>,
    switches: BTreeSet<Arg>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un valor (los argumentos repetibles acumulan).
    pub fn with(mut self, arg: Arg, value: impl Into<String>) -> Self {
        self.push(arg, value);
        self
    }

    pub fn with_path(self, arg: Arg, path: impl AsRef<Path>) -> Self {
        let value = path.as_ref().to_string_lossy().into_owned();
        self.with(arg, value)
    }

    pub fn with_switch(mut self, arg: Arg) -> Self {
        self.switches.insert(arg);
        self
    }

    pub fn push(&mut self, arg: Arg, value: impl Into<String>) {
        self.values.entry(arg).or_default().push(value.into());
    }

    pub fn set_switch(&mut self, arg: Arg) {
        self.switches.insert(arg);
    }

    pub fn values(&self, arg: Arg) -> &[String] {
        self.values.get(&arg).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, arg: Arg) -> Option<&str> {
        self.values(arg).first().map(String::as_str)
    }

    pub fn has_switch(&self, arg: Arg) -> bool {
        self.switches.contains(&arg)
    }

    /// Presente como valor o como switch.
    pub fn contains(&self, arg: Arg) -> bool {
        self.values.contains_key(&arg) || self.switches.contains(&arg)
    }

    /// Todos los argumentos mencionados, sin repetir.
    pub fn args(&self) -> BTreeSet<Arg> {
        self.values.keys().chain(self.switches.iter()).copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.switches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_values_keep_insertion_order() {
        let p = Params::new().with(Arg::TxIn, "b").with(Arg::TxIn, "a").with_switch(Arg::OutputJson);
        assert_eq!(p.values(Arg::TxIn), ["b", "a"]);
        assert!(p.has_switch(Arg::OutputJson));
        assert!(p.contains(Arg::OutputJson));
        assert!(!p.contains(Arg::Fee));
        assert_eq!(p.args().len(), 2);
    }
}
