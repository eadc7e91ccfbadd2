//! Conjunto cerrado de operaciones lógicas y su descriptor estático.
//!
//! El descriptor declara ruta de subcomando (por generación de sintaxis),
//! conectividad, si admite reintento, argumentos y grupos "exactamente uno".
use ada_domain::ValueKind;

use crate::command::args::{Arg, ArgKind, ArgSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// Necesita el socket del nodo.
    Online,
    /// Sólo archivos locales.
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    QueryTip,
    QueryUtxo,
    QueryProtocolParameters,
    QueryStakeAddressInfo,
    QueryKesPeriodInfo,
    QueryPoolParams,
    QueryStakeSnapshot,
    TxBuildRaw,
    TxCalculateMinFee,
    TxSign,
    TxSubmit,
    TxId,
    AddressKeyGen,
    StakeAddressKeyGen,
    NodeKeyGen,
    NodeKeyGenKes,
    NodeKeyGenVrf,
    NodeIssueOpCert,
    StakeRegistrationCert,
    StakeDeregistrationCert,
    StakeDelegationCert,
    VoteDelegationCert,
    StakePoolId,
    StakePoolMetadataHash,
    StakePoolDeregistrationCert,
    StakePoolRegistrationCert,
    GovernanceVoteCreate,
    GovernanceVoteView,
    TxPolicyId,
    AddressKeyHash,
    TxCalculateMinRequiredUtxo,
}

#[derive(Debug)]
pub struct OperationDescriptor {
    pub name: &'static str,
    /// Subcomando bajo un grupo de era.
    pub path: &'static [&'static str],
    /// Subcomando bajo el grupo legacy; `None` si la operación no existe ahí.
    pub legacy_path: Option<&'static [&'static str]>,
    pub connectivity: Connectivity,
    pub takes_network: bool,
    /// Lectura pura: admite el reintento opt-in ante errores transitorios.
    pub idempotent: bool,
    pub args: &'static [ArgSpec],
    /// Cada grupo exige exactamente uno de sus argumentos.
    pub one_of: &'static [&'static [Arg]],
    pub output: ValueKind,
}

impl OperationDescriptor {
    pub fn spec_for(&self, arg: Arg) -> Option<&'static ArgSpec> {
        self.args.iter().find(|s| s.arg == arg)
    }

    pub fn path_for(&self, legacy: bool) -> Option<&'static [&'static str]> {
        if legacy {
            self.legacy_path
        } else {
            Some(self.path)
        }
    }
}

const IN: ArgKind = ArgKind::InputFile;
const OUT: ArgKind = ArgKind::OutputFile { exclusive: false };
const OUT_EXCL: ArgKind = ArgKind::OutputFile { exclusive: true };

use crate::command::args::ArgSpec as S;

static QUERY_TIP: OperationDescriptor = OperationDescriptor { name: "query tip",
                                                              path: &["query", "tip"],
                                                              legacy_path: Some(&["query", "tip"]),
                                                              connectivity: Connectivity::Online,
                                                              takes_network: true,
                                                              idempotent: true,
                                                              args: &[],
                                                              one_of: &[],
                                                              output: ValueKind::ChainTip };

static QUERY_UTXO: OperationDescriptor = OperationDescriptor { name: "query utxo",
                                                               path: &["query", "utxo"],
                                                               legacy_path: Some(&["query", "utxo"]),
                                                               connectivity: Connectivity::Online,
                                                               takes_network: true,
                                                               idempotent: true,
                                                               args: &[S::optional(Arg::Address, ArgKind::Text),
                                                                       S::repeated(Arg::TxIn, ArgKind::TxIn),
                                                                       S::optional(Arg::OutputJson, ArgKind::Switch)],
                                                               one_of: &[&[Arg::Address, Arg::TxIn]],
                                                               output: ValueKind::Utxos };

static QUERY_PROTOCOL_PARAMETERS: OperationDescriptor = OperationDescriptor { name: "query protocol-parameters",
                                                                              path: &["query", "protocol-parameters"],
                                                                              legacy_path: Some(&["query", "protocol-parameters"]),
                                                                              connectivity: Connectivity::Online,
                                                                              takes_network: true,
                                                                              idempotent: true,
                                                                              args: &[],
                                                                              one_of: &[],
                                                                              output: ValueKind::Json };

static QUERY_STAKE_ADDRESS_INFO: OperationDescriptor = OperationDescriptor { name: "query stake-address-info",
                                                                             path: &["query", "stake-address-info"],
                                                                             legacy_path: Some(&["query", "stake-address-info"]),
                                                                             connectivity: Connectivity::Online,
                                                                             takes_network: true,
                                                                             idempotent: true,
                                                                             args: &[S::required(Arg::StakeAddress, ArgKind::Text)],
                                                                             one_of: &[],
                                                                             output: ValueKind::StakeAddresses };

static QUERY_KES_PERIOD_INFO: OperationDescriptor = OperationDescriptor { name: "query kes-period-info",
                                                                          path: &["query", "kes-period-info"],
                                                                          legacy_path: Some(&["query", "kes-period-info"]),
                                                                          connectivity: Connectivity::Online,
                                                                          takes_network: true,
                                                                          idempotent: true,
                                                                          args: &[S::required(Arg::OpCertFile, IN)],
                                                                          one_of: &[],
                                                                          output: ValueKind::CertificateInfo };

static QUERY_POOL_PARAMS: OperationDescriptor = OperationDescriptor { name: "query pool-params",
                                                                      path: &["query", "pool-params"],
                                                                      legacy_path: Some(&["query", "pool-params"]),
                                                                      connectivity: Connectivity::Online,
                                                                      takes_network: true,
                                                                      idempotent: true,
                                                                      args: &[S::required(Arg::StakePoolId, ArgKind::Text)],
                                                                      one_of: &[],
                                                                      output: ValueKind::Json };

static QUERY_STAKE_SNAPSHOT: OperationDescriptor = OperationDescriptor { name: "query stake-snapshot",
                                                                         path: &["query", "stake-snapshot"],
                                                                         legacy_path: Some(&["query", "stake-snapshot"]),
                                                                         connectivity: Connectivity::Online,
                                                                         takes_network: true,
                                                                         idempotent: true,
                                                                         args: &[S::required(Arg::StakePoolId, ArgKind::Text)],
                                                                         one_of: &[],
                                                                         output: ValueKind::Json };

static TX_BUILD_RAW: OperationDescriptor = OperationDescriptor { name: "transaction build-raw",
                                                                 path: &["transaction", "build-raw"],
                                                                 legacy_path: Some(&["transaction", "build-raw"]),
                                                                 connectivity: Connectivity::Offline,
                                                                 takes_network: false,
                                                                 idempotent: false,
                                                                 args: &[S::at_least_one(Arg::TxIn, ArgKind::TxIn),
                                                                         S::repeated(Arg::TxOut, ArgKind::Text),
                                                                         S::optional(Arg::InvalidBefore, ArgKind::UInt),
                                                                         S::optional(Arg::InvalidHereafter, ArgKind::UInt),
                                                                         S::required(Arg::Fee, ArgKind::Amount),
                                                                         S::repeated(Arg::CertificateFile, IN),
                                                                         S::repeated(Arg::Withdrawal, ArgKind::Text),
                                                                         S::optional(Arg::MetadataJsonFile, IN),
                                                                         S::required(Arg::OutFile, OUT)],
                                                                 one_of: &[],
                                                                 output: ValueKind::Raw };

static TX_CALCULATE_MIN_FEE: OperationDescriptor = OperationDescriptor { name: "transaction calculate-min-fee",
                                                                         path: &["transaction", "calculate-min-fee"],
                                                                         legacy_path: Some(&["transaction", "calculate-min-fee"]),
                                                                         connectivity: Connectivity::Offline,
                                                                         takes_network: true,
                                                                         idempotent: true,
                                                                         args: &[S::required(Arg::TxBodyFile, IN),
                                                                                 S::required(Arg::ProtocolParamsFile, IN),
                                                                                 S::required(Arg::TxInCount, ArgKind::UInt),
                                                                                 S::required(Arg::TxOutCount, ArgKind::UInt),
                                                                                 S::required(Arg::WitnessCount, ArgKind::UInt),
                                                                                 S::optional(Arg::ByronWitnessCount, ArgKind::UInt)],
                                                                         one_of: &[],
                                                                         output: ValueKind::Fee };

static TX_CALCULATE_MIN_REQUIRED_UTXO: OperationDescriptor =
    OperationDescriptor { name: "transaction calculate-min-required-utxo",
                          path: &["transaction", "calculate-min-required-utxo"],
                          legacy_path: Some(&["transaction", "calculate-min-required-utxo"]),
                          connectivity: Connectivity::Offline,
                          takes_network: false,
                          idempotent: true,
                          args: &[S::required(Arg::ProtocolParamsFile, IN), S::required(Arg::TxOut, ArgKind::Text)],
                          one_of: &[],
                          output: ValueKind::Lovelace };

static TX_POLICY_ID: OperationDescriptor = OperationDescriptor { name: "transaction policyid",
                                                                 path: &["transaction", "policyid"],
                                                                 legacy_path: Some(&["transaction", "policyid"]),
                                                                 connectivity: Connectivity::Offline,
                                                                 takes_network: false,
                                                                 idempotent: true,
                                                                 args: &[S::required(Arg::ScriptFile, IN)],
                                                                 one_of: &[],
                                                                 output: ValueKind::Hash };

static TX_SIGN: OperationDescriptor = OperationDescriptor { name: "transaction sign",
                                                            path: &["transaction", "sign"],
                                                            legacy_path: Some(&["transaction", "sign"]),
                                                            connectivity: Connectivity::Offline,
                                                            takes_network: true,
                                                            idempotent: false,
                                                            args: &[S::required(Arg::TxBodyFile, IN),
                                                                    S::at_least_one(Arg::SigningKeyFile, IN),
                                                                    S::required(Arg::OutFile, OUT)],
                                                            one_of: &[],
                                                            output: ValueKind::Raw };

static TX_SUBMIT: OperationDescriptor = OperationDescriptor { name: "transaction submit",
                                                              path: &["transaction", "submit"],
                                                              legacy_path: Some(&["transaction", "submit"]),
                                                              connectivity: Connectivity::Online,
                                                              takes_network: true,
                                                              idempotent: false,
                                                              args: &[S::required(Arg::TxFile, IN)],
                                                              one_of: &[],
                                                              output: ValueKind::Raw };

static TX_ID: OperationDescriptor = OperationDescriptor { name: "transaction txid",
                                                          path: &["transaction", "txid"],
                                                          legacy_path: Some(&["transaction", "txid"]),
                                                          connectivity: Connectivity::Offline,
                                                          takes_network: false,
                                                          idempotent: true,
                                                          args: &[S::optional(Arg::TxFile, IN), S::optional(Arg::TxBodyFile, IN)],
                                                          one_of: &[&[Arg::TxFile, Arg::TxBodyFile]],
                                                          output: ValueKind::TxId };

static ADDRESS_KEY_GEN: OperationDescriptor = OperationDescriptor { name: "address key-gen",
                                                                    path: &["address", "key-gen"],
                                                                    legacy_path: Some(&["address", "key-gen"]),
                                                                    connectivity: Connectivity::Offline,
                                                                    takes_network: false,
                                                                    idempotent: false,
                                                                    args: &[S::required(Arg::VerificationKeyFile, OUT_EXCL),
                                                                            S::required(Arg::SigningKeyFile, OUT_EXCL)],
                                                                    one_of: &[],
                                                                    output: ValueKind::KeyMaterial };

static ADDRESS_KEY_HASH: OperationDescriptor = OperationDescriptor { name: "address key-hash",
                                                                     path: &["address", "key-hash"],
                                                                     legacy_path: Some(&["address", "key-hash"]),
                                                                     connectivity: Connectivity::Offline,
                                                                     takes_network: false,
                                                                     idempotent: true,
                                                                     args: &[S::required(Arg::PaymentVerificationKeyFile, IN)],
                                                                     one_of: &[],
                                                                     output: ValueKind::Hash };

static STAKE_ADDRESS_KEY_GEN: OperationDescriptor = OperationDescriptor { name: "stake-address key-gen",
                                                                          path: &["stake-address", "key-gen"],
                                                                          legacy_path: Some(&["stake-address", "key-gen"]),
                                                                          connectivity: Connectivity::Offline,
                                                                          takes_network: false,
                                                                          idempotent: false,
                                                                          args: &[S::required(Arg::VerificationKeyFile, OUT_EXCL),
                                                                                  S::required(Arg::SigningKeyFile, OUT_EXCL)],
                                                                          one_of: &[],
                                                                          output: ValueKind::KeyMaterial };

static NODE_KEY_GEN: OperationDescriptor = OperationDescriptor { name: "node key-gen",
                                                                 path: &["node", "key-gen"],
                                                                 legacy_path: Some(&["node", "key-gen"]),
                                                                 connectivity: Connectivity::Offline,
                                                                 takes_network: false,
                                                                 idempotent: false,
                                                                 args: &[S::required(Arg::ColdVerificationKeyFile, OUT_EXCL),
                                                                         S::required(Arg::ColdSigningKeyFile, OUT_EXCL),
                                                                         S::required(Arg::OpCertCounterFile, OUT_EXCL)],
                                                                 one_of: &[],
                                                                 output: ValueKind::KeyMaterial };

static NODE_KEY_GEN_KES: OperationDescriptor = OperationDescriptor { name: "node key-gen-KES",
                                                                     path: &["node", "key-gen-KES"],
                                                                     legacy_path: Some(&["node", "key-gen-KES"]),
                                                                     connectivity: Connectivity::Offline,
                                                                     takes_network: false,
                                                                     idempotent: false,
                                                                     args: &[S::required(Arg::VerificationKeyFile, OUT_EXCL),
                                                                             S::required(Arg::SigningKeyFile, OUT_EXCL)],
                                                                     one_of: &[],
                                                                     output: ValueKind::KeyMaterial };

static NODE_KEY_GEN_VRF: OperationDescriptor = OperationDescriptor { name: "node key-gen-VRF",
                                                                     path: &["node", "key-gen-VRF"],
                                                                     legacy_path: Some(&["node", "key-gen-VRF"]),
                                                                     connectivity: Connectivity::Offline,
                                                                     takes_network: false,
                                                                     idempotent: false,
                                                                     args: &[S::required(Arg::VerificationKeyFile, OUT_EXCL),
                                                                             S::required(Arg::SigningKeyFile, OUT_EXCL)],
                                                                     one_of: &[],
                                                                     output: ValueKind::KeyMaterial };

static NODE_ISSUE_OP_CERT: OperationDescriptor = OperationDescriptor { name: "node issue-op-cert",
                                                                       path: &["node", "issue-op-cert"],
                                                                       legacy_path: Some(&["node", "issue-op-cert"]),
                                                                       connectivity: Connectivity::Offline,
                                                                       takes_network: false,
                                                                       idempotent: false,
                                                                       args: &[S::required(Arg::KesVerificationKeyFile, IN),
                                                                               S::required(Arg::ColdSigningKeyFile, IN),
                                                                               S::required(Arg::OpCertCounter, IN),
                                                                               S::required(Arg::KesPeriod, ArgKind::UInt),
                                                                               S::required(Arg::OutFile, OUT_EXCL)],
                                                                       one_of: &[],
                                                                       output: ValueKind::Raw };

static STAKE_REGISTRATION_CERT: OperationDescriptor = OperationDescriptor { name: "stake-address registration-certificate",
                                                                            path: &["stake-address", "registration-certificate"],
                                                                            legacy_path: Some(&["stake-address", "registration-certificate"]),
                                                                            connectivity: Connectivity::Offline,
                                                                            takes_network: false,
                                                                            idempotent: false,
                                                                            args: &[S::required(Arg::StakeVerificationKeyFile, IN),
                                                                                    S::optional(Arg::KeyRegDepositAmt, ArgKind::Amount),
                                                                                    S::required(Arg::OutFile, OUT)],
                                                                            one_of: &[],
                                                                            output: ValueKind::Raw };

static STAKE_DEREGISTRATION_CERT: OperationDescriptor = OperationDescriptor { name: "stake-address deregistration-certificate",
                                                                              path: &["stake-address", "deregistration-certificate"],
                                                                              legacy_path: Some(&["stake-address", "deregistration-certificate"]),
                                                                              connectivity: Connectivity::Offline,
                                                                              takes_network: false,
                                                                              idempotent: false,
                                                                              args: &[S::required(Arg::StakeVerificationKeyFile, IN),
                                                                                      S::optional(Arg::KeyRegDepositAmt, ArgKind::Amount),
                                                                                      S::required(Arg::OutFile, OUT)],
                                                                              one_of: &[],
                                                                              output: ValueKind::Raw };

// Bajo legacy el subcomando conserva el nombre antiguo.
static STAKE_DELEGATION_CERT: OperationDescriptor = OperationDescriptor { name: "stake-address stake-delegation-certificate",
                                                                          path: &["stake-address", "stake-delegation-certificate"],
                                                                          legacy_path: Some(&["stake-address", "delegation-certificate"]),
                                                                          connectivity: Connectivity::Offline,
                                                                          takes_network: false,
                                                                          idempotent: false,
                                                                          args: &[S::required(Arg::StakeVerificationKeyFile, IN),
                                                                                  S::optional(Arg::ColdVerificationKeyFile, IN),
                                                                                  S::optional(Arg::StakePoolId, ArgKind::Text),
                                                                                  S::required(Arg::OutFile, OUT)],
                                                                          one_of: &[&[Arg::ColdVerificationKeyFile, Arg::StakePoolId]],
                                                                          output: ValueKind::Raw };

static VOTE_DELEGATION_CERT: OperationDescriptor = OperationDescriptor { name: "stake-address vote-delegation-certificate",
                                                                         path: &["stake-address", "vote-delegation-certificate"],
                                                                         legacy_path: None,
                                                                         connectivity: Connectivity::Offline,
                                                                         takes_network: false,
                                                                         idempotent: false,
                                                                         args: &[S::required(Arg::StakeVerificationKeyFile, IN),
                                                                                 S::optional(Arg::AlwaysAbstain, ArgKind::Switch),
                                                                                 S::optional(Arg::AlwaysNoConfidence, ArgKind::Switch),
                                                                                 S::optional(Arg::DrepKeyHash, ArgKind::Hex),
                                                                                 S::required(Arg::OutFile, OUT)],
                                                                         one_of: &[&[Arg::AlwaysAbstain, Arg::AlwaysNoConfidence, Arg::DrepKeyHash]],
                                                                         output: ValueKind::Raw };

static STAKE_POOL_ID: OperationDescriptor = OperationDescriptor { name: "stake-pool id",
                                                                  path: &["stake-pool", "id"],
                                                                  legacy_path: Some(&["stake-pool", "id"]),
                                                                  connectivity: Connectivity::Offline,
                                                                  takes_network: false,
                                                                  idempotent: true,
                                                                  args: &[S::required(Arg::ColdVerificationKeyFile, IN),
                                                                          S::optional(Arg::OutputFormat, ArgKind::Choice(&["hex", "bech32"]))],
                                                                  one_of: &[],
                                                                  output: ValueKind::Raw };

static STAKE_POOL_METADATA_HASH: OperationDescriptor = OperationDescriptor { name: "stake-pool metadata-hash",
                                                                             path: &["stake-pool", "metadata-hash"],
                                                                             legacy_path: Some(&["stake-pool", "metadata-hash"]),
                                                                             connectivity: Connectivity::Offline,
                                                                             takes_network: false,
                                                                             idempotent: true,
                                                                             args: &[S::required(Arg::PoolMetadataFile, IN)],
                                                                             one_of: &[],
                                                                             output: ValueKind::Raw };

static STAKE_POOL_DEREGISTRATION_CERT: OperationDescriptor = OperationDescriptor { name: "stake-pool deregistration-certificate",
                                                                                   path: &["stake-pool", "deregistration-certificate"],
                                                                                   legacy_path: Some(&["stake-pool", "deregistration-certificate"]),
                                                                                   connectivity: Connectivity::Offline,
                                                                                   takes_network: false,
                                                                                   idempotent: false,
                                                                                   args: &[S::required(Arg::ColdVerificationKeyFile, IN),
                                                                                           S::required(Arg::Epoch, ArgKind::UInt),
                                                                                           S::required(Arg::OutFile, OUT)],
                                                                                   one_of: &[],
                                                                                   output: ValueKind::Raw };

// Dueños y relays se repiten; cada relay se expande a host + puerto.
static STAKE_POOL_REGISTRATION_CERT: OperationDescriptor =
    OperationDescriptor { name: "stake-pool registration-certificate",
                          path: &["stake-pool", "registration-certificate"],
                          legacy_path: Some(&["stake-pool", "registration-certificate"]),
                          connectivity: Connectivity::Offline,
                          takes_network: true,
                          idempotent: false,
                          args: &[S::required(Arg::ColdVerificationKeyFile, IN),
                                  S::required(Arg::VrfVerificationKeyFile, IN),
                                  S::required(Arg::PoolPledge, ArgKind::Amount),
                                  S::required(Arg::PoolCost, ArgKind::Amount),
                                  S::required(Arg::PoolMargin, ArgKind::Margin),
                                  S::required(Arg::PoolRewardAccountVerificationKeyFile, IN),
                                  S::at_least_one(Arg::PoolOwnerStakeVerificationKeyFile, IN),
                                  S::at_least_one(Arg::PoolRelay, ArgKind::Relay),
                                  S::optional(Arg::MetadataUrl, ArgKind::MetadataUrl),
                                  S::optional(Arg::MetadataHash, ArgKind::Hex),
                                  S::required(Arg::OutFile, OUT)],
                          one_of: &[],
                          output: ValueKind::Raw };

static GOVERNANCE_VOTE_CREATE: OperationDescriptor = OperationDescriptor { name: "governance vote create",
                                                                           path: &["governance", "vote", "create"],
                                                                           legacy_path: None,
                                                                           connectivity: Connectivity::Offline,
                                                                           takes_network: false,
                                                                           idempotent: false,
                                                                           args: &[S::optional(Arg::Yes, ArgKind::Switch),
                                                                                   S::optional(Arg::No, ArgKind::Switch),
                                                                                   S::optional(Arg::Abstain, ArgKind::Switch),
                                                                                   S::required(Arg::GovernanceActionTxId, ArgKind::Hex),
                                                                                   S::required(Arg::GovernanceActionIndex, ArgKind::UInt),
                                                                                   S::required(Arg::ColdVerificationKeyFile, IN),
                                                                                   S::required(Arg::OutFile, OUT)],
                                                                           one_of: &[&[Arg::Yes, Arg::No, Arg::Abstain]],
                                                                           output: ValueKind::Raw };

static GOVERNANCE_VOTE_VIEW: OperationDescriptor = OperationDescriptor { name: "governance vote view",
                                                                         path: &["governance", "vote", "view"],
                                                                         legacy_path: None,
                                                                         connectivity: Connectivity::Offline,
                                                                         takes_network: false,
                                                                         idempotent: true,
                                                                         args: &[S::optional(Arg::OutputJson, ArgKind::Switch),
                                                                                 S::required(Arg::VoteFile, IN)],
                                                                         one_of: &[],
                                                                         output: ValueKind::Json };

impl Operation {
    pub const ALL: [Operation; 31] = [Operation::QueryTip,
                                      Operation::QueryUtxo,
                                      Operation::QueryProtocolParameters,
                                      Operation::QueryStakeAddressInfo,
                                      Operation::QueryKesPeriodInfo,
                                      Operation::QueryPoolParams,
                                      Operation::QueryStakeSnapshot,
                                      Operation::TxBuildRaw,
                                      Operation::TxCalculateMinFee,
                                      Operation::TxSign,
                                      Operation::TxSubmit,
                                      Operation::TxId,
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
                                      Operation::StakePoolId,
                                      Operation::StakePoolMetadataHash,
                                      Operation::StakePoolDeregistrationCert,
                                      Operation::StakePoolRegistrationCert,
                                      Operation::GovernanceVoteCreate,
                                      Operation::GovernanceVoteView,
                                      Operation::TxPolicyId,
                                      Operation::AddressKeyHash,
                                      Operation::TxCalculateMinRequiredUtxo];

    pub fn descriptor(&self) -> &'static OperationDescriptor {
        match self {
            Operation::QueryTip => &QUERY_TIP,
            Operation::QueryUtxo => &QUERY_UTXO,
            Operation::QueryProtocolParameters => &QUERY_PROTOCOL_PARAMETERS,
            Operation::QueryStakeAddressInfo => &QUERY_STAKE_ADDRESS_INFO,
            Operation::QueryKesPeriodInfo => &QUERY_KES_PERIOD_INFO,
            Operation::QueryPoolParams => &QUERY_POOL_PARAMS,
            Operation::QueryStakeSnapshot => &QUERY_STAKE_SNAPSHOT,
            Operation::TxBuildRaw => &TX_BUILD_RAW,
            Operation::TxCalculateMinFee => &TX_CALCULATE_MIN_FEE,
            Operation::TxSign => &TX_SIGN,
            Operation::TxSubmit => &TX_SUBMIT,
            Operation::TxId => &TX_ID,
            Operation::AddressKeyGen => &ADDRESS_KEY_GEN,
            Operation::StakeAddressKeyGen => &STAKE_ADDRESS_KEY_GEN,
            Operation::NodeKeyGen => &NODE_KEY_GEN,
            Operation::NodeKeyGenKes => &NODE_KEY_GEN_KES,
            Operation::NodeKeyGenVrf => &NODE_KEY_GEN_VRF,
            Operation::NodeIssueOpCert => &NODE_ISSUE_OP_CERT,
            Operation::StakeRegistrationCert => &STAKE_REGISTRATION_CERT,
            Operation::StakeDeregistrationCert => &STAKE_DEREGISTRATION_CERT,
            Operation::StakeDelegationCert => &STAKE_DELEGATION_CERT,
            Operation::VoteDelegationCert => &VOTE_DELEGATION_CERT,
            Operation::StakePoolId => &STAKE_POOL_ID,
            Operation::StakePoolMetadataHash => &STAKE_POOL_METADATA_HASH,
            Operation::StakePoolDeregistrationCert => &STAKE_POOL_DEREGISTRATION_CERT,
            Operation::StakePoolRegistrationCert => &STAKE_POOL_REGISTRATION_CERT,
            Operation::GovernanceVoteCreate => &GOVERNANCE_VOTE_CREATE,
            Operation::GovernanceVoteView => &GOVERNANCE_VOTE_VIEW,
            Operation::TxPolicyId => &TX_POLICY_ID,
            Operation::AddressKeyHash => &ADDRESS_KEY_HASH,
            Operation::TxCalculateMinRequiredUtxo => &TX_CALCULATE_MIN_REQUIRED_UTXO,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn connectivity(&self) -> Connectivity {
        self.descriptor().connectivity
    }

    pub fn is_idempotent(&self) -> bool {
        self.descriptor().idempotent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn flags_are_unique_within_each_operation() {
        for op in Operation::ALL {
            let mut seen = HashSet::new();
            for s in op.descriptor().args {
                assert!(seen.insert(s.arg.flag()), "flag duplicado {} en {}", s.arg.flag(), op.name());
            }
        }
    }

    #[test]
    fn one_of_members_are_declared_args() {
        for op in Operation::ALL {
            let d = op.descriptor();
            for group in d.one_of {
                for a in *group {
                    assert!(d.spec_for(*a).is_some(), "{a:?} no declarado en {}", d.name);
                }
            }
        }
    }

    #[test]
    fn only_pure_reads_are_idempotent_online() {
        assert!(Operation::QueryTip.is_idempotent());
        assert!(!Operation::TxSubmit.is_idempotent());
        assert!(!Operation::NodeIssueOpCert.is_idempotent());
        assert_eq!(Operation::NodeKeyGenKes.connectivity(), Connectivity::Offline);
        assert_eq!(Operation::QueryUtxo.connectivity(), Connectivity::Online);
    }

    #[test]
    fn delegation_path_differs_between_generations() {
        let d = Operation::StakeDelegationCert.descriptor();
        assert_eq!(d.path_for(false), Some(&["stake-address", "stake-delegation-certificate"][..]));
        assert_eq!(d.path_for(true), Some(&["stake-address", "delegation-certificate"][..]));
        assert_eq!(Operation::VoteDelegationCert.descriptor().path_for(true), None);
    }

    #[test]
    fn governance_votes_exist_only_under_era_groups() {
        for op in [Operation::GovernanceVoteCreate, Operation::GovernanceVoteView] {
            assert_eq!(op.descriptor().path_for(true), None, "{}", op.name());
            assert_eq!(op.descriptor().path_for(false).map(|p| p.len()), Some(3));
        }
    }

    #[test]
    fn every_operation_is_listed_once() {
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
        assert!(names.contains("stake-pool registration-certificate"));
        assert!(names.contains("transaction calculate-min-required-utxo"));
    }
}
