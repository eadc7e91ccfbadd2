//! Certificados de stake, registro y retiro de pool, y votos de gobernanza.
use std::path::{Path, PathBuf};

use ada_domain::{check_metadata_url, ParsedValue, PoolRelay, Quantity, TxIn, ValueKind};
use serde_json::Value;

use crate::client::{unexpected, CardanoCli};
use crate::command::{Arg, Operation, Params};
use crate::errors::{AdaError, AdaResult};
use crate::exec::CommandRunner;

#[derive(Debug, Clone)]
pub enum DelegationTarget {
    ColdKey(PathBuf),
    PoolId(String),
}

/// Destino de la delegación de voto (sólo eras con gobernanza).
#[derive(Debug, Clone)]
pub enum VoteTarget {
    AlwaysAbstain,
    AlwaysNoConfidence,
    DrepKeyHash(String),
}

/// URL y hash (blake2b-256) del JSON de metadata publicado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolMetadataRef {
    pub url: String,
    pub hash: String,
}

/// Entradas de `stake-pool registration-certificate`. Todos los relays
/// comparten puerto cuando se construyen con `relays_on_port`.
#[derive(Debug, Clone)]
pub struct PoolRegistration {
    pub cold_vkey: PathBuf,
    pub vrf_vkey: PathBuf,
    pub pledge: Quantity,
    pub cost: Quantity,
    /// Decimal en `[0, 1]`, tal como lo recibe el CLI.
    pub margin: String,
    pub reward_stake_vkey: PathBuf,
    pub owner_stake_vkeys: Vec<PathBuf>,
    pub relays: Vec<PoolRelay>,
    pub metadata: Option<PoolMetadataRef>,
}

impl PoolRegistration {
    fn params(&self) -> AdaResult<Params> {
        let op = Operation::StakePoolRegistrationCert.name();
        if self.owner_stake_vkeys.is_empty() {
            return Err(AdaError::invalid(op, "at least one owner stake verification key is required"));
        }
        if self.relays.is_empty() {
            return Err(AdaError::invalid(op, "at least one ipv4 or dns relay is required"));
        }
        let mut p = Params::new().with_path(Arg::ColdVerificationKeyFile, &self.cold_vkey)
                                 .with_path(Arg::VrfVerificationKeyFile, &self.vrf_vkey)
                                 .with(Arg::PoolPledge, self.pledge.to_string())
                                 .with(Arg::PoolCost, self.cost.to_string())
                                 .with(Arg::PoolMargin, self.margin.as_str())
                                 .with_path(Arg::PoolRewardAccountVerificationKeyFile, &self.reward_stake_vkey);
        for owner in &self.owner_stake_vkeys {
            p.push(Arg::PoolOwnerStakeVerificationKeyFile, owner.display().to_string());
        }
        for relay in &self.relays {
            p.push(Arg::PoolRelay, relay.to_string());
        }
        if let Some(meta) = &self.metadata {
            check_metadata_url(&meta.url).map_err(|e| AdaError::invalid(op, e.to_string()))?;
            let hash_ok = meta.hash.len() == 64 && meta.hash.bytes().all(|b| b.is_ascii_hexdigit());
            if !hash_ok {
                return Err(AdaError::invalid(op, format!("metadata hash '{}' is not 32 bytes of hex", meta.hash)));
            }
            p.push(Arg::MetadataUrl, meta.url.as_str());
            p.push(Arg::MetadataHash, meta.hash.as_str());
        }
        Ok(p)
    }
}

/// Relays IPv4 y DNS en un mismo puerto.
pub fn relays_on_port(ipv4: &[&str], dns: &[&str], port: u16) -> AdaResult<Vec<PoolRelay>> {
    let op = Operation::StakePoolRegistrationCert.name();
    let v4 = ipv4.iter().map(|h| format!("ipv4:{h}:{port}"));
    let names = dns.iter().map(|h| format!("dns:{h}:{port}"));
    v4.chain(names)
      .map(|raw| raw.parse::<PoolRelay>().map_err(|e| AdaError::invalid(op, e.to_string())))
      .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDecision {
    Yes,
    No,
    Abstain,
}

impl VoteDecision {
    fn arg(&self) -> Arg {
        match self {
            VoteDecision::Yes => Arg::Yes,
            VoteDecision::No => Arg::No,
            VoteDecision::Abstain => Arg::Abstain,
        }
    }
}

impl<R: CommandRunner> CardanoCli<R> {
    fn write_cert(&self, operation: Operation, params: Params, out: &Path) -> AdaResult<PathBuf> {
        self.run(operation, &params.with_path(Arg::OutFile, out))?;
        Ok(out.to_path_buf())
    }

    fn stake_cert(&self, operation: Operation, stake_vkey: &Path, deposit: Option<&Quantity>, out: &Path) -> AdaResult<PathBuf> {
        let mut params = Params::new().with_path(Arg::StakeVerificationKeyFile, stake_vkey);
        if let Some(d) = deposit {
            params.push(Arg::KeyRegDepositAmt, d.to_string());
        }
        self.write_cert(operation, params, out)
    }

    pub fn stake_registration_cert(&self,
                                   stake_vkey: impl AsRef<Path>,
                                   deposit: Option<&Quantity>,
                                   out: impl AsRef<Path>)
                                   -> AdaResult<PathBuf> {
        self.stake_cert(Operation::StakeRegistrationCert, stake_vkey.as_ref(), deposit, out.as_ref())
    }

    pub fn stake_deregistration_cert(&self,
                                     stake_vkey: impl AsRef<Path>,
                                     deposit: Option<&Quantity>,
                                     out: impl AsRef<Path>)
                                     -> AdaResult<PathBuf> {
        self.stake_cert(Operation::StakeDeregistrationCert, stake_vkey.as_ref(), deposit, out.as_ref())
    }

    pub fn stake_delegation_cert(&self,
                                 stake_vkey: impl AsRef<Path>,
                                 target: &DelegationTarget,
                                 out: impl AsRef<Path>)
                                 -> AdaResult<PathBuf> {
        let params = Params::new().with_path(Arg::StakeVerificationKeyFile, stake_vkey);
        let params = match target {
            DelegationTarget::ColdKey(p) => params.with_path(Arg::ColdVerificationKeyFile, p),
            DelegationTarget::PoolId(id) => params.with(Arg::StakePoolId, id.as_str()),
        };
        self.write_cert(Operation::StakeDelegationCert, params, out.as_ref())
    }

    pub fn vote_delegation_cert(&self,
                                stake_vkey: impl AsRef<Path>,
                                target: &VoteTarget,
                                out: impl AsRef<Path>)
                                -> AdaResult<PathBuf> {
        let params = Params::new().with_path(Arg::StakeVerificationKeyFile, stake_vkey);
        let params = match target {
            VoteTarget::AlwaysAbstain => params.with_switch(Arg::AlwaysAbstain),
            VoteTarget::AlwaysNoConfidence => params.with_switch(Arg::AlwaysNoConfidence),
            VoteTarget::DrepKeyHash(h) => params.with(Arg::DrepKeyHash, h.as_str()),
        };
        self.write_cert(Operation::VoteDelegationCert, params, out.as_ref())
    }

    pub fn pool_deregistration_cert(&self, cold_vkey: impl AsRef<Path>, epoch: u64, out: impl AsRef<Path>) -> AdaResult<PathBuf> {
        let params = Params::new().with_path(Arg::ColdVerificationKeyFile, cold_vkey)
                                  .with(Arg::Epoch, epoch.to_string());
        self.write_cert(Operation::StakePoolDeregistrationCert, params, out.as_ref())
    }

    /// Corre offline: sólo lee llaves de verificación.
    pub fn pool_registration_cert(&self, registration: &PoolRegistration, out: impl AsRef<Path>) -> AdaResult<PathBuf> {
        self.write_cert(Operation::StakePoolRegistrationCert, registration.params()?, out.as_ref())
    }

    /// Voto del pool (llave fría) sobre la acción de gobernanza `action`
    /// (`<tx id>#<índice>`).
    pub fn pool_vote(&self,
                     action: &TxIn,
                     decision: VoteDecision,
                     cold_vkey: impl AsRef<Path>,
                     out: impl AsRef<Path>)
                     -> AdaResult<PathBuf> {
        let params = Params::new().with_switch(decision.arg())
                                  .with(Arg::GovernanceActionTxId, action.tx_hash.as_str())
                                  .with(Arg::GovernanceActionIndex, action.index.to_string())
                                  .with_path(Arg::ColdVerificationKeyFile, cold_vkey);
        self.write_cert(Operation::GovernanceVoteCreate, params, out.as_ref())
    }

    /// Contenido de un archivo de voto, como JSON.
    pub fn view_vote(&self, vote_file: impl AsRef<Path>) -> AdaResult<Value> {
        let op = Operation::GovernanceVoteView;
        let params = Params::new().with_switch(Arg::OutputJson).with_path(Arg::VoteFile, vote_file);
        match self.run(op, &params)? {
            ParsedValue::Json(v) => Ok(v),
            other => Err(unexpected(op, ValueKind::Json, &other)),
        }
    }
}
