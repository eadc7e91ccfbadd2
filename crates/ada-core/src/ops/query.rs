//! Consultas al nodo (online).
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use ada_domain::{Balance, CertificateInfo, ChainTip, ParsedValue, ShelleyGenesis, StakeAddressInfo, UtxoSet, ValueKind};
use serde_json::Value;

use crate::client::{unexpected, CardanoCli};
use crate::command::{Arg, Operation, Params};
use crate::errors::{AdaError, AdaResult};
use crate::exec::CommandRunner;

impl<R: CommandRunner> CardanoCli<R> {
    pub fn tip(&self) -> AdaResult<ChainTip> {
        match self.run(Operation::QueryTip, &Params::new())? {
            ParsedValue::ChainTip(t) => Ok(t),
            other => Err(unexpected(Operation::QueryTip, ValueKind::ChainTip, &other)),
        }
    }

    fn utxo_query(&self, params: Params) -> AdaResult<UtxoSet> {
        match self.run(Operation::QueryUtxo, &params.with_switch(Arg::OutputJson))? {
            ParsedValue::Utxos(set) => Ok(set),
            other => Err(unexpected(Operation::QueryUtxo, ValueKind::Utxos, &other)),
        }
    }

    pub fn utxos_at(&self, address: &str) -> AdaResult<UtxoSet> {
        self.utxo_query(Params::new().with(Arg::Address, address))
    }

    pub fn utxo(&self, tx_in: &str) -> AdaResult<UtxoSet> {
        self.utxo_query(Params::new().with(Arg::TxIn, tx_in))
    }

    /// Saldo combinado de todas las UTxO de `address`.
    pub fn balance(&self, address: &str) -> AdaResult<Balance> {
        Ok(self.utxos_at(address)?.total())
    }

    fn json_query(&self, operation: Operation, params: Params) -> AdaResult<Value> {
        match self.run(operation, &params)? {
            ParsedValue::Json(v) => Ok(v),
            other => Err(unexpected(operation, ValueKind::Json, &other)),
        }
    }

    pub fn protocol_parameters(&self) -> AdaResult<Value> {
        self.json_query(Operation::QueryProtocolParameters, Params::new())
    }

    /// Escribe los protocol parameters en `path` (bajo `cwd`); no sobrescribe.
    pub fn write_protocol_parameters(&self, path: impl AsRef<Path>) -> AdaResult<PathBuf> {
        let target = self.context().resolve_path(&path);
        let op = Operation::QueryProtocolParameters.name();
        if target.symlink_metadata().is_ok() {
            return Err(AdaError::invalid(op, format!("refusing to overwrite existing {}", target.display())));
        }
        let params = self.protocol_parameters()?;
        let body = serde_json::to_string_pretty(&params).map_err(|e| AdaError::invalid(op, e.to_string()))?;
        let mut f = OpenOptions::new().write(true)
                                      .create_new(true)
                                      .open(&target)
                                      .map_err(|e| AdaError::invalid(op, format!("{}: {e}", target.display())))?;
        f.write_all(body.as_bytes()).map_err(|e| AdaError::invalid(op, format!("{}: {e}", target.display())))?;
        Ok(path.as_ref().to_path_buf())
    }

    pub fn stake_address_info(&self, stake_address: &str) -> AdaResult<Vec<StakeAddressInfo>> {
        let params = Params::new().with(Arg::StakeAddress, stake_address);
        match self.run(Operation::QueryStakeAddressInfo, &params)? {
            ParsedValue::StakeAddresses(v) => Ok(v),
            other => Err(unexpected(Operation::QueryStakeAddressInfo, ValueKind::StakeAddresses, &other)),
        }
    }

    pub fn kes_period_info(&self, op_cert: impl AsRef<Path>) -> AdaResult<CertificateInfo> {
        let params = Params::new().with_path(Arg::OpCertFile, op_cert);
        match self.run(Operation::QueryKesPeriodInfo, &params)? {
            ParsedValue::CertificateInfo(c) => Ok(c),
            other => Err(unexpected(Operation::QueryKesPeriodInfo, ValueKind::CertificateInfo, &other)),
        }
    }

    pub fn pool_params(&self, pool_id: &str) -> AdaResult<Value> {
        self.json_query(Operation::QueryPoolParams, Params::new().with(Arg::StakePoolId, pool_id))
    }

    pub fn stake_snapshot(&self, pool_id: &str) -> AdaResult<Value> {
        self.json_query(Operation::QueryStakeSnapshot, Params::new().with(Arg::StakePoolId, pool_id))
    }

    /// Periodo KES en la punta actual de la cadena.
    pub fn current_kes_period(&self, genesis: &ShelleyGenesis) -> AdaResult<u64> {
        let tip = self.tip()?;
        genesis.kes_period_at(tip.slot)
               .map_err(|e| AdaError::Configuration(e.to_string()))
    }
}
