//! Construcción, firma y envío de transacciones.
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use ada_domain::{ParsedValue, Quantity, TxIn, UtxoSet, ValueKind};

use crate::client::{unexpected, CardanoCli};
use crate::command::{Arg, Operation, Params};
use crate::errors::{AdaError, AdaResult};
use crate::exec::CommandRunner;

/// Borrador para `transaction build-raw`.
#[derive(Debug, Clone, Default)]
pub struct TxDraft {
    pub inputs: Vec<TxIn>,
    /// `addr+lovelace[+assets]` tal como lo espera la CLI.
    pub outputs: Vec<String>,
    pub fee: Quantity,
    pub invalid_before: Option<u64>,
    pub invalid_hereafter: Option<u64>,
    pub certificates: Vec<PathBuf>,
    pub withdrawals: Vec<String>,
    pub metadata: Option<PathBuf>,
}

impl TxDraft {
    pub fn new(inputs: Vec<TxIn>, fee: Quantity) -> Self {
        Self { inputs, fee, ..Self::default() }
    }

    pub fn output(mut self, address: &str, lovelace: &Quantity) -> Self {
        self.outputs.push(format!("{address}+{lovelace}"));
        self
    }

    pub fn certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificates.push(path.into());
        self
    }

    fn params(&self, out: &Path) -> Params {
        let mut p = Params::new().with(Arg::Fee, self.fee.to_string())
                                 .with_path(Arg::OutFile, out);
        for i in &self.inputs {
            p.push(Arg::TxIn, i.to_string());
        }
        for o in &self.outputs {
            p.push(Arg::TxOut, o.as_str());
        }
        if let Some(slot) = self.invalid_before {
            p.push(Arg::InvalidBefore, slot.to_string());
        }
        if let Some(slot) = self.invalid_hereafter {
            p.push(Arg::InvalidHereafter, slot.to_string());
        }
        for c in &self.certificates {
            p.push(Arg::CertificateFile, c.display().to_string());
        }
        for w in &self.withdrawals {
            p.push(Arg::Withdrawal, w.as_str());
        }
        if let Some(m) = &self.metadata {
            p.push(Arg::MetadataJsonFile, m.display().to_string());
        }
        p
    }
}

/// Entradas de `transaction calculate-min-fee`.
#[derive(Debug, Clone)]
pub struct FeeQuery {
    pub body: PathBuf,
    pub protocol_params: PathBuf,
    pub inputs: u64,
    pub outputs: u64,
    pub witnesses: u64,
    pub byron_witnesses: Option<u64>,
}

impl FeeQuery {
    fn params(&self) -> Params {
        let p = Params::new().with_path(Arg::TxBodyFile, &self.body)
                             .with_path(Arg::ProtocolParamsFile, &self.protocol_params)
                             .with(Arg::TxInCount, self.inputs.to_string())
                             .with(Arg::TxOutCount, self.outputs.to_string())
                             .with(Arg::WitnessCount, self.witnesses.to_string());
        match self.byron_witnesses {
            Some(n) => p.with(Arg::ByronWitnessCount, n.to_string()),
            None => p,
        }
    }
}

/// Sondeo de `wait_for_tx`: intentos separados por `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    /// Un minuto, consultando cada segundo.
    fn default() -> Self {
        Self { attempts: 60,
               interval: Duration::from_secs(1) }
    }
}

/// Origen de `transaction txid`.
#[derive(Debug, Clone)]
pub enum TxSource {
    Signed(PathBuf),
    Body(PathBuf),
}

impl<R: CommandRunner> CardanoCli<R> {
    pub fn build_raw(&self, draft: &TxDraft, out: impl AsRef<Path>) -> AdaResult<PathBuf> {
        self.run(Operation::TxBuildRaw, &draft.params(out.as_ref()))?;
        Ok(out.as_ref().to_path_buf())
    }

    pub fn min_fee(&self,
                   body: impl AsRef<Path>,
                   protocol_params: impl AsRef<Path>,
                   inputs: u64,
                   outputs: u64,
                   witnesses: u64)
                   -> AdaResult<Quantity> {
        self.calculate_min_fee(&FeeQuery { body: body.as_ref().to_path_buf(),
                                           protocol_params: protocol_params.as_ref().to_path_buf(),
                                           inputs,
                                           outputs,
                                           witnesses,
                                           byron_witnesses: None })
    }

    pub fn calculate_min_fee(&self, query: &FeeQuery) -> AdaResult<Quantity> {
        match self.run(Operation::TxCalculateMinFee, &query.params())? {
            ParsedValue::Fee(q) => Ok(q),
            other => Err(unexpected(Operation::TxCalculateMinFee, ValueKind::Fee, &other)),
        }
    }

    /// Lovelace mínimo que debe llevar `tx_out` (`addr+lovelace[+assets]`).
    pub fn min_required_utxo(&self, protocol_params: impl AsRef<Path>, tx_out: &str) -> AdaResult<Quantity> {
        let op = Operation::TxCalculateMinRequiredUtxo;
        let params = Params::new().with_path(Arg::ProtocolParamsFile, protocol_params)
                                  .with(Arg::TxOut, tx_out);
        match self.run(op, &params)? {
            ParsedValue::Lovelace(q) => Ok(q),
            other => Err(unexpected(op, ValueKind::Lovelace, &other)),
        }
    }

    /// Policy id (hash del script de minteo).
    pub fn policy_id(&self, script: impl AsRef<Path>) -> AdaResult<String> {
        let op = Operation::TxPolicyId;
        match self.run(op, &Params::new().with_path(Arg::ScriptFile, script))? {
            ParsedValue::Hash(h) => Ok(h),
            other => Err(unexpected(op, ValueKind::Hash, &other)),
        }
    }

    pub fn sign<P: AsRef<Path>>(&self, body: impl AsRef<Path>, signing_keys: &[P], out: impl AsRef<Path>) -> AdaResult<PathBuf> {
        let mut params = Params::new().with_path(Arg::TxBodyFile, body)
                                      .with_path(Arg::OutFile, out.as_ref());
        for k in signing_keys {
            params.push(Arg::SigningKeyFile, k.as_ref().display().to_string());
        }
        self.run(Operation::TxSign, &params)?;
        Ok(out.as_ref().to_path_buf())
    }

    /// Envía una transacción firmada. Nunca se reintenta.
    pub fn submit(&self, tx_file: impl AsRef<Path>) -> AdaResult<()> {
        self.run(Operation::TxSubmit, &Params::new().with_path(Arg::TxFile, tx_file))?;
        Ok(())
    }

    pub fn txid(&self, source: &TxSource) -> AdaResult<String> {
        let params = match source {
            TxSource::Signed(p) => Params::new().with_path(Arg::TxFile, p),
            TxSource::Body(p) => Params::new().with_path(Arg::TxBodyFile, p),
        };
        match self.run(Operation::TxId, &params)? {
            ParsedValue::TxId(id) => Ok(id),
            other => Err(unexpected(Operation::TxId, ValueKind::TxId, &other)),
        }
    }

    /// Consulta las UTxO de `address` hasta que aparezca alguna salida de
    /// `tx_id`. Agotar los intentos es `Timeout`.
    pub fn wait_for_tx(&self, address: &str, tx_id: &str, poll: PollPolicy) -> AdaResult<UtxoSet> {
        let op = "wait for tx";
        if !(tx_id.len() == 64 && tx_id.bytes().all(|b| b.is_ascii_hexdigit())) {
            return Err(AdaError::invalid(op, format!("'{tx_id}' is not a transaction id")));
        }
        let started = Instant::now();
        let attempts = poll.attempts.max(1);
        for attempt in 1..=attempts {
            let arrived = self.utxos_at(address)?.filter_prefix(&format!("{tx_id}#"));
            if !arrived.is_empty() {
                log::info!("transaction {tx_id} arrived after {:.1}s, balance {} lovelace",
                           started.elapsed().as_secs_f64(),
                           arrived.total().lovelace);
                return Ok(arrived);
            }
            if attempt < attempts {
                thread::sleep(poll.interval);
            }
        }
        log::warn!("transaction {tx_id} did not arrive at {address} after {attempts} attempts");
        Err(AdaError::Timeout { operation: op.to_string(),
                                command: Vec::new(),
                                after: started.elapsed() })
    }
}
