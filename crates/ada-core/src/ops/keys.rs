//! Generación de llaves y emisión de certificados operacionales.
use std::path::{Path, PathBuf};

use ada_domain::{KeyMaterial, ParsedValue, ValueKind};

use crate::client::{unexpected, CardanoCli};
use crate::command::{Arg, Operation, Params};
use crate::errors::AdaResult;
use crate::exec::CommandRunner;

/// Entradas de `node issue-op-cert`. `counter` se actualiza in situ por la CLI.
#[derive(Debug, Clone)]
pub struct OpCertRequest {
    pub kes_vkey: PathBuf,
    pub cold_skey: PathBuf,
    pub counter: PathBuf,
    pub kes_period: u64,
    pub out: PathBuf,
}

impl OpCertRequest {
    fn params(&self) -> Params {
        Params::new().with_path(Arg::KesVerificationKeyFile, &self.kes_vkey)
                     .with_path(Arg::ColdSigningKeyFile, &self.cold_skey)
                     .with_path(Arg::OpCertCounter, &self.counter)
                     .with(Arg::KesPeriod, self.kes_period.to_string())
                     .with_path(Arg::OutFile, &self.out)
    }
}

impl<R: CommandRunner> CardanoCli<R> {
    fn key_gen(&self, operation: Operation, params: Params) -> AdaResult<Vec<KeyMaterial>> {
        match self.run(operation, &params)? {
            ParsedValue::KeyMaterial(keys) => Ok(keys),
            other => Err(unexpected(operation, ValueKind::KeyMaterial, &other)),
        }
    }

    fn pair(vkey: &Path, skey: &Path) -> Params {
        Params::new().with_path(Arg::VerificationKeyFile, vkey)
                     .with_path(Arg::SigningKeyFile, skey)
    }

    pub fn address_key_gen(&self, vkey: impl AsRef<Path>, skey: impl AsRef<Path>) -> AdaResult<Vec<KeyMaterial>> {
        self.key_gen(Operation::AddressKeyGen, Self::pair(vkey.as_ref(), skey.as_ref()))
    }

    pub fn stake_key_gen(&self, vkey: impl AsRef<Path>, skey: impl AsRef<Path>) -> AdaResult<Vec<KeyMaterial>> {
        self.key_gen(Operation::StakeAddressKeyGen, Self::pair(vkey.as_ref(), skey.as_ref()))
    }

    pub fn kes_key_gen(&self, vkey: impl AsRef<Path>, skey: impl AsRef<Path>) -> AdaResult<Vec<KeyMaterial>> {
        self.key_gen(Operation::NodeKeyGenKes, Self::pair(vkey.as_ref(), skey.as_ref()))
    }

    pub fn vrf_key_gen(&self, vkey: impl AsRef<Path>, skey: impl AsRef<Path>) -> AdaResult<Vec<KeyMaterial>> {
        self.key_gen(Operation::NodeKeyGenVrf, Self::pair(vkey.as_ref(), skey.as_ref()))
    }

    /// Llaves frías del pool: `<prefix>.vkey`, `<prefix>.skey` y `<prefix>.counter`.
    pub fn cold_key_gen(&self, prefix: &str) -> AdaResult<Vec<KeyMaterial>> {
        let params = Params::new().with(Arg::ColdVerificationKeyFile, format!("{prefix}.vkey"))
                                  .with(Arg::ColdSigningKeyFile, format!("{prefix}.skey"))
                                  .with(Arg::OpCertCounterFile, format!("{prefix}.counter"));
        self.key_gen(Operation::NodeKeyGen, params)
    }

    /// Hash de una llave de verificación de pago.
    pub fn address_key_hash(&self, payment_vkey: impl AsRef<Path>) -> AdaResult<String> {
        let op = Operation::AddressKeyHash;
        match self.run(op, &Params::new().with_path(Arg::PaymentVerificationKeyFile, payment_vkey))? {
            ParsedValue::Hash(h) => Ok(h),
            other => Err(unexpected(op, ValueKind::Hash, &other)),
        }
    }

    pub fn issue_op_cert(&self, request: &OpCertRequest) -> AdaResult<PathBuf> {
        self.run(Operation::NodeIssueOpCert, &request.params())?;
        Ok(request.out.clone())
    }
}
