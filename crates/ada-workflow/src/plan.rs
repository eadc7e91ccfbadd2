//! Plan de una rotación: rutas, origen del periodo KES y verificación.
use std::path::PathBuf;

use ada_core::RetryPolicy;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::constants::WORKFLOW_VERSION;
use crate::errors::WorkflowError;
use crate::hashing::hash_value;
use crate::state::RotationStep;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KesPeriodSource {
    /// `slotsPerKESPeriod` del genesis Shelley y el slot de la punta.
    Genesis(PathBuf),
    /// Valor explícito de slots por periodo y el slot de la punta.
    SlotsPerPeriod(u64),
    /// Periodo ya conocido (máquina sin nodo); no consulta la cadena.
    Fixed(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMode {
    Skip,
    /// Decodifica el certificado emitido.
    Offline,
    /// `query kes-period-info` contra el nodo.
    Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotationPlan {
    pub kes_vkey: PathBuf,
    pub kes_skey: PathBuf,
    pub cold_skey: PathBuf,
    pub counter: PathBuf,
    pub op_cert: PathBuf,
    pub period_source: KesPeriodSource,
    pub verify: VerifyMode,
    /// Si se fija, el contador en disco debe valer exactamente esto antes de emitir.
    pub expected_issue_counter: Option<u64>,
    /// Reintento de la consulta del tip (nunca de la emisión).
    pub read_retry: Option<RetryPolicy>,
}

impl RotationPlan {
    pub fn builder() -> RotationPlanBuilder {
        RotationPlanBuilder::default()
    }

    pub fn steps(&self) -> Vec<RotationStep> {
        let mut steps = vec![RotationStep::FetchPeriod, RotationStep::GenerateKeys, RotationStep::IssueCertificate];
        if self.verify != VerifyMode::Skip {
            steps.push(RotationStep::Verify);
        }
        steps
    }

    /// Hash estable del plan (el reintento no participa).
    pub fn plan_hash(&self) -> String {
        hash_value(&json!({
            "workflow_version": WORKFLOW_VERSION,
            "kes_vkey": self.kes_vkey,
            "kes_skey": self.kes_skey,
            "cold_skey": self.cold_skey,
            "counter": self.counter,
            "op_cert": self.op_cert,
            "period_source": self.period_source,
            "verify": self.verify,
            "expected_issue_counter": self.expected_issue_counter,
        }))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RotationPlanBuilder {
    kes_vkey: Option<PathBuf>,
    kes_skey: Option<PathBuf>,
    cold_skey: Option<PathBuf>,
    counter: Option<PathBuf>,
    op_cert: Option<PathBuf>,
    period_source: Option<KesPeriodSource>,
    verify: Option<VerifyMode>,
    expected_issue_counter: Option<u64>,
    read_retry: Option<RetryPolicy>,
}

impl RotationPlanBuilder {
    pub fn kes_keys(mut self, vkey: impl Into<PathBuf>, skey: impl Into<PathBuf>) -> Self {
        self.kes_vkey = Some(vkey.into());
        self.kes_skey = Some(skey.into());
        self
    }

    pub fn cold_keys(mut self, skey: impl Into<PathBuf>, counter: impl Into<PathBuf>) -> Self {
        self.cold_skey = Some(skey.into());
        self.counter = Some(counter.into());
        self
    }

    pub fn op_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.op_cert = Some(path.into());
        self
    }

    pub fn period_source(mut self, source: KesPeriodSource) -> Self {
        self.period_source = Some(source);
        self
    }

    pub fn verify(mut self, mode: VerifyMode) -> Self {
        self.verify = Some(mode);
        self
    }

    pub fn expected_issue_counter(mut self, counter: u64) -> Self {
        self.expected_issue_counter = Some(counter);
        self
    }

    pub fn read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = Some(policy);
        self
    }

    /// Por defecto: `kes.vkey`, `kes.skey`, `node.cert` y verificación offline.
    pub fn build(self) -> Result<RotationPlan, WorkflowError> {
        let cold_skey = self.cold_skey.ok_or_else(|| WorkflowError::Plan("cold signing key is required".into()))?;
        let counter = self.counter.ok_or_else(|| WorkflowError::Plan("issue counter file is required".into()))?;
        let period_source = self.period_source
                                .ok_or_else(|| WorkflowError::Plan("a KES period source is required".into()))?;
        if matches!(period_source, KesPeriodSource::SlotsPerPeriod(0)) {
            return Err(WorkflowError::Plan("slots per KES period must be greater than zero".into()));
        }
        let plan = RotationPlan { kes_vkey: self.kes_vkey.unwrap_or_else(|| PathBuf::from("kes.vkey")),
                                  kes_skey: self.kes_skey.unwrap_or_else(|| PathBuf::from("kes.skey")),
                                  cold_skey,
                                  counter,
                                  op_cert: self.op_cert.unwrap_or_else(|| PathBuf::from("node.cert")),
                                  period_source,
                                  verify: self.verify.unwrap_or(VerifyMode::Offline),
                                  expected_issue_counter: self.expected_issue_counter,
                                  read_retry: self.read_retry };
        let outputs = [&plan.kes_vkey, &plan.kes_skey, &plan.op_cert];
        let inputs = [&plan.cold_skey, &plan.counter];
        for (i, a) in outputs.iter().enumerate() {
            if outputs[i + 1..].contains(a) || inputs.contains(a) {
                return Err(WorkflowError::Plan(format!("path {} is used for more than one file", a.display())));
            }
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RotationPlanBuilder {
        RotationPlan::builder().cold_keys("cold.skey", "cold.counter")
                               .period_source(KesPeriodSource::Fixed(400))
    }

    #[test]
    fn defaults_and_steps() {
        let plan = base().build().unwrap();
        assert_eq!(plan.op_cert, PathBuf::from("node.cert"));
        assert_eq!(plan.steps().len(), 4);
        let plan = base().verify(VerifyMode::Skip).build().unwrap();
        assert_eq!(plan.steps().last(), Some(&RotationStep::IssueCertificate));
    }

    #[test]
    fn missing_or_clashing_paths_are_rejected() {
        assert!(RotationPlan::builder().period_source(KesPeriodSource::Fixed(1)).build().is_err());
        assert!(base().op_cert("kes.vkey").build().is_err());
        assert!(base().kes_keys("cold.counter", "kes.skey").build().is_err());
        assert!(base().period_source(KesPeriodSource::SlotsPerPeriod(0)).build().is_err());
    }

    #[test]
    fn plan_hash_ignores_retry_but_not_guard() {
        let a = base().build().unwrap();
        let b = base().read_retry(RetryPolicy::default()).build().unwrap();
        let c = base().expected_issue_counter(3).build().unwrap();
        assert_eq!(a.plan_hash(), b.plan_hash());
        assert_ne!(a.plan_hash(), c.plan_hash());
    }
}
