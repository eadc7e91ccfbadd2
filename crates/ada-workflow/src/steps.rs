//! Implementación de cada paso de la rotación.
//!
//! Un paso nunca borra archivos. Si falla después de que el CLI escribiera
//! algo, lo reporta como artefacto parcial.
use std::path::{Path, PathBuf};

use ada_core::envelope::{decode_counter, decode_key_bytes, decode_op_cert, TextEnvelope};
use ada_core::{CardanoCli, CommandRunner, OpCertRequest, Operation, OperationContext};
use ada_domain::{current_kes_period, ShelleyGenesis};

use crate::errors::WorkflowError;
use crate::event::StepOutput;
use crate::plan::{KesPeriodSource, RotationPlan, VerifyMode};
use crate::state::{ArtifactRole, KesRotationState, RotationStep, WrittenArtifact};

/// Resultado de ejecutar un paso.
#[derive(Debug)]
pub enum StepRunResult {
    Success { output: StepOutput, artifacts: Vec<WrittenArtifact> },
    /// `partial`: archivos que aparecieron durante el paso fallido.
    Failure { error: WorkflowError, partial: Vec<WrittenArtifact> },
}

impl StepRunResult {
    fn from_result(result: Result<(StepOutput, Vec<WrittenArtifact>), WorkflowError>) -> Self {
        match result {
            Ok((output, artifacts)) => StepRunResult::Success { output, artifacts },
            Err(error) => StepRunResult::Failure { error,
                                                   partial: Vec::new() },
        }
    }
}

pub(crate) fn run_step<R: CommandRunner>(step: RotationStep,
                                         cli: &CardanoCli<R>,
                                         plan: &RotationPlan,
                                         state: &KesRotationState)
                                         -> StepRunResult {
    match step {
        RotationStep::FetchPeriod => StepRunResult::from_result(fetch_period(cli, plan)),
        RotationStep::GenerateKeys => generate_keys(cli, plan, state),
        RotationStep::IssueCertificate => issue_certificate(cli, plan, state),
        RotationStep::Verify => StepRunResult::from_result(verify(cli, plan, state)),
    }
}

fn fetch_period<R: CommandRunner>(cli: &CardanoCli<R>, plan: &RotationPlan) -> Result<(StepOutput, Vec<WrittenArtifact>), WorkflowError> {
    let slot_of_tip = || -> Result<u64, WorkflowError> {
        let tip = match plan.read_retry {
            Some(policy) => policy.run(Operation::QueryTip, || cli.tip())?,
            None => cli.tip()?,
        };
        Ok(tip.slot)
    };
    let (slot, kes_period) = match &plan.period_source {
        KesPeriodSource::Fixed(period) => (None, *period),
        KesPeriodSource::SlotsPerPeriod(spp) => {
            let slot = slot_of_tip()?;
            (Some(slot), current_kes_period(slot, *spp)?)
        }
        KesPeriodSource::Genesis(path) => {
            let genesis = ShelleyGenesis::from_file(&cli.context().resolve_path(path))?;
            let slot = slot_of_tip()?;
            (Some(slot), genesis.kes_period_at(slot)?)
        }
    };
    log::info!("KES period {kes_period} (slot {slot:?})");
    Ok((StepOutput::PeriodFetched { slot, kes_period }, Vec::new()))
}

fn exists(ctx: &OperationContext, path: &Path) -> bool {
    ctx.resolve_path(path).symlink_metadata().is_ok()
}

/// Archivos de `targets` que no existían antes y existen ahora.
fn appeared(ctx: &OperationContext, targets: &[(PathBuf, ArtifactRole, bool)]) -> Vec<WrittenArtifact> {
    targets.iter()
           .filter(|(path, _, existed)| !existed && exists(ctx, path))
           .map(|(path, role, _)| WrittenArtifact::partial(path.clone(), *role))
           .collect()
}

fn generate_keys<R: CommandRunner>(cli: &CardanoCli<R>, plan: &RotationPlan, state: &KesRotationState) -> StepRunResult {
    let ctx = cli.context();
    let targets = [(plan.kes_vkey.clone(), ArtifactRole::KesVerificationKey, exists(ctx, &plan.kes_vkey)),
                   (plan.kes_skey.clone(), ArtifactRole::KesSigningKey, exists(ctx, &plan.kes_skey))];
    match cli.kes_key_gen(&plan.kes_vkey, &plan.kes_skey) {
        Ok(keys) => {
            let keys = match state.kes_period {
                Some(period) => keys.into_iter().map(|k| k.with_period(period)).collect(),
                None => keys,
            };
            let artifacts = targets.iter().map(|(p, r, _)| WrittenArtifact::complete(p.clone(), *r)).collect();
            StepRunResult::Success { output: StepOutput::KeysGenerated { keys },
                                     artifacts }
        }
        Err(e) => StepRunResult::Failure { error: e.into(),
                                           partial: appeared(ctx, &targets) },
    }
}

fn read_counter(ctx: &OperationContext, counter: &Path) -> Result<u64, WorkflowError> {
    Ok(decode_counter(&TextEnvelope::read(&ctx.resolve_path(counter))?)?)
}

/// Contador actual (guardado por `expected_issue_counter` si se pidió) y periodo.
fn prepare_issue(ctx: &OperationContext, plan: &RotationPlan, state: &KesRotationState) -> Result<(u64, u64), WorkflowError> {
    let before = read_counter(ctx, &plan.counter)?;
    if let Some(expected) = plan.expected_issue_counter {
        if expected != before {
            return Err(WorkflowError::CounterGuard { expected,
                                                     found: before });
        }
    }
    let kes_period = state.kes_period
                          .ok_or_else(|| WorkflowError::Plan("no KES period fetched".into()))?;
    Ok((before, kes_period))
}

fn issue_certificate<R: CommandRunner>(cli: &CardanoCli<R>, plan: &RotationPlan, state: &KesRotationState) -> StepRunResult {
    let ctx = cli.context();
    let (before, kes_period) = match prepare_issue(ctx, plan, state) {
        Ok(v) => v,
        Err(error) => {
            return StepRunResult::Failure { error,
                                            partial: Vec::new() }
        }
    };

    let cert_existed = exists(ctx, &plan.op_cert);
    let request = OpCertRequest { kes_vkey: plan.kes_vkey.clone(),
                                  cold_skey: plan.cold_skey.clone(),
                                  counter: plan.counter.clone(),
                                  kes_period,
                                  out: plan.op_cert.clone() };
    match cli.issue_op_cert(&request) {
        Ok(certificate) => {
            log::info!("issued {} with issue counter {before} at KES period {kes_period}", certificate.display());
            StepRunResult::Success { output: StepOutput::CertificateIssued { certificate: certificate.clone(),
                                                                             counter_before: before,
                                                                             issue_counter: before },
                                     artifacts: vec![WrittenArtifact::complete(certificate, ArtifactRole::OperationalCertificate),
                                                     WrittenArtifact::complete(plan.counter.clone(), ArtifactRole::IssueCounter)] }
        }
        Err(e) => {
            let mut partial = appeared(ctx, &[(plan.op_cert.clone(), ArtifactRole::OperationalCertificate, cert_existed)]);
            if read_counter(ctx, &plan.counter).map_or(true, |now| now != before) {
                partial.push(WrittenArtifact::partial(plan.counter.clone(), ArtifactRole::IssueCounter));
            }
            StepRunResult::Failure { error: e.into(),
                                     partial }
        }
    }
}

fn verify<R: CommandRunner>(cli: &CardanoCli<R>,
                            plan: &RotationPlan,
                            state: &KesRotationState)
                            -> Result<(StepOutput, Vec<WrittenArtifact>), WorkflowError> {
    let ctx = cli.context();
    let (Some(cert), Some(expected_period), Some(before)) = (&state.certificate, state.kes_period, state.counter_before) else {
        return Err(WorkflowError::Plan("verify requires an issued certificate".into()));
    };
    let (kes_period, issue_counter) = match plan.verify {
        VerifyMode::Offline => {
            let fields = decode_op_cert(&TextEnvelope::read(&ctx.resolve_path(cert))?)?;
            let vkey = decode_key_bytes(&TextEnvelope::read(&ctx.resolve_path(&plan.kes_vkey))?)?;
            if fields.kes_vkey != vkey {
                return Err(WorkflowError::Verification(format!("{} does not certify {}",
                                                               cert.display(),
                                                               plan.kes_vkey.display())));
            }
            (fields.kes_period, fields.issue_counter)
        }
        VerifyMode::Node => {
            let info = cli.kes_period_info(cert)?;
            if let Some(seen) = info.node_state_counter {
                if info.issue_counter < seen {
                    return Err(WorkflowError::Verification(format!("node already saw issue counter {seen}, certificate has {}",
                                                                   info.issue_counter)));
                }
            }
            (info.kes_period, info.issue_counter)
        }
        VerifyMode::Skip => return Err(WorkflowError::Plan("verification is disabled in this plan".into())),
    };
    if kes_period != expected_period {
        return Err(WorkflowError::Verification(format!("certificate KES period {kes_period}, expected {expected_period}")));
    }
    if issue_counter != before {
        return Err(WorkflowError::Verification(format!("certificate issue counter {issue_counter}, expected {before}")));
    }
    let counter_after = read_counter(ctx, &plan.counter)?;
    if counter_after != before + 1 {
        return Err(WorkflowError::Verification(format!("counter file holds {counter_after}, expected {}", before + 1)));
    }
    Ok((StepOutput::Verified { kes_period,
                               issue_counter,
                               counter_after },
        Vec::new()))
}
