mod common;

use ada_core::envelope::{decode_op_cert, TextEnvelope};
use ada_core::ErrorKind;
use ada_workflow::{ArtifactRole, KesPeriodSource, RotationEngine, RotationEventKind, RotationPlan, RotationStage, RotationStep,
                   VerifyMode, WrittenArtifact};
use common::*;

fn plan(tag: &str) -> RotationPlan {
    RotationPlan::builder().kes_keys(format!("kes-{tag}.vkey"), format!("kes-{tag}.skey"))
                           .cold_keys("cold.skey", "cold.counter")
                           .op_cert(format!("node-{tag}.cert"))
                           .period_source(KesPeriodSource::Fixed(412))
                           .build()
                           .expect("plan válido")
}

#[test]
fn full_rotation_with_offline_verification() {
    let dir = tempfile::tempdir().unwrap();
    seed_cold(dir.path(), 0);
    let cli = cli(dir.path());
    script_key_gen(cli.runner(), 3);
    script_issue(cli.runner(), 0, true);
    let mut engine = RotationEngine::new(cli);

    let state = engine.run(&plan("a")).expect("rotación");
    assert!(state.is_done(), "estado final: {:?}", state.stage);
    assert_eq!(state.kes_period, Some(412));
    assert_eq!(state.issue_counter, Some(0));
    assert_eq!(state.keys.len(), 2);
    assert!(state.keys.iter().all(|k| k.kes_period == Some(412)));
    assert_eq!(state.artifact_paths().len(), 4);
    assert_eq!(counter_on_disk(dir.path()), 1);
    let checked = state.verification.expect("verificación registrada");
    assert_eq!((checked.kes_period, checked.issue_counter, checked.counter_after), (412, 0, 1));

    let cert = decode_op_cert(&TextEnvelope::read(&dir.path().join("node-a.cert")).unwrap()).unwrap();
    assert_eq!((cert.issue_counter, cert.kes_period), (0, 412));

    let kinds: Vec<&str> = engine.events(state.rotation_id)
                                 .iter()
                                 .map(|e| match e.kind {
                                     RotationEventKind::RotationInitialized { .. } => "I",
                                     RotationEventKind::StepStarted { .. } => "S",
                                     RotationEventKind::StepFinished { .. } => "F",
                                     RotationEventKind::StepFailed { .. } => "X",
                                     RotationEventKind::RotationCompleted { .. } => "C",
                                 })
                                 .collect();
    assert_eq!(kinds, ["I", "S", "F", "S", "F", "S", "F", "S", "F", "C"]);
    assert!(engine.rotation_fingerprint_of(state.rotation_id).is_some());
    assert_eq!(engine.cli().runner().spawn_count(), 2, "Fixed no consulta el nodo");
}

#[test]
fn failed_issue_reports_keys_and_leaves_no_certificate() {
    let dir = tempfile::tempdir().unwrap();
    seed_cold(dir.path(), 5);
    let cli = cli(dir.path());
    script_key_gen(cli.runner(), 3);
    cli.runner().respond_failure(1, "Command failed: node issue-op-cert  Error: cold signing key is malformed");
    let mut engine = RotationEngine::new(cli);

    let state = engine.run(&plan("a")).expect("el motor termina");
    let failure = state.failure().expect("debe fallar");
    assert_eq!(failure.step, RotationStep::IssueCertificate);
    assert!(failure.cause.is(ErrorKind::Execution), "{:?}", failure.cause);
    assert_eq!(failure.artifacts_written,
               vec![WrittenArtifact::complete("kes-a.vkey", ArtifactRole::KesVerificationKey),
                    WrittenArtifact::complete("kes-a.skey", ArtifactRole::KesSigningKey)]);
    assert!(!dir.path().join("node-a.cert").exists());
    assert!(dir.path().join("kes-a.skey").exists(), "nunca se borran llaves");
    assert_eq!(counter_on_disk(dir.path()), 5);
}

#[test]
fn two_rotations_issue_strictly_increasing_counters() {
    let dir = tempfile::tempdir().unwrap();
    seed_cold(dir.path(), 7);
    let cli = cli(dir.path());
    script_key_gen(cli.runner(), 3);
    script_issue(cli.runner(), 0, true);
    script_key_gen(cli.runner(), 4);
    script_issue(cli.runner(), 0, true);
    let mut engine = RotationEngine::new(cli);

    let first = engine.run(&plan("a")).unwrap();
    let second = engine.run(&plan("b")).unwrap();
    assert!(first.is_done() && second.is_done());
    assert_eq!(first.issue_counter, Some(7));
    assert_eq!(second.issue_counter, Some(8));
    assert_eq!(counter_on_disk(dir.path()), 9);
    assert_ne!(first.rotation_id, second.rotation_id);
}

#[test]
fn stale_counter_guard_rejects_second_rotation_before_issuing() {
    let dir = tempfile::tempdir().unwrap();
    seed_cold(dir.path(), 0);
    let cli = cli(dir.path());
    script_key_gen(cli.runner(), 3);
    script_issue(cli.runner(), 0, true);
    script_key_gen(cli.runner(), 4);
    let mut engine = RotationEngine::new(cli);

    let guarded = |tag: &str| {
        RotationPlan::builder().kes_keys(format!("kes-{tag}.vkey"), format!("kes-{tag}.skey"))
                               .cold_keys("cold.skey", "cold.counter")
                               .op_cert(format!("node-{tag}.cert"))
                               .period_source(KesPeriodSource::Fixed(412))
                               .expected_issue_counter(0)
                               .build()
                               .unwrap()
    };
    assert!(engine.run(&guarded("a")).unwrap().is_done());
    let state = engine.run(&guarded("b")).unwrap();
    let failure = state.failure().expect("el guard debe rechazar");
    assert_eq!(failure.step, RotationStep::IssueCertificate);
    assert_eq!(failure.cause.kind, "counter_guard");
    assert_eq!(engine.cli().runner().spawn_count(), 3, "sin invocación de issue-op-cert");
    assert!(!dir.path().join("node-b.cert").exists());
    assert_eq!(counter_on_disk(dir.path()), 1);
}

#[test]
fn verification_mismatch_is_a_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    seed_cold(dir.path(), 2);
    let cli = cli(dir.path());
    script_key_gen(cli.runner(), 3);
    script_issue(cli.runner(), 1, true);
    let mut engine = RotationEngine::new(cli);

    let state = engine.run(&plan("a")).unwrap();
    let failure = state.failure().expect("periodo distinto");
    assert_eq!(failure.step, RotationStep::Verify);
    assert_eq!(failure.cause.kind, "verification");
    assert!(failure.artifacts_written
                   .contains(&WrittenArtifact::complete("node-a.cert", ArtifactRole::OperationalCertificate)),
            "el certificado existe y se reporta");
    assert!(dir.path().join("node-a.cert").exists());
}

#[test]
fn counter_not_bumped_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    seed_cold(dir.path(), 2);
    let cli = cli(dir.path());
    script_key_gen(cli.runner(), 3);
    script_issue(cli.runner(), 0, false);
    let mut engine = RotationEngine::new(cli);
    let state = engine.run(&plan("a")).unwrap();
    assert!(state.failure().is_some_and(|f| f.cause.message.contains("counter file holds 2")));
}

#[test]
fn skipped_verification_finishes_after_issue() {
    let dir = tempfile::tempdir().unwrap();
    seed_cold(dir.path(), 0);
    let cli = cli(dir.path());
    script_key_gen(cli.runner(), 3);
    script_issue(cli.runner(), 1, false);
    let mut engine = RotationEngine::new(cli);
    let plan = RotationPlan::builder().cold_keys("cold.skey", "cold.counter")
                                      .period_source(KesPeriodSource::Fixed(10))
                                      .verify(VerifyMode::Skip)
                                      .build()
                                      .unwrap();
    let state = engine.run(&plan).unwrap();
    assert_eq!(state.stage, RotationStage::Done);
    assert!(state.verification.is_none());
    assert_eq!(state.certificate.as_deref(), Some(std::path::Path::new("node.cert")));
}

#[test]
fn key_gen_failure_reports_half_written_keys() {
    let dir = tempfile::tempdir().unwrap();
    seed_cold(dir.path(), 0);
    let cli = cli(dir.path());
    cli.runner().respond_with(|_, ctx| {
                    std::fs::write(ctx.resolve_path("kes-a.vkey"), "{}").unwrap();
                    Ok(ada_core::ExecutionResult::failed(1, "disk full"))
                });
    let mut engine = RotationEngine::new(cli);
    let state = engine.run(&plan("a")).unwrap();
    let failure = state.failure().expect("key-gen falla");
    assert_eq!(failure.step, RotationStep::GenerateKeys);
    assert_eq!(failure.artifacts_written,
               vec![WrittenArtifact::partial("kes-a.vkey", ArtifactRole::KesVerificationKey)]);
    assert!(dir.path().join("kes-a.vkey").exists());
}
