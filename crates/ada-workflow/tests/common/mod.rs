//! CLI simulado: respuestas que escriben en disco lo que escribiría
//! `cardano-cli` (text envelopes reales, contador incrementado).
#![allow(dead_code)]

use std::path::Path;

use ada_core::envelope::{counter_envelope, decode_counter, decode_key_bytes, key_envelope, op_cert_envelope, TextEnvelope};
use ada_core::exec::ExecutionResult;
use ada_core::{Arg, CardanoCli, CommandBuilder, CommandSpec, Network, OperationContext, RecordingRunner};

pub const COLD_VKEY: [u8; 32] = [9u8; 32];

pub fn ctx(dir: &Path) -> OperationContext {
    OperationContext::builder().cwd(dir)
                               .network(Network::PREPROD)
                               .build()
                               .expect("ctx")
}

pub fn cli(dir: &Path) -> CardanoCli<RecordingRunner> {
    CardanoCli::with_runner(ctx(dir), RecordingRunner::new())
}

/// `cold.skey` y `cold.counter` con el próximo número de emisión `next`.
pub fn seed_cold(dir: &Path, next: u64) {
    key_envelope("StakePoolSigningKey_ed25519", &[1u8; 32]).unwrap()
                                                            .write(&dir.join("cold.skey"))
                                                            .unwrap();
    counter_envelope(next, &COLD_VKEY).unwrap().write(&dir.join("cold.counter")).unwrap();
}

pub fn counter_on_disk(dir: &Path) -> u64 {
    decode_counter(&TextEnvelope::read(&dir.join("cold.counter")).unwrap()).unwrap()
}

fn arg(spec: &CommandSpec, ctx: &OperationContext, a: Arg) -> std::path::PathBuf {
    let (_, params) = CommandBuilder::decode(spec.tokens(), ctx).expect("decode");
    ctx.resolve_path(params.first(a).expect("argumento presente"))
}

/// `node key-gen-KES`: escribe ambas llaves con bytes `seed`.
pub fn script_key_gen(runner: &RecordingRunner, seed: u8) {
    runner.respond_with(move |spec, ctx| {
        let vkey = key_envelope("KesVerificationKey_ed25519_kes_2^6", &[seed; 32]).unwrap();
        let skey = key_envelope("KesSigningKey_ed25519_kes_2^6", &[seed; 64]).unwrap();
        vkey.write_new(&arg(spec, ctx, Arg::VerificationKeyFile)).unwrap();
        skey.write_new(&arg(spec, ctx, Arg::SigningKeyFile)).unwrap();
        Ok(ExecutionResult::ok(""))
    });
}

/// `node issue-op-cert`. `period_skew` altera el periodo escrito y
/// `bump == false` deja el contador sin tocar.
pub fn script_issue(runner: &RecordingRunner, period_skew: u64, bump: bool) {
    runner.respond_with(move |spec, ctx| {
        let counter_path = arg(spec, ctx, Arg::OpCertCounter);
        let counter = decode_counter(&TextEnvelope::read(&counter_path).unwrap()).unwrap();
        let kes_vkey = decode_key_bytes(&TextEnvelope::read(&arg(spec, ctx, Arg::KesVerificationKeyFile)).unwrap()).unwrap();
        let (_, params) = CommandBuilder::decode(spec.tokens(), ctx).unwrap();
        let period: u64 = params.first(Arg::KesPeriod).unwrap().parse().unwrap();
        let cert = op_cert_envelope(&kes_vkey, counter, period + period_skew, &COLD_VKEY).unwrap();
        cert.write_new(&arg(spec, ctx, Arg::OutFile)).unwrap();
        if bump {
            counter_envelope(counter + 1, &COLD_VKEY).unwrap().write(&counter_path).unwrap();
        }
        Ok(ExecutionResult::ok(""))
    });
}
