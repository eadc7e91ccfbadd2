use std::path::Path;

use ada_core::command::{ArgKind, Presence};
use ada_core::{Arg, CardanoCli, CommandBuilder, Era, ErrorKind, Network, OperationContext, Operation, Params, RecordingRunner};

fn ctx(dir: &Path, era: Era, legacy: bool) -> OperationContext {
    OperationContext::builder().cwd(dir)
                               .era(era)
                               .legacy(legacy)
                               .network(Network::PREVIEW)
                               .build()
                               .expect("ctx válido")
}

/// Parámetros mínimos válidos para cualquier operación: archivos de entrada
/// creados en `dir`, salidas con nombres distintos.
fn sample_params(op: Operation, dir: &Path) -> Params {
    let desc = op.descriptor();
    let chosen: Vec<_> = desc.one_of.iter().map(|group| group[0]).collect();
    let mut params = Params::new();
    for spec in desc.args {
        let in_group = desc.one_of.iter().any(|g| g.contains(&spec.arg));
        let needed = matches!(spec.presence, Presence::Required | Presence::AtLeastOne) || chosen.contains(&spec.arg);
        if !needed || (in_group && !chosen.contains(&spec.arg)) {
            continue;
        }
        let name = spec.arg.flag().trim_start_matches("--").to_string();
        match spec.kind {
            ArgKind::Switch => params.set_switch(spec.arg),
            ArgKind::InputFile => {
                std::fs::write(dir.join(&name), "{}").unwrap();
                params.push(spec.arg, name);
            }
            ArgKind::OutputFile { .. } => params.push(spec.arg, format!("{name}.out")),
            ArgKind::TxIn => params.push(spec.arg, format!("{}#0", "a".repeat(64))),
            ArgKind::UInt | ArgKind::Amount => params.push(spec.arg, "7"),
            ArgKind::Hex => params.push(spec.arg, "abcd"),
            ArgKind::Choice(options) => params.push(spec.arg, options[0]),
            ArgKind::Text => params.push(spec.arg, "addr_test1xyz"),
            ArgKind::Margin => params.push(spec.arg, "0.015"),
            ArgKind::MetadataUrl => params.push(spec.arg, "https://example.org/pool.json"),
            ArgKind::Relay => params.push(spec.arg, "ipv4:192.0.2.1:3001"),
        }
    }
    params
}

/// Todos los argumentos que declara la operación: opcionales incluidos y dos
/// valores distintos en los repetibles. `pick` elige el miembro de cada grupo
/// "exactamente uno".
fn full_params(op: Operation, dir: &Path, pick: usize) -> Params {
    let desc = op.descriptor();
    let chosen: Vec<_> = desc.one_of.iter().map(|group| group[pick % group.len()]).collect();
    let mut params = Params::new();
    for spec in desc.args {
        let in_group = desc.one_of.iter().any(|g| g.contains(&spec.arg));
        if in_group && !chosen.contains(&spec.arg) {
            continue;
        }
        let count = match spec.presence {
            Presence::Repeated | Presence::AtLeastOne => 2,
            Presence::Required | Presence::Optional => 1,
        };
        let name = spec.arg.flag().trim_start_matches("--").to_string();
        for k in 0..count {
            match spec.kind {
                ArgKind::Switch => params.set_switch(spec.arg),
                ArgKind::InputFile => {
                    let file = format!("{name}-{k}");
                    std::fs::write(dir.join(&file), "{}").unwrap();
                    params.push(spec.arg, file);
                }
                ArgKind::OutputFile { .. } => params.push(spec.arg, format!("{name}-{k}.out")),
                ArgKind::TxIn => params.push(spec.arg, format!("{}#{k}", ["a", "b"][k].repeat(64))),
                ArgKind::UInt | ArgKind::Amount => params.push(spec.arg, (7 + k).to_string()),
                ArgKind::Hex => params.push(spec.arg, ["abcd", "ef01"][k]),
                ArgKind::Choice(options) => params.push(spec.arg, options[k % options.len()]),
                ArgKind::Text => params.push(spec.arg, format!("addr_test1xyz+{}", 1_000_000 + k)),
                ArgKind::Margin => params.push(spec.arg, ["0.015", "1"][k]),
                ArgKind::MetadataUrl => params.push(spec.arg, format!("https://example.org/{k}.json")),
                ArgKind::Relay => params.push(spec.arg, ["ipv4:192.0.2.1:3001", "dns:relay1.example.org:3002"][k]),
            }
        }
    }
    params
}

#[test]
fn legacy_group_and_era_flag_lead_every_operation() {
    let dir = tempfile::tempdir().unwrap();
    let c = ctx(dir.path(), Era::Babbage, true);
    for op in Operation::ALL {
        let params = sample_params(op, dir.path());
        match CommandBuilder::build(op, &params, &c) {
            Ok(spec) => {
                let tokens = spec.tokens();
                let path = op.descriptor().path_for(true).expect("ruta legacy");
                assert_eq!(tokens[0], "legacy", "{}: primer token", op.name());
                assert_eq!(&tokens[1..1 + path.len()], path, "{}: subcomando", op.name());
                assert_eq!(tokens[1 + path.len()], "--babbage-era", "{}: flag de era tras el subcomando", op.name());
            }
            Err(e) => {
                assert!(op.descriptor().legacy_path.is_none(), "{}: {e}", op.name());
                assert_eq!(e.kind(), ErrorKind::Configuration);
            }
        }
    }
}

#[test]
fn modern_rendering_has_no_era_flag_and_network_only_where_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let c = ctx(dir.path(), Era::Conway, false);
    for op in Operation::ALL {
        let spec = CommandBuilder::build(op, &sample_params(op, dir.path()), &c).expect(op.name());
        let tokens = spec.tokens();
        assert_eq!(tokens[0], "conway");
        assert!(!tokens.iter().any(|t| t.ends_with("-era")), "{}: sin flag de era", op.name());
        let has_net = tokens.windows(2).any(|w| w == ["--testnet-magic", "2"]);
        assert_eq!(has_net, op.descriptor().takes_network, "{}: red", op.name());
    }
}

#[test]
fn decode_recovers_operation_and_params() {
    let dir = tempfile::tempdir().unwrap();
    for (era, legacy) in [(Era::Conway, false), (Era::Babbage, true), (Era::Latest, false)] {
        let c = ctx(dir.path(), era, legacy);
        for op in Operation::ALL {
            let params = sample_params(op, dir.path());
            let Ok(spec) = CommandBuilder::build(op, &params, &c) else { continue };
            let (decoded_op, decoded) = CommandBuilder::decode(spec.tokens(), &c).expect("decode");
            assert_eq!(decoded_op, op);
            assert_eq!(decoded, params, "{} ({era}, legacy={legacy})", op.name());
        }
    }
}

#[test]
fn decode_recovers_every_optional_and_repeated_argument() {
    let dir = tempfile::tempdir().unwrap();
    for (era, legacy) in [(Era::Conway, false), (Era::Babbage, true), (Era::Latest, false)] {
        let c = ctx(dir.path(), era, legacy);
        for op in Operation::ALL {
            if op.descriptor().path_for(legacy).is_none() {
                continue;
            }
            for pick in 0..3 {
                let params = full_params(op, dir.path(), pick);
                let spec = CommandBuilder::build(op, &params, &c).unwrap_or_else(|e| panic!("{} ({era}, legacy={legacy}): {e}", op.name()));
                let (decoded_op, decoded) = CommandBuilder::decode(spec.tokens(), &c).expect("decode");
                assert_eq!(decoded_op, op);
                assert_eq!(decoded, params, "{} ({era}, legacy={legacy}, pick={pick})", op.name());
            }
        }
    }
}

#[test]
fn build_raw_keeps_repeated_values_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let c = ctx(dir.path(), Era::Conway, false);
    let params = full_params(Operation::TxBuildRaw, dir.path(), 0);
    let spec = CommandBuilder::build(Operation::TxBuildRaw, &params, &c).unwrap();
    let a = format!("{}#0", "a".repeat(64));
    let b = format!("{}#1", "b".repeat(64));
    let expected = ["conway", "transaction", "build-raw",
                    "--tx-in", a.as_str(), "--tx-in", b.as_str(),
                    "--tx-out", "addr_test1xyz+1000000", "--tx-out", "addr_test1xyz+1000001",
                    "--invalid-before", "7", "--invalid-hereafter", "7", "--fee", "7",
                    "--certificate-file", "certificate-file-0", "--certificate-file", "certificate-file-1",
                    "--withdrawal", "addr_test1xyz+1000000", "--withdrawal", "addr_test1xyz+1000001",
                    "--metadata-json-file", "metadata-json-file-0", "--out-file", "out-file-0.out"];
    assert_eq!(spec.tokens(), expected);
}

#[test]
fn pool_registration_expands_each_relay_with_its_port() {
    let dir = tempfile::tempdir().unwrap();
    let c = ctx(dir.path(), Era::Babbage, true);
    let params = full_params(Operation::StakePoolRegistrationCert, dir.path(), 0);
    let spec = CommandBuilder::build(Operation::StakePoolRegistrationCert, &params, &c).unwrap();
    let tokens = spec.tokens();
    let relay_at = tokens.iter().position(|t| t == "--pool-relay-ipv4").expect("relay ipv4");
    assert_eq!(&tokens[relay_at..relay_at + 8],
               ["--pool-relay-ipv4", "192.0.2.1", "--pool-relay-port", "3001",
                "--single-host-pool-relay", "relay1.example.org", "--pool-relay-port", "3002"]);
    assert_eq!(tokens.iter().filter(|t| *t == "--pool-owner-stake-verification-key-file").count(), 2);
    assert!(!tokens.iter().any(|t| t == "--pool-relay"), "el nombre lógico nunca llega al CLI");
    assert!(tokens.ends_with(&["--testnet-magic".to_string(), "2".to_string()]));
}

/// Copia de `base` con los valores de `arg` reemplazados.
fn replacing(base: &Params, arg: Arg, values: &[&str]) -> Params {
    let mut p = Params::new();
    for a in base.args().into_iter().filter(|a| *a != arg) {
        for v in base.values(a) {
            p.push(a, v.as_str());
        }
    }
    for v in values {
        p.push(arg, *v);
    }
    p
}

#[test]
fn pool_registration_values_are_checked_locally() {
    let dir = tempfile::tempdir().unwrap();
    let c = ctx(dir.path(), Era::Conway, false);
    let base = full_params(Operation::StakePoolRegistrationCert, dir.path(), 0);
    let long_url = format!("https://example.org/{}", "m".repeat(45));
    assert_eq!(long_url.len(), 65);
    let cases = [replacing(&base, Arg::MetadataUrl, &[long_url.as_str()]),
                 replacing(&base, Arg::PoolMargin, &["1.5"]),
                 replacing(&base, Arg::PoolRelay, &["ipv4:192.0.2.300:3001"]),
                 replacing(&base, Arg::PoolRelay, &[]),
                 replacing(&base, Arg::PoolOwnerStakeVerificationKeyFile, &[])];
    for params in cases {
        let err = CommandBuilder::build(Operation::StakePoolRegistrationCert, &params, &c).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters, "{err}");
    }
    let at_limit = format!("https://example.org/{}", "m".repeat(44));
    assert!(CommandBuilder::build(Operation::StakePoolRegistrationCert,
                                  &replacing(&base, Arg::MetadataUrl, &[at_limit.as_str()]),
                                  &c).is_ok());
}

#[test]
fn governance_vote_takes_exactly_one_decision() {
    let dir = tempfile::tempdir().unwrap();
    let c = ctx(dir.path(), Era::Conway, false);
    let params = full_params(Operation::GovernanceVoteCreate, dir.path(), 1);
    let spec = CommandBuilder::build(Operation::GovernanceVoteCreate, &params, &c).unwrap();
    assert_eq!(&spec.tokens()[..5], ["conway", "governance", "vote", "create", "--no"]);
    let both = params.clone().with_switch(Arg::Yes);
    let err = CommandBuilder::build(Operation::GovernanceVoteCreate, &both, &c).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameters);
}

#[test]
fn missing_signing_key_fails_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tx.raw"), "{}").unwrap();
    let cli = CardanoCli::with_runner(ctx(dir.path(), Era::Conway, false), RecordingRunner::new());
    let err = cli.sign("tx.raw", &["nope.skey"], "tx.signed").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    assert!(err.to_string().contains("nope.skey"), "el mensaje debe nombrar el archivo: {err}");
    assert_eq!(cli.runner().spawn_count(), 0, "no debe lanzarse ningún proceso");
}

#[test]
fn key_gen_refuses_to_overwrite_existing_keys() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("kes.skey"), "secret").unwrap();
    let cli = CardanoCli::with_runner(ctx(dir.path(), Era::Conway, false), RecordingRunner::new());
    let err = cli.kes_key_gen("kes.vkey", "kes.skey").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    assert_eq!(std::fs::read_to_string(dir.path().join("kes.skey")).unwrap(), "secret");
    assert_eq!(cli.runner().spawn_count(), 0);
}

#[test]
fn malformed_values_are_rejected_locally() {
    let dir = tempfile::tempdir().unwrap();
    let c = ctx(dir.path(), Era::Conway, false);
    let cases = [(Operation::QueryUtxo, Params::new().with(Arg::TxIn, "abc#0")),
                 (Operation::QueryUtxo, Params::new().with(Arg::Address, "--mainnet")),
                 (Operation::StakePoolDeregistrationCert,
                  Params::new().with(Arg::Epoch, "-1")),
                 (Operation::QueryTip, Params::new().with_switch(Arg::OutputJson))];
    for (op, params) in cases {
        let err = CommandBuilder::build(op, &params, &c).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters, "{}: {err}", op.name());
    }
}
