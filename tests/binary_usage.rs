use std::process::{Command, Output};

fn adaops(dir: &std::path::Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_adaops"));
    cmd.args(args)
       .current_dir(dir)
       .env_remove("CARDANO_NODE_SOCKET_PATH")
       .env_remove("CARDANO_ERA")
       .env_remove("ADAOPS_CWD");
    for (k, v) in envs {
        cmd.env(k, v);
    }
    cmd.output().expect("lanzar adaops")
}

#[test]
fn usage_errors_exit_with_two() {
    let dir = tempfile::tempdir().unwrap();
    let out = adaops(dir.path(), &[], &[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Uso:"));
    let out = adaops(dir.path(), &["rotate-kes", "--kes-period", "3"], &[]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn online_query_without_socket_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = adaops(dir.path(), &["tip"], &[]);
    assert_eq!(out.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&out.stderr).contains("CARDANO_NODE_SOCKET_PATH"));
}

#[cfg(unix)]
#[test]
fn offline_rotation_reports_the_failed_step_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = adaops(dir.path(),
                     &["rotate-kes", "--cold-skey", "cold.skey", "--counter", "cold.counter", "--kes-period", "412"],
                     &[("ADAOPS_CARDANO_CLI", "/bin/false")]);
    assert_eq!(out.status.code(), Some(4), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let state: serde_json::Value = serde_json::from_slice(&out.stdout).expect("estado en JSON");
    assert_eq!(state["kes_period"], 412);
    assert!(state["stage"].get("Failed").is_some(), "{state}");
    assert!(!dir.path().join("kes.vkey").exists());
}
