//! ada-core: capa de automatización sobre `cardano-cli`.
//!
//! Configuración → construcción de comando → ejecución → parseo de salida.
pub mod client;
pub mod command;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod exec;
pub mod ops;
pub mod parse;
pub mod retry;

pub use client::CardanoCli;
pub use command::{Arg, CommandBuilder, CommandSpec, Connectivity, Operation, Params};
pub use config::{ContextResolver, ContextStamp, Era, Network, OperationContext};
pub use errors::{AdaError, AdaResult, ErrorKind};
pub use exec::{CommandRunner, ExecutionResult, ProcessExecutor, RecordingRunner};
pub use ops::{relays_on_port, DelegationTarget, FeeQuery, OpCertRequest, PoolIdFormat, PoolMetadataRef, PoolRegistration, PollPolicy, TxDraft, TxSource, VoteDecision, VoteTarget};
pub use parse::OutputParser;
pub use retry::RetryPolicy;

#[cfg(test)]
mod tests {
    use super::*;
    use ada_domain::Quantity;
    use std::time::Duration;

    fn offline_ctx(dir: &std::path::Path) -> OperationContext {
        OperationContext::builder().cwd(dir)
                                   .network(Network::PREPROD)
                                   .build()
                                   .expect("ctx")
    }

    fn quick_retry() -> RetryPolicy {
        RetryPolicy { max_attempts: 3,
                      delay: Duration::ZERO }
    }

    #[test]
    fn min_fee_goes_through_build_execute_parse() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tx.raw"), "{}").unwrap();
        std::fs::write(dir.path().join("pp.json"), "{}").unwrap();
        let runner = RecordingRunner::new();
        runner.respond_ok("174433 Lovelace\n");
        let cli = CardanoCli::with_runner(offline_ctx(dir.path()), runner);
        let fee = cli.min_fee("tx.raw", "pp.json", 1, 2, 1).expect("fee");
        assert_eq!(fee, Quantity::from(174_433u64));
        let calls = cli.runner().calls();
        assert_eq!(calls.len(), 1, "una sola invocación");
        assert_eq!(&calls[0][..3], &["conway", "transaction", "calculate-min-fee"]);
        assert!(calls[0].windows(2).any(|w| w == ["--testnet-magic", "1"]), "la red debe aparecer");
    }

    #[test]
    fn idempotent_read_is_retried_on_transient_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tx.signed"), "{}").unwrap();
        let runner = RecordingRunner::new();
        runner.respond_failure(1, "MuxError (MuxIOException)");
        runner.respond_ok(&format!("{}\n", "ab".repeat(32)));
        let cli = CardanoCli::with_runner(offline_ctx(dir.path()), runner).with_read_retry(quick_retry());
        let id = cli.txid(&TxSource::Signed("tx.signed".into())).expect("txid tras reintento");
        assert_eq!(id, "ab".repeat(32));
        assert_eq!(cli.runner().spawn_count(), 2);
    }

    #[test]
    fn submit_is_never_retried() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tx.signed"), "{}").unwrap();
        let sock = dir.path().join("node.socket");
        let ctx = OperationContext::builder().cwd(dir.path())
                                             .socket_path(&sock)
                                             .build()
                                             .expect("ctx");
        let runner = RecordingRunner::new();
        runner.respond_failure(1, "MuxError (MuxIOException)");
        runner.respond_ok("Transaction successfully submitted.");
        let cli = CardanoCli::with_runner(ctx, runner).with_read_retry(quick_retry());
        // Sin socket real la precondición falla antes de lanzar nada.
        let err = cli.submit("tx.signed").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SocketUnavailable);
        assert_eq!(cli.runner().spawn_count(), 0);
        assert_eq!(cli.runner().pending_responses(), 2);
    }
}
