//! Operaciones tipadas sobre `CardanoCli`.
mod certs;
mod keys;
mod pool;
mod query;
mod tx;

pub use certs::{relays_on_port, DelegationTarget, PoolMetadataRef, PoolRegistration, VoteDecision, VoteTarget};
pub use keys::OpCertRequest;
pub use pool::PoolIdFormat;
pub use tx::{FeeQuery, PollPolicy, TxDraft, TxSource};
