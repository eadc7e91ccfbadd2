//! ada-domain: tipos de valor devueltos por la capa de orquestación del CLI.
//!
//! Nada en este crate lanza procesos ni lee configuración: sólo modela lo
//! que el CLI declara en su salida (tip, saldos, llaves, certificados) y las
//! reglas locales puras sobre esos valores (aritmética de lovelace, periodo
//! KES, validación de metadata de pool).
pub mod error;
pub mod quantity;
pub mod tip;
pub mod balance;
pub mod keys;
pub mod certificate;
pub mod genesis;
pub mod pool;
pub mod stake;
pub mod value;

pub use error::DomainError;
pub use quantity::{Quantity, LOVELACE_PER_ADA};
pub use tip::ChainTip;
pub use balance::{change, Balance, TxIn, UtxoSet};
pub use keys::{KeyMaterial, KeyRole, KeyType};
pub use certificate::{CertificateInfo, KesValidity};
pub use genesis::{current_kes_period, ShelleyGenesis};
pub use pool::{asset_name_from_hex, asset_name_to_hex, check_margin, check_metadata_url, PoolMetadata, PoolRelay, MAX_METADATA_URL_BYTES};
pub use stake::StakeAddressInfo;
pub use value::{ParsedValue, ValueKind};
