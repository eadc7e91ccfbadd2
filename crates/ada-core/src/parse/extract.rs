//! Extractores: valor intermedio → `ParsedValue` según el tipo declarado.
//!
//! Campos requeridos ausentes son error; campos extra se ignoran. Los
//! enteros deben ser literales enteros (nunca flotantes).
use std::path::Path;

use ada_domain::{Balance, CertificateInfo, ChainTip, KesValidity, KeyMaterial, KeyRole, KeyType, ParsedValue, Quantity, StakeAddressInfo, TxIn, UtxoSet, ValueKind};
use serde_json::{Map, Value};

use crate::command::{Arg, Operation, Params};
use crate::config::OperationContext;
use crate::parse::decode::Decoded;

fn object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, String> {
    value.as_object().ok_or_else(|| format!("{what}: expected a json object"))
}

fn integer_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            let s = n.to_string();
            let body = s.strip_prefix('-').unwrap_or(&s);
            (!body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())).then_some(s)
        }
        _ => None,
    }
}

fn req<'a>(map: &'a Map<String, Value>, field: &str) -> Result<&'a Value, String> {
    map.get(field).filter(|v| !v.is_null()).ok_or_else(|| format!("missing required field '{field}'"))
}

fn req_u64(map: &Map<String, Value>, field: &str) -> Result<u64, String> {
    let v = req(map, field)?;
    integer_text(v).and_then(|s| s.parse::<u64>().ok())
                   .ok_or_else(|| format!("field '{field}' is not an unsigned integer: {v}"))
}

fn opt_u64(map: &Map<String, Value>, field: &str) -> Result<Option<u64>, String> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => req_u64(map, field).map(Some),
    }
}

fn quantity(v: &Value, what: &str) -> Result<Quantity, String> {
    integer_text(v).ok_or_else(|| format!("{what} is not an integer: {v}"))?
                   .parse()
                   .map_err(|e| format!("{what}: {e}"))
}

fn opt_string(map: &Map<String, Value>, field: &str) -> Option<String> {
    match map.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

pub(crate) fn chain_tip(value: &Value) -> Result<ChainTip, String> {
    let map = object(value, "tip")?;
    Ok(ChainTip { slot: req_u64(map, "slot")?,
                  block: req_u64(map, "block")?,
                  epoch: req_u64(map, "epoch")?,
                  era: opt_string(map, "era"),
                  hash: opt_string(map, "hash"),
                  sync_progress: opt_string(map, "syncProgress") })
}

fn balance_from_value(tx_in: &str, value: &Value) -> Result<Balance, String> {
    let assets = object(value, tx_in)?;
    let mut balance = Balance::lovelace(quantity(req(assets, "lovelace")?, "lovelace")?);
    for (policy, tokens) in assets.iter().filter(|(k, _)| k.as_str() != "lovelace") {
        for (name, amount) in object(tokens, policy)? {
            balance.add_asset(policy, name, quantity(amount, name)?);
        }
    }
    Ok(balance)
}

pub(crate) fn utxos(value: &Value) -> Result<UtxoSet, String> {
    let map = object(value, "utxo")?;
    let mut set = UtxoSet::new();
    for (key, entry) in map {
        let tx_in: TxIn = key.parse().map_err(|e| format!("{e}"))?;
        let entry = object(entry, key)?;
        set.insert(tx_in, balance_from_value(key, req(entry, "value")?)?);
    }
    Ok(set)
}

/// `query kes-period-info`: contador en disco y periodo de inicio requeridos.
pub(crate) fn certificate(value: &Value, notes: Vec<String>) -> Result<CertificateInfo, String> {
    let map = object(value, "kes-period-info")?;
    let mut info = CertificateInfo::new(req_u64(map, "qKesOnDiskOperationalCertificateNumber")?,
                                        req_u64(map, "qKesStartKesInterval")?);
    info.node_state_counter = opt_u64(map, "qKesNodeStateOperationalCertificateNumber")?;
    if let (Some(current), Some(end)) = (opt_u64(map, "qKesCurrentKesPeriod")?, opt_u64(map, "qKesEndKesInterval")?) {
        info.validity = Some(KesValidity { current_kes_period: current,
                                           end_kes_period: end,
                                           expiry: opt_string(map, "qKesKesKeyExpiry") });
    }
    info.notes = notes;
    Ok(info)
}

pub(crate) fn stake_addresses(value: &Value) -> Result<Vec<StakeAddressInfo>, String> {
    let entries = value.as_array().ok_or("stake-address-info: expected a json array")?;
    entries.iter()
           .map(|e| -> Result<StakeAddressInfo, String> {
               let map = object(e, "stake-address-info entry")?;
               let address = req(map, "address")?.as_str().ok_or("field 'address' is not a string")?.to_string();
               let deposit = ["delegationDeposit", "stakeRegistrationDeposit"].iter()
                                                                              .find_map(|k| map.get(*k).filter(|v| !v.is_null()))
                                                                              .map(|v| quantity(v, "deposit"))
                                                                              .transpose()?;
               Ok(StakeAddressInfo { address,
                                     reward_balance: quantity(req(map, "rewardAccountBalance")?, "rewardAccountBalance")?,
                                     delegation: opt_string(map, "delegation").or_else(|| opt_string(map, "stakeDelegation")),
                                     deposit,
                                     vote_delegation: opt_string(map, "voteDelegation") })
           })
           .collect()
}

fn is_tx_hash(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Hash blake2b-224: policy ids y hashes de llave.
fn is_hash28(s: &str) -> bool {
    s.len() == 56 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Descriptor de archivos de llave que produce cada operación de key-gen.
pub(crate) fn key_outputs(op: Operation) -> &'static [(Arg, KeyType, KeyRole)] {
    match op {
        Operation::AddressKeyGen => &[(Arg::VerificationKeyFile, KeyType::Payment, KeyRole::Verification),
                                      (Arg::SigningKeyFile, KeyType::Payment, KeyRole::Signing)],
        Operation::StakeAddressKeyGen => &[(Arg::VerificationKeyFile, KeyType::Stake, KeyRole::Verification),
                                           (Arg::SigningKeyFile, KeyType::Stake, KeyRole::Signing)],
        Operation::NodeKeyGen => &[(Arg::ColdVerificationKeyFile, KeyType::StakePoolCold, KeyRole::Verification),
                                   (Arg::ColdSigningKeyFile, KeyType::StakePoolCold, KeyRole::Signing),
                                   (Arg::OpCertCounterFile, KeyType::OpCertCounter, KeyRole::Counter)],
        Operation::NodeKeyGenKes => &[(Arg::VerificationKeyFile, KeyType::Kes, KeyRole::Verification),
                                      (Arg::SigningKeyFile, KeyType::Kes, KeyRole::Signing)],
        Operation::NodeKeyGenVrf => &[(Arg::VerificationKeyFile, KeyType::Vrf, KeyRole::Verification),
                                      (Arg::SigningKeyFile, KeyType::Vrf, KeyRole::Signing)],
        _ => &[],
    }
}

/// Las llaves se describen a partir de los parámetros; tras un éxito los
/// archivos deben existir.
pub(crate) fn key_material(op: Operation, params: &Params, ctx: &OperationContext) -> Result<Vec<KeyMaterial>, String> {
    key_outputs(op).iter()
                   .map(|(arg, key_type, role)| -> Result<KeyMaterial, String> {
                       let path = params.first(*arg).ok_or_else(|| format!("missing {}", arg.flag()))?;
                       let full = ctx.resolve_path(path);
                       if !full.is_file() {
                           return Err(format!("declared output {} was not written", full.display()));
                       }
                       Ok(KeyMaterial::new(Path::new(path), *key_type, *role))
                   })
                   .collect()
}

pub(crate) fn extract(kind: ValueKind, decoded: Decoded) -> Result<ParsedValue, String> {
    match (kind, decoded) {
        (ValueKind::ChainTip, Decoded::Structured { value, .. }) => chain_tip(&value).map(ParsedValue::ChainTip),
        (ValueKind::Utxos, Decoded::Structured { value, .. }) => utxos(&value).map(ParsedValue::Utxos),
        (ValueKind::Utxos, Decoded::Utxos(set)) => Ok(ParsedValue::Utxos(set)),
        (ValueKind::Balance, Decoded::Structured { value, .. }) => utxos(&value).map(|s| ParsedValue::Balance(s.total())),
        (ValueKind::Balance, Decoded::Utxos(set)) => Ok(ParsedValue::Balance(set.total())),
        (ValueKind::CertificateInfo, Decoded::Structured { value, notes }) => certificate(&value, notes).map(ParsedValue::CertificateInfo),
        (ValueKind::Fee, Decoded::Integer(q)) => Ok(ParsedValue::Fee(q)),
        (ValueKind::Fee, Decoded::Structured { value, .. }) => {
            let map = object(&value, "fee")?;
            quantity(req(map, "fee")?, "fee").map(ParsedValue::Fee)
        }
        (ValueKind::Lovelace, Decoded::Integer(q)) if !q.is_negative() => Ok(ParsedValue::Lovelace(q)),
        (ValueKind::Hash, Decoded::Token(t)) if is_hash28(&t) => Ok(ParsedValue::Hash(t.to_lowercase())),
        (ValueKind::TxId, Decoded::Token(t)) if is_tx_hash(&t) => Ok(ParsedValue::TxId(t.to_lowercase())),
        (ValueKind::TxId, Decoded::Structured { value, .. }) => {
            let map = object(&value, "txid")?;
            let hash = req(map, "txhash")?.as_str().filter(|s| is_tx_hash(s)).ok_or("field 'txhash' is not a tx hash")?;
            Ok(ParsedValue::TxId(hash.to_lowercase()))
        }
        (ValueKind::StakeAddresses, Decoded::Structured { value, .. }) => stake_addresses(&value).map(ParsedValue::StakeAddresses),
        (ValueKind::Json, Decoded::Structured { value, .. }) => Ok(ParsedValue::Json(value)),
        (ValueKind::Raw, Decoded::Token(t)) => Ok(ParsedValue::Raw(t)),
        (ValueKind::Raw, Decoded::Text(t)) => Ok(ParsedValue::Raw(t)),
        (kind, other) => Err(format!("{kind:?} cannot be built from {}", decoded_name(&other))),
    }
}

fn decoded_name(d: &Decoded) -> &'static str {
    match d {
        Decoded::Structured { .. } => "structured output",
        Decoded::Utxos(_) => "a utxo table",
        Decoded::Integer(_) => "an integer",
        Decoded::Token(_) => "a single token",
        Decoded::Text(_) => "free text",
    }
}
