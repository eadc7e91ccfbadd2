//! Text envelopes del CLI (`{"type", "description", "cborHex"}`).
//!
//! Sólo se decodifica lo necesario para verificar una rotación KES: el
//! contador de emisión del archivo de contador y los campos de un
//! certificado operacional. No hay criptografía aquí: la firma se trata
//! como bytes opacos.
use std::fs::OpenOptions;
use std::io::{Cursor, Write};
use std::path::Path;

use ciborium::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OP_CERT_TYPE: &str = "NodeOperationalCertificate";
pub const COUNTER_TYPE: &str = "NodeOperationalCertificateIssueCounter";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("cannot read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("malformed text envelope: {0}")]
    Malformed(String),
    #[error("expected envelope type {expected}, found {found}")]
    WrongType { expected: String, found: String },
    #[error("unexpected cbor: {0}")]
    Cbor(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "cborHex")]
    pub cbor_hex: String,
}

impl TextEnvelope {
    pub fn from_json(raw: &str) -> Result<Self, EnvelopeError> {
        serde_json::from_str(raw).map_err(|e| EnvelopeError::Malformed(e.to_string()))
    }

    pub fn read(path: &Path) -> Result<Self, EnvelopeError> {
        let raw = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        Self::from_json(&raw)
    }

    pub fn cbor(&self) -> Result<Vec<u8>, EnvelopeError> {
        hex::decode(self.cbor_hex.trim()).map_err(|e| EnvelopeError::Malformed(format!("cborHex: {e}")))
    }

    fn expect_type(&self, expected: &str) -> Result<(), EnvelopeError> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(EnvelopeError::WrongType { expected: expected.to_string(),
                                           found: self.kind.clone() })
        }
    }

    pub fn to_json(&self) -> Result<String, EnvelopeError> {
        serde_json::to_string_pretty(self).map_err(|e| EnvelopeError::Malformed(e.to_string()))
    }

    /// Sobrescribe `path` (los archivos de contador se reescriben en cada emisión).
    pub fn write(&self, path: &Path) -> Result<(), EnvelopeError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| io_error(path, e))
    }

    /// Crea `path`; falla si ya existe.
    pub fn write_new(&self, path: &Path) -> Result<(), EnvelopeError> {
        let json = self.to_json()?;
        let mut f = OpenOptions::new().write(true)
                                      .create_new(true)
                                      .open(path)
                                      .map_err(|e| io_error(path, e))?;
        f.write_all(json.as_bytes()).map_err(|e| io_error(path, e))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> EnvelopeError {
    EnvelopeError::Io { path: path.display().to_string(),
                        reason: e.to_string() }
}

/// Campos de un certificado operacional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpCertFields {
    pub kes_vkey: Vec<u8>,
    pub issue_counter: u64,
    pub kes_period: u64,
}

/// `[[kes_vkey, counter, kes_period, sigma], cold_vkey]`
pub fn decode_op_cert(env: &TextEnvelope) -> Result<OpCertFields, EnvelopeError> {
    env.expect_type(OP_CERT_TYPE)?;
    let value = decode_cbor(&env.cbor()?)?;
    let [body, cold_vkey] = items::<2>(&value, "operational certificate")?;
    let [kes_vkey, counter, kes_period, sigma] = items::<4>(body, "certificate body")?;
    bytes(sigma, "sigma")?;
    bytes(cold_vkey, "cold verification key")?;
    Ok(OpCertFields { kes_vkey: bytes(kes_vkey, "KES verification key")?,
                      issue_counter: uint(counter, "issue counter")?,
                      kes_period: uint(kes_period, "KES period")? })
}

/// `[counter, cold_vkey]`: próximo número de emisión.
pub fn decode_counter(env: &TextEnvelope) -> Result<u64, EnvelopeError> {
    env.expect_type(COUNTER_TYPE)?;
    let value = decode_cbor(&env.cbor()?)?;
    let [counter, cold_vkey] = items::<2>(&value, "issue counter")?;
    bytes(cold_vkey, "cold verification key")?;
    uint(counter, "issue counter")
}

pub fn counter_envelope(counter: u64, cold_vkey: &[u8]) -> Result<TextEnvelope, EnvelopeError> {
    let value = Value::Array(vec![Value::Integer(counter.into()), Value::Bytes(cold_vkey.to_vec())]);
    Ok(TextEnvelope { kind: COUNTER_TYPE.to_string(),
                      description: format!("Next certificate issue number: {counter}"),
                      cbor_hex: encode_cbor(&value)? })
}

/// Certificado con firma en cero; sirve para fixtures y simulaciones.
pub fn op_cert_envelope(kes_vkey: &[u8], counter: u64, kes_period: u64, cold_vkey: &[u8]) -> Result<TextEnvelope, EnvelopeError> {
    let body = Value::Array(vec![Value::Bytes(kes_vkey.to_vec()),
                                 Value::Integer(counter.into()),
                                 Value::Integer(kes_period.into()),
                                 Value::Bytes(vec![0u8; 64])]);
    let value = Value::Array(vec![body, Value::Bytes(cold_vkey.to_vec())]);
    Ok(TextEnvelope { kind: OP_CERT_TYPE.to_string(),
                      description: String::new(),
                      cbor_hex: encode_cbor(&value)? })
}

/// Llave (vkey/skey) cuyo `cborHex` es un único byte string.
pub fn decode_key_bytes(env: &TextEnvelope) -> Result<Vec<u8>, EnvelopeError> {
    bytes(&decode_cbor(&env.cbor()?)?, "key")
}

pub fn key_envelope(kind: &str, key: &[u8]) -> Result<TextEnvelope, EnvelopeError> {
    Ok(TextEnvelope { kind: kind.to_string(),
                      description: String::new(),
                      cbor_hex: encode_cbor(&Value::Bytes(key.to_vec()))? })
}

/// Un único item CBOR; bytes sobrantes son error.
fn decode_cbor(raw: &[u8]) -> Result<Value, EnvelopeError> {
    let mut cursor = Cursor::new(raw);
    let value: Value = ciborium::from_reader(&mut cursor).map_err(|e| EnvelopeError::Cbor(e.to_string()))?;
    if cursor.position() != raw.len() as u64 {
        return Err(EnvelopeError::Cbor(format!("{} trailing bytes", raw.len() as u64 - cursor.position())));
    }
    Ok(value)
}

fn encode_cbor(value: &Value) -> Result<String, EnvelopeError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| EnvelopeError::Cbor(e.to_string()))?;
    Ok(hex::encode(buf))
}

fn items<'a, const N: usize>(value: &'a Value, what: &str) -> Result<&'a [Value; N], EnvelopeError> {
    match value {
        Value::Array(items) => {
            items.as_slice()
                 .try_into()
                 .map_err(|_| EnvelopeError::Cbor(format!("{what}: expected array of {N}, found {}", items.len())))
        }
        _ => Err(EnvelopeError::Cbor(format!("{what}: expected array"))),
    }
}

fn uint(value: &Value, what: &str) -> Result<u64, EnvelopeError> {
    match value {
        Value::Integer(i) => u64::try_from(*i).map_err(|_| EnvelopeError::Cbor(format!("{what}: not an unsigned integer"))),
        _ => Err(EnvelopeError::Cbor(format!("{what}: expected integer"))),
    }
}

fn bytes(value: &Value, what: &str) -> Result<Vec<u8>, EnvelopeError> {
    match value {
        Value::Bytes(b) => Ok(b.clone()),
        _ => Err(EnvelopeError::Cbor(format!("{what}: expected byte string"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_file_from_cli_decodes() {
        // formato real de `node key-gen`: contador 0 y vkey de 32 bytes
        let raw = r#"{
            "type": "NodeOperationalCertificateIssueCounter",
            "description": "Next certificate issue number: 0",
            "cborHex": "82005820a5b8c1e1c1a4f0b2c8d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5"
        }"#;
        let env = TextEnvelope::from_json(raw).unwrap();
        assert_eq!(decode_counter(&env).unwrap(), 0);
    }

    #[test]
    fn op_cert_fields_survive_encoding() {
        let env = op_cert_envelope(&[7u8; 32], 5, 1_000, &[9u8; 32]).unwrap();
        let f = decode_op_cert(&env).unwrap();
        assert_eq!(f.issue_counter, 5);
        assert_eq!(f.kes_period, 1_000);
        assert_eq!(f.kes_vkey, vec![7u8; 32]);
        assert!(matches!(decode_counter(&env), Err(EnvelopeError::WrongType { .. })));
    }

    #[test]
    fn kes_vkey_bytes_match_the_certificate() {
        let vkey = key_envelope("KesVerificationKey_ed25519_kes_2^6", &[3u8; 32]).unwrap();
        let cert = op_cert_envelope(&decode_key_bytes(&vkey).unwrap(), 0, 10, &[9u8; 32]).unwrap();
        assert_eq!(decode_op_cert(&cert).unwrap().kes_vkey, decode_key_bytes(&vkey).unwrap());
    }

    #[test]
    fn indefinite_length_arrays_are_accepted() {
        let mut env = op_cert_envelope(&[1u8; 32], 3, 412, &[2u8; 32]).unwrap();
        // 0x82 (array de 2) -> 0x9f ... 0xff (largo indefinido)
        assert!(env.cbor_hex.starts_with("82"), "{}", env.cbor_hex);
        env.cbor_hex = format!("9f{}ff", &env.cbor_hex[2..]);
        let f = decode_op_cert(&env).expect("CBOR válido con largo indefinido");
        assert_eq!((f.issue_counter, f.kes_period), (3, 412));
        assert_eq!(f.kes_vkey, vec![1u8; 32]);
    }

    #[test]
    fn truncated_or_padded_cbor_is_an_error() {
        let mut env = counter_envelope(70_000, &[1u8; 32]).unwrap();
        assert_eq!(decode_counter(&env).unwrap(), 70_000);
        let full = env.cbor_hex.clone();
        env.cbor_hex.truncate(full.len() - 2);
        assert!(matches!(decode_counter(&env), Err(EnvelopeError::Cbor(_))));
        env.cbor_hex = format!("{full}00");
        assert!(matches!(decode_counter(&env), Err(EnvelopeError::Cbor(_))));
    }

    #[test]
    fn negative_counter_is_rejected() {
        // [-1, h'01']
        let env = TextEnvelope { kind: COUNTER_TYPE.to_string(),
                                 description: String::new(),
                                 cbor_hex: "82204101".to_string() };
        assert!(matches!(decode_counter(&env), Err(EnvelopeError::Cbor(_))));
    }

    #[test]
    fn write_new_refuses_existing_files_with_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kes.vkey");
        let env = key_envelope("KesVerificationKey_ed25519_kes_2^6", &[3u8; 32]).unwrap();
        env.write_new(&path).unwrap();
        assert!(matches!(env.write_new(&path), Err(EnvelopeError::Io { .. })));
        assert_eq!(TextEnvelope::read(&path).unwrap(), env);
        assert!(env.to_json().unwrap().contains("\"cborHex\""));
    }
}
