//! Validación local de metadata de pool antes de pedir su hash al CLI, y
//! valores del certificado de registro (relays, margen, URL de metadata).
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::DomainError;

static TICKER_RE: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"^[A-Z0-9]{3,5}$"));

static DNS_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*$"));
static MARGIN_RE: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"^(0(\.[0-9]+)?|1(\.0+)?)$"));

pub const MAX_DESCRIPTION_CHARS: usize = 255;
/// Límite del ledger para la URL de metadata y los nombres DNS de relays.
pub const MAX_METADATA_URL_BYTES: usize = 64;
pub const MAX_DNS_NAME_BYTES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolMetadata {
    pub name: String,
    pub description: String,
    pub ticker: String,
    pub homepage: String,
}

impl PoolMetadata {
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let meta: PoolMetadata = serde_json::from_str(raw).map_err(|e| DomainError::InvalidPoolMetadata(e.to_string()))?;
        meta.validate()?;
        Ok(meta)
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path).map_err(|e| DomainError::InvalidPoolMetadata(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Ticker de 3 a 5 caracteres `A-Z0-9`; descripción de hasta 255 caracteres.
    pub fn validate(&self) -> Result<(), DomainError> {
        let ticker_ok = TICKER_RE.as_ref().map(|re| re.is_match(&self.ticker)).unwrap_or(false);
        if !ticker_ok {
            return Err(DomainError::InvalidPoolMetadata(format!("ticker '{}' must be 3-5 chars of A-Z and 0-9", self.ticker)));
        }
        let chars = self.description.chars().count();
        if chars > MAX_DESCRIPTION_CHARS {
            return Err(DomainError::InvalidPoolMetadata(format!("description has {chars} chars, max {MAX_DESCRIPTION_CHARS}")));
        }
        Ok(())
    }
}

pub fn check_metadata_url(url: &str) -> Result<(), DomainError> {
    if url.trim().is_empty() {
        return Err(DomainError::InvalidPoolRegistration("metadata url is empty".into()));
    }
    if url.len() > MAX_METADATA_URL_BYTES {
        return Err(DomainError::InvalidPoolRegistration(format!("metadata url has {} bytes, max {MAX_METADATA_URL_BYTES}",
                                                                url.len())));
    }
    Ok(())
}

/// Margen como decimal en `[0, 1]` (`0.015`, `1`).
pub fn check_margin(raw: &str) -> Result<(), DomainError> {
    let ok = MARGIN_RE.as_ref().map(|re| re.is_match(raw)).unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(DomainError::InvalidPoolRegistration(format!("margin '{raw}' must be a decimal between 0 and 1")))
    }
}

/// Relay anunciado en el registro del pool.
///
/// Forma textual: `ipv4:<addr>:<port>`, `ipv6:<addr>:<port>` o
/// `dns:<host>:<port>`. En la línea de comandos se expande a dos flags:
/// el del host y `--pool-relay-port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PoolRelay {
    Ipv4 { addr: Ipv4Addr, port: u16 },
    Ipv6 { addr: Ipv6Addr, port: u16 },
    Dns { host: String, port: u16 },
}

impl PoolRelay {
    pub const PORT_FLAG: &'static str = "--pool-relay-port";
    pub const HOST_FLAGS: [&'static str; 3] = ["--pool-relay-ipv4", "--pool-relay-ipv6", "--single-host-pool-relay"];

    pub fn dns(host: &str, port: u16) -> Result<Self, DomainError> {
        let valid = host.len() <= MAX_DNS_NAME_BYTES && DNS_RE.as_ref().map(|re| re.is_match(host)).unwrap_or(false);
        if !valid || port == 0 {
            return Err(DomainError::InvalidRelay(format!("{host}:{port}")));
        }
        Ok(PoolRelay::Dns { host: host.to_string(), port })
    }

    pub fn host_flag(&self) -> &'static str {
        match self {
            PoolRelay::Ipv4 { .. } => Self::HOST_FLAGS[0],
            PoolRelay::Ipv6 { .. } => Self::HOST_FLAGS[1],
            PoolRelay::Dns { .. } => Self::HOST_FLAGS[2],
        }
    }

    pub fn host(&self) -> String {
        match self {
            PoolRelay::Ipv4 { addr, .. } => addr.to_string(),
            PoolRelay::Ipv6 { addr, .. } => addr.to_string(),
            PoolRelay::Dns { host, .. } => host.clone(),
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            PoolRelay::Ipv4 { port, .. } | PoolRelay::Ipv6 { port, .. } | PoolRelay::Dns { port, .. } => *port,
        }
    }

    /// Inversa de `host_flag` + `host` + `port` sobre tokens del CLI.
    pub fn from_flag(flag: &str, host: &str, port: &str) -> Result<Self, DomainError> {
        let kind = match flag {
            "--pool-relay-ipv4" => "ipv4",
            "--pool-relay-ipv6" => "ipv6",
            "--single-host-pool-relay" => "dns",
            _ => return Err(DomainError::InvalidRelay(format!("{flag} {host}"))),
        };
        format!("{kind}:{host}:{port}").parse()
    }
}

impl fmt::Display for PoolRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            PoolRelay::Ipv4 { .. } => "ipv4",
            PoolRelay::Ipv6 { .. } => "ipv6",
            PoolRelay::Dns { .. } => "dns",
        };
        write!(f, "{kind}:{}:{}", self.host(), self.port())
    }
}

impl FromStr for PoolRelay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || DomainError::InvalidRelay(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(bad)?;
        let (host, port) = rest.rsplit_once(':').ok_or_else(bad)?;
        let port: u16 = port.parse().ok().filter(|p| *p != 0).ok_or_else(bad)?;
        match kind {
            "ipv4" => Ok(PoolRelay::Ipv4 { addr: host.parse().map_err(|_| bad())?, port }),
            "ipv6" => Ok(PoolRelay::Ipv6 { addr: host.parse().map_err(|_| bad())?, port }),
            "dns" => PoolRelay::dns(host, port).map_err(|_| bad()),
            _ => Err(bad()),
        }
    }
}

/// Nombre de asset legible → hex (formato que espera el CLI en `--tx-out`).
pub fn asset_name_to_hex(name: &str) -> String {
    hex::encode(name.as_bytes())
}

pub fn asset_name_from_hex(raw: &str) -> Result<String, DomainError> {
    let bytes = hex::decode(raw).map_err(|e| DomainError::InvalidAssetName(format!("{raw}: {e}")))?;
    String::from_utf8(bytes).map_err(|e| DomainError::InvalidAssetName(format!("{raw}: {e}")))
}
