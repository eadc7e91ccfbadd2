use std::fmt;
use std::str::FromStr;

use crate::errors::{AdaError, AdaResult};

pub const MAINNET_MAGIC: u32 = 764_824_073;

/// Red seleccionada (`--mainnet` o `--testnet-magic N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet { magic: u32 },
}

impl Network {
    pub const PREPROD: Network = Network::Testnet { magic: 1 };
    pub const PREVIEW: Network = Network::Testnet { magic: 2 };

    pub fn magic(&self) -> u32 {
        match self {
            Network::Mainnet => MAINNET_MAGIC,
            Network::Testnet { magic } => *magic,
        }
    }

    /// Tokens del flag de red tal como los espera el CLI.
    pub fn args(&self) -> Vec<String> {
        match self {
            Network::Mainnet => vec!["--mainnet".to_string()],
            Network::Testnet { magic } => vec!["--testnet-magic".to_string(), magic.to_string()],
        }
    }

    pub fn id(&self) -> String {
        match self {
            Network::Mainnet => "mainnet".to_string(),
            Network::Testnet { magic } => magic.to_string(),
        }
    }
}

impl FromStr for Network {
    type Err = AdaError;

    /// Identificadores reconocidos: `mainnet`, `1`/`preprod`, `2`/`preview`.
    fn from_str(raw: &str) -> AdaResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "1" | "preprod" => Ok(Network::PREPROD),
            "2" | "preview" => Ok(Network::PREVIEW),
            _ => Err(AdaError::Configuration(format!("unknown network id '{raw}' (expected mainnet, 1/preprod or 2/preview)"))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_ids_map_to_flags() {
        assert_eq!("mainnet".parse::<Network>().unwrap().args(), vec!["--mainnet"]);
        assert_eq!("1".parse::<Network>().unwrap().args(), vec!["--testnet-magic", "1"]);
        assert_eq!("preview".parse::<Network>().unwrap(), Network::PREVIEW);
        assert!("42".parse::<Network>().is_err());
        assert_eq!(Network::Mainnet.magic(), 764_824_073);
    }
}
