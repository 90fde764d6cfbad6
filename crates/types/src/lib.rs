use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod endpoints;
pub mod wire;
pub mod witness;

pub use wire::*;
pub use witness::{WitnessError, WitnessType, WitnessValue, WitnessValues};

/// Chain a transaction is built for.
///
/// Names match the selector values accepted by the compiler service
/// (`liquid_testnet`, `testnet4`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    Elements,
    Liquid,
    LiquidTestnet,
    Bitcoin,
    Testnet,
    Testnet4,
    Signet,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 8] = [
        Network::Elements,
        Network::Liquid,
        Network::LiquidTestnet,
        Network::Bitcoin,
        Network::Testnet,
        Network::Testnet4,
        Network::Signet,
        Network::Regtest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Elements => "elements",
            Network::Liquid => "liquid",
            Network::LiquidTestnet => "liquid_testnet",
            Network::Bitcoin => "bitcoin",
            Network::Testnet => "testnet",
            Network::Testnet4 => "testnet4",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        }
    }

    /// Which transaction environment this network belongs to.
    pub fn environment(&self) -> Environment {
        match self {
            Network::Elements | Network::Liquid | Network::LiquidTestnet => Environment::Elements,
            _ => Environment::Bitcoin,
        }
    }

    /// Esplora-compatible API base for this network, if a public one exists.
    pub fn api_url(&self) -> Option<&'static str> {
        match self {
            Network::Liquid => Some("https://blockstream.info/liquid/api"),
            Network::LiquidTestnet => Some("https://blockstream.info/liquidtestnet/api"),
            Network::Bitcoin => Some("https://mempool.space/api"),
            Network::Testnet => Some("https://mempool.space/testnet/api"),
            Network::Testnet4 => Some("https://mempool.space/testnet4/api"),
            Network::Signet => Some("https://mempool.space/signet/api"),
            Network::Elements | Network::Regtest => None,
        }
    }

    /// Block explorer web base.
    pub fn explorer_url(&self) -> Option<&'static str> {
        match self {
            Network::Liquid => Some("https://blockstream.info/liquid"),
            Network::LiquidTestnet => Some("https://blockstream.info/liquidtestnet"),
            Network::Bitcoin => Some("https://mempool.space"),
            Network::Testnet => Some("https://mempool.space/testnet"),
            Network::Testnet4 => Some("https://mempool.space/testnet4"),
            Network::Signet => Some("https://mempool.space/signet"),
            Network::Elements | Network::Regtest => None,
        }
    }

    /// Explorer page for a transaction. Liquid explorers get `?expand` so
    /// unblinded amounts are shown.
    pub fn tx_url(&self, txid: &str) -> String {
        match (self.explorer_url(), self.environment()) {
            (Some(base), Environment::Elements) => format!("{}/tx/{}?expand", base, txid),
            (Some(base), Environment::Bitcoin) => format!("{}/tx/{}", base, txid),
            (None, _) => format!("txid:{}", txid),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network: {0}")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == lower)
            .ok_or(UnknownNetwork(s.to_string()))
    }
}

/// Jet environment a Simplicity program is compiled against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Elements,
    Bitcoin,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Elements => "elements",
            Environment::Bitcoin => "bitcoin",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elements" | "liquid" => Ok(Environment::Elements),
            "bitcoin" => Ok(Environment::Bitcoin),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}
