//! Esplora JSON shapes.

use serde::{Deserialize, Serialize};

/// `GET /tx/:txid` response, reduced to the fields we read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraTx {
    pub txid: String,
    #[serde(default)]
    pub vout: Vec<EsploraVout>,
}

/// Transaction output. On Liquid, blinded outputs carry commitments instead
/// of `value` and `asset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraVout {
    pub scriptpubkey: String,
    #[serde(default)]
    pub scriptpubkey_address: Option<String>,
    #[serde(default)]
    pub value: Option<u64>,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub valuecommitment: Option<String>,
}

impl EsploraVout {
    pub fn is_confidential(&self) -> bool {
        self.value.is_none() || self.valuecommitment.is_some()
    }
}
