//! Block explorer API client (Esplora compatible).
//!
//! Provides async access to:
//! - Transaction broadcasting
//! - Transaction lookup for previous outputs

use async_trait::async_trait;
use bitcoin::Txid;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};
use unchained_types::{BroadcastResult, Network, UtxoData};

use crate::types::EsploraTx;

/// Errors that can occur when talking to a block explorer.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Explorer request failed: {0}")]
    ApiRequest(String),

    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseResponse(String),

    #[error("Broadcast failed ({status}): {body}")]
    Broadcast { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid txid {0}")]
    InvalidTxid(String),

    #[error("Output {txid}:{vout} not found")]
    OutputNotFound { txid: String, vout: u32 },

    #[error("Output {txid}:{vout} is confidential; its value cannot be read")]
    Confidential { txid: String, vout: u32 },
}

/// Read and write access to a chain through its explorer.
#[async_trait]
pub trait Explorer: Send + Sync {
    /// Network this explorer serves.
    fn network(&self) -> Network;

    /// Broadcast a raw transaction.
    async fn broadcast_tx(&self, tx_hex: &str) -> Result<BroadcastResult, ExplorerError>;

    /// Look up the output `txid:vout` being spent.
    async fn get_prevout(&self, txid: &str, vout: u32) -> Result<UtxoData, ExplorerError>;
}

/// Async client for an Esplora HTTP API.
pub struct EsploraClient {
    network: Network,
    api_base: String,
    client: reqwest::Client,
}

impl EsploraClient {
    /// Create a client for the network's public explorer.
    pub fn new(network: Network) -> Result<Self, ExplorerError> {
        let api_base = network.api_url().ok_or_else(|| {
            ExplorerError::Configuration(format!(
                "no public explorer for {}; configure an explorer URL",
                network
            ))
        })?;

        Ok(Self::with_api_url(network, api_base.to_string()))
    }

    /// Create a client with a custom API URL (for self-hosted Esplora).
    pub fn with_api_url(network: Network, api_url: String) -> Self {
        Self {
            network,
            api_base: api_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch a transaction.
    pub async fn get_transaction(&self, txid: &str) -> Result<EsploraTx, ExplorerError> {
        let txid = parse_txid(txid)?;
        let url = format!("{}/tx/{}", self.api_base, txid);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ExplorerError::ApiRequest(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ExplorerError::ApiError { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| ExplorerError::ParseResponse(e.to_string()))
    }

    /// Get transaction URL for block explorer.
    pub fn tx_url(&self, txid: &str) -> String {
        self.network.tx_url(txid)
    }
}

#[async_trait]
impl Explorer for EsploraClient {
    fn network(&self) -> Network {
        self.network
    }

    async fn broadcast_tx(&self, tx_hex: &str) -> Result<BroadcastResult, ExplorerError> {
        let url = format!("{}/tx", self.api_base);
        info!("Broadcasting transaction to {}", url);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(tx_hex.trim().to_string())
            .send()
            .await
            .map_err(|e| ExplorerError::ApiRequest(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(ExplorerError::Broadcast {
                status: status.as_u16(),
                body,
            });
        }

        // Response is just the txid as plain text
        let text = response
            .text()
            .await
            .map_err(|e| ExplorerError::ParseResponse(e.to_string()))?;
        let txid = Txid::from_str(text.trim())
            .map_err(|e| ExplorerError::ParseResponse(format!("invalid txid `{}`: {}", text, e)))?
            .to_string();

        let explorer_url = self.tx_url(&txid);
        info!("Broadcast accepted: txid={}", txid);
        Ok(BroadcastResult { txid, explorer_url })
    }

    async fn get_prevout(&self, txid: &str, vout: u32) -> Result<UtxoData, ExplorerError> {
        let tx = self.get_transaction(txid).await?;

        let output = tx.vout.get(vout as usize).ok_or_else(|| ExplorerError::OutputNotFound {
            txid: txid.to_string(),
            vout,
        })?;

        let value = match output.value {
            Some(value) if !output.is_confidential() => value,
            _ => {
                return Err(ExplorerError::Confidential {
                    txid: txid.to_string(),
                    vout,
                })
            }
        };

        debug!("Resolved prevout {}:{} value={}", txid, vout, value);
        Ok(UtxoData {
            asset: output.asset.clone(),
            value,
            scriptpubkey: output.scriptpubkey.clone(),
        })
    }
}

fn parse_txid(txid: &str) -> Result<Txid, ExplorerError> {
    Txid::from_str(txid.trim()).map_err(|_| ExplorerError::InvalidTxid(txid.to_string()))
}
