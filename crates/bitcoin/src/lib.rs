//! Block explorer integration.
//!
//! This crate provides:
//! - An Esplora-compatible HTTP client (Blockstream for Liquid, mempool.space
//!   for Bitcoin test networks)
//! - Raw transaction broadcast returning the txid and an explorer link
//! - Previous-output lookup used to describe inputs when building a PSET
//!
//! The [`Explorer`] trait is the seam the send workflow depends on, so tests
//! can substitute an in-memory explorer.

pub mod client;
pub mod types;

pub use client::{EsploraClient, Explorer, ExplorerError};
pub use types::{EsploraTx, EsploraVout};
pub use unchained_types::{BroadcastResult, Network, UtxoData};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
