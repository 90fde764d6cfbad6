//! Request and response bodies exchanged with the compiler/signing service.
//!
//! Field names are the service's JSON names; do not rename.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::witness::WitnessValues;
use crate::{Environment, Network};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileRequest {
    pub script: String,
    pub include_debug: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness: Option<WitnessValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResponse {
    pub program_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witness_base64: Option<String>,
}

/// Human-readable script text to hex plus its P2WSH address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub script: String,
    pub network: Network,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub hex: String,
    pub address: String,
}

/// Previous output data resolved from a block explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    pub value: u64,
    pub scriptpubkey: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePsetRequest {
    /// `txid:vout` entries
    pub inputs: Vec<String>,
    /// `address:value` entries, plus `fee:value`
    pub outputs: Vec<String>,
    pub asset_id: Option<String>,
    pub network: Network,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utxos: Option<Vec<UtxoData>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePsetResponse {
    pub asset: String,
    pub inputs: u32,
    pub network: String,
    pub outputs: u32,
    pub pset: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SighashPsetRequest {
    pub pset_hex: String,
    pub input_index: u32,
    pub redeem_script_hex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SighashResponse {
    pub sighash_hex: String,
    pub message_hex: String,
    pub input_index: u32,
    pub sighash_type: String,
}

/// Finalize request. The signature fields are only needed when the last
/// signature has not been added to the PSET already.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizePsetRequest {
    pub pset_hex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeem_script_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessSummary {
    pub input_index: u32,
    pub witness_elements: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeResponse {
    pub finalized: bool,
    pub inputs: u32,
    pub outputs: u32,
    pub transaction_hex: String,
    pub txid: String,
    #[serde(default)]
    pub witnesses: Vec<WitnessSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePsbtRequest {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub network: Network,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePsbtResponse {
    pub inputs: u32,
    pub network: String,
    pub outputs: u32,
    pub psbt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SighashPsbtRequest {
    pub psbt_hex: String,
    pub input_index: u32,
    pub redeem_script_hex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizePsbtRequest {
    pub psbt_hex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeem_script_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
}

/// Service-assisted signing: the service runs the program against the
/// transaction and co-signs only if it succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplicitySignPsetRequest {
    pub pset_hex: String,
    pub input_index: u32,
    pub redeem_script_hex: String,
    pub program: String,
    pub witness: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplicitySignPsetResponse {
    pub pset_hex: String,
    pub signature_hex: String,
    pub public_key_hex: String,
    pub input_index: u32,
    pub partial_sigs_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplicitySignPsbtRequest {
    pub psbt_hex: String,
    pub input_index: u32,
    pub redeem_script_hex: String,
    pub program: String,
    pub witness: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplicitySignPsbtResponse {
    pub psbt_hex: String,
    pub signature_hex: String,
    pub public_key_hex: String,
    pub input_index: u32,
    pub partial_sigs_count: u32,
}

/// Sign a PSET input with a raw secret key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignPsetRequest {
    pub pset_hex: String,
    pub secret_key_hex: String,
    pub input_index: u32,
    pub redeem_script_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignPsetResponse {
    pub pset: String,
    pub partial_sigs_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweakRequest {
    pub program: String,
    pub jet_env: Environment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweakResponse {
    pub cmr_hex: String,
    pub tweaked_public_key_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageRequest {
    /// Hex-encoded message bytes
    pub message: String,
    pub secret_key_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignMessageResponse {
    pub digest_hex: String,
    pub signature_hex: String,
    pub public_key_hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypairResponse {
    pub secret_key: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub txid: String,
    pub explorer_url: String,
}

/// One line in the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// A transient toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub is_error: bool,
    pub timestamp: DateTime<Utc>,
}
