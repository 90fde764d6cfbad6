//! Typed witness entries.
//!
//! A witness file is a JSON object mapping a witness name to
//! `{ "value": ..., "type": ... }`. Known types are checked here so that a
//! malformed value is reported before the compiler is contacted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

const UINT_WIDTHS: [u16; 9] = [1, 2, 4, 8, 16, 32, 64, 128, 256];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    #[error("invalid witness JSON: {0}")]
    Json(String),

    #[error("witness `{name}`: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Declared type of a witness value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WitnessType {
    /// 64-byte Schnorr signature
    Signature,
    /// 32-byte x-only public key
    Pubkey,
    /// Unsigned integer of the given bit width
    UInt(u16),
    Bool,
    /// Any other type expression, passed to the compiler as-is
    Other(String),
}

impl WitnessType {
    fn as_string(&self) -> String {
        match self {
            WitnessType::Signature => "Signature".to_string(),
            WitnessType::Pubkey => "Pubkey".to_string(),
            WitnessType::UInt(bits) => format!("u{}", bits),
            WitnessType::Bool => "bool".to_string(),
            WitnessType::Other(s) => s.clone(),
        }
    }

    /// Check `value` against this type.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        let value = value.trim();
        match self {
            WitnessType::Signature => check_hex_bytes(value, 64),
            WitnessType::Pubkey => check_hex_bytes(value, 32),
            WitnessType::Bool => match value {
                "true" | "false" => Ok(()),
                _ => Err(format!("expected true or false, got `{}`", value)),
            },
            WitnessType::UInt(bits) => check_uint(value, *bits),
            WitnessType::Other(_) => Ok(()),
        }
    }
}

impl fmt::Display for WitnessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl WitnessType {
    /// Classify a type expression. Unknown expressions become `Other`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s {
            "Signature" => WitnessType::Signature,
            "Pubkey" => WitnessType::Pubkey,
            "bool" => WitnessType::Bool,
            _ => match s.strip_prefix('u').and_then(|w| w.parse::<u16>().ok()) {
                Some(bits) if UINT_WIDTHS.contains(&bits) => WitnessType::UInt(bits),
                _ => WitnessType::Other(s.to_string()),
            },
        }
    }
}

impl Serialize for WitnessType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for WitnessType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(WitnessType::parse(&s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RawWitnessValue {
    value: String,
    #[serde(rename = "type")]
    ty: String,
}

/// A single validated witness entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWitnessValue")]
pub struct WitnessValue {
    pub value: String,
    #[serde(rename = "type")]
    pub ty: WitnessType,
}

impl WitnessValue {
    pub fn new(value: impl Into<String>, ty: WitnessType) -> Result<Self, String> {
        let value = value.into();
        ty.validate(&value)?;
        Ok(Self { value, ty })
    }
}

impl TryFrom<RawWitnessValue> for WitnessValue {
    type Error = String;

    fn try_from(raw: RawWitnessValue) -> Result<Self, Self::Error> {
        WitnessValue::new(raw.value, WitnessType::parse(&raw.ty))
    }
}

/// Witness entries keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WitnessValues(pub BTreeMap<String, WitnessValue>);

impl WitnessValues {
    /// Parse witness JSON text, validating every entry.
    pub fn parse(text: &str) -> Result<Self, WitnessError> {
        let raw: BTreeMap<String, RawWitnessValue> =
            serde_json::from_str(text).map_err(|e| WitnessError::Json(e.to_string()))?;

        let mut values = BTreeMap::new();
        for (name, entry) in raw {
            let value = WitnessValue::try_from(entry)
                .map_err(|reason| WitnessError::InvalidValue { name: name.clone(), reason })?;
            values.insert(name, value);
        }
        Ok(Self(values))
    }

    pub fn get(&self, name: &str) -> Option<&WitnessValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn check_hex_bytes(value: &str, len: usize) -> Result<(), String> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| format!("expected 0x-prefixed hex, got `{}`", value))?;
    let bytes = hex::decode(digits).map_err(|e| format!("invalid hex: {}", e))?;
    if bytes.len() != len {
        return Err(format!("expected {} bytes, got {}", len, bytes.len()));
    }
    Ok(())
}

const U256_MAX_DECIMAL: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639935";

/// `digits` carries no leading zeros. Equal-length decimal strings compare
/// like the numbers they spell.
fn fits_u256(digits: &str) -> bool {
    digits.len() < U256_MAX_DECIMAL.len()
        || (digits.len() == U256_MAX_DECIMAL.len() && digits <= U256_MAX_DECIMAL)
}

fn check_uint(value: &str, bits: u16) -> Result<(), String> {
    let too_wide = || format!("`{}` does not fit in u{}", value, bits);

    if let Some(digits) = value.strip_prefix("0x") {
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid hex literal `{}`", value));
        }
        let significant = digits.trim_start_matches('0');
        let used = match significant.chars().next().and_then(|c| c.to_digit(16)) {
            Some(lead) => (significant.len() - 1) * 4 + (32 - lead.leading_zeros()) as usize,
            None => 0,
        };
        return if used <= bits as usize { Ok(()) } else { Err(too_wide()) };
    }

    if let Some(digits) = value.strip_prefix("0b") {
        if digits.is_empty() || !digits.chars().all(|c| c == '0' || c == '1') {
            return Err(format!("invalid binary literal `{}`", value));
        }
        let used = digits.trim_start_matches('0').len();
        return if used <= bits as usize { Ok(()) } else { Err(too_wide()) };
    }

    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid integer literal `{}`", value));
    }
    match value.parse::<u128>() {
        Ok(_) if bits >= 128 => Ok(()),
        Ok(n) if n < (1u128 << bits) => Ok(()),
        Ok(_) => Err(too_wide()),
        // Larger than u128 only fits a u256.
        Err(_) if bits == 256 && fits_u256(value.trim_start_matches('0')) => Ok(()),
        Err(_) => Err(too_wide()),
    }
}
