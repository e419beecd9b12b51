// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Operator input encoders.
//!
//! Everything here runs before any network call, so malformed input is
//! reported without touching pRuntime or the chain.

use serde::Serialize;
use serde_json::Value;

use crate::blockchain::signing::KeyManager;
use crate::blockchain::ss58;
use crate::contracts::ContractId;

/// Minor units per whole XUS.
pub const XUS_SCALE: u128 = 1_000_000;

/// Asset symbol accepted by [`parse_asset_amount`].
pub const XUS_SYMBOL: &str = "XUS";

/// Errors raised while encoding operator input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Invalid amount `{0}`: expected `<digits>[.<digits>] XUS`")]
    InvalidAmount(String),

    #[error("Invalid hex string `{0}`")]
    InvalidHex(String),

    #[error("Invalid address or public key `{0}`")]
    InvalidAddress(String),

    #[error("Invalid contract id `{0}`: expected a positive integer")]
    InvalidContractId(String),

    #[error("Invalid JSON argument: {0}")]
    InvalidJson(String),
}

/// Parse `"123.45 XUS"` into integer minor units.
///
/// Fractional minor units are truncated, never rounded: `"0.0000019 XUS"`
/// is `1`.
pub fn parse_asset_amount(text: &str) -> Result<u128, FormatError> {
    let invalid = || FormatError::InvalidAmount(text.to_string());

    let (number, symbol) = text.trim().split_once(' ').ok_or_else(invalid)?;
    if symbol != XUS_SYMBOL {
        return Err(invalid());
    }

    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (number, ""),
    };
    if whole.is_empty() || !is_digits(whole) {
        return Err(invalid());
    }
    // A dot must be followed by at least one digit.
    if number.contains('.') && (fraction.is_empty() || !is_digits(fraction)) {
        return Err(invalid());
    }

    let whole: u128 = whole.parse().map_err(|_| invalid())?;

    // Keep only the digits that fit in the minor unit, then right-pad.
    let digits = (XUS_SCALE.ilog10()) as usize;
    let kept = &fraction[..fraction.len().min(digits)];
    let minor: u128 = if kept.is_empty() {
        0
    } else {
        format!("{kept:0<digits$}").parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(XUS_SCALE)
        .and_then(|units| units.checked_add(minor))
        .ok_or_else(invalid)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Prefix `0x` unless it is already there.
pub fn normalize_hex(text: &str) -> String {
    if text.starts_with("0x") {
        text.to_string()
    } else {
        format!("0x{text}")
    }
}

/// Decode a 32-byte public key from `0x`-hex, bare hex, or an SS58 address.
pub fn decode_public_key(text: &str) -> Result<[u8; 32], FormatError> {
    if let Some(stripped) = text.strip_prefix("0x") {
        return decode_hex_key(stripped).ok_or_else(|| FormatError::InvalidHex(text.to_string()));
    }

    ss58::decode(text)
        .map(|(_, public)| public)
        .ok()
        .or_else(|| decode_hex_key(text))
        .ok_or_else(|| FormatError::InvalidAddress(text.to_string()))
}

fn decode_hex_key(text: &str) -> Option<[u8; 32]> {
    let bytes = hex::decode(text).ok()?;
    <[u8; 32]>::try_from(bytes.as_slice()).ok()
}

/// Result of [`verify_address_or_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Accept `text` if it is an address or public key, else if it derives a key.
///
/// The address is reported with the Phala SS58 prefix either way.
pub fn verify_address_or_key<K: KeyManager + ?Sized>(keys: &K, text: &str) -> Verification {
    let public = decode_public_key(text)
        .or_else(|_| keys.key_from_suri(text).map(|key| key.public_key()));

    match public {
        Ok(public) => Verification {
            ok: true,
            address: Some(ss58::encode(&public, ss58::PHALA_PREFIX)),
        },
        Err(e) => {
            tracing::debug!(error = %e, "not an address or key");
            Verification {
                ok: false,
                address: None,
            }
        }
    }
}

/// Parse a contract id argument.
pub fn parse_contract_id(text: &str) -> Result<ContractId, FormatError> {
    text.trim()
        .parse::<u32>()
        .ok()
        .and_then(ContractId::new)
        .ok_or_else(|| FormatError::InvalidContractId(text.to_string()))
}

/// Parse a JSON argument supplied on the command line.
pub fn parse_json_argument(text: &str) -> Result<Value, FormatError> {
    serde_json::from_str(text).map_err(|e| FormatError::InvalidJson(e.to_string()))
}
