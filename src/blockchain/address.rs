//! Account address validation and checksum normalization.
//!
//! Accepts `0x`-prefixed or bare 40-digit hex. Single-case input carries no
//! checksum and is accepted as-is; mixed-case input must match EIP-55.

use alloy::primitives::Address;

use crate::blockchain::types::{LedgerError, LedgerResult};

const ADDRESS_HEX_LEN: usize = 40;

/// Validate a raw address string and return the parsed address.
///
/// Its `Display` form is the canonical checksum encoding.
pub fn validate(raw: &str) -> LedgerResult<Address> {
    let invalid = || LedgerError::InvalidAddress(raw.to_string());

    let body = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);

    if body.len() != ADDRESS_HEX_LEN || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let address: Address = body.parse().map_err(|_| invalid())?;

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && &checksum(&address)[2..] != body {
        return Err(invalid());
    }

    Ok(address)
}

/// Canonical EIP-55 form of an address.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}

/// Validate and return the canonical checksum string in one step.
pub fn normalize(raw: &str) -> LedgerResult<String> {
    validate(raw).map(|a| checksum(&a))
}
