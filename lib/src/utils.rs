use std::str::FromStr;

use alloy::primitives::{Address, U256};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url as URL;

use crate::error::{ConfigError, MintError};

lazy_static! {
    static ref ETH_ADDRESS: Regex = Regex::new(r"0x[0-9a-fA-F]{40}").unwrap();
}

/// Returns the first `0x`-prefixed 40 hex digit address in `text`, verbatim.
///
/// Only the first match is considered, even when the text names several
/// addresses.
pub fn extract_address(text: &str) -> Result<&str, MintError> {
    ETH_ADDRESS
        .find(text)
        .map(|m| m.as_str())
        .ok_or(MintError::InvalidInput)
}

// Keeps ASCII letters, digits and spaces, in order
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
}

// First code point of every run of ten Unicode decimal digits (category Nd)
const DECIMAL_DIGIT_ZEROS: [u32; 68] = [
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

fn decimal_digit(c: char) -> Option<char> {
    let cp = u32::from(c);
    DECIMAL_DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&cp))
        .and_then(|zero| char::from_digit(cp - zero, 10))
}

/// Parses a count made only of numeric characters.
///
/// Any script's decimal digits count (`"42"`, `"٤٢"`, `"４２"`). Strings with
/// a non-numeric character (empty, signed, padded, fractional, words) are
/// treated as zero. Returns `None` when the value cannot be minted: numeric
/// characters that are not decimal digits (`"²"`, `"½"`), or digits that do
/// not fit in a `uint256`.
pub fn coerce_count(raw: &str) -> Option<U256> {
    if raw.is_empty() || !raw.chars().all(char::is_numeric) {
        return Some(U256::ZERO);
    }
    let digits = raw.chars().map(decimal_digit).collect::<Option<String>>()?;
    U256::from_str_radix(&digits, 10).ok()
}

#[inline]
pub fn parse_address(raw: &str, var: &'static str) -> Result<Address, ConfigError> {
    Address::from_str(raw.trim()).map_err(|_| ConfigError::Invalid(var))
}

#[inline]
pub fn parse_rpc_url(raw: &str) -> Result<URL, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid("RPC_URL"))
}
