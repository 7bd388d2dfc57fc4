//! US postal address candidates and the per-address deduplication window.
//!
//! An address is recognised by its tail only: a state or territory code, a
//! single whitespace character and a five digit zip code. Up to 36 characters
//! in front of the tail are captured as free text. The window is unanchored,
//! so captured prefixes may start mid-word or overlap other addresses.

use std::collections::HashSet;

/// State, district and territory codes accepted in front of a zip code.
const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "AS", "CA", "CO", "CT", "DE", r"D\.C\.", "FL", "GA", "GU", "HI",
    "ID", "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT",
    "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "MP", "OH", "OK", "OR", "PA", "PR", "RI",
    "SC", "SD", "TN", "TX", "TT", "UT", "VT", "VA", "VI", "WA", "WV", "WI", "WY",
];

/// Maximum number of characters captured in front of the state code.
pub const PREFIX_WINDOW: usize = 36;

/// Build the address pattern: `(prefix)? state zip`.
pub(crate) fn address_pattern() -> String {
    format!(
        r"(.{{1,{}}})?\b({})\s(\d{{5}})\b",
        PREFIX_WINDOW,
        STATE_CODES.join("|")
    )
}

/// Assemble a candidate address from one pattern match.
///
/// The prefix is trimmed and joined to the state and zip with single
/// spaces, then passed through [`deduplicate_address`].
pub fn build_address(prefix: Option<&str>, state: &str, zip: &str) -> String {
    let prefix = prefix.map(str::trim).unwrap_or_default();
    let full = format!("{} {} {}", prefix, state, zip);
    deduplicate_address(full.trim())
}

/// Drop repeated words from an address, keeping the first occurrence.
///
/// Words are compared with punctuation removed and case folded; the words
/// that survive are emitted unchanged, in their original order, separated by
/// single spaces. Applying this twice yields the same string as applying it
/// once.
pub fn deduplicate_address(address: &str) -> String {
    let mut seen = HashSet::new();

    address
        .split_whitespace()
        .filter(|word| seen.insert(comparison_key(word)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalised form of a word used only for duplicate detection.
fn comparison_key(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
