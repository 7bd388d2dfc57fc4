//! Pattern-based extraction of contact signals from page text.
//!
//! Matching is purely syntactic: phone numbers are not validated, profile
//! links are not resolved and addresses are heuristics built from a short
//! window in front of a state/zip pair. Missed signals are acceptable;
//! extraction never fails once the extractor has been built.

pub mod address;
pub mod text;

use crate::error::ScanError;
use crate::types::PageSignals;
use regex::Regex;
use std::collections::BTreeSet;

pub use address::{build_address, deduplicate_address};
pub use text::html_to_text;

/// `(NNN) NNN-NNNN`, `NNN-NNN-NNNN` or `NNN.NNN.NNNN`.
const PHONE_PATTERN: &str = r"\(\d{3}\)\s?\d{3}[-\s]?\d{4}|\d{3}-\d{3}-\d{4}|\d{3}\.\d{3}\.\d{4}";

/// Absolute Facebook URLs, up to the first whitespace or double quote.
const FACEBOOK_PATTERN: &str = r#"https?://www\.facebook\.com/[^\s"]+"#;

/// Extracts phone numbers, Facebook links and addresses from page content.
///
/// The compiled patterns are immutable; one extractor is built per run and
/// shared by every scanner.
#[derive(Debug, Clone)]
pub struct TextSignalExtractor {
    phone_regex: Regex,
    facebook_regex: Regex,
    address_regex: Regex,
}

impl TextSignalExtractor {
    /// Compile the extraction patterns.
    pub fn new() -> Result<Self, ScanError> {
        Ok(Self {
            phone_regex: Regex::new(PHONE_PATTERN)?,
            facebook_regex: Regex::new(FACEBOOK_PATTERN)?,
            address_regex: Regex::new(&address::address_pattern())?,
        })
    }

    /// Extract all signals from one page.
    ///
    /// Phones and addresses are matched against the tag-stripped
    /// `page_text`; Facebook links are matched against the `raw_body` so
    /// that links inside `href` attributes are found.
    pub fn extract(&self, page_text: &str, raw_body: &str) -> PageSignals {
        PageSignals {
            phone_numbers: self.extract_phones(page_text),
            facebook_links: self.extract_facebook_links(raw_body),
            addresses: self.extract_addresses(page_text),
        }
    }

    /// Every substring matching a supported phone format, verbatim.
    pub fn extract_phones(&self, text: &str) -> BTreeSet<String> {
        self.phone_regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Every absolute `www.facebook.com` URL, verbatim.
    pub fn extract_facebook_links(&self, raw: &str) -> BTreeSet<String> {
        self.facebook_regex
            .find_iter(raw)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Address candidates, each already passed through the dedup window.
    pub fn extract_addresses(&self, text: &str) -> BTreeSet<String> {
        self.address_regex
            .captures_iter(text)
            .filter_map(|caps| {
                let state = caps.get(2)?.as_str();
                let zip = caps.get(3)?.as_str();
                let prefix = caps.get(1).map(|m| m.as_str());
                Some(build_address(prefix, state, zip))
            })
            .collect()
    }
}
