//! Utility functions for domain handling.
//!
//! This module contains helpers for validating domain strings, building the
//! candidate page URLs probed for each domain and normalising input lists.

use crate::error::ScanError;
use crate::types::Domain;
use std::collections::HashSet;

/// Validate that a domain string can be turned into a fetchable URL.
///
/// This is a basic check - hostnames are otherwise passed to the HTTP client
/// as given, so `host:port` forms are accepted.
pub fn validate_domain(domain: &str) -> Result<(), ScanError> {
    if domain.trim().is_empty() {
        return Err(ScanError::invalid_domain(
            domain,
            "Domain name cannot be empty",
        ));
    }

    if domain.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ScanError::invalid_domain(
            domain,
            "Domain name cannot contain whitespace or path separators",
        ));
    }

    Ok(())
}

/// Build the URL probed for one `(domain, subpage)` pair.
///
/// The empty suffix yields the primary page, `http://<domain>/`.
pub fn candidate_url(domain: &str, subpage: &str) -> String {
    format!("http://{}/{}", domain, subpage)
}

/// Remove repeated domains, keeping the first occurrence of each.
///
/// The scheduler scans every distinct domain exactly once per run.
pub fn distinct_domains(domains: &[Domain]) -> Vec<Domain> {
    let mut seen = HashSet::new();

    domains
        .iter()
        .filter(|domain| seen.insert(domain.as_str()))
        .cloned()
        .collect()
}
