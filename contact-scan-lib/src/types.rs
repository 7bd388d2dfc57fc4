//! Core data types for contact discovery.
//!
//! This module defines the per-domain extraction result, the scan
//! configuration shared by every component, and the records that cross the
//! boundary to the report writer and the search index.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// A hostname identifying one candidate business website.
pub type Domain = String;

/// Subpage suffixes probed for every domain, in probe order.
///
/// The empty suffix is the primary page; only its success marks the domain
/// as reachable.
pub const SUBPAGES: [&str; 5] = ["", "about", "about-us", "contact", "contact-us"];

/// Default spoofed desktop-browser identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Default `Accept` header sent with every request.
pub const DEFAULT_ACCEPT: &str = "*/*";

/// Signals gathered for one domain across all of its probed subpages.
///
/// The sets are ordered so that reports are stable between runs; no
/// ordering is implied by the extraction itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Phone numbers exactly as they appeared in the page text
    pub phone_numbers: BTreeSet<String>,

    /// Facebook profile URLs found in the raw page bodies
    pub facebook_links: BTreeSet<String>,

    /// Deduplicated postal address candidates
    pub addresses: BTreeSet<String>,

    /// True iff the primary (empty-suffix) page answered with HTTP 200
    pub primary_page_reachable: bool,
}

impl ExtractionResult {
    /// Union another set of page signals into this result.
    pub fn merge_signals(&mut self, signals: PageSignals) {
        self.phone_numbers.extend(signals.phone_numbers);
        self.facebook_links.extend(signals.facebook_links);
        self.addresses.extend(signals.addresses);
    }

    /// Whether no signal of any kind was found.
    pub fn is_empty(&self) -> bool {
        self.phone_numbers.is_empty() && self.facebook_links.is_empty() && self.addresses.is_empty()
    }
}

/// Signals extracted from a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    pub phone_numbers: BTreeSet<String>,
    pub facebook_links: BTreeSet<String>,
    pub addresses: BTreeSet<String>,
}

/// Company names supplied by the external company-name table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "Company Commercial Name")]
    pub commercial_name: String,

    #[serde(rename = "Company Legal Name")]
    pub legal_name: String,

    #[serde(rename = "Company All Available Names")]
    pub all_available_names: String,
}

/// Outcome of a full scheduler run.
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// One entry per distinct scanned domain
    pub results: HashMap<Domain, ExtractionResult>,

    /// Domains whose primary page was reachable
    pub success_count: usize,

    /// Domains whose primary page was not reachable (or whose scan failed)
    pub failure_count: usize,
}

/// Progress notification emitted after each completed domain scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub completed: usize,
    pub total: usize,
    pub domain: Domain,
    pub primary_page_reachable: bool,
}

/// Configuration options for a scan run.
///
/// These settings are constructed once and shared, read-only, by every
/// probe, scanner and the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of domains scanned at the same time
    /// Default: 15, Range: 1-100
    pub concurrency: usize,

    /// Time budget for each individual page fetch
    /// Default: 3 seconds
    #[serde(skip)]
    pub timeout: Duration,

    /// `User-Agent` header attached to every request
    pub user_agent: String,

    /// `Accept` header attached to every request
    pub accept: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 15,
            timeout: Duration::from_secs(3),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

impl ScanConfig {
    /// Set the worker-pool size.
    ///
    /// Automatically caps concurrency at 100 to prevent resource exhaustion.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the spoofed browser identity.
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
