//! # Contact Scan Library
//!
//! A concurrent crawl-and-extract engine that discovers public contact
//! details (phone numbers, Facebook profile links and US postal addresses)
//! on business websites.
//!
//! For every domain the engine probes the primary page and a fixed set of
//! "about"/"contact" subpages, extracts signals with pattern matching and
//! merges them into one result per domain. Many domains are scanned in
//! parallel on a bounded worker pool.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contact_scan_lib::{CrawlScheduler, ScanConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = CrawlScheduler::new(&ScanConfig::default())?;
//!     let summary = scheduler.run(&["example.com".to_string()]).await;
//!
//!     for (domain, result) in &summary.results {
//!         println!("{}: {:?}", domain, result.phone_numbers);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded concurrency**: at most N domains in flight, panics contained per domain
//! - **Subpage probing**: primary page plus about/contact variants, no retries
//! - **Deterministic output**: ordered result sets and an input-ordered CSV report
//! - **Search indexing**: optional batch upsert to an Algolia-compatible index

// Re-export main public API types and functions
// This makes them available as contact_scan_lib::TypeName
pub use aggregate::{
    index_records, write_report, write_report_to, IndexRecord, OutputRecord, ResultAggregator,
    NOT_AVAILABLE, REPORT_HEADERS,
};
pub use concurrent::CrawlScheduler;
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
    IndexConfig, InputConfig, OutputConfig, DEFAULT_INDEX_NAME, MAX_TIMEOUT,
};
pub use error::ScanError;
pub use extract::{build_address, deduplicate_address, html_to_text, TextSignalExtractor};
pub use index::{IndexSettings, SearchIndex};
pub use input::{read_company_info, read_company_info_from, read_domains, read_domains_from};
pub use probe::{PageOutcome, PageProbe};
pub use scanner::DomainScanner;
pub use types::{
    CompanyRecord, CrawlSummary, Domain, ExtractionResult, PageSignals, ScanConfig, ScanEvent,
    DEFAULT_ACCEPT, DEFAULT_USER_AGENT, SUBPAGES,
};
pub use utils::{candidate_url, distinct_domains, validate_domain};

// Public modules
pub mod extract;

// Internal modules - these are not part of the public API
mod aggregate;
mod concurrent;
mod config;
mod error;
mod index;
mod input;
mod probe;
mod scanner;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ScanError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
