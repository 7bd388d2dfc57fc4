//! Per-domain scanning across the fixed subpage list.

use crate::error::ScanError;
use crate::extract::TextSignalExtractor;
use crate::probe::{PageOutcome, PageProbe};
use crate::types::{Domain, ExtractionResult, ScanConfig, SUBPAGES};
use crate::utils::{candidate_url, validate_domain};
use std::sync::Arc;
use tracing::{debug, warn};

/// Scans one domain by probing its primary page and the well-known
/// "about"/"contact" subpages, merging every signal found.
///
/// Subpages are visited strictly in order. A non-200 answer moves on to the
/// next subpage; a transport error ends the scan for that domain, keeping
/// whatever was gathered before it.
///
/// # Example
///
/// ```rust,no_run
/// use contact_scan_lib::{DomainScanner, ScanConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scanner = DomainScanner::new(&ScanConfig::default())?;
///     let (domain, result) = scanner.scan("example.com").await;
///     println!("{}: {} phone numbers", domain, result.phone_numbers.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DomainScanner {
    probe: PageProbe,
    extractor: Arc<TextSignalExtractor>,
}

impl DomainScanner {
    /// Create a scanner with its own probe and extractor.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        Ok(Self {
            probe: PageProbe::new(config)?,
            extractor: Arc::new(TextSignalExtractor::new()?),
        })
    }

    /// Create a scanner from existing parts.
    pub fn with_parts(probe: PageProbe, extractor: Arc<TextSignalExtractor>) -> Self {
        Self { probe, extractor }
    }

    /// Scan one domain. Never fails; problems show up as missing signals
    /// and an unreachable primary page.
    pub async fn scan(&self, domain: &str) -> (Domain, ExtractionResult) {
        let mut result = ExtractionResult::default();

        if let Err(e) = validate_domain(domain) {
            warn!("Skipping {}", e);
            return (domain.to_string(), result);
        }

        for subpage in SUBPAGES {
            let url = candidate_url(domain, subpage);
            let is_primary = subpage.is_empty();

            match self.probe.fetch(&url).await {
                PageOutcome::Success { text, raw_body } => {
                    result.merge_signals(self.extractor.extract(&text, &raw_body));
                    if is_primary {
                        result.primary_page_reachable = true;
                    }
                }
                PageOutcome::EmptyOrNonOk { status } => {
                    if is_primary {
                        debug!("Primary page of {} answered HTTP {}", domain, status);
                    }
                }
                PageOutcome::TransportError(e) => {
                    if is_primary {
                        warn!("Error accessing {}: {}", url, e);
                    } else {
                        debug!("Stopping scan of {} at {}: {}", domain, url, e);
                    }
                    break;
                }
            }
        }

        debug!(
            "Scanned {}: {} phones, {} links, {} addresses",
            domain,
            result.phone_numbers.len(),
            result.facebook_links.len(),
            result.addresses.len()
        );

        (domain.to_string(), result)
    }
}
