//! Concurrent scanning of many domains.
//!
//! This module runs domain scans on a bounded pool: at most `concurrency`
//! scans are in flight at any moment, results are handed to a single
//! consumer as each scan finishes, and a scan that panics is contained to
//! its own domain.

use crate::error::ScanError;
use crate::scanner::DomainScanner;
use crate::types::{CrawlSummary, Domain, ExtractionResult, ScanConfig, ScanEvent};
use crate::utils::distinct_domains;
use futures::stream::{Stream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use tracing::{error, info};

/// Schedules domain scans over a fixed-size worker pool.
///
/// # Example
///
/// ```rust,no_run
/// use contact_scan_lib::{CrawlScheduler, ScanConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scheduler = CrawlScheduler::new(&ScanConfig::default().with_concurrency(10))?;
///     let domains = vec!["example.com".to_string(), "example.org".to_string()];
///
///     let summary = scheduler.run(&domains).await;
///     println!(
///         "{} reachable, {} unreachable",
///         summary.success_count, summary.failure_count
///     );
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CrawlScheduler {
    scanner: DomainScanner,
    concurrency: usize,
}

impl CrawlScheduler {
    /// Create a scheduler whose pool size comes from the configuration.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        Ok(Self::with_scanner(
            DomainScanner::new(config)?,
            config.concurrency,
        ))
    }

    /// Create a scheduler around an existing scanner.
    pub fn with_scanner(scanner: DomainScanner, concurrency: usize) -> Self {
        Self {
            scanner,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scan every distinct domain, yielding results as scans complete.
    ///
    /// Completion order is unspecified. Each distinct domain is yielded
    /// exactly once, including domains whose scan panicked.
    pub fn scan_stream(
        &self,
        domains: &[Domain],
    ) -> Pin<Box<dyn Stream<Item = (Domain, ExtractionResult)> + Send + 'static>> {
        let scanner = self.scanner.clone();
        let scan = move |domain: Domain| {
            let scanner = scanner.clone();
            async move { scanner.scan(&domain).await.1 }
        };

        Box::pin(bounded_scans(
            distinct_domains(domains),
            self.concurrency,
            scan,
        ))
    }

    /// Scan every distinct domain and collect the results.
    pub async fn run(&self, domains: &[Domain]) -> CrawlSummary {
        self.run_with_progress(domains, |_| {}).await
    }

    /// Scan every distinct domain, calling `on_event` after each scan.
    pub async fn run_with_progress<F>(&self, domains: &[Domain], mut on_event: F) -> CrawlSummary
    where
        F: FnMut(&ScanEvent),
    {
        let total = distinct_domains(domains).len();
        info!(
            "Scanning {} domains with concurrency {}",
            total, self.concurrency
        );

        let mut summary = CrawlSummary::default();
        let mut stream = self.scan_stream(domains);

        while let Some((domain, result)) = stream.next().await {
            if result.primary_page_reachable {
                summary.success_count += 1;
            } else {
                summary.failure_count += 1;
            }

            let event = ScanEvent {
                completed: summary.success_count + summary.failure_count,
                total,
                domain: domain.clone(),
                primary_page_reachable: result.primary_page_reachable,
            };
            summary.results.insert(domain, result);
            on_event(&event);
        }

        info!(
            "Scan finished: {} reachable, {} unreachable",
            summary.success_count, summary.failure_count
        );
        summary
    }
}

/// Run `scan` for every domain with at most `concurrency` scans in flight.
///
/// Each scan runs as its own task; a task that panics or is cancelled
/// yields an empty result for its domain.
pub(crate) fn bounded_scans<F, Fut>(
    domains: Vec<Domain>,
    concurrency: usize,
    scan: F,
) -> impl Stream<Item = (Domain, ExtractionResult)> + Send
where
    F: Fn(Domain) -> Fut + Send + 'static,
    Fut: Future<Output = ExtractionResult> + Send + 'static,
{
    futures::stream::iter(domains)
        .map(move |domain| {
            let task = tokio::spawn(scan(domain.clone()));
            async move {
                match task.await {
                    Ok(result) => (domain, result),
                    Err(e) => {
                        error!("Scan of {} aborted: {}", domain, e);
                        (domain, ExtractionResult::default())
                    }
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
}
