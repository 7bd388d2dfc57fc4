//! Joining scan results with company names, and the CSV report.
//!
//! Output records are produced in input order, one per input row. Values
//! shown in the report are sorted, joined with `", "` and replaced by `N/A`
//! when missing.

use crate::error::ScanError;
use crate::extract::deduplicate_address;
use crate::types::{CompanyRecord, CrawlSummary, Domain, ExtractionResult};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Placeholder for empty or missing report values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Report column names, in column order.
pub const REPORT_HEADERS: [&str; 7] = [
    "Domain",
    "Phone Numbers",
    "Facebook Links",
    "Addresses",
    "Company Commercial Name",
    "Company Legal Name",
    "Company All Available Names",
];

/// A domain's extraction result joined with its company names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub domain: Domain,
    pub result: ExtractionResult,
    pub company: Option<CompanyRecord>,
}

impl OutputRecord {
    /// Render the record as one report row, columns as in [`REPORT_HEADERS`].
    pub fn report_row(&self) -> [String; 7] {
        let addresses: BTreeSet<String> = self
            .result
            .addresses
            .iter()
            .map(|address| deduplicate_address(address))
            .collect();

        let company = self.company.as_ref();

        [
            self.domain.clone(),
            join_or_placeholder(&self.result.phone_numbers),
            join_or_placeholder(&self.result.facebook_links),
            join_or_placeholder(&addresses),
            value_or_placeholder(company.map(|c| c.commercial_name.as_str())),
            value_or_placeholder(company.map(|c| c.legal_name.as_str())),
            value_or_placeholder(company.map(|c| c.all_available_names.as_str())),
        ]
    }

    /// Flatten the record into the document pushed to the search index.
    pub fn index_record(&self) -> IndexRecord {
        IndexRecord {
            object_id: self.domain.clone(),
            domain: self.domain.clone(),
            phone_numbers: join(&self.result.phone_numbers),
            facebook_links: join(&self.result.facebook_links),
            addresses: join(&self.result.addresses),
            company: self.company.clone(),
        }
    }
}

/// Search-index document keyed by domain.
///
/// Company fields are present only when a company record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexRecord {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub domain: String,
    pub phone_numbers: String,
    pub facebook_links: String,
    pub addresses: String,
    #[serde(flatten)]
    pub company: Option<CompanyRecord>,
}

/// Joins scan results with the company-name table.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    companies: HashMap<Domain, CompanyRecord>,
}

impl ResultAggregator {
    pub fn new(companies: HashMap<Domain, CompanyRecord>) -> Self {
        Self { companies }
    }

    /// Number of known company records.
    pub fn company_count(&self) -> usize {
        self.companies.len()
    }

    /// Build one output record per input domain, in input order.
    ///
    /// A domain missing from the summary gets an empty, unreachable result.
    pub fn aggregate(&self, domains: &[Domain], summary: &CrawlSummary) -> Vec<OutputRecord> {
        domains
            .iter()
            .map(|domain| OutputRecord {
                domain: domain.clone(),
                result: summary.results.get(domain).cloned().unwrap_or_default(),
                company: self.companies.get(domain).cloned(),
            })
            .collect()
    }
}

/// Index documents for a set of output records, one per distinct domain.
pub fn index_records(records: &[OutputRecord]) -> Vec<IndexRecord> {
    let mut seen = HashSet::new();

    records
        .iter()
        .filter(|record| seen.insert(record.domain.as_str()))
        .map(OutputRecord::index_record)
        .collect()
}

/// Write the CSV report to `path`, replacing any existing file.
pub fn write_report<P: AsRef<Path>>(path: P, records: &[OutputRecord]) -> Result<(), ScanError> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| ScanError::file_error(path.display().to_string(), e.to_string()))?;

    write_report_to(file, records)
        .map_err(|e| ScanError::file_error(path.display().to_string(), e.to_string()))?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Write the CSV report to any writer.
pub fn write_report_to<W: Write>(writer: W, records: &[OutputRecord]) -> Result<(), ScanError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(REPORT_HEADERS)?;
    for record in records {
        wtr.write_record(record.report_row())?;
    }

    wtr.flush()
        .map_err(|e| ScanError::internal(format!("Failed to flush report: {}", e)))?;
    Ok(())
}

fn join(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn value_or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn join_or_placeholder(values: &BTreeSet<String>) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        join(values)
    }
}
