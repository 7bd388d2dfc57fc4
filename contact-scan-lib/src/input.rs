//! Reading the domain list and the company-name table.

use crate::error::ScanError;
use crate::types::{CompanyRecord, Domain};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One row of the company-name table.
#[derive(Debug, Deserialize)]
struct CompanyRow {
    domain: String,
    company_commercial_name: String,
    company_legal_name: String,
    company_all_available_names: String,
}

/// Read the domain list: a headered CSV whose first column holds domains.
///
/// Values are trimmed and empty cells skipped; order and duplicates are kept.
pub fn read_domains<P: AsRef<Path>>(path: P) -> Result<Vec<Domain>, ScanError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| file_error(path, e))?;

    let domains = read_domains_from(file).map_err(|e| file_error(path, e))?;
    debug!("Read {} domains from {}", domains.len(), path.display());
    Ok(domains)
}

/// Read the domain list from any reader.
pub fn read_domains_from<R: Read>(reader: R) -> Result<Vec<Domain>, ScanError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut domains = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(domain) = record.get(0).map(str::trim) {
            if !domain.is_empty() {
                domains.push(domain.to_string());
            }
        }
    }

    Ok(domains)
}

/// Read the company-name table keyed by domain.
///
/// Required columns: `domain`, `company_commercial_name`,
/// `company_legal_name` and `company_all_available_names`. When a domain
/// appears more than once the last row wins.
pub fn read_company_info<P: AsRef<Path>>(
    path: P,
) -> Result<HashMap<Domain, CompanyRecord>, ScanError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| file_error(path, e))?;

    let companies = read_company_info_from(file).map_err(|e| file_error(path, e))?;
    debug!(
        "Read {} company records from {}",
        companies.len(),
        path.display()
    );
    Ok(companies)
}

/// Read the company-name table from any reader.
pub fn read_company_info_from<R: Read>(
    reader: R,
) -> Result<HashMap<Domain, CompanyRecord>, ScanError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut companies = HashMap::new();
    for row in rdr.deserialize() {
        let row: CompanyRow = row?;
        if row.domain.is_empty() {
            continue;
        }
        companies.insert(
            row.domain,
            CompanyRecord {
                commercial_name: row.company_commercial_name,
                legal_name: row.company_legal_name,
                all_available_names: row.company_all_available_names,
            },
        );
    }

    Ok(companies)
}

fn file_error<E: std::fmt::Display>(path: &Path, err: E) -> ScanError {
    ScanError::file_error(path.display().to_string(), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_domains_skips_header_and_blanks() {
        let input = "domain\n example.com \n\nacme.org\nexample.com\n";
        let domains = read_domains_from(input.as_bytes()).unwrap();
        assert_eq!(domains, vec!["example.com", "acme.org", "example.com"]);
    }

    #[test]
    fn test_read_domains_uses_first_column() {
        let input = "domain,notes\nacme.org,bakery\nbeta.io\n";
        let domains = read_domains_from(input.as_bytes()).unwrap();
        assert_eq!(domains, vec!["acme.org", "beta.io"]);
    }

    #[test]
    fn test_read_domains_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "domain").unwrap();
        writeln!(temp_file, "example.com").unwrap();

        let domains = read_domains(temp_file.path()).unwrap();
        assert_eq!(domains, vec!["example.com"]);
    }

    #[test]
    fn test_read_domains_missing_file() {
        let err = read_domains("/nonexistent/domains.csv").unwrap_err();
        assert!(matches!(err, ScanError::FileError { .. }));
    }

    #[test]
    fn test_read_company_info() {
        let input = "\
domain,company_commercial_name,company_legal_name,company_all_available_names
acme.org,Acme,Acme Bakery LLC,Acme | Acme Bakery LLC
beta.io,Beta,Beta Inc,Beta
acme.org,Acme Two,Acme Two LLC,Acme Two
";
        let companies = read_company_info_from(input.as_bytes()).unwrap();

        assert_eq!(companies.len(), 2);
        assert_eq!(companies["acme.org"].commercial_name, "Acme Two");
        assert_eq!(companies["beta.io"].legal_name, "Beta Inc");
    }

    #[test]
    fn test_read_company_info_missing_column() {
        let input = "domain,company_commercial_name\nacme.org,Acme\n";
        assert!(read_company_info_from(input.as_bytes()).is_err());
    }

    #[test]
    fn test_read_company_info_file_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "domain,company_commercial_name").unwrap();
        writeln!(temp_file, "acme.org,Acme").unwrap();

        let err = read_company_info(temp_file.path()).unwrap_err();
        assert!(matches!(err, ScanError::FileError { .. }));
    }
}
