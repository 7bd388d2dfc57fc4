//! Error handling for scanning, input and export operations.
//!
//! This module defines a single error type covering every way a run can fail,
//! from a refused connection on one page to an unreadable input table.
//! Page-level errors are contained by the scanner; only configuration and
//! input errors are meant to abort a run.

use std::fmt;
use std::time::Duration;

/// Main error type for contact scanning operations.
#[derive(Debug, Clone)]
pub enum ScanError {
    /// Domain string that cannot be turned into a fetchable URL
    InvalidDomain { domain: String, reason: String },

    /// Network-related errors (DNS, connection refused, reset, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// A request did not complete within its time budget
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Malformed data (JSON, CSV rows, etc.)
    ParseError {
        message: String,
        content: Option<String>,
    },

    /// Configuration errors (invalid settings, unparsable files)
    ConfigError { message: String },

    /// File I/O errors when reading input tables or writing the report
    FileError { path: String, message: String },

    /// Search-index upsert failures
    IndexError {
        message: String,
        status_code: Option<u16>,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl ScanError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new index error.
    pub fn index<M: Into<String>>(message: M) -> Self {
        Self::IndexError {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new index error with the HTTP status the service answered with.
    pub fn index_with_status<M: Into<String>>(message: M, status_code: u16) -> Self {
        Self::IndexError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error happened at the transport level.
    ///
    /// Transport errors end a domain scan early; every other page-level
    /// condition lets the scanner move on to the next subpage.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::Timeout { .. })
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::ParseError { message, content: _ } => {
                write!(f, "Parse error: {}", message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::IndexError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "Search index error (HTTP {}): {}", code, message)
                } else {
                    write!(f, "Search index error: {}", message)
                }
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ScanError {}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
            content: None,
        }
    }
}

impl From<csv::Error> for ScanError {
    fn from(err: csv::Error) -> Self {
        Self::ParseError {
            message: format!("CSV parsing failed: {}", err),
            content: None,
        }
    }
}

impl From<toml::de::Error> for ScanError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<regex::Error> for ScanError {
    fn from(err: regex::Error) -> Self {
        Self::Internal {
            message: format!("Regex error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(ScanError::network_with_source("Connection failed", "refused").is_transport());
        assert!(ScanError::timeout("GET", Duration::from_secs(3)).is_transport());
        assert!(!ScanError::index("boom").is_transport());
        assert!(!ScanError::file_error("a.csv", "missing").is_transport());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ScanError::index_with_status("invalid credentials", 403);
        assert_eq!(
            err.to_string(),
            "Search index error (HTTP 403): invalid credentials"
        );

        let err = ScanError::network_with_source("Connection failed", "refused");
        assert_eq!(
            err.to_string(),
            "Network error: Connection failed (source: refused)"
        );
    }
}
