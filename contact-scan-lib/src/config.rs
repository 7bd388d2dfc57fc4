//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `CS_*`
//! environment variables, and merging configurations with proper precedence
//! rules.

use crate::error::ScanError;
use crate::index::IndexSettings;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Index name used when none is configured.
pub const DEFAULT_INDEX_NAME: &str = "ScrapperPhoneNumberFacebookLinksAddresses";

/// Configuration loaded from TOML files.
///
/// This represents the structure of configuration files that users can create
/// to set default values for a scan run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for scan options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Input table locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputConfig>,

    /// Report location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    /// Search index credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default per-page timeout (e.g. "3s", "500ms", "1m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Browser identity sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

/// Search index configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexConfig {
    /// Set to false to never push records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,

    /// Base URL override for self-hosted or test endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl IndexConfig {
    /// Resolve usable index settings.
    ///
    /// Returns `None` when indexing is disabled or either credential is
    /// missing.
    pub fn settings(&self) -> Option<IndexSettings> {
        if self.enabled == Some(false) {
            return None;
        }

        let app_id = self.app_id.as_deref().filter(|s| !s.trim().is_empty())?;
        let api_key = self.api_key.as_deref().filter(|s| !s.trim().is_empty())?;
        let index_name = self
            .index_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_INDEX_NAME);

        let settings = IndexSettings::new(app_id, api_key, index_name);
        Some(match &self.host {
            Some(host) if !host.trim().is_empty() => settings.with_host(host.as_str()),
            _ => settings,
        })
    }

    /// Overlay `higher` on top of `self`, field by field.
    fn merged_with(mut self, higher: IndexConfig) -> IndexConfig {
        if higher.enabled.is_some() {
            self.enabled = higher.enabled;
        }
        if higher.app_id.is_some() {
            self.app_id = higher.app_id;
        }
        if higher.api_key.is_some() {
            self.api_key = higher.api_key;
        }
        if higher.index_name.is_some() {
            self.index_name = higher.index_name;
        }
        if higher.host.is_some() {
            self.host = higher.host;
        }
        self
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed configuration or an error if parsing fails.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, ScanError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScanError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ScanError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        // Validate the loaded configuration
        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Looks for configuration files in standard locations and merges them
    /// according to precedence rules. Files that fail to load are skipped.
    pub fn discover_and_load(&self) -> Result<FileConfig, ScanError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        // Lowest precedence first
        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => {
                    if self.verbose {
                        warn!("Ignoring config file {}: {}", path.display(), e);
                    }
                }
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            warn!("Multiple config files found. Using precedence:");
            for (i, path) in loaded_files.iter().enumerate() {
                let status = if i == loaded_files.len() - 1 {
                    "highest"
                } else {
                    "overridden"
                };
                warn!("   {} ({})", path.display(), status);
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    ///
    /// Looks for configuration files in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./contact-scan.toml", "./.contact-scan.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path.
    ///
    /// Looks for configuration files in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".contact-scan.toml", "contact-scan.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Get the XDG configuration file path.
    ///
    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("contact-scan").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.user_agent.is_some() {
                        lower_defaults.user_agent = higher_defaults.user_agent;
                    }
                    Some(lower_defaults)
                }
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            input: match (lower.input, higher.input) {
                (Some(mut lower_input), Some(higher_input)) => {
                    if higher_input.domains.is_some() {
                        lower_input.domains = higher_input.domains;
                    }
                    if higher_input.companies.is_some() {
                        lower_input.companies = higher_input.companies;
                    }
                    Some(lower_input)
                }
                (lower_input, higher_input) => higher_input.or(lower_input),
            },
            output: match (lower.output, higher.output) {
                (Some(lower_output), Some(higher_output)) => Some(OutputConfig {
                    report: higher_output.report.or(lower_output.report),
                }),
                (lower_output, higher_output) => higher_output.or(lower_output),
            },
            index: match (lower.index, higher.index) {
                (Some(lower_index), Some(higher_index)) => {
                    Some(lower_index.merged_with(higher_index))
                }
                (lower_index, higher_index) => higher_index.or(lower_index),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), ScanError> {
        if let Some(defaults) = &config.defaults {
            // Validate concurrency
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(ScanError::config("Concurrency must be between 1 and 100"));
                }
            }

            // Validate timeout format
            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(ScanError::config(format!(
                        "Invalid timeout format '{}'. Use format like '3s', '500ms', '1m'",
                        timeout_str
                    )));
                }
            }

            if let Some(user_agent) = &defaults.user_agent {
                if user_agent.trim().is_empty() {
                    return Err(ScanError::config("User agent cannot be empty"));
                }
            }
        }

        if let Some(index) = &config.index {
            if let Some(index_name) = &index.index_name {
                if index_name.trim().is_empty() || index_name.contains('/') {
                    return Err(ScanError::config(format!(
                        "Invalid index name '{}'",
                        index_name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via CS_* environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub user_agent: Option<String>,
    pub domains_file: Option<String>,
    pub companies_file: Option<String>,
    pub report_file: Option<String>,
    pub index_enabled: Option<bool>,
    pub index_app_id: Option<String>,
    pub index_api_key: Option<String>,
    pub index_name: Option<String>,
    pub index_host: Option<String>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Parse CS_* values using `lookup` to read each variable.
    ///
    /// Invalid values are logged as warnings (when verbose) and ignored.
    pub fn from_lookup<F>(lookup: F, verbose: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env_config = EnvConfig::default();

        // CS_CONCURRENCY - concurrent domain scans
        if let Some(val) = lookup("CS_CONCURRENCY") {
            match val.trim().parse::<usize>() {
                Ok(concurrency) if concurrency > 0 && concurrency <= 100 => {
                    env_config.concurrency = Some(concurrency);
                    if verbose {
                        info!("Using CS_CONCURRENCY={}", concurrency);
                    }
                }
                _ => {
                    if verbose {
                        warn!("Invalid CS_CONCURRENCY='{}', must be 1-100", val);
                    }
                }
            }
        }

        // CS_TIMEOUT - per-page timeout
        if let Some(timeout_str) = lookup("CS_TIMEOUT") {
            if parse_timeout_string(&timeout_str).is_some() {
                if verbose {
                    info!("Using CS_TIMEOUT={}", timeout_str);
                }
                env_config.timeout = Some(timeout_str);
            } else if verbose {
                warn!(
                    "Invalid CS_TIMEOUT='{}', use format like '3s', '500ms', '1m'",
                    timeout_str
                );
            }
        }

        // CS_INDEX_ENABLED - enable/disable search indexing
        if let Some(val) = lookup("CS_INDEX_ENABLED") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => env_config.index_enabled = Some(true),
                "false" | "0" | "no" | "off" => env_config.index_enabled = Some(false),
                _ => {
                    if verbose {
                        warn!("Invalid CS_INDEX_ENABLED='{}', use true/false", val);
                    }
                }
            }
        }

        let text = |key: &str| {
            lookup(key).filter(|value| !value.trim().is_empty()).map(|value| {
                if verbose {
                    info!("Using {}", key);
                }
                value
            })
        };

        env_config.user_agent = text("CS_USER_AGENT");
        env_config.domains_file = text("CS_DOMAINS_FILE");
        env_config.companies_file = text("CS_COMPANIES_FILE");
        env_config.report_file = text("CS_REPORT_FILE");
        env_config.index_app_id = text("CS_INDEX_APP_ID");
        env_config.index_api_key = text("CS_INDEX_API_KEY");
        env_config.index_name = text("CS_INDEX_NAME");
        env_config.index_host = text("CS_INDEX_HOST");
        env_config.config = text("CS_CONFIG");

        env_config
    }

    /// Index overrides carried by the environment, if any.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            enabled: self.index_enabled,
            app_id: self.index_app_id.clone(),
            api_key: self.index_api_key.clone(),
            index_name: self.index_name.clone(),
            host: self.index_host.clone(),
        }
    }

    /// Overlay the environment values on top of a file configuration.
    pub fn apply_to(&self, mut config: FileConfig) -> FileConfig {
        let defaults = config.defaults.get_or_insert_with(Default::default);
        if self.concurrency.is_some() {
            defaults.concurrency = self.concurrency;
        }
        if self.timeout.is_some() {
            defaults.timeout = self.timeout.clone();
        }
        if self.user_agent.is_some() {
            defaults.user_agent = self.user_agent.clone();
        }

        let input = config.input.get_or_insert_with(Default::default);
        if self.domains_file.is_some() {
            input.domains = self.domains_file.clone();
        }
        if self.companies_file.is_some() {
            input.companies = self.companies_file.clone();
        }

        if self.report_file.is_some() {
            config.output.get_or_insert_with(Default::default).report = self.report_file.clone();
        }

        let index = config.index.take().unwrap_or_default();
        config.index = Some(index.merged_with(self.index_config()));

        config
    }
}

/// Load configuration from environment variables.
///
/// Parses all CS_* environment variables and returns a structured configuration.
/// Invalid values are logged as warnings and ignored.
///
/// # Arguments
///
/// * `verbose` - Whether to log environment variable usage
pub fn load_env_config(verbose: bool) -> EnvConfig {
    EnvConfig::from_lookup(|key| env::var(key).ok(), verbose)
}

/// Longest accepted per-page timeout.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Parse a timeout string like "3s", "500ms" or "1m".
///
/// A bare number is read as seconds. Zero and anything above
/// [`MAX_TIMEOUT`] are rejected.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let duration = if let Some(ms) = timeout_str.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok().map(Duration::from_secs)
    };

    duration.filter(|d| !d.is_zero() && *d <= MAX_TIMEOUT)
}
