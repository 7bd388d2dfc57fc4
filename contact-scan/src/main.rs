//! Contact Scan CLI Application
//!
//! A command-line interface that crawls business websites for phone numbers,
//! Facebook links and postal addresses, then writes a CSV report and
//! optionally pushes the records to a search index.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use console::Term;
use contact_scan_lib::{
    index_records, load_env_config, parse_timeout_string, read_company_info, read_domains,
    write_report, CompanyRecord, ConfigManager, CrawlScheduler, Domain, FileConfig,
    IndexSettings, OutputRecord, ResultAggregator, ScanConfig, SearchIndex,
};
use std::collections::HashMap;
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

const DEFAULT_DOMAINS_FILE: &str = "sample-websites.csv";
const DEFAULT_COMPANIES_FILE: &str = "sample-websites-company-names.csv";
const DEFAULT_REPORT_FILE: &str = "PhoneNumber_FacebookLink_Addresses_CompanyNames.csv";

/// Time budget for the search index upload.
const INDEX_TIMEOUT: Duration = Duration::from_secs(30);

/// CLI arguments for contact-scan
#[derive(Parser, Debug)]
#[command(name = "contact-scan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover phone numbers, Facebook links and addresses on business websites")]
#[command(
    long_about = "Discover phone numbers, Facebook links and addresses on business websites.\n\nProbes each domain's home, about and contact pages concurrently, joins the\nresults with a company-name table and writes a CSV report."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// CSV file with one domain per row, header row skipped [default: sample-websites.csv]
    #[arg(value_name = "DOMAINS_CSV", help_heading = "Input")]
    pub domains_file: Option<String>,

    /// Same as DOMAINS_CSV
    #[arg(
        long = "domains",
        value_name = "FILE",
        conflicts_with = "domains_file",
        help_heading = "Input"
    )]
    pub domains: Option<String>,

    /// Company-name table [default: sample-websites-company-names.csv]
    #[arg(long = "companies", value_name = "FILE", help_heading = "Input")]
    pub companies: Option<String>,

    /// Report file [default: PhoneNumber_FacebookLink_Addresses_CompanyNames.csv]
    #[arg(short = 'o', long = "output", value_name = "FILE", help_heading = "Output")]
    pub output: Option<String>,

    /// Also print the output records as JSON to stdout
    #[arg(long = "json", help_heading = "Output")]
    pub json: bool,

    /// Do not push records to the search index
    #[arg(long = "no-index", help_heading = "Output")]
    pub no_index: bool,

    /// Max concurrent domain scans (default: 15, max: 100)
    #[arg(short = 'c', long = "concurrency", value_name = "N", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Per-page timeout, e.g. 3s, 500ms, 1m (default: 3s)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,

    /// Hide progress lines
    #[arg(
        short = 'q',
        long = "quiet",
        conflicts_with = "verbose",
        help_heading = "Configuration"
    )]
    pub quiet: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug)]
struct RunSettings {
    scan: ScanConfig,
    domains_file: String,
    companies_file: String,
    /// Whether the companies file was named by the user rather than defaulted
    companies_explicit: bool,
    report_file: String,
    index: Option<IndexSettings>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging(args.verbose);

    // Run the scan
    if let Err(e) = run_scan(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the defaults.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "contact_scan=debug,contact_scan_lib=debug"
    } else {
        "contact_scan=info,contact_scan_lib=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn validate_args(args: &Args) -> Result<(), String> {
    // Validate concurrency
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > 100 {
            return Err("Concurrency must be between 1 and 100".to_string());
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '3s', '500ms', '1m'",
                timeout
            ));
        }
    }

    Ok(())
}

async fn run_scan(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let settings = build_settings(&args)?;

    // Input tables are read before any scanning starts; failures are fatal
    let domains = read_domains(&settings.domains_file)?;
    let companies = load_companies(&settings)?;

    let term = if args.json {
        Term::stderr()
    } else {
        Term::stdout()
    };

    if !args.quiet {
        ui::print_header(&term, domains.len(), settings.scan.concurrency);
    }

    let scheduler = CrawlScheduler::new(&settings.scan)?;
    let summary = scheduler
        .run_with_progress(&domains, |event| {
            if !args.quiet {
                ui::print_progress(&term, event);
            }
        })
        .await;

    let records = ResultAggregator::new(companies).aggregate(&domains, &summary);

    match &settings.index {
        Some(index_settings) => export_to_index(index_settings.clone(), &records).await,
        None => info!("Search indexing skipped (disabled or no credentials configured)"),
    }

    write_report(&settings.report_file, &records)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    ui::print_summary(
        &term,
        &settings.report_file,
        summary.success_count,
        summary.failure_count,
        start.elapsed(),
    );

    Ok(())
}

/// Read the company table, tolerating a missing default file.
fn load_companies(
    settings: &RunSettings,
) -> Result<HashMap<Domain, CompanyRecord>, Box<dyn std::error::Error>> {
    if !settings.companies_explicit && !Path::new(&settings.companies_file).exists() {
        warn!(
            "Company names file '{}' not found, continuing without company names",
            settings.companies_file
        );
        return Ok(HashMap::new());
    }

    Ok(read_company_info(&settings.companies_file)?)
}

/// Push records to the search index. Failures are logged, never fatal.
async fn export_to_index(index_settings: IndexSettings, records: &[OutputRecord]) {
    let index = match SearchIndex::new(index_settings, INDEX_TIMEOUT) {
        Ok(index) => index,
        Err(e) => {
            error!("Search indexing failed: {}", e);
            return;
        }
    };

    match index.save_objects(&index_records(records)).await {
        Ok(0) => info!("No records to index"),
        Ok(count) => info!("Indexed {} records to '{}'", count, index.index_name()),
        Err(e) => error!("Search indexing failed: {}", e),
    }
}

/// Resolve settings from config files, environment and CLI arguments.
///
/// Precedence, highest first: CLI > CS_* env > explicit config file > discovered files.
fn build_settings(args: &Args) -> Result<RunSettings, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new(args.verbose);
    let env_config = load_env_config(args.verbose);

    // Step 1: Determine config file path and load config files
    let file_config = if let Some(explicit_config_path) = &args.config {
        info!("Using config file (--config): {}", explicit_config_path);
        config_manager
            .load_file(explicit_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit_config_path, e))?
    } else if let Some(env_config_path) = &env_config.config {
        info!("Using config file (CS_CONFIG): {}", env_config_path);
        config_manager
            .load_file(env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?
    } else {
        match config_manager.discover_and_load() {
            Ok(file_config) => file_config,
            Err(e) => {
                if args.verbose {
                    warn!("Config discovery warning: {}", e);
                }
                FileConfig::default()
            }
        }
    };

    // Step 2: Apply environment variables (CS_*)
    let config = env_config.apply_to(file_config);

    // Step 3: Apply CLI arguments (highest precedence)
    resolve_settings(args, config)
}

/// Combine the merged file/env configuration with CLI arguments.
fn resolve_settings(
    args: &Args,
    config: FileConfig,
) -> Result<RunSettings, Box<dyn std::error::Error>> {
    let defaults = config.defaults.unwrap_or_default();
    let input = config.input.unwrap_or_default();
    let output = config.output.unwrap_or_default();

    let mut scan = ScanConfig::default();
    if let Some(concurrency) = args.concurrency.or(defaults.concurrency) {
        scan = scan.with_concurrency(concurrency);
    }
    if let Some(timeout_str) = args.timeout.as_ref().or(defaults.timeout.as_ref()) {
        let timeout = parse_timeout_string(timeout_str)
            .ok_or_else(|| format!("Invalid timeout '{}'", timeout_str))?;
        scan = scan.with_timeout(timeout);
    }
    if let Some(user_agent) = defaults.user_agent {
        scan = scan.with_user_agent(user_agent);
    }

    let domains_file = args
        .domains_file
        .clone()
        .or_else(|| args.domains.clone())
        .or(input.domains)
        .unwrap_or_else(|| DEFAULT_DOMAINS_FILE.to_string());

    let companies_explicit = args.companies.is_some() || input.companies.is_some();
    let companies_file = args
        .companies
        .clone()
        .or(input.companies)
        .unwrap_or_else(|| DEFAULT_COMPANIES_FILE.to_string());

    let report_file = args
        .output
        .clone()
        .or(output.report)
        .unwrap_or_else(|| DEFAULT_REPORT_FILE.to_string());

    let index = if args.no_index {
        None
    } else {
        config.index.and_then(|index| index.settings())
    };

    Ok(RunSettings {
        scan,
        domains_file,
        companies_file,
        companies_explicit,
        report_file,
        index,
    })
}
