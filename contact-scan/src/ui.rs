//! Terminal display logic for the contact-scan CLI.
//!
//! This module handles the run header, per-domain progress lines and the
//! final summary. Everything is written to a caller-chosen terminal so that
//! stdout stays clean when `--json` is used.

use console::{pad_str, style, Alignment, Term};
use contact_scan_lib::ScanEvent;
use std::time::Duration;

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a run.
pub fn print_header(term: &Term, domain_count: usize, concurrency: usize) {
    let _ = term.write_line(&format!(
        "{} {} {}",
        style("contact-scan").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "- Scanning {} domain{} | Concurrency: {}",
            domain_count,
            if domain_count == 1 { "" } else { "s" },
            concurrency
        ))
        .dim(),
    ));
    let _ = term.write_line("");
}

// ── Progress line ────────────────────────────────────────────────────────────

/// Print one `[i/N] domain  STATUS` line after a domain scan completes.
pub fn print_progress(term: &Term, event: &ScanEvent) {
    let _ = term.write_line(&progress_line(event));
}

fn progress_line(event: &ScanEvent) -> String {
    let padded_domain = pad_str(&event.domain, 30, Alignment::Left, Some(".."));
    let status = if event.primary_page_reachable {
        style("REACHABLE").green().bold()
    } else {
        style("UNREACHABLE").red().bold()
    };

    format!(
        "  {} {}  {}",
        style(format!("[{}/{}]", event.completed, event.total)).dim(),
        style(&padded_domain).white(),
        status,
    )
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print where the report went, the reachability counts and the run time.
pub fn print_summary(
    term: &Term,
    report_path: &str,
    reachable: usize,
    unreachable: usize,
    elapsed: Duration,
) {
    let _ = term.write_line("");
    let _ = term.write_line(&format!("Data has been written to {}", report_path));
    let _ = term.write_line(&format!(
        "Successfully accessed {} websites.",
        style(reachable).green()
    ));
    let _ = term.write_line(&format!(
        "Failed to access {} websites.",
        style(unreachable).red()
    ));
    let _ = term.write_line(&format!("Time taken: {}.", format_elapsed(elapsed)));
}

/// Format a run time as `N minutes and M seconds`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{} minutes and {} seconds", total / 60, total % 60)
}

// ── Tests ────────────────────────────────────────────────────────────────────
