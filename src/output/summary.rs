//! Run summary formatting
//!
//! Turns a `RunReport` into the plain-text summary printed at the end of a
//! crawl.

use crate::crawler::RunReport;
use std::fmt::Write;

/// Formats a run report as plain text
///
/// # Arguments
///
/// * `report` - The finished run
///
/// # Returns
///
/// A multi-line summary, one block per domain
pub fn format_run_summary(report: &RunReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Summary ===\n");
    let _ = writeln!(out, "Mode: {}", report.mode);
    let _ = writeln!(out, "Domains: {}", report.domains.len());
    let _ = writeln!(out, "Pages saved this run: {}", report.total_saved());
    let _ = writeln!(out, "Attempts: {}\n", report.total_attempts());

    for domain in &report.domains {
        let _ = writeln!(out, "{}:", domain.domain);
        if domain.skipped_at_init() {
            let _ = writeln!(
                out,
                "  skipped, budget already met ({}/{})",
                domain.saved_total, domain.budget
            );
            continue;
        }

        let _ = writeln!(
            out,
            "  saved {} this run, {}/{} total, {} attempts",
            domain.saved_this_run, domain.saved_total, domain.budget, domain.attempts
        );
        for (outcome, count) in &domain.outcomes {
            let _ = writeln!(out, "  {}: {}", outcome, count);
        }
    }

    out
}

/// Prints the run summary to stdout
pub fn print_run_summary(report: &RunReport) {
    print!("{}", format_run_summary(report));
}
