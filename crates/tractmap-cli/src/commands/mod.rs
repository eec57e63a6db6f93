//! CLI command implementations.

pub mod build;
pub mod classify;
pub mod join;
pub mod nearest;

use colored::Colorize;
use tractmap::JoinReport;

/// Print join counts, flagging unmatched features.
pub(crate) fn print_join_report(report: &JoinReport, total: usize) {
    println!(
        "Matched {} of {} features",
        report.matched.to_string().white().bold(),
        total
    );
    if !report.unmatched.is_empty() {
        println!(
            "  {} features without a matching record",
            report.unmatched.len().to_string().yellow()
        );
    }
    if report.duplicate_keys > 0 {
        println!(
            "  {} duplicate record keys ignored (first occurrence kept)",
            report.duplicate_keys.to_string().yellow()
        );
    }
    if report.unavailable_values > 0 {
        println!(
            "  {} values missing or not numeric",
            report.unavailable_values.to_string().yellow()
        );
    }
}
