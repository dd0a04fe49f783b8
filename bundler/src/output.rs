//! Progress and summary formatting.
//!
//! Progress lines go to an injected writer (stderr in the binary) so tests can
//! capture them. The verification summary is rendered here too.

use crate::copier::CopySummary;
use crate::verify::ArchiveReport;
use camino::Utf8Path;
use std::io::Write;

/// Writes one line, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Formats the archive size line printed after zipping.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use jaclang_bundler::output::bundle_created_message;
///
/// let msg = bundle_created_message(Utf8Path::new("out/jaclang.zip"), 3 * 1024 * 1024);
/// assert_eq!(msg, "Bundle created: out/jaclang.zip (3.0 MB)");
/// ```
#[must_use]
pub fn bundle_created_message(output: &Utf8Path, size_bytes: u64) -> String {
    let megabytes = size_bytes as f64 / 1024.0 / 1024.0;
    format!("Bundle created: {output} ({megabytes:.1} MB)")
}

/// Formats the copy summary line.
#[must_use]
pub fn copy_summary_message(summary: &CopySummary) -> String {
    let plural = if summary.files_copied == 1 { "file" } else { "files" };
    format!(
        "Copied {} {plural} ({} patched)",
        summary.files_copied, summary.files_patched
    )
}

/// Renders the human-readable verification summary.
#[must_use]
pub fn report_lines(report: &ArchiveReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.native_entries > 0 {
        lines.push(format!(
            "WARNING: {} native files found in zip!",
            report.native_entries
        ));
    }
    if report.typeshed_entries > 0 {
        lines.push(format!(
            "WARNING: {} typeshed files found in zip!",
            report.typeshed_entries
        ));
    }
    if report.is_clean() {
        lines.push("Verified: no native/ or typeshed/ files in zip.".to_owned());
    }
    lines.push(format!("Total files in zip: {}", report.total_files));
    lines.push(format!("SHA-256: {}", report.sha256));
    lines
}
