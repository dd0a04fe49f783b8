//! JacLang bundler CLI entrypoint.
//!
//! Builds the jaclang zip for the Pyodide playground. Progress goes to
//! stderr; the verification summary goes to stdout.

use clap::Parser;
use jaclang_bundler::cli::Cli;
use jaclang_bundler::command::SystemCommandExecutor;
use jaclang_bundler::error::Result;
use jaclang_bundler::output::{report_lines, write_stderr_line};
use jaclang_bundler::pipeline::{BundleRequest, run_bundle};
use jaclang_bundler::verify::ArchiveReport;
use std::io::Write;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let request = BundleRequest {
        source_dir: cli.source_dir.as_deref(),
        remote: cli.remote(),
        output: &cli.output,
        quiet: cli.quiet,
    };

    let outcome = run_bundle(&SystemCommandExecutor, &request, stderr)?;
    log::debug!(
        "bundled {} ({} files, {} excluded entries)",
        outcome.package_root,
        outcome.copy.files_copied,
        outcome.copy.entries_excluded
    );

    print_report(outcome.report.as_ref(), cli.json, stdout)
}

/// Prints the verification summary, as JSON when requested.
///
/// Prints nothing when the archive could not be verified; the pipeline has
/// already warned about it.
fn print_report(
    report: Option<&ArchiveReport>,
    json: bool,
    stdout: &mut dyn Write,
) -> Result<()> {
    let Some(report) = report else {
        return Ok(());
    };
    if json {
        serde_json::to_writer_pretty(&mut *stdout, report).map_err(std::io::Error::from)?;
        writeln!(stdout)?;
    } else {
        for line in report_lines(report) {
            writeln!(stdout, "{line}")?;
        }
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("Error: {err}"));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use jaclang_bundler::error::BundlerError;

    fn report() -> ArchiveReport {
        ArchiveReport {
            total_files: 12,
            native_entries: 0,
            typeshed_entries: 0,
            size_bytes: 2048,
            sha256: "cd".repeat(32),
        }
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = BundlerError::PackageNotFound {
            path: Utf8PathBuf::from("/tmp/nowhere"),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert_eq!(
            stderr_text,
            "Error: Cannot find jaclang package in '/tmp/nowhere'\n"
        );
    }

    #[test]
    fn human_report_lists_totals() {
        let mut stdout = Vec::new();
        print_report(Some(&report()), false, &mut stdout).expect("print");

        let text = String::from_utf8(stdout).expect("utf8");
        assert!(text.starts_with("Verified: no native/ or typeshed/ files in zip.\n"));
        assert!(text.contains("Total files in zip: 12\n"));
    }

    #[test]
    fn json_report_is_parseable() {
        let mut stdout = Vec::new();
        print_report(Some(&report()), true, &mut stdout).expect("print");

        let value: serde_json::Value = serde_json::from_slice(&stdout).expect("valid json");
        assert_eq!(value["total_files"], 12);
        assert_eq!(value["sha256"], "cd".repeat(32));
    }

    #[test]
    fn unverified_archive_still_exits_zero() {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let result = print_report(None, true, &mut stdout);

        assert_eq!(exit_code_for_run_result(result, &mut stderr), 0);
        assert!(stdout.is_empty());
        assert!(stderr.is_empty());
    }
}
