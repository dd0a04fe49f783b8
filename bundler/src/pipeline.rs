//! Bundling pipeline orchestration.
//!
//! Runs the steps in their fixed order: acquire source, locate the package,
//! copy and patch into a staging directory, recover the vendored `lark`
//! source, zip, then verify. Temporary clone and staging directories are
//! `TempDir` guards and are removed on every exit path.

use crate::archive::create_archive;
use crate::command::CommandExecutor;
use crate::copier::{CopySummary, copy_package_tree};
use crate::error::{BundlerError, Result};
use crate::fetch::{FetchOutcome, LARK, fetch_dependency_source, has_source_files};
use crate::locator::{PACKAGE_NAME, find_package_root};
use crate::output::{bundle_created_message, copy_summary_message, write_stderr_line};
use crate::source::{RemoteRepository, acquire_source};
use crate::verify::{ArchiveReport, inspect_archive};
use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use std::io::Write;

/// Inputs for one bundling run.
#[derive(Debug, Clone)]
pub struct BundleRequest<'a> {
    /// Local source directory; `None` clones `remote`.
    pub source_dir: Option<&'a Utf8Path>,
    /// Clone coordinates used when `source_dir` is `None`.
    pub remote: RemoteRepository,
    /// Archive path to write.
    pub output: &'a Utf8Path,
    /// Suppress progress lines.
    pub quiet: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct BundleOutcome {
    /// The package root that was bundled. Under a fresh clone this path no
    /// longer exists once the run returns.
    pub package_root: Utf8PathBuf,
    /// Counts from the tree copy.
    pub copy: CopySummary,
    /// Result of the vendored dependency check.
    pub fetch: FetchOutcome,
    /// Verification of the written archive; `None` if it could not be read back.
    pub report: Option<ArchiveReport>,
}

/// Runs the full bundling pipeline.
///
/// Progress and warnings are written to `stderr`.
///
/// # Errors
///
/// Returns [`BundlerError::PackageNotFound`] if the package root is missing,
/// [`BundlerError::Git`] if cloning fails, and I/O or archive errors from the
/// copy and zip steps. Dependency fetch failures and verification problems
/// are reported as warnings instead.
pub fn run_bundle(
    executor: &dyn CommandExecutor,
    request: &BundleRequest<'_>,
    stderr: &mut dyn Write,
) -> Result<BundleOutcome> {
    let source = acquire_source(
        executor,
        request.source_dir,
        &request.remote,
        request.quiet,
        stderr,
    )?;

    let package_root = find_package_root(source.source_dir())?;
    progress(request, stderr, format!("Found jaclang at: {package_root}"));

    let staging = tempfile::tempdir()?;
    let staging_dir = Utf8PathBuf::try_from(staging.path().to_path_buf()).map_err(|e| {
        BundlerError::NonUtf8Path {
            path: e.into_path_buf(),
        }
    })?;

    progress(request, stderr, "Copying and patching files...");
    let copy = copy_package_tree(&package_root, &staging_dir)?;
    progress(request, stderr, copy_summary_message(&copy));

    let fetch = recover_vendored_source(executor, &staging_dir, request, stderr)?;

    progress(request, stderr, format!("Creating zip: {}", request.output));
    create_archive(&staging_dir, request.output)?;
    drop(staging);

    let report = verify_archive(request, stderr);

    Ok(BundleOutcome {
        package_root,
        copy,
        fetch,
        report,
    })
}

fn recover_vendored_source(
    executor: &dyn CommandExecutor,
    staging_dir: &Utf8Path,
    request: &BundleRequest<'_>,
    stderr: &mut dyn Write,
) -> Result<FetchOutcome> {
    let vendor_dir = staging_dir.join(PACKAGE_NAME).join("vendor");
    let lark_dir = vendor_dir.join(LARK.name);
    if !has_source_files(&lark_dir)? {
        progress(
            request,
            stderr,
            "  Downloading lark source (vendored copy is bytecode-only)...",
        );
    }

    let outcome = fetch_dependency_source(executor, &vendor_dir, LARK)?;
    match &outcome {
        FetchOutcome::AlreadyPresent => {}
        FetchOutcome::Installed { entries } => {
            progress(
                request,
                stderr,
                format!("  Lark source installed ({entries} files)"),
            );
        }
        FetchOutcome::InstallFailed => {
            write_stderr_line(stderr, "  WARNING: Could not install lark via pip");
        }
        FetchOutcome::MissingFromDownload => {
            write_stderr_line(stderr, "  WARNING: Failed to download lark source");
        }
    }
    Ok(outcome)
}

fn verify_archive(request: &BundleRequest<'_>, stderr: &mut dyn Write) -> Option<ArchiveReport> {
    report_verification(inspect_archive(request.output), request, stderr)
}

/// Turns a read-back result into an optional report, warning on failure.
fn report_verification(
    inspected: Result<ArchiveReport>,
    request: &BundleRequest<'_>,
    stderr: &mut dyn Write,
) -> Option<ArchiveReport> {
    match inspected {
        Ok(report) => {
            progress(
                request,
                stderr,
                bundle_created_message(request.output, report.size_bytes),
            );
            Some(report)
        }
        Err(err) => {
            warn!("verification of {} failed: {err}", request.output);
            write_stderr_line(
                stderr,
                format!("WARNING: could not verify {}: {err}", request.output),
            );
            None
        }
    }
}

fn progress(request: &BundleRequest<'_>, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !request.quiet {
        write_stderr_line(stderr, message);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
