//! Vendored `lark` source recovery.
//!
//! Some jaclang checkouts vendor `lark` as bytecode only, which Pyodide cannot
//! load across interpreter versions. When no `.py` file is present at the top
//! of `vendor/lark`, the pinned release is installed into a scratch directory
//! with pip and copied over the vendored copy.
//!
//! Failure to fetch is non-fatal: the caller reports a warning and bundles
//! whatever was vendored.

use crate::command::{CommandExecutor, stderr_text};
use crate::copier::copy_tree_filtered;
use crate::error::{BundlerError, Result};
use crate::exclusion::is_python_source;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;

/// A third-party package vendored inside jaclang.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendoredDependency {
    /// Import name, also the vendor subdirectory name.
    pub name: &'static str,
    /// Exact version to install.
    pub version: &'static str,
}

impl VendoredDependency {
    /// Returns the pip requirement string, e.g. `lark==1.2.2`.
    #[must_use]
    pub fn requirement(&self) -> String {
        format!("{}=={}", self.name, self.version)
    }
}

/// The parser generator jaclang vendors.
pub const LARK: VendoredDependency = VendoredDependency {
    name: "lark",
    version: "1.2.2",
};

/// Installer invocations tried in order until one succeeds.
pub const INSTALLERS: &[&[&str]] = &[
    &["python3", "-m", "pip"],
    &["python", "-m", "pip"],
    &["pip3"],
    &["pip"],
];

/// Result of [`fetch_dependency_source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The vendored copy already contains source files.
    AlreadyPresent,
    /// Source was fetched; `entries` counts top-level entries now in place.
    Installed {
        /// Top-level entries in the replaced vendor directory.
        entries: usize,
    },
    /// Every installer failed; nothing was changed.
    InstallFailed,
    /// An installer succeeded but produced no package directory.
    MissingFromDownload,
}

/// Ensures `vendor_dir/<dependency>` holds source-form files.
///
/// # Errors
///
/// Returns an I/O error only when reading the vendor directory or replacing
/// it fails. Installer failures are reported through [`FetchOutcome`].
pub fn fetch_dependency_source(
    executor: &dyn CommandExecutor,
    vendor_dir: &Utf8Path,
    dependency: VendoredDependency,
) -> Result<FetchOutcome> {
    let dest = vendor_dir.join(dependency.name);
    if has_source_files(&dest)? {
        return Ok(FetchOutcome::AlreadyPresent);
    }

    let scratch = tempfile::tempdir()?;
    let scratch_dir =
        Utf8PathBuf::try_from(scratch.path().to_path_buf()).map_err(|e| BundlerError::NonUtf8Path {
            path: e.into_path_buf(),
        })?;

    if !install_with_fallback(executor, dependency, &scratch_dir) {
        return Ok(FetchOutcome::InstallFailed);
    }

    let fetched = scratch_dir.join(dependency.name);
    if !fetched.is_dir() {
        return Ok(FetchOutcome::MissingFromDownload);
    }

    if dest.is_dir() {
        fs::remove_dir_all(&dest)?;
    }
    copy_tree_filtered(&fetched, &dest, is_cache_artifact)?;

    let entries = fs::read_dir(&dest)?.count();
    Ok(FetchOutcome::Installed { entries })
}

/// Returns `true` if `dir` exists and directly contains a `.py` file name.
///
/// # Errors
///
/// Returns an I/O error if an existing directory cannot be listed.
pub fn has_source_files(dir: &Utf8Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    for entry in dir.read_dir_utf8()? {
        if is_python_source(entry?.file_name()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Tries each installer in [`INSTALLERS`]; returns `true` on the first success.
fn install_with_fallback(
    executor: &dyn CommandExecutor,
    dependency: VendoredDependency,
    target: &Utf8Path,
) -> bool {
    let requirement = dependency.requirement();
    let install_args = [
        "install",
        requirement.as_str(),
        "--target",
        target.as_str(),
        "--no-deps",
        "--no-cache-dir",
        "--quiet",
    ];

    for installer in INSTALLERS {
        let Some((cmd, prefix)) = installer.split_first() else {
            continue;
        };
        let args: Vec<&str> = prefix.iter().copied().chain(install_args).collect();

        match executor.run(cmd, &args) {
            Ok(output) if output.status.success() => {
                debug!("installed {requirement} with {}", installer.join(" "));
                return true;
            }
            Ok(output) => {
                debug!("{} failed: {}", installer.join(" "), stderr_text(&output));
            }
            Err(err) => {
                debug!("{} unavailable: {err}", installer.join(" "));
            }
        }
    }

    false
}

fn is_cache_artifact(name: &str) -> bool {
    name == "__pycache__" || name.ends_with(".pyc")
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
