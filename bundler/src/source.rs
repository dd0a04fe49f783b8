//! Source acquisition: use a local checkout or shallow-clone the jaseci repo.
//!
//! A cloned source owns its temporary directory; dropping the returned
//! [`SourceLocation`] removes the clone on every exit path.

use crate::command::{CommandExecutor, stderr_text};
use crate::error::{BundlerError, Result};
use crate::output::write_stderr_line;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use tempfile::TempDir;

/// Repository URL cloned when no source directory is given.
pub const JASECI_REPO_URL: &str = "https://github.com/jaseci-labs/jaseci.git";

/// Branch cloned when no source directory is given.
pub const JASECI_BRANCH: &str = "main";

/// Subdirectory of the clone holding the language runtime.
pub const RUNTIME_SUBDIR: &str = "jac";

const CLONE_PREFIX: &str = "jaseci_clone_";

/// Remote repository coordinates for a shallow clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    /// Clone URL.
    pub url: String,
    /// Branch to check out.
    pub branch: String,
}

impl Default for RemoteRepository {
    fn default() -> Self {
        Self {
            url: JASECI_REPO_URL.to_owned(),
            branch: JASECI_BRANCH.to_owned(),
        }
    }
}

/// Where the package source was found.
#[derive(Debug)]
pub enum SourceLocation {
    /// A directory supplied by the user.
    Local(Utf8PathBuf),
    /// A fresh shallow clone, removed when this value is dropped.
    Cloned {
        /// Guard owning the clone directory.
        clone_dir: TempDir,
        /// The runtime subdirectory inside the clone.
        source_dir: Utf8PathBuf,
    },
}

impl SourceLocation {
    /// Returns the directory handed to the package locator.
    #[must_use]
    pub fn source_dir(&self) -> &Utf8Path {
        match self {
            Self::Local(dir) => dir,
            Self::Cloned { source_dir, .. } => source_dir,
        }
    }

    /// Returns `true` when the source is a temporary clone.
    #[must_use]
    pub const fn is_clone(&self) -> bool {
        matches!(self, Self::Cloned { .. })
    }
}

/// Resolves the source directory, cloning `remote` when `local` is `None`.
///
/// # Errors
///
/// Returns [`BundlerError::Git`] if the clone exits unsuccessfully, or
/// [`BundlerError::Io`] if git cannot be spawned or the temporary directory
/// cannot be created.
pub fn acquire_source(
    executor: &dyn CommandExecutor,
    local: Option<&Utf8Path>,
    remote: &RemoteRepository,
    quiet: bool,
    stderr: &mut dyn Write,
) -> Result<SourceLocation> {
    if let Some(dir) = local {
        return Ok(SourceLocation::Local(dir.to_owned()));
    }

    let clone_dir = tempfile::Builder::new().prefix(CLONE_PREFIX).tempdir()?;
    let dest = utf8_dir(&clone_dir)?;

    if !quiet {
        write_stderr_line(
            stderr,
            format!("Cloning {} (branch: {})...", remote.url, remote.branch),
        );
    }
    clone_shallow(executor, remote, &dest)?;

    Ok(SourceLocation::Cloned {
        source_dir: dest.join(RUNTIME_SUBDIR),
        clone_dir,
    })
}

/// Runs `git clone --depth 1 --branch <branch> <url> <dest>`.
///
/// # Errors
///
/// Returns [`BundlerError::Git`] carrying git's stderr on a non-zero exit.
pub fn clone_shallow(
    executor: &dyn CommandExecutor,
    remote: &RemoteRepository,
    dest: &Utf8Path,
) -> Result<()> {
    let output = executor.run(
        "git",
        &[
            "clone",
            "--depth",
            "1",
            "--branch",
            &remote.branch,
            &remote.url,
            dest.as_str(),
        ],
    )?;

    if !output.status.success() {
        return Err(BundlerError::Git {
            operation: "clone",
            message: stderr_text(&output),
        });
    }

    Ok(())
}

fn utf8_dir(dir: &TempDir) -> Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(dir.path().to_path_buf()).map_err(|e| BundlerError::NonUtf8Path {
        path: e.into_path_buf(),
    })
}
