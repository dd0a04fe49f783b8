//! Error types for the jaclang bundler.
//!
//! Each variant names one failure class of the bundling run. Dependency fetch
//! failures and verification findings have no variant; both are reported as
//! warnings and never abort the run.

use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can terminate a bundling run.
#[derive(Debug, Error)]
pub enum BundlerError {
    /// Neither the source directory nor its `jaclang/` child holds the marker file.
    #[error("Cannot find jaclang package in '{path}'")]
    PackageNotFound {
        /// The source directory that was searched.
        path: Utf8PathBuf,
    },

    /// A git operation exited unsuccessfully.
    #[error("git {operation} failed: {message}")]
    Git {
        /// The git operation that failed (clone).
        operation: &'static str,
        /// The tool's trimmed stderr.
        message: String,
    },

    /// A path inside the package tree is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// Walking the package tree failed.
    #[error("failed to walk {root}: {source}")]
    Walk {
        /// Root of the walk.
        root: Utf8PathBuf,
        /// The underlying walker error.
        #[source]
        source: walkdir::Error,
    },

    /// Writing or reading the zip archive failed.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`BundlerError`].
pub type Result<T> = std::result::Result<T, BundlerError>;
