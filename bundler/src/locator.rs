//! Package root detection.

use crate::error::{BundlerError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// File whose presence identifies the jaclang package root.
pub const MARKER_FILE: &str = "jac0.py";

/// Directory name of the jaclang package.
pub const PACKAGE_NAME: &str = "jaclang";

/// Finds the jaclang package root within `source_dir`.
///
/// `source_dir` itself is the root when it directly contains
/// [`MARKER_FILE`]; otherwise `source_dir/jaclang` is checked.
///
/// # Errors
///
/// Returns [`BundlerError::PackageNotFound`] when neither location holds the
/// marker file.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use jaclang_bundler::error::BundlerError;
/// use jaclang_bundler::locator::find_package_root;
///
/// let err = find_package_root(Utf8Path::new("/nonexistent")).unwrap_err();
/// assert!(matches!(err, BundlerError::PackageNotFound { .. }));
/// ```
pub fn find_package_root(source_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    if source_dir.join(MARKER_FILE).is_file() {
        return Ok(source_dir.to_owned());
    }

    let candidate = source_dir.join(PACKAGE_NAME);
    if candidate.is_dir() && candidate.join(MARKER_FILE).is_file() {
        return Ok(candidate);
    }

    Err(BundlerError::PackageNotFound {
        path: source_dir.to_owned(),
    })
}
