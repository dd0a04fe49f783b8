//! Exclusion rules for the bundled package tree.
//!
//! The same predicate prunes directory descent and skips individual files.

use camino::Utf8Path;

/// Basenames excluded wherever they appear.
pub const EXCLUDED_NAMES: &[&str] = &["__pycache__", ".pytest_cache", "tests", "_precompiled"];

/// Compiled-bytecode extensions, without the leading dot.
pub const EXCLUDED_EXTENSIONS: &[&str] = &["pyc", "pyo"];

/// Subpaths, relative to the package root, excluded along with everything below them.
pub const EXCLUDED_SUBPATHS: &[&str] = &["compiler/passes/native", "vendor/typeshed"];

/// Returns `true` if `path` must be left out of the bundle.
///
/// Subpath matching is by path component, so `compiler/passes/native2` is
/// kept. Paths outside `package_root` are only tested by name and extension.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use jaclang_bundler::exclusion::should_exclude;
///
/// let root = Utf8Path::new("/src/jaclang");
/// assert!(should_exclude(Utf8Path::new("/src/jaclang/vendor/typeshed/stdlib"), root));
/// assert!(!should_exclude(Utf8Path::new("/src/jaclang/vendor/lark"), root));
/// ```
#[must_use]
pub fn should_exclude(path: &Utf8Path, package_root: &Utf8Path) -> bool {
    if path
        .file_name()
        .is_some_and(|name| EXCLUDED_NAMES.contains(&name))
    {
        return true;
    }

    if path
        .extension()
        .is_some_and(|ext| EXCLUDED_EXTENSIONS.contains(&ext))
    {
        return true;
    }

    path.strip_prefix(package_root).is_ok_and(|rel| {
        EXCLUDED_SUBPATHS
            .iter()
            .any(|excluded| rel.starts_with(excluded))
    })
}

/// Returns `true` if `name` is a source-form Python file name.
#[must_use]
pub fn is_python_source(name: &str) -> bool {
    name.ends_with(".py")
}
