//! Zip archive creation from the staging directory.
//!
//! Entries are deflate-compressed, written in sorted path order, and named by
//! their `/`-separated path relative to the staging root (so every entry
//! starts with `jaclang/`). Directories get no entries of their own.

use crate::error::{BundlerError, Result};
use camino::Utf8Path;
use std::fs;
use std::io;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes every file under `source_dir` into a zip at `output`.
///
/// Parent directories of `output` are created when missing. Returns the
/// number of entries written.
///
/// # Errors
///
/// Returns [`BundlerError::Io`] or [`BundlerError::Archive`] if any file
/// cannot be read or the archive cannot be written.
pub fn create_archive(source_dir: &Utf8Path, output: &Utf8Path) -> Result<usize> {
    ensure_parent_dir(output)?;

    let mut zip = ZipWriter::new(fs::File::create(output)?);
    let base_options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut written = 0;

    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| BundlerError::Walk {
            root: source_dir.to_owned(),
            source,
        })?;
        if !entry.path().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let name = archive_name(rel).ok_or_else(|| BundlerError::NonUtf8Path {
            path: entry.path().to_path_buf(),
        })?;

        let options = with_permissions(base_options, &fs::metadata(entry.path())?);
        zip.start_file(name, options)?;
        io::copy(&mut fs::File::open(entry.path())?, &mut zip)?;
        written += 1;
    }

    zip.finish()?;
    Ok(written)
}

/// Creates the parent directory of `output`, if it has one.
fn ensure_parent_dir(output: &Utf8Path) -> Result<()> {
    match output.parent() {
        Some(parent) if !parent.as_str().is_empty() => {
            fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Joins the components of `rel` with `/`, whatever the host separator.
fn archive_name(rel: &std::path::Path) -> Option<String> {
    let parts = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, metadata: &fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;

    options.unix_permissions(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _metadata: &fs::Metadata) -> SimpleFileOptions {
    options
}
