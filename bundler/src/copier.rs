//! Filtered, patched copy of the package tree into the staging directory.

use crate::error::{BundlerError, Result};
use crate::exclusion::should_exclude;
use crate::locator::PACKAGE_NAME;
use crate::patch::PatchTarget;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace};
use std::fs;
use walkdir::{DirEntry, WalkDir};

/// Counts gathered while copying the package tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    /// Files written to the staging directory, patched ones included.
    pub files_copied: usize,
    /// Files written through a [`PatchTarget`].
    pub files_patched: usize,
    /// Files and directories left out by the exclusion rules.
    pub entries_excluded: usize,
}

/// Mirrors `package_root` into `staging_dir/jaclang`.
///
/// Excluded directories are never descended into. The two patch targets are
/// rewritten as UTF-8 text; every other file is copied byte-for-byte with its
/// permissions and modification time. Symlinked directories are not followed.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked, a path is not UTF-8, a
/// patch target is not valid UTF-8, or any file operation fails.
pub fn copy_package_tree(package_root: &Utf8Path, staging_dir: &Utf8Path) -> Result<CopySummary> {
    let dest_root = staging_dir.join(PACKAGE_NAME);
    let mut summary = CopySummary::default();
    let mut walker = WalkDir::new(package_root).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|source| BundlerError::Walk {
            root: package_root.to_owned(),
            source,
        })?;
        let src = utf8_entry_path(&entry)?;

        if entry.depth() > 0 && should_exclude(&src, package_root) {
            trace!("excluding {src}");
            summary.entries_excluded += 1;
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }

        let rel = src.strip_prefix(package_root).unwrap_or(Utf8Path::new(""));
        let dest = dest_root.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else if src.is_file() {
            copy_file(&src, rel, &dest, &mut summary)?;
        }
    }

    Ok(summary)
}

fn copy_file(
    src: &Utf8Path,
    rel: &Utf8Path,
    dest: &Utf8Path,
    summary: &mut CopySummary,
) -> Result<()> {
    if let Some(target) = PatchTarget::for_relative_path(rel) {
        debug!("patching {rel}");
        let content = fs::read_to_string(src)?;
        fs::write(dest, target.apply(&content))?;
        summary.files_patched += 1;
    } else {
        copy_with_metadata(src, dest)?;
    }
    summary.files_copied += 1;
    Ok(())
}

/// Copies a file's bytes and permissions, keeping its modification time when allowed.
///
/// # Errors
///
/// Returns any I/O error raised while copying or reading metadata.
pub fn copy_with_metadata(src: &Utf8Path, dest: &Utf8Path) -> Result<()> {
    fs::copy(src, dest)?;
    let modified = fs::metadata(src)?.modified()?;
    // Best effort: some filesystems refuse timestamp updates.
    if let Err(err) = fs::File::open(dest).and_then(|file| file.set_modified(modified)) {
        debug!("could not preserve modification time on {dest}: {err}");
    }
    Ok(())
}

/// Copies `src` to `dest` recursively, skipping entries rejected by `skip`.
///
/// `skip` receives each entry's file name. Directories rejected by `skip`
/// are not descended into.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or any file operation fails.
pub fn copy_tree_filtered<F>(src: &Utf8Path, dest: &Utf8Path, skip: F) -> Result<usize>
where
    F: Fn(&str) -> bool,
{
    let mut copied = 0;
    let walker = WalkDir::new(src)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_str().is_some_and(&skip)
        });

    for entry in walker {
        let entry = entry.map_err(|source| BundlerError::Walk {
            root: src.to_owned(),
            source,
        })?;
        let path = utf8_entry_path(&entry)?;
        let rel = path.strip_prefix(src).unwrap_or(Utf8Path::new(""));
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if path.is_file() {
            copy_with_metadata(&path, &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn utf8_entry_path(entry: &DirEntry) -> Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(entry.path().to_path_buf()).map_err(|e| BundlerError::NonUtf8Path {
        path: e.into_path_buf(),
    })
}

#[cfg(test)]
#[path = "copier_tests.rs"]
mod tests;
