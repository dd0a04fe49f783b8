//! Post-archive verification.
//!
//! Reads back the member list of the produced zip and counts entries that the
//! exclusion rules should have kept out. Never modifies the archive.

use crate::error::Result;
use camino::Utf8Path;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;

/// Path fragment marking native-pass files.
pub const NATIVE_FRAGMENT: &str = "/native/";

/// Path fragment marking vendored type stubs.
pub const TYPESHED_FRAGMENT: &str = "/typeshed/";

/// Summary of a produced archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Number of entries in the archive.
    pub total_files: usize,
    /// Entries whose path contains [`NATIVE_FRAGMENT`].
    pub native_entries: usize,
    /// Entries whose path contains [`TYPESHED_FRAGMENT`].
    pub typeshed_entries: usize,
    /// Archive size on disk.
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the archive file.
    pub sha256: String,
}

impl ArchiveReport {
    /// Returns `true` when no forbidden entries were found.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.native_entries == 0 && self.typeshed_entries == 0
    }
}

/// Inspects the archive at `path`.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened, parsed or hashed.
pub fn inspect_archive(path: &Utf8Path) -> Result<ArchiveReport> {
    let archive = zip::ZipArchive::new(fs::File::open(path)?)?;
    let (native_entries, typeshed_entries) =
        archive
            .file_names()
            .fold((0, 0), |(native, typeshed), name| {
                (
                    native + usize::from(name.contains(NATIVE_FRAGMENT)),
                    typeshed + usize::from(name.contains(TYPESHED_FRAGMENT)),
                )
            });

    Ok(ArchiveReport {
        total_files: archive.len(),
        native_entries,
        typeshed_entries,
        size_bytes: fs::metadata(path)?.len(),
        sha256: compute_sha256(path)?,
    })
}

/// Computes the lowercase hex SHA-256 digest of a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn compute_sha256(path: &Utf8Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
