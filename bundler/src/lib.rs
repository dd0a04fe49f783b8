//! JacLang bundler library.
//!
//! Packages the `jaclang` Python package into a zip that Pyodide can mount in
//! the browser playground. The bundle strips caches, bytecode, tests, the
//! native compiler pass and vendored type stubs, patches the two files that
//! cannot run under Pyodide, and restores a source-form `lark` when the
//! vendored copy is bytecode-only.
//!
//! # Modules
//!
//! - [`archive`] - Deflate zip creation from the staging directory
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - External command execution seam
//! - [`copier`] - Filtered, patching copy of the package tree
//! - [`error`] - Semantic error types
//! - [`exclusion`] - Exclusion rules for bundled paths
//! - [`fetch`] - Vendored `lark` source recovery via pip
//! - [`locator`] - Package root discovery
//! - [`output`] - Progress and summary formatting
//! - [`patch`] - Text patches for Pyodide compatibility
//! - [`pipeline`] - Bundling pipeline orchestration
//! - [`source`] - Local source or shallow clone acquisition
//! - [`verify`] - Post-archive verification

pub mod archive;
pub mod cli;
pub mod command;
pub mod copier;
pub mod error;
pub mod exclusion;
pub mod fetch;
pub mod locator;
pub mod output;
pub mod patch;
pub mod pipeline;
pub mod source;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod verify;
