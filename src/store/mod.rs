//! # Storage Layer
//!
//! This module defines the storage abstraction for prompt libraries.
//! The [`LibraryStore`] trait handles the "how" of persistence
//! (filesystem vs memory), while the command layer handles the "what"
//! (save decisions, dedup, filtering).
//!
//! ## Implementations
//!
//! - [`yaml::YamlStore`]: production file-based storage. One YAML
//!   document per library under a caller-supplied root directory,
//!   written atomically (tmp file then rename).
//! - [`memory::MemoryStore`]: in-memory storage for tests. A logical
//!   version counter stands in for file modification time so cache
//!   invalidation can be exercised deterministically.
//!
//! Legacy flat formats (tabular CSV, plain delimited text) are not
//! stores of their own; [`legacy`] exposes them as one-shot readers
//! feeding the import operation.
//!
//! ## Modification tokens
//!
//! `mtime` returns an opaque `i64` that changes whenever the backing
//! file changes (epoch millis for files, a counter for memory). The
//! summary cache compares tokens for staleness; it never interprets
//! them.

use crate::error::Result;
use crate::model::Library;
use std::path::PathBuf;

pub mod legacy;
pub mod memory;
pub mod yaml;

/// Abstract interface for library persistence.
pub trait LibraryStore {
    /// Load a library by name. `Ok(None)` when no backing file exists;
    /// `Err` only on I/O or parse failures.
    fn load(&self, name: &str) -> Result<Option<Library>>;

    /// Persist a library as a whole-file rewrite. Returns the path
    /// written.
    fn save(&mut self, name: &str, library: &Library) -> Result<PathBuf>;

    /// Modification token of the backing file, `None` when missing.
    fn mtime(&self, name: &str) -> Option<i64>;

    /// Target path for a library (virtual for non-file stores).
    fn path(&self, name: &str) -> PathBuf;

    /// Sorted names of all libraries under this store. Empty when the
    /// root does not exist yet.
    fn list(&self) -> Result<Vec<String>>;

    /// Write a timestamped full copy of the library alongside the
    /// original. Errors when the library does not exist.
    fn backup(&mut self, name: &str) -> Result<PathBuf>;
}
