//! # promptvault
//!
//! A file-backed prompt-history library for node-graph host runtimes.
//! Hosts embed two thin nodes, a loader with a summary dropdown and a
//! writer with change detection, plus a maintenance surface, all
//! operating on flat YAML "libraries" of prompt records.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Facade (api.rs)                                        │
//! │  - The host-facing surface: fixed string-tuple outputs      │
//! │  - Converts every error into sentinel values; never fails   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic: save decisions, dedup, listing, stats    │
//! │  - Operates on Rust types, returns Result types             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract LibraryStore trait                              │
//! │  - YamlStore (production), MemoryStore (testing),           │
//! │    legacy flat-format readers (import only)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cross-cutting pieces: [`query`] is the one filter+sort+limit
//! pipeline both listing and selection resolution go through,
//! [`summary`] renders and re-parses dropdown lines, [`cache`] keeps
//! rendered lists keyed by parameters and file modification time, and
//! [`state`] owns all of that per-session mutable state explicitly;
//! there are no globals.
//!
//! ## Key principle: the host never sees a failure
//!
//! Everything inside the facade returns proper `Result`s; the facade
//! boundary converts them to the sentinel strings ("Empty Library",
//! "Error: ...") that flow through the host graph. Diagnostics go to
//! the `log` stream.
//!
//! ## Module overview
//!
//! - [`api`]: the facade, entry point for all node operations
//! - [`commands`]: business logic per operation
//! - [`store`]: storage abstraction and backends
//! - [`model`]: core data types (`PromptRecord`, `Library`)
//! - [`query`]: filtering, sorting, scoped search
//! - [`summary`]: dropdown-line rendering and index parsing
//! - [`cache`] / [`state`]: session-lifetime caches
//! - [`config`]: per-archive tunables
//! - [`hash`]: trim-invariant content hashing
//! - [`error`]: error types

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod hash;
pub mod model;
pub mod query;
pub mod state;
pub mod store;
pub mod summary;

pub use api::{LoadOutput, ManageAction, PromptVault, SaveOutput, EMPTY_LIBRARY, NO_LIBRARIES};
pub use commands::{ListQuery, SaveRequest, SearchQuery};
pub use config::VaultConfig;
pub use error::{Result, VaultError};
pub use model::{Library, LibraryMeta, PromptRecord};
pub use query::{FilterMode, SearchScope};
pub use store::yaml::YamlStore;
pub use store::LibraryStore;
