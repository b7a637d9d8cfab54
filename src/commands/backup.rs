use crate::error::Result;
use crate::store::LibraryStore;
use std::path::PathBuf;

/// Write a timestamped copy of the library alongside the original.
pub fn run<S: LibraryStore>(store: &mut S, name: &str) -> Result<PathBuf> {
    let path = store.backup(name.trim())?;
    log::info!("backed up {} to {}", name.trim(), path.display());
    Ok(path)
}
