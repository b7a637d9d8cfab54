use crate::commands::ImportReport;
use crate::error::Result;
use crate::hash;
use crate::model::Library;
use crate::store::{legacy, LibraryStore};
use std::collections::HashSet;
use std::path::Path;

/// One-time import of a legacy flat file into a YAML library.
///
/// Records already present in the target (by content hash) are
/// skipped, so re-running an import is harmless. Legacy timestamps and
/// generation ids are preserved where the source had them.
pub fn run<S: LibraryStore>(store: &mut S, name: &str, source: &Path) -> Result<ImportReport> {
    let is_csv = source
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let records = if is_csv {
        legacy::read_csv_records(source)?
    } else {
        legacy::read_text_records(source)?
    };

    let name = name.trim();
    let mut library = store.load(name)?.unwrap_or_else(Library::new);
    let mut seen: HashSet<String> = library
        .prompts
        .iter()
        .map(|record| hash::full_hash(&record.text))
        .collect();

    let mut imported = 0;
    let mut skipped = 0;
    for record in records {
        if seen.insert(hash::full_hash(&record.text)) {
            library.prompts.push(record);
            imported += 1;
        } else {
            skipped += 1;
        }
    }

    if imported > 0 {
        library.touch();
        store.save(name, &library)?;
    }
    log::info!(
        "imported {} prompts from {} into {} ({} skipped)",
        imported,
        source.display(),
        name,
        skipped
    );

    Ok(ImportReport { imported, skipped })
}
