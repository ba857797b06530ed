//! JSON import/export of a single persisted document.

use super::PersistedDocument;
use crate::error::{Result, ShiftgridError};
use std::fs;
use std::path::Path;

const MAX_JSON_FILE_BYTES: u64 = 8 * 1_048_576; // 8 MiB

/// Write a document as pretty-printed JSON.
pub fn write_json(path: &Path, doc: &PersistedDocument) -> Result<()> {
    let content = serde_json::to_string_pretty(doc)?;
    fs::write(path, content + "\n")?;
    Ok(())
}

/// Read a document previously written by [`write_json`].
///
/// The stored id is dropped: an imported document is saved as a new one.
pub fn read_json(path: &Path) -> Result<PersistedDocument> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_JSON_FILE_BYTES {
        return Err(ShiftgridError::InvalidDocument(format!(
            "{} is too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_JSON_FILE_BYTES
        )));
    }
    let content = fs::read_to_string(path)?;
    let mut doc: PersistedDocument = serde_json::from_str(&content)?;
    doc.id = None;
    Ok(doc)
}
