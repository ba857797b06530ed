use super::{Document, ValueCache};
use crate::error::{Result, ShiftgridError};
use crate::storage::{PersistedDocument, SCHEDULE_DOUBLE, SCHEDULE_SINGLE, read_json, write_json};
use chrono::DateTime;
use shiftgrid_engine::engine::{CellGrid, SpecialTokens, WorkTimeMode, normalize_grid};
use std::path::Path;
use tracing::debug;

/// Work-time mode for a persisted `type` tag.
pub fn mode_for_type(doc_type: &str) -> Result<WorkTimeMode> {
    match doc_type {
        SCHEDULE_SINGLE => Ok(WorkTimeMode::Single),
        SCHEDULE_DOUBLE => Ok(WorkTimeMode::Double),
        other => Err(ShiftgridError::UnknownDocumentType(other.to_string())),
    }
}

pub fn type_for_mode(mode: WorkTimeMode) -> &'static str {
    match mode {
        WorkTimeMode::Single => SCHEDULE_SINGLE,
        WorkTimeMode::Double => SCHEDULE_DOUBLE,
    }
}

impl Document {
    /// Flatten into the stored shape.
    pub fn to_persisted(&self) -> PersistedDocument {
        PersistedDocument {
            id: self.id.clone(),
            name: self.name.clone(),
            doc_type: type_for_mode(self.mode()).to_string(),
            column_names: self.column_names.clone(),
            cells: self.grid.to_rows(),
            created_at: self.created_at.timestamp_millis(),
            settings: self.settings.clone(),
        }
    }

    /// Rebuild a document from its stored shape.
    ///
    /// An unrecognized `type` aborts the load; no partial document is produced.
    pub fn from_persisted(doc: PersistedDocument, tokens: SpecialTokens) -> Result<Document> {
        let mode = mode_for_type(&doc.doc_type)?;
        let grid = CellGrid::from_rows(mode, doc.cells)?;
        if grid.group_count() != doc.column_names.len() && grid.column_count() > 0 {
            return Err(ShiftgridError::InvalidDocument(format!(
                "{} column names for {} column groups",
                doc.column_names.len(),
                grid.group_count()
            )));
        }
        // A grid with no columns cannot tell how many groups it had.
        let mut grid = if grid.column_count() == 0 {
            CellGrid::new(mode, doc.column_names.len())
        } else {
            grid
        };
        // Stored cells may come from elsewhere; merged tokens belong in the last cell.
        let moved = normalize_grid(&mut grid, &tokens)?;
        if moved > 0 {
            debug!(name = %doc.name, groups = moved, "normalized merged groups on load");
        }
        let created_at = DateTime::from_timestamp_millis(doc.created_at).ok_or_else(|| {
            ShiftgridError::InvalidDocument(format!("bad createdAt {}", doc.created_at))
        })?;
        Ok(Document {
            id: doc.id,
            name: doc.name,
            column_names: doc.column_names,
            grid,
            created_at,
            settings: doc.settings,
            tokens,
            value_cache: ValueCache::default(),
            modified: false,
        })
    }

    pub fn export_json(&self, path: &Path) -> Result<()> {
        write_json(path, &self.to_persisted())
    }

    /// Load a document exported with [`Document::export_json`] as a new, unsaved document.
    pub fn import_json(path: &Path, tokens: SpecialTokens) -> Result<Document> {
        let mut doc = Document::from_persisted(read_json(path)?, tokens)?;
        doc.modified = true;
        Ok(doc)
    }
}
