//! SQLite-backed document store.

use super::{CollectionRef, DocumentMeta, DocumentStore, PersistedDocument};
use crate::error::{Result, ShiftgridError};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS collections (
    database TEXT NOT NULL,
    name     TEXT NOT NULL,
    PRIMARY KEY (database, name)
);

CREATE TABLE IF NOT EXISTS documents (
    id           TEXT PRIMARY KEY,
    database     TEXT NOT NULL,
    collection   TEXT NOT NULL,
    name         TEXT NOT NULL,
    doc_type     TEXT NOT NULL,
    column_names TEXT NOT NULL,
    cells        TEXT NOT NULL,
    created_at   INTEGER NOT NULL,
    settings     TEXT NOT NULL,
    UNIQUE (database, collection, name)
);
"#;

/// Raw row as read from `documents`, JSON columns still encoded.
struct DocumentRow {
    id: String,
    name: String,
    doc_type: String,
    column_names: String,
    cells: String,
    created_at: i64,
    settings: String,
}

impl DocumentRow {
    fn decode(self) -> Result<PersistedDocument> {
        Ok(PersistedDocument {
            id: Some(self.id),
            name: self.name,
            doc_type: self.doc_type,
            column_names: serde_json::from_str(&self.column_names)?,
            cells: serde_json::from_str(&self.cells)?,
            created_at: self.created_at,
            settings: serde_json::from_str(&self.settings)?,
        })
    }
}

/// Document store persisted in a single SQLite file.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened schedule database");
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// Wrap an existing connection, creating the schema if needed.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self> {
        let store = Self { conn };
        store.get_conn()?.execute_batch(SCHEMA)?;
        Ok(store)
    }

    fn get_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ShiftgridError::Lock(e.to_string()))
    }
}

fn duplicate(at: &CollectionRef, name: &str) -> ShiftgridError {
    ShiftgridError::DuplicateName {
        name: name.to_string(),
        collection: at.to_string(),
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

/// Id of the document called `name` in `at`, if any.
fn id_for_name(conn: &Connection, at: &CollectionRef, name: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT id FROM documents WHERE database = ?1 AND collection = ?2 AND name = ?3",
            params![at.database, at.collection, name],
            |row| row.get(0),
        )
        .optional()?)
}

fn ensure_collection(conn: &Connection, at: &CollectionRef) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO collections (database, name) VALUES (?1, ?2)",
        params![at.database, at.collection],
    )?;
    Ok(inserted > 0)
}

impl DocumentStore for SqliteStore {
    fn save(&self, at: &CollectionRef, doc: &PersistedDocument) -> Result<String> {
        let conn = self.get_conn()?;
        if id_for_name(&conn, at, &doc.name)?.is_some() {
            return Err(duplicate(at, &doc.name));
        }
        ensure_collection(&conn, at)?;

        let id = Uuid::new_v4().to_string();
        let inserted = conn.execute(
            r#"
            INSERT INTO documents (
                id, database, collection, name, doc_type,
                column_names, cells, created_at, settings
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                id,
                at.database,
                at.collection,
                doc.name,
                doc.doc_type,
                serde_json::to_string(&doc.column_names)?,
                serde_json::to_string(&doc.cells)?,
                doc.created_at,
                serde_json::to_string(&doc.settings)?,
            ],
        );
        match inserted {
            Ok(_) => {
                debug!(%at, name = %doc.name, %id, "saved document");
                Ok(id)
            }
            Err(e) if is_unique_violation(&e) => Err(duplicate(at, &doc.name)),
            Err(e) => Err(e.into()),
        }
    }

    fn update(&self, at: &CollectionRef, id: &str, doc: &PersistedDocument) -> Result<()> {
        let conn = self.get_conn()?;
        if let Some(owner) = id_for_name(&conn, at, &doc.name)?
            && owner != id
        {
            return Err(duplicate(at, &doc.name));
        }
        let changed = conn.execute(
            r#"
            UPDATE documents
            SET name = ?1, doc_type = ?2, column_names = ?3, cells = ?4,
                created_at = ?5, settings = ?6
            WHERE id = ?7 AND database = ?8 AND collection = ?9
            "#,
            params![
                doc.name,
                doc.doc_type,
                serde_json::to_string(&doc.column_names)?,
                serde_json::to_string(&doc.cells)?,
                doc.created_at,
                serde_json::to_string(&doc.settings)?,
                id,
                at.database,
                at.collection,
            ],
        );
        match changed {
            Ok(0) => Err(ShiftgridError::DocumentNotFound(id.to_string())),
            Ok(_) => {
                debug!(%at, name = %doc.name, %id, "updated document");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(duplicate(at, &doc.name)),
            Err(e) => Err(e.into()),
        }
    }

    fn load_by_id(&self, at: &CollectionRef, id: &str) -> Result<Option<PersistedDocument>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT id, name, doc_type, column_names, cells, created_at, settings
                FROM documents
                WHERE id = ?1 AND database = ?2 AND collection = ?3
                "#,
                params![id, at.database, at.collection],
                |row| {
                    Ok(DocumentRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        doc_type: row.get(2)?,
                        column_names: row.get(3)?,
                        cells: row.get(4)?,
                        created_at: row.get(5)?,
                        settings: row.get(6)?,
                    })
                },
            )
            .optional()?;
        row.map(DocumentRow::decode).transpose()
    }

    fn list_metadata(&self, at: &CollectionRef) -> Result<Vec<DocumentMeta>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name FROM documents WHERE database = ?1 AND collection = ?2 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![at.database, at.collection], |row| {
            Ok(DocumentMeta {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn delete_by_name(&self, at: &CollectionRef, name: &str) -> Result<bool> {
        let conn = self.get_conn()?;
        let deleted = conn.execute(
            "DELETE FROM documents WHERE database = ?1 AND collection = ?2 AND name = ?3",
            params![at.database, at.collection, name],
        )?;
        debug!(%at, %name, deleted, "delete by name");
        Ok(deleted > 0)
    }

    fn list_collections(&self, database: &str) -> Result<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT name FROM collections WHERE database = ?1 ORDER BY name")?;
        let rows = stmt.query_map(params![database], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<String>>>()?)
    }

    fn list_databases(&self) -> Result<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT database FROM collections ORDER BY database")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<String>>>()?)
    }

    fn create_collection(&self, at: &CollectionRef) -> Result<bool> {
        let conn = self.get_conn()?;
        let created = ensure_collection(&conn, at)?;
        if created {
            info!(%at, "created collection");
        }
        Ok(created)
    }

    fn delete_collection(&self, at: &CollectionRef) -> Result<bool> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM documents WHERE database = ?1 AND collection = ?2",
            params![at.database, at.collection],
        )?;
        let removed = tx.execute(
            "DELETE FROM collections WHERE database = ?1 AND name = ?2",
            params![at.database, at.collection],
        )?;
        tx.commit()?;
        if removed > 0 {
            info!(%at, "deleted collection");
        }
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::contract;

    #[test]
    fn test_save_and_load() {
        contract::save_and_load(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        contract::duplicate_name_is_rejected(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn test_update_replaces_document() {
        contract::update_replaces_document(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn test_collections_and_deletes() {
        contract::collections_and_deletes(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn test_documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("schedules.db");
        let at = CollectionRef::new("main", "schedules");

        let id = {
            let store = SqliteStore::open(&path).unwrap();
            store.save(&at, &contract::sample("October")).unwrap()
        };

        let store = SqliteStore::open(&path).unwrap();
        let loaded = store.load_by_id(&at, &id).unwrap().unwrap();
        assert_eq!(loaded.name, "October");
        assert_eq!(store.list_databases().unwrap(), vec!["main"]);
    }
}
