//! Document persistence.
//!
//! The [`DocumentStore`] trait is the boundary to whatever backend holds the
//! schedules. Documents live in collections, collections live in databases,
//! and a document name is unique within its collection. Updates replace the
//! whole document; there are no partial writes.

mod json;
mod memory;
mod sqlite;

pub use json::{read_json, write_json};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Persisted type tag of a single work-time schedule.
pub const SCHEDULE_SINGLE: &str = "Schedule1";
/// Persisted type tag of a double work-time schedule.
pub const SCHEDULE_DOUBLE: &str = "Schedule2";

/// A schedule in its stored shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Kept as raw text so unknown types can be reported on load.
    #[serde(rename = "type")]
    pub doc_type: String,
    pub column_names: Vec<String>,
    /// Row-major flattened grid.
    pub cells: Vec<Vec<String>>,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// Identifier and name of a stored document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentMeta {
    pub id: String,
    pub name: String,
}

/// Address of a collection.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollectionRef {
    pub database: String,
    pub collection: String,
}

impl CollectionRef {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> CollectionRef {
        CollectionRef {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.collection)
    }
}

/// Backend holding schedule documents.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its freshly assigned id.
    ///
    /// Fails with `DuplicateName` when the name is taken in `at`; the existing
    /// document is left untouched. The collection is created on demand.
    fn save(&self, at: &CollectionRef, doc: &PersistedDocument) -> Result<String>;

    /// Replace the document stored under `id`.
    fn update(&self, at: &CollectionRef, id: &str, doc: &PersistedDocument) -> Result<()>;

    fn load_by_id(&self, at: &CollectionRef, id: &str) -> Result<Option<PersistedDocument>>;

    /// Ids and names of every document in `at`, ordered by name.
    fn list_metadata(&self, at: &CollectionRef) -> Result<Vec<DocumentMeta>>;

    /// Returns whether a document was deleted.
    fn delete_by_name(&self, at: &CollectionRef, name: &str) -> Result<bool>;

    fn list_collections(&self, database: &str) -> Result<Vec<String>>;

    fn list_databases(&self) -> Result<Vec<String>>;

    /// Returns false if the collection already existed.
    fn create_collection(&self, at: &CollectionRef) -> Result<bool>;

    /// Drop a collection and every document in it. Returns false if it did not exist.
    fn delete_collection(&self, at: &CollectionRef) -> Result<bool>;

    /// Look a document up by name.
    fn load_by_name(&self, at: &CollectionRef, name: &str) -> Result<Option<PersistedDocument>> {
        match self.list_metadata(at)?.into_iter().find(|m| m.name == name) {
            Some(meta) => self.load_by_id(at, &meta.id),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every store must share.

    use super::*;
    use crate::error::ShiftgridError;

    pub(crate) fn sample(name: &str) -> PersistedDocument {
        PersistedDocument {
            id: None,
            name: name.to_string(),
            doc_type: SCHEDULE_SINGLE.to_string(),
            column_names: vec!["Ann".to_string()],
            cells: vec![vec!["8".to_string(), "16".to_string()]; 31],
            created_at: 1_700_000_000_000,
            settings: BTreeMap::new(),
        }
    }

    pub(crate) fn save_and_load(store: &dyn DocumentStore) {
        let at = CollectionRef::new("main", "schedules");
        let id = store.save(&at, &sample("October")).unwrap();

        let loaded = store.load_by_id(&at, &id).unwrap().unwrap();
        assert_eq!(loaded.id.as_deref(), Some(id.as_str()));
        assert_eq!(loaded.name, "October");
        assert_eq!(loaded.cells, sample("October").cells);

        let by_name = store.load_by_name(&at, "October").unwrap().unwrap();
        assert_eq!(by_name, loaded);

        let other = CollectionRef::new("main", "archive");
        assert!(store.load_by_id(&other, &id).unwrap().is_none());
    }

    pub(crate) fn duplicate_name_is_rejected(store: &dyn DocumentStore) {
        let at = CollectionRef::new("main", "schedules");
        let id = store.save(&at, &sample("October")).unwrap();

        let mut clash = sample("October");
        clash.cells[0][0] = "6".to_string();
        let err = store.save(&at, &clash).unwrap_err();
        assert!(matches!(err, ShiftgridError::DuplicateName { .. }));

        let existing = store.load_by_id(&at, &id).unwrap().unwrap();
        assert_eq!(existing.cells[0][0], "8");
        assert_eq!(store.list_metadata(&at).unwrap().len(), 1);

        // Same name in another collection is fine.
        let other = CollectionRef::new("main", "archive");
        store.save(&other, &clash).unwrap();
    }

    pub(crate) fn update_replaces_document(store: &dyn DocumentStore) {
        let at = CollectionRef::new("main", "schedules");
        let id = store.save(&at, &sample("October")).unwrap();
        store.save(&at, &sample("November")).unwrap();

        let mut changed = sample("October v2");
        changed.cells[2][1] = "A".to_string();
        store.update(&at, &id, &changed).unwrap();
        let loaded = store.load_by_id(&at, &id).unwrap().unwrap();
        assert_eq!(loaded.name, "October v2");
        assert_eq!(loaded.cells[2][1], "A");

        let err = store.update(&at, &id, &sample("November")).unwrap_err();
        assert!(matches!(err, ShiftgridError::DuplicateName { .. }));

        let err = store.update(&at, "missing", &sample("Other")).unwrap_err();
        assert!(matches!(err, ShiftgridError::DocumentNotFound(_)));
    }

    pub(crate) fn collections_and_deletes(store: &dyn DocumentStore) {
        let a = CollectionRef::new("main", "schedules");
        let b = CollectionRef::new("main", "archive");
        let c = CollectionRef::new("branch", "schedules");

        assert!(store.create_collection(&a).unwrap());
        assert!(!store.create_collection(&a).unwrap());
        store.save(&b, &sample("March")).unwrap();
        store.create_collection(&c).unwrap();

        assert_eq!(store.list_collections("main").unwrap(), vec!["archive", "schedules"]);
        assert_eq!(store.list_databases().unwrap(), vec!["branch", "main"]);

        store.save(&a, &sample("B")).unwrap();
        store.save(&a, &sample("A")).unwrap();
        let names: Vec<_> = store
            .list_metadata(&a)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);

        assert!(store.delete_by_name(&a, "A").unwrap());
        assert!(!store.delete_by_name(&a, "A").unwrap());
        assert_eq!(store.list_metadata(&a).unwrap().len(), 1);

        assert!(store.delete_collection(&b).unwrap());
        assert!(!store.delete_collection(&b).unwrap());
        assert!(store.list_metadata(&b).unwrap().is_empty());
        assert_eq!(store.list_collections("main").unwrap(), vec!["schedules"]);
    }
}
