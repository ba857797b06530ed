//! In-process document store.

use super::{CollectionRef, DocumentMeta, DocumentStore, PersistedDocument};
use crate::error::{Result, ShiftgridError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Keeps every collection in memory. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<CollectionRef, Vec<PersistedDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate(at: &CollectionRef, name: &str) -> ShiftgridError {
    ShiftgridError::DuplicateName {
        name: name.to_string(),
        collection: at.to_string(),
    }
}

impl DocumentStore for MemoryStore {
    fn save(&self, at: &CollectionRef, doc: &PersistedDocument) -> Result<String> {
        // The entry guard holds the shard lock across the check and the insert.
        let mut docs = self.collections.entry(at.clone()).or_default();
        if docs.iter().any(|d| d.name == doc.name) {
            return Err(duplicate(at, &doc.name));
        }
        let id = Uuid::new_v4().to_string();
        let mut stored = doc.clone();
        stored.id = Some(id.clone());
        docs.push(stored);
        Ok(id)
    }

    fn update(&self, at: &CollectionRef, id: &str, doc: &PersistedDocument) -> Result<()> {
        let mut docs = self
            .collections
            .get_mut(at)
            .ok_or_else(|| ShiftgridError::DocumentNotFound(id.to_string()))?;
        if docs
            .iter()
            .any(|d| d.name == doc.name && d.id.as_deref() != Some(id))
        {
            return Err(duplicate(at, &doc.name));
        }
        let slot = docs
            .iter_mut()
            .find(|d| d.id.as_deref() == Some(id))
            .ok_or_else(|| ShiftgridError::DocumentNotFound(id.to_string()))?;
        *slot = PersistedDocument {
            id: Some(id.to_string()),
            ..doc.clone()
        };
        Ok(())
    }

    fn load_by_id(&self, at: &CollectionRef, id: &str) -> Result<Option<PersistedDocument>> {
        Ok(self
            .collections
            .get(at)
            .and_then(|docs| docs.iter().find(|d| d.id.as_deref() == Some(id)).cloned()))
    }

    fn list_metadata(&self, at: &CollectionRef) -> Result<Vec<DocumentMeta>> {
        let mut metas: Vec<DocumentMeta> = self
            .collections
            .get(at)
            .map(|docs| {
                docs.iter()
                    .filter_map(|d| {
                        Some(DocumentMeta {
                            id: d.id.clone()?,
                            name: d.name.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        metas.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(metas)
    }

    fn delete_by_name(&self, at: &CollectionRef, name: &str) -> Result<bool> {
        let Some(mut docs) = self.collections.get_mut(at) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| d.name != name);
        Ok(docs.len() != before)
    }

    fn list_collections(&self, database: &str) -> Result<Vec<String>> {
        let names: BTreeSet<String> = self
            .collections
            .iter()
            .filter(|entry| entry.key().database == database)
            .map(|entry| entry.key().collection.clone())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn list_databases(&self) -> Result<Vec<String>> {
        let names: BTreeSet<String> = self
            .collections
            .iter()
            .map(|entry| entry.key().database.clone())
            .collect();
        Ok(names.into_iter().collect())
    }

    fn create_collection(&self, at: &CollectionRef) -> Result<bool> {
        Ok(match self.collections.entry(at.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Vec::new());
                true
            }
        })
    }

    fn delete_collection(&self, at: &CollectionRef) -> Result<bool> {
        Ok(self.collections.remove(at).is_some())
    }
}
