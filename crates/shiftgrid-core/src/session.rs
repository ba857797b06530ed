//! Editing session: the store handle, the active collection and the open document.
//!
//! Everything that used to be ambient application state lives here and is
//! passed explicitly to whoever needs it.

use crate::document::Document;
use crate::error::{Result, ShiftgridError};
use crate::storage::{CollectionRef, DocumentMeta, DocumentStore};
use shiftgrid_engine::engine::{SpecialTokens, WorkTimeMode};
use tracing::{info, warn};

pub struct Session {
    store: Box<dyn DocumentStore>,
    location: CollectionRef,
    tokens: SpecialTokens,
    document: Option<Document>,
}

impl Session {
    pub fn new(store: Box<dyn DocumentStore>, location: CollectionRef, tokens: SpecialTokens) -> Self {
        Session {
            store,
            location,
            tokens,
            document: None,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn location(&self) -> &CollectionRef {
        &self.location
    }

    pub fn tokens(&self) -> &SpecialTokens {
        &self.tokens
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The open document, or `NoDocumentOpen`.
    pub fn current(&mut self) -> Result<&mut Document> {
        self.document.as_mut().ok_or(ShiftgridError::NoDocumentOpen)
    }

    /// Start a new, unsaved document (replacing any open one).
    pub fn new_document(
        &mut self,
        name: &str,
        mode: WorkTimeMode,
        column_names: Vec<String>,
    ) -> &mut Document {
        let mut doc = Document::new(name, mode, column_names, self.tokens.clone());
        doc.modified = true;
        self.document.insert(doc)
    }

    /// Adopt an already built document, e.g. one imported from JSON.
    pub fn open_document(&mut self, doc: Document) -> &mut Document {
        self.document.insert(doc)
    }

    pub fn open_by_id(&mut self, id: &str) -> Result<&mut Document> {
        let persisted = self
            .store
            .load_by_id(&self.location, id)?
            .ok_or_else(|| ShiftgridError::DocumentNotFound(id.to_string()))?;
        let doc = Document::from_persisted(persisted, self.tokens.clone())?;
        info!(at = %self.location, name = %doc.name, "opened document");
        Ok(self.document.insert(doc))
    }

    pub fn open_by_name(&mut self, name: &str) -> Result<&mut Document> {
        let persisted = self
            .store
            .load_by_name(&self.location, name)?
            .ok_or_else(|| ShiftgridError::DocumentNotFound(name.to_string()))?;
        let doc = Document::from_persisted(persisted, self.tokens.clone())?;
        info!(at = %self.location, name = %doc.name, "opened document");
        Ok(self.document.insert(doc))
    }

    /// Persist the open document.
    ///
    /// The first save inserts it and records the assigned id; later saves
    /// replace the stored copy. On error the document keeps its state, except
    /// that a stored copy deleted elsewhere drops the id so the next save
    /// inserts it again.
    pub fn save(&mut self) -> Result<String> {
        let doc = self.document.as_mut().ok_or(ShiftgridError::NoDocumentOpen)?;
        let persisted = doc.to_persisted();
        let id = match doc.id.clone() {
            Some(id) => match self.store.update(&self.location, &id, &persisted) {
                Ok(()) => id,
                Err(ShiftgridError::DocumentNotFound(missing)) => {
                    warn!(at = %self.location, name = %doc.name, id = %missing, "stored copy is gone");
                    doc.id = None;
                    doc.modified = true;
                    return Err(ShiftgridError::DocumentNotFound(missing));
                }
                Err(e) => return Err(e),
            },
            None => self.store.save(&self.location, &persisted)?,
        };
        doc.id = Some(id.clone());
        doc.modified = false;
        info!(at = %self.location, name = %doc.name, %id, "saved document");
        Ok(id)
    }

    /// Delete a stored document by name. Closes it if it is the open one.
    pub fn delete_by_name(&mut self, name: &str) -> Result<bool> {
        let deleted = self.store.delete_by_name(&self.location, name)?;
        if deleted && self.document.as_ref().is_some_and(|d| d.id.is_some() && d.name == name) {
            self.document = None;
        }
        if !deleted {
            warn!(at = %self.location, %name, "nothing to delete");
        }
        Ok(deleted)
    }

    pub fn list_documents(&self) -> Result<Vec<DocumentMeta>> {
        self.store.list_metadata(&self.location)
    }

    /// Point the session at another collection. The open document stays open
    /// and will be saved as a new document there.
    pub fn switch_collection(&mut self, location: CollectionRef) {
        if let Some(doc) = self.document.as_mut() {
            doc.id = None;
            doc.modified = true;
        }
        self.location = location;
    }

    pub fn close(&mut self) -> Option<Document> {
        self.document.take()
    }
}
