//! Error types for Shiftgrid core.

use shiftgrid_engine::engine::EngineError;
use thiserror::Error;

/// Errors that can occur while editing, storing or printing a schedule
#[derive(Error, Debug)]
pub enum ShiftgridError {
    #[error("A document named '{name}' already exists in {collection}")]
    DuplicateName { name: String, collection: String },

    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("No document open")]
    NoDocumentOpen,

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, ShiftgridError>;
