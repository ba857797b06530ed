//! Error types for the schedule engine.

use thiserror::Error;

/// Programmer-error conditions raised by grid access and calculation.
///
/// Bad cell *content* is never an error; it evaluates to zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Cell out of range: row {row}, column {col}")]
    CellOutOfRange { row: usize, col: usize },

    #[error("Column group out of range: {group}")]
    GroupOutOfRange { group: usize },

    #[error("Grid shape mismatch: {0}")]
    ShapeMismatch(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
