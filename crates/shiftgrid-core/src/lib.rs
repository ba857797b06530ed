//! shiftgrid-core - UI-agnostic schedule document model + storage.

pub mod document;
pub mod error;
pub mod report;
pub mod session;
pub mod storage;

pub use document::Document;
pub use error::{Result, ShiftgridError};
pub use session::Session;

pub use shiftgrid_engine::engine::{CellRef, SpecialTokens, WorkTimeMode};
