//! Schedule engine API.
//!
//! This module provides the pure computation core of a schedule:
//!
//! - [`CellGrid`], [`WorkTimeMode`] - Day rows x column groups of cell contents
//! - [`CellRef`], [`GroupRef`] - Cell addressing (A1 notation <-> row/col indices)
//! - [`SpecialTokens`] - Absence/break markers and their numeric substitutes
//! - [`group_state`], [`apply_edit`], [`normalize_grid`] - Merged special cells
//! - [`CalcStep`], [`evaluate`] - Worked-time expression trees
//! - [`plan`], [`PagePlan`] - Print pagination
//! - [`day_label`] - Day row labels

mod calc;
mod cell_ref;
mod error;
mod format;
mod grid;
mod merge;
mod paginate;
mod tokens;

pub use calc::{CalcStep, Operation, cell_number, evaluate};
pub use cell_ref::{CellRef, GroupRef};
pub use error::{EngineError, EngineResult};
pub use format::{day_label, parse_month};
pub use grid::{CellGrid, DAY_ROWS, WorkTimeMode};
pub use merge::{GroupState, apply_edit, group_state, normalize_grid, normalize_group};
pub use paginate::{PageDescriptor, PageGeometry, PageLayout, PagePlan, plan};
pub use tokens::SpecialTokens;
