//! Cell grid for a monthly schedule.
//!
//! This module provides the data types for the schedule matrix:
//! - [`WorkTimeMode`] - Single (2 cells per group) or double (4 cells per group) shifts
//! - [`CellGrid`] - Dense `DAY_ROWS` x `groups * group_size` matrix of cell contents
//!
//! Columns are partitioned into fixed-size column groups, one group per
//! employee/column name. The grid never changes its row count.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::error::{EngineError, EngineResult};

/// One row per possible day of the month.
pub const DAY_ROWS: usize = 31;

/// Work-time mode of a document, selecting the column group size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkTimeMode {
    /// One shift per day: start and end cell.
    #[default]
    Single,
    /// Two shifts per day: start/end, start/end.
    Double,
}

impl WorkTimeMode {
    pub fn group_size(self) -> usize {
        match self {
            WorkTimeMode::Single => 2,
            WorkTimeMode::Double => 4,
        }
    }
}

/// Dense cell storage with column-group geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    mode: WorkTimeMode,
    groups: usize,
    cells: Vec<Vec<String>>,
}

impl CellGrid {
    /// Create an empty grid with `groups` column groups.
    pub fn new(mode: WorkTimeMode, groups: usize) -> CellGrid {
        let width = groups * mode.group_size();
        CellGrid {
            mode,
            groups,
            cells: vec![vec![String::new(); width]; DAY_ROWS],
        }
    }

    /// Rebuild a grid from its flattened row-major form.
    ///
    /// Every row must have the same width and the width must be a multiple of
    /// the mode's group size.
    pub fn from_rows(mode: WorkTimeMode, rows: Vec<Vec<String>>) -> EngineResult<CellGrid> {
        if rows.len() != DAY_ROWS {
            return Err(EngineError::ShapeMismatch(format!(
                "expected {} rows, found {}",
                DAY_ROWS,
                rows.len()
            )));
        }
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(EngineError::ShapeMismatch(format!(
                "row {} has {} cells, expected {}",
                row + 1,
                bad.len(),
                width
            )));
        }
        let size = mode.group_size();
        if width % size != 0 {
            return Err(EngineError::ShapeMismatch(format!(
                "{} columns is not a multiple of group size {}",
                width, size
            )));
        }
        Ok(CellGrid {
            mode,
            groups: width / size,
            cells: rows,
        })
    }

    /// Flatten to row-major form (the persisted `cells` field).
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.cells.clone()
    }

    pub fn mode(&self) -> WorkTimeMode {
        self.mode
    }

    pub fn group_size(&self) -> usize {
        self.mode.group_size()
    }

    pub fn group_count(&self) -> usize {
        self.groups
    }

    pub fn row_count(&self) -> usize {
        DAY_ROWS
    }

    pub fn column_count(&self) -> usize {
        self.groups * self.group_size()
    }

    /// Column group that owns `col`.
    pub fn group_of(&self, col: usize) -> usize {
        col / self.group_size()
    }

    /// Absolute column range covered by `group`.
    pub fn group_columns(&self, group: usize) -> EngineResult<Range<usize>> {
        if group >= self.groups {
            return Err(EngineError::GroupOutOfRange { group });
        }
        let size = self.group_size();
        Ok(group * size..(group + 1) * size)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col).map(String::as_str)
    }

    pub fn set(&mut self, row: usize, col: usize, content: &str) -> EngineResult<()> {
        let cell = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(EngineError::CellOutOfRange { row, col })?;
        content.clone_into(cell);
        Ok(())
    }

    /// Contents of one group on one row, left to right.
    pub fn group_cells(&self, row: usize, group: usize) -> EngineResult<&[String]> {
        let cols = self.group_columns(group)?;
        let cells = self
            .cells
            .get(row)
            .ok_or(EngineError::CellOutOfRange { row, col: cols.start })?;
        Ok(&cells[cols])
    }

    /// Append an empty column group at the right edge.
    pub fn push_group(&mut self) {
        let size = self.group_size();
        for row in &mut self.cells {
            row.extend(std::iter::repeat_n(String::new(), size));
        }
        self.groups += 1;
    }

    /// Remove a column group, shifting later groups left.
    pub fn remove_group(&mut self, group: usize) -> EngineResult<()> {
        let cols = self.group_columns(group)?;
        for row in &mut self.cells {
            row.drain(cols.clone());
        }
        self.groups -= 1;
        Ok(())
    }
}
