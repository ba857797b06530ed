//! Worked-time calculation.
//!
//! Each (row, column group) owns a small expression tree ([`CalcStep`]) whose
//! leaves read grid cells. Evaluation never fails on cell *content*: anything
//! that is neither an integer nor a special token counts as zero.

use super::cell_ref::CellRef;
use super::error::{EngineError, EngineResult};
use super::grid::{CellGrid, WorkTimeMode};
use super::tokens::SpecialTokens;

/// Binary operation combining two sub-results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Plus,
    Minus,
}

impl Operation {
    /// `Minus` is end minus start: it yields `right - left`.
    pub fn apply(self, left: i64, right: i64) -> i64 {
        match self {
            Operation::Plus => left.saturating_add(right),
            Operation::Minus => right.saturating_sub(left),
        }
    }
}

/// Expression tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalcStep {
    CellValue(CellRef),
    Calculation {
        left: Box<CalcStep>,
        right: Box<CalcStep>,
        op: Operation,
    },
}

impl CalcStep {
    pub fn cell(row: usize, col: usize) -> CalcStep {
        CalcStep::CellValue(CellRef::new(row, col))
    }

    pub fn calculation(left: CalcStep, right: CalcStep, op: Operation) -> CalcStep {
        CalcStep::Calculation {
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }

    /// Tree computing the worked time of `group` on `row`.
    ///
    /// Single mode is one span (`c1 - c0`); double mode sums two spans
    /// (`(c1 - c0) + (c3 - c2)`).
    pub fn for_group(mode: WorkTimeMode, row: usize, group: usize) -> CalcStep {
        let base = group * mode.group_size();
        let span = |start: usize| {
            CalcStep::calculation(
                CalcStep::cell(row, start),
                CalcStep::cell(row, start + 1),
                Operation::Minus,
            )
        };
        match mode {
            WorkTimeMode::Single => span(base),
            WorkTimeMode::Double => {
                CalcStep::calculation(span(base), span(base + 2), Operation::Plus)
            }
        }
    }
}

/// Numeric value of raw cell content.
pub fn cell_number(content: &str, tokens: &SpecialTokens) -> i64 {
    content
        .trim()
        .parse::<i64>()
        .ok()
        .or_else(|| tokens.value(content))
        .unwrap_or(0)
}

/// Evaluate `step` against `grid`.
///
/// Only a reference outside the grid is an error.
pub fn evaluate(step: &CalcStep, grid: &CellGrid, tokens: &SpecialTokens) -> EngineResult<i64> {
    match step {
        CalcStep::CellValue(cell) => {
            let content = grid.get(cell.row, cell.col).ok_or(EngineError::CellOutOfRange {
                row: cell.row,
                col: cell.col,
            })?;
            Ok(cell_number(content, tokens))
        }
        CalcStep::Calculation { left, right, op } => {
            let l = evaluate(left, grid, tokens)?;
            let r = evaluate(right, grid, tokens)?;
            Ok(op.apply(l, r))
        }
    }
}
