//! Merged special cells.
//!
//! A column group whose cells contain a special token collapses into a single
//! cell holding that token. Merge state is never stored: [`group_state`] derives
//! it from the cell contents on every call, and [`apply_edit`] keeps the
//! contents normalized so the token lives in the group's last cell.

use super::error::EngineResult;
use super::grid::CellGrid;
use super::tokens::SpecialTokens;

/// Derived merge state of one column group on one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupState {
    pub merged: bool,
    /// First special token found scanning left to right.
    pub special_value: Option<String>,
    /// Absolute column of the group's last cell (where a merged value lives).
    pub last_cell_index: usize,
}

/// Compute the merge state of `group` on `row`.
pub fn group_state(
    grid: &CellGrid,
    tokens: &SpecialTokens,
    row: usize,
    group: usize,
) -> EngineResult<GroupState> {
    let cols = grid.group_columns(group)?;
    let cells = grid.group_cells(row, group)?;
    // If several different tokens are present the leftmost one wins.
    let special_value = cells.iter().find(|c| tokens.is_special(c)).cloned();
    Ok(GroupState {
        merged: special_value.is_some(),
        special_value,
        last_cell_index: cols.end - 1,
    })
}

/// Write `content` into (`row`, `col`) honoring the merge rules.
///
/// Editing a merged group always targets its last cell and clears the rest.
/// If the group ends up holding a special token, that token is moved into the
/// last cell and every other cell of the group is blanked.
pub fn apply_edit(
    grid: &mut CellGrid,
    tokens: &SpecialTokens,
    row: usize,
    col: usize,
    content: &str,
) -> EngineResult<()> {
    let group = grid.group_of(col);
    let before = group_state(grid, tokens, row, group)?;

    if before.merged {
        clear_group(grid, row, group)?;
        grid.set(row, before.last_cell_index, content)?;
    } else {
        grid.set(row, col, content)?;
    }

    normalize_group(grid, tokens, row, group)?;
    Ok(())
}

/// Move a merged group's token into its last cell and blank the rest.
///
/// Returns whether any cell changed.
pub fn normalize_group(
    grid: &mut CellGrid,
    tokens: &SpecialTokens,
    row: usize,
    group: usize,
) -> EngineResult<bool> {
    let state = group_state(grid, tokens, row, group)?;
    let Some(value) = state.special_value else {
        return Ok(false);
    };
    let cols = grid.group_columns(group)?;
    let normalized = grid
        .group_cells(row, group)?
        .iter()
        .zip(cols)
        .all(|(cell, col)| {
            if col == state.last_cell_index {
                *cell == value
            } else {
                cell.is_empty()
            }
        });
    if normalized {
        return Ok(false);
    }
    clear_group(grid, row, group)?;
    grid.set(row, state.last_cell_index, &value)?;
    Ok(true)
}

/// Normalize every merged group of the grid. Returns how many groups changed.
pub fn normalize_grid(grid: &mut CellGrid, tokens: &SpecialTokens) -> EngineResult<usize> {
    let mut changed = 0;
    for row in 0..grid.row_count() {
        for group in 0..grid.group_count() {
            if normalize_group(grid, tokens, row, group)? {
                changed += 1;
            }
        }
    }
    Ok(changed)
}

fn clear_group(grid: &mut CellGrid, row: usize, group: usize) -> EngineResult<()> {
    for col in grid.group_columns(group)? {
        grid.set(row, col, "")?;
    }
    Ok(())
}
