use super::Document;
use crate::error::{Result, ShiftgridError};
use shiftgrid_engine::engine::{CellRef, GroupState, apply_edit, group_state};
use tracing::trace;

impl Document {
    /// Set cell contents from user input, applying the merge rules.
    pub fn set_cell_from_input(&mut self, cell_ref: CellRef, input: &str) -> Result<()> {
        let content = input.trim();
        apply_edit(
            &mut self.grid,
            &self.tokens,
            cell_ref.row,
            cell_ref.col,
            content,
        )?;
        self.value_cache
            .remove(&cell_ref.group_ref(self.grid.group_size()));
        self.modified = true;
        trace!(cell = %cell_ref, content, "cell edited");
        Ok(())
    }

    /// Clear the specified cell (clears the whole group if it is merged)
    pub fn clear_cell(&mut self, cell_ref: CellRef) -> Result<()> {
        self.set_cell_from_input(cell_ref, "")
    }

    /// Raw content of a cell, empty when out of range.
    pub fn cell_display(&self, cell_ref: &CellRef) -> String {
        self.grid
            .get(cell_ref.row, cell_ref.col)
            .unwrap_or_default()
            .to_string()
    }

    pub fn group_state(&self, row: usize, group: usize) -> Result<GroupState> {
        Ok(group_state(&self.grid, &self.tokens, row, group)?)
    }

    /// Append a column group named `name`.
    pub fn add_column_group(&mut self, name: &str) {
        self.grid.push_group();
        self.column_names.push(name.to_string());
        self.modified = true;
    }

    /// Remove a column group and its cells. Returns the removed name.
    pub fn remove_column_group(&mut self, group: usize) -> Result<String> {
        self.grid.remove_group(group)?;
        let name = self.column_names.remove(group);
        // Later groups shifted left, so every cached position is stale.
        self.value_cache.clear();
        self.modified = true;
        Ok(name)
    }

    pub fn rename_column_group(&mut self, group: usize, name: &str) -> Result<()> {
        let slot = self
            .column_names
            .get_mut(group)
            .ok_or_else(|| ShiftgridError::InvalidDocument(format!("no column group {}", group + 1)))?;
        *slot = name.to_string();
        self.modified = true;
        Ok(())
    }
}
