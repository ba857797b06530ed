use super::Document;
use crate::error::Result;
use shiftgrid_engine::engine::{CalcStep, GroupRef, evaluate};

impl Document {
    /// Worked time of `group` on `row`, served from the value cache when fresh.
    pub fn group_result(&self, row: usize, group: usize) -> Result<i64> {
        let key = GroupRef::new(row, group);
        if let Some(value) = self.value_cache.get(&key) {
            return Ok(*value);
        }
        // Validates the group before building a tree for it.
        self.grid.group_columns(group)?;
        let step = CalcStep::for_group(self.mode(), row, group);
        let value = evaluate(&step, &self.grid, &self.tokens)?;
        self.value_cache.insert(key, value);
        Ok(value)
    }

    /// Display string for a group result; blank while nothing has been entered.
    pub fn group_result_display(&self, row: usize, group: usize) -> Result<String> {
        let cells = self.grid.group_cells(row, group)?;
        if cells.iter().all(|c| c.is_empty()) {
            return Ok(String::new());
        }
        Ok(self.group_result(row, group)?.to_string())
    }

    /// Sum of a group's results over every day of the month.
    pub fn group_total(&self, group: usize) -> Result<i64> {
        let mut total = 0i64;
        for row in 0..self.grid.row_count() {
            total = total.saturating_add(self.group_result(row, group)?);
        }
        Ok(total)
    }

    pub fn group_totals(&self) -> Result<Vec<i64>> {
        (0..self.group_count())
            .map(|group| self.group_total(group))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use shiftgrid_engine::engine::{CellRef, GroupRef, SpecialTokens, WorkTimeMode};

    fn filled(mode: WorkTimeMode, rows: &[(usize, &[&str])]) -> Document {
        let mut doc = Document::new("t", mode, vec!["Ann".into()], SpecialTokens::default());
        for (row, values) in rows {
            for (col, v) in values.iter().enumerate() {
                doc.set_cell_from_input(CellRef::new(*row, col), v).unwrap();
            }
        }
        doc
    }

    #[test]
    fn test_single_mode_totals() {
        let doc = filled(
            WorkTimeMode::Single,
            &[(0, &["8", "16"]), (1, &["9", "13"]), (2, &["A"]), (3, &["x", "4"])],
        );
        assert_eq!(doc.group_result(0, 0).unwrap(), 8);
        assert_eq!(doc.group_result(2, 0).unwrap(), 8);
        assert_eq!(doc.group_result(3, 0).unwrap(), 4);
        assert_eq!(doc.group_total(0).unwrap(), 8 + 4 + 8 + 4);
        assert_eq!(doc.group_totals().unwrap(), vec![24]);
    }

    #[test]
    fn test_double_mode_result() {
        let doc = filled(WorkTimeMode::Double, &[(5, &["6", "10", "11", "15"])]);
        assert_eq!(doc.group_result(5, 0).unwrap(), 8);
    }

    #[test]
    fn test_result_display_blank_for_empty_group() {
        let doc = filled(WorkTimeMode::Single, &[(0, &["8", "16"])]);
        assert_eq!(doc.group_result_display(0, 0).unwrap(), "8");
        assert_eq!(doc.group_result_display(1, 0).unwrap(), "");
    }

    #[test]
    fn test_totals_warm_cache() {
        let doc = filled(WorkTimeMode::Single, &[(0, &["8", "16"])]);
        assert_eq!(doc.group_totals().unwrap(), vec![8]);
        assert_eq!(doc.value_cache.len(), 31);
        assert_eq!(doc.value_cache.get(&GroupRef::new(0, 0)).map(|v| *v), Some(8));
    }

    #[test]
    fn test_unknown_group_is_error() {
        let doc = filled(WorkTimeMode::Single, &[]);
        assert!(doc.group_result(0, 1).is_err());
        assert!(doc.group_total(1).is_err());
    }
}
