//! shiftgrid_engine - Schedule grid, merge rules, calculations and pagination.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    fn fill(grid: &mut CellGrid, tokens: &SpecialTokens, row: usize, values: &[&str]) {
        for (col, v) in values.iter().enumerate() {
            apply_edit(grid, tokens, row, col, v).unwrap();
        }
    }

    #[test]
    fn test_merged_absence_counts_token_value() {
        let tokens = SpecialTokens::default();
        let mut grid = CellGrid::new(WorkTimeMode::Single, 2);
        fill(&mut grid, &tokens, 0, &["8", "16", "A"]);

        let state = group_state(&grid, &tokens, 0, 1).unwrap();
        assert!(state.merged);
        assert_eq!(grid.get(0, 2), Some(""));
        assert_eq!(grid.get(0, 3), Some("A"));

        let first = evaluate(&CalcStep::for_group(WorkTimeMode::Single, 0, 0), &grid, &tokens);
        let second = evaluate(&CalcStep::for_group(WorkTimeMode::Single, 0, 1), &grid, &tokens);
        assert_eq!(first.unwrap(), 8);
        // Empty start (0) subtracted from the absence value.
        assert_eq!(second.unwrap(), 8);
    }

    #[test]
    fn test_double_mode_with_break_and_garbage() {
        let tokens = SpecialTokens::default();
        let mut grid = CellGrid::new(WorkTimeMode::Double, 1);
        fill(&mut grid, &tokens, 10, &["7", "12", "x", "17"]);
        let step = CalcStep::for_group(WorkTimeMode::Double, 10, 0);
        assert_eq!(evaluate(&step, &grid, &tokens).unwrap(), 5 + 17);

        apply_edit(&mut grid, &tokens, 10, 0, "B").unwrap();
        assert_eq!(evaluate(&step, &grid, &tokens).unwrap(), 0);
    }

    #[test]
    fn test_full_month_pages_cover_grid() {
        let geometry = PageGeometry::default();
        let plan = plan(DAY_ROWS, 6, &geometry);
        let covered: usize = plan
            .pages()
            .map(|p| p.rows.len() * p.groups.len())
            .sum();
        assert_eq!(covered, DAY_ROWS * 6);
    }
}
