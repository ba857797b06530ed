use chrono::{DateTime, Utc};
use dashmap::DashMap;
use shiftgrid_engine::engine::{CellGrid, GroupRef, SpecialTokens, WorkTimeMode, day_label};
use std::collections::BTreeMap;

/// Settings keys holding the schedule's month.
pub(crate) const SETTING_YEAR: &str = "year";
pub(crate) const SETTING_MONTH: &str = "month";

/// Computed worked time per (row, column group).
/// Entries are dropped whenever one of the group's cells changes.
pub type ValueCache = DashMap<GroupRef, i64>;

/// UI-agnostic state of one open schedule.
///
/// Cells and tokens are only reachable read-only from outside the document
/// module so every edit goes through the merge rules and the value cache.
#[derive(Debug)]
pub struct Document {
    /// Store id, assigned on first save
    pub id: Option<String>,
    /// Unique within its collection
    pub name: String,
    /// One name per column group (usually an employee)
    pub column_names: Vec<String>,
    /// The day rows x column groups cell matrix
    pub(super) grid: CellGrid,
    pub created_at: DateTime<Utc>,
    /// Open-ended extra fields, persisted verbatim
    pub settings: BTreeMap<String, String>,
    /// Special tokens used for merging and calculation
    pub(super) tokens: SpecialTokens,
    pub(super) value_cache: ValueCache,
    /// Whether the document changed since it was last saved or loaded
    pub modified: bool,
}

impl Document {
    /// Create a new, unsaved document with one column group per name.
    pub fn new(
        name: &str,
        mode: WorkTimeMode,
        column_names: Vec<String>,
        tokens: SpecialTokens,
    ) -> Self {
        Document {
            id: None,
            name: name.to_string(),
            grid: CellGrid::new(mode, column_names.len()),
            column_names,
            created_at: Utc::now(),
            settings: BTreeMap::new(),
            tokens,
            value_cache: ValueCache::default(),
            modified: false,
        }
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn tokens(&self) -> &SpecialTokens {
        &self.tokens
    }

    pub fn mode(&self) -> WorkTimeMode {
        self.grid.mode()
    }

    pub fn group_count(&self) -> usize {
        self.grid.group_count()
    }

    /// Year and month the schedule covers, when set.
    pub fn month(&self) -> Option<(i32, u32)> {
        let year = self.settings.get(SETTING_YEAR)?.parse().ok()?;
        let month = self.settings.get(SETTING_MONTH)?.parse().ok()?;
        Some((year, month))
    }

    pub fn set_month(&mut self, year: i32, month: u32) {
        self.settings.insert(SETTING_YEAR.to_string(), year.to_string());
        self.settings.insert(SETTING_MONTH.to_string(), month.to_string());
        self.modified = true;
    }

    pub fn day_label(&self, row: usize) -> String {
        day_label(row, self.month())
    }
}
