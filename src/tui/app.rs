//! Application state and logic.
//!
//! [`App`] wraps the editing [`Session`] with cursor, viewport and modal UI
//! state. The app operates in different [`Mode`]s (Normal, Edit, Command)
//! similar to Vim's modal editing.

use shiftgrid_core::report::write_report_file;
use shiftgrid_core::{CellRef, Document, Session};
use shiftgrid_engine::engine::{DAY_ROWS, PageGeometry, parse_month};
use std::path::Path;
use tracing::info;

/// Modal editing state for the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Navigate the grid, execute single-key commands.
    Normal,
    /// Edit the contents of the current cell.
    Edit,
    /// Enter ex-style commands (`:w`, `:q`, `:print`, etc.).
    Command,
}

pub struct App {
    /// Store, collection and the open schedule
    pub session: Session,
    /// Page geometry used by `:print`
    pub geometry: PageGeometry,
    /// Current cursor position (day row)
    pub cursor_row: usize,
    /// Current cursor position (cell column, result columns excluded)
    pub cursor_col: usize,
    /// First visible row
    pub viewport_row: usize,
    /// First visible column group
    pub viewport_group: usize,
    pub visible_rows: usize,
    pub visible_groups: usize,
    pub mode: Mode,
    /// Edit buffer for cell editing
    pub edit_buffer: String,
    /// Cursor position within edit buffer (byte offset)
    pub edit_cursor: usize,
    pub command_buffer: String,
    pub command_cursor: usize,
    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(session: Session, geometry: PageGeometry) -> Self {
        App {
            session,
            geometry,
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            viewport_group: 0,
            visible_rows: 20,
            visible_groups: 4,
            mode: Mode::Normal,
            edit_buffer: String::new(),
            edit_cursor: 0,
            command_buffer: String::new(),
            command_cursor: 0,
            status_message: String::new(),
        }
    }

    pub fn doc(&self) -> Option<&Document> {
        self.session.document()
    }

    pub fn is_modified(&self) -> bool {
        self.doc().is_some_and(|d| d.modified)
    }

    fn column_count(&self) -> usize {
        self.doc().map(|d| d.grid().column_count()).unwrap_or(0)
    }

    fn group_size(&self) -> usize {
        self.doc().map(|d| d.grid().group_size()).unwrap_or(1)
    }

    pub fn current_cell_ref(&self) -> CellRef {
        CellRef::new(self.cursor_row, self.cursor_col)
    }

    pub fn current_group(&self) -> usize {
        self.cursor_col / self.group_size()
    }

    /// Move cursor by delta, clamping to valid range
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let max_col = self.column_count().saturating_sub(1) as i64;
        self.cursor_col = (self.cursor_col as i64 + dx as i64).clamp(0, max_col) as usize;
        self.cursor_row = (self.cursor_row as i64 + dy as i64).clamp(0, DAY_ROWS as i64 - 1) as usize;
        self.update_viewport();
    }

    /// Jump to the first cell of the next (or previous) column group.
    pub fn move_group(&mut self, delta: i32) {
        let groups = self.doc().map(|d| d.group_count()).unwrap_or(0) as i32;
        let size = self.group_size() as i32;
        let group = (self.current_group() as i32 + delta).clamp(0, (groups - 1).max(0));
        self.move_cursor(group * size - self.cursor_col as i32, 0);
    }

    /// Update viewport to keep cursor visible
    pub fn update_viewport(&mut self) {
        let group = self.current_group();
        if group < self.viewport_group {
            self.viewport_group = group;
        } else if group >= self.viewport_group + self.visible_groups {
            self.viewport_group = group + 1 - self.visible_groups;
        }

        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + self.visible_rows {
            self.viewport_row = self.cursor_row + 1 - self.visible_rows;
        }
    }

    pub fn goto_first(&mut self) {
        self.cursor_row = 0;
        self.update_viewport();
    }

    pub fn goto_last(&mut self) {
        self.cursor_row = DAY_ROWS - 1;
        self.update_viewport();
    }

    /// Enter edit mode for current cell
    pub fn enter_edit_mode(&mut self) {
        if self.column_count() == 0 {
            self.status_message = "No columns. Use :addcol NAME".to_string();
            return;
        }
        let cell_ref = self.current_cell_ref();
        self.edit_buffer = self
            .doc()
            .map(|d| d.cell_display(&cell_ref))
            .unwrap_or_default();
        self.edit_cursor = self.edit_buffer.len();
        self.mode = Mode::Edit;
    }

    /// Start editing with `c` replacing the cell contents.
    pub fn replace_with(&mut self, c: char) {
        self.enter_edit_mode();
        if self.mode == Mode::Edit {
            self.edit_buffer = c.to_string();
            self.edit_cursor = self.edit_buffer.len();
        }
    }

    /// Commit the current edit
    pub fn commit_edit(&mut self) {
        let cell_ref = self.current_cell_ref();
        let input = std::mem::take(&mut self.edit_buffer);
        self.edit_cursor = 0;
        self.mode = Mode::Normal;
        match self.session.current() {
            Ok(doc) => match doc.set_cell_from_input(cell_ref, &input) {
                Ok(()) => self.status_message.clear(),
                Err(e) => self.status_message = format!("Error: {}", e),
            },
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    /// Clear the current cell (the whole group when it is merged)
    pub fn clear_current_cell(&mut self) {
        let cell_ref = self.current_cell_ref();
        if let Ok(doc) = self.session.current() {
            if let Err(e) = doc.clear_cell(cell_ref) {
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Execute a command entered in command mode.
    ///
    /// Returns `true` if the application should quit, `false` otherwise.
    pub fn execute_command(&mut self) -> bool {
        let cmd = self.command_buffer.trim().to_string();
        self.command_buffer.clear();
        self.command_cursor = 0;
        self.mode = Mode::Normal;

        let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
        let command = parts[0];
        let args = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

        match command {
            "q" => {
                if self.is_modified() {
                    self.status_message =
                        "Unsaved changes! Use :q! to force quit or :wq to save and quit"
                            .to_string();
                    return false;
                }
                return true;
            }
            "q!" => {
                return true;
            }
            "w" | "save" => self.save(),
            "wq" => {
                self.save();
                if !self.is_modified() {
                    return true;
                }
            }
            "e" | "open" => match args {
                Some(name) => self.open(name),
                None => self.status_message = "Usage: :e NAME".to_string(),
            },
            "print" | "p" => match args {
                Some(path) => self.print(Path::new(path)),
                None => self.status_message = "Usage: :print FILE".to_string(),
            },
            "addcol" | "ac" => match args {
                Some(name) => self.add_column(name),
                None => self.status_message = "Usage: :addcol NAME".to_string(),
            },
            "delcol" | "dc" => self.delete_column(),
            "rename" => match args {
                Some(name) => self.rename_column(name),
                None => self.status_message = "Usage: :rename NAME".to_string(),
            },
            "month" => match args.and_then(parse_month) {
                Some((year, month)) => {
                    if let Ok(doc) = self.session.current() {
                        doc.set_month(year, month);
                        self.status_message = format!("Month set to {:04}-{:02}", year, month);
                    }
                }
                None => self.status_message = "Usage: :month YYYY-MM".to_string(),
            },
            "help" | "h" => {
                let tokens: Vec<String> = self
                    .session
                    .tokens()
                    .iter()
                    .map(|(token, value)| format!("{}={}", token, value))
                    .collect();
                self.status_message = format!(
                    ":w  :q  :q!  :wq  :e NAME  :print FILE  :addcol NAME  :delcol  :rename NAME  :month YYYY-MM  |  tokens {}",
                    tokens.join(" ")
                );
            }
            _ => {
                self.status_message = format!("Unknown command: {}", command);
            }
        }
        false
    }

    pub fn save(&mut self) {
        match self.session.save() {
            Ok(_) => {
                let name = self.doc().map(|d| d.name.clone()).unwrap_or_default();
                self.status_message = format!("Saved {} to {}", name, self.session.location());
            }
            Err(e) => {
                self.status_message = format!("Error saving: {}", e);
            }
        }
    }

    fn open(&mut self, name: &str) {
        if self.is_modified() {
            self.status_message = "Unsaved changes! Save with :w first".to_string();
            return;
        }
        match self.session.open_by_name(name) {
            Ok(_) => {
                self.cursor_row = 0;
                self.cursor_col = 0;
                self.viewport_row = 0;
                self.viewport_group = 0;
                self.status_message = format!("Opened {}", name);
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    fn print(&mut self, path: &Path) {
        let Some(doc) = self.session.document() else {
            return;
        };
        match write_report_file(path, doc, &self.geometry) {
            Ok(pages) => {
                info!(path = %path.display(), pages, "printed report");
                self.status_message = format!("Printed {} page(s) to {}", pages, path.display());
            }
            Err(e) => self.status_message = format!("Error printing: {}", e),
        }
    }

    fn add_column(&mut self, name: &str) {
        let Ok(doc) = self.session.current() else {
            return;
        };
        doc.add_column_group(name);
        let group = doc.group_count() - 1;
        self.cursor_col = group * self.group_size();
        self.update_viewport();
        self.status_message = format!("Added column {}", name);
    }

    fn delete_column(&mut self) {
        let group = self.current_group();
        let Ok(doc) = self.session.current() else {
            return;
        };
        match doc.remove_column_group(group) {
            Ok(name) => {
                self.status_message = format!("Deleted column {}", name);
                self.move_cursor(0, 0);
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    fn rename_column(&mut self, name: &str) {
        let group = self.current_group();
        let Ok(doc) = self.session.current() else {
            return;
        };
        match doc.rename_column_group(group, name) {
            Ok(()) => self.status_message = format!("Renamed column to {}", name),
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    /// "Ann 64, Bob 80" for the status bar.
    pub fn totals_summary(&self) -> String {
        let Some(doc) = self.doc() else {
            return String::new();
        };
        let Ok(totals) = doc.group_totals() else {
            return String::new();
        };
        doc.column_names
            .iter()
            .zip(totals)
            .map(|(name, total)| format!("{} {}", name, total))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
