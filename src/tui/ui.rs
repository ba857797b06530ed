//! UI rendering

use super::app::{App, Mode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use shiftgrid_core::WorkTimeMode;
use shiftgrid_engine::engine::DAY_ROWS;

pub(crate) const CELL_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 10;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const DAY_COLUMN_WIDTH: u16 = 6;
pub(crate) const CELL_WIDTH: u16 = 5;
pub(crate) const RESULT_WIDTH: u16 = 5;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CELL_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Screen width of one column group: its cells plus the result column.
fn group_width(group_size: usize) -> usize {
    group_size * (CELL_WIDTH + GRID_COLUMN_SPACING) as usize
        + (RESULT_WIDTH + GRID_COLUMN_SPACING) as usize
}

fn cell_labels(mode: WorkTimeMode) -> &'static [&'static str] {
    match mode {
        WorkTimeMode::Single => &["From", "To"],
        WorkTimeMode::Double => &["From", "To", "From", "To"],
    }
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let [cell_area, grid_area, status_area] = split_main_chunks(f.area());

    // Update visible dimensions based on actual size
    let group_size = app.doc().map(|d| d.grid().group_size()).unwrap_or(2);
    let available_width = grid_area.width.saturating_sub(DAY_COLUMN_WIDTH + 2) as usize;
    let available_height = grid_area.height.saturating_sub(4) as usize; // two header lines + borders

    app.visible_groups = (available_width / group_width(group_size)).max(1);
    app.visible_rows = available_height.max(1);
    app.update_viewport();

    draw_cell_bar(f, app, cell_area);
    draw_grid(f, app, grid_area);
    draw_status_bar(f, app, status_area);
}

fn draw_cell_bar(f: &mut Frame, app: &App, area: Rect) {
    let cell_ref = app.current_cell_ref();

    let content = match app.mode {
        Mode::Edit => {
            let (before, after) = app.edit_buffer.split_at(app.edit_cursor);
            format!("{}: {}│{}", cell_ref, before, after)
        }
        Mode::Command => {
            let (before, after) = app.command_buffer.split_at(app.command_cursor);
            format!(":{}│{}", before, after)
        }
        Mode::Normal => match app.doc() {
            Some(doc) if doc.grid().column_count() > 0 => {
                let column = doc
                    .column_names
                    .get(app.current_group())
                    .map(String::as_str)
                    .unwrap_or("");
                let content = doc.cell_display(&cell_ref);
                format!(
                    "{} {} {}: {}",
                    cell_ref,
                    column,
                    doc.day_label(app.cursor_row),
                    if content.is_empty() { "(empty)" } else { content.as_str() }
                )
            }
            _ => "(no columns, use :addcol NAME)".to_string(),
        },
    };

    let title = match app.mode {
        Mode::Edit => " Edit ",
        Mode::Command => " Command ",
        Mode::Normal => " Cell ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(match app.mode {
            Mode::Edit => Color::Yellow,
            Mode::Command => Color::Cyan,
            Mode::Normal => Color::White,
        }));

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let Some(doc) = app.doc() else {
        f.render_widget(Block::default().borders(Borders::ALL).title(" Shiftgrid "), area);
        return;
    };
    let labels = cell_labels(doc.mode());
    let first_group = app.viewport_group.min(doc.group_count());
    let groups = first_group..(first_group + app.visible_groups).min(doc.group_count());
    let dim = Style::default().fg(Color::DarkGray);
    let highlight = Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD);

    // Two header lines: column group name, then the cell labels.
    let mut header_cells = vec![Cell::from("\nDay").style(dim)];
    for group in groups.clone() {
        let name = doc.column_names.get(group).map(String::as_str).unwrap_or("");
        let style = if group == app.current_group() { highlight } else { dim };
        for (i, label) in labels.iter().enumerate() {
            let top = if i == 0 { name } else { "" };
            header_cells.push(Cell::from(format!("{}\n{}", top, label)).style(style));
        }
        header_cells.push(Cell::from("\nHrs").style(dim));
    }
    let header = Row::new(header_cells).height(2);

    let last_row = (app.viewport_row + app.visible_rows).min(DAY_ROWS);
    let mut rows = Vec::new();
    for row in app.viewport_row..last_row {
        let label = doc.day_label(row);
        let label_style = if row == app.cursor_row {
            highlight
        } else if label.ends_with('-') {
            // Past the end of the month.
            dim.add_modifier(Modifier::CROSSED_OUT)
        } else {
            dim
        };
        let mut cells = vec![Cell::from(label).style(label_style)];

        for group in groups.clone() {
            let Ok(columns) = doc.grid().group_columns(group) else {
                continue;
            };
            let token = doc
                .group_state(row, group)
                .ok()
                .and_then(|state| state.special_value);
            for (i, col) in columns.enumerate() {
                // A merged group shows its token once, across the group.
                let display = match &token {
                    Some(token) if i == 0 => token.clone(),
                    Some(_) => String::new(),
                    None => doc.grid().get(row, col).unwrap_or("").to_string(),
                };
                let style = if row == app.cursor_row && col == app.cursor_col {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else if token.is_some() {
                    Style::default().fg(Color::Magenta)
                } else {
                    Style::default()
                };
                cells.push(Cell::from(display).style(style));
            }
            let result = doc.group_result_display(row, group).unwrap_or_default();
            cells.push(Cell::from(result).style(Style::default().fg(Color::Green)));
        }

        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(DAY_COLUMN_WIDTH)];
    for _ in groups {
        widths.extend(labels.iter().map(|_| Constraint::Length(CELL_WIDTH)));
        widths.push(Constraint::Length(RESULT_WIDTH));
    }

    let title = match doc.month() {
        Some((year, month)) => format!(" {} {:04}-{:02} ", doc.name, year, month),
        None => format!(" {} ", doc.name),
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let doc_info = match app.doc() {
        Some(doc) if doc.modified => format!("{} [+]", doc.name),
        Some(doc) => doc.name.clone(),
        None => "[No schedule]".to_string(),
    };

    let status = if !app.status_message.is_empty() {
        app.status_message.clone()
    } else {
        format!(
            "{}  |  {}  |  Totals: {}  |  :help",
            doc_info,
            app.session.location(),
            app.totals_summary()
        )
    };

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let spans = vec![Span::styled(status, style)];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::app;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..height {
            for x in 0..width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn split_main_chunks_keeps_bars_fixed() {
        let [cell, grid, status] = split_main_chunks(Rect::new(0, 0, 80, 24));
        assert_eq!(cell.height, CELL_BAR_HEIGHT);
        assert_eq!(status.height, STATUS_BAR_HEIGHT);
        assert_eq!(grid.height, 24 - CELL_BAR_HEIGHT - STATUS_BAR_HEIGHT);
    }

    #[test]
    fn draw_sizes_viewport_to_terminal() {
        let mut app = app(WorkTimeMode::Double, &["Ann", "Bob", "Cara"]);
        render(&mut app, 80, 24);
        // 80 - 8 = 72 columns for groups of 4 x 6 + 6 = 30.
        assert_eq!(app.visible_groups, 2);
        assert_eq!(app.visible_rows, 24 - 4 - 4);
    }

    #[test]
    fn draw_shows_names_tokens_and_totals() {
        let mut app = app(WorkTimeMode::Single, &["Ann", "Bob"]);
        let doc = app.session.current().unwrap();
        doc.set_cell_from_input(shiftgrid_core::CellRef::new(0, 0), "8").unwrap();
        doc.set_cell_from_input(shiftgrid_core::CellRef::new(0, 1), "16").unwrap();
        doc.set_cell_from_input(shiftgrid_core::CellRef::new(1, 2), "A").unwrap();
        doc.set_month(2026, 10);

        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("October 2026-10"));
        assert!(screen.contains("Ann"));
        assert!(screen.contains("01 Th"));
        assert!(screen.contains("Totals: Ann 8, Bob 8"));
        assert!(screen.contains("A1 Ann 01 Th: 8"));
    }
}
