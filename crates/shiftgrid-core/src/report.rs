//! Printable report.
//!
//! Walks the page plan and renders each page as fixed-width text. Pages are
//! separated by form feeds so the output can go straight to a printer.

use crate::document::Document;
use crate::error::Result;
use shiftgrid_engine::engine::{PageDescriptor, PageGeometry, PagePlan, WorkTimeMode, plan};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Approximate width of one monospace character, in points.
const POINTS_PER_CHAR: f64 = 6.0;
const DAY_WIDTH: usize = 6;
const CELL_WIDTH: usize = 5;
const RESULT_WIDTH: usize = 6;
const PAGE_BREAK: char = '\u{c}';

/// Write the printable report for `doc` to a file.
pub fn write_report_file(path: &Path, doc: &Document, geometry: &PageGeometry) -> Result<usize> {
    let mut file = BufWriter::new(File::create(path)?);
    let pages = write_report(&mut file, doc, geometry)?;
    file.flush()?;
    Ok(pages)
}

/// Render every page of the plan. Returns the number of pages written.
pub fn write_report<W: Write>(w: &mut W, doc: &Document, geometry: &PageGeometry) -> Result<usize> {
    let plan = plan(doc.grid().row_count(), doc.group_count(), geometry);
    let totals = doc.group_totals()?;
    let page_count = plan.page_count();

    if page_count == 0 {
        writeln!(w, "{}", title(doc))?;
        writeln!(w)?;
        writeln!(w, "(no columns)")?;
        return Ok(0);
    }

    for page in plan.pages() {
        if page.page_index > 0 {
            write!(w, "{}", PAGE_BREAK)?;
        }
        write_page(w, doc, &plan, &page, geometry, &totals)?;
    }
    Ok(page_count)
}

fn title(doc: &Document) -> String {
    match doc.month() {
        Some((year, month)) => format!("{} ({:04}-{:02})", doc.name, year, month),
        None => doc.name.clone(),
    }
}

fn write_page<W: Write>(
    w: &mut W,
    doc: &Document,
    plan: &PagePlan,
    page: &PageDescriptor,
    geometry: &PageGeometry,
    totals: &[i64],
) -> Result<()> {
    let layout = plan.layout(page, geometry);
    let indent = " ".repeat((layout.day_column_x / POINTS_PER_CHAR).round().max(0.0) as usize);
    let group_size = doc.grid().group_size();
    let group_width = group_size * (CELL_WIDTH + 1) + RESULT_WIDTH;

    writeln!(
        w,
        "{}{}   page {}/{}",
        indent,
        title(doc),
        page.page_index + 1,
        plan.page_count()
    )?;
    writeln!(w)?;

    // Column names.
    let mut line = format!("{}{}", indent, fit("", DAY_WIDTH));
    for group in page.groups.clone() {
        let name = doc.column_names.get(group).map(String::as_str).unwrap_or("");
        line.push_str(&format!("| {}", fit(name, group_width)));
    }
    writeln!(w, "{}", line.trim_end())?;

    // Sub-headers.
    let labels: &[&str] = match doc.mode() {
        WorkTimeMode::Single => &["From", "To"],
        WorkTimeMode::Double => &["From", "To", "From", "To"],
    };
    let mut line = format!("{}{}", indent, fit("Day", DAY_WIDTH));
    for _ in page.groups.clone() {
        line.push_str("| ");
        for label in labels {
            line.push_str(&fit(label, CELL_WIDTH));
            line.push(' ');
        }
        line.push_str(&fit("Hours", RESULT_WIDTH));
    }
    writeln!(w, "{}", line.trim_end())?;
    writeln!(w, "{}{}", indent, rule(page, group_width))?;

    for row in page.rows.clone() {
        let mut line = format!("{}{}", indent, fit(&doc.day_label(row), DAY_WIDTH));
        for group in page.groups.clone() {
            line.push_str("| ");
            let state = doc.group_state(row, group)?;
            match state.special_value {
                // A merged group prints as one cell spanning the inputs.
                Some(token) => {
                    line.push_str(&fit(&token, group_size * (CELL_WIDTH + 1)));
                }
                None => {
                    for col in doc.grid().group_columns(group)? {
                        line.push_str(&fit(doc.grid().get(row, col).unwrap_or(""), CELL_WIDTH));
                        line.push(' ');
                    }
                }
            }
            line.push_str(&fit(&doc.group_result_display(row, group)?, RESULT_WIDTH));
        }
        writeln!(w, "{}", line.trim_end())?;
    }

    if page.has_summary {
        writeln!(w, "{}{}", indent, rule(page, group_width))?;
        let mut line = format!("{}{}", indent, fit("Total", DAY_WIDTH));
        for group in page.groups.clone() {
            let total = totals.get(group).copied().unwrap_or(0);
            line.push_str("| ");
            line.push_str(&fit("", group_size * (CELL_WIDTH + 1)));
            line.push_str(&fit(&total.to_string(), RESULT_WIDTH));
        }
        writeln!(w, "{}", line.trim_end())?;
        writeln!(w)?;
        writeln!(w, "{}Signature: ______________________", indent)?;
    }
    Ok(())
}

fn rule(page: &PageDescriptor, group_width: usize) -> String {
    let mut line = "-".repeat(DAY_WIDTH);
    for _ in page.groups.clone() {
        line.push('+');
        line.push_str(&"-".repeat(group_width + 1));
    }
    line
}

/// Pad or truncate to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}
