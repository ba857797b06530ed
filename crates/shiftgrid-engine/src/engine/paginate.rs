//! Print pagination.
//!
//! Tiles the day rows x column groups of a schedule across fixed-size pages.
//! Pages are enumerated column-major: every row-page of the first column-page
//! comes before any page of the second column-page.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Page and cell dimensions, in points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageGeometry {
    pub page_height: f64,
    pub page_width: f64,
    pub row_height: f64,
    pub group_width: f64,
    pub header_height: f64,
    pub day_column_width: f64,
}

impl Default for PageGeometry {
    /// A4 portrait with 18pt rows and 120pt column groups.
    fn default() -> Self {
        PageGeometry {
            page_height: 842.0,
            page_width: 595.0,
            row_height: 18.0,
            group_width: 120.0,
            header_height: 72.0,
            day_column_width: 48.0,
        }
    }
}

impl PageGeometry {
    pub fn rows_per_page(&self) -> usize {
        capacity(self.page_height - self.header_height, self.row_height)
    }

    pub fn groups_per_page(&self) -> usize {
        capacity(self.page_width - self.day_column_width, self.group_width)
    }
}

/// `floor(available / unit)`, never less than one.
fn capacity(available: f64, unit: f64) -> usize {
    let fits = (available / unit).floor();
    if fits.is_finite() && fits >= 1.0 {
        fits as usize
    } else {
        1
    }
}

/// One printed page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDescriptor {
    pub page_index: usize,
    pub rows: Range<usize>,
    pub groups: Range<usize>,
    /// The summary/signature row is printed on the last row-page of each column-page.
    pub has_summary: bool,
}

/// Horizontal placement of a page's columns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
    pub day_column_x: f64,
    pub data_x: f64,
    pub data_width: f64,
}

/// Complete page plan for one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagePlan {
    pub total_rows: usize,
    pub total_groups: usize,
    pub rows_per_page: usize,
    pub groups_per_page: usize,
    pub row_pages: usize,
    pub column_pages: usize,
}

/// Compute the page plan for a grid under `geometry`.
pub fn plan(total_rows: usize, total_groups: usize, geometry: &PageGeometry) -> PagePlan {
    let plan = PagePlan::from_capacity(
        total_rows,
        total_groups,
        geometry.rows_per_page(),
        geometry.groups_per_page(),
    );
    tracing::debug!(
        rows_per_page = plan.rows_per_page,
        groups_per_page = plan.groups_per_page,
        pages = plan.page_count(),
        "planned print pages"
    );
    plan
}

impl PagePlan {
    pub fn from_capacity(
        total_rows: usize,
        total_groups: usize,
        rows_per_page: usize,
        groups_per_page: usize,
    ) -> PagePlan {
        let rows_per_page = rows_per_page.max(1);
        let groups_per_page = groups_per_page.max(1);
        PagePlan {
            total_rows,
            total_groups,
            rows_per_page,
            groups_per_page,
            row_pages: total_rows.div_ceil(rows_per_page),
            column_pages: total_groups.div_ceil(groups_per_page),
        }
    }

    pub fn page_count(&self) -> usize {
        self.row_pages * self.column_pages
    }

    /// Descriptor for `page_index`, or `None` past the last page.
    pub fn page(&self, page_index: usize) -> Option<PageDescriptor> {
        if self.row_pages == 0 {
            return None;
        }
        let column_page = page_index / self.row_pages;
        let row_page = page_index % self.row_pages;
        if column_page >= self.column_pages {
            return None;
        }
        let rows = row_page * self.rows_per_page
            ..((row_page + 1) * self.rows_per_page).min(self.total_rows);
        let groups = column_page * self.groups_per_page
            ..((column_page + 1) * self.groups_per_page).min(self.total_groups);
        Some(PageDescriptor {
            page_index,
            rows,
            groups,
            has_summary: row_page + 1 == self.row_pages,
        })
    }

    pub fn pages(&self) -> impl Iterator<Item = PageDescriptor> + '_ {
        (0..).map_while(|index| self.page(index))
    }

    /// Center the page's data columns; the day column sits directly to their left.
    pub fn layout(&self, page: &PageDescriptor, geometry: &PageGeometry) -> PageLayout {
        let data_width = page.groups.len() as f64 * geometry.group_width;
        // Never push the day column off the left edge.
        let data_x = ((geometry.page_width - data_width) / 2.0).max(geometry.day_column_width);
        PageLayout {
            day_column_x: data_x - geometry.day_column_width,
            data_x,
            data_width,
        }
    }
}
