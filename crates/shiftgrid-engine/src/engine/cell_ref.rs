//! Cell addresses.
//!
//! A schedule cell is addressed A1-style: the letters pick the cell column
//! (across all column groups), the number picks the day. "C5" is the third
//! cell column on the 5th.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static A1: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?<letters>[A-Za-z]+)(?<day>[0-9]+)$").ok());

/// One cell: a day row and a cell column, both 0-indexed.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse "B3"-style notation, ignoring surrounding whitespace and case.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        let caps = A1.as_ref()?.captures(name.trim())?;
        let col = letters_to_col(&caps["letters"])?;
        let row = caps["day"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(row, col))
    }

    /// Column letters for an index: 0 -> A, 25 -> Z, 26 -> AA.
    pub fn col_to_letters(col: usize) -> String {
        let mut letters = Vec::new();
        let mut rest = col as u128 + 1;
        while rest > 0 {
            rest -= 1;
            letters.push(b'A' + (rest % 26) as u8);
            rest /= 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// The column group this cell belongs to, for groups of `group_size` cells.
    pub fn group_ref(&self, group_size: usize) -> GroupRef {
        GroupRef::new(self.row, self.col / group_size.max(1))
    }
}

/// Bijective base-26; `None` on overflow.
fn letters_to_col(letters: &str) -> Option<usize> {
    letters
        .bytes()
        .map(|b| (b.to_ascii_uppercase() - b'A') as usize + 1)
        .try_fold(0usize, |acc, digit| acc.checked_mul(26)?.checked_add(digit))?
        .checked_sub(1)
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_str(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

/// A reference to one column group on one day row.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupRef {
    pub row: usize,
    pub group: usize,
}

impl GroupRef {
    pub fn new(row: usize, group: usize) -> GroupRef {
        GroupRef { row, group }
    }
}
