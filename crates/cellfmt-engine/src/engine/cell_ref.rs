//! A1 cell references and rectangular ranges.
//!
//! Converts between spreadsheet-style references (`B3`, `$AA$100`) and
//! zero-indexed column/row coordinates, and expands `A1:B2` ranges into the
//! cells they cover.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference in A1 notation. `$` anchors are accepted and
    /// dropped. Returns None if the input is not a plain cell reference.
    pub fn parse(name: &str) -> Option<CellRef> {
        let caps = cell_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;

        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(CellRef::new(col, row))
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letters(self.col), self.row + 1)
    }
}

fn cell_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"^\$?(?<letters>[A-Za-z]{1,3})\$?(?<numbers>[0-9]+)$")
            .expect("cell reference regex must compile")
    })
}

/// A rectangular block of cells, normalized so `start` is the top-left corner.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    /// Parse `A1:B2`. Sheet-qualified, whole-column and named ranges are not
    /// cell ranges and return None.
    pub fn parse(text: &str) -> Option<CellRange> {
        let (left, right) = text.split_once(':')?;
        let a = CellRef::parse(left)?;
        let b = CellRef::parse(right)?;
        Some(CellRange {
            start: CellRef::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellRef::new(a.col.max(b.col), a.row.max(b.row)),
        })
    }

    pub fn cell_count(&self) -> Option<usize> {
        let cols = self.end.col - self.start.col + 1;
        let rows = self.end.row - self.start.row + 1;
        cols.checked_mul(rows)
    }

    /// Cells column by column (`A1:B2` -> A1, A2, B1, B2).
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.col..=self.end.col)
            .flat_map(move |col| (self.start.row..=self.end.row).map(move |row| CellRef::new(col, row)))
    }
}
