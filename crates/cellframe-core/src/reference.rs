//! A1-style cell references
//!
//! Sheet XML stores each cell's position as a reference such as `C12`. The
//! materialized table carries the full reference plus its column letters and
//! row digits, so references are split rather than parsed into indices.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;

/// A cell position (1-based row, 1-based column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellReference {
    /// Row number (1-based, as written in XML)
    pub row: u32,
    /// Column number (1-based, A = 1)
    pub col: u32,
}

impl CellReference {
    /// Create a reference from 1-based row and column numbers
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse an A1-style reference. `$` markers are not allowed in sheet XML.
    ///
    /// ```
    /// use cellframe_core::CellReference;
    ///
    /// let r = CellReference::parse("C12").unwrap();
    /// assert_eq!((r.row, r.col), (12, 3));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let (letters, digits) =
            split_reference(s).ok_or_else(|| Error::InvalidReference(s.to_string()))?;

        let col = letters_to_column(letters)?;
        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidReference(s.to_string()))?;

        if row == 0 {
            return Err(Error::InvalidReference(s.to_string()));
        }
        if row > MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS));
        }

        Ok(Self { row, col })
    }

    /// Column letters (`A`, `AB`, ...)
    pub fn column_letters(&self) -> String {
        column_to_letters(self.col)
    }

    /// Reference of the next cell in the same row
    pub fn next_in_row(&self) -> Self {
        Self {
            row: self.row,
            col: self.col.saturating_add(1),
        }
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row)
    }
}

/// Split `AB12` into `("AB", "12")`.
///
/// Returns `None` unless the input is one or more ASCII letters followed by
/// one or more ASCII digits.
pub fn split_reference(s: &str) -> Option<(&str, &str)> {
    let split = s.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = s.split_at(split);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((letters, digits))
}

/// Convert a 1-based column number to letters (1 = A, 26 = Z, 27 = AA)
pub fn column_to_letters(col: u32) -> String {
    let mut result = Vec::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        result.push((n % 26) as u8 + b'A');
        n /= 26;
    }

    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

/// Convert column letters to a 1-based column number (A = 1, AA = 27)
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidReference(letters.to_string()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidReference(letters.to_string()));
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }
    }

    Ok(col)
}
