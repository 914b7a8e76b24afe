//! Cell display kinds
//!
//! Downstream formatting code classifies every cell into one of these kinds.
//! The materializer never looks at them; the codes are fixed and shared with
//! hosts, so they must not be renumbered.

use std::fmt;

use crate::error::{Error, Result};

/// Display kind of a cell, with its stable numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CellKind {
    ShortDate = 0,
    LongDate = 1,
    Numeric = 2,
    Logical = 3,
    Character = 4,
    Formula = 5,
    Accounting = 6,
    Percentage = 7,
    Scientific = 8,
    Comma = 9,
    Hyperlink = 10,
    ArrayFormula = 11,
    Factor = 12,
    StringNum = 13,
    CmFormula = 14,
    HmsTime = 15,
    Currency = 16,
    List = 17,
}

impl CellKind {
    /// All kinds in code order
    pub const ALL: [CellKind; 18] = [
        CellKind::ShortDate,
        CellKind::LongDate,
        CellKind::Numeric,
        CellKind::Logical,
        CellKind::Character,
        CellKind::Formula,
        CellKind::Accounting,
        CellKind::Percentage,
        CellKind::Scientific,
        CellKind::Comma,
        CellKind::Hyperlink,
        CellKind::ArrayFormula,
        CellKind::Factor,
        CellKind::StringNum,
        CellKind::CmFormula,
        CellKind::HmsTime,
        CellKind::Currency,
        CellKind::List,
    ];

    /// Numeric code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Kind for a numeric code
    pub fn from_code(code: u8) -> Result<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(Error::InvalidCellKind(code))
    }

    /// Snake-case name shared with hosts
    pub fn name(self) -> &'static str {
        match self {
            CellKind::ShortDate => "short_date",
            CellKind::LongDate => "long_date",
            CellKind::Numeric => "numeric",
            CellKind::Logical => "logical",
            CellKind::Character => "character",
            CellKind::Formula => "formula",
            CellKind::Accounting => "accounting",
            CellKind::Percentage => "percentage",
            CellKind::Scientific => "scientific",
            CellKind::Comma => "comma",
            CellKind::Hyperlink => "hyperlink",
            CellKind::ArrayFormula => "array_formula",
            CellKind::Factor => "factor",
            CellKind::StringNum => "string_num",
            CellKind::CmFormula => "cm_formula",
            CellKind::HmsTime => "hms_time",
            CellKind::Currency => "currency",
            CellKind::List => "list",
        }
    }

    /// Parse a kind from its name (case insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for CellKind {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        for (i, kind) in CellKind::ALL.iter().enumerate() {
            assert_eq!(kind.code() as usize, i);
        }
        assert_eq!(CellKind::Currency.code(), 16);
        assert_eq!(CellKind::List.code(), 17);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(CellKind::from_code(5).unwrap(), CellKind::Formula);
        assert_eq!(CellKind::try_from(15).unwrap(), CellKind::HmsTime);
        assert!(matches!(CellKind::from_code(18), Err(Error::InvalidCellKind(18))));
    }

    #[test]
    fn test_names() {
        assert_eq!(CellKind::ArrayFormula.to_string(), "array_formula");
        assert_eq!(CellKind::from_name("STRING_NUM"), Some(CellKind::StringNum));
        assert_eq!(CellKind::from_name("date"), None);
    }
}
