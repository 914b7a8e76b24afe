//! Conversion to the host's native tabular representation
//!
//! Hosts receive a frame of character vectors. Each element is either NA or
//! a string tagged with the encoding the host must assume for it. This is
//! called explicitly at the serialization boundary; nothing registers a
//! conversion globally.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::table::{Table, TableCell};

/// Encoding tag attached to a host string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HostEncoding {
    /// Copied as-is in the host's native encoding
    Native,
    /// Declared text that is pure ASCII, valid in any encoding
    Ascii,
    /// Declared UTF-8 text
    Utf8,
}

/// One element of a host character vector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HostString {
    /// `None` is the host's NA
    pub value: Option<String>,
    pub encoding: HostEncoding,
}

impl HostString {
    /// The NA element
    pub fn na() -> Self {
        Self {
            value: None,
            encoding: HostEncoding::Native,
        }
    }

    /// A native token
    pub fn native(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            encoding: HostEncoding::Native,
        }
    }

    /// Declared-encoding text, tagged `Ascii` when no conversion is needed
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        let encoding = if value.is_ascii() {
            HostEncoding::Ascii
        } else {
            HostEncoding::Utf8
        };
        Self {
            value: Some(value),
            encoding,
        }
    }

    /// Check for NA
    pub fn is_na(&self) -> bool {
        self.value.is_none()
    }
}

impl From<&TableCell> for HostString {
    fn from(cell: &TableCell) -> Self {
        match cell {
            TableCell::Missing => HostString::na(),
            TableCell::Token(s) => HostString::native(s.as_str()),
            TableCell::Text(s) => HostString::text(s.as_str()),
        }
    }
}

/// A host character vector
pub type HostVector = Vec<HostString>;

/// The host's native data frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HostTable {
    /// Column names, in order
    pub names: Vec<String>,
    /// Column vectors, parallel to `names`
    pub columns: Vec<HostVector>,
    /// Number of rows
    pub row_count: usize,
    /// Host strings are never turned into factors
    pub strings_as_factors: bool,
}

impl HostTable {
    /// Column vector by name
    pub fn column(&self, name: &str) -> Option<&HostVector> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.columns.get(i))
    }
}

/// Convert a materialized table into the host frame
pub fn to_host_table(table: &Table) -> HostTable {
    HostTable {
        names: table
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        columns: table
            .columns()
            .iter()
            .map(|column| column.cells().iter().map(HostString::from).collect())
            .collect(),
        row_count: table.row_count(),
        strings_as_factors: false,
    }
}

/// Convert plain strings to a host vector, every element as declared text
pub fn to_host_strings<S: AsRef<str>>(values: &[S]) -> HostVector {
    values.iter().map(|s| HostString::text(s.as_ref())).collect()
}
