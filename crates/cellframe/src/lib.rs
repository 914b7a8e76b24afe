//! # cellframe
//!
//! Turns worksheet cell XML into a columnar table for analytics hosts.
//!
//! ## Features
//!
//! - Read `<c>` elements from sheet XML into cell records
//! - Materialize records into twelve parallel columns, marking every value
//!   as a plain token or declared-encoding text
//! - Convert the table into the host's native frame
//! - Keep parsed documents alive behind reference-counted handles
//!
//! ## Example
//!
//! ```rust
//! use cellframe::prelude::*;
//!
//! let xml = br#"<worksheet><sheetData><row r="1">
//!     <c r="A1"><v>42</v></c>
//!     <c r="B1" t="str"><v>Hello</v></c>
//! </row></sheetData></worksheet>"#;
//!
//! let table = read_table(xml).unwrap();
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.cell(0, CellField::Value), Some(&TableCell::Token("42".into())));
//! assert_eq!(table.cell(1, CellField::Value), Some(&TableCell::Text("Hello".into())));
//!
//! // Keep the tree around for later queries
//! let handle = DocumentHandle::open(xml).unwrap();
//! let again = handle.table().unwrap();
//! assert_eq!(again, table);
//! ```

pub mod error;
pub mod prelude;

pub use error::{Error, Result};

// Re-export core types
pub use cellframe_core::{
    encoding_for, materialize, materialize_with, to_host_strings, to_host_table, CellField,
    CellKind, CellRecord, CellRecordStore, CellReference, Column, EmptyPolicy, FieldEncoding,
    HostEncoding, HostString, HostTable, HostVector, MaterializeOptions, Table, TableCell,
};

// Re-export XML types
pub use cellframe_xml::{
    cell_records, read_cell_records, DocumentHandle, HandleState, ReadOptions, XmlDocument,
    XmlElement, XmlError, XmlNode,
};

/// Read sheet XML and materialize its cells with default options
pub fn read_table(xml: &[u8]) -> Result<Table> {
    read_table_with(xml, &ReadOptions::default(), &MaterializeOptions::default())
}

/// Read sheet XML and materialize its cells
pub fn read_table_with(
    xml: &[u8],
    read: &ReadOptions,
    materialize_options: &MaterializeOptions,
) -> Result<Table> {
    let records = read_cell_records(xml, read)?;
    Ok(materialize_with(&records, materialize_options))
}

/// Read sheet XML straight into the host frame
pub fn read_host_table(xml: &[u8]) -> Result<HostTable> {
    Ok(to_host_table(&read_table(xml)?))
}

/// Table conversions for document handles
pub trait DocumentTableExt {
    /// Materialize the handle's cells with the given options
    fn table_with(&self, read: &ReadOptions, options: &MaterializeOptions) -> Result<Table>;

    /// Materialize the handle's cells with default options
    fn table(&self) -> Result<Table> {
        self.table_with(&ReadOptions::default(), &MaterializeOptions::default())
    }

    /// Materialize the handle's cells into the host frame
    fn host_table(&self) -> Result<HostTable> {
        Ok(to_host_table(&self.table()?))
    }
}

impl DocumentTableExt for DocumentHandle {
    fn table_with(&self, read: &ReadOptions, options: &MaterializeOptions) -> Result<Table> {
        let records = self.cell_records(read)?;
        log::debug!("materializing {} cells from document handle", records.len());
        Ok(materialize_with(&records, options))
    }
}
