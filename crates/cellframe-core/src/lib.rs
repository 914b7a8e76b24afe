//! # cellframe-core
//!
//! Core data structures for turning spreadsheet cell records into a
//! columnar table.
//!
//! - [`CellRecord`] and [`CellRecordStore`] - raw per-cell attributes, in document order
//! - [`encoding_for`] - the per-field text/token decision
//! - [`materialize`] - builds the twelve-column [`Table`]
//! - [`to_host_table`] - converts a [`Table`] into the host frame
//!
//! ## Example
//!
//! ```rust
//! use cellframe_core::{materialize, to_host_table, CellField, CellRecord, CellRecordStore};
//!
//! let store = CellRecordStore::from(vec![
//!     CellRecord::with_reference("A1").with(CellField::Value, "42"),
//!     CellRecord::with_reference("B1")
//!         .with(CellField::DataType, "str")
//!         .with(CellField::Value, "Hello"),
//! ]);
//!
//! let table = materialize(&store);
//! assert_eq!(table.row_count(), 2);
//!
//! let host = to_host_table(&table);
//! assert_eq!(host.names[0], "r");
//! ```

pub mod encoding;
pub mod error;
pub mod host;
pub mod kind;
pub mod record;
pub mod reference;
pub mod table;

pub use encoding::{encoding_for, FieldEncoding};
pub use error::{Error, Result};
pub use host::{to_host_strings, to_host_table, HostEncoding, HostString, HostTable, HostVector};
pub use kind::CellKind;
pub use record::{CellField, CellRecord, CellRecordStore};
pub use reference::CellReference;
pub use table::{
    materialize, materialize_with, Column, EmptyPolicy, MaterializeOptions, Table, TableCell,
};

/// Maximum row number in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum column number in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
