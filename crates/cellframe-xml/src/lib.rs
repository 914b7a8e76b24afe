//! # cellframe-xml
//!
//! Worksheet XML for cellframe.
//!
//! - [`XmlDocument`] - an owned element tree parsed with quick-xml
//! - [`DocumentHandle`] - a reference-counted, releasable handle to a tree
//! - [`read_cell_records`] / [`cell_records`] - `<c>` elements as a
//!   [`CellRecordStore`](cellframe_core::CellRecordStore)

pub mod cells;
pub mod document;
pub mod error;
pub mod handle;

pub use cells::{cell_records, read_cell_records, ReadOptions};
pub use document::{XmlDocument, XmlElement, XmlNode};
pub use error::{XmlError, XmlResult};
pub use handle::{DocumentHandle, HandleState};
