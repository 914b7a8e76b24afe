//! Prelude module - common imports for cellframe users
//!
//! ```rust
//! use cellframe::prelude::*;
//! ```

pub use crate::{
    materialize,
    materialize_with,
    read_table,
    to_host_table,
    CellField,
    CellRecord,
    CellRecordStore,
    DocumentHandle,
    DocumentTableExt,
    EmptyPolicy,
    Error,
    HostTable,
    MaterializeOptions,
    ReadOptions,
    Result,
    Table,
    TableCell,
};
