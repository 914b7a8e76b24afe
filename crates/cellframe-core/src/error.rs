//! Error types for cellframe-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellframe-core.
///
/// Materialization itself cannot fail; these cover the conversion helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed A1-style reference
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    /// Row number out of bounds
    #[error("Row {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column number out of bounds
    #[error("Column {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u32),

    /// Unknown cell kind code
    #[error("Invalid cell kind code: {0}")]
    InvalidCellKind(u8),
}
