//! XML error types

use thiserror::Error;

/// Result type for XML operations
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// Errors that can occur while parsing or using XML documents
#[derive(Debug, Error)]
pub enum XmlError {
    /// Input is not well-formed XML
    #[error("XML parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// Operation on a document handle that was already released
    #[error("Document handle used after release")]
    UseAfterRelease,

    /// A writer panicked while holding the document lock
    #[error("Document lock poisoned")]
    Poisoned,

    /// Serialization error
    #[error("XML write error: {0}")]
    Write(#[from] quick_xml::Error),

    /// IO error from the writer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized output was not UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl XmlError {
    /// Create a parse error at a byte position
    pub fn parse<M: ToString>(position: usize, message: M) -> Self {
        XmlError::Parse {
            position,
            message: message.to_string(),
        }
    }

    /// Check if this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, XmlError::Parse { .. })
    }
}
