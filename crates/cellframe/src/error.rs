//! Error types for cellframe

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the cellframe facade
#[derive(Debug, Error)]
pub enum Error {
    /// XML parsing or document handle error
    #[error(transparent)]
    Xml(#[from] cellframe_xml::XmlError),

    /// Core conversion error
    #[error(transparent)]
    Core(#[from] cellframe_core::Error),
}

impl Error {
    /// Input was not well-formed XML
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Xml(e) if e.is_parse())
    }

    /// A released document handle was used
    pub fn is_use_after_release(&self) -> bool {
        matches!(self, Error::Xml(cellframe_xml::XmlError::UseAfterRelease))
    }
}
