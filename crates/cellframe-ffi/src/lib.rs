//! # cellframe-ffi
//!
//! C FFI bindings for cellframe.
//!
//! Documents are exposed as integer handles. `cf_document_open` issues one,
//! `cf_document_retain` issues another reference to the same tree and
//! `cf_document_release` drops one; the tree is freed with the last handle.

mod document;
mod error;
mod handles;

pub use document::*;
pub use error::*;
pub use handles::{Handle, HANDLE_NULL};
