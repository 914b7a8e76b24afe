//! Handle management for FFI
//!
//! Hosts hold plain integers. Each integer owns one reference to a
//! [`DocumentHandle`]; retaining a handle issues a new integer sharing the
//! same tree. Integers are never reused, so a released integer can be told
//! apart from one that was never issued.

use cellframe::DocumentHandle;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::os::raw::c_int;
use std::sync::Mutex;

use crate::error::{CF_ERR_INVALID_HANDLE, CF_ERR_USE_AFTER_RELEASE};

/// Opaque handle type
pub type Handle = u64;

/// Null handle constant
pub const HANDLE_NULL: Handle = 0;

/// Global context for managing FFI objects
pub struct FfiContext {
    documents: HashMap<Handle, DocumentHandle>,
    next_handle: Handle,
}

impl FfiContext {
    fn new() -> Self {
        Self {
            documents: HashMap::new(),
            next_handle: 1, // Start at 1, 0 is null
        }
    }

    /// Register a document reference and issue its handle
    pub fn insert_document(&mut self, document: DocumentHandle) -> Handle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.documents.insert(handle, document);
        handle
    }

    /// Look up a live handle
    pub fn get_document(&self, handle: Handle) -> Result<&DocumentHandle, c_int> {
        self.documents
            .get(&handle)
            .ok_or_else(|| self.missing_code(handle))
    }

    /// Issue a second handle to the same tree
    pub fn retain_document(&mut self, handle: Handle) -> Result<Handle, c_int> {
        let document = self.get_document(handle)?.clone();
        Ok(self.insert_document(document))
    }

    /// Release a handle; `Ok(true)` when the tree was destroyed
    pub fn release_document(&mut self, handle: Handle) -> Result<bool, c_int> {
        let mut document = self
            .documents
            .remove(&handle)
            .ok_or_else(|| self.missing_code(handle))?;
        document.release().map_err(|_| CF_ERR_USE_AFTER_RELEASE)
    }

    fn missing_code(&self, handle: Handle) -> c_int {
        if handle != HANDLE_NULL && handle < self.next_handle {
            CF_ERR_USE_AFTER_RELEASE
        } else {
            CF_ERR_INVALID_HANDLE
        }
    }
}

lazy_static! {
    pub static ref CONTEXT: Mutex<FfiContext> = Mutex::new(FfiContext::new());
}

/// Helper macro for FFI functions
#[macro_export]
macro_rules! with_context {
    (|$ctx:ident| $body:expr) => {
        match $crate::handles::CONTEXT.lock() {
            Ok($ctx) => $body,
            Err(_) => {
                log::warn!("FFI context lock poisoned");
                $crate::error::CF_ERR_INTERNAL
            }
        }
    };
    (|mut $ctx:ident| $body:expr) => {
        match $crate::handles::CONTEXT.lock() {
            Ok(mut $ctx) => $body,
            Err(_) => {
                log::warn!("FFI context lock poisoned");
                $crate::error::CF_ERR_INTERNAL
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lifecycle() {
        let mut ctx = FfiContext::new();
        let doc = DocumentHandle::open(b"<a/>").unwrap();

        let h1 = ctx.insert_document(doc);
        let h2 = ctx.retain_document(h1).unwrap();
        assert_ne!(h1, h2);
        assert_eq!(ctx.get_document(h2).unwrap().ref_count().unwrap(), 2);

        assert_eq!(ctx.release_document(h1), Ok(false));
        assert_eq!(ctx.get_document(h1).err(), Some(CF_ERR_USE_AFTER_RELEASE));
        assert_eq!(ctx.release_document(h2), Ok(true));
        assert_eq!(ctx.release_document(h2), Err(CF_ERR_USE_AFTER_RELEASE));
    }

    #[test]
    fn test_unknown_handles() {
        let ctx = FfiContext::new();
        assert_eq!(ctx.get_document(HANDLE_NULL).err(), Some(CF_ERR_INVALID_HANDLE));
        assert_eq!(ctx.get_document(99).err(), Some(CF_ERR_INVALID_HANDLE));
    }
}
