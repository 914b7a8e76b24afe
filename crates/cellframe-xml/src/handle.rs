//! Reference-counted document handles
//!
//! A [`DocumentHandle`] is a shareable capability over one parsed
//! [`XmlDocument`]. Cloning a handle adds a reference to the same tree;
//! [`DocumentHandle::release`] drops one. The tree is destroyed when the
//! last reference goes away, and a released handle refuses every further
//! operation with [`XmlError::UseAfterRelease`].
//!
//! Readers share an `RwLock` read guard; anything mutating the tree must take
//! the write guard for the whole mutation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use cellframe_core::CellRecordStore;

use crate::cells::{cell_records, ReadOptions};
use crate::document::XmlDocument;
use crate::error::{XmlError, XmlResult};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Holds a reference to a live tree
    Open,
    /// Released; terminal
    Released,
}

#[derive(Debug)]
struct SharedDocument {
    id: u64,
    document: RwLock<XmlDocument>,
}

impl Drop for SharedDocument {
    fn drop(&mut self) {
        log::debug!("destroying xml document #{}", self.id);
    }
}

/// Opaque, reference-counted handle to a parsed XML document
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    shared: Option<Arc<SharedDocument>>,
}

impl DocumentHandle {
    /// Parse `bytes` and wrap the tree in a new handle.
    ///
    /// A parse failure yields no handle.
    pub fn open(bytes: &[u8]) -> XmlResult<Self> {
        let document = XmlDocument::parse(bytes)?;
        Ok(Self::from_document(document))
    }

    /// Wrap an already parsed document
    pub fn from_document(document: XmlDocument) -> Self {
        let id = NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!("opened xml document #{id}");
        Self {
            shared: Some(Arc::new(SharedDocument {
                id,
                document: RwLock::new(document),
            })),
        }
    }

    fn shared(&self) -> XmlResult<&Arc<SharedDocument>> {
        self.shared.as_ref().ok_or(XmlError::UseAfterRelease)
    }

    /// Current lifecycle state
    pub fn state(&self) -> HandleState {
        match self.shared {
            Some(_) => HandleState::Open,
            None => HandleState::Released,
        }
    }

    /// Check if this handle was released
    pub fn is_released(&self) -> bool {
        self.state() == HandleState::Released
    }

    /// Identifier of the underlying document, stable across clones
    pub fn document_id(&self) -> XmlResult<u64> {
        Ok(self.shared()?.id)
    }

    /// Number of live references to the tree
    pub fn ref_count(&self) -> XmlResult<usize> {
        Ok(Arc::strong_count(self.shared()?))
    }

    /// Check whether two handles share one tree
    pub fn same_document(&self, other: &DocumentHandle) -> bool {
        match (&self.shared, &other.shared) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Shared read access to the tree
    pub fn read(&self) -> XmlResult<RwLockReadGuard<'_, XmlDocument>> {
        self.shared()?
            .document
            .read()
            .map_err(|_| XmlError::Poisoned)
    }

    /// Exclusive write access to the tree
    pub fn write(&self) -> XmlResult<RwLockWriteGuard<'_, XmlDocument>> {
        self.shared()?
            .document
            .write()
            .map_err(|_| XmlError::Poisoned)
    }

    /// Run `f` with shared access to the tree
    pub fn with_document<R>(&self, f: impl FnOnce(&XmlDocument) -> R) -> XmlResult<R> {
        let guard = self.read()?;
        Ok(f(&guard))
    }

    /// Read the cell records held by the tree
    pub fn cell_records(&self, options: &ReadOptions) -> XmlResult<CellRecordStore> {
        let guard = self.read()?;
        cell_records(&guard, options)
    }

    /// Serialize the current tree
    pub fn to_xml_string(&self) -> XmlResult<String> {
        self.read()?.to_xml_string()
    }

    /// Drop this reference.
    ///
    /// Returns `true` when it was the last one and the tree was destroyed.
    pub fn release(&mut self) -> XmlResult<bool> {
        let shared = self.shared.take().ok_or(XmlError::UseAfterRelease)?;
        let id = shared.id;
        // into_inner only succeeds for the final reference, even under races
        let last = Arc::into_inner(shared).is_some();
        log::debug!(
            "released reference to xml document #{id}{}",
            if last { " (last)" } else { "" }
        );
        Ok(last)
    }
}
