//! Document FFI functions

use std::os::raw::{c_char, c_int};

use cellframe::{DocumentHandle, DocumentTableExt, Error, ReadOptions};

use crate::error::*;
use crate::handles::{Handle, CONTEXT};
use crate::with_context;

/// Parse an XML document and return a handle to it
#[no_mangle]
pub extern "C" fn cf_document_open(data: *const u8, len: usize, out_handle: *mut Handle) -> c_int {
    if data.is_null() || out_handle.is_null() {
        return CF_ERR_NULL_PTR;
    }

    let bytes = unsafe { std::slice::from_raw_parts(data, len) };
    let document = match DocumentHandle::open(bytes) {
        Ok(document) => document,
        Err(e) => return error_code(&Error::from(e)),
    };

    with_context!(|mut ctx| {
        let handle = ctx.insert_document(document);
        unsafe {
            *out_handle = handle;
        }
        CF_OK
    })
}

/// Issue another handle to the same document
#[no_mangle]
pub extern "C" fn cf_document_retain(handle: Handle, out_handle: *mut Handle) -> c_int {
    if out_handle.is_null() {
        return CF_ERR_NULL_PTR;
    }

    with_context!(|mut ctx| {
        match ctx.retain_document(handle) {
            Ok(retained) => {
                unsafe {
                    *out_handle = retained;
                }
                CF_OK
            }
            Err(code) => code,
        }
    })
}

/// Release a handle. The document is freed with its last handle.
#[no_mangle]
pub extern "C" fn cf_document_release(handle: Handle) -> c_int {
    with_context!(|mut ctx| {
        match ctx.release_document(handle) {
            Ok(_) => CF_OK,
            Err(code) => code,
        }
    })
}

/// Get the number of live handles sharing the document
#[no_mangle]
pub extern "C" fn cf_document_ref_count(handle: Handle, out_count: *mut usize) -> c_int {
    if out_count.is_null() {
        return CF_ERR_NULL_PTR;
    }

    with_context!(|ctx| {
        match ctx.get_document(handle) {
            Ok(document) => match document.ref_count() {
                Ok(count) => {
                    unsafe {
                        *out_count = count;
                    }
                    CF_OK
                }
                Err(e) => error_code(&Error::from(e)),
            },
            Err(code) => code,
        }
    })
}

/// Get the number of `<c>` elements in the document
#[no_mangle]
pub extern "C" fn cf_document_cell_count(handle: Handle, out_count: *mut usize) -> c_int {
    if out_count.is_null() {
        return CF_ERR_NULL_PTR;
    }

    with_context!(|ctx| {
        match ctx.get_document(handle) {
            Ok(document) => match document.cell_records(&ReadOptions::default()) {
                Ok(records) => {
                    unsafe {
                        *out_count = records.len();
                    }
                    CF_OK
                }
                Err(e) => error_code(&Error::from(e)),
            },
            Err(code) => code,
        }
    })
}

/// Materialize the document's cells and write the host table as JSON.
///
/// `out_len` always receives the required size including the trailing NUL.
/// When `buf` is null or shorter than that, nothing is written and
/// `CF_ERR_BUFFER_TOO_SMALL` is returned.
#[no_mangle]
pub extern "C" fn cf_document_table_json(
    handle: Handle,
    buf: *mut c_char,
    buf_len: usize,
    out_len: *mut usize,
) -> c_int {
    if out_len.is_null() {
        return CF_ERR_NULL_PTR;
    }

    // Take a reference out so the registry is not locked while materializing
    let document = match CONTEXT.lock() {
        Ok(ctx) => match ctx.get_document(handle) {
            Ok(document) => document.clone(),
            Err(code) => return code,
        },
        Err(_) => {
            log::warn!("FFI context lock poisoned");
            return CF_ERR_INTERNAL;
        }
    };

    let json = match document.host_table() {
        Ok(table) => match serde_json::to_string(&table) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to serialize host table: {e}");
                return CF_ERR_INTERNAL;
            }
        },
        Err(e) => return error_code(&e),
    };

    let required = json.len() + 1;
    unsafe {
        *out_len = required;
    }
    if buf.is_null() || buf_len < required {
        return CF_ERR_BUFFER_TOO_SMALL;
    }

    unsafe {
        std::ptr::copy_nonoverlapping(json.as_ptr(), buf as *mut u8, json.len());
        *buf.add(json.len()) = 0;
    }
    CF_OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    const SHEET: &[u8] = br#"<worksheet><sheetData><row r="1"><c r="A1"><v>1</v></c><c r="B1" t="str"><v>x</v></c></row></sheetData></worksheet>"#;

    fn open(xml: &[u8]) -> Handle {
        let mut handle: Handle = 0;
        assert_eq!(cf_document_open(xml.as_ptr(), xml.len(), &mut handle), CF_OK);
        handle
    }

    #[test]
    fn test_open_malformed() {
        let xml = b"<worksheet>";
        let mut handle: Handle = 0;
        assert_eq!(cf_document_open(xml.as_ptr(), xml.len(), &mut handle), CF_ERR_PARSE);
        assert_eq!(handle, 0);
    }

    #[test]
    fn test_null_pointers() {
        let mut handle: Handle = 0;
        assert_eq!(cf_document_open(ptr::null(), 0, &mut handle), CF_ERR_NULL_PTR);
        assert_eq!(cf_document_open(SHEET.as_ptr(), SHEET.len(), ptr::null_mut()), CF_ERR_NULL_PTR);
        assert_eq!(cf_document_cell_count(1, ptr::null_mut()), CF_ERR_NULL_PTR);
    }

    #[test]
    fn test_retain_release_lifecycle() {
        let h1 = open(SHEET);
        let mut h2: Handle = 0;
        assert_eq!(cf_document_retain(h1, &mut h2), CF_OK);

        let mut count: usize = 0;
        assert_eq!(cf_document_ref_count(h2, &mut count), CF_OK);
        assert_eq!(count, 2);

        assert_eq!(cf_document_release(h1), CF_OK);
        assert_eq!(cf_document_cell_count(h1, &mut count), CF_ERR_USE_AFTER_RELEASE);
        assert_eq!(cf_document_cell_count(h2, &mut count), CF_OK);
        assert_eq!(count, 2);

        assert_eq!(cf_document_release(h2), CF_OK);
        assert_eq!(cf_document_release(h2), CF_ERR_USE_AFTER_RELEASE);
        assert_eq!(cf_document_release(u64::MAX), CF_ERR_INVALID_HANDLE);
    }

    #[test]
    fn test_table_json() {
        let handle = open(SHEET);

        let mut needed: usize = 0;
        assert_eq!(
            cf_document_table_json(handle, ptr::null_mut(), 0, &mut needed),
            CF_ERR_BUFFER_TOO_SMALL
        );
        assert!(needed > 1);

        let mut buf = vec![0 as c_char; needed];
        let mut written: usize = 0;
        assert_eq!(
            cf_document_table_json(handle, buf.as_mut_ptr(), buf.len(), &mut written),
            CF_OK
        );
        assert_eq!(written, needed);

        let bytes: Vec<u8> = buf[..needed - 1].iter().map(|&c| c as u8).collect();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["row_count"], 2);
        assert_eq!(json["names"][8], "v");
        assert_eq!(json["columns"][8][0]["encoding"], "native");
        assert_eq!(json["columns"][8][1]["encoding"], "ascii");
        assert!(json["columns"][9][0]["value"].is_null());

        assert_eq!(cf_document_release(handle), CF_OK);
    }
}
