//! FFI error codes

use std::os::raw::{c_char, c_int};

use cellframe::{Error, XmlError};

// Success
pub const CF_OK: c_int = 0;

// General errors
pub const CF_ERR_NULL_PTR: c_int = -1;
pub const CF_ERR_INVALID_HANDLE: c_int = -2;
pub const CF_ERR_INTERNAL: c_int = -3;

// Document errors
pub const CF_ERR_PARSE: c_int = -20;
pub const CF_ERR_USE_AFTER_RELEASE: c_int = -21;

// Data errors
pub const CF_ERR_BUFFER_TOO_SMALL: c_int = -32;

/// Map a library error to an FFI error code
pub(crate) fn error_code(err: &Error) -> c_int {
    match err {
        Error::Xml(XmlError::Parse { .. }) => CF_ERR_PARSE,
        Error::Xml(XmlError::UseAfterRelease) => CF_ERR_USE_AFTER_RELEASE,
        _ => CF_ERR_INTERNAL,
    }
}

/// Get error message for an error code
#[no_mangle]
pub extern "C" fn cf_error_message(code: c_int) -> *const c_char {
    let msg: &'static [u8] = match code {
        CF_OK => b"Success\0",
        CF_ERR_NULL_PTR => b"Null pointer argument\0",
        CF_ERR_INVALID_HANDLE => b"Invalid handle\0",
        CF_ERR_INTERNAL => b"Internal error\0",
        CF_ERR_PARSE => b"Malformed XML\0",
        CF_ERR_USE_AFTER_RELEASE => b"Handle used after release\0",
        CF_ERR_BUFFER_TOO_SMALL => b"Buffer too small\0",
        _ => b"Unknown error\0",
    };

    msg.as_ptr() as *const c_char
}
