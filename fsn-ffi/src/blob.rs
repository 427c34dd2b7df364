// SPDX-License-Identifier: AGPL-3.0-or-later
//! Secure blob calls
//!
//! On targets without a data protection service both calls return NULL.

use crate::into_c_string;
use fsn_secure::compat;
use libc::c_char;
use std::ffi::CStr;
use std::ptr;

unsafe fn into_raw_bytes(bytes: Vec<u8>, out_len: *mut usize) -> *mut u8 {
    let boxed = bytes.into_boxed_slice();
    *out_len = boxed.len();
    Box::into_raw(boxed).cast()
}

/// Protect a NUL-terminated UTF-8 string. On success the blob length is
/// written to `out_len`; release the blob with `fsn_bytes_free`.
///
/// # Safety
/// `text` must be NULL or a valid NUL-terminated string, and `out_len` must
/// be NULL or point to writable memory.
#[no_mangle]
pub unsafe extern "C" fn fsn_protect(text: *const c_char, out_len: *mut usize) -> *mut u8 {
    if text.is_null() || out_len.is_null() {
        return ptr::null_mut();
    }
    let text = CStr::from_ptr(text).to_bytes();
    compat::protect(text).map_or(ptr::null_mut(), |blob| into_raw_bytes(blob, out_len))
}

/// Recover the string sealed in a blob. Release with `fsn_string_free`.
///
/// # Safety
/// `data` must be NULL or point to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn fsn_unprotect(data: *const u8, len: usize) -> *mut c_char {
    if data.is_null() {
        return ptr::null_mut();
    }
    let blob = std::slice::from_raw_parts(data, len);
    compat::unprotect(blob).map_or(ptr::null_mut(), |text| into_c_string(text.into_bytes()))
}

/// Free a blob returned by `fsn_protect`.
///
/// # Safety
/// `data` and `len` must come from one `fsn_protect` call, freed only once.
#[no_mangle]
pub unsafe extern "C" fn fsn_bytes_free(data: *mut u8, len: usize) {
    if !data.is_null() {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)));
    }
}
