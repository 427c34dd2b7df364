// SPDX-License-Identifier: AGPL-3.0-or-later
//! C ABI for fsnative
//!
//! Exposes the metadata, permission, link and secure blob primitives to a
//! host application through plain C calls. Every call is stateless and
//! reports failure with a single sentinel value:
//!
//! ```text
//! fsn_get_attributes  -> FsnAttributes, attributes & 0xF == 5 on failure
//! fsn_get_type        -> 1..=4, -1 on failure
//! fsn_change_mode     -> 0, 1 on failure
//! fsn_create_link     -> 0, -1 on failure
//! fsn_read_link       -> char*, NULL on failure   (free: fsn_string_free)
//! fsn_protect         -> uint8_t*, NULL on failure (free: fsn_bytes_free)
//! fsn_unprotect       -> char*, NULL on failure   (free: fsn_string_free)
//! ```
//!
//! Failure causes are only visible through the `tracing` output enabled by
//! [`fsn_init`].

pub mod blob;
pub mod ffi;

use std::ffi::CString;
use libc::c_char;

/// Install a stderr log subscriber filtered by `FSN_LOG` (default `warn`).
///
/// Optional, and safe to call more than once.
#[no_mangle]
pub extern "C" fn fsn_init() -> i32 {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("FSN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    tracing::debug!("fsnative initialized");
    0
}

/// Free a string returned by an `fsn_*` call.
///
/// # Safety
/// The pointer must have been returned by an fsn function and not freed yet.
#[no_mangle]
pub unsafe extern "C" fn fsn_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

pub(crate) fn into_c_string(bytes: Vec<u8>) -> *mut c_char {
    CString::new(bytes)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}
