// SPDX-License-Identifier: AGPL-3.0-or-later
//! File metadata, permission and link calls

use crate::into_c_string;
use fsn_core::compat::{self, StatusCode};
use fsn_core::AttributeTriple;
use libc::c_char;
use std::ffi::CStr;
use std::path::{Path, PathBuf};

/// Packed attributes plus owner and group ids
pub type FsnAttributes = AttributeTriple;

/// Borrow a C path argument. `None` for NULL, or on non-Unix targets for
/// non-UTF-8 input.
unsafe fn path_arg<'a>(ptr: *const c_char) -> Option<&'a Path> {
    if ptr.is_null() {
        return None;
    }
    let raw = CStr::from_ptr(ptr);

    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        Some(Path::new(std::ffi::OsStr::from_bytes(raw.to_bytes())))
    }

    #[cfg(not(unix))]
    {
        raw.to_str().ok().map(Path::new)
    }
}

fn path_bytes(path: PathBuf) -> Option<Vec<u8>> {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStringExt;
        Some(path.into_os_string().into_vec())
    }

    #[cfg(not(unix))]
    {
        path.into_os_string().into_string().ok().map(String::into_bytes)
    }
}

/// Stat `path` and pack its type, permissions and ownership.
///
/// # Safety
/// `path` must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn fsn_get_attributes(path: *const c_char, follow_links: bool) -> FsnAttributes {
    match path_arg(path) {
        Some(path) => compat::get_attributes(path, follow_links),
        None => AttributeTriple::FAILED,
    }
}

/// File type code of `path`, or -1.
///
/// # Safety
/// `path` must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn fsn_get_type(path: *const c_char, follow_links: bool) -> i32 {
    match path_arg(path) {
        Some(path) => compat::get_type(path, follow_links),
        None => compat::TYPE_FAILED,
    }
}

/// Toggle write and/or execute bits for all classes of `path`.
///
/// # Safety
/// `path` must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn fsn_change_mode(
    path: *const c_char,
    change_write: bool,
    enable_write: bool,
    change_exec: bool,
    enable_exec: bool,
) -> StatusCode {
    match path_arg(path) {
        Some(path) => compat::change_mode(path, change_write, enable_write, change_exec, enable_exec),
        None => StatusCode::Failed,
    }
}

/// Create a symlink at `link` pointing at `target`.
///
/// # Safety
/// Both arguments must be NULL or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn fsn_create_link(target: *const c_char, link: *const c_char) -> StatusCode {
    match (path_arg(target), path_arg(link)) {
        (Some(target), Some(link)) => compat::create_link(target, link),
        _ => StatusCode::LinkFailed,
    }
}

/// Target text of the symlink at `link`. Release with `fsn_string_free`.
///
/// # Safety
/// `link` must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn fsn_read_link(link: *const c_char) -> *mut c_char {
    path_arg(link)
        .and_then(compat::read_link_target)
        .and_then(path_bytes)
        .map_or(std::ptr::null_mut(), into_c_string)
}

/// Whether the calling process may execute `path`.
///
/// # Safety
/// `path` must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn fsn_is_executable(path: *const c_char) -> bool {
    path_arg(path).map_or(false, compat::is_executable)
}
