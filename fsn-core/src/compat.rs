//! Sentinel-returning entry points
//!
//! These keep the boundary contract of the native component: every failure
//! collapses into one reserved value per operation. The underlying
//! [`NativeError`] is logged at `debug` level before it is discarded.
//!
//! | Operation | Failure value |
//! |---|---|
//! | [`get_attributes`] | kind nibble `5` |
//! | [`get_type`] | [`TYPE_FAILED`] |
//! | [`change_mode`] | [`StatusCode::Failed`] |
//! | [`create_link`] | [`StatusCode::LinkFailed`] |
//! | [`read_link_target`] | `None` |

use crate::attributes::{AttributeTriple, FileAttributes};
use crate::error::{NativeError, NativeResult};
use crate::link;
use crate::mode::{self, ModeChange};
use crate::stat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `get_type` failure marker, outside the `1..=4` kind range.
pub const TYPE_FAILED: i32 = -1;

/// Status word returned by the mode and link calls
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Success = 0,
    /// `change_mode` failed
    Failed = 1,
    /// `create_link` failed, matching the `symlink(2)` return value
    LinkFailed = -1,
}

impl StatusCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == StatusCode::Success
    }
}

fn collapse<T>(op: &'static str, path: &Path, result: NativeResult<T>) -> Option<T> {
    result
        .map_err(|e: NativeError| {
            debug!(op, path = %path.display(), category = ?e.category(), error = %e, "native call failed");
        })
        .ok()
}

pub fn get_attributes(path: &Path, follow_links: bool) -> AttributeTriple {
    collapse("get_attributes", path, stat::attributes(path, follow_links))
        .unwrap_or_else(FileAttributes::failed)
        .triple()
}

pub fn get_type(path: &Path, follow_links: bool) -> i32 {
    collapse("get_type", path, stat::file_kind(path, follow_links)).map_or(TYPE_FAILED, |kind| kind.code())
}

/// Unlike the OS call it wraps, an unreadable path reports
/// [`StatusCode::Failed`] rather than silently succeeding.
pub fn change_mode(
    path: &Path,
    change_write: bool,
    enable_write: bool,
    change_exec: bool,
    enable_exec: bool,
) -> StatusCode {
    let change = ModeChange::from_flags(change_write, enable_write, change_exec, enable_exec);
    match collapse("change_mode", path, mode::change_mode(path, change)) {
        Some(_) => StatusCode::Success,
        None => StatusCode::Failed,
    }
}

pub fn create_link(target: &Path, link: &Path) -> StatusCode {
    match collapse("create_link", link, link::create_link(target, link)) {
        Some(()) => StatusCode::Success,
        None => StatusCode::LinkFailed,
    }
}

pub fn read_link_target(link: &Path) -> Option<PathBuf> {
    collapse("read_link_target", link, link::read_link_target(link))
}

pub fn resolve_link_chain(path: &Path) -> Option<PathBuf> {
    collapse("resolve_link_chain", path, link::resolve_link_chain(path))
}

/// `false` both for non-executable files and for failed queries.
pub fn is_executable(path: &Path) -> bool {
    collapse("is_executable", path, stat::is_executable(path)).unwrap_or(false)
}
