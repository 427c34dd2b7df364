//! Path stat service

use crate::attributes::{FileAttributes, FileKind};
use crate::error::NativeResult;
use crate::platform::{MetadataProvider, Native};
use std::path::Path;

/// Query and decode the metadata of `path`.
///
/// With `follow_links` unset a terminal symlink is described as itself;
/// otherwise the OS resolves the whole chain and the target is described.
pub fn attributes(path: &Path, follow_links: bool) -> NativeResult<FileAttributes> {
    attributes_with::<Native>(path, follow_links)
}

pub fn attributes_with<P: MetadataProvider>(path: &Path, follow_links: bool) -> NativeResult<FileAttributes> {
    let raw = P::stat(path, follow_links)?;
    Ok(FileAttributes::from_mode(raw.mode, raw.uid, raw.gid))
}

pub fn file_kind(path: &Path, follow_links: bool) -> NativeResult<FileKind> {
    file_kind_with::<Native>(path, follow_links)
}

pub fn file_kind_with<P: MetadataProvider>(path: &Path, follow_links: bool) -> NativeResult<FileKind> {
    let raw = P::stat(path, follow_links)?;
    Ok(FileKind::from_mode(raw.mode))
}

/// Whether the calling process may execute `path`, judged by the owner,
/// group or other bits depending on its effective ids.
pub fn is_executable(path: &Path) -> NativeResult<bool> {
    is_executable_with::<Native>(path)
}

pub fn is_executable_with<P: MetadataProvider>(path: &Path) -> NativeResult<bool> {
    let attrs = attributes_with::<P>(path, true)?;
    let (uid, gid) = P::effective_ids();
    Ok(attrs.permissions.executable_for(attrs.uid == uid, attrs.gid == gid))
}
