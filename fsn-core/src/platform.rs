//! Platform-specific abstractions
//!
//! The OS metadata calls sit behind [`MetadataProvider`]. Exactly one
//! provider is selected at build time as [`Native`]: [`Posix`] on Unix,
//! [`Unsupported`] everywhere else.

use crate::error::{NativeError, NativeResult};
use std::path::{Path, PathBuf};

#[cfg(unix)]
pub use crate::posix::Posix;

#[cfg(unix)]
pub type Native = Posix;

#[cfg(not(unix))]
pub type Native = Unsupported;

/// Raw fields of a `stat` result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStat {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

/// OS metadata, permission and link calls
pub trait MetadataProvider {
    /// `stat` when `follow_links`, otherwise `lstat`.
    fn stat(path: &Path, follow_links: bool) -> NativeResult<RawStat>;

    /// Replace the permission bits of `path` (follows links).
    fn set_mode(path: &Path, mode: u32) -> NativeResult<()>;

    fn symlink(target: &Path, link: &Path) -> NativeResult<()>;

    /// One level of `readlink`. Targets longer than `capacity` bytes fail
    /// with [`NativeError::Truncated`].
    fn read_link(link: &Path, capacity: usize) -> NativeResult<PathBuf>;

    /// Effective uid and gid of the calling process.
    fn effective_ids() -> (u32, u32);
}

/// Provider for targets without POSIX file metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl MetadataProvider for Unsupported {
    fn stat(_path: &Path, _follow_links: bool) -> NativeResult<RawStat> {
        Err(NativeError::Unsupported("stat".into()))
    }

    fn set_mode(_path: &Path, _mode: u32) -> NativeResult<()> {
        Err(NativeError::Unsupported("chmod".into()))
    }

    fn symlink(_target: &Path, _link: &Path) -> NativeResult<()> {
        Err(NativeError::Unsupported("symlink".into()))
    }

    fn read_link(_link: &Path, _capacity: usize) -> NativeResult<PathBuf> {
        Err(NativeError::Unsupported("readlink".into()))
    }

    fn effective_ids() -> (u32, u32) {
        (0, 0)
    }
}

/// Platform capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    pub posix_metadata: bool,
    pub symlinks: bool,
    pub secure_blob: bool,
}

impl PlatformCapabilities {
    pub fn detect() -> Self {
        #[cfg(unix)]
        return Self::posix();

        #[cfg(windows)]
        return Self::windows();

        #[cfg(not(any(unix, windows)))]
        return Self::minimal();
    }

    pub fn posix() -> Self {
        Self {
            posix_metadata: true,
            symlinks: true,
            secure_blob: false,
        }
    }

    pub fn windows() -> Self {
        Self {
            posix_metadata: false,
            symlinks: false,
            secure_blob: true,
        }
    }

    pub fn minimal() -> Self {
        Self {
            posix_metadata: false,
            symlinks: false,
            secure_blob: false,
        }
    }
}
