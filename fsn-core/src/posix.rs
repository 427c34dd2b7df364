//! POSIX metadata provider

use crate::error::{NativeError, NativeResult};
use crate::platform::{MetadataProvider, RawStat};
use std::ffi::{CString, OsString};
use std::fs;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

/// `stat`/`chmod`/`symlink`/`readlink` family
#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

fn c_path(path: &Path) -> NativeResult<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| NativeError::InvalidPath(path.to_path_buf()))
}

impl MetadataProvider for Posix {
    fn stat(path: &Path, follow_links: bool) -> NativeResult<RawStat> {
        let meta = if follow_links {
            fs::metadata(path)
        } else {
            fs::symlink_metadata(path)
        }
        .map_err(|e| NativeError::from_io(path, e))?;

        Ok(RawStat {
            mode: meta.mode(),
            uid: meta.uid(),
            gid: meta.gid(),
        })
    }

    fn set_mode(path: &Path, mode: u32) -> NativeResult<()> {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|e| NativeError::platform("chmod", e))
    }

    fn symlink(target: &Path, link: &Path) -> NativeResult<()> {
        std::os::unix::fs::symlink(target, link).map_err(|e| NativeError::platform("symlink", e))
    }

    fn read_link(link: &Path, capacity: usize) -> NativeResult<PathBuf> {
        let c_link = c_path(link)?;
        // One spare byte tells a target of exactly `capacity` bytes apart
        // from a truncated one.
        let mut buf = vec![0u8; capacity + 1];
        let n = unsafe { libc::readlink(c_link.as_ptr(), buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(NativeError::last_os_error("readlink"));
        }
        let n = n as usize;
        if n > capacity {
            return Err(NativeError::Truncated {
                path: link.to_path_buf(),
                capacity,
            });
        }
        buf.truncate(n);
        Ok(PathBuf::from(OsString::from_vec(buf)))
    }

    fn effective_ids() -> (u32, u32) {
        // Neither call can fail.
        unsafe { (libc::geteuid(), libc::getegid()) }
    }
}
