//! Symbolic link service

use crate::attributes::FileKind;
use crate::error::{NativeError, NativeResult};
use crate::platform::{MetadataProvider, Native};
use std::path::{Path, PathBuf};

/// Largest link target, in bytes, that [`read_link_target`] returns.
pub const LINK_TARGET_CAPACITY: usize = 1024;

/// Hop limit for [`resolve_link_chain`], matching Linux `MAXSYMLINKS`.
pub const MAX_LINK_HOPS: usize = 40;

/// Create a symlink at `link` whose target text is `target`.
pub fn create_link(target: &Path, link: &Path) -> NativeResult<()> {
    create_link_with::<Native>(target, link)
}

pub fn create_link_with<P: MetadataProvider>(target: &Path, link: &Path) -> NativeResult<()> {
    P::symlink(target, link)
}

/// Read one level of `link`. Chained links are not followed.
pub fn read_link_target(link: &Path) -> NativeResult<PathBuf> {
    read_link_target_with::<Native>(link)
}

pub fn read_link_target_with<P: MetadataProvider>(link: &Path) -> NativeResult<PathBuf> {
    P::read_link(link, LINK_TARGET_CAPACITY)
}

/// Follow `path` one link at a time until a non-link is reached, and return
/// it if it is a regular file. Relative targets resolve against the
/// directory holding the link.
pub fn resolve_link_chain(path: &Path) -> NativeResult<PathBuf> {
    resolve_link_chain_with::<Native>(path)
}

pub fn resolve_link_chain_with<P: MetadataProvider>(path: &Path) -> NativeResult<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..=MAX_LINK_HOPS {
        let raw = P::stat(&current, false)?;
        match FileKind::from_mode(raw.mode) {
            FileKind::File => return Ok(current),
            FileKind::Symlink => {
                let target = P::read_link(&current, LINK_TARGET_CAPACITY)?;
                current = if target.is_absolute() {
                    target
                } else {
                    current.parent().unwrap_or_else(|| Path::new("")).join(target)
                };
            }
            _ => return Err(NativeError::NotAFile(current)),
        }
    }
    Err(NativeError::TooManyLinks(path.to_path_buf()))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_read_is_byte_exact() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("ln");
        let target = Path::new("../some where/ü-target.txt");

        create_link(target, &link).unwrap();
        assert_eq!(read_link_target(&link).unwrap().as_os_str(), target.as_os_str());
    }

    #[test]
    fn test_read_does_not_follow_chain() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        create_link(Path::new("final"), &first).unwrap();
        create_link(&first, &second).unwrap();

        assert_eq!(read_link_target(&second).unwrap(), first);
    }

    #[test]
    fn test_create_over_existing_fails() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("taken");
        fs::write(&link, b"").unwrap();
        let err = create_link(Path::new("x"), &link).unwrap_err();
        assert_eq!(err.os_error(), Some(libc::EEXIST));
    }

    #[test]
    fn test_read_non_link_fails() {
        let dir = TempDir::new().unwrap();
        assert!(read_link_target(dir.path()).is_err());
        assert!(read_link_target(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_target_over_capacity_is_truncation() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("long");
        let target = format!("{}x", "d/".repeat(LINK_TARGET_CAPACITY / 2));
        create_link(Path::new(&target), &link).unwrap();

        assert!(matches!(read_link_target(&link), Err(NativeError::Truncated { .. })));
    }

    #[test]
    fn test_target_at_capacity_is_returned() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("full");
        let target = "d/".repeat(LINK_TARGET_CAPACITY / 2);
        create_link(Path::new(&target), &link).unwrap();

        assert_eq!(read_link_target(&link).unwrap().as_os_str(), target.as_str());
    }

    #[test]
    fn test_resolve_relative_chain() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("file.txt"), b"x").unwrap();
        create_link(Path::new("nested/file.txt"), &dir.path().join("one")).unwrap();
        create_link(Path::new("one"), &dir.path().join("two")).unwrap();

        let resolved = resolve_link_chain(&dir.path().join("two")).unwrap();
        assert_eq!(resolved, dir.path().join("nested/file.txt"));
    }

    #[test]
    fn test_resolve_to_directory_fails() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("d");
        create_link(dir.path(), &link).unwrap();
        assert!(matches!(resolve_link_chain(&link), Err(NativeError::NotAFile(_))));
    }

    #[test]
    fn test_resolve_cycle_terminates() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        create_link(&b, &a).unwrap();
        create_link(&a, &b).unwrap();
        assert!(matches!(resolve_link_chain(&a), Err(NativeError::TooManyLinks(_))));
    }
}
