//! Permission mutator
//!
//! Write and execute bits are toggled for owner, group and other at once.
//! The mode is read, adjusted and written back in separate calls, so a
//! concurrent chmod of the same path between the read and the write is lost.

use crate::attributes::PermissionBits;
use crate::error::NativeResult;
use crate::platform::{MetadataProvider, Native};
use std::path::Path;
use tracing::debug;

/// Bits a chmod may touch: rwx plus setuid, setgid and sticky.
const MODE_BITS: u32 = 0o7777;

/// Requested permission toggles. `None` leaves that class of bits alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeChange {
    pub writable: Option<bool>,
    pub executable: Option<bool>,
}

impl ModeChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writable(mut self, enable: bool) -> Self {
        self.writable = Some(enable);
        self
    }

    pub fn executable(mut self, enable: bool) -> Self {
        self.executable = Some(enable);
        self
    }

    /// Build from the flag-and-value pairs of the boundary call.
    pub fn from_flags(change_write: bool, enable_write: bool, change_exec: bool, enable_exec: bool) -> Self {
        Self {
            writable: change_write.then_some(enable_write),
            executable: change_exec.then_some(enable_exec),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.writable.is_none() && self.executable.is_none()
    }

    /// Apply the toggles to a mode, leaving all other bits as they were.
    pub fn apply(&self, mode: u32) -> u32 {
        let mut mode = mode;
        if let Some(enable) = self.writable {
            mode = toggle(mode, PermissionBits::ALL_WRITE, enable);
        }
        if let Some(enable) = self.executable {
            mode = toggle(mode, PermissionBits::ALL_EXECUTE, enable);
        }
        mode
    }
}

fn toggle(mode: u32, bits: u32, enable: bool) -> u32 {
    if enable {
        mode | bits
    } else {
        mode & !bits
    }
}

/// What a [`change_mode`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOutcome {
    Unchanged { mode: u32 },
    Changed { from: u32, to: u32 },
}

impl ModeOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, ModeOutcome::Changed { .. })
    }

    pub fn mode(&self) -> u32 {
        match *self {
            ModeOutcome::Unchanged { mode } => mode,
            ModeOutcome::Changed { to, .. } => to,
        }
    }
}

/// Apply `change` to `path`, following symlinks. The mode is only written
/// when it actually differs.
pub fn change_mode(path: &Path, change: ModeChange) -> NativeResult<ModeOutcome> {
    change_mode_with::<Native>(path, change)
}

pub fn change_mode_with<P: MetadataProvider>(path: &Path, change: ModeChange) -> NativeResult<ModeOutcome> {
    let current = P::stat(path, true)?.mode & MODE_BITS;
    let updated = change.apply(current);
    if updated == current {
        return Ok(ModeOutcome::Unchanged { mode: current });
    }

    P::set_mode(path, updated)?;
    debug!(path = %path.display(), from = %format!("{current:o}"), to = %format!("{updated:o}"), "mode changed");
    Ok(ModeOutcome::Changed {
        from: current,
        to: updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NativeError;
    use crate::platform::RawStat;
    use std::path::PathBuf;

    #[test]
    fn test_apply_write_toggle() {
        let readonly = ModeChange::new().writable(false);
        assert_eq!(readonly.apply(0o100666), 0o100444);
        assert_eq!(readonly.apply(0o100644), 0o100444);
        assert_eq!(ModeChange::new().writable(true).apply(0o444), 0o666);
    }

    #[test]
    fn test_apply_exec_toggle() {
        assert_eq!(ModeChange::new().executable(true).apply(0o644), 0o755);
        assert_eq!(ModeChange::new().executable(false).apply(0o4755), 0o4644);
    }

    #[test]
    fn test_from_flags() {
        assert!(ModeChange::from_flags(false, true, false, true).is_noop());
        let change = ModeChange::from_flags(true, false, true, true);
        assert_eq!(change.writable, Some(false));
        assert_eq!(change.executable, Some(true));
        assert_eq!(change.apply(0o640), 0o551);
    }

    /// Reports a fixed mode and refuses every chmod.
    struct ReadOnlyFs;

    impl MetadataProvider for ReadOnlyFs {
        fn stat(_path: &Path, _follow_links: bool) -> NativeResult<RawStat> {
            Ok(RawStat { mode: 0o100644, uid: 0, gid: 0 })
        }

        fn set_mode(_path: &Path, _mode: u32) -> NativeResult<()> {
            Err(NativeError::platform("chmod", std::io::Error::from_raw_os_error(30)))
        }

        fn symlink(_target: &Path, _link: &Path) -> NativeResult<()> {
            unreachable!()
        }

        fn read_link(_link: &Path, _capacity: usize) -> NativeResult<PathBuf> {
            unreachable!()
        }

        fn effective_ids() -> (u32, u32) {
            (0, 0)
        }
    }

    #[test]
    fn test_failed_chmod_propagates() {
        let err = change_mode_with::<ReadOnlyFs>(Path::new("/ro/file"), ModeChange::new().executable(true))
            .unwrap_err();
        assert_eq!(err.os_error(), Some(30));
    }

    #[test]
    fn test_no_write_when_unchanged() {
        // set_mode would fail, so success proves it was never called.
        let outcome = change_mode_with::<ReadOnlyFs>(Path::new("/ro/file"), ModeChange::new().executable(false))
            .unwrap();
        assert_eq!(outcome, ModeOutcome::Unchanged { mode: 0o644 });
    }

    #[cfg(unix)]
    #[test]
    fn test_toggle_on_disk_is_idempotent() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o664)).unwrap();

        let readonly = ModeChange::new().writable(false);
        let first = change_mode(&file, readonly).unwrap();
        assert_eq!(first, ModeOutcome::Changed { from: 0o664, to: 0o444 });
        assert!(first.is_changed());
        let second = change_mode(&file, readonly).unwrap();
        assert_eq!(second, ModeOutcome::Unchanged { mode: 0o444 });
        assert!(!second.is_changed());
        assert_eq!(second.mode(), 0o444);

        let restored = change_mode(&file, ModeChange::new().writable(true)).unwrap();
        assert_eq!(restored.mode(), 0o666);
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_path_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = change_mode(&dir.path().join("missing"), ModeChange::new().writable(true)).unwrap_err();
        assert!(err.is_not_found());
    }
}
