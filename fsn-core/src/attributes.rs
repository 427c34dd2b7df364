//! Packed file attribute encoding
//!
//! A file's type and permission bits travel across the native boundary as a
//! single `i32` word plus the owner and group ids:
//!
//! ```text
//!  15    12 11     8 7      4 3      0
//! +--------+--------+--------+--------+
//! | owner  | group  | other  |  kind  |
//! +--------+--------+--------+--------+
//! ```
//!
//! Each permission nibble holds `read=4 | write=2 | execute=1`. The kind
//! nibble is always one of the [`FileKind`] codes `1..=5`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// File type mask within a raw `st_mode`.
pub const S_IFMT: u32 = 0o170000;
pub const S_IFREG: u32 = 0o100000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFLNK: u32 = 0o120000;

const KIND_MASK: i32 = 0xF;
const OWNER_SHIFT: u32 = 12;
const GROUP_SHIFT: u32 = 8;
const OTHER_SHIFT: u32 = 4;

/// Coarse file type classification
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileKind {
    File = 1,
    Directory = 2,
    Symlink = 3,
    Other = 4,
    /// The metadata query itself failed.
    Error = 5,
}

impl FileKind {
    /// Classify the type bits of a raw mode.
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => FileKind::File,
            S_IFDIR => FileKind::Directory,
            S_IFLNK => FileKind::Symlink,
            _ => FileKind::Other,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(FileKind::File),
            2 => Some(FileKind::Directory),
            3 => Some(FileKind::Symlink),
            4 => Some(FileKind::Other),
            5 => Some(FileKind::Error),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_error(self) -> bool {
        self == FileKind::Error
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::File => "file",
            FileKind::Directory => "directory",
            FileKind::Symlink => "symlink",
            FileKind::Other => "other",
            FileKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// The 9-bit owner/group/other rwx matrix of a mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32")]
pub struct PermissionBits(u32);

impl PermissionBits {
    pub const ALL_WRITE: u32 = 0o222;
    pub const ALL_EXECUTE: u32 = 0o111;

    /// Keep only the rwx bits of `mode`; setuid, setgid and sticky are dropped.
    pub fn from_mode(mode: u32) -> Self {
        Self(mode & 0o777)
    }

    pub fn mode(self) -> u32 {
        self.0
    }

    pub fn owner(self) -> u32 {
        (self.0 >> 6) & 0o7
    }

    pub fn group(self) -> u32 {
        (self.0 >> 3) & 0o7
    }

    pub fn other(self) -> u32 {
        self.0 & 0o7
    }

    /// Execute permission as seen by a caller who owns the file, or else
    /// shares its group, or else neither.
    pub fn executable_for(self, is_owner: bool, in_group: bool) -> bool {
        let class = if is_owner {
            self.owner()
        } else if in_group {
            self.group()
        } else {
            self.other()
        };
        class & 0o1 != 0
    }

    /// Spread the three classes into the packed word's permission nibbles.
    pub fn packed(self) -> i32 {
        ((self.owner() << OWNER_SHIFT) | (self.group() << GROUP_SHIFT) | (self.other() << OTHER_SHIFT))
            as i32
    }

    pub fn from_packed(word: i32) -> Self {
        let word = word as u32;
        let owner = (word >> OWNER_SHIFT) & 0o7;
        let group = (word >> GROUP_SHIFT) & 0o7;
        let other = (word >> OTHER_SHIFT) & 0o7;
        Self((owner << 6) | (group << 3) | other)
    }
}

impl From<u32> for PermissionBits {
    fn from(mode: u32) -> Self {
        Self::from_mode(mode)
    }
}

impl fmt::Display for PermissionBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in [self.owner(), self.group(), self.other()] {
            let r = if class & 0o4 != 0 { 'r' } else { '-' };
            let w = if class & 0o2 != 0 { 'w' } else { '-' };
            let x = if class & 0o1 != 0 { 'x' } else { '-' };
            write!(f, "{r}{w}{x}")?;
        }
        Ok(())
    }
}

/// Decoded view of a file's metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileAttributes {
    pub kind: FileKind,
    pub permissions: PermissionBits,
    pub uid: u32,
    pub gid: u32,
}

impl FileAttributes {
    pub fn from_mode(mode: u32, uid: u32, gid: u32) -> Self {
        Self {
            kind: FileKind::from_mode(mode),
            permissions: PermissionBits::from_mode(mode),
            uid,
            gid,
        }
    }

    /// Attributes reported when the metadata query fails. The ids are zero
    /// and carry no meaning.
    pub fn failed() -> Self {
        Self {
            kind: FileKind::Error,
            permissions: PermissionBits::default(),
            uid: 0,
            gid: 0,
        }
    }

    pub fn pack(&self) -> i32 {
        self.permissions.packed() | self.kind.code()
    }

    pub fn triple(&self) -> AttributeTriple {
        AttributeTriple {
            attributes: self.pack(),
            uid: self.uid,
            gid: self.gid,
        }
    }
}

/// Wire form of [`FileAttributes`]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeTriple {
    pub attributes: i32,
    pub uid: u32,
    pub gid: u32,
}

impl AttributeTriple {
    pub const FAILED: AttributeTriple = AttributeTriple {
        attributes: FileKind::Error as i32,
        uid: 0,
        gid: 0,
    };

    pub fn kind(&self) -> Option<FileKind> {
        FileKind::from_code(self.attributes & KIND_MASK)
    }

    pub fn permissions(&self) -> PermissionBits {
        PermissionBits::from_packed(self.attributes)
    }

    pub fn is_failure(&self) -> bool {
        self.kind().map_or(true, FileKind::is_error)
    }

    /// Decode back into attributes. `None` for the failure triple or a word
    /// whose kind nibble is out of range.
    pub fn decode(&self) -> Option<FileAttributes> {
        match self.kind()? {
            FileKind::Error => None,
            kind => Some(FileAttributes {
                kind,
                permissions: self.permissions(),
                uid: self.uid,
                gid: self.gid,
            }),
        }
    }
}

impl From<FileAttributes> for AttributeTriple {
    fn from(attrs: FileAttributes) -> Self {
        attrs.triple()
    }
}

/// Pack a raw mode and ownership into the boundary triple.
pub fn encode(mode: u32, uid: u32, gid: u32) -> AttributeTriple {
    FileAttributes::from_mode(mode, uid, gid).triple()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mode() {
        assert_eq!(FileKind::from_mode(S_IFREG | 0o644), FileKind::File);
        assert_eq!(FileKind::from_mode(S_IFDIR | 0o755), FileKind::Directory);
        assert_eq!(FileKind::from_mode(S_IFLNK | 0o777), FileKind::Symlink);
        // FIFO, socket, char device
        assert_eq!(FileKind::from_mode(0o010000), FileKind::Other);
        assert_eq!(FileKind::from_mode(0o140000), FileKind::Other);
        assert_eq!(FileKind::from_mode(0o020000), FileKind::Other);
    }

    #[test]
    fn test_owner_rwx_packs_to_high_nibble() {
        let triple = encode(S_IFREG | 0o700, 1000, 100);
        assert_eq!(triple.attributes & !0xF, 0x7000);
        assert_eq!(triple.attributes & 0xF, 1);
        assert_eq!((triple.uid, triple.gid), (1000, 100));
    }

    #[test]
    fn test_each_class_lands_in_its_nibble() {
        let triple = encode(S_IFREG | 0o644, 0, 0);
        assert_eq!(triple.attributes, 0x6441);

        let triple = encode(S_IFDIR | 0o751, 0, 0);
        assert_eq!(triple.attributes, 0x7512);
    }

    #[test]
    fn test_special_bits_are_dropped() {
        let triple = encode(S_IFREG | 0o4755, 0, 0);
        assert_eq!(triple.attributes, 0x7551);
    }

    #[test]
    fn test_failure_triple() {
        let triple = FileAttributes::failed().triple();
        assert_eq!(triple, AttributeTriple::FAILED);
        assert_eq!(triple.attributes, 5);
        assert!(triple.is_failure());
        assert!(triple.decode().is_none());
    }

    #[test]
    fn test_decode_recovers_attributes() {
        let attrs = FileAttributes::from_mode(S_IFLNK | 0o754, 501, 20);
        let decoded = attrs.triple().decode().unwrap();
        assert_eq!(decoded, attrs);
        assert_eq!(decoded.permissions.mode(), 0o754);
    }

    #[test]
    fn test_kind_nibble_always_in_range() {
        for mode in (0..=0o177777u32).step_by(7) {
            let code = encode(mode, 0, 0).attributes & 0xF;
            assert!((1..=4).contains(&code), "mode {mode:o} gave kind {code}");
        }
    }

    #[test]
    fn test_executable_for_class() {
        let perms = PermissionBits::from_mode(0o754);
        assert!(perms.executable_for(true, false));
        assert!(perms.executable_for(false, true));
        assert!(!perms.executable_for(false, false));
        // Ownership wins over group membership.
        let perms = PermissionBits::from_mode(0o615);
        assert!(!perms.executable_for(true, true));
    }

    #[test]
    fn test_serialize() {
        let attrs = FileAttributes::from_mode(S_IFDIR | 0o755, 1, 2);
        let json = serde_json::to_value(attrs).unwrap();
        assert_eq!(json["kind"], "Directory");
        assert_eq!(json["permissions"], 0o755);
        assert_eq!(json["gid"], 2);
    }

    #[test]
    fn test_deserialized_permissions_stay_within_rwx() {
        let perms: PermissionBits = serde_json::from_str("4095").unwrap();
        assert_eq!(perms.mode(), 0o777);
        let perms: PermissionBits = serde_json::from_str("2541").unwrap();
        assert_eq!(perms, PermissionBits::from_mode(0o4755));
        assert_eq!(perms.packed(), 0x7550);
    }

    #[test]
    fn test_display() {
        assert_eq!(PermissionBits::from_mode(0o750).to_string(), "rwxr-x---");
        assert_eq!(FileKind::Symlink.to_string(), "symlink");
    }
}
