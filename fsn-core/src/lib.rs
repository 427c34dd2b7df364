//! fsnative core
//!
//! File type, permission and ownership queries packed into a compact
//! integer encoding, plus permission toggling and symbolic link primitives.
//!
//! Each operation has two faces: a `Result`-returning function in [`stat`],
//! [`mode`] and [`link`], and a sentinel-returning twin in [`compat`] that
//! matches the native boundary contract.

pub mod attributes;
pub mod compat;
pub mod error;
pub mod link;
pub mod mode;
pub mod platform;
#[cfg(unix)]
mod posix;
pub mod stat;

pub use attributes::{AttributeTriple, FileAttributes, FileKind, PermissionBits};
pub use compat::StatusCode;
pub use error::{ErrorCategory, NativeError, NativeResult};
pub use mode::{ModeChange, ModeOutcome};
pub use platform::{MetadataProvider, Native, PlatformCapabilities};
