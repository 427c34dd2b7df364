//! Error types for fsnative

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type NativeResult<T> = Result<T, NativeError>;

/// Main error type
#[derive(Error, Debug)]
pub enum NativeError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Invalid path (embedded NUL): {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Too many levels of symbolic links: {}", .0.display())]
    TooManyLinks(PathBuf),

    #[error("Link target of {} exceeds {capacity} bytes", .path.display())]
    Truncated { path: PathBuf, capacity: usize },

    #[error("Context mismatch: expected {expected:?}, found {found:?}")]
    ContextMismatch { expected: String, found: String },

    #[error("{call} failed: {source}")]
    PlatformCall {
        call: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Malformed text: {0}")]
    InvalidText(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Failure classes visible to callers that only see a sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing path or access denied
    Inaccessible,
    /// Protected blob carries a foreign context tag
    ContextMismatch,
    /// OS or security-service call failed
    PlatformCall,
    /// Link text did not fit the buffer
    Truncation,
    /// Input could not be passed to the OS
    InvalidInput,
}

impl NativeError {
    /// Map an I/O failure on `path`, keeping the two causes callers care
    /// about as distinct variants.
    pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => NativeError::NotFound(path.into()),
            io::ErrorKind::PermissionDenied => NativeError::PermissionDenied(path.into()),
            _ => NativeError::Io(err),
        }
    }

    pub fn platform(call: &'static str, source: io::Error) -> Self {
        NativeError::PlatformCall { call, source }
    }

    /// Capture `errno` / `GetLastError` right after a failed call.
    pub fn last_os_error(call: &'static str) -> Self {
        Self::platform(call, io::Error::last_os_error())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            NativeError::NotFound(_) | NativeError::PermissionDenied(_) => {
                ErrorCategory::Inaccessible
            }
            NativeError::ContextMismatch { .. } => ErrorCategory::ContextMismatch,
            NativeError::Truncated { .. } => ErrorCategory::Truncation,
            NativeError::InvalidPath(_) | NativeError::NotAFile(_) | NativeError::InvalidText(_) => {
                ErrorCategory::InvalidInput
            }
            NativeError::TooManyLinks(_)
            | NativeError::PlatformCall { .. }
            | NativeError::Unsupported(_)
            | NativeError::Io(_) => ErrorCategory::PlatformCall,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, NativeError::NotFound(_))
    }

    /// Raw OS error code, when the failure came from one.
    pub fn os_error(&self) -> Option<i32> {
        match self {
            NativeError::PlatformCall { source, .. } | NativeError::Io(source) => {
                source.raw_os_error()
            }
            _ => None,
        }
    }
}
