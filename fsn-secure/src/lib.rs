//! fsnative secure blobs
//!
//! Protects a secret string with the platform's per-user data protection
//! service so only the same user on the same machine can recover it. Every
//! blob is bound to [`CONTEXT_TAG`]; a blob that unprotects cleanly but
//! carries any other tag is rejected, so ciphertext produced for another
//! purpose cannot be replayed here.
//!
//! The platform call sits behind [`Protector`]. [`Native`] is the DPAPI
//! protector on Windows and [`Unavailable`] elsewhere.

pub mod compat;
#[cfg(windows)]
mod dpapi;

use fsn_core::error::{NativeError, NativeResult};
use tracing::warn;

#[cfg(windows)]
pub use dpapi::Dpapi;

#[cfg(windows)]
pub type Native = Dpapi;

#[cfg(not(windows))]
pub type Native = Unavailable;

/// Description string sealed into every blob.
pub const CONTEXT_TAG: &str = "auth_svn.simple.wincrypt";

/// Result of a raw unprotect: the payload and the description it was
/// sealed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unprotected {
    pub data: Vec<u8>,
    pub description: String,
}

/// Platform data protection service
pub trait Protector {
    /// Seal `data` together with `description`. Must never prompt the user.
    fn protect_raw(data: &[u8], description: &str) -> NativeResult<Vec<u8>>;

    /// Open a sealed blob. Must never prompt the user.
    fn unprotect_raw(blob: &[u8]) -> NativeResult<Unprotected>;
}

/// Protector for platforms without a data protection service
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl Protector for Unavailable {
    fn protect_raw(_data: &[u8], _description: &str) -> NativeResult<Vec<u8>> {
        Err(NativeError::Unsupported("data protection".into()))
    }

    fn unprotect_raw(_blob: &[u8]) -> NativeResult<Unprotected> {
        Err(NativeError::Unsupported("data protection".into()))
    }
}

pub fn protect(plain_text: &str) -> NativeResult<Vec<u8>> {
    protect_with::<Native>(plain_text)
}

pub fn protect_with<P: Protector>(plain_text: &str) -> NativeResult<Vec<u8>> {
    P::protect_raw(plain_text.as_bytes(), CONTEXT_TAG)
}

pub fn unprotect(blob: &[u8]) -> NativeResult<String> {
    unprotect_with::<Native>(blob)
}

/// Recover the secret from `blob`. The text ends at the first NUL, if any.
pub fn unprotect_with<P: Protector>(blob: &[u8]) -> NativeResult<String> {
    let opened = P::unprotect_raw(blob)?;
    if opened.description != CONTEXT_TAG {
        warn!(found = %opened.description, "rejecting blob sealed for another context");
        return Err(NativeError::ContextMismatch {
            expected: CONTEXT_TAG.to_string(),
            found: opened.description,
        });
    }

    let mut data = opened.data;
    if let Some(end) = data.iter().position(|&b| b == 0) {
        data.truncate(end);
    }
    String::from_utf8(data).map_err(|e| NativeError::InvalidText(e.to_string()))
}

/// Reversible in-memory protector for exercising the context guard.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    const MASK: u8 = 0x5A;

    /// Blob layout: `[tag_len: u8][tag][payload ^ MASK]`.
    pub struct MaskProtector;

    impl Protector for MaskProtector {
        fn protect_raw(data: &[u8], description: &str) -> NativeResult<Vec<u8>> {
            let tag = description.as_bytes();
            let tag_len = u8::try_from(tag.len()).map_err(|_| NativeError::InvalidText("tag too long".into()))?;
            let mut blob = vec![tag_len];
            blob.extend_from_slice(tag);
            blob.extend(data.iter().map(|b| b ^ MASK));
            Ok(blob)
        }

        fn unprotect_raw(blob: &[u8]) -> NativeResult<Unprotected> {
            let bad = || NativeError::platform("unmask", std::io::Error::from(std::io::ErrorKind::InvalidData));
            let (&tag_len, rest) = blob.split_first().ok_or_else(bad)?;
            let tag_len = tag_len as usize;
            if rest.len() < tag_len {
                return Err(bad());
            }
            let (tag, payload) = rest.split_at(tag_len);
            Ok(Unprotected {
                data: payload.iter().map(|b| b ^ MASK).collect(),
                description: String::from_utf8(tag.to_vec()).map_err(|_| bad())?,
            })
        }
    }
}
