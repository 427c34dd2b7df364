//! Sentinel-returning protect/unprotect
//!
//! Both calls return `None` on any failure, including a blob sealed under a
//! foreign context tag. The cause is logged at `debug` level.

use fsn_core::error::NativeResult;
use tracing::debug;

use crate::{Native, Protector};

fn collapse<T>(op: &'static str, result: NativeResult<T>) -> Option<T> {
    result
        .map_err(|e| debug!(op, category = ?e.category(), error = %e, "secure blob call failed"))
        .ok()
}

/// `text` must be valid UTF-8; anything else yields `None`.
pub fn protect(text: &[u8]) -> Option<Vec<u8>> {
    protect_with::<Native>(text)
}

pub fn protect_with<P: Protector>(text: &[u8]) -> Option<Vec<u8>> {
    let text = match std::str::from_utf8(text) {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "protect input is not text");
            return None;
        }
    };
    collapse("protect", crate::protect_with::<P>(text))
}

pub fn unprotect(blob: &[u8]) -> Option<String> {
    unprotect_with::<Native>(blob)
}

pub fn unprotect_with<P: Protector>(blob: &[u8]) -> Option<String> {
    collapse("unprotect", crate::unprotect_with::<P>(blob))
}
