//! Windows DPAPI protector

use crate::{Protector, Unprotected};
use fsn_core::error::{NativeError, NativeResult};
use std::ptr;
use windows_sys::Win32::Foundation::LocalFree;
use windows_sys::Win32::Security::Cryptography::{
    CryptProtectData, CryptUnprotectData, CRYPTPROTECT_UI_FORBIDDEN, CRYPT_INTEGER_BLOB,
};

/// `CryptProtectData` / `CryptUnprotectData` under the current user
#[derive(Debug, Clone, Copy, Default)]
pub struct Dpapi;

/// Memory handed out by DPAPI, released with `LocalFree`.
struct LocalBuffer<T>(*mut T);

impl<T> Drop for LocalBuffer<T> {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe {
                LocalFree(self.0.cast());
            }
        }
    }
}

fn input_blob(data: &[u8]) -> NativeResult<CRYPT_INTEGER_BLOB> {
    let len = u32::try_from(data.len()).map_err(|_| NativeError::InvalidText("payload exceeds 4 GiB".into()))?;
    Ok(CRYPT_INTEGER_BLOB {
        cbData: len,
        pbData: data.as_ptr().cast_mut(),
    })
}

/// Copy out of a DPAPI output blob. The caller still owns the allocation.
unsafe fn blob_bytes(blob: &CRYPT_INTEGER_BLOB) -> Vec<u8> {
    if blob.pbData.is_null() || blob.cbData == 0 {
        return Vec::new();
    }
    std::slice::from_raw_parts(blob.pbData, blob.cbData as usize).to_vec()
}

/// Read a NUL-terminated UTF-16 string.
unsafe fn wide_to_string(wide: *const u16) -> NativeResult<String> {
    if wide.is_null() {
        return Ok(String::new());
    }
    let mut len = 0;
    while *wide.add(len) != 0 {
        len += 1;
    }
    String::from_utf16(std::slice::from_raw_parts(wide, len)).map_err(|e| NativeError::InvalidText(e.to_string()))
}

impl Protector for Dpapi {
    fn protect_raw(data: &[u8], description: &str) -> NativeResult<Vec<u8>> {
        let input = input_blob(data)?;
        let description: Vec<u16> = description.encode_utf16().chain(std::iter::once(0)).collect();
        let mut output = CRYPT_INTEGER_BLOB {
            cbData: 0,
            pbData: ptr::null_mut(),
        };

        let ok = unsafe {
            CryptProtectData(
                &input,
                description.as_ptr(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
                CRYPTPROTECT_UI_FORBIDDEN,
                &mut output,
            )
        };
        if ok == 0 {
            return Err(NativeError::last_os_error("CryptProtectData"));
        }

        let _guard = LocalBuffer(output.pbData);
        Ok(unsafe { blob_bytes(&output) })
    }

    fn unprotect_raw(blob: &[u8]) -> NativeResult<Unprotected> {
        let input = input_blob(blob)?;
        let mut description: *mut u16 = ptr::null_mut();
        let mut output = CRYPT_INTEGER_BLOB {
            cbData: 0,
            pbData: ptr::null_mut(),
        };

        let ok = unsafe {
            CryptUnprotectData(
                &input,
                &mut description,
                ptr::null(),
                ptr::null(),
                ptr::null(),
                CRYPTPROTECT_UI_FORBIDDEN,
                &mut output,
            )
        };
        if ok == 0 {
            return Err(NativeError::last_os_error("CryptUnprotectData"));
        }

        let _data_guard = LocalBuffer(output.pbData);
        let _description_guard = LocalBuffer(description);
        Ok(Unprotected {
            data: unsafe { blob_bytes(&output) },
            description: unsafe { wide_to_string(description)? },
        })
    }
}
