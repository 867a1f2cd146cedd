//! Trust-store export for Windows targets.
//!
//! Enumerates the machine's `ROOT` system store through wincrypt instead
//! of shelling out to `certutil`. The store handle and certificate
//! contexts are raw pointers with manual lifetimes, wrapped here so the
//! enumeration loop can't leak them.

use std::ptr;
use std::slice;

use winapi::um::errhandlingapi::GetLastError;
use winapi::um::wincrypt::{
    CertCloseStore, CertEnumCertificatesInStore, CertGetNameStringW, CertOpenSystemStoreW,
    CERT_NAME_SIMPLE_DISPLAY_TYPE, HCERTSTORE, PCCERT_CONTEXT,
};

use super::{log_exported_subject, pem_encode_certificate, ExportResult};

/// The system store interception roots are deployed into.
const ROOT_STORE: &str = "ROOT";

struct SystemStore {
    inner: HCERTSTORE,
}

impl SystemStore {
    fn open(name: &str) -> Result<Self, u32> {
        let mut wide: Vec<u16> = name.encode_utf16().collect();
        wide.push(0);

        // SAFETY: `wide` is a NUL-terminated UTF-16 string that outlives
        // the call, and a null provider handle selects the default one.
        let handle = unsafe { CertOpenSystemStoreW(0, wide.as_ptr()) };
        if handle.is_null() {
            // SAFETY: no other Windows API call can run between the failed
            // open and this read on the current thread.
            Err(unsafe { GetLastError() })
        } else {
            Ok(Self { inner: handle })
        }
    }
}

impl Drop for SystemStore {
    fn drop(&mut self) {
        // SAFETY: the handle was returned by a successful
        // `CertOpenSystemStoreW` and is closed exactly once.
        unsafe { CertCloseStore(self.inner, 0) };
    }
}

/// Returns the certificate's simple display name (usually the subject
/// common name), or `None` if the context has no representable name.
fn display_name(context: PCCERT_CONTEXT) -> Option<String> {
    // First call sizes the buffer; the returned count includes the NUL.
    // SAFETY: `context` is a live certificate context owned by the
    // enumeration loop below.
    let len = unsafe {
        CertGetNameStringW(
            context,
            CERT_NAME_SIMPLE_DISPLAY_TYPE,
            0,
            ptr::null_mut(),
            ptr::null_mut(),
            0,
        )
    };
    if len <= 1 {
        return None;
    }

    let mut buffer = vec![0u16; len as usize];
    // SAFETY: `buffer` holds exactly the number of UTF-16 units the first
    // call asked for.
    let written = unsafe {
        CertGetNameStringW(
            context,
            CERT_NAME_SIMPLE_DISPLAY_TYPE,
            0,
            ptr::null_mut(),
            buffer.as_mut_ptr(),
            len,
        )
    };
    if written <= 1 {
        return None;
    }

    Some(String::from_utf16_lossy(&buffer[..written as usize - 1]))
}

/// Exports every certificate in the `ROOT` system store whose simple
/// display name contains `subject_filter`, PEM-encoded and concatenated
/// in enumeration order.
pub fn export_matching(subject_filter: &str) -> ExportResult {
    let store = match SystemStore::open(ROOT_STORE) {
        Ok(store) => store,
        Err(code) => {
            return ExportResult::QueryFailed(format!(
                "CertOpenSystemStoreW({ROOT_STORE}) failed with error {code:#010x}"
            ))
        }
    };

    let mut bundle = Vec::new();
    let mut matched = 0usize;

    // `CertEnumCertificatesInStore` frees the previous context on each
    // call and returns null at the end of the store, so the loop must not
    // break out while still holding a context.
    let mut context: PCCERT_CONTEXT = ptr::null();
    loop {
        // SAFETY: `store` is open for the whole loop and `context` is
        // either null (first call) or the value the previous call
        // returned.
        context = unsafe { CertEnumCertificatesInStore(store.inner, context) };
        if context.is_null() {
            break;
        }

        let Some(subject) = display_name(context) else {
            continue;
        };

        if subject.contains(subject_filter) {
            // SAFETY: wincrypt guarantees `pbCertEncoded` points at
            // `cbCertEncoded` bytes for a live context.
            let der = unsafe {
                slice::from_raw_parts((*context).pbCertEncoded, (*context).cbCertEncoded as usize)
            };
            log_exported_subject(&subject);
            pem_encode_certificate(der, &mut bundle);
            matched += 1;
        }
    }

    if matched == 0 {
        return ExportResult::NotFound;
    }

    log::info!("exported {matched} certificate(s) from the {ROOT_STORE} system store");
    ExportResult::Found(bundle)
}
