//! Trust-store export, one submodule per platform family.
//!
//! Each platform module exposes the same `export_matching` function; this
//! module selects the right one at compile time and holds the pieces they
//! share. Platforms without a queryable system trust store get the
//! `others` implementation, which reports itself as unsupported rather
//! than failing.

#[cfg(any(target_os = "macos", target_os = "ios"))]
mod apple;

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub use apple::export_matching;

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::export_matching;

#[cfg(not(any(windows, target_os = "macos", target_os = "ios")))]
mod others;

#[cfg(not(any(windows, target_os = "macos", target_os = "ios")))]
pub use others::export_matching;

/// Result of querying the platform trust store for matching certificates.
///
/// "No match" and "the query itself failed" are deliberately separate
/// variants: an empty result is a normal outcome on machines that don't
/// have the interception root installed, while a failed query is worth a
/// warning even though both end up falling back to the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportResult {
    /// One or more matching certificates, PEM-encoded and concatenated in
    /// the store's enumeration order. The order carries no meaning.
    Found(Vec<u8>),
    /// The store was queried successfully and nothing matched.
    NotFound,
    /// The store could not be queried; carries the platform's reason.
    QueryFailed(String),
    /// This platform has no queryable system trust store.
    Unsupported,
}

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// Appends `der` to `out` as one PEM certificate block, body wrapped at
/// the conventional 64 columns.
#[cfg_attr(
    not(any(windows, target_os = "macos", target_os = "ios")),
    allow(dead_code)
)]
pub(crate) fn pem_encode_certificate(der: &[u8], out: &mut Vec<u8>) {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let body = STANDARD.encode(der);

    out.extend_from_slice(PEM_BEGIN.as_bytes());
    out.push(b'\n');
    for line in body.as_bytes().chunks(64) {
        out.extend_from_slice(line);
        out.push(b'\n');
    }
    out.extend_from_slice(PEM_END.as_bytes());
    out.push(b'\n');
}

// Log each certificate we exported so a surprising bundle can be traced
// back to the store entry it came from.
#[cfg_attr(
    not(any(windows, target_os = "macos", target_os = "ios")),
    allow(dead_code)
)]
pub(crate) fn log_exported_subject(subject: &str) {
    log::debug!("exporting trust store entry with subject: {subject}");
}
