//! The placeholder written when no certificate can be exported.

/// The fixed placeholder payload: a PEM begin marker, one instructional
/// line, and the end marker.
///
/// The middle line contains spaces and punctuation, so no certificate
/// parser will ever accept the block as base64 body data, while tooling
/// that merely copies "the certificate file" into an image keeps working.
/// The image's trust-store refresh step is expected to log-and-skip the
/// invalid entry rather than abort.
const PLACEHOLDER: &str = "-----BEGIN CERTIFICATE-----\n\
    REPLACE ME: paste your network's TLS interception root certificate (PEM) over this file\n\
    -----END CERTIFICATE-----\n";

/// Returns the placeholder payload.
pub fn payload() -> &'static [u8] {
    PLACEHOLDER.as_bytes()
}
