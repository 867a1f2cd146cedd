//! Classifies what a bundle file currently contains.
//!
//! The bootstrap flow ends with a human either trusting the exported
//! bundle or replacing the placeholder by hand; this answers "which state
//! is the file in" without making anyone eyeball PEM.

use std::fs;
use std::io;
use std::path::Path;

use crate::placeholder;

/// What was found at the bundle path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleStatus {
    /// No file at the path.
    Missing,
    /// The file is exactly the generated placeholder.
    Placeholder,
    /// The file holds this many parseable X.509 certificates.
    Certificates(usize),
    /// The file exists but holds neither the placeholder nor any
    /// parseable certificate.
    Unrecognized,
}

/// Reads and classifies the bundle at `path`.
///
/// I/O errors other than the file being absent are propagated; everything
/// else maps onto a [`BundleStatus`].
pub fn inspect(path: &Path) -> io::Result<BundleStatus> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BundleStatus::Missing),
        Err(e) => return Err(e),
    };

    if content == placeholder::payload() {
        return Ok(BundleStatus::Placeholder);
    }

    match count_certificates(&content) {
        0 => Ok(BundleStatus::Unrecognized),
        n => Ok(BundleStatus::Certificates(n)),
    }
}

// Walks the bundle as consecutive PEM blocks, counting the ones that
// parse as X.509 certificates. Stops at the first block the PEM layer
// rejects; the placeholder's fake body fails right there.
fn count_certificates(bundle: &[u8]) -> usize {
    let mut remaining = bundle;
    let mut count = 0;

    loop {
        remaining = trim_leading_whitespace(remaining);
        if remaining.is_empty() {
            break;
        }

        match x509_parser::pem::parse_x509_pem(remaining) {
            Ok((next, pem)) => {
                if pem.label == "CERTIFICATE" && pem.parse_x509().is_ok() {
                    count += 1;
                }
                if next.len() >= remaining.len() {
                    break;
                }
                remaining = next;
            }
            Err(_) => break,
        }
    }

    count
}

fn trim_leading_whitespace(input: &[u8]) -> &[u8] {
    let idx = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(input.len());
    &input[idx..]
}
