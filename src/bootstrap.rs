//! Decides whether the bundle file needs to be (re)created, and writes it.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::export::{self, ExportResult};
use crate::placeholder;

/// What [`ensure_certificate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The destination already held a non-empty file; nothing was touched.
    AlreadyPresent,
    /// Matching certificates were exported from the trust store and written.
    Exported,
    /// Nothing could be exported; the fixed placeholder was written.
    PlaceholderWritten,
}

/// Errors from [`ensure_certificate`].
///
/// Only destination I/O is fatal. A failing or empty trust-store query is
/// handled by falling back to the placeholder and never surfaces here.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The subject filter was empty or all whitespace.
    #[error("subject filter must not be empty")]
    EmptyFilter,
    /// The destination's parent directory could not be created.
    #[error("failed to create directory {0}: {1}")]
    CreateDir(PathBuf, io::Error),
    /// The bundle could not be written at the destination.
    #[error("failed to write {0}: {1}")]
    Write(PathBuf, io::Error),
}

/// Ensures a certificate bundle exists at `path`.
///
/// If `path` is already a non-empty regular file it is left byte-for-byte
/// untouched and the call returns [`Outcome::AlreadyPresent`], so re-running
/// never overwrites a certificate someone pasted in by hand. Otherwise
/// the platform trust store is queried for subjects containing
/// `subject_filter`; a hit is written as the bundle, and every other query
/// result (no match, query failure, no store on this platform) falls back
/// to the placeholder.
///
/// The write is a single atomic replace: content goes to a temporary file
/// next to the destination and is renamed into place, so an interrupted
/// run can't leave a truncated bundle for the image build to pick up.
pub fn ensure_certificate(path: &Path, subject_filter: &str) -> Result<Outcome, BootstrapError> {
    ensure_with(path, subject_filter, export::export_matching)
}

// The query function is a parameter so the decision table can be tested
// against every `ExportResult` variant on any host platform.
pub(crate) fn ensure_with(
    path: &Path,
    subject_filter: &str,
    query: impl FnOnce(&str) -> ExportResult,
) -> Result<Outcome, BootstrapError> {
    if subject_filter.trim().is_empty() {
        return Err(BootstrapError::EmptyFilter);
    }

    if is_present(path) {
        log::debug!("{} already present, not touching it", path.display());
        return Ok(Outcome::AlreadyPresent);
    }

    let (content, outcome) = match query(subject_filter) {
        ExportResult::Found(pem) if !pem.is_empty() => (pem, Outcome::Exported),
        ExportResult::Found(_) => {
            log::warn!("trust store query matched but produced no data, writing placeholder");
            (placeholder::payload().to_vec(), Outcome::PlaceholderWritten)
        }
        ExportResult::NotFound => {
            log::info!("no trust store entry matches {subject_filter:?}, writing placeholder");
            (placeholder::payload().to_vec(), Outcome::PlaceholderWritten)
        }
        ExportResult::QueryFailed(reason) => {
            log::warn!("trust store query failed ({reason}), writing placeholder");
            (placeholder::payload().to_vec(), Outcome::PlaceholderWritten)
        }
        ExportResult::Unsupported => {
            log::debug!("no queryable trust store on this platform, writing placeholder");
            (placeholder::payload().to_vec(), Outcome::PlaceholderWritten)
        }
    };

    write_atomic(path, &content)?;
    Ok(outcome)
}

// A zero-length file counts as absent: an earlier interrupted tool (or a
// `touch` while wiring up the build) shouldn't block regeneration.
fn is_present(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), BootstrapError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .map_err(|e| BootstrapError::CreateDir(parent.to_path_buf(), e))?;

    // Stage in the destination directory so the final rename can't cross
    // filesystems.
    let mut staged = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| BootstrapError::Write(path.to_path_buf(), e))?;
    staged
        .write_all(content)
        .map_err(|e| BootstrapError::Write(path.to_path_buf(), e))?;
    staged
        .persist(path)
        .map_err(|e| BootstrapError::Write(path.to_path_buf(), e.error))?;

    Ok(())
}
