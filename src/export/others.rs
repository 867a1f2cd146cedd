//! Fallback for platforms without a queryable system trust store.
//!
//! Linux containers and BSDs keep trust anchors as plain directories of
//! PEM files with no subject-indexed query API, so there is nothing to
//! export from; the bootstrapper writes the placeholder instead.

use super::ExportResult;

/// Always reports the platform as unsupported. Not an error: callers are
/// expected to fall back to the placeholder.
pub fn export_matching(_subject_filter: &str) -> ExportResult {
    ExportResult::Unsupported
}
