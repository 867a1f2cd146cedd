#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod bootstrap;
mod export;
pub mod inspect;
pub mod placeholder;
pub mod policy;

pub use bootstrap::{ensure_certificate, BootstrapError, Outcome};
pub use export::{export_matching, ExportResult};

/// Fixtures and scenarios exercising the bootstrap decision table
/// and the bundle classifier.
#[cfg(test)]
mod tests;

/// Default location of the certificate bundle, relative to the directory
/// the image build runs from. The container build copies this exact path
/// into the image's trust-anchor directory.
pub const DEFAULT_BUNDLE_PATH: &str = "certs/corp-root-ca.pem";

/// Default subject substring used to select interception roots from the
/// trust store. Matches the vendor deployed on the networks this tool was
/// built for; override with `--subject` when yours differs.
pub const DEFAULT_SUBJECT_FILTER: &str = "Zscaler";
