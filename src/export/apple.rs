//! Keychain export for Apple platforms, via the Security framework.

use security_framework::item::{ItemClass, ItemSearchOptions, Limit, Reference, SearchResult};

use super::{log_exported_subject, pem_encode_certificate, ExportResult};

mod errors {
    pub(super) use security_framework_sys::base::errSecItemNotFound;
}

/// Exports every certificate in the keychain search list whose subject
/// summary contains `subject_filter`, PEM-encoded and concatenated.
///
/// The search covers all keychains in the default search list, which
/// includes the System keychain where MDM-deployed interception roots
/// land. A search that matches nothing is reported as [`ExportResult::NotFound`],
/// not as an error; `errSecItemNotFound` is the status the framework uses
/// for that case.
pub fn export_matching(subject_filter: &str) -> ExportResult {
    let results = match ItemSearchOptions::new()
        .class(ItemClass::certificate())
        .limit(Limit::All)
        .load_refs(true)
        .search()
    {
        Ok(results) => results,
        Err(e) if e.code() == errors::errSecItemNotFound => return ExportResult::NotFound,
        Err(e) => return ExportResult::QueryFailed(e.to_string()),
    };

    let mut bundle = Vec::new();
    let mut matched = 0usize;

    for item in results {
        let SearchResult::Ref(Reference::Certificate(cert)) = item else {
            continue;
        };

        // The subject summary is the framework's human-readable subject
        // (usually the common name), which is what the filter is matched
        // against.
        let subject = cert.subject_summary();

        if subject.contains(subject_filter) {
            log_exported_subject(&subject);
            pem_encode_certificate(&cert.to_der(), &mut bundle);
            matched += 1;
        }
    }

    if matched == 0 {
        return ExportResult::NotFound;
    }

    log::info!("exported {matched} certificate(s) from the keychain");
    ExportResult::Found(bundle)
}
