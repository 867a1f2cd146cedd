use std::fs;

use tempfile::TempDir;

use crate::bootstrap::ensure_with;
use crate::export::{pem_encode_certificate, ExportResult};
use crate::inspect::{inspect, BundleStatus};
use crate::{ensure_certificate, placeholder, policy, BootstrapError, Outcome};

fn bundle_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("certs").join("corp-root-ca.pem")
}

fn self_signed_pem() -> String {
    let cert = rcgen::generate_simple_self_signed(vec!["corptrust.test".to_string()])
        .expect("certificate generation");
    cert.serialize_pem().expect("PEM serialization")
}

// ── decision table ──────────────────────────────────────────────────

#[test]
fn absent_destination_with_export_hit_writes_the_export() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);
    let pem = self_signed_pem().into_bytes();

    let outcome = ensure_with(&path, "Test Root", |_| ExportResult::Found(pem.clone())).unwrap();

    assert_eq!(outcome, Outcome::Exported);
    assert_eq!(fs::read(&path).unwrap(), pem);
}

#[test]
fn absent_destination_with_no_match_writes_the_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);

    let outcome = ensure_with(&path, "Test Root", |_| ExportResult::NotFound).unwrap();

    assert_eq!(outcome, Outcome::PlaceholderWritten);
    assert_eq!(fs::read(&path).unwrap(), placeholder::payload());
}

#[test]
fn query_failure_falls_back_to_the_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);

    let outcome = ensure_with(&path, "Test Root", |_| {
        ExportResult::QueryFailed("store locked".into())
    })
    .unwrap();

    assert_eq!(outcome, Outcome::PlaceholderWritten);
    assert_eq!(fs::read(&path).unwrap(), placeholder::payload());
}

#[test]
fn unsupported_platform_falls_back_to_the_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);

    let outcome = ensure_with(&path, "Test Root", |_| ExportResult::Unsupported).unwrap();

    assert_eq!(outcome, Outcome::PlaceholderWritten);
}

#[test]
fn empty_export_payload_counts_as_no_match() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);

    let outcome = ensure_with(&path, "Test Root", |_| ExportResult::Found(Vec::new())).unwrap();

    assert_eq!(outcome, Outcome::PlaceholderWritten);
    assert_eq!(fs::read(&path).unwrap(), placeholder::payload());
}

#[test]
fn destination_is_never_left_empty() {
    for result in [
        ExportResult::Found(self_signed_pem().into_bytes()),
        ExportResult::NotFound,
        ExportResult::QueryFailed("reason".into()),
        ExportResult::Unsupported,
    ] {
        let dir = TempDir::new().unwrap();
        let path = bundle_path(&dir);
        ensure_with(&path, "Test Root", |_| result.clone()).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}

// ── idempotence and no-overwrite ────────────────────────────────────

#[test]
fn second_run_reports_already_present_and_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);

    ensure_with(&path, "Test Root", |_| ExportResult::NotFound).unwrap();
    let after_first = fs::read(&path).unwrap();

    let outcome = ensure_with(&path, "Test Root", |_| ExportResult::NotFound).unwrap();

    assert_eq!(outcome, Outcome::AlreadyPresent);
    assert_eq!(fs::read(&path).unwrap(), after_first);
}

#[test]
fn existing_content_survives_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);
    let hand_replaced = b"my carefully pasted certificate\n".to_vec();

    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, &hand_replaced).unwrap();

    let outcome = ensure_certificate(&path, "Test Root").unwrap();

    assert_eq!(outcome, Outcome::AlreadyPresent);
    assert_eq!(fs::read(&path).unwrap(), hand_replaced);
}

#[test]
fn present_destination_skips_the_trust_store_entirely() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"anything").unwrap();

    let outcome = ensure_with(&path, "Test Root", |_| {
        panic!("the store must not be queried when the file exists")
    })
    .unwrap();

    assert_eq!(outcome, Outcome::AlreadyPresent);
}

#[test]
fn zero_length_file_is_treated_as_absent() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"").unwrap();

    let outcome = ensure_with(&path, "Test Root", |_| ExportResult::NotFound).unwrap();

    assert_eq!(outcome, Outcome::PlaceholderWritten);
    assert_eq!(fs::read(&path).unwrap(), placeholder::payload());
}

// ── error paths ─────────────────────────────────────────────────────

#[test]
fn blank_subject_filter_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);

    let err = ensure_certificate(&path, "   ").unwrap_err();

    assert!(matches!(err, BootstrapError::EmptyFilter));
    assert!(!path.exists());
}

#[test]
fn unwritable_destination_is_a_fatal_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"a file where a directory is needed").unwrap();

    let path = blocker.join("corp-root-ca.pem");
    let err = ensure_with(&path, "Test Root", |_| ExportResult::NotFound).unwrap_err();

    assert!(matches!(err, BootstrapError::CreateDir(..)));
}

// ── placeholder shape ───────────────────────────────────────────────

#[test]
fn placeholder_is_pem_framed() {
    let text = std::str::from_utf8(placeholder::payload()).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("-----BEGIN CERTIFICATE-----"));
    assert_eq!(lines.next_back(), Some("-----END CERTIFICATE-----"));
}

#[test]
fn placeholder_never_parses_as_a_certificate() {
    assert!(x509_parser::pem::parse_x509_pem(placeholder::payload()).is_err());
}

// ── PEM encoding ────────────────────────────────────────────────────

#[test]
fn pem_encoding_wraps_at_64_columns_and_parses_back() {
    let cert = rcgen::generate_simple_self_signed(vec!["corptrust.test".to_string()]).unwrap();
    let der = cert.serialize_der().unwrap();

    let mut encoded = Vec::new();
    pem_encode_certificate(&der, &mut encoded);

    let text = std::str::from_utf8(&encoded).unwrap();
    for line in text.lines() {
        assert!(line.len() <= 64, "body line longer than 64 columns: {line}");
    }

    let (rest, pem) = x509_parser::pem::parse_x509_pem(&encoded).unwrap();
    assert!(rest.is_empty());
    assert_eq!(pem.contents, der);
    pem.parse_x509().unwrap();
}

// ── bundle classification ───────────────────────────────────────────

#[test]
fn inspect_distinguishes_every_bundle_state() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);

    assert_eq!(inspect(&path).unwrap(), BundleStatus::Missing);

    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, placeholder::payload()).unwrap();
    assert_eq!(inspect(&path).unwrap(), BundleStatus::Placeholder);

    fs::write(&path, self_signed_pem()).unwrap();
    assert_eq!(inspect(&path).unwrap(), BundleStatus::Certificates(1));

    fs::write(&path, b"not pem at all").unwrap();
    assert_eq!(inspect(&path).unwrap(), BundleStatus::Unrecognized);
}

#[test]
fn inspect_counts_concatenated_certificates() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);

    let bundle = format!("{}{}", self_signed_pem(), self_signed_pem());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, bundle).unwrap();

    assert_eq!(inspect(&path).unwrap(), BundleStatus::Certificates(2));
}

// ── platform dispatch ───────────────────────────────────────────────

#[cfg(not(any(windows, target_os = "macos", target_os = "ios")))]
#[test]
fn this_platform_has_no_queryable_store() {
    assert_eq!(
        crate::export_matching("Test Root"),
        ExportResult::Unsupported
    );
}

#[cfg(not(any(windows, target_os = "macos", target_os = "ios")))]
#[test]
fn end_to_end_bootstrap_writes_the_placeholder_here() {
    let dir = TempDir::new().unwrap();
    let path = bundle_path(&dir);

    let outcome = ensure_certificate(&path, "Test Root").unwrap();

    assert_eq!(outcome, Outcome::PlaceholderWritten);
    assert_eq!(inspect(&path).unwrap(), BundleStatus::Placeholder);
}

// ── fallback policy ─────────────────────────────────────────────────

#[test]
fn policy_renders_one_line_per_variable() {
    let rendered = policy::render_dotenv();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), policy::TLS_BYPASS_ENV.len());
    for (line, var) in lines.iter().zip(policy::TLS_BYPASS_ENV) {
        assert_eq!(*line, format!("{}={}", var.name, var.value));
    }
}

#[test]
fn policy_covers_the_documented_consumers() {
    let names: Vec<&str> = policy::TLS_BYPASS_ENV.iter().map(|v| v.name).collect();
    for expected in [
        "OLLAMA_INSECURE",
        "CURL_CA_BUNDLE",
        "GIT_SSL_NO_VERIFY",
        "PYTHONHTTPSVERIFY",
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }
}
