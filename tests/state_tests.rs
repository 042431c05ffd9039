mod common;

use common::fixtures::fixture_bytes;
use printer_certs::printer::cert_list::parse_certificate_ids;
use printer_certs::state::diff::diff_ids;
use printer_certs::{CertificateId, CertificateIdSet};
use reqwest::Url;

fn list_url() -> Url {
    Url::parse("https://printer.test/net/security/certificate/certificate.html").unwrap()
}

fn set(ids: &[&str]) -> CertificateIdSet {
    ids.iter().copied().collect()
}

// =========================================================================
// CertificateId / CertificateIdSet
// =========================================================================

#[test]
fn preset_and_empty_ids_are_recognised() {
    assert!(CertificateId::from("0").is_preset());
    assert!(!CertificateId::from("00").is_preset());
    assert!(CertificateId::from("").is_empty());
    assert!(!CertificateId::from("1").is_empty());
}

#[test]
fn id_set_ignores_duplicates_and_keeps_order() {
    let mut ids = set(&["3", "1", "3"]);
    assert_eq!(ids.len(), 2);
    assert!(!ids.insert(CertificateId::from("1")));
    assert!(ids.insert(CertificateId::from("2")));
    assert_eq!(ids.to_string(), "{3, 1, 2}");
}

#[test]
fn id_set_serializes_as_plain_list() {
    let json = serde_json::to_string(&set(&["1", "7"])).unwrap();
    assert_eq!(json, r#"["1","7"]"#);
}

// =========================================================================
// Snapshot diff
// =========================================================================

#[test]
fn diff_reports_single_addition() {
    let diff = diff_ids(&set(&["A", "B"]), &set(&["A", "B", "C"]));
    assert_eq!(diff.added, vec![CertificateId::from("C")]);
    assert!(diff.removed.is_empty());
}

#[test]
fn diff_reports_multiple_additions_in_snapshot_order() {
    let diff = diff_ids(&set(&["A", "B"]), &set(&["D", "A", "B", "C"]));
    assert_eq!(diff.added.len(), 2);
    assert_eq!(diff.added, vec![CertificateId::from("D"), CertificateId::from("C")]);
}

#[test]
fn diff_reports_removal() {
    let diff = diff_ids(&set(&["A", "B", "C"]), &set(&["A", "C"]));
    assert!(diff.added.is_empty());
    assert_eq!(diff.removed, vec![CertificateId::from("B")]);
}

#[test]
fn diff_ignores_reordering() {
    let diff = diff_ids(&set(&["A", "B"]), &set(&["B", "A"]));
    assert!(diff.is_unchanged());
}

#[test]
fn diff_of_empty_snapshots_is_unchanged() {
    assert!(diff_ids(&set(&[]), &set(&[])).is_unchanged());
}

// =========================================================================
// Certificate list page
// =========================================================================

#[test]
fn list_page_ids_come_from_idx_links() {
    let ids = parse_certificate_ids(&fixture_bytes("certificate_list.html"), &list_url());
    assert_eq!(ids, set(&["1", "2", "7"]));
}

#[test]
fn list_page_without_certificates_is_empty() {
    let ids = parse_certificate_ids(b"<html><body><a href=\"import.html\">Import</a><a href=\"x?idx=\">bad</a></body></html>", &list_url());
    assert!(ids.is_empty());
}

#[test]
fn list_page_ids_are_percent_decoded() {
    let body = b"<a href=\"delete.html?idx=a%2Bb\">Delete</a><a href=\"view.html?type=pem&amp;idx=c%20d\">View</a>";
    assert_eq!(parse_certificate_ids(body, &list_url()), set(&["a+b", "c d"]));
}
