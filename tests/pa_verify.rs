//! End-to-end smoke tests against the public API: an empty trust store and
//! deliberately malformed input should fail gracefully (a `Verdict` with
//! `overall: FAILED` and populated `failure_reasons`), never panic or hang.

use std::collections::HashMap;

use icao_pkd_core::{
    config::CoreConfig,
    crl::Crl,
    deviation::DeviationHit,
    pa::{self, VerificationInput},
    trust::{AuditSink, CertificateStore, VerificationEvent},
    verdict::{Overall, SodSignatureStatus},
    x509::{CanonicalName, Certificate},
};

struct EmptyStore;

impl CertificateStore for EmptyStore {
    fn find_by_subject(&self, _subject: &CanonicalName) -> Vec<Certificate> {
        Vec::new()
    }

    fn find_by_ski(&self, _ski: &[u8]) -> Vec<Certificate> {
        Vec::new()
    }

    fn find_crls_by_issuer(&self, _issuer: &CanonicalName) -> Vec<Crl> {
        Vec::new()
    }

    fn find_deviations_for(&self, _issuer: &CanonicalName, _serial: &[u8]) -> Vec<DeviationHit> {
        Vec::new()
    }

    fn is_trust_anchor(&self, _fingerprint_sha256: &[u8; 32]) -> bool {
        false
    }
}

struct NullAudit;

impl AuditSink for NullAudit {
    fn record(&self, _event: VerificationEvent) {}
}

#[test]
fn garbage_sod_fails_gracefully_with_reasons() {
    let dg_bytes = HashMap::new();
    let input = VerificationInput {
        sod_bytes: b"this is not a valid EF.SOD",
        dg_bytes: &dg_bytes,
        evaluation_time: 1_700_000_000,
    };
    let config = CoreConfig::default();

    let outcome = pa::verify(&input, &EmptyStore, &NullAudit, &config, &()).expect("not cancelled");

    assert_eq!(outcome.verdict.overall, Overall::Failed);
    assert_eq!(outcome.verdict.sod.signature, SodSignatureStatus::Invalid);
    assert!(!outcome.verdict.failure_reasons.is_empty());
    assert!(outcome.verdict.chain.is_empty());
}

#[test]
fn garbage_sod_verdict_round_trips_through_json() {
    let dg_bytes = HashMap::new();
    let input = VerificationInput {
        sod_bytes: &[0u8; 4],
        dg_bytes: &dg_bytes,
        evaluation_time: 1_700_000_000,
    };
    let config = CoreConfig::default();

    let outcome = pa::verify(&input, &EmptyStore, &NullAudit, &config, &()).expect("not cancelled");
    let json = serde_json::to_string(&outcome.verdict).expect("verdict serializes");
    assert!(json.contains("\"overall\":\"FAILED\""));
    assert!(json.contains("\"compliance_warnings\":[]"));
}

#[test]
fn certificate_parse_rejects_garbage() {
    assert!(Certificate::parse(b"not a certificate").is_err());
}

#[test]
fn crl_parse_rejects_garbage() {
    assert!(Crl::parse(b"not a crl").is_err());
}
