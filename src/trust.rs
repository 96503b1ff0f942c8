//! Trust store collaborator interfaces and the chain builder (spec.md §4.11,
//! §6).
//!
//! The core never owns a trust store — it borrows one through
//! [`CertificateStore`] for the span of a single verification call and
//! reports what it found through [`AuditSink`]. Both traits are implemented
//! by the embedding application (directory tables, LDAP, an in-memory test
//! fixture, ...).

use der::{asn1::ObjectIdentifier as Oid, Decode};
use x509_cert::ext::pkix::{AuthorityKeyIdentifier, BasicConstraints, KeyUsage};

use crate::{
    asn1::public_key_info::SubjectPublicKeyInfo,
    config::CoreConfig,
    crl::Crl,
    crypto::signature::verify_signature,
    deviation::DeviationHit,
    error::PkdError,
    x509::{CanonicalName, Certificate},
};

const OID_KEY_USAGE: Oid = Oid::new_unwrap("2.5.29.15");
const OID_BASIC_CONSTRAINTS: Oid = Oid::new_unwrap("2.5.29.19");
const OID_AUTHORITY_KEY_IDENTIFIER: Oid = Oid::new_unwrap("2.5.29.35");

/// Extensions the chain builder understands natively; anything else marked
/// critical must be on the policy's `accepted_critical_exts` allow-list.
const KNOWN_CRITICAL_EXTS: &[Oid] = &[OID_KEY_USAGE, OID_BASIC_CONSTRAINTS];

/// A certificate already known to be trusted by policy — typically a
/// self-signed CSCA loaded out-of-band, or one admitted via a Master List
/// signed by an already-trusted CSCA (spec.md §4.6).
#[derive(Clone, Debug)]
pub struct TrustAnchor {
    pub certificate: Certificate,
}

/// External lookups the chain builder needs, implemented by the embedding
/// application (spec.md §6). All lookups are synchronous and side-effect
/// free from the core's point of view.
pub trait CertificateStore {
    fn find_by_subject(&self, subject: &CanonicalName) -> Vec<Certificate>;
    fn find_by_ski(&self, ski: &[u8]) -> Vec<Certificate>;
    /// Newest first.
    fn find_crls_by_issuer(&self, issuer: &CanonicalName) -> Vec<Crl>;
    fn find_deviations_for(&self, issuer: &CanonicalName, serial: &[u8]) -> Vec<DeviationHit>;
    fn is_trust_anchor(&self, fingerprint_sha256: &[u8; 32]) -> bool;
}

/// A verification-progress or outcome event, fired to an [`AuditSink`] as a
/// side channel independent of the returned [`crate::verdict::Verdict`].
#[derive(Clone, Debug)]
pub enum VerificationEvent {
    ChainStepValidated { subject: String, issuer: String },
    ChainNoIssuer { subject: String },
    ChainTooDeep { subject: String, depth: usize },
    RevocationHit { serial: Vec<u8>, issuer: String },
    DeviationHit { issuer: String, serial: Vec<u8>, oid: Oid },
}

/// Fire-and-forget sink for [`VerificationEvent`]s (spec.md §6). The core
/// never blocks on or inspects the result of `record`.
pub trait AuditSink {
    fn record(&self, event: VerificationEvent);
}

/// A validated link in a certificate chain, leaf first.
#[derive(Clone, Debug)]
pub struct ChainLink {
    pub certificate: Certificate,
    pub is_anchor: bool,
}

/// Build and validate the issuer chain for `leaf` up to a trust anchor
/// (spec.md §4.11). Returns the chain starting with `leaf` and ending with
/// the anchor; revocation is consulted for every non-anchor node against the
/// newest CRL from its issuer.
pub fn build_chain(
    leaf: &Certificate,
    store: &impl CertificateStore,
    audit: &impl AuditSink,
    config: &CoreConfig,
    evaluation_time: u64,
) -> Result<Vec<ChainLink>, PkdError> {
    let mut chain = vec![ChainLink {
        certificate: leaf.clone(),
        is_anchor: store.is_trust_anchor(&leaf.fingerprint_sha256),
    }];

    if chain[0].is_anchor {
        check_no_unknown_critical_ext(&chain[0].certificate, config)?;
        return Ok(chain);
    }

    let mut depth = 0usize;
    loop {
        let child = chain.last().expect("chain is never empty").certificate.clone();

        check_no_unknown_critical_ext(&child, config)?;

        if config.chain_too_deep(depth) {
            audit.record(VerificationEvent::ChainTooDeep {
                subject: child.subject.as_str().to_owned(),
                depth,
            });
            return Err(PkdError::ChainTooDeep);
        }

        let parent = select_issuer(&child, store, evaluation_time).inspect_err(|_| {
            audit.record(VerificationEvent::ChainNoIssuer {
                subject: child.subject.as_str().to_owned(),
            });
        })?;

        validate_edge(&child, &parent, evaluation_time, config)?;
        check_revocation(&child, &parent, store, audit, config, evaluation_time)?;

        audit.record(VerificationEvent::ChainStepValidated {
            subject: child.subject.as_str().to_owned(),
            issuer: parent.subject.as_str().to_owned(),
        });

        let is_anchor =
            store.is_trust_anchor(&parent.fingerprint_sha256) || parent.subject == parent.issuer;
        if is_anchor {
            check_no_unknown_critical_ext(&parent, config)?;
        }
        chain.push(ChainLink {
            certificate: parent,
            is_anchor,
        });
        if is_anchor {
            return Ok(chain);
        }

        depth += 1;
    }
}

/// Locate the issuer candidate for `child`: subject = child's issuer
/// (canonical equality), SKI = child's AKI when present, tie-broken by
/// validity-window overlap at the target time then newest `not_before`.
fn select_issuer(
    child: &Certificate,
    store: &impl CertificateStore,
    evaluation_time: u64,
) -> Result<Certificate, PkdError> {
    let by_subject = store.find_by_subject(&child.issuer);
    let aki = authority_key_identifier(child);

    let mut candidates: Vec<Certificate> = match &aki {
        Some(aki) => {
            let by_ski = store.find_by_ski(aki);
            if by_ski.is_empty() {
                by_subject
            } else {
                by_ski
                    .into_iter()
                    .filter(|cert| cert.subject == child.issuer)
                    .collect()
            }
        }
        None => by_subject,
    };

    if candidates.is_empty() {
        return Err(PkdError::ChainNoIssuer);
    }
    if candidates.len() == 1 {
        return Ok(candidates.remove(0));
    }

    // Prefer a candidate whose validity window covers the evaluation time
    // (the common CSCA key-rollover case, where an old and a new link
    // certificate both name the same issuer); among those, or if none
    // overlap, fall back to the newest `not_before`.
    let overlapping: Vec<Certificate> = candidates
        .iter()
        .filter(|cert| cert.not_before <= evaluation_time && evaluation_time <= cert.not_after)
        .cloned()
        .collect();
    let pool = if overlapping.is_empty() { candidates } else { overlapping };

    pool.into_iter()
        .max_by_key(|cert| cert.not_before)
        .ok_or(PkdError::ChainNoIssuer)
}

fn authority_key_identifier(cert: &Certificate) -> Option<Vec<u8>> {
    let ext = cert.extension(OID_AUTHORITY_KEY_IDENTIFIER)?;
    let aki = AuthorityKeyIdentifier::from_der(&ext.value_der).ok()?;
    Some(aki.key_identifier?.as_bytes().to_vec())
}

fn has_key_cert_sign(cert: &Certificate) -> bool {
    let Some(ext) = cert.extension(OID_KEY_USAGE) else {
        return false;
    };
    KeyUsage::from_der(&ext.value_der)
        .map(|ku| ku.key_cert_sign())
        .unwrap_or(false)
}

fn is_ca(cert: &Certificate) -> bool {
    let Some(ext) = cert.extension(OID_BASIC_CONSTRAINTS) else {
        return false;
    };
    BasicConstraints::from_der(&ext.value_der)
        .map(|bc| bc.ca)
        .unwrap_or(false)
}

fn validate_edge(
    child: &Certificate,
    parent: &Certificate,
    evaluation_time: u64,
    config: &CoreConfig,
) -> Result<(), PkdError> {
    if child.issuer != parent.subject {
        return Err(PkdError::ChainNoIssuer);
    }

    let skew = config.clock_skew.as_secs();
    if evaluation_time + skew < child.not_before || evaluation_time > child.not_after + skew {
        return Err(PkdError::CertExpired);
    }
    if evaluation_time + skew < parent.not_before || evaluation_time > parent.not_after + skew {
        return Err(PkdError::CertExpired);
    }

    if !has_key_cert_sign(parent) {
        return Err(PkdError::CertMalformed(
            "issuer certificate lacks keyUsage.keyCertSign".into(),
        ));
    }
    if !is_ca(parent) {
        return Err(PkdError::CertMalformed(
            "issuer certificate is not a CA (basicConstraints.cA=false)".into(),
        ));
    }

    let pubkey = SubjectPublicKeyInfo::try_from(&parent.spki)
        .map_err(|_| PkdError::CertMalformed("issuer SPKI malformed".into()))?;

    verify_signature(&pubkey, &child.signature_algorithm, &child.tbs_der, &child.signature_value)
        .map_err(|_| PkdError::SigInvalid)
}

fn check_no_unknown_critical_ext(cert: &Certificate, config: &CoreConfig) -> Result<(), PkdError> {
    for ext in &cert.extensions {
        if ext.critical
            && !KNOWN_CRITICAL_EXTS.contains(&ext.oid)
            && !config.accepted_critical_exts.contains(&ext.oid)
        {
            return Err(PkdError::UnknownCriticalExt(ext.oid));
        }
    }
    Ok(())
}

fn check_revocation(
    child: &Certificate,
    parent: &Certificate,
    store: &impl CertificateStore,
    audit: &impl AuditSink,
    config: &CoreConfig,
    evaluation_time: u64,
) -> Result<(), PkdError> {
    let crls = store.find_crls_by_issuer(&parent.subject);
    let Some(newest) = crls.first() else {
        return Ok(());
    };

    let pubkey = SubjectPublicKeyInfo::try_from(&parent.spki)
        .map_err(|_| PkdError::CertMalformed("issuer SPKI malformed".into()))?;
    verify_signature(&pubkey, &newest.signature_algorithm, &newest.tbs_der, &newest.signature)
        .map_err(|_| PkdError::SigInvalid)?;

    if newest.is_stale(evaluation_time) && !config.accept_stale_crls {
        return Err(PkdError::RevocationStale);
    }

    if let Some(entry) = newest.is_revoked(&child.serial) {
        audit.record(VerificationEvent::RevocationHit {
            serial: child.serial.clone(),
            issuer: parent.subject.as_str().to_owned(),
        });
        return Err(PkdError::CertRevoked {
            serial: hex::encode(&child.serial),
            reason: entry.reason.unwrap_or(crate::error::RevocationReason::Unspecified),
            date: entry.revocation_date.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x509::certificate::test_fixture;

    struct FixtureStore {
        certs: Vec<Certificate>,
        anchors: Vec<[u8; 32]>,
        crls: Vec<Crl>,
    }

    impl CertificateStore for FixtureStore {
        fn find_by_subject(&self, subject: &CanonicalName) -> Vec<Certificate> {
            self.certs.iter().filter(|c| &c.subject == subject).cloned().collect()
        }

        fn find_by_ski(&self, _ski: &[u8]) -> Vec<Certificate> {
            Vec::new()
        }

        fn find_crls_by_issuer(&self, issuer: &CanonicalName) -> Vec<Crl> {
            self.crls.iter().filter(|c| &c.issuer == issuer).cloned().collect()
        }

        fn find_deviations_for(&self, _issuer: &CanonicalName, _serial: &[u8]) -> Vec<DeviationHit> {
            Vec::new()
        }

        fn is_trust_anchor(&self, fingerprint_sha256: &[u8; 32]) -> bool {
            self.anchors.contains(fingerprint_sha256)
        }
    }

    struct NullAudit;

    impl AuditSink for NullAudit {
        fn record(&self, _event: VerificationEvent) {}
    }

    #[test]
    fn leaf_that_is_already_a_trust_anchor_short_circuits() {
        let leaf = test_fixture(CanonicalName::for_test("leaf"), CanonicalName::for_test("leaf"), 0, u64::MAX, vec![], [7u8; 32]);
        let store = FixtureStore {
            certs: vec![],
            anchors: vec![[7u8; 32]],
            crls: vec![],
        };
        let config = CoreConfig::default();

        let chain = build_chain(&leaf, &store, &NullAudit, &config, 1_000).unwrap();
        assert_eq!(chain.len(), 1);
        assert!(chain[0].is_anchor);
    }

    #[test]
    fn no_matching_issuer_fails_with_chain_no_issuer() {
        let leaf = test_fixture(CanonicalName::for_test("leaf"), CanonicalName::for_test("missing-ca"), 0, u64::MAX, vec![], [1u8; 32]);
        let store = FixtureStore {
            certs: vec![],
            anchors: vec![],
            crls: vec![],
        };
        let config = CoreConfig::default();

        let err = build_chain(&leaf, &store, &NullAudit, &config, 1_000).unwrap_err();
        assert!(matches!(err, PkdError::ChainNoIssuer));
    }

    #[test]
    fn unknown_critical_extension_on_leaf_is_rejected() {
        let weird_oid = Oid::new_unwrap("1.2.3.4.5");
        let leaf = test_fixture(
            CanonicalName::for_test("leaf"),
            CanonicalName::for_test("ca"),
            0,
            u64::MAX,
            vec![crate::x509::CertExtension {
                oid: weird_oid,
                critical: true,
                value_der: Vec::new(),
            }],
            [2u8; 32],
        );
        let store = FixtureStore {
            certs: vec![],
            anchors: vec![],
            crls: vec![],
        };
        let config = CoreConfig::default();

        let err = build_chain(&leaf, &store, &NullAudit, &config, 1_000).unwrap_err();
        assert!(matches!(err, PkdError::UnknownCriticalExt(oid) if oid == weird_oid));
    }

    #[test]
    fn chain_too_deep_is_rejected_before_any_issuer_lookup() {
        let leaf = test_fixture(CanonicalName::for_test("leaf"), CanonicalName::for_test("ca"), 0, u64::MAX, vec![], [3u8; 32]);
        let store = FixtureStore {
            certs: vec![],
            anchors: vec![],
            crls: vec![],
        };
        let mut config = CoreConfig::default();
        config.max_chain_depth = 0;

        let err = build_chain(&leaf, &store, &NullAudit, &config, 1_000).unwrap_err();
        assert!(matches!(err, PkdError::ChainTooDeep));
    }

    #[test]
    fn expired_dsc_is_rejected_even_though_the_issuer_is_still_valid() {
        let leaf = test_fixture(CanonicalName::for_test("leaf"), CanonicalName::for_test("ca"), 0, 500, vec![], [4u8; 32]);
        let ca = test_fixture(CanonicalName::for_test("ca"), CanonicalName::for_test("ca"), 0, u64::MAX, vec![], [5u8; 32]);
        let store = FixtureStore {
            certs: vec![ca],
            anchors: vec![],
            crls: vec![],
        };
        let config = CoreConfig::default();

        // evaluation_time is well past the leaf's not_after, but inside the
        // issuer's validity window: only the leaf's own expiry should trip.
        let err = build_chain(&leaf, &store, &NullAudit, &config, 1_000).unwrap_err();
        assert!(matches!(err, PkdError::CertExpired));
    }

    #[test]
    fn anchor_with_unknown_critical_extension_is_rejected() {
        let weird_oid = Oid::new_unwrap("1.2.3.4.5");
        let anchor = test_fixture(
            CanonicalName::for_test("anchor"),
            CanonicalName::for_test("anchor"),
            0,
            u64::MAX,
            vec![crate::x509::CertExtension {
                oid: weird_oid,
                critical: true,
                value_der: Vec::new(),
            }],
            [6u8; 32],
        );
        let store = FixtureStore {
            certs: vec![],
            anchors: vec![[6u8; 32]],
            crls: vec![],
        };
        let config = CoreConfig::default();

        let err = build_chain(&anchor, &store, &NullAudit, &config, 1_000).unwrap_err();
        assert!(matches!(err, PkdError::UnknownCriticalExt(oid) if oid == weird_oid));
    }

    #[test]
    fn select_issuer_prefers_validity_window_overlap_over_newest_not_before() {
        let overlapping = test_fixture(CanonicalName::for_test("ca"), CanonicalName::for_test("ca"), 0, 100, vec![], [10u8; 32]);
        let newer_but_not_yet_valid = test_fixture(
            CanonicalName::for_test("ca"),
            CanonicalName::for_test("ca"),
            200,
            1_000,
            vec![],
            [11u8; 32],
        );
        let child = test_fixture(CanonicalName::for_test("leaf"), CanonicalName::for_test("ca"), 0, u64::MAX, vec![], [12u8; 32]);
        let store = FixtureStore {
            certs: vec![overlapping.clone(), newer_but_not_yet_valid],
            anchors: vec![],
            crls: vec![],
        };

        let chosen = select_issuer(&child, &store, 50).unwrap();
        assert_eq!(chosen.fingerprint_sha256, overlapping.fingerprint_sha256);
    }

    #[test]
    fn select_issuer_falls_back_to_newest_not_before_when_none_overlap() {
        let older = test_fixture(CanonicalName::for_test("ca"), CanonicalName::for_test("ca"), 0, 10, vec![], [13u8; 32]);
        let newer = test_fixture(CanonicalName::for_test("ca"), CanonicalName::for_test("ca"), 20, 30, vec![], [14u8; 32]);
        let child = test_fixture(CanonicalName::for_test("leaf"), CanonicalName::for_test("ca"), 0, u64::MAX, vec![], [15u8; 32]);
        let store = FixtureStore {
            certs: vec![older, newer.clone()],
            anchors: vec![],
            crls: vec![],
        };

        // evaluation_time of 1_000 falls outside both windows.
        let chosen = select_issuer(&child, &store, 1_000).unwrap();
        assert_eq!(chosen.fingerprint_sha256, newer.fingerprint_sha256);
    }

    #[test]
    fn check_revocation_rejects_a_crl_whose_issuer_key_cannot_be_authenticated() {
        let child = test_fixture(CanonicalName::for_test("leaf"), CanonicalName::for_test("ca"), 0, u64::MAX, vec![], [16u8; 32]);
        let parent = test_fixture(CanonicalName::for_test("ca"), CanonicalName::for_test("ca"), 0, u64::MAX, vec![], [17u8; 32]);
        let crl = Crl {
            issuer: CanonicalName::for_test("ca"),
            this_update: 0,
            next_update: Some(u64::MAX),
            revoked: std::collections::HashMap::new(),
            signature_algorithm: crate::asn1::SignatureAlgorithmIdentifier::RsaPkcs1V15(
                crate::asn1::DigestAlgorithmIdentifier::Sha256(crate::asn1::DigestAlgorithmParameters::Null),
            ),
            signature: vec![0u8; 32],
            tbs_der: vec![0u8; 4],
        };
        let store = FixtureStore {
            certs: vec![],
            anchors: vec![],
            crls: vec![crl],
        };
        let config = CoreConfig::default();

        // The test fixture's SPKI never decodes to a usable key, which
        // stands in here for "the CRL's signature cannot be authenticated" —
        // either way, an unverifiable CRL must never be trusted.
        let err = check_revocation(&child, &parent, &store, &NullAudit, &config, 1_000).unwrap_err();
        assert!(matches!(err, PkdError::CertMalformed(_) | PkdError::SigInvalid));
    }
}
