//! Master List verifier (spec.md §4.6) — crate-root orchestration layered on
//! the pure ASN.1 reader in [`crate::asn1::MasterList`].

use cms::cert::CertificateChoices;
use der::Encode;

use crate::{
    asn1::{public_key_info::SubjectPublicKeyInfo, DigestAlgorithmIdentifier, MasterList as RawMasterList, SignatureAlgorithmIdentifier},
    cms_support,
    crypto::signature::verify_signature,
    error::PkdError,
    trust::{self, AuditSink, CertificateStore},
    x509::Certificate,
};

/// A CSCA admitted from a Master List, not yet promoted to a trust anchor.
#[derive(Clone, Debug)]
pub struct CandidateCsca {
    pub certificate: Certificate,
    /// Whether admission policy already grants it trust (self-signed, or
    /// chains to an existing trusted CSCA via a link certificate).
    pub admitted: bool,
}

pub struct VerifiedMasterList {
    pub mlsc: Certificate,
    pub candidates: Vec<CandidateCsca>,
}

impl VerifiedMasterList {
    /// Parse, verify the MLSC signature, and apply the admission policy
    /// (spec.md §4.6 steps 1–4). `store`/`audit`/`config` are used to chain
    /// the MLSC to an already-trusted CSCA — the MLSC is never itself a
    /// CSCA.
    pub fn parse_and_verify(
        der: &[u8],
        store: &impl CertificateStore,
        audit: &impl AuditSink,
        config: &crate::config::CoreConfig,
        evaluation_time: u64,
    ) -> Result<Self, PkdError> {
        let ml = RawMasterList::decode(der)?;
        let signed_data = ml.signed_data();

        if signed_data.signer_infos.0.len() != 1 {
            return Err(PkdError::CmsMalformed(
                "Master List must carry exactly one SignerInfo".into(),
            ));
        }
        let signer_info = signed_data
            .signer_infos
            .0
            .as_slice()
            .first()
            .expect("length checked above");

        let embedded: Vec<cms::cert::x509::Certificate> = signed_data
            .certificates
            .iter()
            .flat_map(|set| set.0.iter())
            .filter_map(|choice| match choice {
                CertificateChoices::Certificate(cert) => Some(cert.clone()),
                _ => None,
            })
            .collect();

        let mlsc_x509 = cms_support::find_signer_certificate(&signer_info.sid, &embedded)
            .ok_or(PkdError::SignerCertMissing)?;
        let mlsc_der = mlsc_x509
            .to_der()
            .map_err(|e| PkdError::CertMalformed(format!("failed to re-encode MLSC: {e}")))?;
        let mlsc = Certificate::parse(&mlsc_der)?;

        // The MLSC must chain to an already-trusted CSCA; it is never a
        // trust anchor itself.
        trust::build_chain(&mlsc, store, audit, config, evaluation_time)?;

        let econ = ml.encapsulated_content();
        let econtent = econ
            .econtent
            .as_ref()
            .ok_or_else(|| PkdError::CmsMalformed("Master List eContent missing".into()))?
            .decode_as::<der::asn1::OctetString>()?
            .as_bytes()
            .to_vec();

        let digest_alg = DigestAlgorithmIdentifier::from_der(&signer_info.digest_alg.to_der()?)
            .map_err(|_| PkdError::UnsupportedAlgorithm(signer_info.digest_alg.oid))?;
        let econtent_hash = digest_alg.hash_bytes(&econtent);
        cms_support::check_signed_attrs(signer_info, econ.econtent_type, &econtent_hash)?;

        let signing_input = cms_support::signing_input(signer_info, &econtent)?;
        let sig_alg = SignatureAlgorithmIdentifier::try_from(&signer_info.signature_algorithm)
            .map_err(|_| PkdError::UnsupportedAlgorithm(signer_info.signature_algorithm.oid))?;
        let mlsc_pubkey = SubjectPublicKeyInfo::try_from(&mlsc.spki)
            .map_err(|_| PkdError::CertMalformed("MLSC SPKI malformed".into()))?;
        let signature = signer_info
            .signature
            .as_bytes()
            .ok_or_else(|| PkdError::CmsMalformed("signature is not octet-aligned".into()))?;
        verify_signature(&mlsc_pubkey, &sig_alg, &signing_input, signature).map_err(|_| PkdError::SigInvalid)?;

        // Step 3 failed above would already have returned; from here on,
        // per-certificate failures in the inner bag are tolerated.
        let csca_ml = ml.csca_ml()?;
        let candidates = csca_ml
            .cert_list
            .iter()
            .filter_map(|raw| {
                let der = raw.to_der().ok()?;
                let cert = Certificate::parse(&der).ok()?;
                let admitted = is_self_signed(&cert) || chains_to_trusted(&cert, store, audit, config, evaluation_time);
                Some(CandidateCsca {
                    certificate: cert,
                    admitted,
                })
            })
            .collect();

        Ok(Self { mlsc, candidates })
    }
}

fn is_self_signed(cert: &Certificate) -> bool {
    if cert.subject != cert.issuer {
        return false;
    }
    let pubkey = match SubjectPublicKeyInfo::try_from(&cert.spki) {
        Ok(pk) => pk,
        Err(_) => return false,
    };
    verify_signature(&pubkey, &cert.signature_algorithm, &cert.tbs_der, &cert.signature_value).is_ok()
}

fn chains_to_trusted(
    cert: &Certificate,
    store: &impl CertificateStore,
    audit: &impl AuditSink,
    config: &crate::config::CoreConfig,
    evaluation_time: u64,
) -> bool {
    trust::build_chain(cert, store, audit, config, evaluation_time).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x509::{certificate::test_fixture, CanonicalName};

    #[test]
    fn differing_subject_and_issuer_is_never_self_signed() {
        let cert = test_fixture(CanonicalName::for_test("subject"), CanonicalName::for_test("issuer"), 0, u64::MAX, vec![], [0u8; 32]);
        assert!(!is_self_signed(&cert));
    }

    #[test]
    fn matching_names_with_a_bogus_signature_are_not_self_signed() {
        let cert = test_fixture(CanonicalName::for_test("same"), CanonicalName::for_test("same"), 0, u64::MAX, vec![], [0u8; 32]);
        assert!(!is_self_signed(&cert));
    }
}
