//! SOD parser/verifier (spec.md §4.7) — crate-root orchestration layered on
//! the pure ASN.1 reader in [`crate::asn1::Sod`].

use cms::cert::CertificateChoices;
use der::Encode;

use crate::{
    asn1::{
        emrtd::LdsSecurityObject, public_key_info::SubjectPublicKeyInfo, DigestAlgorithmIdentifier,
        SignatureAlgorithmIdentifier, Sod as RawSod,
    },
    cms_support,
    crypto::signature::verify_signature,
    error::PkdError,
    x509::Certificate,
};

/// A fully parsed and signature-checked SOD (spec.md §4.7 step 5).
pub struct ParsedSod {
    pub dsc: Certificate,
    pub lds: LdsSecurityObject,
    pub hash_alg: DigestAlgorithmIdentifier,
    pub signing_time: Option<x509_cert::time::Time>,
}

impl ParsedSod {
    /// Decode and verify `der` per §4.7 steps 1–5.
    pub fn parse_and_verify(der: &[u8]) -> Result<Self, PkdError> {
        let sod = RawSod::decode(der)?;
        let signed_data = sod.signed_data();

        let signer_infos = sod.signer_infos();
        if signer_infos.len() != 1 {
            return Err(PkdError::SodMultipleSigners);
        }
        let signer_info = &signer_infos[0];

        let embedded: Vec<cms::cert::x509::Certificate> = signed_data
            .certificates
            .iter()
            .flat_map(|set| set.0.iter())
            .filter_map(|choice| match choice {
                CertificateChoices::Certificate(cert) => Some(cert.clone()),
                _ => None,
            })
            .collect();

        let dsc_x509 = cms_support::find_signer_certificate(&signer_info.sid, &embedded)
            .ok_or(PkdError::SignerCertMissing)?;
        let dsc_der = dsc_x509
            .to_der()
            .map_err(|e| PkdError::CertMalformed(format!("failed to re-encode DSC: {e}")))?;
        let dsc = Certificate::parse(&dsc_der)?;

        let econ = sod.encapsulated_content();
        let econtent = econ
            .econtent
            .as_ref()
            .ok_or_else(|| PkdError::CmsMalformed("SOD eContent missing".into()))?
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
        let dsc_pubkey = SubjectPublicKeyInfo::try_from(&dsc.spki)
            .map_err(|_| PkdError::CertMalformed("DSC SPKI malformed".into()))?;
        let signature = signer_info
            .signature
            .as_bytes()
            .ok_or_else(|| PkdError::CmsMalformed("signature is not octet-aligned".into()))?;
        verify_signature(&dsc_pubkey, &sig_alg, &signing_input, signature)
            .map_err(|_| PkdError::SodSignatureInvalid)?;

        let lds = sod.lds_security_object()?;
        let hash_alg = lds.hash_algorithm.clone();

        Ok(Self {
            dsc,
            lds,
            hash_alg,
            signing_time: cms_support::signing_time(signer_info),
        })
    }
}
