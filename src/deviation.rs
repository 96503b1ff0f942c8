//! Deviation List reader (spec.md §4.10).
//!
//! A Deviation List is a CMS `SignedData` like a Master List, signed by a
//! trusted CSCA, whose eContent enumerates known defects on specific
//! certificates — used to downgrade an otherwise-failing finding to a
//! tolerated one.

use cms::signed_data::SignedData;
use der::{asn1::ObjectIdentifier as Oid, asn1::OctetString, Decode, Encode};

use crate::{
    asn1::{
        deviation_list::IssuerAndSerial, public_key_info::SubjectPublicKeyInfo, ContentInfo,
        ContentType, DeviationListContent, SignatureAlgorithmIdentifier,
    },
    cms_support,
    crypto::signature::verify_signature,
    error::PkdError,
    x509::Certificate,
};

/// A Deviation List, implemented as a `ContentInfo` wrapping `SignedData`
/// (RFC 5652), same as a Master List.
pub type DeviationListCms = ContentInfo<SignedData>;

/// Which part of a document a defect describes, per the OID prefix under
/// `2.23.136.1.1.7`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeviationCategory {
    CertOrKey,
    Lds,
    Mrz,
    Chip,
    Other,
}

impl DeviationCategory {
    fn from_oid(oid: &Oid) -> Self {
        const PREFIX: &str = "2.23.136.1.1.7";
        let s = oid.to_string();
        let Some(rest) = s.strip_prefix(PREFIX).and_then(|r| r.strip_prefix('.')) else {
            return Self::Other;
        };
        match rest.split('.').next() {
            Some("1") => Self::CertOrKey,
            Some("2") => Self::Lds,
            Some("3") => Self::Mrz,
            Some("4") => Self::Chip,
            _ => Self::Other,
        }
    }
}

/// One known, tolerated defect against a specific certificate.
#[derive(Clone, Debug)]
pub struct DeviationHit {
    pub target_issuer: String,
    pub target_serial: Vec<u8>,
    pub defect_oid: Oid,
    pub category: DeviationCategory,
    pub description: Option<String>,
}

/// A parsed, signature-checked Deviation List.
pub struct DeviationList {
    pub hits: Vec<DeviationHit>,
}

impl DeviationList {
    /// Parse and verify the signature of a Deviation List against `signer`,
    /// a certificate already known to chain to a trusted CSCA.
    pub fn parse_and_verify(der: &[u8], signer: &Certificate) -> Result<Self, PkdError> {
        let content_info = DeviationListCms::from_der(der)
            .map_err(|e| PkdError::CmsMalformed(format!("Deviation List decode failed: {e}")))?;
        let signed_data = &content_info.0;

        if signed_data.signer_infos.0.len() != 1 {
            return Err(PkdError::CmsMalformed(
                "Deviation List must carry exactly one SignerInfo".into(),
            ));
        }
        let signer_info = signed_data
            .signer_infos
            .0
            .as_slice()
            .first()
            .expect("length checked above");

        let econ = &signed_data.encap_content_info;
        if econ.econtent_type != DeviationListContent::CONTENT_TYPE {
            return Err(PkdError::CmsMalformed(format!(
                "unexpected Deviation List eContentType {}",
                econ.econtent_type
            )));
        }
        let econtent = econ
            .econtent
            .as_ref()
            .ok_or_else(|| PkdError::CmsMalformed("Deviation List eContent missing".into()))?
            .decode_as::<OctetString>()?
            .as_bytes()
            .to_vec();

        let digest_alg = crate::asn1::DigestAlgorithmIdentifier::from_der(&signer_info.digest_alg.to_der()?)
            .map_err(|_| PkdError::UnsupportedAlgorithm(signer_info.digest_alg.oid))?;
        let econtent_hash = digest_alg.hash_bytes(&econtent);
        cms_support::check_signed_attrs(signer_info, econ.econtent_type, &econtent_hash)?;

        let signing_input = cms_support::signing_input(signer_info, &econtent)?;
        let sig_alg = SignatureAlgorithmIdentifier::try_from(&signer_info.signature_algorithm)
            .map_err(|_| PkdError::UnsupportedAlgorithm(signer_info.signature_algorithm.oid))?;
        let signer_pubkey = SubjectPublicKeyInfo::try_from(&signer.spki)
            .map_err(|_| PkdError::CertMalformed("signer SPKI malformed".into()))?;
        verify_signature(
            &signer_pubkey,
            &sig_alg,
            &signing_input,
            signer_info
                .signature
                .as_bytes()
                .ok_or_else(|| PkdError::CmsMalformed("signature is not octet-aligned".into()))?,
        )
        .map_err(|_| PkdError::SigInvalid)?;

        let content = DeviationListContent::from_der(&econtent)
            .map_err(|e| PkdError::CmsMalformed(format!("Deviation List content malformed: {e}")))?;

        let hits = content
            .entries
            .iter()
            .flat_map(|entry| {
                let target = &entry.target_cert;
                entry.defects.iter().map(move |defect| DeviationHit {
                    target_issuer: render_issuer(target),
                    target_serial: target.serial_number.as_bytes().to_vec(),
                    defect_oid: defect.oid,
                    category: DeviationCategory::from_oid(&defect.oid),
                    description: defect.description.as_ref().map(|d| d.as_str().to_owned()),
                })
            })
            .collect();

        Ok(Self { hits })
    }

    /// Hits whose target matches `issuer` (already canonicalised by the
    /// caller) and `serial`.
    pub fn for_target(&self, issuer: &str, serial: &[u8]) -> Vec<&DeviationHit> {
        self.hits
            .iter()
            .filter(|hit| hit.target_issuer == issuer && hit.target_serial == serial)
            .collect()
    }
}

fn render_issuer(target: &IssuerAndSerial) -> String {
    crate::x509::CanonicalName::from_name(&target.issuer)
        .as_str()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorises_by_oid_prefix() {
        assert_eq!(
            DeviationCategory::from_oid(&Oid::new_unwrap("2.23.136.1.1.7.1.1")),
            DeviationCategory::CertOrKey
        );
        assert_eq!(
            DeviationCategory::from_oid(&Oid::new_unwrap("2.23.136.1.1.7.3.2")),
            DeviationCategory::Mrz
        );
        assert_eq!(DeviationCategory::from_oid(&Oid::new_unwrap("1.2.3.4")), DeviationCategory::Other);
    }
}
