//! Generic RFC 5652 CMS `SignedData` reading support shared by the Master
//! List (§4.6) and SOD (§4.7) verifiers.
//!
//! This module knows nothing about Doc 9303 content types — it only
//! recovers the exact bytes a `SignerInfo` signed and checks the two
//! mandatory signed attributes RFC 5652 §11 requires whenever `signedAttrs`
//! is present.

use {
    crate::{error::PkdError, x509::CanonicalName},
    cms::{
        cert::{x509::Certificate as CmsCertificate, IssuerAndSerialNumber},
        signed_data::{SignerIdentifier, SignerInfo},
    },
    der::{asn1::ObjectIdentifier as Oid, Decode, Encode},
    x509_cert::attr::{Attribute, Attributes},
};

pub const ID_CONTENT_TYPE: Oid = Oid::new_unwrap("1.2.840.113549.1.9.3");
pub const ID_MESSAGE_DIGEST: Oid = Oid::new_unwrap("1.2.840.113549.1.9.4");
pub const ID_SIGNING_TIME: Oid = Oid::new_unwrap("1.2.840.113549.1.9.5");
const ID_SUBJECT_KEY_IDENTIFIER: Oid = Oid::new_unwrap("2.5.29.14");

/// The exact bytes a `SignerInfo`'s signature was computed over: the
/// re-encoded `signedAttrs` SET when present, the raw `eContent` octets
/// otherwise (RFC 5652 §5.4). Re-encoding `Attributes` directly — rather
/// than copying the bytes as they sit inside `SignerInfo`, where they carry
/// the `[0]` IMPLICIT tag — recovers the universal `SET` tag the signature
/// was actually computed over.
pub fn signing_input(signer_info: &SignerInfo, econtent: &[u8]) -> Result<Vec<u8>, PkdError> {
    match &signer_info.signed_attrs {
        None => Ok(econtent.to_vec()),
        Some(attrs) => attrs
            .to_der()
            .map_err(|e| PkdError::CmsMalformed(format!("failed to re-encode signedAttrs: {e}"))),
    }
}

/// Verify the mandatory `messageDigest` and `contentType` signed attributes
/// (RFC 5652 §11.1, §11.2) against the actual encapsulated content.
pub fn check_signed_attrs(
    signer_info: &SignerInfo,
    econtent_type: Oid,
    econtent_hash: &[u8],
) -> Result<(), PkdError> {
    let Some(attrs) = &signer_info.signed_attrs else {
        return Ok(());
    };

    let digest_attr = single_attribute(attrs, ID_MESSAGE_DIGEST)?
        .ok_or_else(|| PkdError::CmsMalformed("signedAttrs missing messageDigest".into()))?;
    let digest_value = single_value(digest_attr)?;
    if digest_value.value() != econtent_hash {
        return Err(PkdError::CmsMalformed(
            "messageDigest attribute does not match the eContent hash".into(),
        ));
    }

    let content_type_attr = single_attribute(attrs, ID_CONTENT_TYPE)?
        .ok_or_else(|| PkdError::CmsMalformed("signedAttrs missing contentType".into()))?;
    let content_type_value = single_value(content_type_attr)?
        .decode_as::<Oid>()
        .map_err(|e| PkdError::CmsMalformed(format!("contentType attribute malformed: {e}")))?;
    if content_type_value != econtent_type {
        return Err(PkdError::CmsMalformed(
            "contentType attribute does not match eContentType".into(),
        ));
    }

    Ok(())
}

fn single_attribute<'a>(attrs: &'a Attributes, oid: Oid) -> Result<Option<&'a Attribute>, PkdError> {
    let mut matching = attrs.iter().filter(|attr| attr.oid == oid);
    let first = matching.next();
    if matching.next().is_some() {
        return Err(PkdError::CmsMalformed(format!("duplicate {oid} attribute")));
    }
    Ok(first)
}

fn single_value(attr: &Attribute) -> Result<&der::Any, PkdError> {
    if attr.values.len() != 1 {
        return Err(PkdError::CmsMalformed(format!(
            "attribute {} must carry exactly one value",
            attr.oid
        )));
    }
    attr.values
        .get(0)
        .ok_or_else(|| PkdError::CmsMalformed("attribute has no values".into()))
}

/// The signing time carried in `signedAttrs`, if present — informational
/// only, §4.3 does not treat it as a trust input.
pub fn signing_time(signer_info: &SignerInfo) -> Option<x509_cert::time::Time> {
    let attrs = signer_info.signed_attrs.as_ref()?;
    let attr = attrs.iter().find(|attr| attr.oid == ID_SIGNING_TIME)?;
    attr.values.get(0)?.decode_as::<x509_cert::time::Time>().ok()
}

/// Does `cert`'s issuer+serial or subjectKeyIdentifier match `sid`?
pub fn signer_identifier_matches(sid: &SignerIdentifier, cert: &CmsCertificate) -> bool {
    match sid {
        SignerIdentifier::IssuerAndSerialNumber(candidate) => {
            CanonicalName::from_name(&candidate.issuer) == CanonicalName::from_name(&cert.tbs_certificate.issuer)
                && candidate.serial_number == cert.tbs_certificate.serial_number
        }
        SignerIdentifier::SubjectKeyIdentifier(ski) => cert
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == ID_SUBJECT_KEY_IDENTIFIER)
            .is_some_and(|ext| ext.extn_value.as_bytes() == ski.0.as_bytes()),
    }
}

/// Resolve the certificate identified by a `SignerInfo`'s `sid` out of a
/// candidate set (the `certificates` bag in `SignedData`, or a trust store).
pub fn find_signer_certificate<'c>(
    sid: &SignerIdentifier,
    candidates: impl IntoIterator<Item = &'c CmsCertificate>,
) -> Option<&'c CmsCertificate> {
    candidates
        .into_iter()
        .find(|cert| signer_identifier_matches(sid, cert))
}

/// Build the `IssuerAndSerialNumber` form of `cert`'s own identity, used
/// when no subjectKeyIdentifier extension is present to address it by.
pub fn issuer_and_serial(cert: &CmsCertificate) -> IssuerAndSerialNumber {
    IssuerAndSerialNumber {
        issuer: cert.tbs_certificate.issuer.clone(),
        serial_number: cert.tbs_certificate.serial_number.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_oids_match_rfc5652_assignments() {
        assert_eq!(ID_CONTENT_TYPE.to_string(), "1.2.840.113549.1.9.3");
        assert_eq!(ID_MESSAGE_DIGEST.to_string(), "1.2.840.113549.1.9.4");
        assert_eq!(ID_SIGNING_TIME.to_string(), "1.2.840.113549.1.9.5");
    }
}
