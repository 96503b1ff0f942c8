//! A typed, value-owned view of an X.509 v3 certificate (spec.md §3).

use {
    super::name::CanonicalName,
    crate::{asn1::SignatureAlgorithmIdentifier, error::PkdError},
    der::{asn1::ObjectIdentifier as Oid, Decode, Encode},
    sha2::{Digest, Sha256},
    spki::SubjectPublicKeyInfoOwned,
    x509_cert::{ext::Extensions, time::Time, Certificate as X509Certificate},
};

/// One X.509v3 extension, retained verbatim for later inspection
/// (spec.md §4.2: unknown critical extensions surface at chain validation).
#[derive(Clone, Debug)]
pub struct CertExtension {
    pub oid: Oid,
    pub critical: bool,
    pub value_der: Vec<u8>,
}

/// A parsed, never-mutated X.509 certificate.
///
/// Created once from bytes by [`Certificate::parse`] and held by the
/// surrounding `CertificateStore`; the core never constructs or signs one.
#[derive(Clone, Debug)]
pub struct Certificate {
    pub tbs_der: Vec<u8>,
    pub full_der: Vec<u8>,
    pub serial: Vec<u8>,
    pub issuer: CanonicalName,
    pub subject: CanonicalName,
    pub not_before: u64,
    pub not_after: u64,
    pub spki: SubjectPublicKeyInfoOwned,
    pub signature_algorithm: SignatureAlgorithmIdentifier,
    pub signature_value: Vec<u8>,
    pub extensions: Vec<CertExtension>,
    pub fingerprint_sha256: [u8; 32],
}

impl Certificate {
    /// Parse from DER, or PEM auto-detected by the leading byte (`0x30` for
    /// DER, ASCII `-----BEGIN` for PEM) — spec.md §6.
    pub fn parse(bytes: &[u8]) -> Result<Self, PkdError> {
        let der = if bytes.first() == Some(&0x30) {
            bytes.to_vec()
        } else {
            decode_pem(bytes, "CERTIFICATE")?
        };
        let cert = X509Certificate::from_der(&der)
            .map_err(|e| PkdError::CertMalformed(format!("X.509 decode failed: {e}")))?;
        Self::from_x509(cert, der)
    }

    fn from_x509(cert: X509Certificate, full_der: Vec<u8>) -> Result<Self, PkdError> {
        let tbs = &cert.tbs_certificate;

        // RFC 5280 §4.1.1.2: the outer signatureAlgorithm must equal the
        // TBS one.
        if cert.signature_algorithm.oid != tbs.signature.oid {
            return Err(PkdError::CertMalformed(
                "outer signatureAlgorithm does not match tbsCertificate.signature".into(),
            ));
        }

        let not_before = time_to_unix(&tbs.validity.not_before);
        let not_after = time_to_unix(&tbs.validity.not_after);
        if not_before > not_after {
            return Err(PkdError::CertMalformed("notBefore is after notAfter".into()));
        }

        let tbs_der = tbs
            .to_der()
            .map_err(|e| PkdError::CertMalformed(format!("failed to re-encode TBS: {e}")))?;

        let extensions = tbs
            .extensions
            .as_ref()
            .map(extract_extensions)
            .unwrap_or_default();

        let signature_value = cert
            .signature
            .as_bytes()
            .ok_or_else(|| PkdError::CertMalformed("signature is not octet-aligned".into()))?
            .to_vec();

        let signature_algorithm = SignatureAlgorithmIdentifier::from_der(&cert.signature_algorithm.to_der()?)
            .map_err(|e| PkdError::CertMalformed(format!("malformed signatureAlgorithm: {e}")))?;

        let fingerprint_sha256 = Sha256::digest(&full_der).into();

        Ok(Self {
            tbs_der,
            serial: tbs.serial_number.as_bytes().to_vec(),
            issuer: CanonicalName::from_name(&tbs.issuer),
            subject: CanonicalName::from_name(&tbs.subject),
            not_before,
            not_after,
            spki: tbs.subject_public_key_info.clone(),
            signature_algorithm,
            signature_value,
            extensions,
            fingerprint_sha256,
            full_der,
        })
    }

    pub fn extension(&self, oid: Oid) -> Option<&CertExtension> {
        self.extensions.iter().find(|ext| ext.oid == oid)
    }
}

fn extract_extensions(extensions: &Extensions) -> Vec<CertExtension> {
    extensions
        .iter()
        .map(|ext| CertExtension {
            oid: ext.extn_id,
            critical: ext.critical,
            value_der: ext.extn_value.as_bytes().to_vec(),
        })
        .collect()
}

fn time_to_unix(time: &Time) -> u64 {
    match time {
        Time::UtcTime(t) => t.to_unix_duration().as_secs(),
        Time::GeneralTime(t) => t.to_unix_duration().as_secs(),
    }
}

fn decode_pem(bytes: &[u8], label: &str) -> Result<Vec<u8>, PkdError> {
    let (_, doc) = der::pem::decode_vec(bytes)
        .map_err(|e| PkdError::CertMalformed(format!("invalid PEM ({label}): {e}")))?;
    Ok(doc)
}

#[cfg(test)]
/// A minimal, never-decoded `SubjectPublicKeyInfo`: rsaEncryption with a
/// single zero content byte. Good enough for chain-builder tests that never
/// reach actual signature verification.
const TEST_SPKI_DER: &[u8] = &[
    0x30, 0x13, 0x30, 0x0D, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01, 0x05, 0x00, 0x03, 0x02,
    0x00, 0x00,
];

/// Build a `Certificate` without going through DER decoding, for unit tests
/// that only exercise the chain builder's pure bookkeeping (not signature
/// verification).
#[cfg(test)]
pub(crate) fn test_fixture(
    subject: CanonicalName,
    issuer: CanonicalName,
    not_before: u64,
    not_after: u64,
    extensions: Vec<CertExtension>,
    fingerprint_sha256: [u8; 32],
) -> Certificate {
    let spki = SubjectPublicKeyInfoOwned::from_der(TEST_SPKI_DER).expect("valid fixture SPKI");
    Certificate {
        tbs_der: Vec::new(),
        full_der: Vec::new(),
        serial: vec![1],
        issuer,
        subject,
        not_before,
        not_after,
        spki,
        signature_algorithm: crate::asn1::SignatureAlgorithmIdentifier::RsaPkcs1V15(
            crate::asn1::DigestAlgorithmIdentifier::Sha256(crate::asn1::DigestAlgorithmParameters::Null),
        ),
        signature_value: vec![0u8; 32],
        extensions,
        fingerprint_sha256,
    }
}
