//! X.509 v2 CRL reader (spec.md §4.9).

use std::{collections::HashMap, time::Duration};

use der::{asn1::ObjectIdentifier as Oid, Decode, Encode};
use x509_cert::{
    crl::{CertificateList, RevokedCert},
    ext::Extensions,
    name::Name,
    time::Time,
};

use crate::{
    asn1::SignatureAlgorithmIdentifier,
    error::{PkdError, RevocationReason},
    x509::CanonicalName,
};

const OID_CRL_REASON: Oid = Oid::new_unwrap("2.5.29.21");

/// One revoked entry: when it was revoked and, if stated, why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevokedEntry {
    pub revocation_date: u64,
    pub reason: Option<RevocationReason>,
}

/// A parsed X.509 v2 CRL (spec.md §3).
#[derive(Clone, Debug)]
pub struct Crl {
    pub issuer: CanonicalName,
    pub this_update: u64,
    pub next_update: Option<u64>,
    pub revoked: HashMap<Vec<u8>, RevokedEntry>,
    pub signature_algorithm: SignatureAlgorithmIdentifier,
    pub signature: Vec<u8>,
    pub tbs_der: Vec<u8>,
}

impl Crl {
    /// Parse from DER, or PEM auto-detected (`-----BEGIN X509 CRL-----`).
    pub fn parse(bytes: &[u8]) -> Result<Self, PkdError> {
        let der = if bytes.first() == Some(&0x30) {
            bytes.to_vec()
        } else {
            decode_pem(bytes)?
        };
        let crl = CertificateList::from_der(&der)
            .map_err(|e| PkdError::CertMalformed(format!("CRL decode failed: {e}")))?;
        Self::from_x509(crl)
    }

    fn from_x509(crl: CertificateList) -> Result<Self, PkdError> {
        let tbs = &crl.tbs_cert_list;

        if crl.signature_algorithm.oid != tbs.signature.oid {
            return Err(PkdError::CertMalformed(
                "outer signatureAlgorithm does not match tbsCertList.signature".into(),
            ));
        }

        let this_update = time_to_unix(&tbs.this_update);
        let next_update = tbs.next_update.as_ref().map(time_to_unix);

        let mut revoked = HashMap::new();
        for entry in tbs.revoked_certificates.iter().flatten() {
            let serial = entry.serial_number.as_bytes().to_vec();
            let reason = revocation_reason(entry);
            revoked.insert(
                serial,
                RevokedEntry {
                    revocation_date: time_to_unix(&entry.revocation_date),
                    reason,
                },
            );
        }

        let tbs_der = tbs
            .to_der()
            .map_err(|e| PkdError::CertMalformed(format!("failed to re-encode tbsCertList: {e}")))?;

        let signature = crl
            .signature
            .as_bytes()
            .ok_or_else(|| PkdError::CertMalformed("CRL signature is not octet-aligned".into()))?
            .to_vec();

        let signature_algorithm = SignatureAlgorithmIdentifier::from_der(&crl.signature_algorithm.to_der()?)
            .map_err(|e| PkdError::CertMalformed(format!("malformed CRL signatureAlgorithm: {e}")))?;

        Ok(Self {
            issuer: CanonicalName::from_name(&tbs.issuer),
            this_update,
            next_update,
            revoked,
            signature_algorithm,
            signature,
            tbs_der,
        })
    }

    /// Is `serial` listed, and if so with what date and reason?
    pub fn is_revoked(&self, serial: &[u8]) -> Option<&RevokedEntry> {
        self.revoked.get(serial)
    }

    /// `this_update ≤ now ≤ next_update`, widened by `skew` on both ends.
    /// A CRL with no `next_update` is treated as never stale.
    pub fn is_current(&self, now: u64, skew: Duration) -> bool {
        let skew = skew.as_secs();
        if now + skew < self.this_update {
            return false;
        }
        match self.next_update {
            Some(next) => now <= next + skew,
            None => true,
        }
    }

    /// Is `next_update` in the past (ignoring skew)? A CRL with no
    /// `next_update` never goes stale.
    pub fn is_stale(&self, now: u64) -> bool {
        self.next_update.is_some_and(|next| now > next)
    }
}

fn revocation_reason(entry: &RevokedCert) -> Option<RevocationReason> {
    let extensions: &Extensions = entry.crl_entry_extensions.as_ref()?;
    let ext = extensions.iter().find(|ext| ext.extn_id == OID_CRL_REASON)?;
    let any = der::Any::from_der(ext.extn_value.as_bytes()).ok()?;
    if any.tag() != der::Tag::Enumerated {
        return None;
    }
    let code = any.value().iter().fold(0i32, |acc, b| (acc << 8) | i32::from(*b));
    RevocationReason::from_crl_reason_code(code)
}

fn time_to_unix(time: &Time) -> u64 {
    match time {
        Time::UtcTime(t) => t.to_unix_duration().as_secs(),
        Time::GeneralTime(t) => t.to_unix_duration().as_secs(),
    }
}

fn decode_pem(bytes: &[u8]) -> Result<Vec<u8>, PkdError> {
    let (_, doc) = der::pem::decode_vec(bytes)
        .map_err(|e| PkdError::CertMalformed(format!("invalid PEM (X509 CRL): {e}")))?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_window_respects_skew() {
        let crl = Crl {
            issuer: CanonicalName::empty(),
            this_update: 1_000,
            next_update: Some(2_000),
            revoked: HashMap::new(),
            signature_algorithm: SignatureAlgorithmIdentifier::RsaPkcs1V15(
                crate::asn1::DigestAlgorithmIdentifier::Sha256(crate::asn1::DigestAlgorithmParameters::Null),
            ),
            signature: Vec::new(),
            tbs_der: Vec::new(),
        };
        assert!(!crl.is_current(900, Duration::from_secs(0)));
        assert!(crl.is_current(900, Duration::from_secs(200)));
        assert!(crl.is_current(2_000, Duration::from_secs(0)));
        assert!(!crl.is_current(2_100, Duration::from_secs(0)));
        assert!(crl.is_stale(2_100));
    }

    #[test]
    fn revoked_serial_is_found_and_others_are_not() {
        let mut revoked = HashMap::new();
        revoked.insert(
            vec![0x01, 0x02],
            RevokedEntry {
                revocation_date: 1_500,
                reason: Some(RevocationReason::KeyCompromise),
            },
        );
        let crl = Crl {
            issuer: CanonicalName::empty(),
            this_update: 1_000,
            next_update: Some(2_000),
            revoked,
            signature_algorithm: SignatureAlgorithmIdentifier::RsaPkcs1V15(
                crate::asn1::DigestAlgorithmIdentifier::Sha256(crate::asn1::DigestAlgorithmParameters::Null),
            ),
            signature: Vec::new(),
            tbs_der: Vec::new(),
        };

        let entry = crl.is_revoked(&[0x01, 0x02]).expect("serial is listed");
        assert_eq!(entry.reason, Some(RevocationReason::KeyCompromise));
        assert!(crl.is_revoked(&[0x03]).is_none());
    }
}
