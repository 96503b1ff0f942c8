//! Doc 9303 compliance checklist (spec.md §4.2).
//!
//! Applied as warnings only — gating on these is a policy layer above the
//! core, not a hard parse failure.

use super::certificate::Certificate;

const OID_BASIC_CONSTRAINTS: der::asn1::ObjectIdentifier =
    der::asn1::ObjectIdentifier::new_unwrap("2.5.29.19");
const OID_KEY_USAGE: der::asn1::ObjectIdentifier =
    der::asn1::ObjectIdentifier::new_unwrap("2.5.29.15");
const OID_AUTHORITY_KEY_IDENTIFIER: der::asn1::ObjectIdentifier =
    der::asn1::ObjectIdentifier::new_unwrap("2.5.29.35");

/// A single compliance warning, identified by a stable short code.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct ComplianceWarning {
    pub code: &'static str,
    pub detail: String,
}

/// Run the Doc 9303 checklist against a certificate, classified as a CSCA
/// (self-signed root, `CA=true`) or a DSC (leaf, `CA=false`).
pub fn check(cert: &Certificate, is_csca: bool) -> Vec<ComplianceWarning> {
    let mut warnings = Vec::new();

    if cert.serial.len() > 20 {
        warnings.push(ComplianceWarning {
            code: "SERIAL_TOO_LONG",
            detail: format!("serial is {} octets, Doc 9303 caps at 20", cert.serial.len()),
        });
    }
    if cert.serial.first() == Some(&0x00) && cert.serial.len() > 1 && cert.serial[1] & 0x80 == 0 {
        warnings.push(ComplianceWarning {
            code: "SERIAL_NOT_MINIMAL",
            detail: "serial carries a redundant leading zero octet".into(),
        });
    }

    match cert.extension(OID_KEY_USAGE) {
        None => warnings.push(ComplianceWarning {
            code: "MISSING_KEY_USAGE",
            detail: "keyUsage extension absent".into(),
        }),
        Some(ext) if !ext.critical => warnings.push(ComplianceWarning {
            code: "KEY_USAGE_NOT_CRITICAL",
            detail: "keyUsage extension is present but not marked critical".into(),
        }),
        Some(_) => {}
    }

    match cert.extension(OID_BASIC_CONSTRAINTS) {
        None if is_csca => warnings.push(ComplianceWarning {
            code: "MISSING_BASIC_CONSTRAINTS",
            detail: "basicConstraints absent on a CSCA".into(),
        }),
        Some(ext) if is_csca && !ext.critical => warnings.push(ComplianceWarning {
            code: "BASIC_CONSTRAINTS_NOT_CRITICAL",
            detail: "basicConstraints present on a CSCA but not critical".into(),
        }),
        _ => {}
    }

    if cert.subject != cert.issuer && cert.extension(OID_AUTHORITY_KEY_IDENTIFIER).is_none() {
        warnings.push(ComplianceWarning {
            code: "MISSING_AKI",
            detail: "non-self-signed certificate has no authorityKeyIdentifier".into(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x509::{certificate::test_fixture, CanonicalName, CertExtension};

    #[test]
    fn clean_dsc_has_no_warnings() {
        let cert = test_fixture(
            CanonicalName::for_test("dsc"),
            CanonicalName::for_test("csca"),
            0,
            u64::MAX,
            vec![
                CertExtension {
                    oid: OID_KEY_USAGE,
                    critical: true,
                    value_der: Vec::new(),
                },
                CertExtension {
                    oid: OID_AUTHORITY_KEY_IDENTIFIER,
                    critical: false,
                    value_der: Vec::new(),
                },
            ],
            [0u8; 32],
        );
        assert!(check(&cert, false).is_empty());
    }

    #[test]
    fn missing_key_usage_is_flagged() {
        let cert = test_fixture(CanonicalName::for_test("dsc"), CanonicalName::for_test("csca"), 0, u64::MAX, vec![], [1u8; 32]);
        let warnings = check(&cert, false);
        assert!(warnings.iter().any(|w| w.code == "MISSING_KEY_USAGE"));
    }

    #[test]
    fn csca_missing_basic_constraints_is_flagged() {
        let cert = test_fixture(CanonicalName::for_test("csca"), CanonicalName::for_test("csca"), 0, u64::MAX, vec![], [2u8; 32]);
        let warnings = check(&cert, true);
        assert!(warnings.iter().any(|w| w.code == "MISSING_BASIC_CONSTRAINTS"));
    }

    #[test]
    fn oversized_serial_is_flagged() {
        let mut cert = test_fixture(CanonicalName::for_test("dsc"), CanonicalName::for_test("csca"), 0, u64::MAX, vec![], [3u8; 32]);
        cert.serial = vec![0xAB; 21];
        let warnings = check(&cert, false);
        assert!(warnings.iter().any(|w| w.code == "SERIAL_TOO_LONG"));
    }
}
