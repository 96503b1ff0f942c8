//! Data Group hashing (§4.8).
//!
//! A Data Group is hashed as the exact bytes of its on-chip envelope — the
//! `[APPLICATION n]` tag included — never the unwrapped payload. The LDS
//! Security Object records one hash per DG number; comparison against the
//! actual hash of a presented DG file must be constant-time, since a DG
//! file is effectively a (mildly) secret credential.

use {crate::error::PkdError, subtle::ConstantTimeEq};

/// Hash `dg_bytes` (the full on-chip envelope) with `hash_alg` and compare,
/// constant-time, against the `expected` hash recorded in the SOD.
pub fn verify_dg_hash(
    dg_number: u8,
    dg_bytes: &[u8],
    expected: &[u8],
    hash_alg: &crate::asn1::DigestAlgorithmIdentifier,
) -> Result<(), PkdError> {
    let actual = hash_alg.hash_bytes(dg_bytes);
    if actual.len() != expected.len() || actual.ct_eq(expected).unwrap_u8() != 1 {
        return Err(PkdError::DgHashMismatch { dg: dg_number });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asn1::{DigestAlgorithmIdentifier, DigestAlgorithmParameters};

    #[test]
    fn detects_mismatch() {
        let alg = DigestAlgorithmIdentifier::Sha256(DigestAlgorithmParameters::Absent);
        let expected = alg.hash_bytes(b"dg1 envelope");
        assert!(verify_dg_hash(1, b"dg1 envelope", &expected, &alg).is_ok());
        assert!(verify_dg_hash(1, b"tampered envelope", &expected, &alg).is_err());
    }
}
