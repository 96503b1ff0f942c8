//! The frozen error taxonomy of spec.md §7.
//!
//! Parsers fail fast and propagate a [`PkdError`]; the orchestrator
//! ([`crate::pa`]) never propagates an error out of its public entry point —
//! every variant here becomes a `failure_reasons` entry on the
//! [`crate::verdict::Verdict`] instead.

use {
    const_oid::ObjectIdentifier as Oid,
    thiserror::Error,
};

/// Revocation reason, per RFC 5280 §5.3.1.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

impl RevocationReason {
    /// Decode the CRLReason enumerated value (RFC 5280 §5.3.1).
    pub const fn from_crl_reason_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Unspecified,
            1 => Self::KeyCompromise,
            2 => Self::CaCompromise,
            3 => Self::AffiliationChanged,
            4 => Self::Superseded,
            5 => Self::CessationOfOperation,
            6 => Self::CertificateHold,
            8 => Self::RemoveFromCrl,
            9 => Self::PrivilegeWithdrawn,
            10 => Self::AaCompromise,
            _ => return None,
        })
    }
}

/// The structural error taxonomy shared by every component C1–C12.
#[derive(Debug, Error)]
pub enum PkdError {
    #[error("malformed ASN.1 at offset {offset}: {why}")]
    Asn1Malformed { offset: usize, why: String },

    #[error("malformed certificate: {0}")]
    CertMalformed(String),

    #[error("malformed CMS structure: {0}")]
    CmsMalformed(String),

    #[error("no certificate in the bag matches the SignerInfo identifier")]
    SignerCertMissing,

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(Oid),

    #[error("signature verification failed")]
    SigInvalid,

    #[error("SOD signature is invalid")]
    SodSignatureInvalid,

    #[error("SOD has more than one SignerInfo")]
    SodMultipleSigners,

    #[error("data group {dg} hash does not match the SOD hash table")]
    DgHashMismatch { dg: u8 },

    #[error("no issuer certificate found to continue the chain")]
    ChainNoIssuer,

    #[error("certificate chain exceeds the maximum depth")]
    ChainTooDeep,

    #[error("certificate expired or not yet valid at evaluation time")]
    CertExpired,

    #[error("certificate {serial} revoked ({reason:?}) on {date}")]
    CertRevoked {
        serial: String,
        reason: RevocationReason,
        date: String,
    },

    #[error("CRL is stale (next_update has passed)")]
    RevocationStale,

    #[error("unknown critical extension {0} not on the policy allow-list")]
    UnknownCriticalExt(Oid),

    #[error("verification was cancelled")]
    Cancelled,
}

impl From<der::Error> for PkdError {
    fn from(e: der::Error) -> Self {
        Self::Asn1Malformed {
            offset: e.position().map_or(0, |l| l.into()),
            why:    e.to_string(),
        }
    }
}

/// A stable, coarse classification of [`PkdError`] for the frozen
/// `failure_reasons` JSON strings of spec.md §6.
impl PkdError {
    pub fn failure_reason_code(&self) -> &'static str {
        match self {
            Self::Asn1Malformed { .. } => "ASN1_MALFORMED",
            Self::CertMalformed(_) => "CERT_MALFORMED",
            Self::CmsMalformed(_) => "CMS_MALFORMED",
            Self::SignerCertMissing => "SIGNER_CERT_MISSING",
            Self::UnsupportedAlgorithm(_) => "UNSUPPORTED_ALGORITHM",
            Self::SigInvalid => "SIG_INVALID",
            Self::SodSignatureInvalid => "SOD_SIGNATURE_INVALID",
            Self::SodMultipleSigners => "SOD_MULTIPLE_SIGNERS",
            Self::DgHashMismatch { .. } => "DG_HASH_MISMATCH",
            Self::ChainNoIssuer => "CHAIN_NO_ISSUER",
            Self::ChainTooDeep => "CHAIN_TOO_DEEP",
            Self::CertExpired { .. } => "CERT_EXPIRED",
            Self::CertRevoked { .. } => "CERT_REVOKED",
            Self::RevocationStale => "REVOCATION_STALE",
            Self::UnknownCriticalExt(_) => "UNKNOWN_CRITICAL_EXT",
            Self::Cancelled => "CANCELLED",
        }
    }
}
