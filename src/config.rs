//! Explicit, value-typed policy configuration for the trust engine.
//!
//! Replaces a process-global configuration singleton: every entry point that
//! needs policy knobs takes a `&CoreConfig` argument instead of reading
//! ambient state. The CLI binary is the only place environment variables are
//! read; this module never touches `std::env`.

use std::{collections::HashSet, time::Duration};

use const_oid::ObjectIdentifier as Oid;

/// How to treat SHA-1 as a digest algorithm in signatures and DG hashes.
///
/// SHA-1 remains common in older CSCA/DSC material; spec.md treats it as
/// weak but not automatically fatal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sha1Posture {
    /// SHA-1 is accepted without comment.
    Accept,
    /// SHA-1 is accepted but recorded as a deviation on the verdict.
    Deviation,
    /// SHA-1 signatures/hashes are rejected outright.
    Reject,
}

/// Policy configuration consumed by every verification entry point.
///
/// Constructed once by the caller (CLI, test, or embedding application) and
/// passed down by reference; nothing in this crate mutates it.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    /// If `false` (the default), a CRL whose `nextUpdate` has passed causes
    /// [`crate::error::PkdError::RevocationStale`] rather than being
    /// silently treated as still current.
    pub accept_stale_crls: bool,
    /// Policy for SHA-1 digests, see [`Sha1Posture`].
    pub sha1_posture: Sha1Posture,
    /// Critical X.509 extensions beyond the handful the chain builder
    /// understands natively that are nonetheless accepted rather than
    /// causing [`crate::error::PkdError::UnknownCriticalExt`].
    pub accepted_critical_exts: HashSet<Oid>,
    /// Allowed clock skew when checking certificate and CRL validity
    /// windows.
    pub clock_skew: Duration,
    /// Maximum certificate chain depth (spec.md §4.11: depth ≥ 8 fails).
    pub max_chain_depth: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            accept_stale_crls: false,
            sha1_posture: Sha1Posture::Deviation,
            accepted_critical_exts: HashSet::new(),
            clock_skew: Duration::from_secs(5 * 60),
            max_chain_depth: 8,
        }
    }
}

impl CoreConfig {
    /// A chain of `depth` certificates (trust anchor excluded) is too deep
    /// under this policy.
    pub fn chain_too_deep(&self, depth: usize) -> bool {
        depth >= self.max_chain_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_conservative() {
        let cfg = CoreConfig::default();
        assert!(!cfg.accept_stale_crls);
        assert_eq!(cfg.sha1_posture, Sha1Posture::Deviation);
        assert!(cfg.accepted_critical_exts.is_empty());
        assert_eq!(cfg.max_chain_depth, 8);
        assert!(cfg.chain_too_deep(8));
        assert!(!cfg.chain_too_deep(7));
    }
}
