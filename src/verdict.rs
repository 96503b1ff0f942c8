//! The frozen Verdict JSON shape (spec.md §6) and its composition rule
//! (§4.12).

use serde::Serialize;

use crate::{deviation::DeviationHit, x509::ComplianceWarning};

/// Overall Passive Authentication outcome.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Overall {
    Passed,
    PassedWithDeviations,
    Failed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SodSignatureStatus {
    Valid,
    Invalid,
}

#[derive(Clone, Debug, Serialize)]
pub struct SodReport {
    pub signature: SodSignatureStatus,
    pub signing_time: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DataGroupReport {
    pub number: u8,
    pub expected_sha256: String,
    pub actual_sha256: String,
    #[serde(rename = "match")]
    pub matches: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChainEntry {
    pub subject: String,
    pub fingerprint_sha256: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RevocationReport {
    pub checked: bool,
    pub revoked: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct DeviationReport {
    pub oid: String,
    pub category: String,
    pub description: Option<String>,
}

impl From<&DeviationHit> for DeviationReport {
    fn from(hit: &DeviationHit) -> Self {
        use crate::deviation::DeviationCategory;
        let category = match hit.category {
            DeviationCategory::CertOrKey => "CertOrKey",
            DeviationCategory::Lds => "LDS",
            DeviationCategory::Mrz => "MRZ",
            DeviationCategory::Chip => "Chip",
            DeviationCategory::Other => "Other",
        };
        Self {
            oid: hit.defect_oid.to_string(),
            category: category.to_owned(),
            description: hit.description.clone(),
        }
    }
}

/// The final, serializable outcome of Passive Authentication (spec.md §6).
#[derive(Clone, Debug, Serialize)]
pub struct Verdict {
    pub overall: Overall,
    pub sod: SodReport,
    pub data_groups: Vec<DataGroupReport>,
    pub chain: Vec<ChainEntry>,
    pub compliance_warnings: Vec<ComplianceWarning>,
    pub revocation: RevocationReport,
    pub deviations: Vec<DeviationReport>,
    pub failure_reasons: Vec<String>,
}

impl Verdict {
    /// Compose `overall` from the collected findings (spec.md §4.12 step 5).
    ///
    /// `FAILED` if the SOD signature is invalid, any DG hash in the hash
    /// table mismatches, the chain failed to build/validate, or a
    /// revocation hit exists. `PASSED_WITH_DEVIATIONS` if only DL hits or
    /// SHA-1 use are surfaced. `PASSED` otherwise.
    pub fn compose_overall(
        sod_signature_ok: bool,
        dg_hashes_ok: bool,
        chain_ok: bool,
        revocation_ok: bool,
        has_deviations_or_sha1: bool,
    ) -> Overall {
        if !sod_signature_ok || !dg_hashes_ok || !chain_ok || !revocation_ok {
            Overall::Failed
        } else if has_deviations_or_sha1 {
            Overall::PassedWithDeviations
        } else {
            Overall::Passed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_failed_on_any_hard_failure() {
        assert_eq!(
            Verdict::compose_overall(false, true, true, true, false),
            Overall::Failed
        );
        assert_eq!(
            Verdict::compose_overall(true, true, true, true, false),
            Overall::Passed
        );
        assert_eq!(
            Verdict::compose_overall(true, true, true, true, true),
            Overall::PassedWithDeviations
        );
    }

    #[test]
    fn serializes_with_frozen_field_names() {
        let verdict = Verdict {
            overall: Overall::Passed,
            sod: SodReport {
                signature: SodSignatureStatus::Valid,
                signing_time: None,
            },
            data_groups: vec![],
            chain: vec![],
            compliance_warnings: vec![],
            revocation: RevocationReport {
                checked: true,
                revoked: false,
            },
            deviations: vec![],
            failure_reasons: vec![],
        };
        let json = serde_json::to_string(&verdict).unwrap();
        assert!(json.contains("\"overall\":\"PASSED\""));
        assert!(json.contains("\"signature\":\"VALID\""));
    }
}
