//! Passive Authentication orchestrator (spec.md §4.12).
//!
//! Ties together the SOD parser (§4.7), the DG hasher (§4.8), the chain
//! builder (§4.11) and Deviation List consultation (§4.10) into the single
//! state machine a caller drives with [`verify`].

use std::collections::HashMap;

use der::asn1::{ContextSpecific, GeneralizedTime, ObjectIdentifier as Oid};
use der::{Decode, Header, Reader, TagNumber};

use crate::{
    config::{CoreConfig, Sha1Posture},
    datagroup::verify_dg_hash,
    deviation::DeviationHit,
    error::PkdError,
    sod::ParsedSod,
    trust::{self, AuditSink, CertificateStore},
    verdict::{
        ChainEntry, DataGroupReport, DeviationReport, RevocationReport, SodReport,
        SodSignatureStatus, Verdict,
    },
    x509::{self, Certificate},
};

const OID_PRIVATE_KEY_USAGE_PERIOD: Oid = Oid::new_unwrap("2.5.29.16");

/// Progress through §4.12's state machine, reported to the caller via
/// [`Outcome::stage_reached`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Init,
    SodParsed,
    SodSigChecked,
    DgHashed,
    ChainBuilt,
    ChainValidated,
    RevocationChecked,
    DeviationsChecked,
    Done,
}

/// Returned by [`verify`] when the caller's cancellation token fires
/// between steps of the state machine. No `Verdict` is produced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cancelled;

/// Checked between every step of §4.12's state machine (spec.md §5).
pub trait CancellationToken {
    fn is_cancelled(&self) -> bool;
}

impl CancellationToken for () {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Input to a single verification call.
pub struct VerificationInput<'a> {
    pub sod_bytes: &'a [u8],
    pub dg_bytes: &'a HashMap<u8, Vec<u8>>,
    pub evaluation_time: u64,
}

/// A `Verdict` plus the furthest state-machine stage reached, for callers
/// that want progress beyond the frozen JSON shape.
pub struct Outcome {
    pub verdict: Verdict,
    pub stage_reached: Stage,
}

/// Run Passive Authentication end to end (spec.md §4.12). Findings already
/// collected before a failing step are retained on the returned `Verdict`;
/// the state machine never unwinds them.
pub fn verify(
    input: &VerificationInput<'_>,
    store: &impl CertificateStore,
    audit: &impl AuditSink,
    config: &CoreConfig,
    cancellation: &impl CancellationToken,
) -> Result<Outcome, Cancelled> {
    let mut stage = Stage::Init;
    let mut failure_reasons = Vec::new();

    let sod = match ParsedSod::parse_and_verify(input.sod_bytes) {
        Ok(parsed) => {
            stage = Stage::SodSigChecked;
            Some(parsed)
        }
        Err(e) => {
            failure_reasons.push(e.failure_reason_code().to_owned());
            None
        }
    };
    let sod_signature_ok = sod.is_some();
    let signing_time = sod
        .as_ref()
        .and_then(|s| s.signing_time.as_ref())
        .map(|t| time_to_unix(t).to_string());

    if cancellation.is_cancelled() {
        return Err(Cancelled);
    }

    let mut data_groups = Vec::new();
    let mut dg_hashes_ok = true;
    let mut sha1_used = false;

    if let Some(parsed) = &sod {
        sha1_used = matches!(parsed.hash_alg, crate::asn1::DigestAlgorithmIdentifier::Sha1(_));

        let mut dg_numbers: Vec<u8> = input.dg_bytes.keys().copied().collect();
        dg_numbers.sort_unstable();
        for dg_number in dg_numbers {
            let Some(expected) = parsed.lds.hash_for_dg(dg_number) else {
                continue;
            };
            let bytes = &input.dg_bytes[&dg_number];
            let actual = parsed.hash_alg.hash_bytes(bytes);
            let matches = verify_dg_hash(dg_number, bytes, expected, &parsed.hash_alg).is_ok();
            if !matches {
                dg_hashes_ok = false;
                failure_reasons.push(PkdError::DgHashMismatch { dg: dg_number }.failure_reason_code().to_owned());
            }
            data_groups.push(DataGroupReport {
                number: dg_number,
                expected_sha256: hex::encode(expected),
                actual_sha256: hex::encode(actual),
                matches,
            });
        }
        stage = Stage::DgHashed;
    }

    if cancellation.is_cancelled() {
        return Err(Cancelled);
    }

    let mut chain_entries = Vec::new();
    let mut chain_path = Vec::new();
    let mut compliance_warnings = Vec::new();
    let mut chain_ok = false;
    let mut revoked = false;

    if let Some(parsed) = &sod {
        stage = Stage::ChainBuilt;
        match trust::build_chain(&parsed.dsc, store, audit, config, input.evaluation_time) {
            Ok(links) => {
                stage = Stage::ChainValidated;
                chain_ok = true;
                for (depth, link) in links.into_iter().enumerate() {
                    chain_entries.push(ChainEntry {
                        subject: link.certificate.subject.as_str().to_owned(),
                        fingerprint_sha256: hex::encode(link.certificate.fingerprint_sha256),
                    });
                    // The leaf (depth 0) is the DSC; every other node up to
                    // and including the anchor is a CSCA or link certificate.
                    compliance_warnings.extend(x509::check_compliance(&link.certificate, depth > 0));
                    chain_path.push(link.certificate);
                }
                if let Some(window) = private_key_usage_period(&parsed.dsc) {
                    if !covers(window, input.evaluation_time) {
                        failure_reasons.push("DSC_PRIVATE_KEY_USAGE_EXPIRED".to_owned());
                    }
                }
            }
            Err(e @ PkdError::CertRevoked { .. }) => {
                revoked = true;
                failure_reasons.push(e.failure_reason_code().to_owned());
            }
            Err(e) => failure_reasons.push(e.failure_reason_code().to_owned()),
        }
        stage = Stage::RevocationChecked;
    }

    if cancellation.is_cancelled() {
        return Err(Cancelled);
    }

    let mut deviations = Vec::new();
    for cert in &chain_path {
        for hit in store.find_deviations_for(&cert.issuer, &cert.serial) {
            audit.record(trust::VerificationEvent::DeviationHit {
                issuer: hit.target_issuer.clone(),
                serial: hit.target_serial.clone(),
                oid: hit.defect_oid,
            });
            deviations.push(DeviationReport::from(&hit));
        }
    }
    stage = Stage::Done;

    let has_deviations_or_sha1 =
        !deviations.is_empty() || (sha1_used && matches!(config.sha1_posture, Sha1Posture::Deviation));
    let overall = Verdict::compose_overall(sod_signature_ok, dg_hashes_ok, chain_ok, !revoked, has_deviations_or_sha1);

    let verdict = Verdict {
        overall,
        sod: SodReport {
            signature: if sod_signature_ok {
                SodSignatureStatus::Valid
            } else {
                SodSignatureStatus::Invalid
            },
            signing_time,
        },
        data_groups,
        chain: chain_entries,
        compliance_warnings,
        revocation: RevocationReport {
            checked: chain_ok || revoked,
            revoked,
        },
        deviations,
        failure_reasons,
    };

    Ok(Outcome { verdict, stage_reached: stage })
}

fn time_to_unix(time: &x509_cert::time::Time) -> u64 {
    match time {
        x509_cert::time::Time::UtcTime(t) => t.to_unix_duration().as_secs(),
        x509_cert::time::Time::GeneralTime(t) => t.to_unix_duration().as_secs(),
    }
}

fn covers(window: (Option<u64>, Option<u64>), evaluation_time: u64) -> bool {
    let (not_before, not_after) = window;
    not_before.map_or(true, |nb| evaluation_time >= nb) && not_after.map_or(true, |na| evaluation_time <= na)
}

/// RFC 5280 §4.2.1.4: `PrivateKeyUsagePeriod ::= SEQUENCE { notBefore [0]
/// IMPLICIT GeneralizedTime OPTIONAL, notAfter [1] IMPLICIT GeneralizedTime
/// OPTIONAL }`.
fn private_key_usage_period(cert: &Certificate) -> Option<(Option<u64>, Option<u64>)> {
    let ext = cert.extension(OID_PRIVATE_KEY_USAGE_PERIOD)?;
    let mut reader = der::SliceReader::new(&ext.value_der).ok()?;
    let header = Header::decode(&mut reader).ok()?;
    reader
        .read_nested(header.length, |nested| {
            let not_before = ContextSpecific::<GeneralizedTime>::decode_implicit(nested, TagNumber::new(0))?
                .map(|cs| cs.value.to_unix_duration().as_secs());
            let not_after = ContextSpecific::<GeneralizedTime>::decode_implicit(nested, TagNumber::new(1))?
                .map(|cs| cs.value.to_unix_duration().as_secs());
            Ok((not_before, not_after))
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_covers_everything() {
        assert!(covers((None, None), 12345));
    }

    #[test]
    fn window_rejects_outside_bounds() {
        assert!(!covers((Some(100), Some(200)), 50));
        assert!(!covers((Some(100), Some(200)), 250));
        assert!(covers((Some(100), Some(200)), 150));
    }
}
