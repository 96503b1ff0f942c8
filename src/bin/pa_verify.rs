//! Thin CLI exercising the library end to end: reads a SOD, zero or more
//! Data Group files, a directory of trust anchors and CRLs, runs Passive
//! Authentication and prints the §6 JSON Verdict.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use argh::FromArgs;
use icao_pkd_core::{
    config::CoreConfig,
    crl::Crl,
    deviation::{DeviationHit, DeviationList},
    pa::{self, CancellationToken, VerificationInput},
    trust::{AuditSink, CertificateStore, VerificationEvent},
    x509::{CanonicalName, Certificate},
};

#[derive(FromArgs)]
/// Verify a passport SOD against a trust-anchor directory (ICAO Doc 9303 Passive Authentication).
struct Args {
    /// path to the EF.SOD file (bare ContentInfo or `[APPLICATION 23]`-wrapped)
    #[argh(option)]
    sod: PathBuf,

    /// a `N=PATH` pair for Data Group N; may be repeated
    #[argh(option)]
    dg: Vec<String>,

    /// directory of trust-anchor certificates (PEM or DER) and CRLs
    #[argh(option)]
    trust_dir: PathBuf,

    /// path to a Deviation List file (CMS SignedData); may be repeated.
    /// Its signer is resolved against `trust_dir`'s anchors.
    #[argh(option)]
    deviation_list: Vec<PathBuf>,

    /// unix timestamp to evaluate validity/revocation at (defaults to now)
    #[argh(option)]
    evaluation_time: Option<u64>,
}

struct InMemoryStore {
    anchors: Vec<Certificate>,
    crls: Vec<Crl>,
    deviations: Vec<DeviationHit>,
}

impl CertificateStore for InMemoryStore {
    fn find_by_subject(&self, subject: &CanonicalName) -> Vec<Certificate> {
        self.anchors.iter().filter(|c| &c.subject == subject).cloned().collect()
    }

    fn find_by_ski(&self, ski: &[u8]) -> Vec<Certificate> {
        use der::Decode;
        use x509_cert::ext::pkix::SubjectKeyIdentifier;

        const OID_SKI: der::asn1::ObjectIdentifier = der::asn1::ObjectIdentifier::new_unwrap("2.5.29.14");
        self.anchors
            .iter()
            .filter(|c| {
                c.extension(OID_SKI)
                    .and_then(|ext| SubjectKeyIdentifier::from_der(&ext.value_der).ok())
                    .is_some_and(|cert_ski| cert_ski.0.as_bytes() == ski)
            })
            .cloned()
            .collect()
    }

    fn find_crls_by_issuer(&self, issuer: &CanonicalName) -> Vec<Crl> {
        let mut matching: Vec<Crl> = self.crls.iter().filter(|crl| &crl.issuer == issuer).cloned().collect();
        matching.sort_by(|a, b| b.this_update.cmp(&a.this_update));
        matching
    }

    fn find_deviations_for(&self, issuer: &CanonicalName, serial: &[u8]) -> Vec<DeviationHit> {
        self.deviations
            .iter()
            .filter(|hit| hit.target_issuer == issuer.as_str() && hit.target_serial == serial)
            .cloned()
            .collect()
    }

    fn is_trust_anchor(&self, fingerprint_sha256: &[u8; 32]) -> bool {
        self.anchors.iter().any(|c| &c.fingerprint_sha256 == fingerprint_sha256)
    }
}

struct StderrAudit;

impl AuditSink for StderrAudit {
    fn record(&self, event: VerificationEvent) {
        tracing::debug!(?event, "verification event");
    }
}

struct NoCancellation;

impl CancellationToken for NoCancellation {
    fn is_cancelled(&self) -> bool {
        false
    }
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let sod_bytes = fs::read(&args.sod).with_context(|| format!("reading {}", args.sod.display()))?;

    let mut dg_bytes = HashMap::new();
    for spec in &args.dg {
        let (number, path) = spec
            .split_once('=')
            .with_context(|| format!("--dg must be N=PATH, got {spec}"))?;
        let number: u8 = number.parse().with_context(|| format!("invalid DG number in {spec}"))?;
        let bytes = fs::read(path).with_context(|| format!("reading {path}"))?;
        dg_bytes.insert(number, bytes);
    }

    let mut store = load_store(&args.trust_dir)?;
    store.deviations = load_deviations(&args.deviation_list, &store.anchors)?;
    let evaluation_time = args.evaluation_time.unwrap_or_else(now);

    let input = VerificationInput {
        sod_bytes: &sod_bytes,
        dg_bytes: &dg_bytes,
        evaluation_time,
    };
    let config = CoreConfig::default();

    let outcome = pa::verify(&input, &store, &StderrAudit, &config, &NoCancellation)
        .map_err(|_| anyhow::anyhow!("verification was cancelled"))?;

    println!("{}", serde_json::to_string_pretty(&outcome.verdict)?);
    Ok(())
}

fn load_store(dir: &Path) -> Result<InMemoryStore> {
    let mut anchors = Vec::new();
    let mut crls = Vec::new();

    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let bytes = fs::read(&path)?;
        if let Ok(cert) = Certificate::parse(&bytes) {
            anchors.push(cert);
        } else if let Ok(crl) = Crl::parse(&bytes) {
            crls.push(crl);
        } else {
            tracing::warn!(path = %path.display(), "skipping file that is neither a certificate nor a CRL");
        }
    }

    Ok(InMemoryStore {
        anchors,
        crls,
        deviations: Vec::new(),
    })
}

/// Parse each `--deviation-list` file, trying every loaded trust anchor as
/// its signer (the list's own signing CSCA isn't known ahead of time, and
/// `DeviationList::parse_and_verify` requires a concrete candidate) until
/// one verifies. Files that verify against no anchor are skipped with a
/// warning rather than aborting the run.
fn load_deviations(paths: &[PathBuf], anchors: &[Certificate]) -> Result<Vec<DeviationHit>> {
    let mut hits = Vec::new();
    for path in paths {
        let der = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let verified = anchors
            .iter()
            .find_map(|anchor| DeviationList::parse_and_verify(&der, anchor).ok());
        match verified {
            Some(list) => hits.extend(list.hits),
            None => tracing::warn!(path = %path.display(), "deviation list signature did not verify against any trust anchor"),
        }
    }
    Ok(hits)
}

fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
