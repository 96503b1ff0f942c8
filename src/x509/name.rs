//! RFC 5280 §7.1-lite name canonicalisation (spec.md §4.2).
//!
//! Two `Name`s are equal iff their canonical RDN sequences are byte-equal:
//! each ATV renders as `OID=VALUE`, value whitespace-folded and trimmed,
//! case-folded for the usual directory-string ASN.1 tags. This intentionally
//! ignores which concrete string type (`PrintableString`, `UTF8String`, …)
//! carried the value — Doc 9303 issuers are not consistent about it.

use {std::fmt, x509_cert::name::Name as X509Name};

/// A canonicalised X.509 `Name`, suitable for store lookups and chain
/// issuer/subject matching.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CanonicalName(String);

impl CanonicalName {
    pub fn from_name(name: &X509Name) -> Self {
        let rendered = name
            .0
            .iter()
            .map(|rdn| {
                let mut atvs: Vec<String> = rdn
                    .0
                    .iter()
                    .map(|atv| {
                        let oid = atv.oid.to_string();
                        let value = canonicalize_value(&atv.value);
                        format!("{oid}={value}")
                    })
                    .collect();
                atvs.sort();
                atvs.join("+")
            })
            .collect::<Vec<_>>();
        Self(rendered.join(","))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The empty name — used in tests that don't care about identity.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// A name built straight from an already-canonical string, bypassing
    /// [`Self::from_name`] — used in tests that want two distinguishable
    /// names without constructing a real `x509_cert::name::Name`.
    #[cfg(test)]
    pub fn for_test(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fold whitespace and case-fold the string content of an attribute value,
/// regardless of which ASN.1 string tag carried it (PrintableString,
/// UTF8String, IA5String, TeletexString, ...).
fn canonicalize_value(value: &der::Any) -> String {
    let raw = value
        .decode_as::<der::asn1::Utf8StringRef>()
        .map(|s| s.as_str().to_owned())
        .or_else(|_| {
            value
                .decode_as::<der::asn1::PrintableStringRef>()
                .map(|s| s.as_str().to_owned())
        })
        .or_else(|_| {
            value
                .decode_as::<der::asn1::Ia5StringRef>()
                .map(|s| s.as_str().to_owned())
        })
        .unwrap_or_else(|_| hex::encode(value.value()));

    let folded = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    folded.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_whitespace_and_case() {
        assert_eq!(
            canonicalize_value(
                &der::Any::new(der::Tag::Utf8String, "  Some   Name  ".as_bytes()).unwrap()
            ),
            "some name"
        );
    }
}
