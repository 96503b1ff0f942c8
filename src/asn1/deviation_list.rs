//! Deviation List structures (spec.md §3, §4.10).

use {
    super::{ContentType, OrderedSet},
    der::{
        asn1::{ObjectIdentifier as Oid, Utf8StringRef},
        Any, Sequence,
    },
    x509_cert::{name::Name, serial_number::SerialNumber},
};

#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct IssuerAndSerial {
    pub issuer: Name,
    pub serial_number: SerialNumber,
}

#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct Defect<'a> {
    pub oid: Oid,
    pub description: Option<Utf8StringRef<'a>>,
    pub params: Option<Any>,
}

#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct DeviationEntry<'a> {
    pub target_cert: IssuerAndSerial,
    pub defects: OrderedSet<Defect<'a>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct DeviationListContent<'a> {
    pub entries: OrderedSet<DeviationEntry<'a>>,
}

impl ContentType for DeviationListContent<'_> {
    /// ICAO 9303-12 §10.
    const CONTENT_TYPE: Oid = Oid::new_unwrap("2.23.136.1.1.7");
}
