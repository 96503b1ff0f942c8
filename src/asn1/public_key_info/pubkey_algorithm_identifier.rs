//! `SubjectPublicKeyInfo.algorithm` decoded into a rich enum.
//!
//! Wire-level `EncodeValue`/`DecodeValue` live in `mod.rs` alongside
//! [`super::SubjectPublicKeyInfo`], which needs the same OID-dispatch shape.

use {
    super::{DhAlgoParameters, ECAlgoParameters},
    crate::asn1::AnyAlgorithmIdentifier,
    der::asn1::ObjectIdentifier as Oid,
};

pub const ID_RSA: Oid = Oid::new_unwrap("1.2.840.113549.1.1.1");
pub const ID_EC: Oid = Oid::new_unwrap("1.2.840.10045.2.1");
pub const ID_DH: Oid = Oid::new_unwrap("1.2.840.10046.2.1");

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum PubkeyAlgorithmIdentifier {
    Rsa,
    Ec(ECAlgoParameters),
    Dh(DhAlgoParameters),
    Unknown(AnyAlgorithmIdentifier),
}
