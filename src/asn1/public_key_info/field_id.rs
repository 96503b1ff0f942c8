//! `FieldID` from X9.62 / SEC1, as referenced by explicit EC parameters.

use der::{
    asn1::{Int, ObjectIdentifier as Oid},
    Any, Decode, DecodeValue, Encode, EncodeValue, Length, Reader, Result, Sequence, ValueOrd,
    Writer,
};

pub const ID_PRIME_FIELD: Oid = Oid::new_unwrap("1.2.840.10045.1.1");
pub const ID_CHARACTERISTIC_TWO_FIELD: Oid = Oid::new_unwrap("1.2.840.10045.1.2");

/// Every curve this crate needs to verify (NIST P-* and brainpool) is a
/// prime field; `CharacteristicTwo` is kept only so decoding an explicit-
/// parameter binary-field certificate does not hard-fail the whole cert.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum FieldId {
    Prime(Int),
    CharacteristicTwo(Any),
}

impl Sequence<'_> for FieldId {}

impl ValueOrd for FieldId {
    fn value_cmp(&self, other: &Self) -> Result<std::cmp::Ordering> {
        let lhs = self.to_der()?;
        let rhs = other.to_der()?;
        Ok(lhs.as_slice().cmp(rhs.as_slice()))
    }
}

impl EncodeValue for FieldId {
    fn value_len(&self) -> Result<Length> {
        match self {
            Self::Prime(p) => ID_PRIME_FIELD.encoded_len()? + p.encoded_len()?,
            Self::CharacteristicTwo(any) => {
                ID_CHARACTERISTIC_TWO_FIELD.encoded_len()? + any.encoded_len()?
            }
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        match self {
            Self::Prime(p) => {
                ID_PRIME_FIELD.encode(writer)?;
                p.encode(writer)
            }
            Self::CharacteristicTwo(any) => {
                ID_CHARACTERISTIC_TWO_FIELD.encode(writer)?;
                any.encode(writer)
            }
        }
    }
}

impl<'a> DecodeValue<'a> for FieldId {
    fn decode_value<R: Reader<'a>>(reader: &mut R, _header: der::Header) -> Result<Self> {
        let oid = Oid::decode(reader)?;
        Ok(match oid {
            ID_PRIME_FIELD => Self::Prime(Int::decode(reader)?),
            _ => Self::CharacteristicTwo(Any::decode(reader)?),
        })
    }
}
