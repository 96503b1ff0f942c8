//! `SubjectPublicKeyInfo`, decoded into a rich enum of the algorithms this
//! crate actually verifies against (RSA, EC) with a catch-all for the rest.

mod field_id;
mod pubkey_algorithm_identifier;

pub use self::{
    field_id::FieldId,
    pubkey_algorithm_identifier::{PubkeyAlgorithmIdentifier, ID_DH, ID_EC, ID_RSA},
};
use {
    super::AnyAlgorithmIdentifier,
    der::{
        asn1::{BitString, Int, Null, ObjectIdentifier as Oid, OctetString},
        Choice, Decode, DecodeValue, Encode, EncodeValue, Length, Reader, Result, Sequence,
        ValueOrd, Writer,
    },
    std::cmp::Ordering,
};

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum SubjectPublicKeyInfo {
    Rsa(RsaPublicKeyInfo),
    Ec(EcPublicKeyInfo),
    Unknown(AnySubjectPublicKeyInfo),
}

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Sequence, ValueOrd)]
pub struct AnySubjectPublicKeyInfo {
    pub algorithm:          AnyAlgorithmIdentifier,
    pub subject_public_key: BitString,
}

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Sequence, ValueOrd)]
pub struct RsaPublicKeyInfo {
    pub modulus:         Int,
    pub public_exponent: Int,
}

/// An EC public key: the curve parameters from `algorithm` plus the
/// uncompressed point octets carried in `subject_public_key`.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct EcPublicKeyInfo {
    pub params:             ECAlgoParameters,
    pub subject_public_key: BitString,
}

/// Diffie-Hellman Mod-P Group Parameters.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Sequence, ValueOrd)]
pub struct DhAlgoParameters {
    pub prime:                Int,
    pub base:                 Int,
    pub private_value_length: Option<u64>,
}

/// Elliptic Curve Algorithm Parameters.
///
/// **Note**: This deviates from RFC 5480 by allowing for explicit
/// parameters using `EcParameters` in addition to named curves. This
/// is used by at least some Dutch eMRTDs.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Choice, ValueOrd)]
pub enum ECAlgoParameters {
    EcParameters(EcParameters),
    NamedCurve(Oid),
    ImplicitlyCA(Null),
}

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Sequence, ValueOrd)]
pub struct EcParameters {
    pub version:  u64,
    pub field_id: FieldId,
    pub curve:    Curve,
    pub base:     ECPoint,
    pub order:    Int,
    pub cofactor: Option<Int>,
}

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Sequence, ValueOrd)]
pub struct Curve {
    pub a:    FieldElement,
    pub b:    FieldElement,
    pub seed: Option<BitString>,
}

pub type FieldElement = OctetString;

pub type ECPoint = OctetString;

impl Sequence<'_> for SubjectPublicKeyInfo {}

impl ValueOrd for SubjectPublicKeyInfo {
    fn value_cmp(&self, other: &Self) -> Result<Ordering> {
        let lhs = self.to_der()?;
        let rhs = other.to_der()?;
        Ok(lhs.as_slice().cmp(rhs.as_slice()))
    }
}

impl EncodeValue for SubjectPublicKeyInfo {
    fn value_len(&self) -> Result<Length> {
        match self {
            Self::Rsa(key) => {
                let sum = (ID_RSA.encoded_len()? + Null.encoded_len()?)?;
                sum + key.subject_public_key()?.encoded_len()?
            }
            Self::Ec(key) => {
                encode_ec_algorithm_len(&key.params)? + key.subject_public_key.encoded_len()?
            }
            Self::Unknown(any) => any.value_len(),
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        match self {
            Self::Rsa(key) => {
                ID_RSA.encode(writer)?;
                Null.encode(writer)?;
                key.subject_public_key()?.encode(writer)
            }
            Self::Ec(key) => {
                encode_ec_algorithm(&key.params, writer)?;
                key.subject_public_key.encode(writer)
            }
            Self::Unknown(any) => any.encode(writer),
        }
    }
}

fn encode_ec_algorithm_len(params: &ECAlgoParameters) -> Result<Length> {
    ID_EC.encoded_len()? + params.encoded_len()?
}

fn encode_ec_algorithm(params: &ECAlgoParameters, writer: &mut impl Writer) -> Result<()> {
    ID_EC.encode(writer)?;
    params.encode(writer)
}

impl RsaPublicKeyInfo {
    fn subject_public_key(&self) -> Result<BitString> {
        // The RSA public key is itself a DER SEQUENCE { modulus, exponent }
        // carried inside the BIT STRING.
        let inner = RsaPublicKeyInfo {
            modulus:         self.modulus.clone(),
            public_exponent: self.public_exponent.clone(),
        }
        .to_der()?;
        BitString::from_bytes(&inner)
    }
}

impl<'a> DecodeValue<'a> for SubjectPublicKeyInfo {
    fn decode_value<R: Reader<'a>>(reader: &mut R, _header: der::Header) -> Result<Self> {
        let oid = Oid::decode(reader)?;
        Ok(match oid {
            ID_RSA => {
                Null::decode(reader)?;
                let bits = BitString::decode(reader)?;
                let inner = RsaPublicKeyInfo::from_der(bits.raw_bytes())?;
                Self::Rsa(inner)
            }
            ID_EC => {
                let params = ECAlgoParameters::decode(reader)?;
                let subject_public_key = BitString::decode(reader)?;
                Self::Ec(EcPublicKeyInfo {
                    params,
                    subject_public_key,
                })
            }
            _ => Self::Unknown(AnySubjectPublicKeyInfo {
                algorithm:          AnyAlgorithmIdentifier {
                    algorithm:  oid,
                    parameters: None,
                },
                subject_public_key: BitString::decode(reader)?,
            }),
        })
    }
}

impl TryFrom<&spki::SubjectPublicKeyInfoOwned> for SubjectPublicKeyInfo {
    type Error = der::Error;

    fn try_from(spki: &spki::SubjectPublicKeyInfoOwned) -> Result<Self> {
        let der = spki.to_der()?;
        Self::from_der(&der)
    }
}
