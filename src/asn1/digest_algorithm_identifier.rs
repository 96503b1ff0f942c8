//! `DigestAlgorithmIdentifier`, decoded into a rich enum instead of the bare
//! `AlgorithmIdentifier` so callers can dispatch on the hash function
//! directly and the chosen algorithm can drive [`crate::config::Sha1Posture`].

use {
    super::AnyAlgorithmIdentifier,
    der::{
        asn1::{Null, ObjectIdentifier as Oid},
        Any, Decode, DecodeValue, Encode, EncodeValue, Length, Reader, Result, Sequence, ValueOrd,
        Writer,
    },
    sha1::Sha1,
    sha2::{Digest, Sha256, Sha384, Sha512},
    std::cmp::Ordering,
};

pub const ID_SHA1: Oid = Oid::new_unwrap("1.3.14.3.2.26");
pub const ID_SHA256: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.2.1");
pub const ID_SHA384: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.2.2");
pub const ID_SHA512: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.2.3");

/// `AlgorithmIdentifier.parameters` for a digest algorithm.
///
/// RFC 3370 erratum: early implementations encode an explicit `NULL`, later
/// ones omit parameters entirely. Both are valid DER for the same algorithm,
/// so we remember which form the input used in order to round-trip exactly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Parameters {
    Absent,
    Null,
}

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum DigestAlgorithmIdentifier {
    Sha1(Parameters),
    Sha256(Parameters),
    Sha384(Parameters),
    Sha512(Parameters),
    Unknown(AnyAlgorithmIdentifier),
}

impl DigestAlgorithmIdentifier {
    pub const fn oid(&self) -> Oid {
        match self {
            Self::Sha1(_) => ID_SHA1,
            Self::Sha256(_) => ID_SHA256,
            Self::Sha384(_) => ID_SHA384,
            Self::Sha512(_) => ID_SHA512,
            Self::Unknown(any) => any.algorithm,
        }
    }

    /// Hash `data` with the algorithm this identifier names.
    ///
    /// Panics on [`Self::Unknown`] — callers must reject unsupported
    /// algorithms before reaching here (`PkdError::UnsupportedAlgorithm`).
    pub fn hash_bytes(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1(_) => Sha1::digest(data).to_vec(),
            Self::Sha256(_) => Sha256::digest(data).to_vec(),
            Self::Sha384(_) => Sha384::digest(data).to_vec(),
            Self::Sha512(_) => Sha512::digest(data).to_vec(),
            Self::Unknown(any) => unreachable!("unsupported digest algorithm {}", any.algorithm),
        }
    }

    pub const fn is_sha1(&self) -> bool {
        matches!(self, Self::Sha1(_))
    }
}

fn decode_params(oid: Oid, reader: &mut impl Reader<'_>) -> Result<Parameters> {
    match Option::<Any>::decode(reader)? {
        None => Ok(Parameters::Absent),
        Some(any) => {
            Null::try_from(any)?;
            let _ = oid;
            Ok(Parameters::Null)
        }
    }
}

fn encode_params(writer: &mut impl Writer, params: Parameters) -> Result<()> {
    match params {
        Parameters::Absent => Ok(()),
        Parameters::Null => Null.encode(writer),
    }
}

fn params_len(params: Parameters) -> Result<Length> {
    match params {
        Parameters::Absent => Ok(Length::ZERO),
        Parameters::Null => Null.encoded_len(),
    }
}

impl Sequence<'_> for DigestAlgorithmIdentifier {}

impl ValueOrd for DigestAlgorithmIdentifier {
    fn value_cmp(&self, other: &Self) -> Result<Ordering> {
        let lhs = self.to_der()?;
        let rhs = other.to_der()?;
        Ok(lhs.as_slice().cmp(rhs.as_slice()))
    }
}

impl EncodeValue for DigestAlgorithmIdentifier {
    fn value_len(&self) -> Result<Length> {
        match self {
            Self::Sha1(p) => ID_SHA1.encoded_len()? + params_len(*p)?,
            Self::Sha256(p) => ID_SHA256.encoded_len()? + params_len(*p)?,
            Self::Sha384(p) => ID_SHA384.encoded_len()? + params_len(*p)?,
            Self::Sha512(p) => ID_SHA512.encoded_len()? + params_len(*p)?,
            Self::Unknown(any) => any.value_len(),
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        match self {
            Self::Sha1(p) => {
                ID_SHA1.encode(writer)?;
                encode_params(writer, *p)
            }
            Self::Sha256(p) => {
                ID_SHA256.encode(writer)?;
                encode_params(writer, *p)
            }
            Self::Sha384(p) => {
                ID_SHA384.encode(writer)?;
                encode_params(writer, *p)
            }
            Self::Sha512(p) => {
                ID_SHA512.encode(writer)?;
                encode_params(writer, *p)
            }
            Self::Unknown(any) => any.encode(writer),
        }
    }
}

impl<'a> DecodeValue<'a> for DigestAlgorithmIdentifier {
    fn decode_value<R: Reader<'a>>(reader: &mut R, _header: der::Header) -> Result<Self> {
        let oid = Oid::decode(reader)?;
        Ok(match oid {
            ID_SHA1 => Self::Sha1(decode_params(oid, reader)?),
            ID_SHA256 => Self::Sha256(decode_params(oid, reader)?),
            ID_SHA384 => Self::Sha384(decode_params(oid, reader)?),
            ID_SHA512 => Self::Sha512(decode_params(oid, reader)?),
            _ => Self::Unknown(AnyAlgorithmIdentifier {
                algorithm:  oid,
                parameters: Option::<Any>::decode(reader)?,
            }),
        })
    }
}

impl TryFrom<&AnyAlgorithmIdentifier> for DigestAlgorithmIdentifier {
    type Error = der::Error;

    fn try_from(any: &AnyAlgorithmIdentifier) -> Result<Self> {
        Self::from_der(&any.to_der()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hashes_known_vector() {
        let digest = DigestAlgorithmIdentifier::Sha256(Parameters::Absent);
        let hash = digest.hash_bytes(b"abc");
        assert_eq!(
            hex::encode(hash),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
