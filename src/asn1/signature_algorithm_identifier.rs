//! Signature algorithm identifiers this crate verifies against: RSASSA-PKCS1-v1_5,
//! RSASSA-PSS (RFC 4055 §3.1) and ECDSA (RFC 5758 §3.2).

use {
    super::{AnyAlgorithmIdentifier, DigestAlgorithmIdentifier, DigestAlgorithmParameters},
    der::{
        asn1::{ContextSpecific, Int, ObjectIdentifier as Oid},
        Decode, DecodeValue, Encode, EncodeValue, Length, Reader, Result, Sequence, TagMode,
        TagNumber, ValueOrd, Writer,
    },
    std::cmp::Ordering,
};

pub const ID_SHA1_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.5");
pub const ID_SHA256_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.11");
pub const ID_SHA384_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.12");
pub const ID_SHA512_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.13");
pub const ID_RSASSA_PSS: Oid = Oid::new_unwrap("1.2.840.113549.1.1.10");
pub const ID_MGF1: Oid = Oid::new_unwrap("1.2.840.113549.1.1.8");
pub const ID_ECDSA_WITH_SHA256: Oid = Oid::new_unwrap("1.2.840.10045.4.3.2");
pub const ID_ECDSA_WITH_SHA384: Oid = Oid::new_unwrap("1.2.840.10045.4.3.3");
pub const ID_ECDSA_WITH_SHA512: Oid = Oid::new_unwrap("1.2.840.10045.4.3.4");

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SignatureAlgorithmIdentifier {
    /// RSASSA-PKCS1-v1_5, with the digest used to pad the message.
    RsaPkcs1V15(DigestAlgorithmIdentifier),
    RsaPss(RsaPssParameters),
    /// ECDSA, with the digest used to reduce the message.
    Ecdsa(DigestAlgorithmIdentifier),
    Unknown(AnyAlgorithmIdentifier),
}

impl SignatureAlgorithmIdentifier {
    /// The digest algorithm this signature scheme hashes the message with,
    /// if known.
    pub fn digest(&self) -> Option<&DigestAlgorithmIdentifier> {
        match self {
            Self::RsaPkcs1V15(d) | Self::Ecdsa(d) => Some(d),
            Self::RsaPss(params) => Some(&params.hash_algorithm),
            Self::Unknown(_) => None,
        }
    }
}

/// RFC 4055 §3.1.
///
/// ```text
/// RSASSA-PSS-params  ::=  SEQUENCE  {
///     hashAlgorithm      [0] HashAlgorithm DEFAULT sha1Identifier,
///     maskGenAlgorithm   [1] MaskGenAlgorithm DEFAULT mgf1SHA1Identifier,
///     saltLength         [2] INTEGER DEFAULT 20,
///     trailerField       [3] INTEGER DEFAULT 1
/// }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaPssParameters {
    pub hash_algorithm:     DigestAlgorithmIdentifier,
    pub mask_gen_algorithm: MaskGenAlgorithm,
    pub salt_length:        Int,
    pub trailer_field:      Int,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MaskGenAlgorithm {
    Sha1(DigestAlgorithmIdentifier),
    Sha256(DigestAlgorithmIdentifier),
    Sha384(DigestAlgorithmIdentifier),
    Sha512(DigestAlgorithmIdentifier),
    Unknown(AnyAlgorithmIdentifier),
}

impl MaskGenAlgorithm {
    pub fn digest(&self) -> Option<&DigestAlgorithmIdentifier> {
        match self {
            Self::Sha1(d) | Self::Sha256(d) | Self::Sha384(d) | Self::Sha512(d) => Some(d),
            Self::Unknown(_) => None,
        }
    }
}

fn default_sha1() -> DigestAlgorithmIdentifier {
    DigestAlgorithmIdentifier::Sha1(DigestAlgorithmParameters::Absent)
}

fn int_20() -> Int {
    Int::new(&[20]).expect("20 fits in an INTEGER")
}

fn int_1() -> Int {
    Int::new(&[1]).expect("1 fits in an INTEGER")
}

impl Sequence<'_> for RsaPssParameters {}

impl ValueOrd for RsaPssParameters {
    fn value_cmp(&self, other: &Self) -> Result<Ordering> {
        Ok(self.to_der()?.as_slice().cmp(other.to_der()?.as_slice()))
    }
}

const TAG_HASH_ALGORITHM: TagNumber = TagNumber::new(0);
const TAG_MASK_GEN_ALGORITHM: TagNumber = TagNumber::new(1);
const TAG_SALT_LENGTH: TagNumber = TagNumber::new(2);
const TAG_TRAILER_FIELD: TagNumber = TagNumber::new(3);

impl EncodeValue for RsaPssParameters {
    fn value_len(&self) -> Result<Length> {
        let hash_tagged = explicit(TAG_HASH_ALGORITHM, &self.hash_algorithm.clone().to_any_id())?;
        let mgf_tagged = explicit(TAG_MASK_GEN_ALGORITHM, &self.mask_gen_algorithm.to_any_id())?;
        let salt_tagged = ContextSpecific {
            tag_number:   TAG_SALT_LENGTH,
            tag_mode:     TagMode::Explicit,
            value:        self.salt_length.clone(),
        };
        let trailer_tagged = ContextSpecific {
            tag_number:   TAG_TRAILER_FIELD,
            tag_mode:     TagMode::Explicit,
            value:        self.trailer_field.clone(),
        };
        let sum = (hash_tagged.encoded_len()? + mgf_tagged.encoded_len()?)?;
        let sum = (sum + salt_tagged.encoded_len()?)?;
        sum + trailer_tagged.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        explicit(TAG_HASH_ALGORITHM, &self.hash_algorithm.clone().to_any_id())?.encode(writer)?;
        explicit(TAG_MASK_GEN_ALGORITHM, &self.mask_gen_algorithm.to_any_id())?.encode(writer)?;
        ContextSpecific {
            tag_number: TAG_SALT_LENGTH,
            tag_mode:   TagMode::Explicit,
            value:      self.salt_length.clone(),
        }
        .encode(writer)?;
        ContextSpecific {
            tag_number: TAG_TRAILER_FIELD,
            tag_mode:   TagMode::Explicit,
            value:      self.trailer_field.clone(),
        }
        .encode(writer)
    }
}

fn explicit(tag_number: TagNumber, value: &AnyAlgorithmIdentifier) -> Result<ContextSpecific<AnyAlgorithmIdentifier>> {
    Ok(ContextSpecific {
        tag_number,
        tag_mode: TagMode::Explicit,
        value: value.clone(),
    })
}

impl<'a> DecodeValue<'a> for RsaPssParameters {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: der::Header) -> Result<Self> {
        reader.read_nested(header.length, |nested| {
            let hash_algorithm = ContextSpecific::<AnyAlgorithmIdentifier>::decode_explicit(
                nested,
                TAG_HASH_ALGORITHM,
            )?
            .map(|cs| cs.value)
            .map(DigestAlgorithmIdentifier::try_from)
            .transpose()?
            .unwrap_or_else(default_sha1);
            let mask_gen_algorithm = ContextSpecific::<AnyAlgorithmIdentifier>::decode_explicit(
                nested,
                TAG_MASK_GEN_ALGORITHM,
            )?
            .map(|cs| MaskGenAlgorithm::try_from(cs.value))
            .transpose()?
            .unwrap_or_else(|| MaskGenAlgorithm::Sha1(default_sha1()));
            let salt_length = ContextSpecific::<Int>::decode_explicit(nested, TAG_SALT_LENGTH)?
                .map(|cs| cs.value)
                .unwrap_or_else(int_20);
            let trailer_field = ContextSpecific::<Int>::decode_explicit(nested, TAG_TRAILER_FIELD)?
                .map(|cs| cs.value)
                .unwrap_or_else(int_1);
            Ok(Self {
                hash_algorithm,
                mask_gen_algorithm,
                salt_length,
                trailer_field,
            })
        })
    }
}

impl DigestAlgorithmIdentifier {
    fn to_any_id(&self) -> AnyAlgorithmIdentifier {
        AnyAlgorithmIdentifier {
            algorithm:  self.oid(),
            parameters: None,
        }
    }
}

impl TryFrom<AnyAlgorithmIdentifier> for DigestAlgorithmIdentifier {
    type Error = der::Error;

    fn try_from(any: AnyAlgorithmIdentifier) -> Result<Self> {
        Self::try_from(&any)
    }
}

impl MaskGenAlgorithm {
    fn to_any_id(&self) -> AnyAlgorithmIdentifier {
        match self {
            Self::Sha1(_) => AnyAlgorithmIdentifier {
                algorithm:  ID_MGF1,
                parameters: None,
            },
            Self::Sha256(_) | Self::Sha384(_) | Self::Sha512(_) => AnyAlgorithmIdentifier {
                algorithm:  ID_MGF1,
                parameters: None,
            },
            Self::Unknown(any) => any.clone(),
        }
    }
}

impl TryFrom<AnyAlgorithmIdentifier> for MaskGenAlgorithm {
    type Error = der::Error;

    fn try_from(any: AnyAlgorithmIdentifier) -> Result<Self> {
        if any.algorithm != ID_MGF1 {
            return Ok(Self::Unknown(any));
        }
        let inner = any
            .parameters
            .as_ref()
            .ok_or_else(|| {
                der::Error::new(
                    der::ErrorKind::TagUnexpected {
                        expected: Some(der::Tag::Sequence),
                        actual:   der::Tag::Null,
                    },
                    der::Length::ZERO,
                )
            })?
            .decode_as::<AnyAlgorithmIdentifier>()?;
        let digest = DigestAlgorithmIdentifier::try_from(&inner)?;
        Ok(match &digest {
            DigestAlgorithmIdentifier::Sha1(_) => Self::Sha1(digest),
            DigestAlgorithmIdentifier::Sha256(_) => Self::Sha256(digest),
            DigestAlgorithmIdentifier::Sha384(_) => Self::Sha384(digest),
            DigestAlgorithmIdentifier::Sha512(_) => Self::Sha512(digest),
            DigestAlgorithmIdentifier::Unknown(_) => Self::Unknown(any),
        })
    }
}

impl Sequence<'_> for SignatureAlgorithmIdentifier {}

impl ValueOrd for SignatureAlgorithmIdentifier {
    fn value_cmp(&self, other: &Self) -> Result<Ordering> {
        Ok(self.to_der()?.as_slice().cmp(other.to_der()?.as_slice()))
    }
}

impl EncodeValue for SignatureAlgorithmIdentifier {
    fn value_len(&self) -> Result<Length> {
        match self {
            Self::RsaPkcs1V15(digest) => oid_for_pkcs1(digest)?.encoded_len()? + der::asn1::Null.encoded_len()?,
            Self::RsaPss(params) => ID_RSASSA_PSS.encoded_len()? + params.encoded_len()?,
            Self::Ecdsa(digest) => oid_for_ecdsa(digest)?.encoded_len()?,
            Self::Unknown(any) => any.value_len(),
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        match self {
            Self::RsaPkcs1V15(digest) => {
                oid_for_pkcs1(digest)?.encode(writer)?;
                der::asn1::Null.encode(writer)
            }
            Self::RsaPss(params) => {
                ID_RSASSA_PSS.encode(writer)?;
                params.encode(writer)
            }
            Self::Ecdsa(digest) => oid_for_ecdsa(digest)?.encode(writer),
            Self::Unknown(any) => any.encode(writer),
        }
    }
}

fn unsupported_digest_error() -> der::Error {
    der::Error::new(
        der::ErrorKind::OidUnknown {
            oid: der::asn1::ObjectIdentifier::new_unwrap("0.0"),
        },
        der::Length::ZERO,
    )
}

fn oid_for_pkcs1(digest: &DigestAlgorithmIdentifier) -> Result<Oid> {
    Ok(match digest {
        DigestAlgorithmIdentifier::Sha1(_) => ID_SHA1_WITH_RSA_ENCRYPTION,
        DigestAlgorithmIdentifier::Sha256(_) => ID_SHA256_WITH_RSA_ENCRYPTION,
        DigestAlgorithmIdentifier::Sha384(_) => ID_SHA384_WITH_RSA_ENCRYPTION,
        DigestAlgorithmIdentifier::Sha512(_) => ID_SHA512_WITH_RSA_ENCRYPTION,
        DigestAlgorithmIdentifier::Unknown(_) => return Err(unsupported_digest_error()),
    })
}

fn oid_for_ecdsa(digest: &DigestAlgorithmIdentifier) -> Result<Oid> {
    Ok(match digest {
        DigestAlgorithmIdentifier::Sha256(_) => ID_ECDSA_WITH_SHA256,
        DigestAlgorithmIdentifier::Sha384(_) => ID_ECDSA_WITH_SHA384,
        DigestAlgorithmIdentifier::Sha512(_) => ID_ECDSA_WITH_SHA512,
        _ => return Err(unsupported_digest_error()),
    })
}

impl<'a> DecodeValue<'a> for SignatureAlgorithmIdentifier {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: der::Header) -> Result<Self> {
        reader.read_nested(header.length, |nested| {
            let oid = Oid::decode(nested)?;
            Ok(match oid {
                ID_SHA1_WITH_RSA_ENCRYPTION => {
                    der::asn1::Null::decode(nested)?;
                    Self::RsaPkcs1V15(DigestAlgorithmIdentifier::Sha1(DigestAlgorithmParameters::Null))
                }
                ID_SHA256_WITH_RSA_ENCRYPTION => {
                    der::asn1::Null::decode(nested)?;
                    Self::RsaPkcs1V15(DigestAlgorithmIdentifier::Sha256(DigestAlgorithmParameters::Null))
                }
                ID_SHA384_WITH_RSA_ENCRYPTION => {
                    der::asn1::Null::decode(nested)?;
                    Self::RsaPkcs1V15(DigestAlgorithmIdentifier::Sha384(DigestAlgorithmParameters::Null))
                }
                ID_SHA512_WITH_RSA_ENCRYPTION => {
                    der::asn1::Null::decode(nested)?;
                    Self::RsaPkcs1V15(DigestAlgorithmIdentifier::Sha512(DigestAlgorithmParameters::Null))
                }
                ID_RSASSA_PSS => Self::RsaPss(RsaPssParameters::decode(nested)?),
                ID_ECDSA_WITH_SHA256 => Self::Ecdsa(DigestAlgorithmIdentifier::Sha256(DigestAlgorithmParameters::Absent)),
                ID_ECDSA_WITH_SHA384 => Self::Ecdsa(DigestAlgorithmIdentifier::Sha384(DigestAlgorithmParameters::Absent)),
                ID_ECDSA_WITH_SHA512 => Self::Ecdsa(DigestAlgorithmIdentifier::Sha512(DigestAlgorithmParameters::Absent)),
                _ => Self::Unknown(AnyAlgorithmIdentifier {
                    algorithm:  oid,
                    parameters: Option::<der::Any>::decode(nested)?,
                }),
            })
        })
    }
}

impl TryFrom<&spki::AlgorithmIdentifierOwned> for SignatureAlgorithmIdentifier {
    type Error = der::Error;

    fn try_from(algo: &spki::AlgorithmIdentifierOwned) -> Result<Self> {
        let der = algo.to_der()?;
        Self::from_der(&der)
    }
}
