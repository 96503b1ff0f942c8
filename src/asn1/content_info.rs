//! RFC 5652 `ContentInfo`, generic over its inner content type.
//!
//! `ContentInfo ::= SEQUENCE { contentType OBJECT IDENTIFIER, content [0]
//! EXPLICIT ANY DEFINED BY contentType }`. Each concrete content (`SignedData`,
//! `CscaMasterList`, `LdsSecurityObject`, ...) names its own OID via
//! [`ContentType`], so the wrapper can validate it on decode instead of
//! trusting the caller.

use der::{
    asn1::{ContextSpecific, ObjectIdentifier as Oid},
    Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Result, Sequence, TagMode,
    TagNumber, Writer,
};

/// A content type that knows its own `ContentInfo.contentType` OID.
pub trait ContentType {
    const CONTENT_TYPE: Oid;
}

impl ContentType for cms::signed_data::SignedData {
    /// `id-signedData`, RFC 5652 §5.
    const CONTENT_TYPE: Oid = Oid::new_unwrap("1.2.840.113549.1.7.2");
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentInfo<T>(pub T);

impl<T> ContentInfo<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<'a, T: ContentType + Decode<'a>> DecodeValue<'a> for ContentInfo<T> {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> Result<Self> {
        reader.read_nested(header.length, |nested| {
            let oid = Oid::decode(nested)?;
            if oid != T::CONTENT_TYPE {
                return Err(der::ErrorKind::OidUnknown { oid }.into());
            }
            let content = ContextSpecific::<T>::decode_explicit(nested, TagNumber::N0)?
                .ok_or_else(|| der::ErrorKind::Incomplete {
                    expected_len: Length::ZERO,
                    actual_len:   Length::ZERO,
                })?
                .value;
            Ok(Self(content))
        })
    }
}

impl<T: ContentType + Encode + Clone> EncodeValue for ContentInfo<T> {
    fn value_len(&self) -> Result<Length> {
        let content = ContextSpecific {
            tag_number: TagNumber::N0,
            tag_mode:   TagMode::Explicit,
            value:      self.0.clone(),
        };
        T::CONTENT_TYPE.encoded_len()? + content.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        T::CONTENT_TYPE.encode(writer)?;
        let content = ContextSpecific {
            tag_number: TagNumber::N0,
            tag_mode:   TagMode::Explicit,
            value:      self.0.clone(),
        };
        content.encode(writer)
    }
}

impl<'a, T: ContentType + Decode<'a> + Encode + Clone> Sequence<'a> for ContentInfo<T> {}
