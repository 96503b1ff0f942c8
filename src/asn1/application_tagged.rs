//! A value wrapped in an ASN.1 `[APPLICATION n]` constructed tag.
//!
//! Several Doc 9303 file formats wrap an otherwise ordinary DER value in an
//! application-class tag identifying the elementary file it came from (e.g.
//! EF.SOD is `[APPLICATION 23]` around a `ContentInfo`). The wrapper carries
//! no semantic content of its own, so it round-trips transparently.

use der::{
    DecodeValue, Decode, Encode, EncodeValue, FixedTag, Header, Length, Reader, Result, Tag,
    TagMode, TagNumber, Writer,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicationTagged<const N: u8, T>(pub T);

impl<const N: u8, T> ApplicationTagged<N, T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<const N: u8, T> FixedTag for ApplicationTagged<N, T> {
    const TAG: Tag = Tag::Application {
        constructed: true,
        number: TagNumber::new(N as u16),
    };
}

impl<'a, const N: u8, T: Decode<'a>> DecodeValue<'a> for ApplicationTagged<N, T> {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> Result<Self> {
        reader.read_nested(header.length, |nested| T::decode(nested).map(Self))
    }
}

impl<const N: u8, T: Encode> EncodeValue for ApplicationTagged<N, T> {
    fn value_len(&self) -> Result<Length> {
        self.0.encoded_len()
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        self.0.encode(writer)
    }
}

/// Decodes a value that may or may not be wrapped in the given application
/// tag, preferring the untagged form (the common case for PKD ingest, where
/// files are bare `ContentInfo` rather than elementary-file dumps).
pub fn decode_optionally_tagged<'a, const N: u8, T: Decode<'a> + Clone>(
    der: &'a [u8],
) -> Result<T> {
    match T::from_der(der) {
        Ok(value) => Ok(value),
        Err(_) => ApplicationTagged::<N, T>::from_der(der).map(ApplicationTagged::into_inner),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        der::{asn1::OctetString, Decode, Encode},
    };

    #[test]
    fn round_trips_application_tag() -> Result<()> {
        let inner = OctetString::new(vec![1, 2, 3])?;
        let tagged: ApplicationTagged<23, OctetString> = ApplicationTagged(inner.clone());
        let der = tagged.to_der()?;
        let decoded = ApplicationTagged::<23, OctetString>::from_der(&der)?;
        assert_eq!(decoded.0, inner);
        Ok(())
    }
}
