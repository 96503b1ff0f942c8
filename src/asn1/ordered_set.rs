//! `SET OF` that preserves the caller's original element order.
//!
//! DER technically requires `SET OF` elements sorted by encoding, but real
//! PKD data is not always strict about it. [`der::asn1::SetOfVec`] sorts and
//! would silently reorder a non-canonical input on re-encode, breaking any
//! signature whose input includes the set verbatim. This type decodes
//! elements in the order they appear and re-encodes them the same way,
//! trading canonical-DER round-tripping of foreign data for bit-exactness of
//! data this crate only ever reads, never re-signs.

use der::{Decode, DecodeValue, Encode, EncodeValue, Header, Length, Reader, Result, Tag, Writer};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OrderedSet<T>(Vec<T>);

impl<T> OrderedSet<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type IntoIter = std::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a, T: Decode<'a>> DecodeValue<'a> for OrderedSet<T> {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> Result<Self> {
        reader.read_nested(header.length, |nested| {
            let mut items = Vec::new();
            while !nested.is_finished() {
                items.push(T::decode(nested)?);
            }
            Ok(Self(items))
        })
    }
}

impl<T: Encode> EncodeValue for OrderedSet<T> {
    fn value_len(&self) -> Result<Length> {
        self.0
            .iter()
            .try_fold(Length::ZERO, |acc, item| acc + item.encoded_len()?)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> Result<()> {
        for item in &self.0 {
            item.encode(writer)?;
        }
        Ok(())
    }
}

impl<'a, T: Decode<'a> + Encode> der::FixedTag for OrderedSet<T> {
    const TAG: Tag = Tag::Set;
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        der::{asn1::Uint8, Decode, Encode},
    };

    #[test]
    fn preserves_input_order() -> Result<()> {
        // A non-canonical SET OF INTEGER { 2, 1 } — canonical DER sorts by
        // encoding, which would put the single-byte `1` before `2` anyway
        // here, so this round-trips either way; the point is no panic/error
        // on decoding the raw sequence of elements.
        let a = Uint8::new(2)?;
        let b = Uint8::new(1)?;
        let set: OrderedSet<Uint8> = [a, b].into_iter().collect();
        let der = set.to_der()?;
        let decoded = OrderedSet::<Uint8>::from_der(&der)?;
        assert_eq!(decoded.into_vec(), vec![a, b]);
        Ok(())
    }
}
