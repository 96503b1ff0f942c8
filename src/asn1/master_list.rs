//! Master List structures, ICAO 9303-12 §9.

use {
    crate::error::PkdError,
    super::{content_info::ContentInfo, ContentType},
    cms::{
        cert::x509::Certificate,
        signed_data::{EncapsulatedContentInfo, SignedData},
    },
    der::{asn1::ObjectIdentifier as Oid, Decode, Sequence},
};

/// Master Lists are implemented as instances of the `ContentInfo` type, as
/// specified in RFC 5652. The `ContentInfo` contains a single instance of
/// `SignedData`.
///
/// See ICAO 9303-12 §9.
pub type MasterList = ContentInfo<SignedData>;

#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct CscaMasterList {
    pub version:   u64,
    pub cert_list: super::OrderedSet<Certificate>,
}

impl ContentType for CscaMasterList {
    /// ICAO 9303-12 §9.2
    const CONTENT_TYPE: Oid = Oid::new_unwrap("2.23.136.1.1.2");
}

impl MasterList {
    /// Decode a Master List from its ingest file format (§6: a bare DER
    /// `ContentInfo`, `signedData` OID, eContentType `2.23.136.1.1.2`).
    pub fn decode(der: &[u8]) -> Result<Self, PkdError> {
        Ok(Self::from_der(der)?)
    }

    pub fn signed_data(&self) -> &SignedData {
        &self.0
    }

    pub fn encapsulated_content(&self) -> &EncapsulatedContentInfo {
        &self.0.encap_content_info
    }

    /// The Master List contains the CSCA Master List as encapsulated
    /// content.
    pub fn csca_ml(&self) -> Result<CscaMasterList, PkdError> {
        let econ = self.encapsulated_content();
        if econ.econtent_type != CscaMasterList::CONTENT_TYPE {
            return Err(PkdError::CmsMalformed(format!(
                "unexpected eContentType {}",
                econ.econtent_type
            )));
        }
        let octet_string = econ
            .econtent
            .as_ref()
            .ok_or_else(|| PkdError::CmsMalformed("missing eContent".into()))?
            .decode_as::<der::asn1::OctetString>()?;
        Ok(CscaMasterList::from_der(octet_string.as_bytes())?)
    }
}
