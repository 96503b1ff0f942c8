//! Security Object Document, ICAO 9303-10 §4.6.2.

use {
    crate::error::PkdError,
    super::{
        application_tagged::decode_optionally_tagged, content_info::ContentInfo,
        emrtd::LdsSecurityObject, ContentType,
    },
    cms::signed_data::{EncapsulatedContentInfo, SignedData, SignerInfo},
    der::{asn1::OctetString, Decode},
};

/// The on-chip elementary file tag for EF.SOD (ICAO 9303-10 §4.7.14).
const EF_SOD_APPLICATION_TAG: u8 = 23;

/// A parsed, but not yet verified, Security Object Document.
pub type Sod = ContentInfo<SignedData>;

impl Sod {
    /// Decode a SOD from its ingest file format: a bare `ContentInfo`, or
    /// one prefixed by the `[APPLICATION 23]` EF.SOD envelope (§6).
    pub fn decode(der: &[u8]) -> Result<Self, PkdError> {
        Ok(decode_optionally_tagged::<EF_SOD_APPLICATION_TAG, Self>(
            der,
        )?)
    }

    pub fn signed_data(&self) -> &SignedData {
        &self.0
    }

    pub fn encapsulated_content(&self) -> &EncapsulatedContentInfo {
        &self.0.encap_content_info
    }

    /// All `SignerInfo`s present; §4.7 requires exactly one.
    pub fn signer_infos(&self) -> &[SignerInfo] {
        self.signed_data().signer_infos.0.as_slice()
    }

    pub fn lds_security_object(&self) -> Result<LdsSecurityObject, PkdError> {
        let econ = self.encapsulated_content();
        if econ.econtent_type != LdsSecurityObject::CONTENT_TYPE {
            return Err(PkdError::CmsMalformed(format!(
                "unexpected eContentType {}",
                econ.econtent_type
            )));
        }
        let octet_string = econ
            .econtent
            .as_ref()
            .ok_or_else(|| PkdError::CmsMalformed("missing eContent".into()))?
            .decode_as::<OctetString>()?;
        Ok(LdsSecurityObject::from_der(octet_string.as_bytes())?)
    }
}
