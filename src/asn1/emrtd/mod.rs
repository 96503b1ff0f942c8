//! Shared Logical Data Structure (LDS) types from ICAO 9303-10 §4.6.2.3.

use der::asn1::{ObjectIdentifier as Oid, OctetString, PrintableString};
use der::Sequence;

use super::ContentType;

/// ICAO-9303-10 4.6.2.3
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct LdsSecurityObject {
    pub version:                u64,
    pub hash_algorithm:         super::DigestAlgorithmIdentifier,
    pub data_group_hash_values: Vec<DataGroupHash>,
    pub lds_version_info:       Option<LdsVersionInfo>,
}

/// ICAO-9303-10 4.6.2.3
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct LdsVersionInfo {
    pub lds_version:     PrintableString,
    pub unicode_version: PrintableString,
}

/// ICAO-9303-10 4.6.2.3
#[derive(Clone, Debug, PartialEq, Eq, Sequence)]
pub struct DataGroupHash {
    pub data_group_number: u64,
    pub hash_value:        OctetString,
}

impl ContentType for LdsSecurityObject {
    /// ICAO-9303-10 4.6.2.3
    const CONTENT_TYPE: Oid = Oid::new_unwrap("2.23.136.1.1.1");
}

impl LdsSecurityObject {
    pub fn hash_for_dg(&self, dg_number: u8) -> Option<&[u8]> {
        self.data_group_hash_values
            .iter()
            .find(|entry| entry.data_group_number == dg_number as u64)
            .map(|entry| entry.hash_value.as_bytes())
    }
}
