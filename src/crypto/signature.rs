//! Generic signature verification entry point (§4.4), dispatching on the
//! subject public key's algorithm and the declared signature algorithm.

use {
    super::{ecdsa::EcPublicKey, rsa::RsaPublicKey},
    crate::{
        asn1::{public_key_info::SubjectPublicKeyInfo, SignatureAlgorithmIdentifier},
        error::PkdError,
    },
    ruint::Uint,
};

/// Verify `signature` over `message` (the exact bytes that were signed —
/// for CMS that's the re-encoded `signedAttrs`, not the eContent) under the
/// given public key and signature algorithm.
pub fn verify_signature(
    pubkey: &SubjectPublicKeyInfo,
    algo: &SignatureAlgorithmIdentifier,
    message: &[u8],
    signature: &[u8],
) -> Result<(), PkdError> {
    match pubkey {
        SubjectPublicKeyInfo::Rsa(key) => {
            verify_rsa(key, pubkey, algo, message, signature)
        }
        SubjectPublicKeyInfo::Ec(_) => {
            let digest = algo
                .digest()
                .cloned()
                .ok_or_else(|| PkdError::UnsupportedAlgorithm(unknown_oid()))?;
            if !matches!(algo, SignatureAlgorithmIdentifier::Ecdsa(_)) {
                return Err(PkdError::UnsupportedAlgorithm(unknown_oid()));
            }
            let hash = digest.hash_bytes(message);
            EcPublicKey::from_spki(pubkey)?.verify(&hash, signature)
        }
        SubjectPublicKeyInfo::Unknown(any) => {
            Err(PkdError::UnsupportedAlgorithm(any.algorithm.algorithm))
        }
    }
}

/// RSA moduli seen in deployed DSCs/CSCAs range from 1024 (legacy, SHA-1
/// deviation territory) to 4096 bits; dispatch on bit length since the ring
/// arithmetic is sized by const generics.
fn verify_rsa(
    key: &crate::asn1::public_key_info::RsaPublicKeyInfo,
    _pubkey: &SubjectPublicKeyInfo,
    algo: &SignatureAlgorithmIdentifier,
    message: &[u8],
    signature: &[u8],
) -> Result<(), PkdError> {
    let bits = key.modulus.as_bytes().len() * 8;
    macro_rules! try_size {
        ($bits:literal, $limbs:literal) => {
            if bits <= $bits {
                let rsa_pubkey = RsaPublicKey::<Uint<$bits, $limbs>>::try_from(
                    &SubjectPublicKeyInfo::Rsa(key.clone()),
                )?;
                return rsa_pubkey.verify(message, signature, algo);
            }
        };
    }
    try_size!(1024, 16);
    try_size!(2048, 32);
    try_size!(3072, 48);
    try_size!(4096, 64);
    Err(PkdError::CertMalformed(format!(
        "unsupported RSA modulus size {bits} bits"
    )))
}

fn unknown_oid() -> der::asn1::ObjectIdentifier {
    der::asn1::ObjectIdentifier::new_unwrap("0.0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_algorithm() {
        let oid = unknown_oid();
        assert_eq!(oid.to_string(), "0.0");
    }
}
