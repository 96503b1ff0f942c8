//! RSA signature verification.
//!
//! To *not* do: signing. This stays verify-only — RSA is a minefield of
//! pitfalls for anyone rolling their own signer. See e.g.
//! https://blog.trailofbits.com/2019/07/08/fuck-rsa

use {
    super::mod_ring::{ModRing, ModRingElementRef, RingRefExt, UintMont},
    crate::{
        asn1::{
            public_key_info::SubjectPublicKeyInfo,
            signature_algorithm_identifier::{RsaPssParameters, SignatureAlgorithmIdentifier},
            DigestAlgorithmIdentifier,
        },
        error::PkdError,
    },
    ruint::Uint,
    subtle::ConstantTimeEq,
};

#[derive(Clone, Debug)]
pub struct RsaPublicKey<U: UintMont> {
    ring:            ModRing<U>,
    public_exponent: U,
}

impl<U: UintMont> RsaPublicKey<U> {
    pub fn ring(&self) -> &ModRing<U> {
        &self.ring
    }

    /// Verify `signature` against `message` under `algo`, per §4.4.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        algo: &SignatureAlgorithmIdentifier,
    ) -> Result<(), PkdError> {
        match algo {
            SignatureAlgorithmIdentifier::RsaPkcs1V15(digest) => {
                self.verify_pkcs1v15(message, signature, digest)
            }
            SignatureAlgorithmIdentifier::RsaPss(params) => {
                self.verify_pss(message, signature, params)
            }
            _ => Err(PkdError::UnsupportedAlgorithm(algo_oid(algo))),
        }
    }

    fn modulus_byte_len(&self) -> usize {
        (self.ring.modulus().bit_len() + 7) / 8
    }

    fn raw_verify(&self, signature: &[u8]) -> Result<Vec<u8>, PkdError> {
        let modulus_len = self.modulus_byte_len();
        if signature.len() > modulus_len {
            return Err(PkdError::SigInvalid);
        }
        let sig_elem = self.ring.from(U::from_be_bytes(signature));
        let expected_elem = sig_elem.pow_ct(self.public_exponent);
        let mut bytes = expected_elem.to_uint().to_be_bytes();
        while bytes.len() < modulus_len {
            bytes.insert(0, 0);
        }
        Ok(bytes)
    }

    /// RFC 8017 §9.2 EMSA-PKCS1-v1_5 verification.
    fn verify_pkcs1v15(
        &self,
        message: &[u8],
        signature: &[u8],
        digest: &DigestAlgorithmIdentifier,
    ) -> Result<(), PkdError> {
        let em = self.raw_verify(signature)?;
        let hash = digest.hash_bytes(message);
        let expected = pkcs1v15_encode(digest, &hash, self.modulus_byte_len())?;
        if bool::from(em.ct_eq(&expected)) {
            Ok(())
        } else {
            Err(PkdError::SigInvalid)
        }
    }

    /// RFC 8017 §9.1 EMSA-PSS verification.
    fn verify_pss(
        &self,
        message: &[u8],
        signature: &[u8],
        params: &RsaPssParameters,
    ) -> Result<(), PkdError> {
        let digest_algo = &params.hash_algorithm;
        let salt_len = int_to_usize(&params.salt_length);
        let trailer_field = int_to_usize(&params.trailer_field);
        if trailer_field != 1 {
            return Err(PkdError::SigInvalid);
        }

        let ring_bit_len = self.ring.modulus().bit_len();
        let em_bytes = self.raw_verify(signature)?;
        let em_len = em_bytes.len();

        if *em_bytes.last().unwrap_or(&0) != 0xbc {
            return Err(PkdError::SigInvalid);
        }

        let hash_len = digest_algo.hash_bytes(&[]).len();
        if em_len < hash_len + salt_len + 2 {
            return Err(PkdError::SigInvalid);
        }
        let db_len = em_len - hash_len - 1;
        let db = &em_bytes[..db_len];
        let h = &em_bytes[db_len..db_len + hash_len];

        let mgf_digest = params
            .mask_gen_algorithm
            .digest()
            .ok_or(PkdError::UnsupportedAlgorithm(
                crate::asn1::signature_algorithm_identifier::ID_MGF1,
            ))?;
        let mgf_mask = mgf1(mgf_digest, h, db_len);
        let mut db_unmasked: Vec<u8> = db.iter().zip(&mgf_mask).map(|(a, b)| a ^ b).collect();

        let em_bits = ring_bit_len - 1;
        let top_mask = 0xffu8 >> (8 * em_len - em_bits);
        db_unmasked[0] &= top_mask;

        let salt_start = db_len - salt_len;
        let one_pos = (0..salt_start)
            .rev()
            .find(|&i| db_unmasked[i] != 0x00)
            .filter(|&i| db_unmasked[i] == 0x01)
            .ok_or(PkdError::SigInvalid)?;
        if db_unmasked[..one_pos].iter().any(|&b| b != 0) {
            return Err(PkdError::SigInvalid);
        }

        let salt = &db_unmasked[one_pos + 1..];
        if salt.len() != salt_len {
            return Err(PkdError::SigInvalid);
        }

        let message_hash = digest_algo.hash_bytes(message);
        let mut pre_data = vec![0u8; 8];
        pre_data.extend_from_slice(&message_hash);
        pre_data.extend_from_slice(salt);
        let h_prime = digest_algo.hash_bytes(&pre_data);

        if bool::from(h.ct_eq(&h_prime)) {
            Ok(())
        } else {
            Err(PkdError::SigInvalid)
        }
    }
}

fn int_to_usize(value: &der::asn1::Int) -> usize {
    value
        .as_bytes()
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize)
}

/// RFC 8017 §9.2 step 3: the DigestInfo prefix carries the digest algorithm's
/// `AlgorithmIdentifier`, so each hash has a fixed DER prefix.
fn pkcs1v15_encode(
    digest: &DigestAlgorithmIdentifier,
    hash: &[u8],
    em_len: usize,
) -> Result<Vec<u8>, PkdError> {
    use der::Encode;
    let digest_info = DigestInfo {
        algorithm: digest.clone(),
        digest:    der::asn1::OctetString::new(hash.to_vec()).map_err(|_| PkdError::SigInvalid)?,
    }
    .to_der()
    .map_err(|_| PkdError::SigInvalid)?;
    if em_len < digest_info.len() + 11 {
        return Err(PkdError::SigInvalid);
    }
    let ps_len = em_len - digest_info.len() - 3;
    let mut em = Vec::with_capacity(em_len);
    em.push(0x00);
    em.push(0x01);
    em.extend(std::iter::repeat(0xffu8).take(ps_len));
    em.push(0x00);
    em.extend_from_slice(&digest_info);
    Ok(em)
}

#[derive(der::Sequence)]
struct DigestInfo {
    algorithm: DigestAlgorithmIdentifier,
    digest:    der::asn1::OctetString,
}

fn mgf1(digest_alg: &DigestAlgorithmIdentifier, seed: &[u8], out_len: usize) -> Vec<u8> {
    let mut mask = Vec::new();
    let mut counter: u32 = 0;
    while mask.len() < out_len {
        let mut data = Vec::with_capacity(seed.len() + 4);
        data.extend_from_slice(seed);
        data.extend_from_slice(&counter.to_be_bytes());
        mask.extend_from_slice(&digest_alg.hash_bytes(&data));
        counter += 1;
    }
    mask.truncate(out_len);
    mask
}

fn algo_oid(algo: &SignatureAlgorithmIdentifier) -> der::asn1::ObjectIdentifier {
    algo.digest()
        .map(DigestAlgorithmIdentifier::oid)
        .unwrap_or(der::asn1::ObjectIdentifier::new_unwrap("0.0"))
}

impl<const B: usize, const L: usize> TryFrom<&SubjectPublicKeyInfo> for RsaPublicKey<Uint<B, L>> {
    type Error = PkdError;

    fn try_from(info: &SubjectPublicKeyInfo) -> Result<Self, PkdError> {
        match info {
            SubjectPublicKeyInfo::Rsa(key) => {
                let modulus = Uint::<B, L>::try_from(key.modulus.clone())
                    .map_err(|_| PkdError::CertMalformed("RSA modulus out of range".into()))?;
                let public_exponent = Uint::<B, L>::try_from(key.public_exponent.clone())
                    .map_err(|_| PkdError::CertMalformed("RSA exponent out of range".into()))?;
                Ok(Self {
                    ring: ModRing::from_modulus(modulus),
                    public_exponent,
                })
            }
            _ => Err(PkdError::CertMalformed(
                "SubjectPublicKeyInfo is not RSA".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::asn1::{
            signature_algorithm_identifier::MaskGenAlgorithm, DigestAlgorithmParameters,
        },
        der::{asn1::Int, Decode},
        hex_literal::hex,
        ruint::Uint,
    };

    #[test]
    fn rsa_pss_known_vector() -> Result<(), PkdError> {
        let subject_public_key = hex!("30820122300d06092a864886f70d01010105000382010f003082010a0282010100a2b451a07d0aa5f96e455671513550514a8a5b462ebef717094fa1fee82224e637f9746d3f7cafd31878d80325b6ef5a1700f65903b469429e89d6eac8845097b5ab393189db92512ed8a7711a1253facd20f79c15e8247f3d3e42e46e48c98e254a2fe9765313a03eff8f17e1a029397a1fa26a8dce26f490ed81299615d9814c22da610428e09c7d9658594266f5c021d0fceca08d945a12be82de4d1ece6b4c03145b5d3495d4ed5411eb878daf05fd7afc3e09ada0f1126422f590975a1969816f48698bcbba1b4d9cae79d460d8f9f85e7975005d9bc22c4e5ac0f7c1a45d12569a62807d3b9a02e5a530e773066f453d1f5b4c2e9cf7820283f742b9d50203010001");
        let signature = hex!("68caf07e71ee654ffabf07d342fc4059deb4f7e5970746c423b1e8f668d5332275cc35eb61270aebd27855b1e80d59def47fe8882867fd33c2308c91976baa0b1df952caa78db4828ab81e79949bf145cbdfd1c4987ed036f81e8442081016f20fa4b587574884ca6f6045959ce3501ae7c02b1902ec1d241ef28dee356c0d30d28a950f1fbc683ee7d9aad26b048c13426fe3975d5638afeb5b9c1a99d162d3a5810e8b074d7a2eae2be52b577151f76e1f734b0a956ef4f22be64dc20a81ad1316e4f79dff5fc41fc08a20bc612283a88415d41595bfea66d59de7ac12e230f72244ad9905aef0ead3fa41ed70bf4218863d5f041292f2d14ce0a7271c6d36");
        let message = hex!("313233343030");
        let digest_algo = DigestAlgorithmIdentifier::Sha256(DigestAlgorithmParameters::Absent);
        let params = RsaPssParameters {
            hash_algorithm:     digest_algo.clone(),
            mask_gen_algorithm: MaskGenAlgorithm::Sha256(digest_algo),
            salt_length:        Int::new(&[32]).unwrap(),
            trailer_field:      Int::new(&[1]).unwrap(),
        };

        let pubkey_info = SubjectPublicKeyInfo::from_der(&subject_public_key)?;
        let pubkey = RsaPublicKey::<Uint<2048, 32>>::try_from(&pubkey_info)?;
        pubkey.verify_pss(&message, &signature, &params)
    }
}
