//! ECDSA signature verification (SEC1 §4.1.4, FIPS 186-4 §6.4.2), dispatching
//! on the named curve carried by the `SubjectPublicKeyInfo`.

use {
    super::{
        groups::{named, EllipticCurve},
        mod_ring::{RingRefExt, UintExp, UintMont},
    },
    crate::{asn1::public_key_info::SubjectPublicKeyInfo, error::PkdError},
    der::{asn1::Int, Decode, Sequence},
    subtle::ConditionallySelectable,
};

/// `ECDSA-Sig-Value ::= SEQUENCE { r INTEGER, s INTEGER }` (RFC 3279 §2.2.3).
#[derive(Clone, Debug, Sequence)]
struct EcdsaSigValue {
    r: Int,
    s: Int,
}

/// A public key on one of the named curves this crate supports.
#[derive(Clone, Copy)]
pub enum EcPublicKey {
    P192(EllipticCurve<ruint::aliases::U192, ruint::aliases::U192>, (ruint::aliases::U192, ruint::aliases::U192)),
    P224(EllipticCurve<ruint::Uint<224, 4>, ruint::Uint<224, 4>>, (ruint::Uint<224, 4>, ruint::Uint<224, 4>)),
    P256(EllipticCurve<ruint::aliases::U256, ruint::aliases::U256>, (ruint::aliases::U256, ruint::aliases::U256)),
    P384(EllipticCurve<ruint::aliases::U384, ruint::aliases::U384>, (ruint::aliases::U384, ruint::aliases::U384)),
    P521(EllipticCurve<ruint::Uint<521, 9>, ruint::Uint<521, 9>>, (ruint::Uint<521, 9>, ruint::Uint<521, 9>)),
    BrainpoolP256r1(EllipticCurve<ruint::aliases::U256, ruint::aliases::U256>, (ruint::aliases::U256, ruint::aliases::U256)),
    BrainpoolP384r1(EllipticCurve<ruint::aliases::U384, ruint::aliases::U384>, (ruint::aliases::U384, ruint::aliases::U384)),
}

const ID_SECP192R1: der::asn1::ObjectIdentifier = der::asn1::ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.1");
const ID_SECP224R1: der::asn1::ObjectIdentifier = der::asn1::ObjectIdentifier::new_unwrap("1.3.132.0.33");
const ID_SECP256R1: der::asn1::ObjectIdentifier = der::asn1::ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const ID_SECP384R1: der::asn1::ObjectIdentifier = der::asn1::ObjectIdentifier::new_unwrap("1.3.132.0.34");
const ID_SECP521R1: der::asn1::ObjectIdentifier = der::asn1::ObjectIdentifier::new_unwrap("1.3.132.0.35");
const ID_BRAINPOOL_P256R1: der::asn1::ObjectIdentifier =
    der::asn1::ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.7");
const ID_BRAINPOOL_P384R1: der::asn1::ObjectIdentifier =
    der::asn1::ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.11");

fn unsupported_curve() -> PkdError {
    PkdError::UnsupportedAlgorithm(der::asn1::ObjectIdentifier::new_unwrap("0.0"))
}

impl EcPublicKey {
    /// Extract and curve-dispatch an EC public key from a `SubjectPublicKeyInfo`.
    ///
    /// Only named curves are supported; explicit curve parameters (seen on
    /// some non-ICAO eMRTDs) are rejected as unsupported rather than guessed
    /// at, since we'd otherwise have to trust unauthenticated domain
    /// parameters.
    pub fn from_spki(info: &SubjectPublicKeyInfo) -> Result<Self, PkdError> {
        use crate::asn1::public_key_info::ECAlgoParameters;

        let SubjectPublicKeyInfo::Ec(key) = info else {
            return Err(PkdError::CertMalformed("SubjectPublicKeyInfo is not EC".into()));
        };
        let ECAlgoParameters::NamedCurve(oid) = &key.params else {
            return Err(unsupported_curve());
        };
        let point = key
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| PkdError::CertMalformed("EC public key is not octet-aligned".into()))?;
        if point.first() != Some(&0x04) {
            return Err(PkdError::CertMalformed(
                "only uncompressed EC points are supported".into(),
            ));
        }
        let coords = &point[1..];
        let half = coords.len() / 2;
        let (x_bytes, y_bytes) = coords.split_at(half);

        macro_rules! curve {
            ($variant:ident, $factory:path, $uint:ty) => {
                Ok(Self::$variant(
                    $factory(),
                    (<$uint>::from_be_bytes(x_bytes), <$uint>::from_be_bytes(y_bytes)),
                ))
            };
        }

        match *oid {
            ID_SECP192R1 => curve!(P192, named::secp192r1, ruint::aliases::U192),
            ID_SECP224R1 => curve!(P224, named::secp224r1, ruint::Uint<224, 4>),
            ID_SECP256R1 => curve!(P256, named::secp256r1, ruint::aliases::U256),
            ID_SECP384R1 => curve!(P384, named::secp384r1, ruint::aliases::U384),
            ID_SECP521R1 => curve!(P521, named::secp521r1, ruint::Uint<521, 9>),
            ID_BRAINPOOL_P256R1 => curve!(BrainpoolP256r1, named::brainpool_p256r1, ruint::aliases::U256),
            ID_BRAINPOOL_P384R1 => curve!(BrainpoolP384r1, named::brainpool_p384r1, ruint::aliases::U384),
            _ => Err(PkdError::UnsupportedAlgorithm(*oid)),
        }
    }

    /// Verify a DER `ECDSA-Sig-Value` over a pre-computed message digest.
    pub fn verify(&self, message_hash: &[u8], signature: &[u8]) -> Result<(), PkdError> {
        let sig = EcdsaSigValue::from_der(signature).map_err(|_| PkdError::SigInvalid)?;
        match self {
            Self::P192(curve, point) => verify_on_curve(curve, *point, message_hash, &sig),
            Self::P224(curve, point) => verify_on_curve(curve, *point, message_hash, &sig),
            Self::P256(curve, point) => verify_on_curve(curve, *point, message_hash, &sig),
            Self::P384(curve, point) => verify_on_curve(curve, *point, message_hash, &sig),
            Self::P521(curve, point) => verify_on_curve(curve, *point, message_hash, &sig),
            Self::BrainpoolP256r1(curve, point) => verify_on_curve(curve, *point, message_hash, &sig),
            Self::BrainpoolP384r1(curve, point) => verify_on_curve(curve, *point, message_hash, &sig),
        }
    }
}

/// SEC1 §4.1.3 step 5: truncate a hash wider than the curve order down to
/// its leftmost `order_bits` bits.
fn bits_to_uint<V>(hash: &[u8], order_bits: usize) -> V
where
    V: UintMont + std::ops::Shr<usize, Output = V>,
{
    let hash_bits = hash.len() * 8;
    let value = V::from_be_bytes(hash);
    if hash_bits > order_bits {
        value >> (hash_bits - order_bits)
    } else {
        value
    }
}

fn verify_on_curve<T>(
    curve: &EllipticCurve<T, T>,
    point: (T, T),
    message_hash: &[u8],
    sig: &EcdsaSigValue,
) -> Result<(), PkdError>
where
    T: UintMont + ConditionallySelectable + UintExp + std::ops::Shr<usize, Output = T>,
{
    let base_field = curve.base_field();
    let scalar_field = curve.scalar_field();
    let order = scalar_field.modulus();

    let r_uint = T::from_be_bytes(sig.r.as_bytes());
    let s_uint = T::from_be_bytes(sig.s.as_bytes());
    if r_uint >= order || s_uint >= order || r_uint == T::from_u64(0) || s_uint == T::from_u64(0) {
        return Err(PkdError::SigInvalid);
    }

    let mut e_uint = bits_to_uint::<T>(message_hash, order.bit_len());
    if e_uint >= order {
        e_uint = e_uint.sub_mod(order, order);
    }

    let r = scalar_field.from(r_uint);
    let s = scalar_field.from(s_uint);
    let e = scalar_field.from(e_uint);

    let w = s.inv().ok_or(PkdError::SigInvalid)?;
    let u1 = e * w;
    let u2 = r * w;

    let x = base_field.from(point.0);
    let y = base_field.from(point.1);
    let public_point = curve
        .from_affine(x, y)
        .map_err(|_| PkdError::CertMalformed("EC public key point not on curve".into()))?;

    let q = curve.generator() * u1 + public_point * u2;
    let qx = q.x().ok_or(PkdError::SigInvalid)?;

    let mut qx_uint = qx.to_uint();
    if qx_uint >= order {
        qx_uint = qx_uint.sub_mod(order, order);
    }

    if qx_uint == r_uint {
        Ok(())
    } else {
        Err(PkdError::SigInvalid)
    }
}
