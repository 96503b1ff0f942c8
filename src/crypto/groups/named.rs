//! Named elliptic curve groups used by ICAO 9303 DSCs: the NIST P-curves and
//! the Brainpool curves (RFC 5639), all of prime order (cofactor 1).

use {
    super::EllipticCurve,
    crate::crypto::{
        mod_ring::UintMont,
        named_fields::{CURVE_1, CURVE_2, CURVE_3, CURVE_4, CURVE_5},
    },
};

type U192 = ruint::aliases::U192;
type U224 = ruint::Uint<224, 4>;
type U256 = ruint::aliases::U256;
type U384 = ruint::aliases::U384;
type U521 = ruint::Uint<521, 9>;

pub fn secp192r1() -> EllipticCurve<U192, U192> {
    EllipticCurve::new(
        CURVE_1.modulus,
        CURVE_1.param_a,
        CURVE_1.param_b,
        CURVE_1.generator.0,
        CURVE_1.generator.1,
        CURVE_1.order,
        U192::from_u64(1),
    )
    .expect("secp192r1 parameters are valid")
}

pub fn secp224r1() -> EllipticCurve<U224, U224> {
    EllipticCurve::new(
        CURVE_2.modulus,
        CURVE_2.param_a,
        CURVE_2.param_b,
        CURVE_2.generator.0,
        CURVE_2.generator.1,
        CURVE_2.order,
        U224::from_u64(1),
    )
    .expect("secp224r1 parameters are valid")
}

pub fn secp256r1() -> EllipticCurve<U256, U256> {
    EllipticCurve::new(
        CURVE_3.modulus,
        CURVE_3.param_a,
        CURVE_3.param_b,
        CURVE_3.generator.0,
        CURVE_3.generator.1,
        CURVE_3.order,
        U256::from_u64(1),
    )
    .expect("secp256r1 parameters are valid")
}

pub fn secp384r1() -> EllipticCurve<U384, U384> {
    EllipticCurve::new(
        CURVE_4.modulus,
        CURVE_4.param_a,
        CURVE_4.param_b,
        CURVE_4.generator.0,
        CURVE_4.generator.1,
        CURVE_4.order,
        U384::from_u64(1),
    )
    .expect("secp384r1 parameters are valid")
}

pub fn secp521r1() -> EllipticCurve<U521, U521> {
    EllipticCurve::new(
        CURVE_5.modulus,
        CURVE_5.param_a,
        CURVE_5.param_b,
        CURVE_5.generator.0,
        CURVE_5.generator.1,
        CURVE_5.order,
        U521::from_u64(1),
    )
    .expect("secp521r1 parameters are valid")
}

pub fn brainpool_p256r1() -> EllipticCurve<U256, U256> {
    use crate::crypto::named_fields::CURVE_6;
    EllipticCurve::new(
        CURVE_6.modulus,
        CURVE_6.param_a,
        CURVE_6.param_b,
        CURVE_6.generator.0,
        CURVE_6.generator.1,
        CURVE_6.order,
        U256::from_u64(1),
    )
    .expect("brainpoolP256r1 parameters are valid")
}

pub fn brainpool_p384r1() -> EllipticCurve<U384, U384> {
    use crate::crypto::named_fields::CURVE_7;
    EllipticCurve::new(
        CURVE_7.modulus,
        CURVE_7.param_a,
        CURVE_7.param_b,
        CURVE_7.generator.0,
        CURVE_7.generator.1,
        CURVE_7.order,
        U384::from_u64(1),
    )
    .expect("brainpoolP384r1 parameters are valid")
}

