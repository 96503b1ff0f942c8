//! Cryptographic primitives this crate verifies signatures with.
//!
//! Primarily based on TR-03111 for the elliptic-curve arithmetic. Signing is
//! intentionally out of scope everywhere in this module — Passive
//! Authentication only ever checks signatures made by someone else.

pub mod ecdsa;
pub mod groups;
pub mod mod_ring;
pub mod named_fields;
pub mod rsa;
pub mod signature;

use rand::{CryptoRng, RngCore};

/// Marker trait for RNGs this crate accepts — kept generic over `rand`'s RNG
/// traits so call sites don't need to know the concrete RNG type.
pub trait CryptoCoreRng: CryptoRng + RngCore {}

impl<T> CryptoCoreRng for T where T: CryptoRng + RngCore {}
