//! Montgomery parameters of the BN254 scalar field.
//!
//! The radix is `R = 2^280`, i.e. one bit past the five 56-bit limbs of
//! [`BigUint56`].

use crate::biguint::BigUint56;

pub use crate::biguint::BITS_PER_LIMB;
pub use crate::biguint::MAX_BITS;
pub use crate::biguint::MAX_BYTES;
pub use crate::biguint::NUM_LIMBS;

/// The prime
/// `p = 21888242871839275222246405745257275088548364400416034343698204186575808495617`.
pub const MODULUS: BigUint56 = BigUint56::from_limbs([
    0xe1f593f0000001,
    0xe84879b9709143,
    0xb68181585d2833,
    0xe131a029b85045,
    0x30644e72,
]);

/// `p - 2`, the Fermat inversion exponent.
pub const MODULUS_MINUS_TWO: BigUint56 = BigUint56::from_limbs([
    0xe1f593efffffff,
    0xe84879b9709143,
    0xb68181585d2833,
    0xe131a029b85045,
    0x30644e72,
]);

/// `R = 2^280 mod p`, the Montgomery image of one.
pub const R: BigUint56 = BigUint56::from_limbs([
    0xa771fc5ab5b8ba,
    0x939ee8c1e556e4,
    0x105a695dd60d0e,
    0x8c59c9e89f6e5c,
    0x7359fa8,
]);

/// `R^2 mod p`, used to move canonical values into Montgomery form.
pub const R2: BigUint56 = BigUint56::from_limbs([
    0x9b2c977f4ec6b4,
    0x88742bb8aa70ff,
    0xff538b3ae1fcf6,
    0xa1d99a8bf33da0,
    0xa45a5a6,
]);

/// `-p^{-1} mod 2^56`
pub const P_INV: u64 = 0xe1f593efffffff;
