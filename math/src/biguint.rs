//! Fixed-width unsigned integers made of five 56-bit limbs.
//!
//! [`BigUint56`] is the limb-level primitive underneath
//! [`FieldElement`](crate::field_element::FieldElement). Limbs are stored in
//! little-endian order and every limb is kept below `2^56`, which leaves
//! eight spare bits per `u64` so that carries can be collected without
//! overflow checks. The total width is 280 bits: enough for any 254-bit field
//! value and for each half of a double-width product.

use std::cmp::Ordering;

use num_bigint::BigUint;
use subtle::Choice;
use subtle::ConditionallySelectable;

use crate::error::BigUintError;

/// Number of limbs in a [`BigUint56`].
pub const NUM_LIMBS: usize = 5;

/// Width of a single limb.
pub const BITS_PER_LIMB: usize = 56;

/// Logical bit width of field values.
pub const MAX_BITS: usize = 254;

/// Byte width of the canonical encoding of field values.
pub const MAX_BYTES: usize = 32;

/// Mask selecting the low [`BITS_PER_LIMB`] bits of a `u64`.
pub const LIMB_MASK: u64 = (1 << BITS_PER_LIMB) - 1;

const BYTES_PER_LIMB: usize = BITS_PER_LIMB / 8;

/// Largest byte string [`BigUint56::from_le_bytes`] accepts.
pub const CAPACITY_BYTES: usize = NUM_LIMBS * BYTES_PER_LIMB;

/// Compute `a + b * c + carry`, returning the low limb and the carry.
///
/// All inputs must be below `2^56`; the carry then is too.
#[inline(always)]
pub const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) * (c as u128) + (carry as u128);
    ((ret as u64) & LIMB_MASK, (ret >> BITS_PER_LIMB) as u64)
}

/// Compute `a + b + carry`, returning the low limb and the carry.
#[inline(always)]
pub const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = a + b + carry;
    (ret & LIMB_MASK, ret >> BITS_PER_LIMB)
}

/// Compute `a - (b + borrow)`, returning the low limb and the borrow bit.
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = a.wrapping_sub(b + borrow);
    (ret & LIMB_MASK, ret >> 63)
}

/// Unsigned 280-bit integer, five little-endian 56-bit limbs.
#[derive(Debug, Copy, Clone, Default, Hash, PartialEq, Eq)]
pub struct BigUint56 {
    limbs: [u64; NUM_LIMBS],
}

impl BigUint56 {
    pub const ZERO: Self = Self {
        limbs: [0; NUM_LIMBS],
    };

    /// Build from little-endian limbs.
    ///
    /// # Panics
    ///
    /// If any limb is `>= 2^56`.
    pub const fn from_limbs(limbs: [u64; NUM_LIMBS]) -> Self {
        let mut i = 0;
        while i < NUM_LIMBS {
            assert!(limbs[i] <= LIMB_MASK, "limb exceeds 56 bits");
            i += 1;
        }
        Self { limbs }
    }

    /// Build from little-endian limbs, rejecting limbs wider than 56 bits.
    pub fn try_from_limbs(
        limbs: [u64; NUM_LIMBS],
    ) -> Result<Self, BigUintError> {
        match limbs.iter().position(|&limb| limb > LIMB_MASK) {
            Some(index) => Err(BigUintError::LimbOutOfRange {
                index,
                value: limbs[index],
            }),
            None => Ok(Self { limbs }),
        }
    }

    /// # Panics
    ///
    /// If `value >= 2^56`.
    pub const fn from_u56(value: u64) -> Self {
        Self::from_limbs([value, 0, 0, 0, 0])
    }

    /// Decode a little-endian byte string of at most [`CAPACITY_BYTES`] bytes.
    ///
    /// # Panics
    ///
    /// If `bytes` is longer than [`CAPACITY_BYTES`].
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() <= CAPACITY_BYTES,
            "{} bytes do not fit into {CAPACITY_BYTES}",
            bytes.len()
        );
        let mut limbs = [0u64; NUM_LIMBS];
        for (i, &byte) in bytes.iter().enumerate() {
            limbs[i / BYTES_PER_LIMB] |=
                u64::from(byte) << (8 * (i % BYTES_PER_LIMB));
        }
        Self { limbs }
    }

    /// Little-endian encoding of the low [`MAX_BYTES`] bytes.
    ///
    /// Callers only encode values below `2^256`; higher bits are dropped.
    pub fn to_le_bytes(&self) -> [u8; MAX_BYTES] {
        debug_assert!(self.bits() <= 8 * MAX_BYTES);
        let mut bytes = [0u8; MAX_BYTES];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let limb = self.limbs[i / BYTES_PER_LIMB];
            *byte = (limb >> (8 * (i % BYTES_PER_LIMB))) as u8;
        }
        bytes
    }

    /// The low [`MAX_BITS`] bits, index 0 being the least significant.
    pub fn to_bits(&self) -> [bool; MAX_BITS] {
        debug_assert!(self.bits() <= MAX_BITS);
        let mut bits = [false; MAX_BITS];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = self.bit(i);
        }
        bits
    }

    #[inline]
    pub const fn limbs(&self) -> [u64; NUM_LIMBS] {
        self.limbs
    }

    /// Bit `index`, counted from the least significant bit.
    #[inline]
    pub const fn bit(&self, index: usize) -> bool {
        assert!(index < NUM_LIMBS * BITS_PER_LIMB, "bit index out of range");
        (self.limbs[index / BITS_PER_LIMB] >> (index % BITS_PER_LIMB)) & 1 == 1
    }

    /// Number of significant bits; zero for [`Self::ZERO`].
    pub const fn bits(&self) -> usize {
        let mut i = NUM_LIMBS;
        while i > 0 {
            i -= 1;
            if self.limbs[i] != 0 {
                let top = u64::BITS - self.limbs[i].leading_zeros();
                return i * BITS_PER_LIMB + top as usize;
            }
        }
        0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        let mut acc = 0;
        let mut i = 0;
        while i < NUM_LIMBS {
            acc |= self.limbs[i];
            i += 1;
        }
        acc == 0
    }

    /// `self + other` modulo `2^280` and whether the sum overflowed.
    pub const fn add(&self, other: &Self) -> (Self, bool) {
        let mut limbs = [0u64; NUM_LIMBS];
        let mut carry = 0;
        let mut i = 0;
        while i < NUM_LIMBS {
            let (limb, c) = adc(self.limbs[i], other.limbs[i], carry);
            limbs[i] = limb;
            carry = c;
            i += 1;
        }
        (Self { limbs }, carry != 0)
    }

    /// `self - other` modulo `2^280` and whether the subtraction borrowed.
    pub const fn sub(&self, other: &Self) -> (Self, bool) {
        let mut limbs = [0u64; NUM_LIMBS];
        let mut borrow = 0;
        let mut i = 0;
        while i < NUM_LIMBS {
            let (limb, b) = sbb(self.limbs[i], other.limbs[i], borrow);
            limbs[i] = limb;
            borrow = b;
            i += 1;
        }
        (Self { limbs }, borrow != 0)
    }

    /// Full product, split into its low and high 280-bit halves.
    pub const fn mul(&self, other: &Self) -> (Self, Self) {
        let mut wide = [0u64; 2 * NUM_LIMBS];
        let mut i = 0;
        while i < NUM_LIMBS {
            let mut carry = 0;
            let mut j = 0;
            while j < NUM_LIMBS {
                let (limb, c) =
                    mac(wide[i + j], self.limbs[i], other.limbs[j], carry);
                wide[i + j] = limb;
                carry = c;
                j += 1;
            }
            wide[i + NUM_LIMBS] = carry;
            i += 1;
        }

        let mut lo = [0u64; NUM_LIMBS];
        let mut hi = [0u64; NUM_LIMBS];
        let mut k = 0;
        while k < NUM_LIMBS {
            lo[k] = wide[k];
            hi[k] = wide[k + NUM_LIMBS];
            k += 1;
        }
        (Self { limbs: lo }, Self { limbs: hi })
    }

    #[inline]
    pub fn lt(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Less
    }

    #[inline]
    pub fn gte(&self, other: &Self) -> bool {
        !self.lt(other)
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.limbs_to_le_bytes())
    }

    /// `None` if `value` needs more than 280 bits.
    pub fn from_biguint(value: &BigUint) -> Option<Self> {
        let bytes = value.to_bytes_le();
        (bytes.len() <= CAPACITY_BYTES).then(|| Self::from_le_bytes(&bytes))
    }

    fn limbs_to_le_bytes(&self) -> [u8; CAPACITY_BYTES] {
        let mut bytes = [0u8; CAPACITY_BYTES];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let limb = self.limbs[i / BYTES_PER_LIMB];
            *byte = (limb >> (8 * (i % BYTES_PER_LIMB))) as u8;
        }
        bytes
    }
}

impl Ord for BigUint56 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.limbs.iter().rev().cmp(other.limbs.iter().rev())
    }
}

impl PartialOrd for BigUint56 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl ConditionallySelectable for BigUint56 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u64; NUM_LIMBS];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = u64::conditional_select(&a.limbs[i], &b.limbs[i], choice);
        }
        Self { limbs }
    }
}

impl From<u64> for BigUint56 {
    fn from(value: u64) -> Self {
        Self {
            limbs: [value & LIMB_MASK, value >> BITS_PER_LIMB, 0, 0, 0],
        }
    }
}

impl From<u128> for BigUint56 {
    fn from(value: u128) -> Self {
        Self::from_le_bytes(&value.to_le_bytes())
    }
}
