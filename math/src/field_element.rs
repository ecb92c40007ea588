use std::fmt;
use std::ops::Add;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;
use std::str::FromStr;

use arbitrary::Arbitrary;
use arbitrary::Unstructured;
use get_size2::GetSize;
use num_bigint::BigUint;
use num_traits::ConstOne;
use num_traits::ConstZero;
use num_traits::One;
use num_traits::Zero;
use rand::distr::Distribution;
use rand::distr::StandardUniform;
use rand::Rng;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use subtle::Choice;
use subtle::ConditionallySelectable;
use tracing::debug;
use tracing::trace;

use crate::biguint::adc;
use crate::biguint::mac;
use crate::biguint::BigUint56;
use crate::biguint::LIMB_MASK;
use crate::constants::BITS_PER_LIMB;
use crate::constants::MAX_BITS;
use crate::constants::MAX_BYTES;
use crate::constants::MODULUS;
use crate::constants::MODULUS_MINUS_TWO;
use crate::constants::NUM_LIMBS;
use crate::constants::P_INV;
use crate::constants::R;
use crate::constants::R2;
use crate::cost;
use crate::cost::Op;
use crate::error::ParseFieldElementError;
use crate::traits::Inverse;
use crate::traits::ModPow;

/// Element of the BN254 scalar field `ℤ_p`.
///
/// In Montgomery representation: the wrapped integer is `a·R mod p` with
/// `R = 2^280`, always below `p`.
#[derive(Copy, Clone, Default, Hash, PartialEq, Eq)]
pub struct FieldElement(BigUint56);

impl GetSize for FieldElement {
    fn get_stack_size() -> usize {
        std::mem::size_of::<Self>()
    }

    fn get_heap_size(&self) -> usize {
        0
    }
}

impl<'a> Arbitrary<'a> for FieldElement {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let bytes: [u8; MAX_BYTES] = u.arbitrary()?;
        Ok(Self::from_biguint56(BigUint56::from_le_bytes(&bytes)))
    }
}

impl Serialize for FieldElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_bytes().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = <[u8; MAX_BYTES]>::deserialize(deserializer)?;
        Self::try_from(bytes).map_err(serde::de::Error::custom)
    }
}

impl FieldElement {
    pub const BYTES: usize = MAX_BYTES;
    pub const BITS: usize = MAX_BITS;

    /// Wrap limbs that already are in Montgomery form.
    #[inline]
    pub const fn from_raw_limbs(limbs: [u64; NUM_LIMBS]) -> Self {
        Self(BigUint56::from_limbs(limbs))
    }

    /// Interpret `limbs` as a canonical integer; values `>= p` are reduced.
    pub fn from_limbs(limbs: [u64; NUM_LIMBS]) -> Self {
        Self::from_biguint56(BigUint56::from_limbs(limbs))
    }

    /// Checked counterpart of [`from_limbs`](Self::from_limbs): every limb
    /// must fit into 56 bits and the value must be below `p`.
    pub fn try_from_limbs(limbs: [u64; NUM_LIMBS]) -> crate::Result<Self> {
        let value = BigUint56::try_from_limbs(limbs)?;
        if value.gte(&MODULUS) {
            return Err(ParseFieldElementError::NotCanonical.into());
        }
        Ok(Self::from_biguint56(value))
    }

    pub fn from_u56(value: u64) -> Self {
        Self::from_biguint56(BigUint56::from_u56(value))
    }

    /// Convert a canonical integer into Montgomery form: `(v·R²)/R = v·R`.
    ///
    /// Any 280-bit input is accepted since `v·R² < p·R` keeps the reduction
    /// canonical.
    pub fn from_biguint56(value: BigUint56) -> Self {
        let (lo, hi) = value.mul(&R2);
        Self(Self::montgomery_reduce(&lo, &hi))
    }

    /// Decode at most [`MAX_BYTES`] little-endian bytes, rejecting values
    /// that are not below the modulus.
    pub fn try_from_bytes(
        bytes: &[u8],
    ) -> Result<Self, ParseFieldElementError> {
        if bytes.len() > MAX_BYTES {
            debug!(len = bytes.len(), "rejecting over-long encoding");
            return Err(ParseFieldElementError::InvalidNumBytes(bytes.len()));
        }
        let value = BigUint56::from_le_bytes(bytes);
        if value.gte(&MODULUS) {
            debug!("rejecting non-canonical field element encoding");
            return Err(ParseFieldElementError::NotCanonical);
        }
        Ok(Self::from_biguint56(value))
    }

    /// # Panics
    ///
    /// If `bytes` is longer than [`MAX_BYTES`] or encodes a value `>= p`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match Self::try_from_bytes(bytes) {
            Ok(fe) => fe,
            Err(err) => panic!("cannot decode field element: {err}"),
        }
    }

    /// The canonical integer: `(a·R)/R = a`.
    #[inline]
    pub fn to_biguint56(&self) -> BigUint56 {
        Self::montgomery_reduce(&self.0, &BigUint56::ZERO)
    }

    pub fn to_bytes(&self) -> [u8; MAX_BYTES] {
        self.to_biguint56().to_le_bytes()
    }

    /// Canonical value as bits, least significant first.
    pub fn to_bits(&self) -> [bool; MAX_BITS] {
        self.to_biguint56().to_bits()
    }

    pub fn to_biguint(&self) -> BigUint {
        self.to_biguint56().to_biguint()
    }

    /// The Montgomery-form limbs, as stored.
    #[inline]
    pub const fn raw_limbs(&self) -> [u64; NUM_LIMBS] {
        self.0.limbs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    pub const fn one() -> Self {
        Self::ONE
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.0 == R
    }

    #[inline]
    pub fn double(self) -> Self {
        self + self
    }

    #[inline]
    pub fn square(self) -> Self {
        self * self
    }

    /// Montgomery reduction by coarsely integrated operand scanning.
    ///
    /// Returns `(lo + hi·2^280)/2^280 mod p`. The result is canonical as long
    /// as the input is below `p·2^280`, which holds for the product of two
    /// canonical values and for `hi = 0`.
    pub fn montgomery_reduce(lo: &BigUint56, hi: &BigUint56) -> BigUint56 {
        let p = MODULUS.limbs();
        let mut t = [0u64; 2 * NUM_LIMBS];
        t[..NUM_LIMBS].copy_from_slice(&lo.limbs());
        t[NUM_LIMBS..].copy_from_slice(&hi.limbs());

        let mut carry2 = 0;
        for i in 0..NUM_LIMBS {
            // k·p clears limb i
            let k = t[i].wrapping_mul(P_INV) & LIMB_MASK;
            let mut carry = 0;
            for j in 0..NUM_LIMBS {
                (t[i + j], carry) = mac(t[i + j], k, p[j], carry);
            }
            (t[i + NUM_LIMBS], carry2) = adc(t[i + NUM_LIMBS], carry, carry2);
        }

        let mut upper = [0u64; NUM_LIMBS];
        upper.copy_from_slice(&t[NUM_LIMBS..]);
        let value = BigUint56::from_limbs(upper);

        // value + carry2·2^280 lies in [0, 2p)
        let (reduced, borrow) = value.sub(&MODULUS);
        let keep_value = Choice::from(u8::from(borrow && carry2 == 0));
        BigUint56::conditional_select(&reduced, &value, keep_value)
    }

    /// `self^exponent`, squaring and multiplying on every one of the
    /// `NUM_LIMBS·BITS_PER_LIMB` exponent bits.
    ///
    /// The operation count does not depend on the exponent: the product with
    /// the base is always computed and the exponent bit only selects it.
    #[must_use]
    pub fn pow(&self, exponent: &BigUint56) -> Self {
        let mut acc = Self::ONE;
        for i in (0..NUM_LIMBS * BITS_PER_LIMB).rev() {
            let squared = acc.square();
            let multiplied = squared * *self;
            let bit = Choice::from(u8::from(exponent.bit(i)));
            acc = Self::conditional_select(&squared, &multiplied, bit);
        }
        acc
    }

    /// Same result as [`pow`](Self::pow), computed without accounting.
    ///
    /// Leading zero bits are skipped and the loop branches on exponent bits.
    /// The result is a hint; callers must check it with accounted operations.
    #[must_use]
    pub fn pow_unc(&self, exponent: &BigUint56) -> Self {
        cost::unaccounted(|| {
            let mut acc = Self::ONE;
            for i in (0..exponent.bits()).rev() {
                acc = acc.square();
                if exponent.bit(i) {
                    acc = acc * *self;
                }
            }
            acc
        })
    }

    /// Multiplicative inverse via Fermat's little theorem.
    ///
    /// `a^(p-2)` is taken from [`pow_unc`](Self::pow_unc) and then checked
    /// with a single accounted multiplication.
    ///
    /// # Panics
    ///
    /// If `self` is zero.
    pub fn invert(&self) -> Self {
        assert!(
            !self.is_zero(),
            "Attempted to find the multiplicative inverse of zero."
        );

        let inverse = self.pow_unc(&MODULUS_MINUS_TWO);
        assert!(
            (*self * inverse).is_one(),
            "inverse witness does not satisfy a * inv == 1"
        );
        trace!("inverse witness verified");
        inverse
    }

    /// Montgomery batch inversion: one [`invert`](Self::invert) for all
    /// elements.
    ///
    /// Returns `None` when any of the inputs is zero. Adapted from
    /// <https://paulmillr.com/posts/noble-secp256k1-fast-ecc/#batch-inversion>.
    pub fn try_batch_invert(mut input: Vec<Self>) -> Option<Vec<Self>> {
        if input.is_empty() {
            return Some(Vec::new());
        }

        let mut scratch: Vec<Self> = Vec::with_capacity(input.len());
        let mut acc = Self::ONE;

        for value in &input {
            if value.is_zero() {
                return None;
            }
            scratch.push(acc);
            acc = acc * *value;
        }

        acc = acc.invert();

        for (value, prefix) in
            input.iter_mut().rev().zip(scratch.into_iter().rev())
        {
            let current = *value;
            *value = acc * prefix;
            acc = acc * current;
        }

        Some(input)
    }

    /// # Panics
    ///
    /// If any input is zero.
    pub fn batch_invert(input: Vec<Self>) -> Vec<Self> {
        match Self::try_batch_invert(input) {
            Some(inverses) => inverses,
            None => panic!("batch_invert: cannot invert zero element"),
        }
    }

    /// `p - self`, or zero for zero. Not charged.
    fn negate(&self) -> Self {
        let (diff, _) = MODULUS.sub(&self.0);
        let is_zero = Choice::from(u8::from(self.0.is_zero()));
        Self(BigUint56::conditional_select(&diff, &BigUint56::ZERO, is_zero))
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let canonical_value = self.to_biguint();
        let p = MODULUS.to_biguint();
        let cutoff = BigUint::from(256u32);
        if canonical_value >= &p - &cutoff {
            write!(f, "-{}", p - canonical_value)
        } else {
            write!(f, "{canonical_value}")
        }
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FieldElement(0x{:064x})", self.to_biguint())
    }
}

impl FromStr for FieldElement {
    type Err = ParseFieldElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed: BigUint =
            s.parse().map_err(ParseFieldElementError::ParseBigUint)?;
        Self::try_from(&parsed)
    }
}

impl TryFrom<&BigUint> for FieldElement {
    type Error = ParseFieldElementError;

    fn try_from(value: &BigUint) -> Result<Self, Self::Error> {
        BigUint56::from_biguint(value)
            .filter(|v| v.lt(&MODULUS))
            .map(Self::from_biguint56)
            .ok_or(ParseFieldElementError::NotCanonical)
    }
}

impl From<FieldElement> for BigUint {
    fn from(fe: FieldElement) -> Self {
        fe.to_biguint()
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_biguint56(BigUint56::from(value))
    }
}

impl From<u128> for FieldElement {
    fn from(value: u128) -> Self {
        Self::from_biguint56(BigUint56::from(value))
    }
}

impl From<usize> for FieldElement {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}

macro_rules! impl_from_small_unsigned_int_for_fe {
    ($($t:ident),+ $(,)?) => {$(
        impl From<$t> for FieldElement {
            fn from(value: $t) -> Self {
                Self::from(u64::from(value))
            }
        }
    )+};
}

impl_from_small_unsigned_int_for_fe!(u8, u16, u32);

impl From<i64> for FieldElement {
    fn from(value: i64) -> Self {
        let magnitude = Self::from(value.unsigned_abs());
        if value >= 0 {
            magnitude
        } else {
            magnitude.negate()
        }
    }
}

impl From<isize> for FieldElement {
    fn from(value: isize) -> Self {
        Self::from(value as i64)
    }
}

macro_rules! impl_from_small_signed_int_for_fe {
    ($($t:ident),+ $(,)?) => {$(
        impl From<$t> for FieldElement {
            fn from(value: $t) -> Self {
                i64::from(value).into()
            }
        }
    )+};
}

impl_from_small_signed_int_for_fe!(i8, i16, i32);

/// Canonical little-endian encoding.
impl From<FieldElement> for [u8; FieldElement::BYTES] {
    fn from(fe: FieldElement) -> Self {
        fe.to_bytes()
    }
}

impl TryFrom<[u8; FieldElement::BYTES]> for FieldElement {
    type Error = ParseFieldElementError;

    fn try_from(array: [u8; FieldElement::BYTES]) -> Result<Self, Self::Error> {
        Self::try_from_bytes(&array)
    }
}

impl TryFrom<&[u8]> for FieldElement {
    type Error = ParseFieldElementError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_bytes(bytes)
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(BigUint56::conditional_select(&a.0, &b.0, choice))
    }
}

impl Inverse for FieldElement {
    #[inline]
    fn inverse(&self) -> Self {
        self.invert()
    }
}

impl ModPow for FieldElement {
    #[inline]
    fn mod_pow(&self, exp: &BigUint56) -> Self {
        self.pow(exp)
    }
}

impl Distribution<FieldElement> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        loop {
            let mut bytes = [0u8; MAX_BYTES];
            rng.fill(&mut bytes[..]);
            // p has 254 bits, so fewer than two rounds are expected
            bytes[MAX_BYTES - 1] &= 0x3f;
            if let Ok(fe) = FieldElement::try_from_bytes(&bytes) {
                return fe;
            }
        }
    }
}

/// Uniformly random field elements from the thread-local generator.
pub fn random_elements(n: usize) -> Vec<FieldElement> {
    rand::rng().sample_iter(StandardUniform).take(n).collect()
}

impl Zero for FieldElement {
    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn is_zero(&self) -> bool {
        FieldElement::is_zero(self)
    }
}

impl ConstZero for FieldElement {
    const ZERO: Self = Self(BigUint56::ZERO);
}

impl One for FieldElement {
    #[inline]
    fn one() -> Self {
        Self::ONE
    }

    #[inline]
    fn is_one(&self) -> bool {
        FieldElement::is_one(self)
    }
}

impl ConstOne for FieldElement {
    const ONE: Self = Self(R);
}

impl Add for FieldElement {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        cost::charge(Op::Add);
        let (sum, carry) = self.0.add(&rhs.0);
        let (reduced, borrow) = sum.sub(&MODULUS);
        // the raw sum is kept iff it did not carry out and is below p
        let keep_sum = Choice::from(u8::from(!carry && borrow));
        Self(BigUint56::conditional_select(&reduced, &sum, keep_sum))
    }
}

impl Sub for FieldElement {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        cost::charge(Op::Sub);
        let (diff, borrow) = self.0.sub(&rhs.0);
        let (corrected, _) = diff.add(&MODULUS);
        let underflow = Choice::from(u8::from(borrow));
        Self(BigUint56::conditional_select(&diff, &corrected, underflow))
    }
}

impl Mul for FieldElement {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        cost::charge(Op::Mul);
        let (lo, hi) = self.0.mul(&rhs.0);
        Self(Self::montgomery_reduce(&lo, &hi))
    }
}

impl Neg for FieldElement {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        cost::charge(Op::Sub);
        self.negate()
    }
}


#[cfg(test)]
mod montgomery_reduce_tests {
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    fn reduce(lo: BigUint56) -> BigUint56 {
        FieldElement::montgomery_reduce(&lo, &BigUint56::ZERO)
    }

    /// Values whose top limb is below the modulus' top limb.
    fn canonical_strategy() -> impl Strategy<Value = BigUint56> {
        let top = MODULUS.limbs()[NUM_LIMBS - 1];
        (prop::array::uniform4(0..=LIMB_MASK), 0..top).prop_map(
            |(low, high)| {
                BigUint56::from_limbs([low[0], low[1], low[2], low[3], high])
            },
        )
    }

    #[test]
    fn test_montgomery_reduce_zero() {
        assert_eq!(BigUint56::ZERO, reduce(BigUint56::ZERO));
    }

    #[test]
    fn test_montgomery_reduce_identity() {
        // R / R = 1
        assert_eq!(BigUint56::from_u56(1), reduce(R));
    }

    #[test]
    fn test_montgomery_reduce_specific_values() {
        assert_eq!(BigUint56::ZERO, reduce(MODULUS));
        // R^2 / R = R
        assert_eq!(R, reduce(R2));
    }

    #[test]
    fn test_montgomery_reduce_max_input() {
        let max = MODULUS.sub(&BigUint56::from_u56(1)).0;
        let (lo, hi) = max.mul(&max);
        let result = FieldElement::montgomery_reduce(&lo, &hi);
        assert!(result.lt(&MODULUS));
    }

    #[proptest]
    fn montgomery_reduce_output_always_in_range(
        #[strategy(canonical_strategy())] a: BigUint56,
        #[strategy(canonical_strategy())] b: BigUint56,
    ) {
        let (lo, hi) = a.mul(&b);
        let result = FieldElement::montgomery_reduce(&lo, &hi);
        prop_assert!(result.lt(&MODULUS));
    }

    #[proptest]
    fn montgomery_reduce_divides_by_radix(
        #[strategy(canonical_strategy())] a: BigUint56,
        #[strategy(canonical_strategy())] b: BigUint56,
    ) {
        let p = MODULUS.to_biguint();
        let (lo, hi) = a.mul(&b);
        let result = FieldElement::montgomery_reduce(&lo, &hi).to_biguint();
        // result * R ≡ a * b (mod p)
        let radix = BigUint::from(1u8) << (NUM_LIMBS * BITS_PER_LIMB);
        prop_assert_eq!(
            (a.to_biguint() * b.to_biguint()) % &p,
            (result * radix) % &p
        );
    }

    #[proptest]
    fn montgomery_form_round_trips(
        #[strategy(canonical_strategy())] a: BigUint56,
    ) {
        prop_assert_eq!(a, FieldElement::from_biguint56(a).to_biguint56());
    }
}
