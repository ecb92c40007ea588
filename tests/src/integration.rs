use bn254_math::{
    biguint::BigUint56,
    constants::{MAX_BITS, MAX_BYTES, MODULUS, MODULUS_MINUS_TWO},
    cost,
    prelude::*,
};
use num_bigint::BigUint;
use proptest::prelude::*;
use test_strategy::proptest;

use crate::logging::init_tracing;

fn small(value: u8) -> FieldElement {
    FieldElement::from_bytes(&[value])
}

fn canonical_bytes() -> impl Strategy<Value = [u8; MAX_BYTES]> {
    any::<[u8; MAX_BYTES]>()
        .prop_map(|mut bytes| {
            // p has 254 bits
            bytes[MAX_BYTES - 1] &= 0x3f;
            bytes
        })
        .prop_filter("below modulus", |bytes| {
            BigUint::from_bytes_le(bytes) < MODULUS.to_biguint()
        })
}

fn element() -> impl Strategy<Value = FieldElement> {
    canonical_bytes().prop_map(|bytes| FieldElement::from_bytes(&bytes))
}

#[test]
fn zero_encodes_as_zero_bytes() {
    assert_eq!([0u8; MAX_BYTES], FieldElement::zero().to_bytes());
    assert_eq!([false; MAX_BITS], FieldElement::zero().to_bits());
}

#[test]
fn one_encodes_as_little_endian_one() {
    let mut expected = [0u8; MAX_BYTES];
    expected[0] = 1;
    assert_eq!(expected, FieldElement::one().to_bytes());
}

#[test]
fn five_minus_three_is_two() {
    let five = FieldElement::from_limbs([5, 0, 0, 0, 0]);
    let three = FieldElement::from_limbs([3, 0, 0, 0, 0]);
    assert_eq!(FieldElement::from_limbs([2, 0, 0, 0, 0]), five - three);
}

#[test]
fn two_times_three_is_six() {
    assert_eq!(small(6), small(2) * small(3));
}

#[test]
fn seven_squared_is_forty_nine() {
    let exponent = BigUint56::from_u56(2);
    assert_eq!(small(49), small(7).pow(&exponent));
    assert_eq!(small(49), small(7).pow_unc(&exponent));
}

#[test]
fn seven_times_its_inverse_is_one() {
    init_tracing();
    let seven = small(7);
    assert_eq!(FieldElement::one(), seven * seven.invert());
}

#[test]
#[should_panic(
    expected = "Attempted to find the multiplicative inverse of zero."
)]
fn inverting_zero_halts() {
    let _ = FieldElement::zero().invert();
}

#[test]
#[should_panic(expected = "cannot decode field element")]
fn decoding_the_modulus_halts() {
    init_tracing();
    let _ = FieldElement::from_bytes(&MODULUS.to_le_bytes());
}

#[test]
fn largest_element_round_trips() {
    let (p_minus_one, _) = MODULUS.sub(&BigUint56::from_u56(1));
    let bytes = p_minus_one.to_le_bytes();
    let fe = FieldElement::from_bytes(&bytes);
    assert_eq!(bytes, fe.to_bytes());
    assert_eq!(-FieldElement::one(), fe);
}

#[proptest]
fn canonical_bytes_round_trip(
    #[strategy(canonical_bytes())] bytes: [u8; MAX_BYTES],
) {
    prop_assert_eq!(bytes, FieldElement::from_bytes(&bytes).to_bytes());
}

#[proptest]
fn additive_identity_and_inverse(#[strategy(element())] a: FieldElement) {
    prop_assert_eq!(a, a + FieldElement::zero());
    prop_assert_eq!(FieldElement::zero(), a + (-a));
}

#[proptest]
fn multiplicative_identity(#[strategy(element())] a: FieldElement) {
    prop_assert_eq!(a, a * FieldElement::one());
}

#[proptest]
fn multiplication_distributes(
    #[strategy(element())] a: FieldElement,
    #[strategy(element())] b: FieldElement,
    #[strategy(element())] c: FieldElement,
) {
    prop_assert_eq!((a + b) * c, a * c + b * c);
}

#[proptest]
fn nonzero_elements_invert(
    #[strategy(element())]
    #[filter(!#a.is_zero())]
    a: FieldElement,
) {
    prop_assert_eq!(FieldElement::one(), a * a.invert());
}

#[proptest(cases = 32)]
fn exponent_edge_cases(
    #[strategy(element())] a: FieldElement,
    #[strategy(1..=u64::from(u32::MAX))] k: u64,
) {
    let k = BigUint56::from_u56(k);
    prop_assert_eq!(FieldElement::one(), a.pow(&BigUint56::ZERO));
    prop_assert_eq!(a, a.pow(&BigUint56::from_u56(1)));
    prop_assert_eq!(FieldElement::zero(), FieldElement::zero().pow(&k));
}

#[test]
fn inversion_is_cheap_to_account() {
    let a = small(7);
    let (_, pow_tally) = cost::measure(|| a.pow(&MODULUS_MINUS_TWO));
    let (_, invert_tally) = cost::measure(|| a.invert());
    assert_eq!(1, invert_tally.multiplications);
    assert!(invert_tally.total() < pow_tally.total());
}

#[test]
fn random_elements_satisfy_field_laws() {
    let elements = bn254_math::field_element::random_elements(16);
    for pair in elements.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        assert_eq!(a * b, b * a);
        assert_eq!(a - b, -(b - a));
        if !b.is_zero() {
            assert_eq!(a, a * b * b.inverse());
        }
    }
}

fn decode_all(
    encodings: &[[u8; MAX_BYTES]],
) -> bn254_math::Result<Vec<FieldElement>> {
    let mut decoded = Vec::with_capacity(encodings.len());
    for bytes in encodings {
        decoded.push(FieldElement::try_from(*bytes)?);
    }
    Ok(decoded)
}

#[test]
fn decoding_errors_convert_into_crate_error() {
    let good = decode_all(&[small(3).to_bytes(), small(5).to_bytes()]).unwrap();
    assert_eq!(vec![small(3), small(5)], good);

    let encodings = [small(3).to_bytes(), MODULUS.to_le_bytes()];
    let err = decode_all(&encodings).unwrap_err();
    assert!(matches!(err, bn254_math::Error::ParseFieldElement(_)));
    assert!(err.to_string().contains("non-canonical"));
}

#[test]
fn measure_survives_reset_inside_closure() {
    let a = small(9);
    let _ = a * a;
    let _ = a * a;
    let (product, tally) = cost::measure(|| {
        cost::reset();
        a * a
    });
    assert_eq!(small(81), product);
    assert_eq!(1, tally.multiplications);
}
