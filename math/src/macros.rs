//! Shorthand constructors for [`FieldElement`](crate::field_element::FieldElement)s.
//!
//! Each macro delegates to `FieldElement::from`, so any integer type with a
//! `From` conversion works, including negative values.

/// Simplifies constructing [`FieldElement`](crate::field_element::FieldElement)s.
///
/// ```
/// use bn254_math::prelude::*;
///
/// let a = fe!(42);
/// let b = fe!(-12); // correctly translates to `p - 12`
/// let c = fe!(42 - 12);
/// assert_eq!(a + b, c);
/// ```
#[macro_export]
macro_rules! fe {
    ($value:expr) => {
        $crate::field_element::FieldElement::from($value)
    };
}

/// Create a [`Vec`] of [`FieldElement`](crate::field_element::FieldElement)s.
///
/// ```
/// use bn254_math::prelude::*;
///
/// assert_eq!(fe_vec![1, 2, 3], vec![fe!(1), fe!(2), fe!(3)]);
/// assert_eq!(fe_vec![7; 3], vec![fe!(7); 3]);
/// ```
#[macro_export]
macro_rules! fe_vec {
    ($b:expr; $n:expr) => {
        vec![$crate::field_element::FieldElement::from($b); $n]
    };
    ($($b:expr),* $(,)?) => {
        vec![$($crate::field_element::FieldElement::from($b)),*]
    };
}

/// Create an array of [`FieldElement`](crate::field_element::FieldElement)s.
///
/// ```
/// use bn254_math::prelude::*;
///
/// let arr = fe_array![1, 2, 3];
/// assert_eq!(arr, [fe!(1), fe!(2), fe!(3)]);
/// ```
#[macro_export]
macro_rules! fe_array {
    ($b:expr; $n:expr) => {
        [$crate::field_element::FieldElement::from($b); $n]
    };
    ($($b:expr),* $(,)?) => {
        [$($crate::field_element::FieldElement::from($b)),*]
    };
}
