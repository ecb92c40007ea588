pub use num_traits::ConstOne;
pub use num_traits::ConstZero;

pub use crate::biguint::BigUint56;
pub use crate::constants::MODULUS;
pub use crate::field_element::FieldElement;
pub use crate::traits::Inverse;
pub use crate::traits::ModPow;
pub use crate::{fe, fe_array, fe_vec};
