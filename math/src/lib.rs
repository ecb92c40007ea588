//! Arithmetic in the BN254 scalar field, in Montgomery form over five
//! 56-bit limbs.

#[macro_use]
mod macros;

pub mod biguint;
pub mod constants;
pub mod cost;
pub mod error;
pub mod field_element;
pub mod prelude;
pub mod traits;

pub use error::Error;
pub use error::Result;
pub use field_element::FieldElement;
