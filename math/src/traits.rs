use num_traits::Zero;

use crate::biguint::BigUint56;

pub trait ModPow {
    /// Exponentiation with a fixed, exponent-independent operation count.
    #[must_use]
    fn mod_pow(&self, exp: &BigUint56) -> Self;
}

pub trait Inverse
where
    Self: Sized + Zero,
{
    fn inverse(&self) -> Self;

    fn inverse_or_zero(&self) -> Self {
        if self.is_zero() {
            Self::zero()
        } else {
            self.inverse()
        }
    }
}
