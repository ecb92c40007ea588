use thiserror::Error;

use crate::biguint::MAX_BYTES;

/// Common result type used across this crate.
pub type Result<T, E = MathError> = core::result::Result<T, E>;

/// Top-level error type to keep error management simple for users.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum MathError {
    #[error(transparent)]
    ParseFieldElement(#[from] ParseFieldElementError),
    #[error(transparent)]
    BigUint(#[from] BigUintError),
}

pub type Error = MathError;

/// Errors returned while building a [`BigUint56`](crate::biguint::BigUint56).
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum BigUintError {
    #[error("limb {index} is {value:#x}, which does not fit into 56 bits")]
    LimbOutOfRange { index: usize, value: u64 },
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseFieldElementError {
    #[error("invalid decimal integer")]
    ParseBigUint(#[source] num_bigint::ParseBigIntError),
    #[error(
        "incorrect number of bytes: {0} > {max} == `MAX_BYTES`",
        max = MAX_BYTES
    )]
    InvalidNumBytes(usize),
    #[error("non-canonical value: not below the field modulus")]
    NotCanonical,
}
