//! Accounted and unaccounted execution.
//!
//! Every field operation whose steps end up in the provable trace charges
//! one unit to a per-thread [`CostTally`]. Work that only produces a witness,
//! such as [`FieldElement::pow_unc`](crate::field_element::FieldElement::pow_unc),
//! runs inside [`unaccounted`] and charges nothing. Such a witness is only
//! trustworthy after an accounted check; see
//! [`FieldElement::invert`](crate::field_element::FieldElement::invert).
//!
//! ```
//! use bn254_math::cost;
//! use bn254_math::prelude::*;
//!
//! let a = fe!(7);
//! let (_, tally) = cost::measure(|| a * a + a);
//! assert_eq!(1, tally.multiplications);
//! assert_eq!(1, tally.additions);
//!
//! let (_, tally) = cost::measure(|| cost::unaccounted(|| a * a));
//! assert!(tally.is_empty());
//! ```

use std::cell::Cell;
use std::ops::Add;
use std::ops::Sub;

use tracing::trace;

/// Operations charged against the accounted trace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Steps are charged and control flow must not depend on operand values.
    Accounted,
    /// Witness generation; the result must be re-checked by accounted code.
    Unaccounted,
}

/// Number of accounted operations, by kind.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CostTally {
    pub additions: u64,
    pub subtractions: u64,
    pub multiplications: u64,
}

impl CostTally {
    pub const ZERO: Self = Self {
        additions: 0,
        subtractions: 0,
        multiplications: 0,
    };

    pub const fn total(&self) -> u64 {
        self.additions + self.subtractions + self.multiplications
    }

    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }

    const fn charged(self, op: Op) -> Self {
        match op {
            Op::Add => Self {
                additions: self.additions + 1,
                ..self
            },
            Op::Sub => Self {
                subtractions: self.subtractions + 1,
                ..self
            },
            Op::Mul => Self {
                multiplications: self.multiplications + 1,
                ..self
            },
        }
    }
}

impl Add for CostTally {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            additions: self.additions + rhs.additions,
            subtractions: self.subtractions + rhs.subtractions,
            multiplications: self.multiplications + rhs.multiplications,
        }
    }
}

impl Sub for CostTally {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            additions: self.additions - rhs.additions,
            subtractions: self.subtractions - rhs.subtractions,
            multiplications: self.multiplications - rhs.multiplications,
        }
    }
}

thread_local! {
    static TALLY: Cell<CostTally> = const { Cell::new(CostTally::ZERO) };
    static UNACCOUNTED_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// The mode the current thread is executing in.
pub fn mode() -> ExecutionMode {
    if UNACCOUNTED_DEPTH.with(Cell::get) == 0 {
        ExecutionMode::Accounted
    } else {
        ExecutionMode::Unaccounted
    }
}

/// Record one `op`, unless the thread is in unaccounted mode.
#[inline]
pub(crate) fn charge(op: Op) {
    if mode() == ExecutionMode::Accounted {
        TALLY.with(|tally| tally.set(tally.get().charged(op)));
    }
}

/// Everything charged on this thread since the last [`reset`].
pub fn tally() -> CostTally {
    TALLY.with(Cell::get)
}

pub fn reset() {
    TALLY.with(|tally| tally.set(CostTally::ZERO));
}

/// Run `f` and return its result with the accounted cost it incurred.
///
/// `f` runs against a fresh tally, so a [`reset`] inside it only clears the
/// measured window. The thread tally keeps the earlier count plus the cost
/// measured here.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, CostTally) {
    let before = tally();
    reset();
    let value = f();
    let cost = tally();
    TALLY.with(|tally| tally.set(before + cost));
    (value, cost)
}

/// Restores the previous depth even if the closure unwinds.
struct UnaccountedGuard;

impl UnaccountedGuard {
    fn enter() -> Self {
        let depth = UNACCOUNTED_DEPTH.with(|d| {
            d.set(d.get() + 1);
            d.get()
        });
        trace!(depth, "entering unaccounted execution");
        Self
    }
}

impl Drop for UnaccountedGuard {
    fn drop(&mut self) {
        let depth = UNACCOUNTED_DEPTH.with(|d| {
            d.set(d.get() - 1);
            d.get()
        });
        trace!(depth, "leaving unaccounted execution");
    }
}

/// Run `f` without charging any of its operations.
///
/// The value `f` returns is a hint. Call sites must verify it with accounted
/// operations before relying on it.
pub fn unaccounted<T>(f: impl FnOnce() -> T) -> T {
    let _guard = UnaccountedGuard::enter();
    f()
}
