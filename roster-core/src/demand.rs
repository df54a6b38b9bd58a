// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Backpressure credit granted by a consumer.

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign};

/// Number of records a consumer allows the stream to deliver.
///
/// Grants accumulate: bounded grants add up (saturating) and an unbounded
/// grant stays unbounded for the rest of the subscription.
///
/// ```
/// use roster_core::Demand;
///
/// let mut demand = Demand::max(2) + Demand::max(3);
/// assert_eq!(demand, Demand::max(5));
///
/// demand += Demand::Unbounded;
/// assert!(demand.is_unbounded());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Demand {
    Bounded(usize),
    Unbounded,
}

impl Demand {
    /// No credit at all.
    pub const NONE: Self = Self::Bounded(0);

    /// A bounded grant of `n` records.
    #[must_use]
    pub const fn max(n: usize) -> Self {
        Self::Bounded(n)
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::Bounded(0))
    }

    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Remaining bounded credit, `None` when unbounded.
    #[must_use]
    pub const fn remaining(self) -> Option<usize> {
        match self {
            Self::Bounded(n) => Some(n),
            Self::Unbounded => None,
        }
    }

    /// Consumes one unit of credit. Returns `false` if there was none.
    pub fn consume_one(&mut self) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Bounded(0) => false,
            Self::Bounded(n) => {
                *n -= 1;
                true
            }
        }
    }
}

impl Default for Demand {
    fn default() -> Self {
        Self::NONE
    }
}

impl Add for Demand {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Bounded(a), Self::Bounded(b)) => Self::Bounded(a.saturating_add(b)),
            _ => Self::Unbounded,
        }
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl From<usize> for Demand {
    fn from(n: usize) -> Self {
        Self::Bounded(n)
    }
}

impl Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(n) => write!(f, "{n}"),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}
