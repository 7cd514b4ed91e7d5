//! Extended objective values: finite, finite-minus-ε, or unbounded.

use num_rational::BigRational;
use std::fmt;

/// Outcome of maximizing a linear objective over the feasible region.
///
/// The infinitesimal ε is symbolic: `Strict(v)` records that the supremum
/// `v` is approached but not attained, while the engine's model witnesses a
/// point strictly below `v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Optimum {
    /// The supremum is attained at this value.
    Finite(BigRational),
    /// The supremum is `value − ε`: every feasible point is strictly below
    /// `value`, and feasible points exist arbitrarily close to it.
    Strict(BigRational),
    /// The objective is unbounded above.
    Unbounded,
}

impl Optimum {
    /// Whether the objective is unbounded above.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Optimum::Unbounded)
    }

    /// Whether the supremum is approached but not attained.
    pub fn is_strict(&self) -> bool {
        matches!(self, Optimum::Strict(_))
    }

    /// The finite bound, if any.
    pub fn value(&self) -> Option<&BigRational> {
        match self {
            Optimum::Finite(v) | Optimum::Strict(v) => Some(v),
            Optimum::Unbounded => None,
        }
    }
}

impl fmt::Display for Optimum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Optimum::Finite(v) => write!(f, "{v}"),
            Optimum::Strict(v) => write!(f, "{v} - eps"),
            Optimum::Unbounded => write!(f, "oo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    #[test]
    fn test_accessors() {
        assert!(Optimum::Unbounded.is_unbounded());
        assert!(Optimum::Strict(rat(2)).is_strict());
        assert!(!Optimum::Finite(rat(2)).is_strict());
        assert_eq!(Optimum::Finite(rat(2)).value(), Some(&rat(2)));
        assert_eq!(Optimum::Unbounded.value(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Optimum::Finite(rat(3))), "3");
        assert_eq!(format!("{}", Optimum::Strict(rat(3))), "3 - eps");
        assert_eq!(format!("{}", Optimum::Unbounded), "oo");
    }
}
