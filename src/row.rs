//! Tableau rows: linear constraints with a cached model evaluation.
//!
//! A row stores `coeff₁·v₁ + … + coeffₙ·vₙ + constant REL 0` with the
//! monomials strictly sorted by variable id and all coefficients nonzero.
//! The cached `value` is the row's evaluation under the engine's current
//! model and is kept coherent by delta updates rather than re-evaluation.

use num_rational::BigRational;
use num_traits::{Signed, Zero};
use smallvec::SmallVec;
use std::fmt;

/// Variable identifier (dense, assigned on creation).
pub type VarId = usize;

/// Row identifier into the engine's row store.
pub type RowId = usize;

/// Relation of a row's linear term to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneqType {
    /// Equality: `t = 0`.
    Eq,
    /// Strict inequality: `t < 0`.
    Lt,
    /// Non-strict inequality: `t ≤ 0`.
    Le,
}

impl fmt::Display for IneqType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneqType::Eq => write!(f, "="),
            IneqType::Lt => write!(f, "<"),
            IneqType::Le => write!(f, "<="),
        }
    }
}

/// A monomial `coeff · var` inside a row. The coefficient is never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monomial {
    /// Variable id.
    pub var: VarId,
    /// Nonzero coefficient.
    pub coeff: BigRational,
}

impl Monomial {
    /// Create a new monomial.
    pub fn new(var: VarId, coeff: BigRational) -> Self {
        Self { var, coeff }
    }
}

/// A linear constraint `Σ coeffᵢ·varᵢ + constant REL 0`.
#[derive(Debug, Clone)]
pub struct Row {
    /// Monomials, strictly increasing by variable id.
    pub vars: SmallVec<[Monomial; 4]>,
    /// Constant term.
    pub constant: BigRational,
    /// Cached evaluation under the current model.
    pub value: BigRational,
    /// Relation of the linear term to zero.
    pub ineq: IneqType,
    /// Dead rows are ignored by all selection logic; the slot keeps row
    /// ids stable.
    pub alive: bool,
}

impl Row {
    pub(crate) fn new() -> Self {
        Self {
            vars: SmallVec::new(),
            constant: BigRational::zero(),
            value: BigRational::zero(),
            ineq: IneqType::Le,
            alive: false,
        }
    }

    /// Coefficient of `v`, or zero when absent. Binary search over the
    /// sorted monomials.
    pub fn coeff(&self, v: VarId) -> BigRational {
        match self.vars.binary_search_by_key(&v, |m| m.var) {
            Ok(i) => self.vars[i].coeff.clone(),
            Err(_) => BigRational::zero(),
        }
    }

    /// Evaluate the linear term under `model` (indexed by variable id).
    pub fn evaluate(&self, model: &[BigRational]) -> BigRational {
        let mut val = self.constant.clone();
        for m in &self.vars {
            val += &m.coeff * &model[m.var];
        }
        val
    }

    /// Whether the cached `value` satisfies the row's relation.
    pub fn is_satisfied(&self) -> bool {
        match self.ineq {
            IneqType::Eq => self.value.is_zero(),
            IneqType::Lt => self.value.is_negative(),
            IneqType::Le => !self.value.is_positive(),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", if self.alive { "+" } else { "-" })?;
        for (i, m) in self.vars.iter().enumerate() {
            if i > 0 && m.coeff.is_positive() {
                write!(f, "+ ")?;
            }
            write!(f, "{}*v{} ", m.coeff, m.var)?;
        }
        if self.constant.is_positive() {
            write!(f, "+ {} ", self.constant)?;
        } else if self.constant.is_negative() {
            write!(f, "{} ", self.constant)?;
        }
        write!(f, "{} 0; value: {}", self.ineq, self.value)
    }
}
