//! Model-based optimization and projection for linear rational arithmetic.
//!
//! This crate maximizes linear objectives and eliminates variables over
//! conjunctions of linear constraints on rational-valued variables, guided
//! by a model (a satisfying assignment) that the engine maintains and
//! repairs. Resolution is Fourier–Motzkin style, but the model picks a
//! single tightest bound per variable instead of enumerating all resolvent
//! pairs, which keeps projection linear in the number of affected rows.
//!
//! Arithmetic is exact ([`num_rational::BigRational`]); strict suprema are
//! reported symbolically as `value − ε` rather than approximated.
//!
//! # Examples
//!
//! Maximize `x` under `x − 3 ≤ 0`:
//!
//! ```
//! use mbopt::{IneqType, ModelBasedOptimizer, Monomial, Optimum};
//! use num_bigint::BigInt;
//! use num_rational::BigRational;
//!
//! fn rat(n: i64) -> BigRational {
//!     BigRational::from_integer(BigInt::from(n))
//! }
//!
//! let mut opt = ModelBasedOptimizer::new();
//! let x = opt.add_var(rat(0));
//! opt.add_constraint(vec![Monomial::new(x, rat(1))], rat(-3), IneqType::Le);
//! opt.set_objective(vec![Monomial::new(x, rat(1))], rat(0));
//!
//! assert_eq!(opt.maximize(), Optimum::Finite(rat(3)));
//! assert_eq!(*opt.get_value(x), rat(3));
//! ```
//!
//! Project a variable out of a constraint system:
//!
//! ```
//! use mbopt::{IneqType, ModelBasedOptimizer, Monomial};
//! use num_bigint::BigInt;
//! use num_rational::BigRational;
//! use num_traits::Zero;
//!
//! fn rat(n: i64) -> BigRational {
//!     BigRational::from_integer(BigInt::from(n))
//! }
//!
//! let mut opt = ModelBasedOptimizer::new();
//! let x = opt.add_var(rat(3));
//! let y = opt.add_var(rat(5));
//! // x - y <= 0, y - 10 <= 0
//! opt.add_constraint(
//!     vec![Monomial::new(x, rat(1)), Monomial::new(y, rat(-1))],
//!     rat(0),
//!     IneqType::Le,
//! );
//! opt.add_constraint(vec![Monomial::new(y, rat(1))], rat(-10), IneqType::Le);
//!
//! opt.project(y);
//!
//! // the surviving system mentions only x and is still satisfied
//! for row in opt.live_rows() {
//!     assert!(row.coeff(y).is_zero());
//!     assert!(row.is_satisfied());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod opt;
pub mod optimum;
pub mod row;

pub use opt::{ModelBasedOptimizer, OptStats, OBJECTIVE_ROW};
pub use optimum::Optimum;
pub use row::{IneqType, Monomial, Row, RowId, VarId};
