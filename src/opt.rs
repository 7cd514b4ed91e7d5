//! Model-based optimization and projection engine.
//!
//! The engine keeps a dense tableau of constraint rows, a running model
//! (an assignment from variables to rationals satisfying every live
//! constraint), and eliminates variables by Fourier–Motzkin resolution
//! driven by the model: instead of enumerating all resolvent pairs, the
//! row that is tightest under the current assignment is resolved against
//! every other row mentioning the variable.
//!
//! ## Algorithm
//!
//! Maximization repeatedly takes the last monomial of the objective row,
//! finds the model-tightest bound on that variable, folds the bound into
//! the objective and every other affected row, and records the pivot on a
//! trail. When the objective is variable-free its cached value is the
//! supremum; the trail is then replayed in reverse to rebuild a witnessing
//! model. Projection eliminates a variable by picking a single
//! representative bound from the smaller of the lub/glb buckets, so a
//! variable with `N` upper and `M` lower bounds produces `N + M − 1`
//! resolvents instead of `N·M`.
//!
//! ## References
//!
//! - Bjørner & Janota: "Playing with Quantified Satisfaction" (LPAR 2015)
//! - Bjørner, Phan & Fleckenstein: "νZ - An Optimizing SMT Solver" (TACAS 2015)
//! - Dantzig & Eaves: "Fourier-Motzkin Elimination and Its Dual" (1973)

use crate::optimum::Optimum;
use crate::row::{IneqType, Monomial, Row, RowId, VarId};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt;
use tracing::{debug, trace};

/// Row id reserved for the objective.
pub const OBJECTIVE_ROW: RowId = 0;

/// Counters for engine activity.
#[derive(Debug, Clone, Default)]
pub struct OptStats {
    /// Constraint rows added.
    pub constraints_added: u64,
    /// Resolution steps performed.
    pub resolutions: u64,
    /// Variables eliminated by maximization or projection.
    pub vars_eliminated: u64,
    /// Projection calls.
    pub projections: u64,
}

/// The model-tightest bound on a variable, with the rows left to resolve.
struct BoundChoice {
    /// Pivot row supplying the bound.
    row: RowId,
    /// The pivot row's coefficient on the bounded variable.
    coeff: BigRational,
    /// Candidate rows displaced by or looser than the pivot.
    above: Vec<RowId>,
    /// Opposite-sign rows, resolved after the candidates.
    below: Vec<RowId>,
}

/// Model-based optimizer for linear rational arithmetic.
///
/// Rows live in a dense store; row [`OBJECTIVE_ROW`] is the objective.
/// The per-variable row index is append-only: entries go stale when a
/// variable is eliminated from a row and are filtered at read time by a
/// zero-coefficient test.
#[derive(Debug)]
pub struct ModelBasedOptimizer {
    rows: Vec<Row>,
    /// Model: variable id to current value.
    values: Vec<BigRational>,
    /// Variable id to rows mentioning it; stale entries tolerated.
    var_rows: Vec<Vec<RowId>>,
    stats: OptStats,
}

impl ModelBasedOptimizer {
    /// Create an engine with an empty, trivially true objective row.
    pub fn new() -> Self {
        Self {
            rows: vec![Row::new()],
            values: Vec::new(),
            var_rows: Vec::new(),
            stats: OptStats::default(),
        }
    }

    /// Register a new variable with its initial model value.
    pub fn add_var(&mut self, value: BigRational) -> VarId {
        let v = self.values.len();
        self.values.push(value);
        self.var_rows.push(Vec::new());
        v
    }

    /// Number of registered variables.
    pub fn num_vars(&self) -> usize {
        self.values.len()
    }

    /// Current model value of `v`.
    pub fn get_value(&self, v: VarId) -> &BigRational {
        &self.values[v]
    }

    /// Overwrite the model value of `x` and delta-update the cached value
    /// of every row mentioning it.
    ///
    /// The new value must keep every live constraint satisfied.
    pub fn update_value(&mut self, x: VarId, val: BigRational) {
        let old = std::mem::replace(&mut self.values[x], val);
        for i in 0..self.var_rows[x].len() {
            let row_id = self.var_rows[x][i];
            let coeff = self.rows[row_id].coeff(x);
            if coeff.is_zero() {
                continue;
            }
            let delta = &coeff * (&self.values[x] - &old);
            self.rows[row_id].value += delta;
            debug_assert!(self.row_invariant(row_id));
        }
    }

    /// Append a constraint row. The current model must satisfy it.
    pub fn add_constraint(
        &mut self,
        coeffs: Vec<Monomial>,
        constant: BigRational,
        ineq: IneqType,
    ) -> RowId {
        let row_id = self.rows.len();
        self.rows.push(Row::new());
        let vars: SmallVec<[VarId; 4]> = coeffs.iter().map(|m| m.var).collect();
        self.set_row(row_id, coeffs, constant, ineq);
        for v in vars {
            self.var_rows[v].push(row_id);
        }
        self.stats.constraints_added += 1;
        row_id
    }

    /// Set the objective to the given linear expression.
    ///
    /// The objective never contributes entries to the row index: it is
    /// never used as a bound-providing row.
    pub fn set_objective(&mut self, coeffs: Vec<Monomial>, constant: BigRational) {
        self.set_row(OBJECTIVE_ROW, coeffs, constant, IneqType::Le);
    }

    /// The objective row.
    pub fn objective(&self) -> &Row {
        &self.rows[OBJECTIVE_ROW]
    }

    /// Copies of all live rows in row-id order. When an objective has been
    /// set it is row 0 and therefore first.
    pub fn live_rows(&self) -> Vec<Row> {
        self.rows.iter().filter(|r| r.alive).cloned().collect()
    }

    /// Engine counters.
    pub fn stats(&self) -> &OptStats {
        &self.stats
    }

    fn set_row(
        &mut self,
        row_id: RowId,
        mut coeffs: Vec<Monomial>,
        constant: BigRational,
        ineq: IneqType,
    ) {
        coeffs.sort_by_key(|m| m.var);
        let mut value = constant.clone();
        for m in &coeffs {
            debug_assert!(!m.coeff.is_zero());
            value += &m.coeff * &self.values[m.var];
        }
        let r = &mut self.rows[row_id];
        debug_assert!(r.vars.is_empty());
        r.vars = coeffs.into_iter().collect();
        debug_assert!(r.vars.windows(2).all(|w| w[0].var < w[1].var));
        r.constant = constant;
        r.value = value;
        r.ineq = ineq;
        r.alive = true;
        debug_assert!(self.row_invariant(row_id));
    }

    /// Maximize the objective over the live constraints.
    ///
    /// Returns the supremum as an [`Optimum`] and updates the model to
    /// witness it (within ε for a strict bound). Precondition: the model
    /// satisfies every live constraint.
    pub fn maximize(&mut self) -> Optimum {
        debug_assert!(self.invariant());
        trace!("maximize tableau:\n{self}");
        let mut trail: Vec<(VarId, RowId)> = Vec::new();
        loop {
            let (x, coeff) = match self.rows[OBJECTIVE_ROW].vars.last() {
                Some(m) => (m.var, m.coeff.clone()),
                None => break,
            };
            let Some(choice) = self.find_bound(x, coeff.is_positive()) else {
                debug!("objective unbounded in direction of v{x}");
                self.update_values(&trail);
                return Optimum::Unbounded;
            };
            debug_assert!(!choice.coeff.is_zero());
            trace!("eliminate v{} with pivot {}", x, self.rows[choice.row]);
            for &row_id in &choice.above {
                self.resolve(choice.row, &choice.coeff, row_id, x);
            }
            for &row_id in &choice.below {
                self.resolve(choice.row, &choice.coeff, row_id, x);
            }
            // coeff*x + objective <= ub,  a*x + t <= 0
            // => objective + t*coeff/a <= ub
            let c = -&coeff / &choice.coeff;
            self.mul_add(false, OBJECTIVE_ROW, &c, choice.row);
            self.rows[choice.row].alive = false;
            trail.push((x, choice.row));
            self.stats.vars_eliminated += 1;
        }
        self.update_values(&trail);
        let value = self.rows[OBJECTIVE_ROW].value.clone();
        if self.rows[OBJECTIVE_ROW].ineq == IneqType::Lt {
            Optimum::Strict(value)
        } else {
            Optimum::Finite(value)
        }
    }

    /// Eliminate `x` from the constraint system, preserving satisfiability
    /// under the current model.
    pub fn project(&mut self, x: VarId) {
        self.stats.projections += 1;
        let x_val = &self.values[x];
        let mut lub_rows: Vec<RowId> = Vec::new();
        let mut glb_rows: Vec<RowId> = Vec::new();
        // (row, bound value, strict)
        let mut lub: Option<(RowId, BigRational, bool)> = None;
        let mut glb: Option<(RowId, BigRational, bool)> = None;
        let mut eq_row: Option<RowId> = None;
        let mut visited = FxHashSet::default();
        for &row_id in &self.var_rows[x] {
            if !visited.insert(row_id) {
                continue;
            }
            let r = &self.rows[row_id];
            if !r.alive {
                continue;
            }
            let a = r.coeff(x);
            if a.is_zero() {
                continue;
            }
            if r.ineq == IneqType::Eq {
                eq_row = Some(row_id);
                break;
            }
            let bound = x_val - &r.value / &a;
            let strict = r.ineq == IneqType::Lt;
            if a.is_positive() {
                let better = match &lub {
                    None => true,
                    Some((_, best, best_strict)) => {
                        bound < *best || (bound == *best && strict && !best_strict)
                    }
                };
                if better {
                    lub = Some((row_id, bound, strict));
                }
                lub_rows.push(row_id);
            } else {
                let better = match &glb {
                    None => true,
                    Some((_, best, best_strict)) => {
                        bound > *best || (bound == *best && strict && !best_strict)
                    }
                };
                if better {
                    glb = Some((row_id, bound, strict));
                }
                glb_rows.push(row_id);
            }
        }
        if let Some(eq) = eq_row {
            self.solve_for(eq, x);
            return;
        }
        // The representative comes from the smaller bucket: it is resolved
        // against all others, so the smaller bucket generates fewer
        // resolvents. An empty bucket means x is bounded on at most one
        // side and every row mentioning it can be dropped.
        let representative = if lub_rows.len() <= glb_rows.len() {
            lub.map(|(row, _, _)| row)
        } else {
            glb.map(|(row, _, _)| row)
        };
        glb_rows.extend_from_slice(&lub_rows);
        match representative {
            None => {
                for row_id in glb_rows {
                    debug_assert!(self.rows[row_id].alive);
                    debug_assert!(!self.rows[row_id].coeff(x).is_zero());
                    self.rows[row_id].alive = false;
                }
            }
            Some(rep) => {
                let a = self.rows[rep].coeff(x);
                for row_id in glb_rows {
                    if row_id != rep {
                        self.resolve(rep, &a, row_id, x);
                    }
                }
                self.rows[rep].alive = false;
                self.stats.vars_eliminated += 1;
            }
        }
    }

    /// Project each variable in order.
    pub fn project_vars(&mut self, vars: &[VarId]) {
        for &v in vars {
            self.project(v);
        }
    }

    /// Resolve `x` out of every other row via an equality row, then retire
    /// the equality.
    fn solve_for(&mut self, eq_id: RowId, x: VarId) {
        let a = self.rows[eq_id].coeff(x);
        debug_assert!(!a.is_zero());
        debug_assert_eq!(self.rows[eq_id].ineq, IneqType::Eq);
        debug_assert!(self.rows[eq_id].alive);
        let mut visited = FxHashSet::default();
        visited.insert(eq_id);
        for i in 0..self.var_rows[x].len() {
            let row_id = self.var_rows[x][i];
            if visited.insert(row_id) {
                self.resolve(eq_id, &a, row_id, x);
            }
        }
        self.rows[eq_id].alive = false;
        self.stats.vars_eliminated += 1;
    }

    /// Find the model-tightest bound on `x` among the live rows.
    ///
    /// A row supplies a candidate when its coefficient sign matches
    /// `is_pos` or it is an equality; the candidate value is the value `x`
    /// would take if the row were tight. For `is_pos` the least upper
    /// bound wins, otherwise the greatest lower bound; on value ties a
    /// strict row displaces the incumbent. Displaced and losing candidates
    /// are collected in `above`, opposite-sign rows in `below`; all of
    /// them must be resolved against the pivot.
    fn find_bound(&self, x: VarId, is_pos: bool) -> Option<BoundChoice> {
        let x_val = &self.values[x];
        // (row, coeff on x, bound value)
        let mut best: Option<(RowId, BigRational, BigRational)> = None;
        let mut above: Vec<RowId> = Vec::new();
        let mut below: Vec<RowId> = Vec::new();
        let mut visited = FxHashSet::default();
        for &row_id in &self.var_rows[x] {
            debug_assert_ne!(row_id, OBJECTIVE_ROW);
            if !visited.insert(row_id) {
                continue;
            }
            let r = &self.rows[row_id];
            if !r.alive {
                continue;
            }
            let a = r.coeff(x);
            if a.is_zero() {
                // stale index entry
            } else if a.is_positive() == is_pos || r.ineq == IneqType::Eq {
                let value = x_val - &r.value / &a;
                let is_better = match &best {
                    None => true,
                    Some((_, _, best_val)) => {
                        (value == *best_val && r.ineq == IneqType::Lt)
                            || (is_pos && value < *best_val)
                            || (!is_pos && value > *best_val)
                    }
                };
                if is_better {
                    if let Some((prev, _, _)) = best.replace((row_id, a, value)) {
                        above.push(prev);
                    }
                } else {
                    above.push(row_id);
                }
            } else {
                below.push(row_id);
            }
        }
        best.map(|(row, coeff, _)| BoundChoice {
            row,
            coeff,
            above,
            below,
        })
    }

    /// Eliminate `x` from `dst` by adding the right multiple of `src`.
    ///
    /// `a_src` is `src`'s coefficient on `x`, and must be nonzero.
    /// Resolving into the objective always counts as opposite-signed, so a
    /// strict source makes the objective strict.
    fn resolve(&mut self, src_id: RowId, a_src: &BigRational, dst_id: RowId, x: VarId) {
        debug_assert_eq!(*a_src, self.rows[src_id].coeff(x));
        debug_assert!(!a_src.is_zero());
        debug_assert_ne!(src_id, dst_id);
        if !self.rows[dst_id].alive {
            return;
        }
        let a_dst = self.rows[dst_id].coeff(x);
        let same_sign = dst_id != OBJECTIVE_ROW && a_src.is_positive() == a_dst.is_positive();
        let c = -a_dst / a_src;
        self.mul_add(same_sign, dst_id, &c, src_id);
        self.stats.resolutions += 1;
    }

    /// Replace `dst` by `dst + c·src`, merging the sorted monomial lists.
    ///
    /// Monomials whose coefficients cancel are dropped; `constant` and the
    /// cached `value` are updated algebraically in the same pass. Every
    /// monomial imported from `src` that was not already in `dst` appends
    /// `dst` to the row index — skipped for the objective, which never
    /// serves as a bound.
    fn mul_add(&mut self, same_sign: bool, dst_id: RowId, c: &BigRational, src_id: RowId) {
        if c.is_zero() {
            return;
        }
        debug_assert_ne!(dst_id, src_id);
        let mut merged: SmallVec<[Monomial; 4]> = SmallVec::new();
        let mut imported: SmallVec<[VarId; 4]> = SmallVec::new();
        {
            let dst = &self.rows[dst_id];
            let src = &self.rows[src_id];
            let (mut i, mut j) = (0, 0);
            while i < dst.vars.len() || j < src.vars.len() {
                if j == src.vars.len() {
                    merged.extend(dst.vars[i..].iter().cloned());
                    break;
                }
                if i == dst.vars.len() {
                    for m in &src.vars[j..] {
                        merged.push(Monomial::new(m.var, c * &m.coeff));
                        imported.push(m.var);
                    }
                    break;
                }
                let (v1, v2) = (dst.vars[i].var, src.vars[j].var);
                if v1 == v2 {
                    let coeff = &dst.vars[i].coeff + c * &src.vars[j].coeff;
                    if !coeff.is_zero() {
                        merged.push(Monomial::new(v1, coeff));
                    }
                    i += 1;
                    j += 1;
                } else if v1 < v2 {
                    merged.push(dst.vars[i].clone());
                    i += 1;
                } else {
                    merged.push(Monomial::new(v2, c * &src.vars[j].coeff));
                    imported.push(v2);
                    j += 1;
                }
            }
        }
        let src_constant = self.rows[src_id].constant.clone();
        let src_value = self.rows[src_id].value.clone();
        let src_ineq = self.rows[src_id].ineq;
        let dst = &mut self.rows[dst_id];
        dst.vars = merged;
        dst.constant += c * &src_constant;
        dst.value += c * &src_value;
        if !same_sign && src_ineq == IneqType::Lt {
            dst.ineq = IneqType::Lt;
        } else if same_sign && dst.ineq == IneqType::Lt && src_ineq == IneqType::Lt {
            // two strict bounds in the same orientation leave a non-strict
            // bound on the remaining variables
            dst.ineq = IneqType::Le;
        }
        if dst_id != OBJECTIVE_ROW {
            for v in imported {
                self.var_rows[v].push(dst_id);
            }
        }
        debug_assert!(self.row_invariant(dst_id));
    }

    /// Replay the bound trail in reverse to rebuild a witnessing model.
    ///
    /// Each variable is solved from its pivot row with the later-eliminated
    /// (already repaired) variables treated as constants. Strict pivots get
    /// an ε nudge in the direction their coefficient demands.
    fn update_values(&mut self, trail: &[(VarId, RowId)]) {
        for &(x, row_id) in trail.iter().rev() {
            let mut val = self.rows[row_id].constant.clone();
            let mut x_coeff = BigRational::zero();
            for m in &self.rows[row_id].vars {
                if m.var == x {
                    x_coeff = m.coeff.clone();
                } else {
                    val += &m.coeff * &self.values[m.var];
                }
            }
            debug_assert!(!x_coeff.is_zero());
            let mut new_val = -val / &x_coeff;
            if self.rows[row_id].ineq == IneqType::Lt {
                let old_val = &self.values[x];
                let eps = ((old_val - &new_val).abs() / BigRational::from_integer(2.into()))
                    .min(BigRational::one());
                debug_assert!(!eps.is_zero());
                //     a*x + t < 0   <=>  x < -t/a   <=>  x := -t/a - eps
                //    -a*x + t < 0   <=>  x > t/a    <=>  x := t/a + eps
                if x_coeff.is_positive() {
                    new_val -= eps;
                } else {
                    new_val += eps;
                }
            }
            trace!("repair v{x} := {new_val}");
            self.values[x] = new_val;
            let value = self.rows[row_id].evaluate(&self.values);
            self.rows[row_id].value = value;
            debug_assert!(self.row_invariant(row_id));
        }
        // refresh every other row touched by the repaired variables
        for &(x, _) in trail.iter().rev() {
            for i in 0..self.var_rows[x].len() {
                let row_id = self.var_rows[x][i];
                let value = self.rows[row_id].evaluate(&self.values);
                self.rows[row_id].value = value;
                debug_assert!(self.row_invariant(row_id));
            }
        }
        debug_assert!(self.invariant());
    }

    fn row_invariant(&self, row_id: RowId) -> bool {
        let r = &self.rows[row_id];
        let canonical = r.vars.windows(2).all(|w| w[0].var < w[1].var)
            && r.vars.iter().all(|m| !m.coeff.is_zero());
        let coherent = r.value == r.evaluate(&self.values);
        let satisfied = match r.ineq {
            IneqType::Eq => r.value.is_zero(),
            IneqType::Lt => row_id == OBJECTIVE_ROW || r.value.is_negative(),
            IneqType::Le => row_id == OBJECTIVE_ROW || !r.value.is_positive(),
        };
        canonical && coherent && satisfied
    }

    fn invariant(&self) -> bool {
        (0..self.rows.len()).all(|i| self.row_invariant(i))
    }
}

impl Default for ModelBasedOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModelBasedOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.rows {
            writeln!(f, "{r}")?;
        }
        for (v, val) in self.values.iter().enumerate() {
            writeln!(f, "v{v} := {val}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn rat(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn mono(v: VarId, c: i64) -> Monomial {
        Monomial::new(v, rat(c))
    }

    #[test]
    fn test_unbounded() {
        // no constraints: v0 can grow without bound
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        opt.set_objective(vec![mono(v0, 1)], rat(0));

        assert_eq!(opt.maximize(), Optimum::Unbounded);
    }

    #[test]
    fn test_simple_bound() {
        // v0 - 3 <= 0, maximize v0
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1)], rat(-3), IneqType::Le);
        opt.set_objective(vec![mono(v0, 1)], rat(0));

        assert_eq!(opt.maximize(), Optimum::Finite(rat(3)));
        assert_eq!(*opt.get_value(v0), rat(3));
    }

    #[test]
    fn test_two_bounds_lub_wins() {
        // v0 - 5 <= 0 and v0 - 2 <= 0: the tighter bound decides
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1)], rat(-5), IneqType::Le);
        opt.add_constraint(vec![mono(v0, 1)], rat(-2), IneqType::Le);
        opt.set_objective(vec![mono(v0, 1)], rat(0));

        assert_eq!(opt.maximize(), Optimum::Finite(rat(2)));
        assert_eq!(*opt.get_value(v0), rat(2));
    }

    #[test]
    fn test_strict_bound() {
        // v0 - 4 < 0: supremum 4 is not attained
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1)], rat(-4), IneqType::Lt);
        opt.set_objective(vec![mono(v0, 1)], rat(0));

        assert_eq!(opt.maximize(), Optimum::Strict(rat(4)));
        assert!(*opt.get_value(v0) < rat(4));
        // the witness still satisfies the constraint strictly
        for r in opt.live_rows().iter().skip(1) {
            assert!(r.is_satisfied());
        }
    }

    #[test]
    fn test_resolution_chain() {
        // v0 - v1 <= 0, v1 - 7 <= 0: v0's bound goes through v1
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        let v1 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1), mono(v1, -1)], rat(0), IneqType::Le);
        opt.add_constraint(vec![mono(v1, 1)], rat(-7), IneqType::Le);
        opt.set_objective(vec![mono(v0, 1)], rat(0));

        assert_eq!(opt.maximize(), Optimum::Finite(rat(7)));
        assert_eq!(*opt.get_value(v0), rat(7));
        assert_eq!(*opt.get_value(v1), rat(7));
    }

    #[test]
    fn test_maximize_with_lower_bounds() {
        // -v0 + 1 <= 0 (v0 >= 1), v0 - 6 <= 0, maximize v0 at model v0 = 2
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(2));
        opt.add_constraint(vec![mono(v0, -1)], rat(1), IneqType::Le);
        opt.add_constraint(vec![mono(v0, 1)], rat(-6), IneqType::Le);
        opt.set_objective(vec![mono(v0, 1)], rat(0));

        assert_eq!(opt.maximize(), Optimum::Finite(rat(6)));
        assert_eq!(*opt.get_value(v0), rat(6));
        // the lower bound survives resolution and stays satisfied
        for r in opt.live_rows().iter().skip(1) {
            assert!(r.is_satisfied());
        }
    }

    #[test]
    fn test_minimize_via_negated_objective() {
        // minimize v0 subject to -v0 + 1 <= 0 by maximizing -v0
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(5));
        opt.add_constraint(vec![mono(v0, -1)], rat(1), IneqType::Le);
        opt.set_objective(vec![mono(v0, -1)], rat(0));

        assert_eq!(opt.maximize(), Optimum::Finite(rat(-1)));
        assert_eq!(*opt.get_value(v0), rat(1));
    }

    #[test]
    fn test_equality_bounds_both_sides() {
        // v0 - v1 = 0, v1 - 3 <= 0, maximize v0
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        let v1 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1), mono(v1, -1)], rat(0), IneqType::Eq);
        opt.add_constraint(vec![mono(v1, 1)], rat(-3), IneqType::Le);
        opt.set_objective(vec![mono(v0, 1)], rat(0));

        assert_eq!(opt.maximize(), Optimum::Finite(rat(3)));
        assert_eq!(*opt.get_value(v0), rat(3));
        assert_eq!(*opt.get_value(v1), rat(3));
    }

    #[test]
    fn test_objective_constant_offset() {
        // maximize v0 + 10 subject to v0 - 1 <= 0
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1)], rat(-1), IneqType::Le);
        opt.set_objective(vec![mono(v0, 1)], rat(10));

        assert_eq!(opt.maximize(), Optimum::Finite(rat(11)));
    }

    #[test]
    fn test_project_two_sided() {
        // v0 - v1 <= 0, v1 - 10 <= 0, -v1 + 1 <= 0; eliminate v1
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(3));
        let v1 = opt.add_var(rat(5));
        opt.add_constraint(vec![mono(v0, 1), mono(v1, -1)], rat(0), IneqType::Le);
        opt.add_constraint(vec![mono(v1, 1)], rat(-10), IneqType::Le);
        opt.add_constraint(vec![mono(v1, -1)], rat(1), IneqType::Le);

        opt.project(v1);

        let rows = opt.live_rows();
        assert!(!rows.is_empty());
        for r in &rows {
            assert!(r.coeff(v1).is_zero());
            assert!(r.is_satisfied());
        }
        // the surviving system implies v0 <= 10 and admits the old value
        assert_eq!(*opt.get_value(v0), rat(3));
        let bound = rows
            .iter()
            .find(|r| r.coeff(v0) == rat(1))
            .expect("resolvent mentioning v0");
        assert_eq!(bound.constant, rat(-10));
    }

    #[test]
    fn test_project_one_sided_drops_rows() {
        // only lower bounds on v1: projection drops them all
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        let v1 = opt.add_var(rat(2));
        opt.add_constraint(vec![mono(v1, -1)], rat(1), IneqType::Le);
        opt.add_constraint(vec![mono(v0, 1), mono(v1, -1)], rat(0), IneqType::Le);

        opt.project(v1);

        assert!(opt.live_rows().is_empty());
    }

    #[test]
    fn test_project_equality_short_circuits() {
        // v1 = v0 + 1, v1 - 5 <= 0: the equality substitutes v1 away
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        let v1 = opt.add_var(rat(1));
        opt.add_constraint(vec![mono(v0, 1), mono(v1, -1)], rat(1), IneqType::Eq);
        opt.add_constraint(vec![mono(v1, 1)], rat(-5), IneqType::Le);

        opt.project(v1);

        let rows = opt.live_rows();
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        // v0 + 1 - 5 <= 0
        assert_eq!(r.coeff(v0), rat(1));
        assert_eq!(r.constant, rat(-4));
        assert!(r.coeff(v1).is_zero());
        assert!(r.is_satisfied());
    }

    #[test]
    fn test_project_idempotent() {
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(3));
        let v1 = opt.add_var(rat(5));
        opt.add_constraint(vec![mono(v0, 1), mono(v1, -1)], rat(0), IneqType::Le);
        opt.add_constraint(vec![mono(v1, 1)], rat(-10), IneqType::Le);

        opt.project(v1);
        let after_first: Vec<String> = opt.live_rows().iter().map(|r| r.to_string()).collect();
        opt.project(v1);
        let after_second: Vec<String> = opt.live_rows().iter().map(|r| r.to_string()).collect();

        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_project_vars_in_order() {
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        let v1 = opt.add_var(rat(1));
        let v2 = opt.add_var(rat(2));
        opt.add_constraint(vec![mono(v0, 1), mono(v1, -1)], rat(0), IneqType::Le);
        opt.add_constraint(vec![mono(v1, 1), mono(v2, -1)], rat(0), IneqType::Le);
        opt.add_constraint(vec![mono(v2, 1)], rat(-4), IneqType::Le);

        opt.project_vars(&[v1, v2]);

        for r in opt.live_rows() {
            assert!(r.coeff(v1).is_zero());
            assert!(r.coeff(v2).is_zero());
            assert!(r.is_satisfied());
        }
    }

    #[test]
    fn test_update_value_refreshes_rows() {
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1)], rat(-5), IneqType::Le);

        opt.update_value(v0, rat(2));

        assert_eq!(*opt.get_value(v0), rat(2));
        let rows = opt.live_rows();
        assert_eq!(rows[0].value, rat(-3));
    }

    #[test]
    fn test_add_constraint_returns_fresh_ids() {
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        let r1 = opt.add_constraint(vec![mono(v0, 1)], rat(-1), IneqType::Le);
        let r2 = opt.add_constraint(vec![mono(v0, 1)], rat(-2), IneqType::Le);

        assert_eq!(r1, 1);
        assert_eq!(r2, 2);
        assert_eq!(opt.stats().constraints_added, 2);
    }

    #[test]
    fn test_live_rows_excludes_dead() {
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1)], rat(-3), IneqType::Le);
        opt.set_objective(vec![mono(v0, 1)], rat(0));
        assert_eq!(opt.live_rows().len(), 2);

        opt.maximize();

        // the pivot died; only the objective survives
        assert_eq!(opt.live_rows().len(), 1);
    }

    #[test]
    fn test_fractional_coefficients() {
        // 2*v0 - 7 <= 0: optimum is 7/2
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 2)], rat(-7), IneqType::Le);
        opt.set_objective(vec![mono(v0, 1)], rat(0));

        let half_seven = BigRational::new(BigInt::from(7), BigInt::from(2));
        assert_eq!(opt.maximize(), Optimum::Finite(half_seven.clone()));
        assert_eq!(*opt.get_value(v0), half_seven);
    }

    #[test]
    fn test_strict_pair_same_orientation() {
        // v0 - 3 < 0 and v0 - 3 < 0 (duplicate strict bounds): the loser
        // resolved against the strict pivot becomes non-strict
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1)], rat(-3), IneqType::Lt);
        opt.add_constraint(vec![mono(v0, 1)], rat(-3), IneqType::Lt);
        opt.set_objective(vec![mono(v0, 1)], rat(0));

        assert_eq!(opt.maximize(), Optimum::Strict(rat(3)));
        assert!(*opt.get_value(v0) < rat(3));
        for r in opt.live_rows().iter().skip(1) {
            assert!(r.is_satisfied());
        }
    }

    #[test]
    fn test_stats_count_work() {
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(0));
        let v1 = opt.add_var(rat(0));
        opt.add_constraint(vec![mono(v0, 1), mono(v1, -1)], rat(0), IneqType::Le);
        opt.add_constraint(vec![mono(v1, 1)], rat(-7), IneqType::Le);
        opt.set_objective(vec![mono(v0, 1)], rat(0));
        opt.maximize();

        assert_eq!(opt.stats().vars_eliminated, 2);
        assert_eq!(opt.stats().constraints_added, 2);
    }

    #[test]
    fn test_display_tableau() {
        let mut opt = ModelBasedOptimizer::new();
        let v0 = opt.add_var(rat(1));
        opt.add_constraint(vec![mono(v0, 1)], rat(-3), IneqType::Le);
        let shown = opt.to_string();
        assert!(shown.contains("1*v0 -3 <= 0"));
        assert!(shown.contains("v0 := 1"));
    }
}
