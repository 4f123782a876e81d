//! Rewrites a linear program into canonical form
//!
//! ```text
//!        min  c·x
//! subject to  A x == b
//!               x >= 0
//! ```
//! with `b >= 0`. The rewrite introduces new variables and constraints, the
//! [`VarTransform`] records kept alongside the canonical program are enough to recover the
//! values of the original variables, see [`solution`](crate::optimize::solution).
use std::mem;

use log::debug;

use crate::optimize::numeric::Numeric;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::LinearProgram;

/// How to recover an original variable from the canonical solution
///
/// The original value of variable `v` is `value(v) * scale + offset - value(paired)`, where
/// the last term is dropped when there is no paired variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarTransform<T> {
    /// Variable subtracted from the canonical value, used to split free variables
    pub paired: Option<usize>,
    /// Factor applied to the canonical value
    pub scale: T,
    /// Constant added to the scaled canonical value
    pub offset: T,
}

impl<T: Numeric> VarTransform<T> {
    fn identity_shift(offset: T) -> Self {
        VarTransform {
            paired: None,
            scale: T::one(),
            offset,
        }
    }
}

/// A program in canonical form, along with the information to map its solution back
#[derive(Debug, Clone)]
pub struct CanonicalForm<T: Numeric> {
    pub(crate) program: LinearProgram<T>,
    pub(crate) transforms: Vec<VarTransform<T>>,
}

impl<T: Numeric> CanonicalForm<T> {
    /// The canonical program
    pub fn program(&self) -> &LinearProgram<T> {
        &self.program
    }

    /// One transform per variable of the original program
    pub fn transforms(&self) -> &[VarTransform<T>] {
        &self.transforms
    }

    /// Check that the program really is canonical: a minimization with equality constraints,
    /// non-negative right hand sides, and all variables in `[0, inf)`
    pub fn is_canonical(&self) -> bool {
        let lp = &self.program;
        let zero = T::zero();
        lp.sense() == ObjectiveSense::Minimize
            && lp.var_lb.iter().all(|lb| *lb == zero)
            && lp.var_ub.iter().all(|ub| ub.is_infinite_pos())
            && lp.con_lb.iter().zip(&lp.con_ub).all(|(lb, ub)| lb == ub)
            && lp.con_lb.iter().all(|b| !b.less_than(&zero))
    }
}

/// Produce the canonical form of `original`, which is left untouched
///
/// Variables are handled first:
/// - free variables `x` become `x - x'` with a new variable `x' >= 0`
/// - variables with only an upper bound become `ub - x`
/// - variables with a lower bound become `x + lb`, and an upper bound turns into the new
///   constraint `x <= ub - lb`
///
/// Then range constraints are split in two one sided constraints, every one sided constraint
/// receives a slack variable, rows with a negative right hand side are negated, and a
/// maximization becomes a minimization of the negated objective.
pub fn canonicalize<T: Numeric>(original: &LinearProgram<T>) -> CanonicalForm<T> {
    let mut lp = original.clone_model();
    let n_var_orig = lp.n_vars();
    let mut transforms = Vec::with_capacity(n_var_orig);

    for x in 0..n_var_orig {
        let lb = mem::replace(&mut lp.var_lb[x], T::zero());
        let ub = mem::replace(&mut lp.var_ub[x], T::infinity());

        let transform = if lb.is_infinite_neg() && ub.is_infinite_pos() {
            split_free_variable(&mut lp, x)
        } else if lb.is_infinite_neg() {
            reflect_upper_bounded(&mut lp, x, ub)
        } else {
            shift_lower_bounded(&mut lp, x, lb, ub)
        };
        transforms.push(transform);
    }

    split_ranges(&mut lp);
    add_slacks(&mut lp);
    make_rhs_non_negative(&mut lp);

    if lp.is_maximize() {
        lp.objective.negate();
        lp.set_sense(ObjectiveSense::Minimize);
    }

    debug!(
        "Canonical form: {} variables, {} constraints (original {} variables, {} constraints)",
        lp.n_vars(),
        lp.n_cons(),
        original.n_vars(),
        original.n_cons()
    );

    CanonicalForm {
        program: lp,
        transforms,
    }
}

/// `(row, coefficient)` pairs of the column of variable `x`
fn column<T: Numeric>(lp: &LinearProgram<T>, x: usize) -> Vec<(usize, T)> {
    lp.con_coeff
        .range((x, 0)..(x + 1, 0))
        .map(|(&(_, row), value)| (row, value.clone()))
        .collect()
}

fn split_free_variable<T: Numeric>(lp: &mut LinearProgram<T>, x: usize) -> VarTransform<T> {
    let x_neg = lp.make_var(T::zero(), T::infinity()).index();

    // c*x becomes c*(x - x_neg)
    let cost = lp.objective.coefficient(x).clone();
    lp.objective.set_coefficient(x_neg, -cost);

    for (row, value) in column(lp, x) {
        lp.con_coeff.insert((x_neg, row), -value);
    }

    VarTransform {
        paired: Some(x_neg),
        scale: T::one(),
        offset: T::zero(),
    }
}

fn reflect_upper_bounded<T: Numeric>(lp: &mut LinearProgram<T>, x: usize, ub: T) -> VarTransform<T> {
    // x* = ub - x
    let cost = lp.objective.coefficient(x).clone();
    lp.objective.set_coefficient(x, -cost);

    // lb <= c*x* <= ub becomes lb - c*ub <= -c*x <= ub - c*ub
    for ((_, row), value) in lp.con_coeff.range_mut((x, 0)..(x + 1, 0)) {
        let shift = value.clone() * ub.clone();
        if !lp.con_lb[*row].is_infinite_neg() {
            lp.con_lb[*row] -= shift.clone();
        }
        if !lp.con_ub[*row].is_infinite_pos() {
            lp.con_ub[*row] -= shift;
        }
        *value = -value.clone();
    }

    VarTransform {
        paired: None,
        scale: -T::one(),
        offset: ub,
    }
}

fn shift_lower_bounded<T: Numeric>(
    lp: &mut LinearProgram<T>,
    x: usize,
    lb: T,
    ub: T,
) -> VarTransform<T> {
    // x* = x + lb, so lb' <= c*x* <= ub' becomes lb' - c*lb <= c*x <= ub' - c*lb
    for ((_, row), value) in lp.con_coeff.range((x, 0)..(x + 1, 0)) {
        let shift = value.clone() * lb.clone();
        if !lp.con_lb[*row].is_infinite_neg() {
            lp.con_lb[*row] -= shift.clone();
        }
        if !lp.con_ub[*row].is_infinite_pos() {
            lp.con_ub[*row] -= shift;
        }
    }

    // x* <= ub becomes x <= ub - lb
    if !ub.is_infinite_pos() {
        let con = lp.push_con(-T::infinity(), ub - lb.clone());
        lp.con_coeff.insert((x, con.index()), T::one());
    }

    VarTransform::identity_shift(lb)
}

/// Replace every `lb <= a·x <= ub` with `lb != ub` by `a·x >= lb` and a new row `a·x <= ub`
fn split_ranges<T: Numeric>(lp: &mut LinearProgram<T>) {
    let n_con = lp.n_cons();
    let mut split_into: Vec<Option<usize>> = vec![None; n_con];

    for c in 0..n_con {
        let is_range = !lp.con_lb[c].is_infinite_neg()
            && !lp.con_ub[c].is_infinite_pos()
            && lp.con_lb[c] != lp.con_ub[c];
        if is_range {
            let ub = mem::replace(&mut lp.con_ub[c], T::infinity());
            split_into[c] = Some(lp.push_con(-T::infinity(), ub).index());
        }
    }

    let copies = lp
        .con_coeff
        .iter()
        .filter_map(|(&(col, row), value)| {
            split_into[row].map(|new_row| ((col, new_row), value.clone()))
        })
        .collect::<Vec<_>>();
    lp.con_coeff.extend(copies);
}

/// Turn every one sided constraint into an equality with a slack variable
fn add_slacks<T: Numeric>(lp: &mut LinearProgram<T>) {
    for c in 0..lp.n_cons() {
        if lp.con_lb[c].is_infinite_neg() {
            // a·x <= ub becomes a·x + s == ub
            lp.con_lb[c] = lp.con_ub[c].clone();
            let slack = lp.make_var(T::zero(), T::infinity()).index();
            lp.con_coeff.insert((slack, c), T::one());
        } else if lp.con_ub[c].is_infinite_pos() {
            // a·x >= lb becomes a·x - s == lb
            lp.con_ub[c] = lp.con_lb[c].clone();
            let slack = lp.make_var(T::zero(), T::infinity()).index();
            lp.con_coeff.insert((slack, c), -T::one());
        }
    }
}

/// Negate every row whose right hand side is negative
fn make_rhs_non_negative<T: Numeric>(lp: &mut LinearProgram<T>) {
    let zero = T::zero();
    let flip = lp
        .con_ub
        .iter()
        .map(|ub| ub.less_than(&zero))
        .collect::<Vec<_>>();

    for (c, _) in flip.iter().enumerate().filter(|(_, f)| **f) {
        lp.con_lb[c] = -lp.con_lb[c].clone();
        lp.con_ub[c] = -lp.con_ub[c].clone();
    }
    for ((_, row), value) in lp.con_coeff.iter_mut() {
        if flip[*row] {
            *value = -value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::numeric::rat;
    use crate::optimize::{ConId, VarId};
    use num_rational::BigRational;

    fn inf() -> BigRational {
        BigRational::infinity()
    }

    #[test]
    fn free_variable_is_split() {
        let mut lp = LinearProgram::<BigRational>::new_minimization();
        let x = lp.make_var(-inf(), inf());
        let con = lp.make_con(rat(1, 1), rat(1, 1)).unwrap();
        lp.set_con_coeff(con, x, rat(2, 1)).unwrap();
        lp.set_obj_coeff(x, rat(3, 1)).unwrap();

        let canonical = canonicalize(&lp);
        assert!(canonical.is_canonical());
        let program = canonical.program();
        assert_eq!(program.n_vars(), 2);
        assert_eq!(program.con_coeff(ConId(0), VarId(1)).unwrap(), rat(-2, 1));
        assert_eq!(*program.obj_coeff(VarId(1)).unwrap(), rat(-3, 1));
        assert_eq!(
            canonical.transforms(),
            &[VarTransform {
                paired: Some(1),
                scale: rat(1, 1),
                offset: rat(0, 1)
            }]
        );
    }

    #[test]
    fn upper_bounded_variable_is_reflected() {
        let mut lp = LinearProgram::<BigRational>::new_minimization();
        let x = lp.make_var(-inf(), rat(4, 1));
        let con = lp.make_con(rat(-2, 1), inf()).unwrap();
        lp.set_con_coeff(con, x, rat(1, 1)).unwrap();
        lp.set_obj_coeff(x, rat(1, 1)).unwrap();

        let canonical = canonicalize(&lp);
        assert!(canonical.is_canonical());
        let program = canonical.program();
        // x >= -2 becomes 4 - x' >= -2, i.e. -x' >= -6, then slack and row negation give
        // x' + s == 6
        assert_eq!(program.n_vars(), 2);
        assert_eq!(program.con_coeff(ConId(0), VarId(0)).unwrap(), rat(1, 1));
        assert_eq!(program.con_coeff(ConId(0), VarId(1)).unwrap(), rat(1, 1));
        let (lb, ub) = program.con_bounds(ConId(0)).unwrap();
        assert_eq!((lb.clone(), ub.clone()), (rat(6, 1), rat(6, 1)));
        assert_eq!(*program.obj_coeff(VarId(0)).unwrap(), rat(-1, 1));
        assert_eq!(canonical.transforms()[0].scale, rat(-1, 1));
        assert_eq!(canonical.transforms()[0].offset, rat(4, 1));
    }

    #[test]
    fn doubly_bounded_variable_gets_constraint() {
        let mut lp = LinearProgram::<BigRational>::new_maximization();
        let x = lp.make_var(rat(1, 1), rat(3, 1));
        lp.set_obj_coeff(x, rat(1, 1)).unwrap();

        let canonical = canonicalize(&lp);
        assert!(canonical.is_canonical());
        let program = canonical.program();
        // x' + s == 2
        assert_eq!(program.n_cons(), 1);
        assert_eq!(program.n_vars(), 2);
        assert_eq!(*program.con_bounds(ConId(0)).unwrap().0, rat(2, 1));
        // maximization is turned into minimization
        assert_eq!(*program.obj_coeff(x).unwrap(), rat(-1, 1));
        assert_eq!(canonical.transforms()[0].offset, rat(1, 1));
        // the original is untouched
        assert!(lp.is_maximize());
        assert_eq!(*lp.var_bounds(x).unwrap().0, rat(1, 1));
    }

    #[test]
    fn range_constraint_is_split() {
        let mut lp = LinearProgram::<f64>::new_minimization();
        let x = lp.make_var(0., f64::INFINITY);
        let y = lp.make_var(0., f64::INFINITY);
        let con = lp.make_con(1., 5.).unwrap();
        lp.set_con_coeff(con, x, 1.).unwrap();
        lp.set_con_coeff(con, y, 2.).unwrap();

        let canonical = canonicalize(&lp);
        assert!(canonical.is_canonical());
        let program = canonical.program();
        // two rows, each with its own slack
        assert_eq!(program.n_cons(), 2);
        assert_eq!(program.n_vars(), 4);
        assert_eq!(program.con_coeff(ConId(1), y).unwrap(), 2.);
        assert_eq!(program.con_coeff(ConId(0), VarId(2)).unwrap(), -1.);
        assert_eq!(program.con_coeff(ConId(1), VarId(3)).unwrap(), 1.);
        assert_eq!(*program.con_bounds(ConId(0)).unwrap().0, 1.);
        assert_eq!(*program.con_bounds(ConId(1)).unwrap().0, 5.);
    }

    #[test]
    fn negative_rhs_is_negated() {
        let mut lp = LinearProgram::<f64>::new_minimization();
        let x = lp.make_var(0., f64::INFINITY);
        let con = lp.make_con(-3., -3.).unwrap();
        lp.set_con_coeff(con, x, -1.).unwrap();

        let canonical = canonicalize(&lp);
        assert!(canonical.is_canonical());
        let program = canonical.program();
        assert_eq!(program.n_vars(), 1);
        assert_eq!(program.con_coeff(ConId(0), x).unwrap(), 1.);
        assert_eq!(*program.con_bounds(ConId(0)).unwrap().0, 3.);
    }
}
