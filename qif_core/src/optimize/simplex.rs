//! Two-phase revised simplex on a canonical program
//!
//! The engine works on dense [`DMatrix`] storage and keeps the inverse of the basis
//! explicitly. Phase one starts from a basis of artificial variables, one per row, and drives
//! them to zero. Artificials left in the basis at zero level are then pivoted out, or their row
//! is dropped when it is a linear combination of the others. Phase two optimizes the real
//! objective from the feasible basis phase one produced.
//!
//! Pivoting follows Bland's rule: the entering variable is the first column with a negative
//! reduced cost, and ties in the ratio test go to the first row.
use log::{debug, trace};
use nalgebra::DMatrix;

use crate::optimize::numeric::Numeric;
use crate::optimize::problem::LinearProgram;
use crate::optimize::Status;

/// Result of running the simplex engine
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexOutcome<T> {
    /// Terminal status of the run
    pub status: Status,
    /// Values of the canonical variables, only meaningful when the status is optimal
    pub solution: Vec<T>,
}

/// Solve a program already in canonical form, see [`canonicalize`](crate::optimize::canonical::canonicalize)
pub fn solve_canonical<T: Numeric>(program: &LinearProgram<T>) -> SimplexOutcome<T> {
    let mut simplex = RevisedSimplex::new(program);
    let status = simplex.run();
    let mut solution = simplex.sol;
    solution.truncate(simplex.n_var);
    SimplexOutcome { status, solution }
}

struct RevisedSimplex<T: Numeric> {
    n_var: usize,
    n_con: usize,
    /// Constraint matrix, rows removed when found redundant
    a: DMatrix<T>,
    c: Vec<T>,
    /// Inverse of the current basis
    binv: DMatrix<T>,
    /// Basic variable of each row
    basic: Vec<usize>,
    /// Indexed by variable, artificials included
    is_basic: Vec<bool>,
    /// Cost of the basic variable of each row
    cb: Vec<T>,
    /// Current basic solution, artificials included
    sol: Vec<T>,
    phase_one: bool,
}

impl<T: Numeric> RevisedSimplex<T> {
    fn new(program: &LinearProgram<T>) -> Self {
        let n_var = program.n_vars();
        let n_con = program.n_cons();

        let mut a = DMatrix::from_element(n_con, n_var, T::zero());
        for (&(col, row), value) in program.con_coeff.iter() {
            a[(row, col)] = value.clone();
        }

        let binv = DMatrix::from_fn(n_con, n_con, |i, j| {
            if i == j {
                T::one()
            } else {
                T::zero()
            }
        });

        // artificial variables n_var..n_var + n_con form the starting basis, with value b
        let mut sol = vec![T::zero(); n_var];
        sol.extend(program.con_lb.iter().cloned());
        let mut is_basic = vec![false; n_var];
        is_basic.extend(std::iter::repeat(true).take(n_con));

        RevisedSimplex {
            n_var,
            n_con,
            a,
            c: program.objective.coefficients().to_vec(),
            binv,
            basic: (n_var..n_var + n_con).collect(),
            is_basic,
            cb: vec![T::one(); n_con],
            sol,
            phase_one: true,
        }
    }

    fn run(&mut self) -> Status {
        debug!(
            "Simplex phase one: {} variables, {} constraints",
            self.n_var, self.n_con
        );
        let mut iterations = 0usize;

        loop {
            let entering = match self.entering_variable() {
                Some(entering) => entering,
                None if self.phase_one => {
                    if !self.end_phase_one() {
                        debug!("Simplex: infeasible after {} pivots", iterations);
                        return Status::Infeasible;
                    }
                    continue;
                }
                None => {
                    debug!("Simplex: optimal after {} pivots", iterations);
                    return Status::Optimal;
                }
            };

            let direction = self.basis_column(entering);
            let leaving = match self.ratio_test(&direction) {
                Some(leaving) => leaving,
                None => {
                    debug!(
                        "Simplex: unbounded along variable {} after {} pivots",
                        entering, iterations
                    );
                    return Status::Unbounded;
                }
            };

            trace!(
                "Pivot {}: variable {} enters, variable {} leaves row {}",
                iterations,
                entering,
                self.basic[leaving],
                leaving
            );
            self.pivot(leaving, entering, &direction);
            iterations += 1;
        }
    }

    /// First non-basic structural variable with a negative reduced cost
    fn entering_variable(&self) -> Option<usize> {
        // pi = cB * Binv
        let pi = (0..self.n_con)
            .map(|j| {
                (0..self.n_con).fold(T::zero(), |acc, i| {
                    acc + self.cb[i].clone() * self.binv[(i, j)].clone()
                })
            })
            .collect::<Vec<_>>();

        let zero = T::zero();
        (0..self.n_var).filter(|&j| !self.is_basic[j]).find(|&j| {
            let cost = if self.phase_one {
                T::zero()
            } else {
                self.c[j].clone()
            };
            let reduced = (0..self.n_con).fold(cost, |acc, i| {
                acc - pi[i].clone() * self.a[(i, j)].clone()
            });
            reduced.less_than(&zero)
        })
    }

    /// `Binv * A_j`
    fn basis_column(&self, j: usize) -> Vec<T> {
        (0..self.n_con)
            .map(|i| {
                (0..self.n_con).fold(T::zero(), |acc, k| {
                    acc + self.binv[(i, k)].clone() * self.a[(k, j)].clone()
                })
            })
            .collect()
    }

    /// Row with the smallest ratio among rows with a positive coefficient, first row on ties
    fn ratio_test(&self, direction: &[T]) -> Option<usize> {
        let zero = T::zero();
        let mut leaving: Option<(usize, T)> = None;

        for (i, d) in direction.iter().enumerate() {
            if !zero.less_than(d) {
                continue;
            }
            let ratio = self.sol[self.basic[i]].clone() / d.clone();
            match &leaving {
                Some((_, min)) if !ratio.less_than(min) => {}
                _ => leaving = Some((i, ratio)),
            }
        }

        leaving.map(|(i, _)| i)
    }

    fn pivot(&mut self, leaving: usize, entering: usize, direction: &[T]) {
        let step = self.sol[self.basic[leaving]].clone() / direction[leaving].clone();
        for (i, d) in direction.iter().enumerate() {
            self.sol[self.basic[i]] -= step.clone() * d.clone();
        }
        self.sol[entering] = step;

        let pivot = direction[leaving].clone();
        for k in 0..self.n_con {
            self.binv[(leaving, k)] /= pivot.clone();
        }
        for (r, d) in direction.iter().enumerate() {
            if r == leaving {
                continue;
            }
            for k in 0..self.n_con {
                let delta = d.clone() * self.binv[(leaving, k)].clone();
                self.binv[(r, k)] -= delta;
            }
        }

        self.is_basic[self.basic[leaving]] = false;
        self.is_basic[entering] = true;
        self.cb[leaving] = if self.phase_one {
            T::zero()
        } else {
            self.c[entering].clone()
        };
        self.basic[leaving] = entering;
    }

    /// Switch to phase two, returns false when the program is infeasible
    fn end_phase_one(&mut self) -> bool {
        self.phase_one = false;

        let artificial_sum = self.sol[self.n_var..]
            .iter()
            .fold(T::zero(), |acc, v| acc + v.clone());
        if T::zero().less_than(&artificial_sum) {
            return false;
        }

        // drive the remaining artificials out of the basis, they are all at zero
        let zero = T::zero();
        let mut keep = vec![true; self.n_con];
        for i in 0..self.n_con {
            if self.basic[i] < self.n_var {
                continue;
            }
            let replacement = (0..self.n_var).filter(|&j| !self.is_basic[j]).find(|&j| {
                let t = (0..self.n_con).fold(T::zero(), |acc, k| {
                    acc + self.binv[(i, k)].clone() * self.a[(k, j)].clone()
                });
                !t.equal(&zero)
            });
            match replacement {
                Some(j) => {
                    let direction = self.basis_column(j);
                    trace!("Pivot artificial out of row {}: variable {} enters", i, j);
                    self.pivot(i, j, &direction);
                }
                None => keep[i] = false,
            }
        }

        let kept = (0..self.n_con).filter(|&i| keep[i]).collect::<Vec<_>>();
        if kept.len() < self.n_con {
            debug!(
                "Simplex: dropping {} redundant constraints",
                self.n_con - kept.len()
            );
            self.a = self.a.select_rows(kept.iter());
            self.binv = self.binv.select_rows(kept.iter()).select_columns(kept.iter());
            self.basic = kept.iter().map(|&i| self.basic[i]).collect();
            self.n_con = kept.len();
        }

        self.cb = self.basic.iter().map(|&j| self.c[j].clone()).collect();
        debug!("Simplex phase two: {} constraints", self.n_con);
        true
    }
}
