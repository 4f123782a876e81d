//! Implements a solver interface for Clarabel
//!
//! Clarabel solves conic programs `min q·x, A x + s == b, s in K`. Equality constraints and
//! fixed variables go to a zero cone, every finite side of the remaining constraints and
//! variable bounds becomes one row of a non-negative cone.
use clarabel::algebra::*;
use clarabel::solver::*;

use crate::configuration::SolverConfig;
use crate::optimize::numeric::Numeric;
use crate::optimize::problem::LinearProgram;
use crate::optimize::solvers::{values_from_f64, FloatProgram, LinearSolver};
use crate::optimize::{LpError, Method, MsgLevel, ProblemSolution, Solver, Status};

/// Interior point backend, always available
#[derive(Debug, Clone, Copy, Default)]
pub struct ClarabelSolver;

impl LinearSolver for ClarabelSolver {
    fn solve<T: Numeric>(
        &self,
        lp: &LinearProgram<T>,
        config: &SolverConfig,
    ) -> Result<ProblemSolution<T>, LpError> {
        match config.method {
            Method::Auto | Method::Interior => {}
            method => {
                return Err(LpError::UnsupportedMethod {
                    solver: Solver::Clarabel,
                    method,
                })
            }
        }

        let program = FloatProgram::new(lp);
        let n = program.n_vars();
        if n == 0 {
            // every row evaluates to 0
            let feasible = program
                .con_lb
                .iter()
                .zip(&program.con_ub)
                .all(|(&lb, &ub)| lb <= 0. && 0. <= ub);
            if !feasible {
                return Ok(ProblemSolution::without_values(Status::Infeasible));
            }
            return Ok(ProblemSolution {
                status: Status::Optimal,
                variable_values: Some(Vec::new()),
            });
        }

        let rows = ConicRows::new(&program);
        let p = CscMatrix::new(n, n, vec![0; n + 1], vec![], vec![]);
        let q = if program.maximize {
            program.objective.iter().map(|c| -c).collect::<Vec<_>>()
        } else {
            program.objective.clone()
        };
        let a = rows.matrix(n);
        let n_inequalities = rows.rhs.len() - rows.n_equalities;
        let mut cones = Vec::with_capacity(2);
        if rows.n_equalities > 0 {
            cones.push(SupportedConeT::ZeroConeT(rows.n_equalities));
        }
        if n_inequalities > 0 {
            cones.push(SupportedConeT::NonnegativeConeT(n_inequalities));
        }

        let settings = DefaultSettingsBuilder::default()
            .verbose(config.msg_level >= MsgLevel::On)
            .presolve_enable(config.presolve)
            .build()
            .map_err(|e| LpError::Backend(e.to_string()))?;

        let mut solver = DefaultSolver::new(&p, &q, &a, &rows.rhs, &cones, settings);
        solver.solve();

        let status = match solver.solution.status {
            SolverStatus::Solved | SolverStatus::AlmostSolved => Status::Optimal,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                Status::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                Status::Unbounded
            }
            _ => Status::Error,
        };
        if status != Status::Optimal {
            return Ok(ProblemSolution::without_values(status));
        }

        Ok(ProblemSolution {
            status,
            variable_values: Some(values_from_f64(&solver.solution.x)),
        })
    }
}

/// Rows of `A x + s == b`, equality rows first
struct ConicRows {
    n_equalities: usize,
    /// `(column, coefficient)` pairs of each row
    coefficients: Vec<Vec<(usize, f64)>>,
    rhs: Vec<f64>,
}

impl ConicRows {
    fn new(program: &FloatProgram) -> Self {
        let mut equalities = ConicRows {
            n_equalities: 0,
            coefficients: Vec::new(),
            rhs: Vec::new(),
        };
        let mut inequalities = Vec::new();

        let constraints = program
            .rows
            .iter()
            .cloned()
            .zip(program.con_lb.iter().zip(&program.con_ub));
        let bounds = (0..program.n_vars())
            .map(|j| vec![(j, 1.)])
            .zip(program.var_lb.iter().zip(&program.var_ub));

        for (row, (&lb, &ub)) in constraints.chain(bounds) {
            if lb == ub {
                equalities.coefficients.push(row);
                equalities.rhs.push(ub);
                continue;
            }
            // a·x <= ub is a·x + s == ub
            if ub.is_finite() {
                inequalities.push((row.clone(), ub));
            }
            // a·x >= lb is -a·x + s == -lb
            if lb.is_finite() {
                let negated = row.iter().map(|&(j, v)| (j, -v)).collect();
                inequalities.push((negated, -lb));
            }
        }

        equalities.n_equalities = equalities.rhs.len();
        for (row, rhs) in inequalities {
            equalities.coefficients.push(row);
            equalities.rhs.push(rhs);
        }
        equalities
    }

    /// Constraint matrix in compressed sparse column format
    fn matrix(&self, n: usize) -> CscMatrix<f64> {
        let mut columns = vec![Vec::new(); n];
        for (i, row) in self.coefficients.iter().enumerate() {
            for &(j, value) in row {
                if value != 0. {
                    columns[j].push((i, value));
                }
            }
        }

        let mut colptr = Vec::with_capacity(n + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        colptr.push(0);
        for column in columns {
            for (i, value) in column {
                rowval.push(i);
                nzval.push(value);
            }
            colptr.push(rowval.len());
        }
        CscMatrix::new(self.rhs.len(), n, colptr, rowval, nzval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SolverConfig {
        SolverConfig::with_solver(Solver::Clarabel)
    }

    #[test]
    fn conic_rows() {
        let mut lp = LinearProgram::<f64>::new_minimization();
        let x = lp.make_var(0., f64::INFINITY);
        let y = lp.make_var(-f64::INFINITY, f64::INFINITY);
        let range = lp.make_con(1., 2.).unwrap();
        lp.set_con_coeff(range, x, 1.).unwrap();
        lp.set_con_coeff(range, y, 1.).unwrap();
        let equality = lp.make_con(3., 3.).unwrap();
        lp.set_con_coeff(equality, y, 2.).unwrap();

        let rows = ConicRows::new(&FloatProgram::new(&lp));
        assert_eq!(rows.n_equalities, 1);
        assert_eq!(rows.rhs, vec![3., 2., -1., 0.]);
        assert_eq!(rows.coefficients[0], vec![(1, 2.)]);
        assert_eq!(rows.coefficients[2], vec![(0, -1.), (1, -1.)]);
        assert_eq!(rows.coefficients[3], vec![(0, -1.)]);
    }

    #[test]
    fn small_maximization() {
        // max 0.6x + 0.5y, x + 2y <= 1, 3x + y <= 2
        let mut lp = LinearProgram::<f64>::new_maximization();
        let x = lp.make_var(0., f64::INFINITY);
        let y = lp.make_var(0., f64::INFINITY);
        lp.set_obj_coeff(x, 0.6).unwrap();
        lp.set_obj_coeff(y, 0.5).unwrap();
        let c1 = lp.make_con(-f64::INFINITY, 1.).unwrap();
        lp.set_con_coeff(c1, x, 1.).unwrap();
        lp.set_con_coeff(c1, y, 2.).unwrap();
        let c2 = lp.make_con(-f64::INFINITY, 2.).unwrap();
        lp.set_con_coeff(c2, x, 3.).unwrap();
        lp.set_con_coeff(c2, y, 1.).unwrap();

        let result = ClarabelSolver.solve(&lp, &config()).unwrap();
        assert_eq!(result.status, Status::Optimal);
        let values = result.variable_values.unwrap();
        assert!((values[0] - 0.6).abs() < 1e-5);
        assert!((values[1] - 0.2).abs() < 1e-5);
    }

    #[test]
    fn infeasible() {
        let mut lp = LinearProgram::<f64>::new_minimization();
        let x = lp.make_var(0., f64::INFINITY);
        lp.set_obj_coeff(x, 1.).unwrap();
        let c1 = lp.make_con(3., f64::INFINITY).unwrap();
        lp.set_con_coeff(c1, x, 1.).unwrap();
        let c2 = lp.make_con(-f64::INFINITY, 2.).unwrap();
        lp.set_con_coeff(c2, x, 1.).unwrap();

        let result = ClarabelSolver.solve(&lp, &config()).unwrap();
        assert_eq!(result.status, Status::Infeasible);
        assert_eq!(result.variable_values, None);
    }

    #[test]
    fn no_variables() {
        let mut lp = LinearProgram::<f64>::new_minimization();
        lp.make_con(-1., 0.).unwrap();
        let result = ClarabelSolver.solve(&lp, &config()).unwrap();
        assert_eq!(result.status, Status::Optimal);
        assert_eq!(result.variable_values, Some(Vec::new()));

        lp.make_con(1., f64::INFINITY).unwrap();
        let result = ClarabelSolver.solve(&lp, &config()).unwrap();
        assert_eq!(result.status, Status::Infeasible);
        assert_eq!(result.variable_values, None);

        // same answer as the internal engine
        assert!(!lp.solve(&SolverConfig::internal()).unwrap());
        assert_eq!(lp.status(), Some(Status::Infeasible));
    }

    #[test]
    fn rejects_simplex() {
        let lp = LinearProgram::<f64>::new_minimization();
        let config = SolverConfig {
            method: Method::SimplexDual,
            ..config()
        };
        if let Err(LpError::UnsupportedMethod { .. }) = ClarabelSolver.solve(&lp, &config) {
        } else {
            panic!("Simplex method accepted by Clarabel")
        }
    }
}
