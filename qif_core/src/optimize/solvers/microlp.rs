//! Implements a solver interface for microlp, a pure Rust simplex solver
use microlp::{ComparisonOp, Error, LinearExpr, OptimizationDirection, Problem};

use crate::configuration::SolverConfig;
use crate::optimize::numeric::Numeric;
use crate::optimize::problem::LinearProgram;
use crate::optimize::solvers::{values_from_f64, FloatProgram, LinearSolver};
use crate::optimize::{LpError, Method, ProblemSolution, Solver, Status};

/// Simplex backend, requires the `microlp` feature
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpSolver;

impl LinearSolver for MicrolpSolver {
    fn solve<T: Numeric>(
        &self,
        lp: &LinearProgram<T>,
        config: &SolverConfig,
    ) -> Result<ProblemSolution<T>, LpError> {
        if config.method == Method::Interior {
            return Err(LpError::UnsupportedMethod {
                solver: Solver::Microlp,
                method: config.method,
            });
        }

        let program = FloatProgram::new(lp);
        let direction = if program.maximize {
            OptimizationDirection::Maximize
        } else {
            OptimizationDirection::Minimize
        };
        let mut problem = Problem::new(direction);

        let vars = (0..program.n_vars())
            .map(|j| {
                problem.add_var(
                    program.objective[j],
                    (program.var_lb[j], program.var_ub[j]),
                )
            })
            .collect::<Vec<_>>();

        for (i, row) in program.rows.iter().enumerate() {
            let expr = || {
                let mut expr = LinearExpr::empty();
                for &(j, coeff) in row {
                    expr.add(vars[j], coeff);
                }
                expr
            };
            let (lb, ub) = (program.con_lb[i], program.con_ub[i]);
            if lb == ub {
                problem.add_constraint(expr(), ComparisonOp::Eq, ub);
                continue;
            }
            if lb.is_finite() {
                problem.add_constraint(expr(), ComparisonOp::Ge, lb);
            }
            if ub.is_finite() {
                problem.add_constraint(expr(), ComparisonOp::Le, ub);
            }
        }

        match problem.solve() {
            Ok(solution) => {
                let values = vars.iter().map(|var| solution[*var]).collect::<Vec<_>>();
                Ok(ProblemSolution {
                    status: Status::Optimal,
                    variable_values: Some(values_from_f64(&values)),
                })
            }
            Err(Error::Infeasible) => Ok(ProblemSolution::without_values(Status::Infeasible)),
            Err(Error::Unbounded) => Ok(ProblemSolution::without_values(Status::Unbounded)),
            Err(_) => Ok(ProblemSolution::without_values(Status::Error)),
        }
    }
}
