//! The internal two-phase simplex engine, exact for rational element types
use crate::configuration::SolverConfig;
use crate::optimize::canonical::canonicalize;
use crate::optimize::numeric::Numeric;
use crate::optimize::problem::LinearProgram;
use crate::optimize::simplex::solve_canonical;
use crate::optimize::solution::original_solution;
use crate::optimize::solvers::LinearSolver;
use crate::optimize::{LpError, Method, ProblemSolution, Solver, Status};

/// Canonicalizes the program, runs [`solve_canonical`] and maps the result back
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalSolver;

impl LinearSolver for InternalSolver {
    fn solve<T: Numeric>(
        &self,
        lp: &LinearProgram<T>,
        config: &SolverConfig,
    ) -> Result<ProblemSolution<T>, LpError> {
        match config.method {
            Method::Auto | Method::SimplexPrimal => {}
            method => {
                return Err(LpError::UnsupportedMethod {
                    solver: Solver::Internal,
                    method,
                })
            }
        }

        let canonical = canonicalize(lp);
        let outcome = solve_canonical(canonical.program());
        if outcome.status != Status::Optimal {
            return Ok(ProblemSolution::without_values(outcome.status));
        }

        Ok(ProblemSolution {
            status: Status::Optimal,
            variable_values: Some(original_solution(
                canonical.transforms(),
                &outcome.solution,
            )),
        })
    }
}
