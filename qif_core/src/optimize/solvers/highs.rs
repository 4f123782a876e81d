//! Implements a solver interface for HiGHS
use highs::{HighsModelStatus, RowProblem, Sense};

use crate::configuration::SolverConfig;
use crate::optimize::numeric::Numeric;
use crate::optimize::problem::LinearProgram;
use crate::optimize::solvers::{values_from_f64, FloatProgram, LinearSolver};
use crate::optimize::{LpError, Method, MsgLevel, ProblemSolution, Status};

/// HiGHS backend, requires the `highs` feature
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsSolver;

impl LinearSolver for HighsSolver {
    fn solve<T: Numeric>(
        &self,
        lp: &LinearProgram<T>,
        config: &SolverConfig,
    ) -> Result<ProblemSolution<T>, LpError> {
        let program = FloatProgram::new(lp);
        let mut problem = RowProblem::default();

        let cols = (0..program.n_vars())
            .map(|j| problem.add_column(program.objective[j], program.var_lb[j]..=program.var_ub[j]))
            .collect::<Vec<_>>();
        for (i, row) in program.rows.iter().enumerate() {
            let factors = row.iter().map(|&(j, coeff)| (cols[j], coeff));
            problem.add_row(program.con_lb[i]..=program.con_ub[i], factors);
        }

        let sense = if program.maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };
        let mut model = problem.optimise(sense);
        if config.msg_level == MsgLevel::Off {
            model.make_quiet();
        }
        model.set_option("presolve", if config.presolve { "on" } else { "off" });
        match config.method {
            Method::Auto => {}
            Method::SimplexPrimal => {
                model.set_option("solver", "simplex");
                model.set_option("simplex_strategy", 4);
            }
            Method::SimplexDual => {
                model.set_option("solver", "simplex");
                model.set_option("simplex_strategy", 1);
            }
            Method::Interior => model.set_option("solver", "ipm"),
        }

        let solved = match model.try_solve() {
            Ok(solved) => solved,
            Err(_) => return Ok(ProblemSolution::without_values(Status::Error)),
        };
        let status = match solved.status() {
            HighsModelStatus::Optimal => Status::Optimal,
            HighsModelStatus::Infeasible => Status::Infeasible,
            HighsModelStatus::Unbounded => Status::Unbounded,
            HighsModelStatus::UnboundedOrInfeasible => Status::InfeasibleOrUnbounded,
            _ => Status::Error,
        };
        if status != Status::Optimal {
            return Ok(ProblemSolution::without_values(status));
        }

        Ok(ProblemSolution {
            status,
            variable_values: Some(values_from_f64(solved.get_solution().columns())),
        })
    }
}
