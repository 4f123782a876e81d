//! Backends able to solve a [`LinearProgram`], and the dispatcher choosing between them
use std::fmt::{Display, Formatter};

use log::warn;

use crate::configuration::SolverConfig;
use crate::optimize::numeric::Numeric;
use crate::optimize::problem::LinearProgram;
use crate::optimize::{LpError, ProblemSolution, Solver};

pub mod clarabel;
#[cfg(feature = "highs")]
pub mod highs;
pub mod internal;
#[cfg(feature = "microlp")]
pub mod microlp;

/// A solver able to handle linear programs
pub trait LinearSolver {
    /// Solve `lp`, reporting values for the original variables of the program
    ///
    /// Solver outcomes, including failure to converge, are reported through the status of
    /// the returned solution. An `Err` means the problem could not be handed to the solver.
    fn solve<T: Numeric>(
        &self,
        lp: &LinearProgram<T>,
        config: &SolverConfig,
    ) -> Result<ProblemSolution<T>, LpError>;
}

/// A backend compiled into the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The internal simplex engine
    Internal,
    /// Clarabel interior point solver
    Clarabel,
    /// microlp simplex solver
    #[cfg(feature = "microlp")]
    Microlp,
    /// HiGHS
    #[cfg(feature = "highs")]
    Highs,
}

cfg_if::cfg_if! {
    if #[cfg(feature = "highs")] {
        const DEFAULT_EXTERNAL: Backend = Backend::Highs;
    } else if #[cfg(feature = "microlp")] {
        const DEFAULT_EXTERNAL: Backend = Backend::Microlp;
    } else {
        const DEFAULT_EXTERNAL: Backend = Backend::Clarabel;
    }
}

impl Backend {
    /// Choose the backend for element type `T` according to `config`
    ///
    /// [`Solver::Auto`] picks the internal engine for exact element types, and the best
    /// available external solver otherwise.
    pub fn select<T: Numeric>(config: &SolverConfig) -> Result<Backend, LpError> {
        let backend = match config.solver {
            Solver::Auto if T::IS_EXACT => Backend::Internal,
            Solver::Auto => DEFAULT_EXTERNAL,
            Solver::Internal => Backend::Internal,
            Solver::Clarabel => Backend::Clarabel,
            #[cfg(feature = "microlp")]
            Solver::Microlp => Backend::Microlp,
            #[cfg(feature = "highs")]
            Solver::Highs => Backend::Highs,
            #[allow(unreachable_patterns)]
            unavailable => return Err(LpError::SolverUnavailable(unavailable)),
        };

        if T::IS_EXACT && backend != Backend::Internal {
            warn!(
                "Solver {} works in floating point, the solution will not be exact",
                backend
            );
        }
        Ok(backend)
    }

    /// The solver choice this backend corresponds to
    pub fn solver(&self) -> Solver {
        match self {
            Backend::Internal => Solver::Internal,
            Backend::Clarabel => Solver::Clarabel,
            #[cfg(feature = "microlp")]
            Backend::Microlp => Solver::Microlp,
            #[cfg(feature = "highs")]
            Backend::Highs => Solver::Highs,
        }
    }

    /// Solve `lp` with this backend
    pub fn solve<T: Numeric>(
        &self,
        lp: &LinearProgram<T>,
        config: &SolverConfig,
    ) -> Result<ProblemSolution<T>, LpError> {
        match self {
            Backend::Internal => internal::InternalSolver.solve(lp, config),
            Backend::Clarabel => clarabel::ClarabelSolver.solve(lp, config),
            #[cfg(feature = "microlp")]
            Backend::Microlp => microlp::MicrolpSolver.solve(lp, config),
            #[cfg(feature = "highs")]
            Backend::Highs => highs::HighsSolver.solve(lp, config),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.solver())
    }
}

/// Floating point copy of a program, the form handed to external solvers
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FloatProgram {
    pub(crate) maximize: bool,
    pub(crate) objective: Vec<f64>,
    pub(crate) var_lb: Vec<f64>,
    pub(crate) var_ub: Vec<f64>,
    pub(crate) con_lb: Vec<f64>,
    pub(crate) con_ub: Vec<f64>,
    /// `(variable, coefficient)` pairs of each constraint
    pub(crate) rows: Vec<Vec<(usize, f64)>>,
}

impl FloatProgram {
    pub(crate) fn new<T: Numeric>(lp: &LinearProgram<T>) -> Self {
        let convert = |values: &[T]| values.iter().map(Numeric::to_f64).collect::<Vec<_>>();

        let mut rows = vec![Vec::new(); lp.n_cons()];
        for (&(col, row), value) in lp.con_coeff.iter() {
            rows[row].push((col, value.to_f64()));
        }

        FloatProgram {
            maximize: lp.is_maximize(),
            objective: convert(lp.objective.coefficients()),
            var_lb: convert(&lp.var_lb),
            var_ub: convert(&lp.var_ub),
            con_lb: convert(&lp.con_lb),
            con_ub: convert(&lp.con_ub),
            rows,
        }
    }

    pub(crate) fn n_vars(&self) -> usize {
        self.objective.len()
    }
}

/// Convert the values reported by an external solver back to the element type
pub(crate) fn values_from_f64<T: Numeric>(values: &[f64]) -> Vec<T> {
    values.iter().map(|v| T::from_f64(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::SolverConfigBuilder;
    use crate::optimize::numeric::rat;
    use num_rational::BigRational;

    #[test]
    fn auto_selection() {
        let config = SolverConfig::default();
        assert_eq!(
            Backend::select::<BigRational>(&config).unwrap(),
            Backend::Internal
        );
        assert_eq!(Backend::select::<f64>(&config).unwrap(), DEFAULT_EXTERNAL);
        assert_ne!(Backend::select::<f32>(&config).unwrap(), Backend::Internal);
    }

    #[test]
    fn explicit_selection() {
        let config = SolverConfig::internal();
        assert_eq!(Backend::select::<f64>(&config).unwrap(), Backend::Internal);

        let config = SolverConfigBuilder::default()
            .solver(Solver::Clarabel)
            .build()
            .unwrap();
        assert_eq!(
            Backend::select::<BigRational>(&config).unwrap(),
            Backend::Clarabel
        );
        assert_eq!(
            Backend::select::<f64>(&config).unwrap().to_string(),
            "CLARABEL"
        );
    }

    #[cfg(not(feature = "highs"))]
    #[test]
    fn missing_feature() {
        if let Err(LpError::SolverUnavailable(Solver::Highs)) =
            Backend::select::<f64>(&SolverConfig::with_solver(Solver::Highs))
        {
        } else {
            panic!("Solver without its feature was selected")
        }
    }

    #[test]
    fn float_program() {
        let mut lp = LinearProgram::<BigRational>::new_maximization();
        let x = lp.make_var(rat(1, 2), BigRational::infinity());
        let y = lp.make_var(-BigRational::infinity(), rat(2, 1));
        lp.set_obj_coeff(y, rat(3, 4)).unwrap();
        let con = lp.make_con(rat(-1, 1), rat(1, 1)).unwrap();
        lp.set_con_coeff(con, x, rat(1, 1)).unwrap();
        lp.set_con_coeff(con, y, rat(-1, 4)).unwrap();

        let float = FloatProgram::new(&lp);
        assert!(float.maximize);
        assert_eq!(float.n_vars(), 2);
        assert_eq!(float.objective, vec![0., 0.75]);
        assert_eq!(float.var_lb, vec![0.5, f64::NEG_INFINITY]);
        assert_eq!(float.var_ub, vec![f64::INFINITY, 2.]);
        assert_eq!(float.rows, vec![vec![(0, 1.), (1, -0.25)]]);

        let values: Vec<BigRational> = values_from_f64(&[0.5, -2.]);
        assert_eq!(values, vec![rat(1, 2), rat(-2, 1)]);
    }
}
