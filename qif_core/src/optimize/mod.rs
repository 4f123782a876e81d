//! Module for constructing and solving linear programs
//!
//! A [`LinearProgram`](problem::LinearProgram) is built with `make_var`/`make_con` and the
//! coefficient setters, then solved either by the exact internal simplex engine or by one of
//! the external backends in [`solvers`], as selected by a
//! [`SolverConfig`](crate::configuration::SolverConfig).

pub mod canonical;
pub mod constraint;
pub mod mps;
pub mod numeric;
pub mod objective;
pub mod problem;
pub mod simplex;
pub mod solution;
pub mod solvers;
pub mod variable;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use constraint::{ConId, ConstraintSense};
pub use numeric::Numeric;
pub use objective::ObjectiveSense;
pub use problem::LinearProgram;
pub use variable::VarId;

/// Struct representing the result a solver backend hands back to the problem
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemSolution<T> {
    /// The status of the optimization, representing if the optimization was
    /// completed successfully
    pub status: Status,
    /// Values of the original variables at the optimum
    ///
    /// Some(Vec), indexed by variable id, if the problem was solved to optimality, None otherwise
    pub variable_values: Option<Vec<T>>,
}

impl<T> ProblemSolution<T> {
    /// A solution carrying only a non-optimal status
    pub fn without_values(status: Status) -> Self {
        Self {
            status,
            variable_values: None,
        }
    }
}

/// Status of a solved linear program
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// An optimal solution was found
    Optimal,
    /// The constraints can't be satisfied together
    Infeasible,
    /// The objective can be improved without limit
    Unbounded,
    /// The backend proved that no optimum exists, but not which of the two cases applies
    InfeasibleOrUnbounded,
    /// The backend failed unexpectedly
    Error,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Optimal => write!(f, "OPTIMAL"),
            Status::Infeasible => write!(f, "INFEASIBLE"),
            Status::Unbounded => write!(f, "UNBOUNDED"),
            Status::InfeasibleOrUnbounded => write!(f, "INFEASIBLE_OR_UNBOUNDED"),
            Status::Error => write!(f, "ERROR"),
        }
    }
}

/// Algorithm requested from the backend
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Method {
    /// Whatever the backend considers best
    #[default]
    Auto,
    /// Primal simplex
    SimplexPrimal,
    /// Dual simplex
    SimplexDual,
    /// Interior point
    Interior,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Auto => write!(f, "AUTO"),
            Method::SimplexPrimal => write!(f, "SIMPLEX_PRIMAL"),
            Method::SimplexDual => write!(f, "SIMPLEX_DUAL"),
            Method::Interior => write!(f, "INTERIOR"),
        }
    }
}

/// Enum used to specify which solver backend to use
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Solver {
    /// Internal solver for exact element types, otherwise the best available external solver
    #[default]
    Auto,
    /// The internal two-phase revised simplex
    Internal,
    /// The Clarabel interior point solver
    Clarabel,
    /// The microlp simplex solver, requires the microlp feature to be enabled
    Microlp,
    /// The HiGHS solver, requires the highs feature to be enabled
    Highs,
}

impl Display for Solver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Auto => write!(f, "AUTO"),
            Solver::Internal => write!(f, "INTERNAL"),
            Solver::Clarabel => write!(f, "CLARABEL"),
            Solver::Microlp => write!(f, "MICROLP"),
            Solver::Highs => write!(f, "HIGHS"),
        }
    }
}

/// How chatty the solvers should be
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MsgLevel {
    /// No output
    #[default]
    Off,
    /// Errors only
    Err,
    /// Normal output
    On,
    /// Everything, including per iteration information
    All,
}

/// Errors associated with building and solving linear programs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LpError {
    /// Error when trying to add a constraint with lower bound -inf and upper bound inf
    #[error("Tried to add an unconstrained constraint")]
    InvalidConstraint,
    /// Error when referencing a variable that is not in the program
    #[error("Variable {0} is not in the program")]
    UnknownVariable(VarId),
    /// Error when referencing a constraint that is not in the program
    #[error("Constraint {0} is not in the program")]
    UnknownConstraint(ConId),
    /// Error when the matrices given to `from_matrix` have inconsistent sizes
    #[error("Invalid size: A is {rows}x{cols}, b has {b_len} entries, c has {c_len} entries")]
    DimensionMismatch {
        /// Rows of the constraint matrix
        rows: usize,
        /// Columns of the constraint matrix
        cols: usize,
        /// Length of the constraint constants
        b_len: usize,
        /// Length of the objective coefficients
        c_len: usize,
    },
    /// Error when parsing a constraint sense other than `<`, `=` or `>`
    #[error("Invalid constraint sense '{0}'")]
    InvalidSense(char),
    /// Error when reading the objective or solution without a successful solve
    #[error("No solution, the program has not been solved to optimality")]
    NoSolution,
    /// Error when requesting a method the chosen solver does not implement
    #[error("Solver {solver} does not support method {method}")]
    UnsupportedMethod {
        /// The solver that was chosen
        solver: Solver,
        /// The method that was requested
        method: Method,
    },
    /// Error when requesting a solver that was not compiled in
    #[error("Solver {0} is not available, enable the corresponding feature")]
    SolverUnavailable(Solver),
    /// Error raised by an external backend while setting up the problem
    #[error("Backend error: {0}")]
    Backend(String),
}
