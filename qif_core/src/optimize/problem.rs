//! Provides struct representing a linear program
//!
//! The program solved is
//! ```text
//! {min/max}  c·x
//! subject to con_lb <= A x <= con_ub
//!            var_lb <=   x <= var_ub
//! ```
//! where any bound may be infinite, see [`Numeric::infinity`].
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use log::info;
use nalgebra::DMatrix;
use nalgebra_sparse::CooMatrix;

use crate::configuration::SolverConfig;
use crate::optimize::constraint::{ConId, ConstraintSense};
use crate::optimize::numeric::Numeric;
use crate::optimize::objective::{Objective, ObjectiveSense};
use crate::optimize::solvers::Backend;
use crate::optimize::variable::VarId;
use crate::optimize::{LpError, MsgLevel, Status};

/// A linear program over the element type `T`
#[derive(Debug, Clone)]
pub struct LinearProgram<T: Numeric> {
    /// Objective to optimize
    pub(crate) objective: Objective<T>,
    /// Constraint coefficients keyed by `(variable, constraint)`, so that iteration is
    /// column major. Zero coefficients are never stored.
    pub(crate) con_coeff: BTreeMap<(usize, usize), T>,
    /// Lower bounds of the variables
    pub(crate) var_lb: Vec<T>,
    /// Upper bounds of the variables
    pub(crate) var_ub: Vec<T>,
    /// Lower bounds of the constraints
    pub(crate) con_lb: Vec<T>,
    /// Upper bounds of the constraints
    pub(crate) con_ub: Vec<T>,
    /// Status of the last solve, None before solving
    status: Option<Status>,
    /// Values of the variables at the optimum, only set when the last solve was optimal
    solution: Option<Vec<T>>,
}

impl<T: Numeric> Default for LinearProgram<T> {
    fn default() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }
}

impl<T: Numeric> LinearProgram<T> {
    // region Creation Functions
    /// Create a new empty linear program
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            con_coeff: BTreeMap::new(),
            var_lb: Vec::new(),
            var_ub: Vec::new(),
            con_lb: Vec::new(),
            con_ub: Vec::new(),
            status: None,
            solution: None,
        }
    }

    /// Create a new maximization program
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization program
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }

    /// Load a program given in matrix form
    ///
    /// # Parameters
    /// - `a`: Constraint coefficients, duplicate entries are summed
    /// - `b`: Constraint constants, one per row of `a`
    /// - `c`: Objective coefficients, one per column of `a`
    /// - `sense`: Direction of each constraint, missing entries default to `<=`
    /// - `non_negative`: If true every variable is bounded below by 0, otherwise variables are free
    ///
    /// Any previous content of the program is removed, the objective sense is kept.
    ///
    /// # Examples
    /// ```rust
    /// use nalgebra_sparse::CooMatrix;
    /// use qif_core::optimize::{ConstraintSense, LinearProgram};
    /// // maximize 0.6x + 0.5y subject to x + 2y <= 1, 3x + y <= 2
    /// let mut a = CooMatrix::new(2, 2);
    /// a.push(0, 0, 1.);
    /// a.push(0, 1, 2.);
    /// a.push(1, 0, 3.);
    /// a.push(1, 1, 1.);
    /// let mut lp = LinearProgram::new_maximization();
    /// lp.from_matrix(&a, &[1., 2.], &[0.6, 0.5], &[], true).unwrap();
    /// assert_eq!(lp.n_vars(), 2);
    /// assert_eq!(lp.n_cons(), 2);
    /// ```
    pub fn from_matrix(
        &mut self,
        a: &CooMatrix<T>,
        b: &[T],
        c: &[T],
        sense: &[ConstraintSense],
        non_negative: bool,
    ) -> Result<(), LpError> {
        self.validate_dimensions(a.nrows(), a.ncols(), b, c)?;
        self.load_rows_and_columns(b, c, sense, non_negative);
        for (row, col, value) in a.triplet_iter() {
            self.accumulate_con_coeff(row, col, value.clone());
        }
        Ok(())
    }

    /// Load a program given in matrix form with a dense constraint matrix, see
    /// [`from_matrix`](Self::from_matrix)
    pub fn from_dense(
        &mut self,
        a: &DMatrix<T>,
        b: &[T],
        c: &[T],
        sense: &[ConstraintSense],
        non_negative: bool,
    ) -> Result<(), LpError> {
        self.validate_dimensions(a.nrows(), a.ncols(), b, c)?;
        self.load_rows_and_columns(b, c, sense, non_negative);
        for col in 0..a.ncols() {
            for row in 0..a.nrows() {
                self.accumulate_con_coeff(row, col, a[(row, col)].clone());
            }
        }
        Ok(())
    }

    fn validate_dimensions(
        &self,
        rows: usize,
        cols: usize,
        b: &[T],
        c: &[T],
    ) -> Result<(), LpError> {
        if rows != b.len() || cols != c.len() {
            return Err(LpError::DimensionMismatch {
                rows,
                cols,
                b_len: b.len(),
                c_len: c.len(),
            });
        }
        Ok(())
    }

    fn load_rows_and_columns(
        &mut self,
        b: &[T],
        c: &[T],
        sense: &[ConstraintSense],
        non_negative: bool,
    ) {
        self.clear();
        let lb = if non_negative {
            T::zero()
        } else {
            -T::infinity()
        };
        for coefficient in c {
            let var = self.make_var(lb.clone(), T::infinity());
            self.objective
                .set_coefficient(var.index(), coefficient.clone());
        }
        for (row, constant) in b.iter().enumerate() {
            let (lb, ub) = match sense.get(row).copied().unwrap_or_default() {
                ConstraintSense::LessEq => (-T::infinity(), constant.clone()),
                ConstraintSense::Equal => (constant.clone(), constant.clone()),
                ConstraintSense::GreaterEq => (constant.clone(), T::infinity()),
            };
            self.push_con(lb, ub);
        }
    }
    // endregion Creation Functions

    // region Objective Sense
    /// Update the objective sense of the program
    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }

    /// Current objective sense of the program
    pub fn sense(&self) -> ObjectiveSense {
        self.objective.sense()
    }

    /// Whether the program is a maximization
    pub fn is_maximize(&self) -> bool {
        self.objective.sense() == ObjectiveSense::Maximize
    }
    // endregion Objective Sense

    // region Adding Variables
    /// Add a variable with the given bounds, either of which may be infinite
    pub fn make_var(&mut self, lb: T, ub: T) -> VarId {
        let id = VarId(self.var_lb.len());
        self.var_lb.push(lb);
        self.var_ub.push(ub);
        self.objective.push_variable();
        id
    }

    /// Add `n` variables sharing the same bounds
    pub fn make_vars(&mut self, n: usize, lb: T, ub: T) -> Vec<VarId> {
        (0..n)
            .map(|_| self.make_var(lb.clone(), ub.clone()))
            .collect()
    }

    /// Add an `n` by `m` grid of variables sharing the same bounds, such as the entries of a
    /// channel matrix
    pub fn make_var_grid(&mut self, n: usize, m: usize, lb: T, ub: T) -> Vec<Vec<VarId>> {
        (0..n)
            .map(|_| self.make_vars(m, lb.clone(), ub.clone()))
            .collect()
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint `lb <= a·x <= ub`, the coefficients are set afterwards with
    /// [`set_con_coeff`](Self::set_con_coeff)
    ///
    /// Use `lb == ub` for an equality, and an infinite bound for a one sided constraint. A
    /// constraint with both sides infinite is meaningless and is rejected, leaving the program
    /// unchanged.
    pub fn make_con(&mut self, lb: T, ub: T) -> Result<ConId, LpError> {
        if ub.is_infinite_pos() && lb.is_infinite_neg() {
            return Err(LpError::InvalidConstraint);
        }
        Ok(self.push_con(lb, ub))
    }

    pub(crate) fn push_con(&mut self, lb: T, ub: T) -> ConId {
        let id = ConId(self.con_lb.len());
        self.con_lb.push(lb);
        self.con_ub.push(ub);
        id
    }
    // endregion Adding Constraints

    // region Coefficients
    /// Set the objective coefficient of a variable
    pub fn set_obj_coeff(&mut self, var: VarId, coeff: T) -> Result<(), LpError> {
        self.validate_var(var)?;
        self.objective.set_coefficient(var.index(), coeff);
        Ok(())
    }

    /// Add to the objective coefficient of a variable
    pub fn add_obj_coeff(&mut self, var: VarId, coeff: T) -> Result<(), LpError> {
        self.validate_var(var)?;
        self.objective.add_to_coefficient(var.index(), coeff);
        Ok(())
    }

    /// Set the coefficient of a variable in a constraint, replacing any previous value
    pub fn set_con_coeff(&mut self, con: ConId, var: VarId, coeff: T) -> Result<(), LpError> {
        self.validate_con(con)?;
        self.validate_var(var)?;
        let key = (var.index(), con.index());
        if coeff.equal(&T::zero()) {
            self.con_coeff.remove(&key);
        } else {
            self.con_coeff.insert(key, coeff);
        }
        Ok(())
    }

    /// Add to the coefficient of a variable in a constraint
    pub fn add_con_coeff(&mut self, con: ConId, var: VarId, coeff: T) -> Result<(), LpError> {
        self.validate_con(con)?;
        self.validate_var(var)?;
        self.accumulate_con_coeff(con.index(), var.index(), coeff);
        Ok(())
    }

    /// Add `coeff` to the cell `(row, col)`, dropping the cell if it becomes zero
    pub(crate) fn accumulate_con_coeff(&mut self, row: usize, col: usize, coeff: T) {
        if coeff.equal(&T::zero()) {
            return;
        }
        let key = (col, row);
        let updated = match self.con_coeff.remove(&key) {
            Some(current) => current + coeff,
            None => coeff,
        };
        if !updated.equal(&T::zero()) {
            self.con_coeff.insert(key, updated);
        }
    }
    // endregion Coefficients

    // region Accessors
    /// Number of variables
    pub fn n_vars(&self) -> usize {
        self.var_lb.len()
    }

    /// Number of constraints
    pub fn n_cons(&self) -> usize {
        self.con_lb.len()
    }

    /// Lower and upper bound of a variable
    pub fn var_bounds(&self, var: VarId) -> Result<(&T, &T), LpError> {
        self.validate_var(var)?;
        Ok((&self.var_lb[var.index()], &self.var_ub[var.index()]))
    }

    /// Lower and upper bound of a constraint
    pub fn con_bounds(&self, con: ConId) -> Result<(&T, &T), LpError> {
        self.validate_con(con)?;
        Ok((&self.con_lb[con.index()], &self.con_ub[con.index()]))
    }

    /// Objective coefficient of a variable
    pub fn obj_coeff(&self, var: VarId) -> Result<&T, LpError> {
        self.validate_var(var)?;
        Ok(self.objective.coefficient(var.index()))
    }

    /// Coefficient of a variable in a constraint, zero when not set
    pub fn con_coeff(&self, con: ConId, var: VarId) -> Result<T, LpError> {
        self.validate_con(con)?;
        self.validate_var(var)?;
        Ok(self
            .con_coeff
            .get(&(var.index(), con.index()))
            .cloned()
            .unwrap_or_else(T::zero))
    }

    /// Iterate over the non-zero constraint coefficients in column major order
    pub fn coefficients(&self) -> impl Iterator<Item = (ConId, VarId, &T)> + '_ {
        self.con_coeff
            .iter()
            .map(|(&(col, row), value)| (ConId(row), VarId(col), value))
    }
    // endregion Accessors

    // region Solving
    /// Solve the program with the backend selected by `config`
    ///
    /// Returns `Ok(true)` if an optimal solution was found, in which case
    /// [`objective`](Self::objective) and [`solution`](Self::solution) can be read. Otherwise
    /// [`status`](Self::status) tells why the program has no optimum. `Err` is only returned
    /// when the configuration can't be honored, such as an unavailable backend.
    ///
    /// # Examples
    /// ```rust
    /// use qif_core::configuration::SolverConfig;
    /// use qif_core::optimize::{LinearProgram, Numeric, Status};
    /// let mut lp = LinearProgram::<f64>::new_minimization();
    /// let x = lp.make_var(-5., f64::infinity());
    /// lp.make_con(0., 0.).unwrap();
    /// lp.set_obj_coeff(x, 1.).unwrap();
    /// assert!(lp.solve(&SolverConfig::internal()).unwrap());
    /// assert_eq!(lp.status(), Some(Status::Optimal));
    /// assert!((lp.objective().unwrap() + 5.).abs() < 1e-9);
    /// ```
    pub fn solve(&mut self, config: &SolverConfig) -> Result<bool, LpError> {
        self.status = None;
        self.solution = None;

        let backend = Backend::select::<T>(config)?;
        if config.msg_level != MsgLevel::Off {
            info!("Solving LP with solver: {}", backend);
        }
        let result = backend.solve(self, config)?;

        self.status = Some(result.status);
        if result.status == Status::Optimal {
            self.solution = result.variable_values;
        }
        Ok(result.status == Status::Optimal)
    }

    /// Status of the last solve, None if the program has not been solved
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Value of the objective at the optimum, computed from the original coefficients
    pub fn objective(&self) -> Result<T, LpError> {
        let solution = self.solution.as_ref().ok_or(LpError::NoSolution)?;
        Ok(self.objective.value(solution))
    }

    /// Values of all variables at the optimum, indexed by [`VarId::index`]
    pub fn solution(&self) -> Result<&[T], LpError> {
        self.solution.as_deref().ok_or(LpError::NoSolution)
    }

    /// Value of a single variable at the optimum
    pub fn solution_of(&self, var: VarId) -> Result<&T, LpError> {
        self.validate_var(var)?;
        // variables added after the last solve have no value
        self.solution()?
            .get(var.index())
            .ok_or(LpError::NoSolution)
    }
    // endregion Solving

    /// Copy of the variables, constraints and objective, without the last solve result
    pub(crate) fn clone_model(&self) -> Self {
        Self {
            objective: self.objective.clone(),
            con_coeff: self.con_coeff.clone(),
            var_lb: self.var_lb.clone(),
            var_ub: self.var_ub.clone(),
            con_lb: self.con_lb.clone(),
            con_ub: self.con_ub.clone(),
            status: None,
            solution: None,
        }
    }

    /// Remove all variables, constraints and coefficients, along with the last solve result.
    /// The objective sense is kept.
    pub fn clear(&mut self) {
        self.objective.clear();
        self.con_coeff.clear();
        self.var_lb.clear();
        self.var_ub.clear();
        self.con_lb.clear();
        self.con_ub.clear();
        self.status = None;
        self.solution = None;
    }

    // region Validation Functions
    fn validate_var(&self, var: VarId) -> Result<(), LpError> {
        if var.index() < self.n_vars() {
            Ok(())
        } else {
            Err(LpError::UnknownVariable(var))
        }
    }

    fn validate_con(&self, con: ConId) -> Result<(), LpError> {
        if con.index() < self.n_cons() {
            Ok(())
        } else {
            Err(LpError::UnknownConstraint(con))
        }
    }
    // endregion Validation Functions
}

// region Display
fn fmt_bound<T: Numeric>(value: &T) -> String {
    if value.is_infinite_pos() {
        "inf".to_string()
    } else if value.is_infinite_neg() {
        "-inf".to_string()
    } else {
        format!("{}", value)
    }
}

impl<T: Numeric> Display for LinearProgram<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sense = match self.sense() {
            ObjectiveSense::Maximize => "maximize",
            ObjectiveSense::Minimize => "minimize",
        };
        let terms = self
            .objective
            .coefficients()
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.equal(&T::zero()))
            .map(|(var, c)| format!("{}*{}", c, VarId(var)))
            .collect::<Vec<_>>();
        writeln!(f, "{} {}", sense, join_terms(&terms))?;

        writeln!(f, "subject to")?;
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); self.n_cons()];
        for (con, var, value) in self.coefficients() {
            rows[con.index()].push(format!("{}*{}", value, var));
        }
        for (row, terms) in rows.iter().enumerate() {
            writeln!(
                f,
                "  {}: {} <= {} <= {}",
                ConId(row),
                fmt_bound(&self.con_lb[row]),
                join_terms(terms),
                fmt_bound(&self.con_ub[row])
            )?;
        }

        writeln!(f, "bounds")?;
        for var in 0..self.n_vars() {
            writeln!(
                f,
                "  {} <= {} <= {}",
                fmt_bound(&self.var_lb[var]),
                VarId(var),
                fmt_bound(&self.var_ub[var])
            )?;
        }
        Ok(())
    }
}

fn join_terms(terms: &[String]) -> String {
    if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" + ")
    }
}
// endregion Display
