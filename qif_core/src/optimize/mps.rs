//! Export of a [`LinearProgram`] in free MPS format
//!
//! Variables are named after their [`VarId`](crate::optimize::VarId) (`x0`, `x1`, ...) and
//! constraints after their [`ConId`](crate::optimize::ConId) (`c0`, `c1`, ...). A constraint
//! with two different finite bounds is written as a `G` row with a `RANGES` entry.
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use crate::optimize::numeric::Numeric;
use crate::optimize::problem::LinearProgram;
use crate::optimize::variable::BoundType;

const OBJECTIVE_ROW: &str = "OBJ";

impl<T: Numeric> LinearProgram<T> {
    /// The program in free MPS format
    ///
    /// # Examples
    /// ```rust
    /// use qif_core::optimize::LinearProgram;
    /// let mut lp = LinearProgram::<f64>::new_maximization();
    /// let x = lp.make_var(0., 4.);
    /// lp.set_obj_coeff(x, 1.).unwrap();
    /// let mps = lp.to_mps();
    /// assert!(mps.starts_with("NAME LP\nOBJSENSE MAX\n"));
    /// assert!(mps.contains(" UP BND x0 4\n"));
    /// ```
    pub fn to_mps(&self) -> String {
        Mps(self).to_string()
    }

    /// Write the program in free MPS format to `path`
    pub fn write_mps<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        fs::write(path, self.to_mps())
    }
}

struct Mps<'a, T: Numeric>(&'a LinearProgram<T>);

impl<T: Numeric> Mps<'_, T> {
    fn con_type(&self, row: usize) -> BoundType {
        BoundType::of(&self.0.con_lb[row], &self.0.con_ub[row])
    }
}

impl<T: Numeric> Display for Mps<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let lp = self.0;
        writeln!(f, "NAME LP")?;
        if lp.is_maximize() {
            writeln!(f, "OBJSENSE MAX")?;
        }

        writeln!(f, "ROWS")?;
        writeln!(f, " N  {}", OBJECTIVE_ROW)?;
        for row in 0..lp.n_cons() {
            let kind = match self.con_type(row) {
                BoundType::Upper => "L",
                BoundType::Fixed => "E",
                _ => "G",
            };
            writeln!(f, " {}  c{}", kind, row)?;
        }

        writeln!(f, "COLUMNS")?;
        for col in 0..lp.n_vars() {
            let cost = lp.objective.coefficient(col);
            let entries = lp.con_coeff.range((col, 0)..(col + 1, 0));
            // every column gets at least one line so that it is declared
            if !cost.is_zero() || entries.clone().next().is_none() {
                writeln!(f, "    x{} {} {}", col, OBJECTIVE_ROW, cost.to_f64())?;
            }
            for (&(_, row), value) in entries {
                writeln!(f, "    x{} c{} {}", col, row, value.to_f64())?;
            }
        }

        writeln!(f, "RHS")?;
        for row in 0..lp.n_cons() {
            let rhs = match self.con_type(row) {
                BoundType::Upper => &lp.con_ub[row],
                _ => &lp.con_lb[row],
            };
            if !rhs.is_zero() {
                writeln!(f, "    RHS c{} {}", row, rhs.to_f64())?;
            }
        }

        let ranges = (0..lp.n_cons())
            .filter(|&row| self.con_type(row) == BoundType::Double)
            .collect::<Vec<_>>();
        if !ranges.is_empty() {
            writeln!(f, "RANGES")?;
            for row in ranges {
                let width = lp.con_ub[row].clone() - lp.con_lb[row].clone();
                writeln!(f, "    RNG c{} {}", row, width.to_f64())?;
            }
        }

        writeln!(f, "BOUNDS")?;
        for col in 0..lp.n_vars() {
            let (lb, ub) = (&lp.var_lb[col], &lp.var_ub[col]);
            match BoundType::of(lb, ub) {
                BoundType::Free => writeln!(f, " FR BND x{}", col)?,
                BoundType::Upper => {
                    writeln!(f, " MI BND x{}", col)?;
                    writeln!(f, " UP BND x{} {}", col, ub.to_f64())?;
                }
                BoundType::Lower => {
                    if !lb.is_zero() {
                        writeln!(f, " LO BND x{} {}", col, lb.to_f64())?;
                    }
                }
                BoundType::Fixed => writeln!(f, " FX BND x{} {}", col, lb.to_f64())?,
                BoundType::Double => {
                    if !lb.is_zero() {
                        writeln!(f, " LO BND x{} {}", col, lb.to_f64())?;
                    }
                    writeln!(f, " UP BND x{} {}", col, ub.to_f64())?;
                }
            }
        }

        writeln!(f, "ENDATA")
    }
}
