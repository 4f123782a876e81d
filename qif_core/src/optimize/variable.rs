//! Module providing representation of linear program variables
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::optimize::numeric::Numeric;

/// Identifier of a variable in a [`LinearProgram`](crate::optimize::problem::LinearProgram)
///
/// Variables are numbered in creation order starting from 0, the same numbering is used by
/// every solver backend and by the solution vector.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in the solution vector
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<VarId> for usize {
    fn from(value: VarId) -> Self {
        value.0
    }
}

impl Display for VarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Kind of bounds a variable has, used when exporting to solvers that distinguish them
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoundType {
    /// No lower or upper bound
    Free,
    /// Only an upper bound
    Upper,
    /// Only a lower bound
    Lower,
    /// Lower bound equal to upper bound
    Fixed,
    /// Both bounds, and they differ
    Double,
}

impl BoundType {
    /// Kind of the bounds `[lb, ub]`
    pub fn of<T: Numeric>(lb: &T, ub: &T) -> Self {
        Self::classify(lb.is_infinite_neg(), ub.is_infinite_pos(), lb == ub)
    }

    /// Classify a pair of bounds given flags for which sides are infinite
    pub(crate) fn classify(lb_infinite: bool, ub_infinite: bool, fixed: bool) -> Self {
        match (lb_infinite, ub_infinite) {
            (true, true) => BoundType::Free,
            (true, false) => BoundType::Upper,
            (false, true) => BoundType::Lower,
            (false, false) if fixed => BoundType::Fixed,
            (false, false) => BoundType::Double,
        }
    }
}

impl Display for BoundType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundType::Free => write!(f, "FREE"),
            BoundType::Upper => write!(f, "UPPER"),
            BoundType::Lower => write!(f, "LOWER"),
            BoundType::Fixed => write!(f, "FIXED"),
            BoundType::Double => write!(f, "DOUBLE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_bounds() {
        assert_eq!(BoundType::classify(true, true, false), BoundType::Free);
        assert_eq!(BoundType::classify(true, false, false), BoundType::Upper);
        assert_eq!(BoundType::classify(false, true, false), BoundType::Lower);
        assert_eq!(BoundType::classify(false, false, true), BoundType::Fixed);
        assert_eq!(BoundType::classify(false, false, false), BoundType::Double);
        assert_eq!(BoundType::of(&-f64::INFINITY, &3.), BoundType::Upper);
        assert_eq!(BoundType::of(&2., &2.), BoundType::Fixed);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", VarId(3)), "x3");
        assert_eq!(format!("{}", BoundType::Double), "DOUBLE");
    }
}
