//! Provides types for identifying and describing constraints in a linear program
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::optimize::LpError;

/// Identifier of a constraint in a [`LinearProgram`](crate::optimize::problem::LinearProgram)
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConId(pub(crate) usize);

impl ConId {
    /// Row of the constraint in the constraint matrix
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for ConId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Direction of a constraint when loading a program in matrix form
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConstraintSense {
    /// `a·x <= b`
    #[default]
    LessEq,
    /// `a·x == b`
    Equal,
    /// `a·x >= b`
    GreaterEq,
}

impl ConstraintSense {
    /// Parse a whitespace separated list of senses, such as `"< = >"`
    ///
    /// # Examples
    /// ```rust
    /// use qif_core::optimize::constraint::ConstraintSense;
    /// let senses = ConstraintSense::parse_list("< = >").unwrap();
    /// assert_eq!(senses, vec![ConstraintSense::LessEq, ConstraintSense::Equal, ConstraintSense::GreaterEq]);
    /// ```
    pub fn parse_list(senses: &str) -> Result<Vec<ConstraintSense>, LpError> {
        senses
            .split_whitespace()
            .flat_map(|token| token.chars())
            .map(ConstraintSense::try_from)
            .collect()
    }
}

impl TryFrom<char> for ConstraintSense {
    type Error = LpError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '<' => Ok(ConstraintSense::LessEq),
            '=' => Ok(ConstraintSense::Equal),
            '>' => Ok(ConstraintSense::GreaterEq),
            other => Err(LpError::InvalidSense(other)),
        }
    }
}

impl Display for ConstraintSense {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintSense::LessEq => write!(f, "<="),
            ConstraintSense::Equal => write!(f, "=="),
            ConstraintSense::GreaterEq => write!(f, ">="),
        }
    }
}
