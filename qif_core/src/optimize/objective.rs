//! Provides struct for representing a linear program's objective
use serde::{Deserialize, Serialize};

use crate::optimize::numeric::Numeric;

/// Represents the Objective of a linear program, one coefficient per variable
#[derive(Debug, Clone, PartialEq)]
pub struct Objective<T> {
    /// Coefficients of the objective, indexed by variable
    coefficients: Vec<T>,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    sense: ObjectiveSense,
}

impl<T: Numeric> Objective<T> {
    /// Create a new empty objective, with a given sense
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            coefficients: Vec::new(),
            sense,
        }
    }

    /// Change the sense of the objective
    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    /// Current sense of the objective
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Register a new variable, which starts with a zero coefficient
    pub(crate) fn push_variable(&mut self) {
        self.coefficients.push(T::zero());
    }

    /// Coefficient of the variable at `index`
    pub fn coefficient(&self, index: usize) -> &T {
        &self.coefficients[index]
    }

    /// All coefficients, indexed by variable
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    pub(crate) fn set_coefficient(&mut self, index: usize, coefficient: T) {
        self.coefficients[index] = coefficient;
    }

    pub(crate) fn add_to_coefficient(&mut self, index: usize, coefficient: T) {
        self.coefficients[index] += coefficient;
    }

    /// Flip the sign of every coefficient
    pub(crate) fn negate(&mut self) {
        for coefficient in self.coefficients.iter_mut() {
            *coefficient = -coefficient.clone();
        }
    }

    /// Evaluate the objective at `values`
    pub fn value(&self, values: &[T]) -> T {
        self.coefficients
            .iter()
            .zip(values)
            .fold(T::zero(), |acc, (c, x)| acc + c.clone() * x.clone())
    }

    /// Remove all coefficients
    pub(crate) fn clear(&mut self) {
        self.coefficients.clear();
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    #[default]
    Maximize,
}
