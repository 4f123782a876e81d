//! Solver configuration, passed explicitly to [`LinearProgram::solve`](crate::optimize::LinearProgram::solve)
use std::fs;
use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::optimize::{Method, MsgLevel, Solver};

/// Options controlling how a linear program is solved
///
/// # Examples
/// ```rust
/// use qif_core::configuration::SolverConfigBuilder;
/// use qif_core::optimize::{Method, Solver};
/// let config = SolverConfigBuilder::default()
///     .solver(Solver::Internal)
///     .method(Method::SimplexPrimal)
///     .build()
///     .unwrap();
/// assert!(!config.presolve);
/// ```
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Which backend solves the program
    #[builder(default = "Solver::Auto")]
    pub solver: Solver,
    /// Algorithm requested from the backend
    #[builder(default = "Method::Auto")]
    pub method: Method,
    /// Whether the backend should run its presolver
    #[builder(default = "false")]
    pub presolve: bool,
    /// Verbosity of the backend
    #[builder(default = "MsgLevel::Off")]
    pub msg_level: MsgLevel,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            solver: Solver::Auto,
            method: Method::Auto,
            presolve: false,
            msg_level: MsgLevel::Off,
        }
    }
}

impl SolverConfig {
    /// Configuration forcing the internal simplex engine
    pub fn internal() -> Self {
        SolverConfig {
            solver: Solver::Internal,
            ..Default::default()
        }
    }

    /// Configuration using the given backend with default options
    pub fn with_solver(solver: Solver) -> Self {
        SolverConfig {
            solver,
            ..Default::default()
        }
    }

    /// Read a configuration from a JSON string, missing fields take their default value
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Deserialize(e.to_string()))
    }

    /// Read a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let json_data = match fs::read_to_string(path.as_ref()) {
            Ok(data) => data,
            Err(_) => {
                return Err(ConfigurationError::FileNotFound(
                    path.as_ref().display().to_string(),
                ))
            }
        };
        Self::from_json_str(&json_data)
    }

    /// Serialize the configuration to JSON
    pub fn to_json_string(&self) -> Result<String, ConfigurationError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigurationError::Serialize(e.to_string()))
    }
}

/// Errors associated with reading and writing a configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The configuration file could not be read
    #[error("Could not read configuration file {0}")]
    FileNotFound(String),
    /// The configuration is not valid JSON, or has unknown values
    #[error("Invalid configuration: {0}")]
    Deserialize(String),
    /// The configuration could not be written
    #[error("Could not serialize configuration: {0}")]
    Serialize(String),
}
