//! Core rust implementation of the linear program engine used by qif, a toolkit for
//! quantitative information flow.
//!
//! Programs are built with [`LinearProgram`](optimize::LinearProgram) and solved either by the
//! internal two-phase simplex, which is exact for rational element types, or by one of the
//! external backends in [`optimize::solvers`].

pub mod configuration;
pub mod optimize;
