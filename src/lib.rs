//! `tdeer` library crate.
//!
//! The binary (`tdeer`) is a thin wrapper around this library so that:
//!
//! - the estimator is testable without spawning processes or capturing stdout
//! - CSV validation, estimation and presentation stay in separate modules

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod io;
pub mod math;
pub mod report;

pub use estimate::{EstimateError, estimate, estimate_with};
