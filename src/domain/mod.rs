//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the measurement series produced by CSV ingest (`MeasurementSeries`)
//! - the resolved run configuration (`EstimateConfig`)

pub mod types;

pub use types::*;
