//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - JSON estimate export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
