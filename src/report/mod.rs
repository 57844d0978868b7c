//! Reporting: result line, diagnostic summary.

pub mod format;

pub use format::*;
