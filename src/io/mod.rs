//! Input/Output operations for FCI calculations
//!
//! This module handles logging setup and the plain-text result summary.

mod output;

pub use output::{setup_output, write_summary};
