//! Output module for run summaries and result exports
//!
//! This module handles:
//! - Aggregating a finished run into counts by status
//! - Computing the retry set for the next run
//! - Exporting per-link results as CSV

mod csv;
pub mod stats;

pub use csv::{escape_cell, to_csv_string, write_csv};
pub use stats::{print_summary, retry_set, RunSummary};
