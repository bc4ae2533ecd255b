//! Logging utilities for output and progress tracking
//!
//! This module provides utilities for logging, console output, and progress tracking.

pub mod console;
pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use console::{render_correlations, render_report, render_suite};
pub use log::{log_load_complete, log_load_start, log_report_complete};
pub use progress::{create_main_progress_bar, finish_progress_bar, suite_progress_bar};
