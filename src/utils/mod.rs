//! Utility modules for logging, console output and test data

pub mod logging;
pub mod test;
