//! Test utilities
//!
//! Deterministic record fixtures shared by unit tests, integration tests and
//! the `--synthetic` mode of the binary.


// Re-export commonly used functions for convenience
pub use fixtures::{generate_synthetic_records, scenario_records};
