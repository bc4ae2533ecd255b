//! Configuration for report runs.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How report output is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned plain-text tables
    #[default]
    Table,
    /// One JSON document containing every report
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(Error::config(format!("Unknown output format '{other}'"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Configuration for a report run
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Record count at which the grouping pass is partitioned across threads
    pub parallel_threshold: usize,
    /// Number of partitions for the parallel grouping pass
    pub partitions: usize,
    /// Output rendering
    pub output_format: OutputFormat,
    /// Run the gender, race, general health, diabetic status and correlation reports
    pub include_supplemental: bool,
    /// Show a progress bar while the suite runs
    pub show_progress: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 100_000,
            partitions: num_cpus::get().max(1),
            output_format: OutputFormat::Table,
            include_supplemental: true,
            show_progress: false,
        }
    }
}

impl ReportConfig {
    /// Reject settings that cannot drive a run
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.partitions == 0 {
            return Err(Error::config("partitions must be at least 1"));
        }
        Ok(())
    }

    /// Whether a pass over `len` records should be partitioned
    #[must_use]
    pub fn runs_parallel(&self, len: usize) -> bool {
        len >= self.parallel_threshold && self.partitions > 1
    }
}

impl fmt::Display for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report Configuration:")?;
        writeln!(f, "  Parallel Threshold: {}", self.parallel_threshold)?;
        writeln!(f, "  Partitions: {}", self.partitions)?;
        writeln!(f, "  Output Format: {}", self.output_format)?;
        writeln!(f, "  Supplemental Reports: {}", self.include_supplemental)?;
        writeln!(f, "  Show Progress: {}", self.show_progress)
    }
}
