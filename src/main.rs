use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use log::{info, warn};

use cohort_stats::utils::logging::render_suite;
use cohort_stats::utils::test::generate_synthetic_records;
use cohort_stats::{OutputFormat, ReportConfig, ReportSuite, read_records_async};

#[derive(Parser, Debug)]
#[command(name = "cohort-stats")]
#[command(version)]
#[command(about = "Prevalence, cohort and correlation summaries over patient health records")]
struct Args {
    /// CSV file of patient records (header row required)
    #[arg(short, long, value_name = "FILE", conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Generate this many synthetic records instead of reading a file
    #[arg(long, value_name = "N")]
    synthetic: Option<usize>,

    /// Seed for synthetic records
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output format: table or json
    #[arg(short, long, default_value = "table")]
    format: String,

    /// Record count at which the grouping pass runs in parallel
    #[arg(long)]
    parallel_threshold: Option<usize>,

    /// Number of partitions for the parallel pass
    #[arg(long)]
    partitions: Option<usize>,

    /// Only run prevalence and the six canonical cohort reports
    #[arg(long)]
    no_supplemental: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<ReportConfig> {
        let defaults = ReportConfig::default();
        let config = ReportConfig {
            parallel_threshold: self.parallel_threshold.unwrap_or(defaults.parallel_threshold),
            partitions: self.partitions.unwrap_or(defaults.partitions),
            output_format: self.format.parse::<OutputFormat>()?,
            include_supplemental: !self.no_supplemental,
            show_progress: !self.quiet,
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config().context("Invalid report configuration")?;
    info!("{}", config.to_string().trim_end());

    let records = match (&args.input, args.synthetic) {
        (Some(path), _) => {
            let outcome = read_records_async(path.clone())
                .await
                .with_context(|| format!("Failed to load records from {}", path.display()))?;
            outcome.records
        }
        (None, Some(count)) => {
            let start = Instant::now();
            let records = generate_synthetic_records(count, args.seed);
            info!(
                "Generated {} synthetic records (seed {}) in {:?}",
                records.len(),
                args.seed,
                start.elapsed()
            );
            records
        }
        (None, None) => bail!("Either --input or --synthetic must be given"),
    };

    if records.is_empty() {
        warn!("No records to summarise; every report will be empty");
    }

    let suite = ReportSuite::standard(&config)?;
    let output = suite.run(&records, &config);

    match config.output_format {
        OutputFormat::Table => print!("{}", render_suite(&output)),
        OutputFormat::Json => println!(
            "{}",
            output.to_json().context("Failed to serialize reports")?
        ),
    }

    Ok(())
}
