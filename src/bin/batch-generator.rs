//! # Batch Generator CLI
//!
//! Generates folders of metadata files and commits every step into git.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

use batch_generator::config::{ConfigLoader, GeneratorConfig, TimestampPrecision};
use batch_generator::logging::{init_structured_logging, level_for_verbosity};
use batch_generator::BatchGenerator;

#[derive(Parser, Debug)]
#[command(name = "batch-generator")]
#[command(about = "Generate folders of randomized files and snapshot each step into git")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (default: config/batch-generator.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate containers and records
    Run(RunArgs),

    /// Print the resolved configuration as JSON
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Number of folders to generate
    #[arg(short = 'n', long)]
    containers: Option<usize>,

    /// Files per folder
    #[arg(short = 'm', long)]
    records: Option<usize>,

    /// Output directory
    #[arg(short = 'o', long)]
    base_dir: Option<PathBuf>,

    /// Folders generated concurrently (commits stay serialized)
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Snapshots folded into each commit
    #[arg(short = 'b', long)]
    commit_batch_size: Option<usize>,

    /// Seed for reproducible names
    #[arg(long)]
    seed: Option<u64>,

    /// Timestamp fraction precision (millis, micros, nanos)
    #[arg(long)]
    precision: Option<TimestampPrecision>,

    /// Disable git integration
    #[arg(long)]
    no_git: bool,

    /// Write the JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl RunArgs {
    fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(containers) = self.containers {
            config.layout.containers = containers;
        }
        if let Some(records) = self.records {
            config.layout.records_per_container = records;
        }
        if let Some(base_dir) = &self.base_dir {
            config.layout.base_dir = base_dir.clone();
        }
        if let Some(workers) = self.workers {
            config.execution.parallelism = workers;
        }
        if let Some(batch) = self.commit_batch_size {
            config.git.commit_batch_size = batch;
        }
        if self.seed.is_some() {
            config.execution.seed = self.seed;
        }
        if let Some(precision) = self.precision {
            config.record.timestamp_precision = precision;
        }
        if self.no_git {
            config.git.enabled = false;
        }
        if let Some(report) = &self.report {
            config.report.path = Some(report.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load().context("Failed to load configuration")?;

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Run(args) => {
            args.apply(&mut config);
            config.validate().context("Invalid configuration")?;
            config.logging.level = level_for_verbosity(&config.logging.level, cli.verbose);
            init_structured_logging(&config.logging);
            run(config, args.format).await
        }
    }
}

async fn run(config: GeneratorConfig, format: OutputFormat) -> anyhow::Result<()> {
    let mut generator = BatchGenerator::from_config(config)
        .await
        .context("Failed to prepare generator")?;
    let report_path = generator.config().report.path.clone();
    let git_enabled = generator.config().git.enabled;

    let cancelled = generator.cancellation_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing current steps");
            cancelled.store(true, Ordering::SeqCst);
        }
    });

    let report = generator.run().await.context("Generation failed")?;

    if let Some(path) = &report_path {
        report
            .write_json(path)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Run report written");
    }

    match format {
        OutputFormat::Text => {
            println!("{}", report.render_text());
            if report.is_complete() && git_enabled {
                println!("Successfully created all folders and files with git commits!");
            } else if report.is_complete() {
                println!("Successfully created all folders and files!");
            }
        }
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
