//! Asset Hunter CLI
//!
//! Local execution entry point.

use std::io::Write;
use std::path::PathBuf;

use asset_hunter::{
    error::Result,
    models::Config,
    pipeline::{self, BatchOutcome, InterruptFlag},
    services::HunterClient,
    storage::{CsvCompanySource, LocalResultSink, local},
    utils::console,
};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::Level;

/// asset-hunter - Company Asset Enumeration via Hunter
#[derive(Parser, Debug)]
#[command(
    name = "asset-hunter",
    version,
    about = "Batch company asset enumeration and admin surface screening"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query every company in the input list
    Run {
        /// Company list CSV (default: paths.input_file)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for result files (default: paths.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Check that the API key is accepted
    Check,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging: timestamps, colored levels, crate at info or debug.
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("asset_hunter", level)
        .parse_default_env()
        .format(|buf, record| {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let message = record.args().to_string();
            let line = match record.level() {
                Level::Error => format!("[{timestamp}] {}", message.red()),
                Level::Warn => format!("[{timestamp}] {}", message.yellow()),
                Level::Info => format!("[{timestamp}] {}", message.green()),
                Level::Debug | Level::Trace => format!("[{timestamp}] {}", message.dimmed()),
            };
            writeln!(buf, "{line}")
        })
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run { input, output_dir } => {
            if let Some(path) = input {
                config.paths.input_file = path.display().to_string();
            }
            if let Some(path) = output_dir {
                config.paths.output_dir = path.display().to_string();
            }
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            let interrupt = InterruptFlag::install()?;
            let client = HunterClient::new(&config)?;
            let source =
                CsvCompanySource::new(&config.paths.input_file, &config.paths.company_column);
            let sink = LocalResultSink::new(&config.paths.output_dir);

            let summary =
                match pipeline::run_hunter(&config, &client, &source, &sink, &interrupt).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        log::error!("{}", e);
                        return Err(e);
                    }
                };

            if summary.outcome == BatchOutcome::Completed {
                console::header(&format!(
                    "All {} companies queried and screened",
                    summary.progress.total
                ));
                log::info!(
                    "Primary results: {}",
                    sink.path(local::PRIMARY_CSV).display()
                );
                log::info!(
                    "Primary report: {}",
                    sink.path(local::PRIMARY_TXT).display()
                );
                log::info!(
                    "Admin/login surfaces: {}",
                    sink.path(local::SECONDARY_CSV).display()
                );
            }
        }

        Command::Check => {
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            let client = HunterClient::new(&config)?;
            if let Err(e) = pipeline::run_check(&client).await {
                log::error!("{}", e);
                return Err(e);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("    endpoint: {}", config.hunter.endpoint);
            log::info!(
                "    delay: {}-{}s",
                config.throttle.delay_min_secs,
                config.throttle.delay_max_secs
            );
            log::info!(
                "    sensitive keywords: {} (groups of {})",
                config.query.sensitive_keywords.len(),
                config.query.keyword_group_size
            );
            log::info!(
                "    title filters: {} harmful, {} banned",
                config.filter.harmful_title_substrings.len(),
                config.filter.banned_title_substrings.len()
            );
        }
    }

    Ok(())
}
