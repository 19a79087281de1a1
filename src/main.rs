//! CLI entry point for the Easy Rider stop data checker.
//!
//! Reads a JSON array of bus stop records from a file or standard input and
//! prints the selected data-quality and route-consistency reports.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use easyrider::{
    commands::{self, Analysis, CONFIG_ENV_VAR},
    config::ValidationMode,
    output::{print_json, print_text},
    parser::parse_dataset,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "easyrider")]
#[command(about = "A tool to validate and analyze bus line stop data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Analysis,

    /// JSON dataset to read, `-` for standard input
    #[arg(short, long, global = true, default_value = "-")]
    input: String,

    /// JSON config file (defaults to $EASYRIDER_CONFIG when set)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Require stop names to end in Road, Avenue, Boulevard or Street
    #[arg(long, global = true, conflicts_with = "no_strict_stop_names")]
    strict_stop_names: bool,

    /// Accept any non-empty stop name, even if the config file enables strict names
    #[arg(long, global = true)]
    no_strict_stop_names: bool,

    /// Which fields the validation report covers
    #[arg(long, global = true, value_enum)]
    mode: Option<ValidationMode>,

    /// Output format of the reports
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging();

    let cli = Cli::parse();

    let env_config = std::env::var(CONFIG_ENV_VAR).ok();
    let config = commands::load_config(
        cli.config.as_deref(),
        env_config.as_deref(),
        strictness_override(&cli),
        cli.mode,
    )?;
    debug!(?config, "Configuration loaded");

    let bytes = commands::read_input(&cli.input, std::io::stdin().lock())?;
    let records = parse_dataset(&bytes)
        .with_context(|| format!("failed to load dataset from '{}'", cli.input))?;
    info!(records = records.len(), "Dataset loaded");

    let reports = commands::run(cli.command, &records, &config);

    let mut stdout = std::io::stdout().lock();
    match cli.format {
        OutputFormat::Text => print_text(&mut stdout, &reports)?,
        OutputFormat::Json => print_json(&mut stdout, &reports)?,
    }

    Ok(())
}

/// Logging setup: stderr (warn by default) + optional JSON rolling log file
/// when `LOG_FILE_PATH` is set.
fn init_logging() -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        );

    let (json_layer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_dir = Path::new(&log_file_path)
                .parent()
                .unwrap_or(Path::new("logs"));
            let log_file_name = Path::new(&log_file_path)
                .file_name()
                .unwrap_or(OsStr::new("easyrider.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(LevelFilter::DEBUG.into())
                        .with_env_var("RUST_LOG_JSON")
                        .from_env_lossy(),
                );
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

/// `Some` only when one of the paired strictness flags was given.
fn strictness_override(cli: &Cli) -> Option<bool> {
    match (cli.strict_stop_names, cli.no_strict_stop_names) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
