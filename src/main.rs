//! CLI entry point for the cycle hire KML generator.
//!
//! Fetches the live station feed once and writes one KML document per
//! configured target.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cycle_hire_kml::{
    config::PipelineConfig,
    fetch::{BasicClient, load_source},
    output::{FileSink, print_json},
    parser::extract_stations,
    pipeline::run,
};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cycle_hire_kml")]
#[command(about = "Render the cycle hire station feed as KML layers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed and write every configured KML target
    Generate {
        /// JSON config file (built-in London setup if omitted)
        #[arg(short, long)]
        config: Option<String>,

        /// Path to file or URL to read the feed from instead of the configured URL
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
    /// Fetch the feed and print the extracted stations as JSON
    Stations {
        #[arg(short, long)]
        config: Option<String>,

        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
    /// Print the effective configuration as JSON
    ShowConfig {
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/cycle_hire_kml.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cycle_hire_kml.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { config, source } => {
            let config = load_config(config.as_deref(), source)?;
            let client = BasicClient::new(Duration::from_secs(config.timeout_secs))?;

            let reports = run(&config, &client, &FileSink).await?;
            let placemarks: usize = reports.iter().map(|r| r.placemarks).sum();
            info!(targets = reports.len(), placemarks, "All targets written");
        }
        Commands::Stations { config, source } => {
            let config = load_config(config.as_deref(), source)?;
            let client = BasicClient::new(Duration::from_secs(config.timeout_secs))?;

            let bytes = load_source(&client, &config.source_url).await?;
            let records = extract_stations(&bytes, &config.station_selector, &config.fields)?;
            info!(stations = records.len(), "Stations extracted");
            print_json(&records)?;
        }
        Commands::ShowConfig { config } => {
            let config = load_config(config.as_deref(), None)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// Reads the config file if given, then applies the `--source` override.
///
/// `PipelineConfig::load` validates; the override only touches the source.
fn load_config(path: Option<&str>, source: Option<String>) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => PipelineConfig::default(),
    };
    if let Some(source) = source {
        config.source_url = source;
    }
    Ok(config)
}
