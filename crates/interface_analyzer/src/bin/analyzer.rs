//! Claims Integrity Core - Fraud Analyzer Binary
//!
//! Reads a JSON array of legacy claim records, assesses each one, runs scheme
//! detection over the batch and prints the batch report as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a file with default configuration
//! cargo run --bin fraud-analyzer -- claims.json
//!
//! # Read records from stdin, with a configuration file
//! cat claims.json | cargo run --bin fraud-analyzer -- - analyzer.toml
//! ```
//!
//! # Environment Variables
//!
//! * `ANALYZER_LOGGING__LEVEL` - Log filter when `RUST_LOG` is unset (default: info)
//! * `ANALYZER_LOGGING__FORMAT` - `pretty` or `json` (default: pretty)
//! * `ANALYZER_ORCHESTRATOR__CROSS_MATCH_BONUS` - Points per cross-system match (default: 25)
//! * `ANALYZER_MAINTENANCE__ENABLED` - Run background maintenance (default: true)

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interface_analyzer::{
    AnalyzerConfig, AnalyzerPorts, EnterpriseAnalyzer, LegacyClaimRecord, LogFormat, LoggingConfig,
    MaintenanceScheduler,
};

/// Main entry point for the analyzer.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded or fails validation
/// - The input cannot be read or is not a JSON array of claim records
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "-".to_string());
    let config_file = args.next().map(PathBuf::from);

    let config = AnalyzerConfig::load(config_file.as_deref()).context("failed to load analyzer configuration")?;
    init_tracing(&config.logging);

    let records = read_records(&input).with_context(|| format!("failed to read claim records from {input}"))?;
    tracing::info!(count = records.len(), input = %input, "Starting fraud analysis");

    let analyzer = EnterpriseAnalyzer::new(&config, AnalyzerPorts::offline());
    let scheduler = MaintenanceScheduler::start(
        analyzer.patterns().clone(),
        analyzer.scorer().clone(),
        &config.maintenance,
    );

    let report = analyzer.run_batch(&records).await;
    let case_report = analyzer.cases().report(Utc::now());

    tracing::info!(
        total_cases = case_report.total_cases,
        open_alerts = case_report.open_alerts,
        potential_loss = %case_report.total_potential_loss,
        "Case summary"
    );

    scheduler.shutdown();

    let output = serde_json::to_string_pretty(&report).context("failed to serialize batch report")?;
    println!("{output}");
    Ok(())
}

/// Reads a JSON array of records from a file, or stdin for `-`
fn read_records(input: &str) -> Result<Vec<LegacyClaimRecord>> {
    let raw = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(Path::new(input))?
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
    }
}
