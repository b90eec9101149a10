// crates/contract-probe-cli/src/main.rs
// ============================================================================
// Module: Contract Probe CLI Entry Point
// Description: Runs the Systems Hub contract table against a deployed API.
// Purpose: Print per-contract verdicts and exit non-zero on any failure.
// Dependencies: clap, contract-probe-core, thiserror, tokio, tracing
// ============================================================================

//! ## Overview
//! `contract-probe` resolves the API base from flags or the environment,
//! builds the contract table from the built-in or file catalog, runs it once,
//! and writes a text or JSON report to stdout. Diagnostics go to stderr.
//!
//! Exit status: `0` when every contract passed, `1` when any contract failed
//! or configuration was invalid, `2` for unusable arguments.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;
mod telemetry;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::ValueEnum;
use contract_probe_core::EndpointContract;
use contract_probe_core::ReportFormat;
use contract_probe_core::RunSummary;
use contract_probe_core::Verifier;
use contract_probe_core::exit_code;
use contract_probe_core::report::write_report;
use thiserror::Error;
use tracing::info;

use crate::config::ConfigError;
use crate::config::EnvConfig;
use crate::config::FlagConfig;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "contract-probe",
    version,
    about = "Verify a deployed Systems Hub API against its contract table."
)]
struct Cli {
    /// Deployment URL of the API under test (overrides CONTRACT_PROBE_BASE_URL).
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Per-request timeout in seconds (overrides CONTRACT_PROBE_TIMEOUT_SEC).
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_seconds: Option<u64>,
    /// TOML catalog replacing the built-in one (overrides CONTRACT_PROBE_CATALOG).
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Run contracts concurrently; the report keeps declared order.
    #[arg(long)]
    parallel: bool,
    /// Run only contracts whose name contains this text (repeatable).
    #[arg(long = "only", value_name = "TEXT")]
    only: Vec<String>,
}

/// Report formats selectable on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Console report.
    Text,
    /// JSON document.
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::new(format!("configuration error: {err}"))
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Resolves configuration, runs the contracts, and writes the report.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    telemetry::init_tracing(telemetry::DEFAULT_LOG_FILTER);

    let flags = FlagConfig {
        base_url: cli.base_url,
        timeout_seconds: cli.timeout_seconds,
        catalog: cli.catalog,
    };
    let settings = config::resolve(flags, EnvConfig::load()?)?;
    let contracts = select_contracts(settings.catalog.contracts(), &cli.only)?;
    info!(
        api = %settings.api,
        contracts = contracts.len(),
        parallel = cli.parallel,
        timeout_ms = u64::try_from(settings.timeout.as_millis()).unwrap_or(u64::MAX),
        "starting contract run"
    );

    let verifier = Verifier::new(settings.api.clone(), settings.timeout)
        .map_err(|err| CliError::new(err.to_string()))?;
    let summary = if cli.parallel {
        verifier.run_all_concurrent(&contracts).await
    } else {
        verifier.run_all(&contracts).await
    };

    write_summary(cli.format, settings.api.as_str(), &summary)
        .map_err(|err| CliError::new(format!("failed to write report: {err}")))?;
    Ok(ExitCode::from(u8::try_from(exit_code(&summary)).unwrap_or(1)))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Keeps contracts whose name contains any filter; no filters keeps all.
fn select_contracts(
    contracts: Vec<EndpointContract>,
    filters: &[String],
) -> CliResult<Vec<EndpointContract>> {
    if filters.is_empty() {
        return Ok(contracts);
    }
    let selected: Vec<EndpointContract> = contracts
        .into_iter()
        .filter(|contract| filters.iter().any(|filter| contract.name().contains(filter.as_str())))
        .collect();
    if selected.is_empty() {
        return Err(CliError::new(format!(
            "no contracts match --only filters: {}",
            filters.join(", ")
        )));
    }
    Ok(selected)
}

/// Writes the report to stdout.
fn write_summary(format: OutputFormat, api_base: &str, summary: &RunSummary) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, format.into(), api_base, summary)?;
    stdout.flush()
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> io::Result<()> {
    let mut stderr = io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&format!("error: {message}"));
    ExitCode::FAILURE
}
