// crates/contract-probe-cli/src/config.rs
// ============================================================================
// Module: Run Configuration
// Description: Environment and flag resolution for one probe run.
// Purpose: Produce an explicit, validated run configuration before any request.
// Dependencies: contract-probe-core, thiserror
// ============================================================================

//! ## Overview
//! Settings come from command-line flags first, then environment variables,
//! then defaults. Environment values are parsed strictly: invalid UTF-8, blank
//! values, and non-positive timeouts fail closed instead of falling back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use contract_probe_core::ApiBase;
use contract_probe_core::ApiBaseError;
use contract_probe_core::CatalogError;
use contract_probe_core::CatalogSpec;
use contract_probe_core::DEFAULT_TIMEOUT;
use thiserror::Error;

// ============================================================================
// SECTION: Environment Keys
// ============================================================================

/// Environment keys read by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeEnv {
    /// Deployment URL of the API under test.
    BaseUrl,
    /// Per-request timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Path to a TOML catalog replacing the built-in one.
    Catalog,
}

impl ProbeEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "CONTRACT_PROBE_BASE_URL",
            Self::TimeoutSeconds => "CONTRACT_PROBE_TIMEOUT_SEC",
            Self::Catalog => "CONTRACT_PROBE_CATALOG",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors raised before the run starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment value failed validation.
    #[error("{0}")]
    Env(String),
    /// No base URL was supplied.
    #[error("base url is required: pass --base-url or set CONTRACT_PROBE_BASE_URL")]
    MissingBaseUrl,
    /// Base URL failed validation.
    #[error(transparent)]
    ApiBase(#[from] ApiBaseError),
    /// Catalog file failed to load.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Values read from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvConfig {
    /// Base URL override.
    pub base_url: Option<String>,
    /// Timeout override.
    pub timeout: Option<Duration>,
    /// Catalog file override.
    pub catalog: Option<PathBuf>,
}

impl EnvConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is not UTF-8, is blank, or
    /// fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Loads configuration through `lookup`, which maps a key to its raw value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is not UTF-8, is blank, or
    /// fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let base_url = read_env_nonempty(&lookup, ProbeEnv::BaseUrl.as_str())?;
        let timeout = read_env_nonempty(&lookup, ProbeEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(ProbeEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let catalog = read_env_nonempty(&lookup, ProbeEnv::Catalog.as_str())?.map(PathBuf::from);
        Ok(Self {
            base_url,
            timeout,
            catalog,
        })
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlagConfig {
    /// `--base-url`.
    pub base_url: Option<String>,
    /// `--timeout-seconds`, already range-checked by the parser.
    pub timeout_seconds: Option<u64>,
    /// `--catalog`.
    pub catalog: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// API root contract paths resolve against.
    pub api: ApiBase,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Expected catalog.
    pub catalog: CatalogSpec,
}

/// Merges flags over environment values and validates the result.
///
/// # Errors
///
/// Returns [`ConfigError`] when no base URL is supplied, the base URL is
/// invalid, or the catalog file cannot be loaded.
pub fn resolve(flags: FlagConfig, env: EnvConfig) -> Result<RunSettings, ConfigError> {
    let base_url = flags.base_url.or(env.base_url).ok_or(ConfigError::MissingBaseUrl)?;
    let timeout =
        flags.timeout_seconds.map(Duration::from_secs).or(env.timeout).unwrap_or(DEFAULT_TIMEOUT);
    let catalog = match flags.catalog.or(env.catalog) {
        Some(path) => CatalogSpec::load(&path)?,
        None => CatalogSpec::default(),
    };
    let api = ApiBase::new(&base_url, &catalog.api_prefix)?;
    Ok(RunSettings {
        api,
        timeout,
        catalog,
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a value and enforces UTF-8 validity.
fn read_env_strict<F>(lookup: &F, name: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<OsString>,
{
    lookup(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Env(format!("{name} must be valid UTF-8")))
    })
}

/// Reads a value and rejects blank strings.
fn read_env_nonempty<F>(lookup: &F, name: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<OsString>,
{
    match read_env_strict(lookup, name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses a positive whole number of seconds.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        ConfigError::Env(format!("{name} must be a positive integer number of seconds"))
    })?;
    if secs == 0 {
        return Err(ConfigError::Env(format!("{name} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}
