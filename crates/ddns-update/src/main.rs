// # ddns-update - one-shot DDNS updater
//
// Points the A records of the configured FQDNs at the machine's current
// public IPv4 address, then exits. Meant to be run by a scheduler
// (systemd timer, cron).
//
// This binary is a THIN front end only: all decision logic lives in
// `ddns_core::Reconciler`.
//
// The binary is responsible for:
// 1. Parsing command-line flags
// 2. Initializing logging
// 3. Loading the run configuration
// 4. Resolving the current public IP
// 5. Running the reconciler once and mapping its outcome to an exit code
//
// ## Configuration
//
// `<config dir>/ddns-update/config.json` unless `-c` is given:
//
// ```json
// { "FQDN": ["home.example.com"], "APIToken": "<cloudflare token>" }
// ```
//
// ## Environment
//
// - `DDNS_LOG_LEVEL`: trace, debug, info (default), warn, error
// - `DDNS_IP_URL`: IP discovery service (default https://api.ipify.org)
//
// ## Example
//
// ```bash
// ddns-update -c /etc/ddns-update/config.json      # update
// ddns-update -n                                   # check mode, no changes
// ```

use anyhow::{Context, Result};
use clap::Parser;
use ddns_core::config::default_config_path;
use ddns_core::{IpSource, RECORD_TYPE_A, Reconciler, RunConfig};
use ddns_ip_http::{DEFAULT_IP_URL, HttpIpSource};
use ddns_provider_cloudflare::CloudflareFactory;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Every record is up to date (or would be, in check mode)
/// - 1: Configuration or startup error
/// - 2: Runtime error (IP resolution, runtime creation)
/// - 3: At least one zone lookup, listing or update failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// All records handled
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure before reconciliation)
    RuntimeError = 2,
    /// Reconciliation finished with failures
    UpdateFailed = 3,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep DNS A records pointed at this machine's public IPv4 address
#[derive(Debug, Parser)]
#[command(name = "ddns-update")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/ddns-update/config.json)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Check mode (dry run): report stale records without changing them
    #[arg(short = 'n', long = "check")]
    check: bool,

    /// Service returning the caller's public IPv4 address as plain text
    #[arg(long = "ip-url", env = "DDNS_IP_URL", default_value = DEFAULT_IP_URL)]
    ip_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Parse a log level name
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Log level '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Resolve and load the run configuration
fn load_config(cli: &Cli) -> Result<RunConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()
            .context("No config directory on this platform; pass the config file with -c")?,
    };

    let config = RunConfig::load(&path)
        .with_context(|| format!("Cannot load {}", path.display()))?;
    info!(
        "Configuration loaded from {}: {} FQDN(s)",
        path.display(),
        config.fqdns.len()
    );
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let ip_source = match HttpIpSource::new(cli.ip_url.clone()) {
        Ok(source) => source,
        Err(e) => {
            error!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Sequential by design: a single-threaded runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run_once(&config, &ip_source, cli.check)).into()
}

/// Resolve the current IP and reconcile every configured FQDN once
async fn run_once(config: &RunConfig, ip_source: &dyn IpSource, check_mode: bool) -> DdnsExitCode {
    let ip = match ip_source.current().await {
        Ok(ip) => ip,
        Err(e) => {
            error!("Couldn't determine the current IP address: {}", e);
            return DdnsExitCode::RuntimeError;
        }
    };
    info!("Current IP address is: {}", ip);

    let reconciler = Reconciler::connect(&CloudflareFactory::new(), &config.api_token);
    let outcome = reconciler
        .reconcile(&config.fqdns, RECORD_TYPE_A, &ip.to_string(), check_mode)
        .await;

    if outcome.is_success() {
        DdnsExitCode::Success
    } else {
        warn!("Unable to update all DNS records.");
        DdnsExitCode::UpdateFailed
    }
}
