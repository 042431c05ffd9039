use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::printer::transport::TransportSettings;
use crate::workflow::settle::SettlePolicy;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "printer-certs",
    version,
    about = "Manage TLS certificates through a printer's web admin console"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Printer base URL, e.g. https://printer.local
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Verify the printer's TLS certificate instead of accepting any
    #[arg(long, global = true)]
    pub strict_tls: bool,

    /// Append a JSONL trace of every device request to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Fixed settle delay in seconds (overrides the config file's settle section)
    #[arg(long, global = true)]
    pub settle_secs: Option<u64>,

    /// Path to config file (default: printer-certs.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the IDs of installed certificates
    List,

    /// Show the ID of the certificate the HTTPS server uses
    Current,

    /// Upload a PEM key and certificate
    Upload {
        /// PKCS#8 private key (PEM)
        #[arg(long)]
        key: String,

        /// Certificate, optionally followed by its issuer (PEM)
        #[arg(long)]
        cert: String,

        /// Make the uploaded certificate active afterwards
        #[arg(long)]
        activate: bool,
    },

    /// Make a certificate active for HTTPS and IPP (the printer restarts)
    Activate {
        #[arg(long)]
        id: String,
    },

    /// Delete a certificate
    Delete {
        #[arg(long)]
        id: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `printer-certs.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub printer: PrinterConfig,
    #[serde(default)]
    pub settle: SettleConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterConfig {
    pub url: Option<String>,

    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            url: None,
            accept_invalid_certs: true,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettleMode {
    #[default]
    Fixed,
    Poll,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleConfig {
    #[serde(default)]
    pub mode: SettleMode,

    #[serde(default = "default_ten")]
    pub delay_secs: u64,

    #[serde(default = "default_two")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_timeout")]
    pub poll_timeout_secs: u64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            mode: SettleMode::Fixed,
            delay_secs: 10,
            poll_interval_secs: 2,
            poll_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_two() -> u64 { 2 }
fn default_ten() -> u64 { 10 }
fn default_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("printer-certs.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "ignoring malformed config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Everything needed to open a printer handle, after CLI and file are merged.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub url: Option<String>,
    pub transport: TransportSettings,
    pub settle: SettlePolicy,
    pub trace_path: Option<String>,
}

/// Shortest poll interval a config file may ask for.
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// CLI flags win over the config file, which wins over built-in defaults.
pub fn resolve_settings(cli: &Cli, config: &AppConfig) -> ResolvedSettings {
    let settle = match (cli.settle_secs, config.settle.mode) {
        (Some(secs), _) => SettlePolicy::Fixed(Duration::from_secs(secs)),
        (None, SettleMode::Fixed) => {
            SettlePolicy::Fixed(Duration::from_secs(config.settle.delay_secs))
        }
        (None, SettleMode::Poll) => {
            let mut interval_secs = config.settle.poll_interval_secs;
            if interval_secs < MIN_POLL_INTERVAL_SECS {
                tracing::warn!(
                    configured = interval_secs,
                    used = MIN_POLL_INTERVAL_SECS,
                    "settle.poll_interval_secs too small; raising it"
                );
                interval_secs = MIN_POLL_INTERVAL_SECS;
            }
            SettlePolicy::Poll {
                interval: Duration::from_secs(interval_secs),
                timeout: Duration::from_secs(config.settle.poll_timeout_secs),
            }
        }
    };

    ResolvedSettings {
        url: cli.url.clone().or_else(|| config.printer.url.clone()),
        transport: TransportSettings {
            timeout: Duration::from_secs(config.printer.timeout_secs),
            accept_invalid_certs: config.printer.accept_invalid_certs && !cli.strict_tls,
        },
        settle,
        trace_path: cli.trace.clone().or_else(|| config.trace.path.clone()),
    }
}
