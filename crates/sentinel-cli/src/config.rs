//! Configuration for the sentinel CLI

use std::time::Duration;

use sentinel_gate::GateConfig;
use sentinel_types::ScoringEndpoint;
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// Scoring and catalog service
    #[serde(default)]
    pub service: ServiceConfig,

    /// Threshold, timeouts and display scaling
    #[serde(default)]
    pub gate: GateConfig,

    /// Local approval signer
    #[serde(default)]
    pub signer: SignerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL shared by the scoring and catalog endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Scoring endpoint to post edits to
    #[serde(default)]
    pub endpoint: ScoringEndpoint,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: ScoringEndpoint::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Signer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignerConfig {
    /// 32-byte Ed25519 seed, hex encoded. A fresh key is generated per run
    /// when unset.
    #[serde(default)]
    pub seed_hex: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl SentinelConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `SENTINEL_*` environment variables (`SENTINEL_SERVICE__BASE_URL`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&SentinelConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SENTINEL")
                .prefix_separator("_")
                .separator("__"),
        );

        builder.build()?.try_deserialize()
    }
}
