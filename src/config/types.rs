use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use verso_core::PipelineConfig;
use verso_index::IndexSettings;
use verso_index::http::DEFAULT_TIMEOUT_SECS;

/// A credential that never prints its value.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub algolia: AlgoliaConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
}

#[derive(Debug, Deserialize)]
pub struct AlgoliaConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub api_key: Option<Secret>,
    #[serde(default)]
    pub index: String,
    /// Overrides `https://{app_id}.algolia.net`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_algolia_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub settings: IndexSettings,
}

fn default_algolia_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AlgoliaConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_key: None,
            index: String::new(),
            base_url: None,
            timeout_secs: default_algolia_timeout(),
            settings: IndexSettings::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Expected `?secret=` value on webhook routes.
    #[serde(default)]
    pub secret: Option<Secret>,
    /// Requests allowed per client IP within `rate_window_secs`; 0 disables limiting.
    #[serde(default = "default_gateway_rate_limit")]
    pub rate_limit: u32,
    #[serde(default = "default_gateway_rate_window")]
    pub rate_window_secs: u64,
    #[serde(default = "default_gateway_max_body")]
    pub max_body_size: usize,
}

fn default_gateway_bind() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    8090
}

fn default_gateway_rate_limit() -> u32 {
    120
}

fn default_gateway_rate_window() -> u64 {
    60
}

fn default_gateway_max_body() -> usize {
    1_048_576
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: default_gateway_bind(),
            port: default_gateway_port(),
            secret: None,
            rate_limit: default_gateway_rate_limit(),
            rate_window_secs: default_gateway_rate_window(),
            max_body_size: default_gateway_max_body(),
        }
    }
}

/// Enablement and ignore list for webhook-driven indexing.
///
/// When `file` is set, the gateway re-reads it on every request and the
/// other two fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ControlsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ignore_slugs: Vec<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}
