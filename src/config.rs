// Gateway Configuration
// Read once at startup, then passed to the gateway by value.

use anyhow::{bail, Context, Result};
use std::time::Duration;

pub const DEFAULT_UPSTREAM_URL: &str = "https://mockapi.io/api/v1/expenses";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

/// Process-wide settings for the expense gateway
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Base URL of the upstream expense collection (no trailing slash)
    pub upstream_url: String,

    pub port: u16,

    pub bind_host: String,

    /// Upper bound on every outbound call
    pub upstream_timeout: Duration,

    /// tracing-subscriber filter directive
    pub log_filter: String,
}

impl GatewayConfig {
    /// Load configuration from the environment (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream_url = lookup("MOCK_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        let bind_host = lookup("BIND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("UPSTREAM_TIMEOUT_SECS must be a whole number, got {:?}", raw)
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }

        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            upstream_url,
            port,
            bind_host,
            upstream_timeout: Duration::from_secs(timeout_secs),
            log_filter,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            port: DEFAULT_PORT,
            bind_host: DEFAULT_HOST.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
