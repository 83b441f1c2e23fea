use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::JourneyError;
use crate::site;

/// Login credentials for the target site.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Inclusive delay range in seconds. Invariant: `0 <= min <= max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    fn validate(&self, what: &str) -> Result<(), JourneyError> {
        if !self.min_secs.is_finite() || !self.max_secs.is_finite() || self.min_secs < 0.0 {
            return Err(JourneyError::Config(format!(
                "{} delay range must be non-negative, got {}..{}",
                what, self.min_secs, self.max_secs
            )));
        }
        if self.min_secs > self.max_secs {
            return Err(JourneyError::Config(format!(
                "{} delay range has min > max ({} > {})",
                what, self.min_secs, self.max_secs
            )));
        }
        Ok(())
    }
}

/// Upstream proxy for the browser session, probed once before the run.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub server: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Build from `PROXY_SERVER_URL` / `PROXY_USERNAME` / `PROXY_PASSWORD`
    /// when no proxy was given on the command line.
    pub fn from_env() -> Option<Self> {
        let server = std::env::var("PROXY_SERVER_URL").ok()?;
        Some(Self {
            server,
            username: std::env::var("PROXY_USERNAME").ok(),
            password: std::env::var("PROXY_PASSWORD").ok(),
        })
    }
}

/// Fully resolved run configuration. Immutable once validated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub credentials: Credentials,
    pub headless: bool,
    /// Number of products to browse (1-6). `None` picks 1-3 at run start.
    pub product_count: Option<u8>,
    /// Pause between actions, modeling thinking/reading time.
    pub action_delay: DelayRange,
    /// Pause between keystrokes.
    pub typing_delay: DelayRange,
    pub proxy: Option<ProxyConfig>,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
    pub base_url: String,
}

pub const MAX_PRODUCT_COUNT: u8 = 6;

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials {
                username: std::env::var("SAUCE_USERNAME")
                    .unwrap_or_else(|_| "standard_user".to_string()),
                password: std::env::var("SAUCE_PASSWORD")
                    .unwrap_or_else(|_| "secret_sauce".to_string()),
            },
            headless: true,
            product_count: None,
            action_delay: DelayRange::new(1.0, 3.0),
            typing_delay: DelayRange::new(0.1, 0.3),
            proxy: ProxyConfig::from_env(),
            seed: None,
            output_dir: PathBuf::from("./output"),
            base_url: site::BASE_URL.to_string(),
        }
    }
}

impl RunConfig {
    /// Check every invariant before a browser session opens. Violations are
    /// configuration errors and are never retried.
    pub fn validate(&self) -> Result<(), JourneyError> {
        self.action_delay.validate("action")?;
        self.typing_delay.validate("typing")?;

        if let Some(count) = self.product_count {
            if count == 0 || count > MAX_PRODUCT_COUNT {
                return Err(JourneyError::Config(format!(
                    "product count must be 1-{}, got {}",
                    MAX_PRODUCT_COUNT, count
                )));
            }
        }

        if self.credentials.username.is_empty() {
            return Err(JourneyError::Config("username must not be empty".into()));
        }

        if let Some(ref proxy) = self.proxy {
            if proxy.server.is_empty() {
                return Err(JourneyError::Config("proxy server URL must not be empty".into()));
            }
        }

        Ok(())
    }
}
