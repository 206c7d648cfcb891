//! Process-wide configuration: API credentials, default LLM parameters,
//! and concurrency limits, resolved in order explicit value → environment
//! variable → default.

use std::time::Duration;

use crate::error::ConfigError;
use crate::llm::litellm::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, DEFAULT_TEMPERATURE};

/// No cap on in-flight QA tasks for one stage run.
const DEFAULT_MAX_CONCURRENT_QAS: usize = 0;

/// Resolved configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct RagtimeConfig {
    /// API key for the configured LLM provider.
    pub api_key: String,
    /// Optional base URL override (proxies, Azure, local gateways).
    pub base_url: Option<String>,
    /// Default sampling temperature for drivers built from this config.
    pub temperature: f32,
    /// Default retry budget on rate-limit responses.
    pub max_retries: u32,
    /// Default fixed delay between rate-limit retries.
    pub retry_delay: Duration,
    /// Default per-call token cap, if any.
    pub max_tokens: Option<u32>,
    /// Maximum QAs processed concurrently within one stage run. `0` means
    /// unbounded (one task per QA, no cap).
    pub max_concurrent_qas: usize,
}

impl RagtimeConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> RagtimeConfigBuilder {
        RagtimeConfigBuilder::default()
    }

    /// Builds configuration from environment variables, falling back to
    /// defaults for everything but the API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`RagtimeConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagtimeConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    temperature: Option<f32>,
    max_retries: Option<u32>,
    retry_delay: Option<Duration>,
    max_tokens: Option<u32>,
    max_concurrent_qas: Option<usize>,
}

impl RagtimeConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("RAGTIME_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL")
                .or_else(|_| std::env::var("RAGTIME_BASE_URL"))
                .ok();
        }
        if self.temperature.is_none() {
            self.temperature = env_parsed("RAGTIME_TEMPERATURE");
        }
        if self.max_retries.is_none() {
            self.max_retries = env_parsed("RAGTIME_MAX_RETRIES");
        }
        if self.retry_delay.is_none() {
            self.retry_delay = env_parsed::<u64>("RAGTIME_RETRY_DELAY_SECS").map(Duration::from_secs);
        }
        if self.max_tokens.is_none() {
            self.max_tokens = env_parsed("RAGTIME_MAX_TOKENS");
        }
        if self.max_concurrent_qas.is_none() {
            self.max_concurrent_qas = env_parsed("RAGTIME_MAX_CONCURRENT_QAS");
        }
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the default sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the default retry budget.
    #[must_use]
    pub const fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    /// Sets the default retry delay.
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Sets the default per-call token cap.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the maximum number of QAs processed concurrently.
    #[must_use]
    pub const fn max_concurrent_qas(mut self, n: usize) -> Self {
        self.max_concurrent_qas = Some(n);
        self
    }

    /// Builds the [`RagtimeConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ApiKeyMissing`] if no API key was set.
    pub fn build(self) -> Result<RagtimeConfig, ConfigError> {
        let api_key = self.api_key.ok_or(ConfigError::ApiKeyMissing)?;

        Ok(RagtimeConfig {
            api_key,
            base_url: self.base_url,
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_delay: self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY),
            max_tokens: self.max_tokens,
            max_concurrent_qas: self.max_concurrent_qas.unwrap_or(DEFAULT_MAX_CONCURRENT_QAS),
        })
    }
}

fn env_parsed<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}
