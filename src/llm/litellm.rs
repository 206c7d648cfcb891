//! The reference [`LlmDriver`]: a named model reached through a pluggable
//! [`Provider`], with fixed-delay retry on rate limiting.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;

use crate::config::RagtimeConfig;
use crate::core::{LlmAnswer, Prompt};

use super::provider::{Provider, ProviderError};
use super::traits::LlmDriver;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
/// Default retry budget on rate-limit responses.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default fixed delay between rate-limit retries.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Wraps a named model behind a [`Provider`], handling rate-limit retries
/// and stamping [`LlmAnswer`] metadata on every completion.
pub struct LiteLlm {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_retries: u32,
    max_tokens: Option<u32>,
    retry_delay: Duration,
    concurrency: Option<Arc<Semaphore>>,
}

impl LiteLlm {
    /// Creates a driver for `model`, using defaults for temperature,
    /// retries, and retry delay.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_retries: DEFAULT_MAX_RETRIES,
            max_tokens: None,
            retry_delay: DEFAULT_RETRY_DELAY,
            concurrency: None,
        }
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Overrides the retry budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Overrides the per-call token cap.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Overrides the fixed delay between rate-limit retries.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Bounds how many calls to this model run concurrently.
    ///
    /// A concurrency limit belongs here rather than in the stage fan-out:
    /// the stage schedules one task per QA unconditionally, and it's the
    /// driver's job to throttle calls to a specific model if its backend
    /// needs that.
    #[must_use]
    pub fn with_concurrency_limit(mut self, permits: usize) -> Self {
        self.concurrency = Some(Arc::new(Semaphore::new(permits.max(1))));
        self
    }
}

#[async_trait]
impl LlmDriver for LiteLlm {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Option<LlmAnswer> {
        let _permit = match &self.concurrency {
            Some(semaphore) => Some(semaphore.acquire().await.ok()?),
            None => None,
        };

        let start = Utc::now();
        let mut attempts = 0;

        loop {
            attempts += 1;
            let call_start = std::time::Instant::now();
            match self
                .provider
                .complete(
                    &self.model,
                    &prompt.system,
                    &prompt.user,
                    self.temperature,
                    self.max_tokens,
                )
                .await
            {
                Ok(response) => {
                    return Some(LlmAnswer {
                        text: response.text,
                        prompt: prompt.clone(),
                        name: self.model.clone(),
                        full_name: response.full_name,
                        timestamp: start,
                        duration: response
                            .duration
                            .or_else(|| Some(call_start.elapsed().as_secs_f64())),
                        cost: response.cost,
                    });
                }
                Err(ProviderError::RateLimited) if attempts <= self.max_retries => {
                    tracing::warn!(
                        model = %self.model,
                        attempt = attempts,
                        "rate limited, retrying after {:?}",
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(ProviderError::RateLimited) => {
                    tracing::warn!(model = %self.model, attempts, "exhausted retries on rate limit");
                    return None;
                }
                Err(ProviderError::Other(message)) => {
                    tracing::warn!(model = %self.model, error = %message, "completion failed");
                    return None;
                }
            }
        }
    }
}

/// Builds one [`LiteLlm`] driver per name, applying `config`'s defaults
/// (temperature, retry budget, retry delay, token cap) to each.
///
/// The pipeline assembler's way of turning a stage's `llms: [String]` list
/// into live drivers, sharing one provider connection across all of them.
#[must_use]
pub fn drivers_from_names(
    names: &[String],
    provider: &Arc<dyn Provider>,
    config: &RagtimeConfig,
) -> Vec<Box<dyn LlmDriver>> {
    names
        .iter()
        .map(|name| {
            let mut driver = LiteLlm::new(Arc::clone(provider), name.clone())
                .with_temperature(config.temperature)
                .with_max_retries(config.max_retries)
                .with_retry_delay(config.retry_delay);
            if let Some(max_tokens) = config.max_tokens {
                driver = driver.with_max_tokens(max_tokens);
            }
            Box::new(driver) as Box<dyn LlmDriver>
        })
        .collect()
}
