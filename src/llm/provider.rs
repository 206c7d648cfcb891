//! The transport-level contract a [`super::litellm::LiteLlm`] driver calls
//! into — one HTTP/SDK round trip, no retry policy.
//!
//! Kept separate from [`super::traits::LlmDriver`] so retry/backoff policy
//! (owned by `LiteLlm`) is independent of the wire protocol (owned by a
//! `Provider` implementation such as [`super::providers::openai::OpenAiProvider`]).

use async_trait::async_trait;

/// The outcome of one successful completion call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Fully-qualified model name as reported by the backend.
    pub full_name: String,
    /// Raw completion text.
    pub text: String,
    /// Wall-clock duration of the call, in seconds.
    pub duration: Option<f64>,
    /// Estimated cost of the call, in the backend's currency convention.
    pub cost: Option<f64>,
}

/// Why a completion call failed, distinguishing rate limiting (retryable)
/// from everything else (terminal).
#[derive(Debug, Clone)]
pub enum ProviderError {
    /// The backend reported a rate limit; safe to retry after a delay.
    RateLimited,
    /// Any other failure (auth, network, malformed response).
    Other(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate limited"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

/// A named text-completion backend.
///
/// Implementations translate `(model, system, user, temperature,
/// max_tokens)` into a vendor SDK call and classify the failure mode on
/// error; retry policy lives entirely in the calling [`super::litellm::LiteLlm`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g. `"openai"`).
    fn name(&self) -> &'static str;

    /// Issues one completion call, with no retry.
    async fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<ProviderResponse, ProviderError>;
}
