//! `OpenAI`-compatible [`Provider`] built on the `async-openai` crate.
//!
//! Works against `OpenAI` and any API that mirrors its chat completion
//! endpoint (Azure, local proxies) via the base URL override.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use async_trait::async_trait;

use super::super::provider::{Provider, ProviderError, ProviderResponse};

/// `OpenAI`-compatible chat completion backend.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAiProvider {
    /// Creates a provider from an API key and optional base URL override.
    #[must_use]
    pub fn new(api_key: &str, base_url: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = base_url {
            config = config.with_api_base(base_url);
        }
        Self {
            client: Client::with_config(config),
        }
    }

    fn build_request(
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> CreateChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.to_string()),
                    name: None,
                },
            ));
        }
        messages.push(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(user.to_string()),
                name: None,
            },
        ));

        CreateChatCompletionRequest {
            model: model.to_string(),
            messages,
            temperature: Some(temperature).filter(|&t| t != 0.0),
            max_completion_tokens: max_tokens,
            ..Default::default()
        }
    }

    /// Classifies an SDK error as rate-limiting or terminal.
    fn classify_error(error: &OpenAIError) -> ProviderError {
        let message = error.to_string();
        if message.to_lowercase().contains("rate limit") || message.contains("429") {
            ProviderError::RateLimited
        } else {
            ProviderError::Other(message)
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &"<async-openai::Client>")
            .finish()
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = Self::build_request(model, system, user, temperature, max_tokens);

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| Self::classify_error(&e))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let full_name = response.model.clone();

        Ok(ProviderResponse {
            full_name,
            text,
            duration: None,
            cost: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_request_omits_system_message_when_empty() {
        let request = OpenAiProvider::build_request("gpt-4o-mini", "", "hi", 0.0, None);
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn build_request_includes_system_message_when_present() {
        let request = OpenAiProvider::build_request("gpt-4o-mini", "be terse", "hi", 0.0, Some(64));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.max_completion_tokens, Some(64));
    }

    #[test]
    fn zero_temperature_is_omitted_to_use_provider_default() {
        let request = OpenAiProvider::build_request("gpt-4o-mini", "", "hi", 0.0, None);
        assert_eq!(request.temperature, None);
    }

    #[test]
    fn nonzero_temperature_is_passed_through() {
        let request = OpenAiProvider::build_request("gpt-4o-mini", "", "hi", 0.7, None);
        assert_eq!(request.temperature, Some(0.7));
    }
}
