//! LLM drivers: a uniform `complete`/`generate` contract over a named
//! text-completion model, plus the reference `LiteLLM`-style implementation.

pub mod litellm;
pub mod provider;
pub mod providers;
pub mod traits;

pub use litellm::{drivers_from_names, LiteLlm};
pub use provider::{Provider, ProviderError, ProviderResponse};
pub use traits::{LlmDriver, Step};

use std::sync::Arc;

/// Builds one [`LiteLlm`] driver per name, sharing a single provider
/// connection across all of them.
///
/// Model names are not a closed registry (unlike Prompter names): any
/// string the provider's backend recognizes is valid, so this simply
/// fans a name list out into drivers rather than looking names up in a
/// table.
#[must_use]
pub fn llms_from_names(names: &[String], provider: &Arc<dyn Provider>) -> Vec<Box<dyn LlmDriver>> {
    names
        .iter()
        .map(|name| Box::new(LiteLlm::new(Arc::clone(provider), name.clone())) as Box<dyn LlmDriver>)
        .collect()
}
