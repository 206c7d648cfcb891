//! The system/user prompt pair sent to an LLM.

use serde::{Deserialize, Serialize};

/// A prompt built by a [`crate::prompters::Prompter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// System instructions (may be empty).
    #[serde(default)]
    pub system: String,

    /// The user-facing prompt.
    #[serde(default)]
    pub user: String,
}

impl Prompt {
    /// Creates a prompt with both fields set.
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}
