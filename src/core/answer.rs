//! A candidate response from one LLM to one question.

use serde::{Deserialize, Serialize};

use super::{Eval, LlmAnswer, Meta, UNKNOWN_LLM_NAME};

/// One candidate answer, optionally scored by an [`Eval`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Post-processed final text. May differ from `llm_answer.text` (e.g.
    /// a field extracted out of a raw JSON response).
    #[serde(default)]
    pub text: String,

    /// Free-form metadata written by Prompter post-processing.
    #[serde(default)]
    pub meta: Meta,

    /// The generation that produced this answer. `None` for an answer
    /// entered manually (see [`UNKNOWN_LLM_NAME`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_answer: Option<LlmAnswer>,

    /// This answer's evaluation, if one has been generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval: Option<Eval>,
}

impl Answer {
    /// The short model name that produced this answer, or the
    /// [`UNKNOWN_LLM_NAME`] sentinel if it was entered without one.
    #[must_use]
    pub fn producer_name(&self) -> &str {
        self.llm_answer
            .as_ref()
            .map_or(UNKNOWN_LLM_NAME, |a| a.name.as_str())
    }

    /// The full model name that produced this answer, or the producer's
    /// short name if no `llm_answer` is present.
    #[must_use]
    pub fn producer_full_name(&self) -> &str {
        self.llm_answer
            .as_ref()
            .map_or(UNKNOWN_LLM_NAME, |a| a.full_name.as_str())
    }

    /// Matches an answer by its producing model's short or full name,
    /// mirroring the original generator's lookup of a prior answer to
    /// reuse across resumed runs.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.producer_name() == name || self.producer_full_name() == name
    }
}

/// The candidate answers for one QA, one per configured LLM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    /// Answers, in the order of the configured LLM list.
    #[serde(default)]
    pub items: Vec<Answer>,

    /// Free-form metadata.
    #[serde(default)]
    pub meta: Meta,
}

impl Answers {
    /// `true` if no answers have been generated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of answers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Finds an existing answer by its producer's short or full name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Answer> {
        self.items.iter().find(|a| a.matches_name(name))
    }
}
