//! Atomic facts extracted from a human-validated reference answer.

use serde::{Deserialize, Serialize};

use super::{LlmAnswer, Meta};

/// One atomic, numbered proposition.
///
/// After Fact-prompter post-processing, `text` always begins with
/// `"<i>. "` where `i` is the fact's 1-based position in its owning
/// [`Facts::items`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Fact text, numbered (`"1. Paris is the capital of France"`).
    #[serde(default)]
    pub text: String,

    /// Free-form metadata.
    #[serde(default)]
    pub meta: Meta,
}

impl Fact {
    /// Creates a fact from raw text (not yet numbered).
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meta: Meta::new(),
        }
    }

    /// The fact's 1-based numeric prefix, if `text` starts with one
    /// (`"3. ..."` → `Some(3)`).
    #[must_use]
    pub fn number(&self) -> Option<usize> {
        let digits: String = self.text.chars().take_while(char::is_ascii_digit).collect();
        if digits.is_empty() || !self.text[digits.len()..].starts_with('.') {
            return None;
        }
        digits.parse().ok()
    }
}

/// The facts extracted for one QA, plus the single `LlmAnswer` that
/// produced them.
///
/// Flattened per the data-model design note: rather than `Facts` both being
/// a list-of-`Fact` and a holder of an `LlmAnswer` via inheritance, it is a
/// plain struct composing both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facts {
    /// Numbered facts, in the order the Fact prompter produced them.
    #[serde(default)]
    pub items: Vec<Fact>,

    /// The generation that produced `items`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_answer: Option<LlmAnswer>,

    /// Free-form metadata.
    #[serde(default)]
    pub meta: Meta,
}

impl Facts {
    /// `true` if no facts have been extracted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The set of 1-based fact numbers present, as used by the Eval
    /// prompter's `T` (true fact indices) set.
    #[must_use]
    pub fn numbers(&self) -> std::collections::BTreeSet<usize> {
        self.items.iter().filter_map(Fact::number).collect()
    }
}
