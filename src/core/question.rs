//! A question posed to the pipeline.

use serde::{Deserialize, Serialize};

use super::Meta;

/// One question from the input questions file.
///
/// A `Question` is immutable once loaded: stage generators read `text` and
/// `meta` but never write to a `Question` directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The question text sent to the Prompter.
    #[serde(default)]
    pub text: String,

    /// Free-form metadata (e.g. a `transco` table for multiple-choice
    /// answers, carried through from the input file).
    #[serde(default)]
    pub meta: Meta,
}

impl Question {
    /// Creates a new question with empty metadata.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meta: Meta::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_empty_meta() {
        let q = Question::new("2+2=?");
        assert_eq!(q.text, "2+2=?");
        assert!(q.meta.is_empty());
    }

    #[test]
    fn round_trips_through_json() {
        let q = Question::new("what is the capital of France?");
        let json = serde_json::to_string(&q).unwrap_or_default();
        let back: Question = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(back, q);
    }

    #[test]
    fn missing_fields_default() {
        let q: Question = serde_json::from_str("{}").unwrap_or_default();
        assert_eq!(q.text, "");
        assert!(q.meta.is_empty());
    }
}
