//! The raw record of a single LLM completion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Prompt;

/// The immediate output of one LLM call.
///
/// An `LlmAnswer` is never mutated after construction: replacing it means
/// recomputing the whole step, never patching a field in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmAnswer {
    /// Raw text returned by the model.
    pub text: String,

    /// The prompt that produced this answer.
    pub prompt: Prompt,

    /// Short model name as configured (e.g. `"gpt-4o-mini"`).
    pub name: String,

    /// Fully-qualified model name as reported by the provider, when it
    /// differs from the short name (otherwise equal to `name`).
    pub full_name: String,

    /// Timestamp of the call's issue (UTC, ISO-8601 on the wire).
    pub timestamp: DateTime<Utc>,

    /// Wall-clock duration of the call, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Currency-agnostic estimated cost of the call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl LlmAnswer {
    /// Creates a new `LlmAnswer` stamped with the current time.
    #[must_use]
    pub fn new(text: impl Into<String>, prompt: Prompt, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            text: text.into(),
            prompt,
            full_name: name.clone(),
            name,
            timestamp: Utc::now(),
            duration: None,
            cost: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stamps_name_into_both_fields() {
        let a = LlmAnswer::new("4", Prompt::new("", "2+2=?"), "gpt-4o-mini");
        assert_eq!(a.name, "gpt-4o-mini");
        assert_eq!(a.full_name, "gpt-4o-mini");
        assert!(a.duration.is_none());
        assert!(a.cost.is_none());
    }

    #[test]
    fn serializes_timestamp_as_iso8601() {
        let a = LlmAnswer::new("4", Prompt::default(), "m");
        let json = serde_json::to_string(&a).unwrap_or_default();
        assert!(json.contains('T'));
        assert!(json.contains('Z') || json.contains('+'));
    }

    #[test]
    fn omits_absent_duration_and_cost() {
        let a = LlmAnswer::new("4", Prompt::default(), "m");
        let json = serde_json::to_string(&a).unwrap_or_default();
        assert!(!json.contains("duration"));
        assert!(!json.contains("cost"));
    }
}
