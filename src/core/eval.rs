//! The machine (and optionally human) score of an Answer against the Facts.

use serde::{Deserialize, Serialize};

use super::{LlmAnswer, Meta};

/// The evaluation of one candidate [`super::Answer`].
///
/// Flattened per the data-model design note: `Eval` is a plain struct
/// carrying both its own text and an optional `LlmAnswer`, rather than
/// inheriting a `WithLlmAnswer` base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Eval {
    /// Post-processed annotated answer text (e.g. citations resolved).
    #[serde(default)]
    pub text: String,

    /// The generation that produced this eval, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_answer: Option<LlmAnswer>,

    /// Human-supplied score, typically `0.0` or `1.0`. Once set, this
    /// survives regeneration of the `Eval` unless explicitly cleared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human: Option<f64>,

    /// Machine-computed score (F1 in the reference Eval prompter).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<f64>,

    /// Diagnostics: `precision`, `recall`, `extra`, `missing`,
    /// `facts_in_ans`, and prompter-specific fields.
    #[serde(default)]
    pub meta: Meta,
}
