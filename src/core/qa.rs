//! One row of the experiment: a question plus everything derived from it.

use serde::{Deserialize, Serialize};

use super::{Answers, Chunks, Facts, Meta, Question};

/// One question and its associated chunks, facts, and answers.
///
/// A `QA` is born from the input questions file with only `question`
/// filled; `chunks`/`facts`/`answers` are populated by stages under the
/// step-machine rules in [`crate::llm::traits`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QA {
    /// The question this row answers.
    pub question: Question,

    /// Retrieved context, if any.
    #[serde(default)]
    pub chunks: Chunks,

    /// Facts extracted from the human-validated reference answer.
    #[serde(default)]
    pub facts: Facts,

    /// Candidate answers, one per configured LLM.
    #[serde(default)]
    pub answers: Answers,

    /// Free-form metadata for this row.
    #[serde(default)]
    pub meta: Meta,
}

impl QA {
    /// Creates a QA from a bare question, with everything else empty.
    #[must_use]
    pub fn from_question(question: Question) -> Self {
        Self {
            question,
            ..Self::default()
        }
    }

    /// The first answer whose human eval score is `1.0`, used as the
    /// Fact-stage precondition.
    #[must_use]
    pub fn first_human_validated_answer(&self) -> Option<&super::Answer> {
        self.answers.items.iter().find(|a| {
            a.eval
                .as_ref()
                .and_then(|e| e.human)
                .is_some_and(|h| (h - 1.0).abs() < f64::EPSILON)
        })
    }
}
