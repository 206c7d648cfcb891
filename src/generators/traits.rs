//! The `Retriever` plug-point and the `StageGenerator` shell every stage
//! implements so the concurrency driver can fan them out uniformly.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::{Chunks, Question, QA};
use crate::llm::Step;

/// External component returning [`Chunks`] for a [`Question`].
///
/// Kept separate from the Answer generator so a run with no retrieval
/// (plain Q&A, no grounding) simply configures none.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retriever name, used only for diagnostics/`meta`.
    fn name(&self) -> &str;

    /// Returns the context chunks for `question`.
    async fn retrieve(&self, question: &Question) -> Chunks;
}

/// One stage's per-item unit of work, driven by the concurrency fan-out in
/// [`crate::concurrency`].
///
/// Takes `qa` by value and returns it mutated: tasks only ever touch their
/// own QA, so ownership rather than a shared reference is the natural
/// shape for spawning one task per QA.
#[async_trait]
pub trait StageGenerator: Send + Sync {
    /// Stage name (`"answers"`, `"facts"`, or `"evals"`), used in log lines
    /// and checkpoint diagnostics.
    fn stage_name(&self) -> &'static str;

    /// Runs this stage's logic for one QA.
    async fn process_one(
        &self,
        qa: QA,
        start_from: Step,
        missing_only: bool,
        only_llms: Option<&[String]>,
    ) -> QA;
}

/// A [`Retriever`] that never returns any chunks.
///
/// The right choice for plain Q&A pipelines with no grounding, and for
/// pipelines whose Expe already has chunks attached from a prior run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRetriever;

#[async_trait]
impl Retriever for NullRetriever {
    fn name(&self) -> &str {
        "null"
    }

    async fn retrieve(&self, _question: &Question) -> Chunks {
        Chunks::default()
    }
}

/// A [`Retriever`] backed by a fixed lookup table from question text to
/// chunks, for demos and tests that don't need a real retrieval backend.
#[derive(Debug, Clone, Default)]
pub struct StaticRetriever {
    by_question_text: HashMap<String, Chunks>,
}

impl StaticRetriever {
    /// Builds a retriever over a fixed `question text -> chunks` table.
    #[must_use]
    pub fn new(by_question_text: HashMap<String, Chunks>) -> Self {
        Self { by_question_text }
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    fn name(&self) -> &str {
        "static"
    }

    async fn retrieve(&self, question: &Question) -> Chunks {
        self.by_question_text
            .get(&question.text)
            .cloned()
            .unwrap_or_default()
    }
}
