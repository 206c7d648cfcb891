//! Scores each candidate [`Answer`](crate::core::Answer) against a QA's
//! [`Facts`](crate::core::Facts) by generating an [`Eval`](crate::core::Eval).

use async_trait::async_trait;
use tracing::debug;

use crate::core::{Eval, QA, UNKNOWN_LLM_NAME};
use crate::llm::{LlmDriver, Step};
use crate::prompters::{PromptInputs, Prompter, StageObject};

use super::traits::StageGenerator;

/// Generates an [`Eval`] for every eligible [`Answer`](crate::core::Answer)
/// in a QA, using a single configured judge LLM.
pub struct EvalGenerator {
    llms: Vec<Box<dyn LlmDriver>>,
    prompter: Box<dyn Prompter>,
}

impl EvalGenerator {
    /// Creates an Eval generator. `llms` should normally hold exactly one
    /// judge driver; only the first is used.
    #[must_use]
    pub fn new(llms: Vec<Box<dyn LlmDriver>>, prompter: Box<dyn Prompter>) -> Self {
        Self { llms, prompter }
    }
}

#[async_trait]
impl StageGenerator for EvalGenerator {
    fn stage_name(&self) -> &'static str {
        "evals"
    }

    async fn process_one(
        &self,
        mut qa: QA,
        start_from: Step,
        missing_only: bool,
        only_llms: Option<&[String]>,
    ) -> QA {
        if qa.answers.is_empty() || qa.facts.is_empty() {
            debug!(question = %qa.question.text, "no answers or facts yet; skipping eval");
            return qa;
        }
        let Some(llm) = self.llms.first() else {
            debug!("no judge LLM configured for eval; skipping");
            return qa;
        };

        for index in 0..qa.answers.items.len() {
            let answer = qa.answers.items[index].clone();
            if answer.text.is_empty() {
                continue;
            }
            // Anonymous answers (no producing LLM recorded) are always
            // eligible, regardless of `only_llms` — an Open Question this
            // spec resolves in favor of always evaluating them.
            let is_anonymous = answer.producer_name() == UNKNOWN_LLM_NAME;
            let selected =
                is_anonymous || only_llms.is_none_or(|names| names.iter().any(|n| n == answer.producer_name()));
            if !selected {
                continue;
            }

            let facts = qa.facts.clone();
            let inputs = PromptInputs {
                question: Some(&qa.question),
                answer: Some(&answer),
                facts: Some(&facts),
                ..PromptInputs::default()
            };
            let prior_human = answer.eval.as_ref().and_then(|e| e.human);
            let prev = answer.eval.clone().unwrap_or_default();
            let prev_obj = StageObject::Eval(prev);

            let generated = llm
                .generate(
                    self.prompter.as_ref(),
                    StageObject::Eval(Eval::default()),
                    Some(&prev_obj),
                    &qa,
                    start_from,
                    missing_only,
                    &inputs,
                )
                .await;

            if let Some(StageObject::Eval(mut eval)) = generated {
                if prior_human.is_some() {
                    eval.human = prior_human;
                }
                qa.answers.items[index].eval = Some(eval);
            }
        }

        qa
    }
}
