//! The simplest Answer prompter: pass the LLM's raw text through verbatim.

use crate::core::{Prompt, QA};

use super::traits::{PromptInputs, Prompter, StageObject};

/// Copies `llm_answer.text` into `Answer.text` with no interpretation.
///
/// This is the baseline prompter: no retrieval grounding, no structured
/// output contract, used when a question can be answered from the model's
/// own knowledge.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerBasePrompter;

impl Prompter for AnswerBasePrompter {
    fn name(&self) -> &'static str {
        "answer/base"
    }

    fn build_prompt(&self, _qa: &QA, inputs: &PromptInputs<'_>) -> Prompt {
        let question = inputs.question.map_or("", |q| q.text.as_str());
        Prompt::new(String::new(), question.to_string())
    }

    fn post_process(&self, _qa: &QA, object: &mut StageObject) {
        let StageObject::Answer(answer) = object else {
            return;
        };
        let Some(llm_answer) = &answer.llm_answer else {
            return;
        };
        answer.text = llm_answer.text.clone();
    }
}
