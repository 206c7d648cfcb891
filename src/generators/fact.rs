//! Extracts atomic [`Fact`](crate::core::Fact)s from a QA's
//! human-validated reference answer.

use async_trait::async_trait;
use tracing::debug;

use crate::core::{Facts, QA};
use crate::llm::{LlmDriver, Step};
use crate::prompters::{PromptInputs, Prompter, StageObject};

use super::traits::StageGenerator;

/// Generates the reference [`Facts`] for a QA from its first
/// human-validated answer.
///
/// Only one LLM ever runs per QA here — facts describe the gold answer,
/// not any one candidate model — so only the first configured driver is
/// used; additional entries in `llms` are accepted for configuration
/// uniformity with the other stages but otherwise ignored.
pub struct FactGenerator {
    llms: Vec<Box<dyn LlmDriver>>,
    prompter: Box<dyn Prompter>,
}

impl FactGenerator {
    /// Creates a Fact generator. `llms` should normally hold exactly one
    /// driver; only the first is used.
    #[must_use]
    pub fn new(llms: Vec<Box<dyn LlmDriver>>, prompter: Box<dyn Prompter>) -> Self {
        Self { llms, prompter }
    }
}

#[async_trait]
impl StageGenerator for FactGenerator {
    fn stage_name(&self) -> &'static str {
        "facts"
    }

    async fn process_one(
        &self,
        mut qa: QA,
        start_from: Step,
        missing_only: bool,
        _only_llms: Option<&[String]>,
    ) -> QA {
        let Some(answer) = qa.first_human_validated_answer().cloned() else {
            debug!(question = %qa.question.text, "no human-validated answer; skipping fact extraction");
            return qa;
        };
        let Some(llm) = self.llms.first() else {
            debug!("no LLM configured for fact extraction; skipping");
            return qa;
        };

        let inputs = PromptInputs {
            question: Some(&qa.question),
            answer: Some(&answer),
            ..PromptInputs::default()
        };
        let prev = StageObject::Facts(qa.facts.clone());

        let generated = llm
            .generate(
                self.prompter.as_ref(),
                StageObject::Facts(Facts::default()),
                Some(&prev),
                &qa,
                start_from,
                missing_only,
                &inputs,
            )
            .await;

        if let Some(StageObject::Facts(facts)) = generated {
            qa.facts = facts;
        }
        qa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Answer, Eval, LlmAnswer, Prompt, Question};
    use crate::prompters::fact::FactPrompter;
    use async_trait::async_trait;

    struct EchoDriver {
        response: Option<&'static str>,
    }

    #[async_trait]
    impl LlmDriver for EchoDriver {
        fn name(&self) -> &str {
            "fact-model"
        }

        async fn complete(&self, prompt: &Prompt) -> Option<LlmAnswer> {
            self.response
                .map(|text| LlmAnswer::new(text, prompt.clone(), "fact-model"))
        }
    }

    fn validated_qa() -> QA {
        let mut qa = QA::from_question(Question::new("what is the capital of France?"));
        qa.answers.items.push(Answer {
            text: "Paris is the capital".to_string(),
            eval: Some(Eval {
                human: Some(1.0),
                ..Eval::default()
            }),
            ..Answer::default()
        });
        qa
    }

    #[tokio::test]
    async fn extracts_facts_from_validated_answer() {
        let generator = FactGenerator::new(
            vec![Box::new(EchoDriver {
                response: Some("Paris is the capital of France"),
            })],
            Box::new(FactPrompter),
        );
        let result = generator
            .process_one(validated_qa(), Step::Beginning, false, None)
            .await;
        assert_eq!(result.facts.items.len(), 1);
        assert_eq!(result.facts.items[0].text, "1. Paris is the capital of France");
    }

    #[tokio::test]
    async fn skips_without_validated_answer() {
        let generator = FactGenerator::new(
            vec![Box::new(EchoDriver {
                response: Some("shouldn't run"),
            })],
            Box::new(FactPrompter),
        );
        let qa = QA::from_question(Question::new("q"));
        let result = generator
            .process_one(qa, Step::Beginning, false, None)
            .await;
        assert!(result.facts.is_empty());
    }
}
