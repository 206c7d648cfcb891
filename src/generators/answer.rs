//! Generates candidate [`Answer`]s, one per configured LLM, optionally
//! grounded by a [`Retriever`].

use async_trait::async_trait;

use crate::core::{Answer, Answers, QA};
use crate::llm::{LlmDriver, Step};
use crate::prompters::{PromptInputs, Prompter, StageObject};

use super::traits::{Retriever, StageGenerator};

/// Produces one [`Answer`] per configured LLM for each QA.
pub struct AnswerGenerator {
    retriever: Option<Box<dyn Retriever>>,
    llms: Vec<Box<dyn LlmDriver>>,
    prompter: Box<dyn Prompter>,
}

impl AnswerGenerator {
    /// Creates an Answer generator over `llms`, built with `prompter`.
    #[must_use]
    pub fn new(
        llms: Vec<Box<dyn LlmDriver>>,
        prompter: Box<dyn Prompter>,
        retriever: Option<Box<dyn Retriever>>,
    ) -> Self {
        Self {
            retriever,
            llms,
            prompter,
        }
    }

    /// Chunks step: refill `qa.chunks` from the retriever when there are
    /// none yet, or when resuming from `Step::Chunks` or earlier without
    /// `missing_only`; otherwise keep whatever is already there.
    async fn refill_chunks(&self, qa: &mut QA, start_from: Step, missing_only: bool) {
        let Some(retriever) = &self.retriever else {
            return;
        };
        let should_refill = qa.chunks.is_empty() || (!missing_only && start_from <= Step::Chunks);
        if should_refill {
            qa.chunks = retriever.retrieve(&qa.question).await;
        }
    }
}

#[async_trait]
impl StageGenerator for AnswerGenerator {
    fn stage_name(&self) -> &'static str {
        "answers"
    }

    async fn process_one(
        &self,
        mut qa: QA,
        start_from: Step,
        missing_only: bool,
        only_llms: Option<&[String]>,
    ) -> QA {
        self.refill_chunks(&mut qa, start_from, missing_only).await;

        let mut new_items = Vec::with_capacity(self.llms.len());

        for llm in &self.llms {
            let selected = only_llms.is_none_or(|names| names.iter().any(|n| n == llm.name()));
            let prev = qa.answers.find_by_name(llm.name()).cloned();

            if !selected {
                if let Some(prev) = prev {
                    new_items.push(prev);
                }
                continue;
            }

            let inputs = PromptInputs {
                question: Some(&qa.question),
                chunks: Some(&qa.chunks),
                ..PromptInputs::default()
            };
            let prev_human = prev.as_ref().and_then(|a| a.eval.as_ref()).and_then(|e| e.human);
            let prev_obj = prev.map(StageObject::Answer);

            let generated = llm
                .generate(
                    self.prompter.as_ref(),
                    StageObject::Answer(Answer::default()),
                    prev_obj.as_ref(),
                    &qa,
                    start_from,
                    missing_only,
                    &inputs,
                )
                .await;

            match generated {
                Some(StageObject::Answer(mut answer)) => {
                    if let Some(human) = prev_human {
                        let eval = answer.eval.get_or_insert_with(Default::default);
                        eval.human = Some(human);
                    }
                    new_items.push(answer);
                }
                Some(_) | None => {
                    if let Some(StageObject::Answer(prev)) = prev_obj {
                        new_items.push(prev);
                    }
                }
            }
        }

        qa.answers = Answers {
            items: new_items,
            meta: qa.answers.meta,
        };
        qa
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Chunk, LlmAnswer, Prompt, Question};
    use crate::prompters::answer_base::AnswerBasePrompter;

    struct EchoDriver {
        name: &'static str,
        response: Option<&'static str>,
    }

    #[async_trait]
    impl LlmDriver for EchoDriver {
        fn name(&self) -> &str {
            self.name
        }

        async fn complete(&self, prompt: &Prompt) -> Option<LlmAnswer> {
            self.response
                .map(|text| LlmAnswer::new(text, prompt.clone(), self.name))
        }
    }

    struct StaticRetriever;

    #[async_trait]
    impl Retriever for StaticRetriever {
        fn name(&self) -> &str {
            "static"
        }

        async fn retrieve(&self, _question: &Question) -> crate::core::Chunks {
            crate::core::Chunks {
                items: vec![Chunk::new("some text", "Doc A", 1)],
                meta: crate::core::Meta::new(),
            }
        }
    }

    fn qa() -> QA {
        QA::from_question(Question::new("2+2=?"))
    }

    #[tokio::test]
    async fn single_llm_happy_path() {
        let generator = AnswerGenerator::new(
            vec![Box::new(EchoDriver {
                name: "gpt-4o-mini",
                response: Some("4"),
            })],
            Box::new(AnswerBasePrompter),
            None,
        );
        let result = generator
            .process_one(qa(), Step::Beginning, false, None)
            .await;
        assert_eq!(result.answers.items.len(), 1);
        assert_eq!(result.answers.items[0].text, "4");
    }

    #[tokio::test]
    async fn retriever_fills_chunks_when_empty() {
        let generator = AnswerGenerator::new(
            vec![Box::new(EchoDriver {
                name: "m",
                response: Some("4"),
            })],
            Box::new(AnswerBasePrompter),
            Some(Box::new(StaticRetriever)),
        );
        let result = generator
            .process_one(qa(), Step::Beginning, false, None)
            .await;
        assert_eq!(result.chunks.len(), 1);
    }

    #[tokio::test]
    async fn only_llms_filters_but_preserves_unselected() {
        let mut seed = qa();
        seed.answers.items.push(Answer {
            llm_answer: Some(LlmAnswer::new("old", Prompt::default(), "gpt-4o")),
            text: "old".to_string(),
            ..Answer::default()
        });

        let generator = AnswerGenerator::new(
            vec![
                Box::new(EchoDriver {
                    name: "gpt-4o",
                    response: Some("new"),
                }),
                Box::new(EchoDriver {
                    name: "gpt-4o-mini",
                    response: Some("mini"),
                }),
            ],
            Box::new(AnswerBasePrompter),
            None,
        );

        let result = generator
            .process_one(
                seed,
                Step::Beginning,
                false,
                Some(&["gpt-4o-mini".to_string()]),
            )
            .await;

        assert_eq!(result.answers.items.len(), 2);
        assert_eq!(result.answers.find_by_name("gpt-4o").unwrap_or_else(|| unreachable!()).text, "old");
        assert_eq!(
            result.answers.find_by_name("gpt-4o-mini").unwrap_or_else(|| unreachable!()).text,
            "mini"
        );
    }

    #[tokio::test]
    async fn human_eval_carried_onto_regenerated_answer() {
        let mut seed = qa();
        seed.answers.items.push(Answer {
            llm_answer: Some(LlmAnswer::new("old", Prompt::default(), "m")),
            text: "old".to_string(),
            eval: Some(crate::core::Eval {
                human: Some(1.0),
                ..crate::core::Eval::default()
            }),
            ..Answer::default()
        });

        let generator = AnswerGenerator::new(
            vec![Box::new(EchoDriver {
                name: "m",
                response: Some("new"),
            })],
            Box::new(AnswerBasePrompter),
            None,
        );
        let result = generator
            .process_one(seed, Step::Beginning, false, None)
            .await;
        let answer = &result.answers.items[0];
        assert_eq!(answer.text, "new");
        assert_eq!(answer.eval.as_ref().and_then(|e| e.human), Some(1.0));
    }

    #[tokio::test]
    async fn llm_failure_preserves_prior_answer() {
        let mut seed = qa();
        seed.answers.items.push(Answer {
            llm_answer: Some(LlmAnswer::new("old", Prompt::default(), "m")),
            text: "old".to_string(),
            ..Answer::default()
        });

        let generator = AnswerGenerator::new(
            vec![Box::new(EchoDriver {
                name: "m",
                response: None,
            })],
            Box::new(AnswerBasePrompter),
            None,
        );
        let result = generator
            .process_one(seed, Step::Beginning, false, None)
            .await;
        assert_eq!(result.answers.items.len(), 1);
        assert_eq!(result.answers.items[0].text, "old");
    }
}
