//! The `LlmDriver` contract and the per-item step machine shared by every
//! stage generator.

use async_trait::async_trait;

use crate::core::{LlmAnswer, Prompt, QA};
use crate::prompters::{PromptInputs, Prompter, StageObject};

/// A step in the per-item resumable pipeline, ordered `Beginning < Chunks
/// < Prompt < Llm < PostProcess`.
///
/// `Beginning` and `Chunks` are placeholders the Answer stage consults
/// directly (chunk retrieval happens outside [`LlmDriver::generate`]);
/// `Prompt`, `Llm`, and `PostProcess` are the three steps `generate` itself
/// drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Nothing has been computed yet.
    Beginning,
    /// Retrieval of context chunks (Answer stage only).
    Chunks,
    /// Prompt construction.
    Prompt,
    /// The LLM completion call.
    Llm,
    /// Prompter post-processing into canonical fields.
    PostProcess,
}

impl std::str::FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginning" => Ok(Self::Beginning),
            "chunks" => Ok(Self::Chunks),
            "prompt" => Ok(Self::Prompt),
            "llm" => Ok(Self::Llm),
            "post_process" => Ok(Self::PostProcess),
            other => Err(format!("unknown step: {other}")),
        }
    }
}

/// A uniform wrapper around a named text-completion model.
///
/// Implementations own retry/backoff policy for their transport; callers
/// only see `complete` returning `None` for "give up on this item".
#[async_trait]
pub trait LlmDriver: Send + Sync {
    /// Short configured model name (e.g. `"gpt-4o-mini"`), used for
    /// `only_llms` filtering and Answer/Eval identity matching.
    fn name(&self) -> &str;

    /// Issues one completion call.
    ///
    /// Returns `None` on any failure (rate limit exhausted, network error,
    /// malformed provider response) — a terminal model error never
    /// propagates past the driver.
    async fn complete(&self, prompt: &Prompt) -> Option<LlmAnswer>;

    /// Runs the three-step `Prompt -> Llm -> PostProcess` machine for one
    /// item, reusing prior outputs per `start_from`/`missing_only`.
    ///
    /// `cur` should be a freshly constructed, empty [`StageObject`] of the
    /// stage's kind (`Answer::default()`, etc.); `prev` is the
    /// previously-generated object of the same kind, if one exists. Returns
    /// `None` if the LLM step needed to run and failed.
    async fn generate(
        &self,
        prompter: &dyn Prompter,
        mut cur: StageObject,
        prev: Option<&StageObject>,
        qa: &QA,
        start_from: Step,
        missing_only: bool,
        inputs: &PromptInputs<'_>,
    ) -> Option<StageObject> {
        let has_prior_llm_answer = prev.and_then(StageObject::llm_answer).is_some();
        let reuse =
            |step: Step, has_prior: bool| has_prior && (missing_only || start_from > step);

        let prompt = if reuse(Step::Prompt, has_prior_llm_answer) {
            prev.and_then(StageObject::llm_answer)?.prompt.clone()
        } else {
            prompter.build_prompt(qa, inputs)
        };

        if reuse(Step::Llm, has_prior_llm_answer) {
            cur.set_llm_answer(prev.and_then(StageObject::llm_answer)?.clone());
        } else {
            let llm_answer = self.complete(&prompt).await?;
            cur.set_llm_answer(llm_answer);
        }

        if reuse(Step::PostProcess, prev.is_some()) {
            if let Some(prev) = prev {
                cur.carry_canonical_from(prev);
            }
        } else {
            prompter.post_process(qa, &mut cur);
        }

        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_ordering_matches_spec() {
        assert!(Step::Beginning < Step::Chunks);
        assert!(Step::Chunks < Step::Prompt);
        assert!(Step::Prompt < Step::Llm);
        assert!(Step::Llm < Step::PostProcess);
    }

    #[test]
    fn step_parses_from_configured_names() {
        assert_eq!("chunks".parse::<Step>(), Ok(Step::Chunks));
        assert_eq!("post_process".parse::<Step>(), Ok(Step::PostProcess));
        assert!("bogus".parse::<Step>().is_err());
    }

    struct EchoDriver {
        response: Option<&'static str>,
    }

    #[async_trait]
    impl LlmDriver for EchoDriver {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &Prompt) -> Option<LlmAnswer> {
            self.response
                .map(|text| LlmAnswer::new(text, prompt.clone(), "echo"))
        }
    }

    fn qa() -> QA {
        QA::from_question(crate::core::Question::new("2+2=?"))
    }

    #[tokio::test]
    async fn start_from_beginning_always_recomputes() {
        let driver = EchoDriver {
            response: Some("4"),
        };
        let prompter = crate::prompters::answer_base::AnswerBasePrompter;
        let qa = qa();
        let inputs = PromptInputs {
            question: Some(&qa.question),
            ..PromptInputs::default()
        };
        let result = driver
            .generate(
                &prompter,
                StageObject::Answer(crate::core::Answer::default()),
                None,
                &qa,
                Step::Beginning,
                false,
                &inputs,
            )
            .await
            .unwrap_or_else(|| unreachable!());
        let StageObject::Answer(answer) = result else {
            unreachable!()
        };
        assert_eq!(answer.text, "4");
    }

    #[tokio::test]
    async fn missing_only_reuses_prior_result_without_calling_llm() {
        let driver = EchoDriver { response: None };
        let prompter = crate::prompters::answer_base::AnswerBasePrompter;
        let qa = qa();
        let inputs = PromptInputs {
            question: Some(&qa.question),
            ..PromptInputs::default()
        };
        let prev = StageObject::Answer(crate::core::Answer {
            text: "4".to_string(),
            llm_answer: Some(LlmAnswer::new("4", Prompt::default(), "echo")),
            ..crate::core::Answer::default()
        });
        let result = driver
            .generate(
                &prompter,
                StageObject::Answer(crate::core::Answer::default()),
                Some(&prev),
                &qa,
                Step::Beginning,
                true,
                &inputs,
            )
            .await
            .unwrap_or_else(|| unreachable!());
        let StageObject::Answer(answer) = result else {
            unreachable!()
        };
        assert_eq!(answer.text, "4");
    }

    #[tokio::test]
    async fn llm_failure_aborts_and_returns_none() {
        let driver = EchoDriver { response: None };
        let prompter = crate::prompters::answer_base::AnswerBasePrompter;
        let qa = qa();
        let inputs = PromptInputs {
            question: Some(&qa.question),
            ..PromptInputs::default()
        };
        let result = driver
            .generate(
                &prompter,
                StageObject::Answer(crate::core::Answer::default()),
                None,
                &qa,
                Step::Beginning,
                false,
                &inputs,
            )
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn start_from_llm_reuses_prompt_but_recomputes_llm() {
        let driver = EchoDriver {
            response: Some("5"),
        };
        let prompter = crate::prompters::answer_base::AnswerBasePrompter;
        let qa = qa();
        let inputs = PromptInputs {
            question: Some(&qa.question),
            ..PromptInputs::default()
        };
        let prev = StageObject::Answer(crate::core::Answer {
            text: "4".to_string(),
            llm_answer: Some(LlmAnswer::new("4", Prompt::new("", "2+2=?"), "echo")),
            ..crate::core::Answer::default()
        });
        let result = driver
            .generate(
                &prompter,
                StageObject::Answer(crate::core::Answer::default()),
                Some(&prev),
                &qa,
                Step::Llm,
                false,
                &inputs,
            )
            .await
            .unwrap_or_else(|| unreachable!());
        let StageObject::Answer(answer) = result else {
            unreachable!()
        };
        assert_eq!(answer.text, "5");
    }
}
