//! The `Prompter` strategy: build a [`Prompt`], then recover structured
//! fields from raw LLM text.

use crate::core::{Answer, Chunks, Eval, Facts, LlmAnswer, Prompt, Question, QA};
use crate::error::{GeneratorError, Result};

/// Inputs a Prompter may need to build a prompt, depending on stage.
///
/// Not every field is populated for every call: an Answer prompter reads
/// `question`/`chunks`; a Fact prompter reads `answer`; an Eval prompter
/// reads `answer`/`facts`.
#[derive(Debug, Clone, Default)]
pub struct PromptInputs<'a> {
    /// The question under evaluation.
    pub question: Option<&'a Question>,
    /// Retrieved context, for retrieval-aware Answer prompters.
    pub chunks: Option<&'a Chunks>,
    /// The candidate answer, for Fact and Eval prompters.
    pub answer: Option<&'a Answer>,
    /// The reference facts, for Eval prompters.
    pub facts: Option<&'a Facts>,
}

/// The object a Prompter's `post_process` mutates in place: an Answer,
/// Facts, or Eval under construction.
///
/// Modeled as a tagged variant rather than a trait object, since the three
/// payload types share no common fields beyond `text`/`meta`/`llm_answer`
/// and each stage's prompter only ever receives the variant matching its
/// stage.
#[derive(Debug)]
pub enum StageObject {
    /// Under construction by an Answer prompter.
    Answer(Answer),
    /// Under construction by a Fact prompter.
    Facts(Facts),
    /// Under construction by an Eval prompter.
    Eval(Eval),
}

impl StageObject {
    /// The generation backing this object, if one has been attached yet.
    #[must_use]
    pub fn llm_answer(&self) -> Option<&LlmAnswer> {
        match self {
            Self::Answer(a) => a.llm_answer.as_ref(),
            Self::Facts(f) => f.llm_answer.as_ref(),
            Self::Eval(e) => e.llm_answer.as_ref(),
        }
    }

    /// Attaches a generation to this object, replacing any prior one.
    pub fn set_llm_answer(&mut self, llm_answer: LlmAnswer) {
        match self {
            Self::Answer(a) => a.llm_answer = Some(llm_answer),
            Self::Facts(f) => f.llm_answer = Some(llm_answer),
            Self::Eval(e) => e.llm_answer = Some(llm_answer),
        }
    }

    /// Copies the canonical fields Prompter post-processing would have
    /// written (`text`/`items`/`auto`, plus `meta`) from `prev` onto
    /// `self`, leaving `self`'s own `llm_answer` untouched. Used when the
    /// step machine decides to reuse a prior post-process result.
    pub fn carry_canonical_from(&mut self, prev: &Self) {
        match (self, prev) {
            (Self::Answer(cur), Self::Answer(prev)) => {
                cur.text = prev.text.clone();
                cur.meta = prev.meta.clone();
            }
            (Self::Facts(cur), Self::Facts(prev)) => {
                cur.items = prev.items.clone();
                cur.meta = prev.meta.clone();
            }
            (Self::Eval(cur), Self::Eval(prev)) => {
                cur.text = prev.text.clone();
                cur.auto = prev.auto;
                cur.meta = prev.meta.clone();
            }
            _ => {}
        }
    }
}

/// A pure strategy for building prompts and recovering structure from raw
/// LLM text.
///
/// A Prompter never performs I/O and never fails: `post_process` is total,
/// recording a diagnostic in `meta` on malformed input rather than
/// returning an error.
pub trait Prompter: Send + Sync {
    /// Registry name (e.g. `"answer/base"`, `"eval"`).
    fn name(&self) -> &'static str;

    /// Builds a deterministic prompt from the given inputs.
    fn build_prompt(&self, qa: &QA, inputs: &PromptInputs<'_>) -> Prompt;

    /// Recovers structured fields from `object.llm_answer().text` into
    /// `object`'s canonical fields, never failing.
    fn post_process(&self, qa: &QA, object: &mut StageObject);
}

/// Builds a Prompter by registry name.
///
/// # Errors
///
/// Returns [`GeneratorError::UnknownPrompter`] for an unrecognized name.
pub fn create_prompter(name: &str) -> Result<Box<dyn Prompter>> {
    match name {
        "answer/base" => Ok(Box::new(super::answer_base::AnswerBasePrompter)),
        "answer/retrieval" => Ok(Box::new(super::answer_retrieval::AnswerRetrievalPrompter)),
        "fact" => Ok(Box::new(super::fact::FactPrompter)),
        "eval" => Ok(Box::new(super::eval::EvalPrompter)),
        _ => Err(GeneratorError::UnknownPrompter {
            name: name.to_string(),
        }
        .into()),
    }
}

/// Lists the registered Prompter names.
#[must_use]
pub fn available_prompters() -> Vec<&'static str> {
    vec!["answer/base", "answer/retrieval", "fact", "eval"]
}
