//! Prompter strategies: build a [`crate::core::Prompt`] from stage inputs,
//! then recover structured fields from raw LLM text.
//!
//! Four reference implementations are supplied, matching the data model's
//! three generated object kinds (Answer, Facts, Eval) with Answer split
//! into a plain and a retrieval-aware variant.

pub mod answer_base;
pub mod answer_retrieval;
pub mod eval;
pub mod fact;
pub mod textnorm;
pub mod traits;

pub use traits::{available_prompters, create_prompter, PromptInputs, Prompter, StageObject};
