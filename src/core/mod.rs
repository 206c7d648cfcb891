//! Core domain models for ragtime-rs.
//!
//! This module contains the entity graph shared by every stage of the
//! pipeline: questions, chunks, facts, answers, evals, and the `Expe`
//! (experiment) record that owns them all. These are pure data structures
//! with no I/O; persistence lives in [`crate::persistence`].

pub mod answer;
pub mod chunk;
pub mod eval;
pub mod expe;
pub mod fact;
pub mod llm_answer;
pub mod prompt;
pub mod qa;
pub mod question;
pub mod stats;

pub use answer::{Answer, Answers};
pub use chunk::{Chunk, Chunks};
pub use eval::Eval;
pub use expe::Expe;
pub use fact::{Fact, Facts};
pub use llm_answer::LlmAnswer;
pub use prompt::Prompt;
pub use qa::QA;
pub use question::Question;
pub use stats::Stats;

/// Sentinel name for an `Answer` entered without a producing `LlmAnswer`
/// (e.g. typed in by hand). Such answers are always eligible for the Eval
/// stage regardless of an `only_llms` filter.
pub const UNKNOWN_LLM_NAME: &str = "unknown LLM (manual?)";

/// A free-form metadata bag attached to most entities in the data model.
///
/// Using `serde_json::Map` rather than a typed struct lets every stage
/// (and every Prompter) stash diagnostics without widening a shared type.
pub type Meta = serde_json::Map<String, serde_json::Value>;
