//! The three stage generators (Answer / Fact / Eval) built on the
//! `LlmDriver::generate` step machine, plus the `Retriever` plug-point.

pub mod answer;
pub mod eval;
pub mod fact;
pub mod traits;

pub use answer::AnswerGenerator;
pub use eval::EvalGenerator;
pub use fact::FactGenerator;
pub use traits::{NullRetriever, Retriever, StageGenerator, StaticRetriever};
