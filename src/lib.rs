//! # ragtime-rs
//!
//! A RAG evaluation pipeline: given a set of questions, optionally retrieved
//! context, and reference answers, runs one or more LLMs through a
//! resumable Answer → Fact → Eval pipeline and persists the result as a
//! versioned `Expe` (experiment record).
//!
//! ## Modules
//!
//! - [`core`] — the domain model (`Expe`, `QA`, `Question`, `Answer`, ...).
//! - [`prompters`] — strategies that turn a `QA` into a model prompt and
//!   turn its completion back into canonical fields.
//! - [`llm`] — the `LlmDriver`/`Provider` split: retry policy and the
//!   per-item step machine versus raw transport.
//! - [`generators`] — the three stage generators (Answer/Fact/Eval) and the
//!   `Retriever` plug-point.
//! - [`concurrency`] — fans a stage generator out across every QA with
//!   periodic and failure checkpointing.
//! - [`pipeline`] — declarative configuration and the runner that wires
//!   stages together.
//! - [`persistence`] — Expe JSON load/save and the stats-in-filename
//!   checkpoint convention.
//! - [`config`] — process-wide configuration (env vars, defaults, builder).
//! - [`cli`] — the `ragtime` binary's argument parsing, dispatch, and
//!   output formatting.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod cli;
pub mod concurrency;
pub mod config;
pub mod core;
pub mod error;
pub mod generators;
pub mod llm;
pub mod persistence;
pub mod pipeline;
pub mod prompters;

pub use error::{Error, Result};

pub use core::{Answer, Answers, Chunk, Chunks, Eval, Expe, Fact, Facts, Meta, Question, Stats, QA};

pub use config::RagtimeConfig;

pub use generators::{AnswerGenerator, EvalGenerator, FactGenerator, Retriever, StageGenerator};

pub use llm::{LlmDriver, Provider, Step};

pub use pipeline::{PipelineConfig, PipelineRunner};
