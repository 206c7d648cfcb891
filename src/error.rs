//! Error types for ragtime-rs.
//!
//! Mirrors the layered shape of the underlying stages: each stage gets its
//! own error enum, and the top-level [`Error`] wraps them via `#[from]` so
//! `?` composes cleanly across module boundaries.

use thiserror::Error;

/// Result type alias for ragtime-rs operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for ragtime-rs.
#[derive(Error, Debug)]
pub enum Error {
    /// LLM transport errors (rate limiting, network, terminal failures).
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Generator precondition or stage-level errors.
    #[error("generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Pipeline assembly errors.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Expe persistence errors.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML (de)serialization errors.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV (de)serialization errors, from bulk human-eval import.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors surfaced by an [`crate::llm::LlmDriver`].
///
/// Per the error-handling design, a transient error is retried internally
/// and never escapes as this type; only an exhausted-retries or terminal
/// failure reaches the generator, and even then the generator converts it
/// to a `None` completion rather than propagating it further.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The provider reported a rate limit after exhausting `max_retries`.
    #[error("rate limited after {attempts} attempts")]
    RateLimited {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// Any other failure during a completion call (network, auth, etc.).
    #[error("completion failed: {message}")]
    Terminal {
        /// Description of the failure.
        message: String,
    },

    /// The provider's response could not be parsed into `{full_name, text}`.
    #[error("malformed provider response: {message}")]
    MalformedResponse {
        /// Description of the malformed-response condition.
        message: String,
    },
}

/// Errors surfaced by a stage generator ([`crate::generators`]).
///
/// Precondition violations (no facts for Eval, no validated answer for
/// Facts) are deliberately *not* represented here: per the design, those
/// are skip-with-diagnostic outcomes recorded in the QA's `meta`, not
/// errors.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// A Prompter name was not found in the registry.
    #[error("unknown prompter: {name}")]
    UnknownPrompter {
        /// The requested prompter name.
        name: String,
    },

    /// An `only_llms` filter named an LLM that was not configured for the
    /// stage.
    #[error("LLM not configured for this stage: {name}")]
    UnknownLlm {
        /// The requested LLM name.
        name: String,
    },
}

/// Errors raised while wiring a pipeline from declarative configuration.
///
/// Configuration errors are the one class raised synchronously at assembly
/// time, before any stage has run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A `generate` block named a stage other than `answers`/`facts`/`evals`.
    #[error("unknown stage: {name}")]
    UnknownStage {
        /// The requested stage name.
        name: String,
    },

    /// An `export` block named a format other than `json`/`html`/`spreadsheet`.
    #[error("unknown export format: {name}")]
    UnknownExportFormat {
        /// The requested export format.
        name: String,
    },

    /// The `start_from`/`stop_after` range selected no stages.
    #[error("empty stage range: start_from={start_from}, stop_after={stop_after}")]
    EmptyStageRange {
        /// The requested start stage.
        start_from: String,
        /// The requested stop stage.
        stop_after: String,
    },

    /// The configured input file does not exist.
    #[error("input file not found: {path}")]
    InputNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A stage's `start_from` named something other than a valid [`crate::llm::Step`].
    #[error("invalid start_from step: {name}")]
    InvalidStep {
        /// The invalid step name.
        name: String,
    },
}

/// Errors raised while loading or saving an [`crate::core::Expe`].
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The Expe had zero QAs at export time.
    #[error("refusing to export an experiment with zero questions")]
    EmptyExport,

    /// A save would silently clobber an existing file and
    /// `allow_overwrite` was not set.
    #[error("refusing to overwrite existing file: {path}")]
    WouldOverwrite {
        /// The path that already exists.
        path: String,
    },

    /// The loaded JSON was neither a bare array nor `{meta, items}`.
    #[error("unrecognized Expe JSON shape")]
    UnrecognizedShape,
}

/// Errors raised while resolving a [`crate::config::RagtimeConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API key was found in explicit config or the environment.
    #[error("no API key configured (set OPENAI_API_KEY or pass one explicitly)")]
    ApiKeyMissing,

    /// A numeric environment variable failed to parse.
    #[error("invalid value for {var}: {value}")]
    InvalidEnvValue {
        /// The environment variable name.
        var: String,
        /// The value that failed to parse.
        value: String,
    },
}
