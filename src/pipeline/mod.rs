//! Declarative pipeline assembly: turns a [`config::PipelineConfig`] into a
//! running sequence of stage generators via [`assembler::PipelineRunner`].

pub mod assembler;
pub mod config;

pub use assembler::{create_builtin_retriever, PipelineRunner};
pub use config::{ExportConfig, ExportTarget, GenerateConfig, PipelineConfig, StageConfig, StageName};
