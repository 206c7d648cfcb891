//! Declarative pipeline configuration: the shape a TOML document must have
//! to drive [`super::assembler::PipelineRunner`].

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, PipelineError, Result};
use crate::llm::Step;

/// One of the three generator stages, in the fixed pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StageName {
    /// Candidate answer generation.
    Answers,
    /// Reference fact extraction.
    Facts,
    /// Candidate scoring.
    Evals,
}

impl StageName {
    const ALL: [Self; 3] = [Self::Answers, Self::Facts, Self::Evals];

    fn parse(name: &str) -> Result<Self> {
        match name {
            "answers" => Ok(Self::Answers),
            "facts" => Ok(Self::Facts),
            "evals" => Ok(Self::Evals),
            other => Err(Error::Pipeline(PipelineError::UnknownStage {
                name: other.to_string(),
            })),
        }
    }

    /// The canonical stage name (`"answers"`, `"facts"`, `"evals"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Answers => "answers",
            Self::Facts => "facts",
            Self::Evals => "evals",
        }
    }
}

/// Where and under what name a rendered report should be written.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportTarget {
    /// Destination path for the rendered report.
    pub path: PathBuf,
}

/// Export formats requested for a stage's output, keyed by format name.
///
/// Only `json` is actually rendered; `html`/`spreadsheet` are accepted so a
/// config written for the original tool still parses, but requesting them
/// logs a diagnostic rather than producing a file (HTML/spreadsheet
/// rendering are external collaborators this crate does not implement).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    /// JSON export target, if requested.
    #[serde(default)]
    pub json: Option<ExportTarget>,
    /// HTML export target, if requested (unsupported; logs and skips).
    #[serde(default)]
    pub html: Option<ExportTarget>,
    /// Spreadsheet export target, if requested (unsupported; logs and skips).
    #[serde(default)]
    pub spreadsheet: Option<ExportTarget>,
}

/// One stage's configuration block under `generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    /// Model names to instantiate as drivers for this stage.
    pub llms: Vec<String>,
    /// Registered Prompter name (e.g. `"answer/retrieval"`).
    pub prompter: String,
    /// Restricts which configured LLMs actually run this pass.
    #[serde(default)]
    pub only_llms: Option<Vec<String>>,
    /// Interim checkpoint cadence; `0` disables periodic checkpointing.
    #[serde(default)]
    pub save_every: usize,
    /// Resume point within the per-item step machine.
    #[serde(default)]
    pub start_from: Option<String>,
    /// When `true`, only items missing output are reprocessed.
    #[serde(default)]
    pub missing_only: bool,
    /// Overrides the folder the canonical output is written to.
    #[serde(default)]
    pub output_folder: Option<PathBuf>,
    /// Extra report formats to render from this stage's result.
    #[serde(default)]
    pub export: Option<ExportConfig>,
}

impl StageConfig {
    /// Resolves the `start_from` field into a [`Step`], defaulting to
    /// [`Step::Beginning`].
    pub fn start_step(&self) -> Result<Step> {
        self.start_from.as_deref().map_or(Ok(Step::Beginning), |name| {
            name.parse().map_err(|_| {
                Error::Pipeline(PipelineError::InvalidStep {
                    name: name.to_string(),
                })
            })
        })
    }
}

/// The `generate` block: one optional configuration per stage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateConfig {
    /// Answer stage configuration, if this run generates answers.
    #[serde(default)]
    pub answers: Option<StageConfig>,
    /// Fact stage configuration, if this run extracts facts.
    #[serde(default)]
    pub facts: Option<StageConfig>,
    /// Eval stage configuration, if this run scores answers.
    #[serde(default)]
    pub evals: Option<StageConfig>,
}

impl GenerateConfig {
    fn get(&self, stage: StageName) -> Option<&StageConfig> {
        match stage {
            StageName::Answers => self.answers.as_ref(),
            StageName::Facts => self.facts.as_ref(),
            StageName::Evals => self.evals.as_ref(),
        }
    }
}

/// A full pipeline run: an input Expe plus a sequence of stage blocks to
/// apply to it.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Name of the questions/Expe file to load, relative to `starting_folder`.
    pub input_file: PathBuf,
    /// Folder the input file and (by default) every stage's output live in.
    pub starting_folder: PathBuf,
    /// Registered name of a built-in `Retriever` to wire into the Answer
    /// stage (see [`crate::pipeline::assembler::create_builtin_retriever`]).
    /// Production retrievers are external collaborators supplied
    /// programmatically instead, via [`super::assembler::PipelineRunner::run`]'s
    /// `retriever` parameter, which always takes precedence over this field.
    #[serde(default)]
    pub retriever: Option<String>,
    /// Per-stage generation configuration.
    pub generate: GenerateConfig,
    /// First stage to run (defaults to `answers`).
    #[serde(default)]
    pub start_from: Option<String>,
    /// Last stage to run (defaults to `evals`).
    #[serde(default)]
    pub stop_after: Option<String>,
}

impl PipelineConfig {
    /// Parses a pipeline configuration from a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Resolves the ordered, non-empty sub-range of `[answers, facts,
    /// evals]` this run selects, paired with each selected stage's config
    /// block (stages with no `generate` block configured are skipped).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyStageRange`] if the resolved range
    /// selects no stage with a configuration block.
    pub fn selected_stages(&self) -> Result<Vec<(StageName, &StageConfig)>> {
        let start = self
            .start_from
            .as_deref()
            .map_or(Ok(StageName::Answers), StageName::parse)?;
        let stop = self
            .stop_after
            .as_deref()
            .map_or(Ok(StageName::Evals), StageName::parse)?;

        let selected: Vec<_> = StageName::ALL
            .into_iter()
            .filter(|stage| *stage >= start && *stage <= stop)
            .filter_map(|stage| self.generate.get(stage).map(|conf| (stage, conf)))
            .collect();

        if selected.is_empty() {
            return Err(Error::Pipeline(PipelineError::EmptyStageRange {
                start_from: start.as_str().to_string(),
                stop_after: stop.as_str().to_string(),
            }));
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        input_file = "questions.json"
        starting_folder = "demos/data"

        [generate.answers]
        llms = ["gpt-4o-mini"]
        prompter = "answer/base"
    "#;

    #[test]
    fn parses_minimal_config() {
        let config = PipelineConfig::from_toml(MINIMAL).unwrap_or_else(|e| panic!("parse: {e}"));
        assert_eq!(config.input_file, PathBuf::from("questions.json"));
        let stages = config
            .selected_stages()
            .unwrap_or_else(|e| panic!("stages: {e}"));
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].0, StageName::Answers);
    }

    #[test]
    fn start_from_and_stop_after_narrow_the_range() {
        let text = format!(
            "start_from = \"facts\"\nstop_after = \"facts\"\n\n{MINIMAL}\n[generate.facts]\nllms = [\"judge\"]\nprompter = \"fact\"\n"
        );
        let config = PipelineConfig::from_toml(&text).unwrap_or_else(|e| panic!("parse: {e}"));
        let stages = config
            .selected_stages()
            .unwrap_or_else(|e| panic!("stages: {e}"));
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].0, StageName::Facts);
    }

    #[test]
    fn empty_range_is_an_error() {
        let text = format!("start_from = \"evals\"\nstop_after = \"evals\"\n\n{MINIMAL}");
        let config = PipelineConfig::from_toml(&text).unwrap_or_else(|e| panic!("parse: {e}"));
        assert!(config.selected_stages().is_err());
    }

    #[test]
    fn unknown_stage_name_errors() {
        let text = format!("start_from = \"bogus\"\n\n{MINIMAL}");
        let config = PipelineConfig::from_toml(&text).unwrap_or_else(|e| panic!("parse: {e}"));
        assert!(config.selected_stages().is_err());
    }

    #[test]
    fn stage_config_resolves_start_step() {
        let config = PipelineConfig::from_toml(MINIMAL).unwrap_or_else(|e| panic!("parse: {e}"));
        let answers = config
            .generate
            .answers
            .as_ref()
            .unwrap_or_else(|| unreachable!());
        assert_eq!(
            answers.start_step().unwrap_or_else(|e| panic!("step: {e}")),
            Step::Beginning
        );
    }
}
