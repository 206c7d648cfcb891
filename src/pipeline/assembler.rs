//! Wires stage generators from a [`PipelineConfig`] and runs them in order,
//! routing the canonical Expe path from one stage to the next.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::concurrency::{fan_out, Checkpoint};
use crate::config::RagtimeConfig;
use crate::core::Expe;
use crate::error::{Error, PipelineError, Result};
use crate::generators::{AnswerGenerator, EvalGenerator, FactGenerator, NullRetriever, Retriever, StageGenerator};
use crate::llm::{drivers_from_names, Provider};
use crate::persistence;
use crate::prompters::create_prompter;

use super::config::{PipelineConfig, StageConfig, StageName};

/// Resolves a built-in `Retriever` by the name a pipeline config may give in
/// its `retriever` field. Only `"null"` is recognized; anything else is an
/// error, since real retrievers are external collaborators supplied
/// programmatically to [`PipelineRunner::run`] instead.
pub fn create_builtin_retriever(name: &str) -> Result<Box<dyn Retriever>> {
    match name {
        "null" => Ok(Box::new(NullRetriever)),
        other => Err(Error::Pipeline(PipelineError::UnknownStage {
            name: other.to_string(),
        })),
    }
}

/// Runs a [`PipelineConfig`] end to end: loads the input Expe, applies each
/// selected stage in order, and persists the result after each stage.
pub struct PipelineRunner {
    provider: Arc<dyn Provider>,
    config: RagtimeConfig,
}

impl PipelineRunner {
    /// Creates a runner that builds every stage's LLM drivers against
    /// `provider`, applying `config`'s defaults and concurrency limit.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>, config: RagtimeConfig) -> Self {
        Self { provider, config }
    }

    /// Runs `pipeline` to completion, returning the final Expe.
    ///
    /// `retriever`, if given, is wired into the Answer stage and always
    /// takes precedence over `pipeline.retriever`'s built-in name.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] if the input file is missing, the
    /// configured stage range is empty, or a stage names an unknown
    /// Prompter/LLM/retriever; returns a [`crate::error::PersistenceError`]
    /// if the loaded Expe is malformed or a save is refused.
    pub async fn run(
        &self,
        pipeline: &PipelineConfig,
        mut retriever: Option<Box<dyn Retriever>>,
    ) -> Result<Expe> {
        let stages = pipeline.selected_stages()?;

        let input_path = pipeline.starting_folder.join(&pipeline.input_file);
        if !input_path.exists() {
            return Err(Error::Pipeline(PipelineError::InputNotFound {
                path: input_path.display().to_string(),
            }));
        }

        if retriever.is_none() {
            if let Some(name) = &pipeline.retriever {
                retriever = Some(create_builtin_retriever(name)?);
            }
        }

        let mut expe = persistence::load(&input_path)?;
        let mut current_path = input_path;

        for (stage, stage_conf) in stages {
            info!(stage = stage.as_str(), "running stage");
            let output_path = stage_conf
                .output_folder
                .clone()
                .unwrap_or_else(|| pipeline.starting_folder.clone())
                .join(&pipeline.input_file);

            self.run_stage(stage, stage_conf, &mut expe, retriever.take(), &output_path)
                .await?;

            let saved = persistence::save(&expe, &output_path, true)?;
            current_path = saved;

            self.export_reports(stage_conf, &expe)?;
        }

        info!(path = %current_path.display(), "pipeline finished");
        Ok(expe)
    }

    async fn run_stage(
        &self,
        stage: StageName,
        stage_conf: &StageConfig,
        expe: &mut Expe,
        retriever: Option<Box<dyn Retriever>>,
        output_path: &PathBuf,
    ) -> Result<()> {
        let prompter = create_prompter(&stage_conf.prompter)?;
        let llms = drivers_from_names(&stage_conf.llms, &self.provider, &self.config);

        let generator: Arc<dyn StageGenerator> = match stage {
            StageName::Answers => Arc::new(AnswerGenerator::new(llms, prompter, retriever)),
            StageName::Facts => Arc::new(FactGenerator::new(llms, prompter)),
            StageName::Evals => Arc::new(EvalGenerator::new(llms, prompter)),
        };

        let start_from = stage_conf.start_step()?;
        let only_llms = stage_conf
            .only_llms
            .clone()
            .map(|names| Arc::from(names.into_boxed_slice()));
        let output_path = output_path.clone();

        fan_out(
            generator,
            expe,
            start_from,
            stage_conf.missing_only,
            only_llms,
            self.config.max_concurrent_qas,
            stage_conf.save_every,
            |snapshot, checkpoint| {
                let result = match checkpoint {
                    Checkpoint::Periodic => persistence::save(snapshot, &output_path, true),
                    Checkpoint::Failure { index, total } => {
                        persistence::save_failure_checkpoint(snapshot, &output_path, index, total, true)
                    }
                };
                if let Err(err) = result {
                    warn!(%err, "checkpoint save failed");
                }
            },
        )
        .await;

        Ok(())
    }

    fn export_reports(&self, stage_conf: &StageConfig, expe: &Expe) -> Result<()> {
        let Some(export) = &stage_conf.export else {
            return Ok(());
        };
        if let Some(target) = &export.json {
            persistence::save(expe, &target.path, true)?;
        }
        if export.html.is_some() {
            warn!("HTML export requested but not implemented; skipping");
        }
        if export.spreadsheet.is_some() {
            warn!("spreadsheet export requested but not implemented; skipping");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::{ProviderError, ProviderResponse};
    use async_trait::async_trait;
    use std::fs;
    use tempfile::tempdir;

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn complete(
            &self,
            _model: &str,
            _system: &str,
            user: &str,
            _temperature: f32,
            _max_tokens: Option<u32>,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                full_name: "echo-v1".to_string(),
                text: format!("echo: {user}"),
                duration: Some(0.01),
                cost: Some(0.0),
            })
        }
    }

    fn runner() -> PipelineRunner {
        let config = RagtimeConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|e| panic!("config: {e}"));
        PipelineRunner::new(Arc::new(EchoProvider), config)
    }

    #[tokio::test]
    async fn runs_answers_stage_and_saves_canonical_output() {
        let dir = tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        fs::write(
            dir.path().join("questions.json"),
            r#"[{"question":{"text":"what is rust"}}]"#,
        )
        .unwrap_or_else(|e| panic!("write: {e}"));

        let text = format!(
            r#"
                input_file = "questions.json"
                starting_folder = "{}"

                [generate.answers]
                llms = ["gpt-4o-mini"]
                prompter = "answer/base"
            "#,
            dir.path().display()
        );
        let pipeline = PipelineConfig::from_toml(&text).unwrap_or_else(|e| panic!("parse: {e}"));

        let expe = runner()
            .run(&pipeline, None)
            .await
            .unwrap_or_else(|e| panic!("run: {e}"));
        assert_eq!(expe.qas.len(), 1);
        assert_eq!(expe.qas[0].answers.items[0].text, "echo: what is rust");
    }

    #[tokio::test]
    async fn missing_input_file_is_an_error() {
        let dir = tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let text = format!(
            r#"
                input_file = "missing.json"
                starting_folder = "{}"

                [generate.answers]
                llms = ["m"]
                prompter = "answer/base"
            "#,
            dir.path().display()
        );
        let pipeline = PipelineConfig::from_toml(&text).unwrap_or_else(|e| panic!("parse: {e}"));
        let result = runner().run(&pipeline, None).await;
        assert!(matches!(
            result,
            Err(Error::Pipeline(PipelineError::InputNotFound { .. }))
        ));
    }
}
