//! CLI command implementations.
//!
//! Contains the business logic for each CLI subcommand.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::output::{format_error, format_init_result, format_stats, format_stats_table, OutputFormat};
use crate::cli::parser::{Cli, Commands};
use crate::config::RagtimeConfig;
use crate::core::{Expe, Stats};
use crate::llm::providers::OpenAiProvider;
use crate::llm::Provider;
use crate::persistence;
use crate::pipeline::{PipelineConfig, PipelineRunner};

/// Executes the parsed CLI command, returning the text to print on success.
///
/// # Errors
///
/// Returns an error if the command fails — a malformed config, a missing
/// input file, an I/O failure, or an LLM driver failure.
pub async fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Run {
            config,
            base_url,
            api_key,
        } => cmd_run(config, base_url.as_deref(), api_key.as_deref()).await,
        Commands::Stats { path, folder } => cmd_stats(path.as_deref(), folder.as_deref(), format),
        Commands::ImportEvals { expe, csv } => cmd_import_evals(expe, csv),
        Commands::Init { directory, force } => cmd_init(directory, *force, format),
    }
}

async fn cmd_run(config_path: &Path, base_url: Option<&str>, api_key: Option<&str>) -> Result<String> {
    let text = fs::read_to_string(config_path)
        .with_context(|| format!("reading pipeline config {}", config_path.display()))?;
    let pipeline = PipelineConfig::from_toml(&text).context("parsing pipeline config")?;

    let mut builder = RagtimeConfig::builder().from_env();
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    if let Some(url) = base_url {
        builder = builder.base_url(url);
    }
    let config = builder.build().context("resolving LLM configuration")?;

    let provider: Arc<dyn Provider> = Arc::new(OpenAiProvider::new(
        &config.api_key,
        config.base_url.as_deref(),
    ));
    let runner = PipelineRunner::new(provider, config);
    let expe = runner.run(&pipeline, None).await.context("running pipeline")?;

    let stats = expe.stats();
    Ok(format!("pipeline finished\n{stats}\n"))
}

fn cmd_stats(path: Option<&Path>, folder: Option<&Path>, format: OutputFormat) -> Result<String> {
    if let Some(folder) = folder {
        return stats_for_folder(folder, format);
    }
    let path = path.context("either a file path or --folder is required")?;
    let expe = persistence::load(path).with_context(|| format!("loading {}", path.display()))?;
    Ok(format_stats(path, &expe.stats(), format))
}

fn stats_for_folder(folder: &Path, format: OutputFormat) -> Result<String> {
    let mut entries: Vec<PathBuf> = fs::read_dir(folder)
        .with_context(|| format!("reading folder {}", folder.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();

    let mut rows: Vec<(PathBuf, Stats)> = Vec::with_capacity(entries.len());
    for path in entries {
        match persistence::load(&path) {
            Ok(expe) => rows.push((path, expe.stats())),
            Err(err) => tracing::warn!(path = %path.display(), %err, "skipping unreadable Expe file"),
        }
    }
    Ok(format_stats_table(&rows, format))
}

fn cmd_import_evals(expe_path: &Path, csv_path: &Path) -> Result<String> {
    let mut expe = persistence::load(expe_path).with_context(|| format!("loading {}", expe_path.display()))?;
    let summary = persistence::csv_import::import_human_evals(&mut expe, csv_path)
        .with_context(|| format!("importing {}", csv_path.display()))?;
    let saved = persistence::save(&expe, expe_path, true).context("saving updated Expe")?;
    Ok(format!("{summary}\nsaved to {}\n", saved.display()))
}

fn cmd_init(directory: &Path, force: bool, format: OutputFormat) -> Result<String> {
    fs::create_dir_all(directory)
        .with_context(|| format!("creating directory {}", directory.display()))?;

    let questions_path = directory.join("questions.json");
    let config_path = directory.join("pipeline.toml");

    write_scaffold_file(&questions_path, SAMPLE_QUESTIONS, force)?;
    write_scaffold_file(&config_path, SAMPLE_PIPELINE_TOML, force)?;

    Ok(format_init_result(
        directory,
        &[questions_path, config_path],
        format,
    ))
}

fn write_scaffold_file(path: &Path, contents: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (pass --force to overwrite)", path.display());
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

/// Renders a top-level command failure for display.
#[must_use]
pub fn render_error(err: &anyhow::Error, format: OutputFormat) -> String {
    format_error(err, format)
}

const SAMPLE_QUESTIONS: &str = r#"[
  {
    "question": { "text": "What is retrieval-augmented generation?" }
  }
]
"#;

const SAMPLE_PIPELINE_TOML: &str = r#"input_file = "questions.json"
starting_folder = "."
retriever = "null"

[generate.answers]
llms = ["gpt-4o-mini"]
prompter = "answer/base"
save_every = 10
"#;
