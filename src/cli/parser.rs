//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ragtime: a RAG evaluation pipeline runner.
#[derive(Parser, Debug)]
#[command(name = "ragtime")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a declarative pipeline configuration end to end.
    Run {
        /// Path to the pipeline's TOML configuration file.
        config: PathBuf,

        /// Base URL for the LLM provider (defaults to config/env resolution).
        #[arg(long)]
        base_url: Option<String>,

        /// API key for the LLM provider (defaults to config/env resolution).
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Print summary statistics for one Expe JSON file, or every file in a
    /// folder.
    Stats {
        /// Path to an Expe JSON file.
        path: Option<PathBuf>,

        /// Tabulate every `*.json` file in this folder instead.
        #[arg(long, conflicts_with = "path")]
        folder: Option<PathBuf>,
    },

    /// Bulk-apply human eval scores and reference facts from a CSV file
    /// onto an Expe, saving the result.
    ImportEvals {
        /// Path to the Expe JSON file to update.
        expe: PathBuf,

        /// Path to a `question,human_eval,facts` CSV file.
        csv: PathBuf,
    },

    /// Scaffold a starter pipeline configuration and question file.
    Init {
        /// Directory to scaffold into (created if missing).
        #[arg(default_value = ".")]
        directory: PathBuf,

        /// Overwrite files that already exist.
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn stats_rejects_path_and_folder_together() {
        let result = Cli::try_parse_from(["ragtime", "stats", "a.json", "--folder", "dir"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_parses_config_path() {
        let cli = Cli::try_parse_from(["ragtime", "run", "pipeline.toml"])
            .unwrap_or_else(|e| panic!("parse: {e}"));
        assert!(matches!(cli.command, Commands::Run { config, .. } if config == PathBuf::from("pipeline.toml")));
    }
}
