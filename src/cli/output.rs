//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::Stats;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string, defaulting to [`Self::Text`] on anything
    /// unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a single file's stats.
#[must_use]
pub fn format_stats(path: &Path, stats: &Stats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{}\n{stats}\n", path.display()),
        OutputFormat::Json => format_json(&StatsRow {
            path: path.to_path_buf(),
            stats: *stats,
        }),
    }
}

/// Formats one stats row per file in a folder-wide tabulation.
#[must_use]
pub fn format_stats_table(rows: &[(PathBuf, Stats)], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_stats_table_text(rows),
        OutputFormat::Json => {
            let rows: Vec<_> = rows
                .iter()
                .map(|(path, stats)| StatsRow {
                    path: path.clone(),
                    stats: *stats,
                })
                .collect();
            format_json(&rows)
        }
    }
}

fn format_stats_table_text(rows: &[(PathBuf, Stats)]) -> String {
    if rows.is_empty() {
        return "No Expe files found.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<40} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5}",
        "file", "Q", "C", "F", "M", "A", "HE", "AE"
    );
    output.push_str(&"-".repeat(85));
    output.push('\n');

    for (path, stats) in rows {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
        let _ = writeln!(
            output,
            "{:<40} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5}",
            truncate(&name, 40),
            stats.nb_questions,
            stats.nb_with_chunks,
            stats.nb_with_facts,
            stats.nb_models,
            stats.nb_answers,
            stats.nb_human_evals,
            stats.nb_auto_evals
        );
    }
    output
}

/// Formats a scaffold confirmation message.
#[must_use]
pub fn format_init_result(directory: &Path, files: &[PathBuf], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = format!("Scaffolded pipeline in {}:\n", directory.display());
            for file in files {
                let _ = writeln!(output, "  {}", file.display());
            }
            output
        }
        OutputFormat::Json => format_json(&files),
    }
}

/// Renders a top-level command error for display, honoring `format`.
#[must_use]
pub fn format_error(err: &anyhow::Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => err.to_string(),
        OutputFormat::Json => format_json(&ErrorPayload {
            error: err.to_string(),
        }),
    }
}

#[derive(Serialize)]
struct StatsRow {
    path: PathBuf,
    #[serde(flatten)]
    stats: Stats,
}

#[derive(Serialize)]
struct ErrorPayload {
    error: String,
}

fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}
