//! Bulk human-annotation ingestion: applies a CSV of `{question, human_eval,
//! facts}` rows onto the matching QAs of an already-loaded [`Expe`].
//!
//! This is the CSV-shaped stand-in for spreadsheet-based human review: a
//! reviewer works from an exported spreadsheet, and the scores/facts they
//! enter come back in as CSV rather than through a rendering round-trip
//! this crate doesn't implement.

use std::path::Path;

use serde::Deserialize;

use crate::core::{Eval, Fact};
use crate::error::Result;

use super::Expe;

#[derive(Debug, Deserialize)]
struct Row {
    question: String,
    #[serde(default)]
    human_eval: Option<f64>,
    #[serde(default)]
    facts: Option<String>,
}

/// Reads `path` as a `question,human_eval,facts` CSV and applies each row
/// to the QA in `expe` whose question text matches.
///
/// `human_eval`, when present, is written onto every answer's `eval.human`
/// for that QA (creating an `Eval` if the answer has none yet). `facts`,
/// when present, is split on `;` and replaces the QA's fact list.
///
/// Rows naming a question not found in `expe` are skipped and counted in
/// the returned `skipped` total rather than treated as an error, since a
/// reviewer's export commonly lags behind the current question set.
///
/// # Errors
///
/// Returns an error if `path` cannot be read or is not valid CSV.
pub fn import_human_evals(expe: &mut Expe, path: &Path) -> Result<ImportSummary> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut applied = 0;
    let mut skipped = 0;

    for result in reader.deserialize() {
        let row: Row = result?;
        let Some(qa) = expe
            .qas
            .iter_mut()
            .find(|qa| qa.question.text == row.question)
        else {
            skipped += 1;
            continue;
        };

        if let Some(score) = row.human_eval {
            for answer in &mut qa.answers.items {
                answer.eval.get_or_insert_with(Eval::default).human = Some(score);
            }
        }

        if let Some(facts) = row.facts.as_deref() {
            qa.facts.items = facts
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Fact::new)
                .collect();
        }

        applied += 1;
    }

    Ok(ImportSummary { applied, skipped })
}

/// Outcome of a bulk CSV import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows matched to a QA and applied.
    pub applied: usize,
    /// Rows naming a question not present in the Expe.
    pub skipped: usize,
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} applied, {} skipped", self.applied, self.skipped)
    }
}
