//! Summary counts over an [`super::Expe`], used by the `stats` CLI
//! subcommand and by the checkpoint filename suffix.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Expe;

/// Aggregate counts over every `QA` in an experiment.
///
/// Walks every QA and tallies how much of the pipeline has already run,
/// which is exactly what a resumed run needs to decide where `start_from`
/// should begin. Coverage counts (`nb_with_chunks`, `nb_with_facts`) are
/// QAs-reached rather than flattened item totals, and `nb_models` is the
/// number of distinct producer names rather than a single QA's answer
/// count, since both read more usefully as progress indicators than as
/// raw totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Total number of questions.
    pub nb_questions: usize,
    /// Number of QAs with at least one chunk.
    pub nb_with_chunks: usize,
    /// Number of QAs with at least one fact.
    pub nb_with_facts: usize,
    /// Number of distinct model names that have produced an answer.
    pub nb_models: usize,
    /// Total number of answers across all QAs.
    pub nb_answers: usize,
    /// Number of answers carrying a human eval score.
    pub nb_human_evals: usize,
    /// Number of answers carrying an automatic eval score.
    pub nb_auto_evals: usize,
}

impl Stats {
    /// Computes stats by walking every QA in `expe`.
    #[must_use]
    pub fn from_expe(expe: &Expe) -> Self {
        let mut models = BTreeSet::new();
        let mut nb_with_chunks = 0;
        let mut nb_with_facts = 0;
        let mut nb_answers = 0;
        let mut nb_human_evals = 0;
        let mut nb_auto_evals = 0;

        for qa in &expe.qas {
            if !qa.chunks.is_empty() {
                nb_with_chunks += 1;
            }
            if !qa.facts.is_empty() {
                nb_with_facts += 1;
            }
            for answer in &qa.answers.items {
                nb_answers += 1;
                models.insert(answer.producer_name().to_string());
                if let Some(eval) = &answer.eval {
                    if eval.human.is_some() {
                        nb_human_evals += 1;
                    }
                    if eval.auto.is_some() {
                        nb_auto_evals += 1;
                    }
                }
            }
        }

        Self {
            nb_questions: expe.qas.len(),
            nb_with_chunks,
            nb_with_facts,
            nb_models: models.len(),
            nb_answers,
            nb_human_evals,
            nb_auto_evals,
        }
    }

}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "questions:    {}", self.nb_questions)?;
        writeln!(f, "with chunks:  {}", self.nb_with_chunks)?;
        writeln!(f, "with facts:   {}", self.nb_with_facts)?;
        writeln!(f, "models:       {}", self.nb_models)?;
        writeln!(f, "answers:      {}", self.nb_answers)?;
        writeln!(f, "human evals:  {}", self.nb_human_evals)?;
        write!(f, "auto evals:   {}", self.nb_auto_evals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Answer, Eval, Question, QA};

    #[test]
    fn empty_expe_is_all_zero() {
        let stats = Stats::from_expe(&Expe::default());
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn counts_answers_and_evals() {
        let mut qa = QA::from_question(Question::new("q"));
        qa.answers.items.push(Answer {
            eval: Some(Eval {
                human: Some(1.0),
                ..Eval::default()
            }),
            ..Answer::default()
        });
        qa.answers.items.push(Answer::default());

        let mut expe = Expe::default();
        expe.qas.push(qa);

        let stats = Stats::from_expe(&expe);
        assert_eq!(stats.nb_questions, 1);
        assert_eq!(stats.nb_answers, 2);
        assert_eq!(stats.nb_human_evals, 1);
        assert_eq!(stats.nb_auto_evals, 0);
    }
}
