//! The Eval prompter: annotate a candidate answer with cited fact numbers
//! and score it against the reference facts.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::{Meta, Prompt, QA};

use super::traits::{PromptInputs, Prompter, StageObject};

const SYSTEM_PROMPT: &str = "You will be given a candidate answer and a numbered list of \
reference facts. Reproduce the candidate answer, annotating each passage that is supported by \
a reference fact with that fact's number in parentheses, e.g. \"Paris is the capital (1)\". \
Annotate any passage that makes a claim not supported by any reference fact with \"(?)\" \
instead. Reply with only the annotated answer.";

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\((\d+)\)").unwrap()
});

static UNSUPPORTED: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\(\?\)").unwrap()
});

/// Scores a candidate answer against reference facts by parsing citation
/// markers out of the model's annotated reproduction.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalPrompter;

impl Prompter for EvalPrompter {
    fn name(&self) -> &'static str {
        "eval"
    }

    fn build_prompt(&self, _qa: &QA, inputs: &PromptInputs<'_>) -> Prompt {
        let answer = inputs.answer.map_or("", |a| a.text.as_str());
        let facts = inputs.facts.map_or_else(String::new, |facts| {
            facts
                .items
                .iter()
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        });
        let user = format!("Candidate answer:\n{answer}\n\nReference facts:\n{facts}");
        Prompt::new(SYSTEM_PROMPT.to_string(), user)
    }

    fn post_process(&self, qa: &QA, object: &mut StageObject) {
        let StageObject::Eval(eval) = object else {
            return;
        };
        let Some(llm_answer) = &eval.llm_answer else {
            return;
        };
        let annotated = llm_answer.text.clone();
        eval.text = annotated.clone();

        let cited: BTreeSet<usize> = CITATION
            .captures_iter(&annotated)
            .filter_map(|c| c.get(1)?.as_str().parse().ok())
            .collect();
        let true_facts = qa.facts.numbers();
        let extra = UNSUPPORTED.find_iter(&annotated).count();

        let (precision, recall, auto, missing, _tp) = score(&cited, &true_facts, extra);

        eval.auto = Some(auto);
        let mut meta = Meta::new();
        meta.insert("precision".to_string(), precision.into());
        meta.insert("recall".to_string(), recall.into());
        meta.insert("extra".to_string(), extra.into());
        meta.insert(
            "missing".to_string(),
            serde_json::Value::Array(missing.into_iter().map(|n| (n as i64).into()).collect()),
        );
        meta.insert(
            "facts_in_ans".to_string(),
            serde_json::Value::Array(cited.iter().map(|&n| (n as i64).into()).collect()),
        );
        eval.meta = meta;
    }
}

/// Computes `(precision, recall, auto, missing, tp)` per the Eval-arithmetic
/// invariant: `tp = |A ∩ T|`, `precision = tp / (|A| + extra)`,
/// `recall = tp / |T|`, `auto = 2·p·r / (p + r)`, all with `0/0 ⇒ 0`.
fn score(
    cited: &BTreeSet<usize>,
    true_facts: &BTreeSet<usize>,
    extra: usize,
) -> (f64, f64, f64, Vec<usize>, usize) {
    let tp = cited.intersection(true_facts).count();
    let missing: Vec<usize> = true_facts.difference(cited).copied().collect();

    let precision = div0(tp as f64, (cited.len() + extra) as f64);
    let recall = div0(tp as f64, true_facts.len() as f64);
    let auto = div0(2.0 * precision * recall, precision + recall);

    (precision, recall, auto, missing, tp)
}

/// Division that maps `0 / 0` to `0` instead of `NaN`.
fn div0(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
