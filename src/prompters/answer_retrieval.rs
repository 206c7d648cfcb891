//! The retrieval-aware Answer prompter: grounds the model in retrieved
//! chunks and asks for a structured JSON verdict.

use serde::Deserialize;

use crate::core::{Meta, Prompt, QA};

use super::textnorm::normalized_contains;
use super::traits::{PromptInputs, Prompter, StageObject};

const SYSTEM_PROMPT: &str = "You are answering a question using only the context passages \
provided below. Reply with a single JSON object and nothing else, of the shape \
{\"q_ok\": 0 or 1, \"chunks_ok\": 0 or 1, \"answer\": string}. \
q_ok is 1 if the question is answerable at all; chunks_ok is 1 if the passages \
contain enough information to answer it; answer is your best answer given the \
passages, citing the source title and page where relevant.";

/// Embeds retrieved chunks and asks the model for a JSON-shaped answer,
/// recovering `{q_ok, chunks_ok, answer}` from (possibly malformed) JSON
/// text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerRetrievalPrompter;

#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(default)]
    q_ok: i64,
    #[serde(default)]
    chunks_ok: i64,
    #[serde(default)]
    answer: String,
}

impl Prompter for AnswerRetrievalPrompter {
    fn name(&self) -> &'static str {
        "answer/retrieval"
    }

    fn build_prompt(&self, _qa: &QA, inputs: &PromptInputs<'_>) -> Prompt {
        let question = inputs.question.map_or("", |q| q.text.as_str());
        let context = inputs.chunks.map_or_else(String::new, |chunks| {
            chunks
                .items
                .iter()
                .map(|chunk| {
                    let title = chunk.display_name().unwrap_or("untitled");
                    let page = chunk.page_number().map_or_else(String::new, |p| format!(" (p. {p})"));
                    format!("- {title}{page}\n{}", chunk.text)
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        });
        let user = format!("Question: {question}\n\nContext:\n{context}");
        Prompt::new(SYSTEM_PROMPT.to_string(), user)
    }

    fn post_process(&self, qa: &QA, object: &mut StageObject) {
        let StageObject::Answer(answer) = object else {
            return;
        };
        let Some(llm_answer) = &answer.llm_answer else {
            return;
        };
        let raw_text = llm_answer.text.clone();

        let verdict = parse_verdict(&raw_text);
        let mut meta = Meta::new();
        match verdict {
            Some(verdict) => {
                meta.insert("json_ok".to_string(), true.into());
                meta.insert("question_ok".to_string(), (verdict.q_ok != 0).into());
                meta.insert("chunks_ok".to_string(), (verdict.chunks_ok != 0).into());
                answer.text = verdict.answer;
            }
            None => {
                meta.insert("json_ok".to_string(), false.into());
                answer.text = raw_text.clone();
            }
        }

        if let Some(lang) = detect_language(&answer.text) {
            meta.insert("lang".to_string(), lang.into());
        } else {
            meta.insert("lang".to_string(), serde_json::Value::Null);
        }

        let (docs_in_ans, docs_and_page_in_ans) = chunk_references_in_answer(&answer.text, &qa.chunks);
        meta.insert(
            "docs_in_ans".to_string(),
            serde_json::Value::Array(docs_in_ans.into_iter().map(serde_json::Value::String).collect()),
        );
        meta.insert(
            "docs_and_page_in_ans".to_string(),
            serde_json::Value::Array(
                docs_and_page_in_ans.into_iter().map(serde_json::Value::String).collect(),
            ),
        );

        answer.meta = meta;
    }
}

/// Strict JSON parse, then one repair pass: extract the outermost `{…}`
/// substring, strip newlines and backslash escapes the model sometimes
/// emits around the `answer` field, then retry.
fn parse_verdict(raw: &str) -> Option<RawVerdict> {
    if let Ok(verdict) = serde_json::from_str::<RawVerdict>(raw) {
        return Some(verdict);
    }

    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    let candidate = &raw[start..=end];

    if let Ok(verdict) = serde_json::from_str::<RawVerdict>(candidate) {
        return Some(verdict);
    }

    let repaired = candidate.replace('\n', " ").replace('\\', "");
    serde_json::from_str::<RawVerdict>(&repaired).ok()
}

/// Best-effort language detection. Returns `None` for text too short or
/// too ambiguous to classify confidently.
fn detect_language(text: &str) -> Option<String> {
    whatlang::detect(text).map(|info| info.lang().code().to_string())
}

/// Computes which normalized chunk titles, and title+page combinations,
/// appear in `answer_text`. Exposed standalone so it stays independently
/// testable from `post_process`.
#[must_use]
pub fn chunk_references_in_answer(
    answer_text: &str,
    chunks: &crate::core::Chunks,
) -> (Vec<String>, Vec<String>) {
    let mut docs_in_ans = Vec::new();
    let mut docs_and_page_in_ans = Vec::new();
    for chunk in &chunks.items {
        let Some(title) = chunk.display_name() else {
            continue;
        };
        if normalized_contains(answer_text, title) {
            docs_in_ans.push(title.to_string());
        }
        if let Some(page) = chunk.page_number() {
            let title_page = format!("{title} p.{page}");
            if normalized_contains(answer_text, &format!("{title} {page}")) {
                docs_and_page_in_ans.push(title_page);
            }
        }
    }
    (docs_in_ans, docs_and_page_in_ans)
}
