//! The Fact prompter: extract a minimal numbered list of atomic claims
//! from a human-validated answer.

use crate::core::{Fact, Prompt, QA};

use super::traits::{PromptInputs, Prompter, StageObject};

const SYSTEM_PROMPT: &str = "Read the answer below and extract the minimal set of atomic, \
self-contained facts it asserts. Each fact must stand on its own: do not refer to \"the source\", \
\"the document\", or a page number. Reply with a numbered list, one fact per line, \
and nothing else.";

/// Splits the model's numbered-list response into [`Fact`]s, renumbering
/// any line that doesn't already carry a `"N. "` prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactPrompter;

impl Prompter for FactPrompter {
    fn name(&self) -> &'static str {
        "fact"
    }

    fn build_prompt(&self, _qa: &QA, inputs: &PromptInputs<'_>) -> Prompt {
        let answer = inputs.answer.map_or("", |a| a.text.as_str());
        Prompt::new(SYSTEM_PROMPT.to_string(), format!("Answer:\n{answer}"))
    }

    fn post_process(&self, _qa: &QA, object: &mut StageObject) {
        let StageObject::Facts(facts) = object else {
            return;
        };
        let Some(llm_answer) = &facts.llm_answer else {
            return;
        };

        facts.items = llm_answer
            .text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| Fact::new(ensure_numbered(line, i + 1)))
            .collect();
    }
}

/// Prepends `"i. "` to `line` unless it already begins with a 1- or
/// 2-digit number followed by a period.
fn ensure_numbered(line: &str, i: usize) -> String {
    let digits: String = line.chars().take_while(char::is_ascii_digit).collect();
    let already_numbered = (1..=2).contains(&digits.len())
        && line[digits.len()..].starts_with('.')
        && !digits.is_empty();
    if already_numbered {
        line.to_string()
    } else {
        format!("{i}. {line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Facts, LlmAnswer};

    fn facts_from(raw: &str) -> Facts {
        let prompter = FactPrompter;
        let qa = QA::from_question(crate::core::Question::new("q"));
        let mut object = StageObject::Facts(Facts {
            llm_answer: Some(LlmAnswer::new(raw, Prompt::default(), "m")),
            ..Facts::default()
        });
        prompter.post_process(&qa, &mut object);
        let StageObject::Facts(facts) = object else {
            unreachable!()
        };
        facts
    }

    #[test]
    fn numbers_unnumbered_lines() {
        let facts = facts_from("Paris is the capital of France\nFrance is in Europe");
        assert_eq!(facts.items[0].text, "1. Paris is the capital of France");
        assert_eq!(facts.items[1].text, "2. France is in Europe");
    }

    #[test]
    fn preserves_existing_numbering() {
        let facts = facts_from("1. Paris is the capital\n2. It is in Europe");
        assert_eq!(facts.items[0].text, "1. Paris is the capital");
        assert_eq!(facts.items[1].text, "2. It is in Europe");
    }

    #[test]
    fn drops_empty_lines() {
        let facts = facts_from("1. a fact\n\n\n2. another fact\n");
        assert_eq!(facts.items.len(), 2);
    }
}
