//! Title normalization shared by the retrieval-aware Answer prompter.
//!
//! Used to decide whether a chunk's `display_name` (and `display_name` +
//! `page_number`) shows up, in some recognizable form, inside the model's
//! answer text.

use std::sync::LazyLock;

use regex::Regex;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[^a-z0-9 ]").unwrap()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\s+").unwrap()
});

/// Strips common Latin diacritics by folding each accented letter to its
/// unaccented ASCII counterpart.
fn strip_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Normalizes a chunk title for fuzzy membership tests: lowercases, folds
/// accents, drops punctuation, unifies `"page"`/`"p."` into `"p"`, and
/// collapses whitespace.
#[must_use]
pub fn normalize_title(s: &str) -> String {
    let lower = strip_accents(&s.to_lowercase());
    let lower = lower.replace("page", "p").replace("p.", "p");
    let no_punct = NON_ALNUM.replace_all(&lower, " ");
    WHITESPACE.replace_all(&no_punct, " ").trim().to_string()
}

/// `true` if `needle` (already normalized) appears as a substring of
/// `haystack` (raw, normalized on the fly).
#[must_use]
pub fn normalized_contains(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    normalize_title(haystack).contains(&normalize_title(needle))
}
