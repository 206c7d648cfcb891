//! Retrieved context chunks.

use serde::{Deserialize, Serialize};

use super::Meta;

/// A snippet of retrieved context supplied by a [`crate::generators::Retriever`].
///
/// `display_name` and `page_number` live in `meta` rather than as dedicated
/// fields, matching how the rest of the data model keeps per-entity extras
/// out of the required shape — the retrieval-aware Answer prompter is the
/// only consumer that needs them structured, and it reads them back out of
/// `meta` via [`Chunk::display_name`] / [`Chunk::page_number`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text.
    #[serde(default)]
    pub text: String,

    /// Free-form metadata; conventionally carries `display_name` (string)
    /// and `page_number` (integer) for the retrieval-aware Answer prompter.
    #[serde(default)]
    pub meta: Meta,
}

impl Chunk {
    /// Creates a chunk with a display name and page number set in `meta`.
    #[must_use]
    pub fn new(text: impl Into<String>, display_name: impl Into<String>, page: i64) -> Self {
        let mut meta = Meta::new();
        meta.insert(
            "display_name".to_string(),
            serde_json::Value::String(display_name.into()),
        );
        meta.insert("page_number".to_string(), serde_json::Value::from(page));
        Self {
            text: text.into(),
            meta,
        }
    }

    /// Title used when rendering this chunk into a prompt.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.meta.get("display_name").and_then(|v| v.as_str())
    }

    /// Page number used when rendering this chunk into a prompt.
    #[must_use]
    pub fn page_number(&self) -> Option<i64> {
        self.meta.get("page_number").and_then(serde_json::Value::as_i64)
    }
}

/// An ordered collection of chunks plus shared metadata.
///
/// Flattened per the data-model design note: rather than `Chunk` being a
/// list subclass, `Chunks` is composition of `items` + `meta`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunks {
    /// The retrieved chunks, in retriever order.
    #[serde(default)]
    pub items: Vec<Chunk>,

    /// Metadata about the retrieval itself (e.g. retriever name, query).
    #[serde(default)]
    pub meta: Meta,
}

impl Chunks {
    /// Returns `true` if no chunks have been retrieved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Discards all chunks, keeping `meta`.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_display_name_and_page() {
        let chunk = Chunk::new("some text", "Doc A", 2);
        assert_eq!(chunk.display_name(), Some("Doc A"));
        assert_eq!(chunk.page_number(), Some(2));
    }

    #[test]
    fn missing_meta_fields_return_none() {
        let chunk = Chunk {
            text: "x".to_string(),
            meta: Meta::new(),
        };
        assert_eq!(chunk.display_name(), None);
        assert_eq!(chunk.page_number(), None);
    }

    #[test]
    fn chunks_clear_keeps_meta() {
        let mut chunks = Chunks {
            items: vec![Chunk::new("a", "Doc A", 1)],
            meta: Meta::new(),
        };
        chunks.meta.insert("retriever".to_string(), "static".into());
        chunks.clear();
        assert!(chunks.is_empty());
        assert_eq!(chunks.meta.get("retriever").and_then(|v| v.as_str()), Some("static"));
    }
}
