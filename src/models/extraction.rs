//! Extraction entries and their per-key cache

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::session::{DocumentId, RequestKey};
use crate::models::wire::ExtractedText;

/// Column-partitioned text for one (document, page, columns) key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionEntry {
    /// Column text blocks, left to right
    pub columns: Vec<String>,
    /// All columns in reading order
    pub joined_text: String,
    pub headers: Vec<String>,
    pub titles: Vec<String>,
    pub footers: Vec<String>,
}

impl ExtractionEntry {
    /// Whether a translation can be requested for this entry
    pub fn is_translatable(&self) -> bool {
        !self.joined_text.trim().is_empty()
    }
}

impl From<ExtractedText> for ExtractionEntry {
    fn from(text: ExtractedText) -> Self {
        // Single-column pages come back without joined_text
        let joined_text = match text.joined_text {
            Some(joined) => joined,
            None => text
                .columns
                .iter()
                .filter(|c| !c.trim().is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
        };

        Self {
            columns: text.columns,
            joined_text,
            headers: text.headers,
            titles: text.titles,
            footers: text.footers,
        }
    }
}

/// Extraction cache keyed by [`RequestKey`]
///
/// At most one live entry per key. Wiped wholesale on every new upload.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    entries: HashMap<RequestKey, ExtractionEntry>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &RequestKey) -> Option<&ExtractionEntry> {
        self.entries.get(key)
    }

    /// Insert or replace the entry for `key`, returning the previous one
    pub fn insert(&mut self, key: RequestKey, entry: ExtractionEntry) -> Option<ExtractionEntry> {
        self.entries.insert(key, entry)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry still references `document_id`
    pub fn references(&self, document_id: &DocumentId) -> bool {
        self.entries.keys().any(|k| &k.document_id == document_id)
    }
}
