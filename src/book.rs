//! Book domain record, draft, and field types.

use serde::{Deserialize, Serialize};

use crate::types::BookId;

/// Fully materialized, authoritative book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Stable book identifier.
    pub id: BookId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Trimmed, non-empty author.
    pub author: String,
}

impl BookRecord {
    /// Returns true when title or author contains `needle_lower`.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.author.to_lowercase().contains(needle_lower)
    }

    /// Current title and author as a [`BookFields`] pair.
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
        }
    }

    pub(crate) fn set_fields(&mut self, fields: BookFields) {
        self.title = fields.title;
        self.author = fields.author;
    }
}

/// Validated title/author pair.
///
/// Only constructed through [`BookFields::normalize`] or from an existing
/// record, so both fields are always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    /// Trimmed title.
    pub title: String,
    /// Trimmed author.
    pub author: String,
}

impl BookFields {
    /// Trims both inputs, returning `None` when either is blank.
    pub fn normalize(title: &str, author: &str) -> Option<Self> {
        let title = title.trim();
        let author = author.trim();
        if title.is_empty() || author.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            author: author.to_string(),
        })
    }
}

/// Returns true when both fields are non-empty after trimming.
pub fn is_valid(title: &str, author: &str) -> bool {
    !title.trim().is_empty() && !author.trim().is_empty()
}

/// Unvalidated form text for a book being created or edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDraft {
    /// Raw title text as typed.
    pub title: String,
    /// Raw author text as typed.
    pub author: String,
}

impl BookDraft {
    /// Builds a draft from any string-like inputs.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Draft pre-filled with a record's current values.
    pub fn from_record(rec: &BookRecord) -> Self {
        Self::new(rec.title.clone(), rec.author.clone())
    }

    /// Trimmed fields, or `None` when either is blank.
    pub fn normalized(&self) -> Option<BookFields> {
        BookFields::normalize(&self.title, &self.author)
    }

    /// Returns true when the draft would be accepted by the store.
    pub fn is_valid(&self) -> bool {
        is_valid(&self.title, &self.author)
    }

    /// Resets both fields to empty text.
    pub fn clear(&mut self) {
        self.title.clear();
        self.author.clear();
    }
}
