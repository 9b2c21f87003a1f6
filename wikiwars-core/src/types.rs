//! Core domain types for wikiwars
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Revision** | One recorded edit to an article, with an author, timestamp and unique id |
//! | **Contribution** | One recorded edit made by a specific user, across any article |
//! | **Subject** | What a fetch is about: an article title or a contributor's username |
//! | **Continuation token** | Opaque cursor returned by the API while more pages remain |
//!
//! Records arrive from the API as [`RawRecord`] (every field optional, nothing
//! trusted) and become [`RevisionRecord`] only after normalization has parsed
//! the timestamp. The API returns newest-first; nothing here assumes an order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================
// Subjects
// ============================================

/// What a revision fetch is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// Revision history of one article, keyed by title
    Article(String),
    /// Contribution history of one user, keyed by username
    Contributor(String),
}

impl Subject {
    /// The title or username this subject names.
    pub fn name(&self) -> &str {
        match self {
            Subject::Article(name) | Subject::Contributor(name) => name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Subject::Article(_) => "article",
            Subject::Contributor(_) => "contributor",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.name())
    }
}

// ============================================
// Records
// ============================================

/// A revision or contribution exactly as the API reported it.
///
/// Article revisions carry `user`; contributions carry `title` (and `user`,
/// which is always the queried contributor). Every field is optional so one
/// odd record never fails a whole page; validation happens in
/// [`crate::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Revision id, unique per wiki
    #[serde(default)]
    pub revid: Option<u64>,
    /// ISO-8601 UTC timestamp, e.g. `2024-01-01T10:00:00Z`
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Editor display name (may be an IP address; absent when hidden)
    #[serde(default)]
    pub user: Option<String>,
    /// Article edited (contribution queries only)
    #[serde(default)]
    pub title: Option<String>,
}

/// One validated edit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionRecord {
    /// Revision id, unique within a fetched set
    pub revision_id: u64,
    /// When the edit was saved (UTC)
    pub timestamp: DateTime<Utc>,
    /// Editor display name; empty when hidden or missing
    pub user: String,
    /// Article edited, present for contributor histories
    pub title: Option<String>,
}
