//! Headline statistics for an article or a contributor.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::format::format_timestamp_readable;
use crate::normalize::RevisionTable;

/// Snapshot of one article's history, as shown in the dashboard table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleStatsSummary {
    pub article_name: String,
    /// Number of revisions
    pub total_edits: usize,
    /// Distinct editor names; revisions with a hidden editor are not counted
    pub number_of_contributors: usize,
    /// Most recent revision
    pub last_edit_timestamp: DateTime<Utc>,
}

impl ArticleStatsSummary {
    /// Last edit formatted for display (e.g., "January 02, 2024, 09:00 AM").
    pub fn last_edit_display(&self) -> String {
        format_timestamp_readable(self.last_edit_timestamp)
    }
}

/// Snapshot of one contributor's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorStatsSummary {
    pub username: String,
    /// Number of contributions
    pub total_edits: usize,
    /// Distinct article titles edited
    pub articles_edited: usize,
    pub first_edit_timestamp: DateTime<Utc>,
    pub last_edit_timestamp: DateTime<Utc>,
}

/// Summarize an article's revision table.
///
/// Fails with [`Error::EmptyTable`] on zero rows; callers are expected to
/// have handled `NotFound` and empty tables already.
pub fn summary(article_name: &str, table: &RevisionTable) -> Result<ArticleStatsSummary> {
    let last_edit_timestamp = table
        .iter()
        .map(|row| row.record.timestamp)
        .max()
        .ok_or(Error::EmptyTable)?;

    let contributors: HashSet<&str> = table
        .iter()
        .map(|row| row.record.user.as_str())
        .filter(|user| !user.is_empty())
        .collect();

    Ok(ArticleStatsSummary {
        article_name: article_name.to_string(),
        total_edits: table.len(),
        number_of_contributors: contributors.len(),
        last_edit_timestamp,
    })
}

/// Summarize a contributor's history table.
///
/// Rows without a title do not count towards `articles_edited`.
pub fn contributor_summary(username: &str, table: &RevisionTable) -> Result<ContributorStatsSummary> {
    let first_edit_timestamp = table
        .iter()
        .map(|row| row.record.timestamp)
        .min()
        .ok_or(Error::EmptyTable)?;
    let last_edit_timestamp = table
        .iter()
        .map(|row| row.record.timestamp)
        .max()
        .ok_or(Error::EmptyTable)?;

    let articles: HashSet<&str> = table
        .iter()
        .filter_map(|row| row.record.title.as_deref())
        .collect();

    Ok(ContributorStatsSummary {
        username: username.to_string(),
        total_edits: table.len(),
        articles_edited: articles.len(),
        first_edit_timestamp,
        last_edit_timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::RawRecord;
    use chrono::TimeZone;

    fn earth() -> RevisionTable {
        normalize(vec![
            RawRecord {
                revid: Some(1),
                user: Some("A".to_string()),
                timestamp: Some("2024-01-01T10:00:00Z".to_string()),
                title: None,
            },
            RawRecord {
                revid: Some(2),
                user: Some("B".to_string()),
                timestamp: Some("2024-01-01T11:00:00Z".to_string()),
                title: None,
            },
            RawRecord {
                revid: Some(3),
                user: Some("A".to_string()),
                timestamp: Some("2024-01-02T09:00:00Z".to_string()),
                title: None,
            },
        ])
    }

    #[test]
    fn test_article_summary() {
        let stats = summary("Earth", &earth()).unwrap();
        assert_eq!(
            stats,
            ArticleStatsSummary {
                article_name: "Earth".to_string(),
                total_edits: 3,
                number_of_contributors: 2,
                last_edit_timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
            }
        );
        assert_eq!(stats.last_edit_display(), "January 02, 2024, 09:00 AM");
    }

    #[test]
    fn test_hidden_editors_are_not_contributors() {
        let mut records: Vec<RawRecord> = earth().to_raw();
        records.push(RawRecord {
            revid: Some(4),
            user: None,
            timestamp: Some("2024-01-03T09:00:00Z".to_string()),
            title: None,
        });
        records.push(RawRecord {
            revid: Some(5),
            user: Some(String::new()),
            timestamp: Some("2024-01-03T10:00:00Z".to_string()),
            title: None,
        });

        let stats = summary("Earth", &normalize(records)).unwrap();
        assert_eq!(stats.total_edits, 5);
        assert_eq!(stats.number_of_contributors, 2);
    }

    #[test]
    fn test_summary_of_empty_table_fails() {
        let table = RevisionTable::default();
        assert!(matches!(summary("Earth", &table), Err(Error::EmptyTable)));
        assert!(matches!(
            contributor_summary("A", &table),
            Err(Error::EmptyTable)
        ));
    }

    #[test]
    fn test_contributor_summary() {
        let table = normalize(vec![
            RawRecord {
                revid: Some(10),
                user: Some("A".to_string()),
                timestamp: Some("2024-02-01T00:00:00Z".to_string()),
                title: Some("Earth".to_string()),
            },
            RawRecord {
                revid: Some(11),
                user: Some("A".to_string()),
                timestamp: Some("2024-01-01T00:00:00Z".to_string()),
                title: Some("Mars".to_string()),
            },
            RawRecord {
                revid: Some(12),
                user: Some("A".to_string()),
                timestamp: Some("2024-03-01T00:00:00Z".to_string()),
                title: Some("Earth".to_string()),
            },
        ]);

        let stats = contributor_summary("A", &table).unwrap();
        assert_eq!(stats.total_edits, 3);
        assert_eq!(stats.articles_edited, 2);
        assert_eq!(
            stats.first_edit_timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            stats.last_edit_timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }
}
