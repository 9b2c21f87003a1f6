//! Revision fetcher
//!
//! Drains the complete, possibly multi-page history of an article or a
//! contributor and hands it to the normalizer.
//!
//! The pagination loop stops when any of these holds:
//! - the response carries no continuation token
//! - a page contributed zero new revision ids
//! - the API repeated the token it was just given
//! - `max_pages` pages have been read
//!
//! Revision ids are deduplicated across pages. Every request is a single
//! attempt; errors propagate as [`FetchError`] without retry.

use std::collections::HashSet;

use crate::api::{base_params, continued_params, Continuation, PageSource, QueryResponse};
use crate::error::{FetchError, Result};
use crate::normalize::{normalize, RevisionTable};
use crate::types::{RawRecord, Subject};

/// Result of fetching a subject that did not fail.
///
/// `NotFound` covers both "no such article/user" and "exists but has no
/// revisions", and is deliberately distinct from an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(RevisionTable),
    NotFound,
}

impl FetchOutcome {
    /// The table, if one was found.
    pub fn into_table(self) -> Option<RevisionTable> {
        match self {
            FetchOutcome::Found(table) => Some(table),
            FetchOutcome::NotFound => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchOutcome::NotFound)
    }
}

/// Progress after each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    /// Pages read so far
    pub pages: usize,
    /// Distinct records accumulated so far
    pub records: usize,
}

/// What one page contained, once interpreted for a subject.
enum PageContent {
    Records(Vec<serde_json::Value>),
    Missing,
}

/// Paginating fetcher over a [`PageSource`].
#[derive(Debug, Clone)]
pub struct RevisionFetcher<S> {
    source: S,
    max_pages: usize,
}

impl<S: PageSource + Sync> RevisionFetcher<S> {
    /// Create a fetcher that follows at most `max_pages` pages per subject.
    pub fn new(source: S, max_pages: usize) -> Self {
        Self {
            source,
            max_pages: max_pages.max(1),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Complete revision history of one article.
    pub async fn fetch_article_revisions(&self, article_name: &str) -> Result<FetchOutcome> {
        self.fetch(&Subject::Article(article_name.to_string()), |_| {})
            .await
    }

    /// Complete contribution history of one user.
    pub async fn fetch_contributor_history(&self, username: &str) -> Result<FetchOutcome> {
        self.fetch(&Subject::Contributor(username.to_string()), |_| {})
            .await
    }

    pub async fn fetch_article_revisions_with_progress<F>(
        &self,
        article_name: &str,
        progress: F,
    ) -> Result<FetchOutcome>
    where
        F: FnMut(FetchProgress) + Send,
    {
        self.fetch(&Subject::Article(article_name.to_string()), progress)
            .await
    }

    pub async fn fetch_contributor_history_with_progress<F>(
        &self,
        username: &str,
        progress: F,
    ) -> Result<FetchOutcome>
    where
        F: FnMut(FetchProgress) + Send,
    {
        self.fetch(&Subject::Contributor(username.to_string()), progress)
            .await
    }

    /// Fetch any subject, reporting progress after every page.
    pub async fn fetch<F>(&self, subject: &Subject, mut progress: F) -> Result<FetchOutcome>
    where
        F: FnMut(FetchProgress) + Send,
    {
        let mut seen: HashSet<u64> = HashSet::new();
        let mut accumulated: Vec<RawRecord> = Vec::new();
        let mut rejected = 0usize;
        let mut continuation: Option<Continuation> = None;
        let mut pages = 0usize;

        loop {
            let params = match &continuation {
                Some(token) => continued_params(subject, token),
                None => base_params(subject),
            };

            let response = self.source.fetch_page(&params).await.map_err(|e| {
                tracing::warn!(%subject, page = pages + 1, error = %e, "Fetch failed");
                e
            })?;
            pages += 1;

            let records = match interpret_page(subject, &response)? {
                PageContent::Missing => {
                    tracing::info!(%subject, "Subject does not exist");
                    return Ok(FetchOutcome::NotFound);
                }
                PageContent::Records(records) => records,
            };

            let mut added = 0usize;
            for value in records {
                match serde_json::from_value::<RawRecord>(value) {
                    Ok(record) => match record.revid {
                        Some(id) if seen.insert(id) => {
                            accumulated.push(record);
                            added += 1;
                        }
                        Some(id) => {
                            tracing::debug!(%subject, revid = id, "Skipping duplicate revision");
                        }
                        None => {
                            tracing::warn!(%subject, "Dropping record without revid");
                            rejected += 1;
                        }
                    },
                    Err(e) => {
                        tracing::warn!(%subject, error = %e, "Dropping malformed record");
                        rejected += 1;
                    }
                }
            }

            progress(FetchProgress {
                pages,
                records: accumulated.len(),
            });
            tracing::debug!(%subject, pages, added, total = accumulated.len(), "Read page");

            let Some(next) = response.continuation else {
                break;
            };

            if added == 0 {
                tracing::warn!(%subject, pages, "Page added no new records; stopping");
                break;
            }
            if continuation.as_ref() == Some(&next) {
                tracing::warn!(%subject, pages, "API repeated continuation token; stopping");
                break;
            }
            if pages >= self.max_pages {
                tracing::warn!(
                    %subject,
                    max_pages = self.max_pages,
                    records = accumulated.len(),
                    "Page limit reached; history is truncated"
                );
                break;
            }

            continuation = Some(next);
        }

        if accumulated.is_empty() {
            tracing::info!(%subject, pages, rejected, "No revisions found");
            return Ok(FetchOutcome::NotFound);
        }

        let mut table = normalize(accumulated);
        table.add_dropped(rejected);

        tracing::info!(
            %subject,
            pages,
            rows = table.len(),
            dropped = table.dropped_records(),
            "Fetched history"
        );

        Ok(FetchOutcome::Found(table))
    }
}

/// Pull the record list for `subject` out of a response.
fn interpret_page(
    subject: &Subject,
    response: &QueryResponse,
) -> std::result::Result<PageContent, FetchError> {
    if let Some(error) = &response.error {
        if matches!(subject, Subject::Contributor(_)) && error.is_bad_user() {
            return Ok(PageContent::Missing);
        }
        return Err(FetchError::Api {
            code: error.code.clone(),
            info: error.info.clone(),
        });
    }

    let query = response
        .query
        .as_ref()
        .ok_or_else(|| FetchError::MalformedBody("response has no query object".to_string()))?;

    match subject {
        Subject::Article(_) => {
            // A single title was requested, so only the first page matters.
            let Some(page) = query.pages.first() else {
                return Ok(PageContent::Missing);
            };
            if page.missing || page.invalid {
                return Ok(PageContent::Missing);
            }
            Ok(PageContent::Records(page.revisions.clone()))
        }
        Subject::Contributor(_) => Ok(PageContent::Records(
            query.usercontribs.clone().unwrap_or_default(),
        )),
    }
}
