//! Dashboard data service
//!
//! Produces everything the dashboard pages render, one full
//! fetch-normalize-aggregate pipeline per call:
//!
//! | Page | Method |
//! |------|--------|
//! | Search + comparison table | [`Dashboard::search_article`] |
//! | Article details | [`Dashboard::article_details`] |
//! | Contributor details | [`Dashboard::contributor_details`] |
//! | Edit forecast | [`Dashboard::forecast`] |
//!
//! "No data" is `None` / [`SearchOutcome::NotFound`], never an error. That
//! covers missing subjects, subjects with zero revisions, and histories whose
//! every record was malformed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::{
    contributor_summary, cumulative_timeline, daily_activity, forecast_input_series,
    hourly_histogram, summary, top_articles, top_contributors, weekday_histogram,
    ArticleStatsSummary, ContributorStatsSummary, ForecastPoint, Forecaster, HourlyHistogram,
    TopNRanking, WeekdayHistogram,
};
use crate::api::{PageSource, WikiClient};
use crate::config::{Config, DashboardConfig};
use crate::error::{FetchError, Result};
use crate::fetch::{FetchOutcome, FetchProgress, RevisionFetcher};
use crate::history::{AddOutcome, HistoryHandle};
use crate::normalize::RevisionTable;
use crate::types::Subject;

/// Observer called after every fetched page.
pub type ProgressCallback = Arc<dyn Fn(&Subject, FetchProgress) + Send + Sync>;

/// Result of searching for an article on the main page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found {
        summary: ArticleStatsSummary,
        /// What happened when the summary was pushed into the history
        added: AddOutcome,
        /// History after the search, oldest first
        recent: Vec<ArticleStatsSummary>,
    },
    NotFound,
}

/// Data behind the article details page.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetails {
    pub summary: ArticleStatsSummary,
    pub top_contributors: TopNRanking,
    pub timeline: Vec<(DateTime<Utc>, usize)>,
    pub hourly: HourlyHistogram,
    pub daily: Vec<(NaiveDate, usize)>,
    pub weekday: WeekdayHistogram,
    /// Records rejected during normalization
    pub dropped_records: usize,
}

/// Data behind the contributor details page.
#[derive(Debug, Clone, Serialize)]
pub struct ContributorDetails {
    pub summary: ContributorStatsSummary,
    pub top_articles: TopNRanking,
    pub timeline: Vec<(DateTime<Utc>, usize)>,
    pub hourly: HourlyHistogram,
    pub dropped_records: usize,
}

/// Monthly history of an article and its predicted continuation.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleForecast {
    pub article_name: String,
    pub history: Vec<(NaiveDate, usize)>,
    pub predictions: Vec<ForecastPoint>,
}

/// Composes fetching, aggregation and the recent-articles history.
pub struct Dashboard<S> {
    fetcher: RevisionFetcher<S>,
    history: HistoryHandle,
    top_n: usize,
    request_timeout: Option<Duration>,
    progress: Option<ProgressCallback>,
}

impl Dashboard<WikiClient> {
    /// Build a dashboard that talks to the configured wiki.
    ///
    /// Spawns the history task, so it must run inside a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = WikiClient::new(&config.api)?;
        let fetcher = RevisionFetcher::new(client, config.api.max_pages);
        let request_timeout = match config.api.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Ok(Self::new(fetcher, &config.dashboard, request_timeout))
    }
}

impl<S: PageSource + Sync> Dashboard<S> {
    /// Build a dashboard around any page source.
    ///
    /// Spawns the history task, so it must run inside a tokio runtime.
    pub fn new(
        fetcher: RevisionFetcher<S>,
        settings: &DashboardConfig,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self {
            fetcher,
            history: HistoryHandle::spawn(settings.history_capacity),
            top_n: settings.top_n,
            request_timeout,
            progress: None,
        }
    }

    /// Report page-by-page progress to `callback`.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Override the ranking length.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn history(&self) -> &HistoryHandle {
        &self.history
    }

    /// Fetch a subject, honoring the per-request timeout.
    ///
    /// Returns `None` when there is nothing to aggregate.
    async fn load(&self, subject: &Subject) -> Result<Option<RevisionTable>> {
        let progress = self.progress.clone();
        let fetch = self.fetcher.fetch(subject, |p| {
            if let Some(callback) = &progress {
                callback(subject, p);
            }
        });

        let outcome = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
                tracing::warn!(%subject, ?limit, "Fetch timed out");
                FetchError::Timeout
            })??,
            None => fetch.await?,
        };

        match outcome {
            FetchOutcome::NotFound => Ok(None),
            FetchOutcome::Found(table) if table.is_empty() => {
                tracing::warn!(
                    %subject,
                    dropped = table.dropped_records(),
                    "Every record was malformed; treating as no data"
                );
                Ok(None)
            }
            FetchOutcome::Found(table) => Ok(Some(table)),
        }
    }

    /// Search for an article and push its summary into the history.
    pub async fn search_article(&self, article_name: &str) -> Result<SearchOutcome> {
        let subject = Subject::Article(article_name.to_string());
        let Some(table) = self.load(&subject).await? else {
            return Ok(SearchOutcome::NotFound);
        };

        let stats = summary(article_name, &table)?;
        let added = self.history.add(stats.clone()).await?;
        if added == AddOutcome::Duplicate {
            tracing::debug!(article = article_name, "Article already in history");
        }
        let recent = self.history.list().await?;

        Ok(SearchOutcome::Found {
            summary: stats,
            added,
            recent,
        })
    }

    /// Everything the article details page shows.
    pub async fn article_details(&self, article_name: &str) -> Result<Option<ArticleDetails>> {
        let subject = Subject::Article(article_name.to_string());
        let Some(table) = self.load(&subject).await? else {
            return Ok(None);
        };

        Ok(Some(ArticleDetails {
            summary: summary(article_name, &table)?,
            top_contributors: top_contributors(&table, self.top_n),
            timeline: cumulative_timeline(&table),
            hourly: hourly_histogram(&table),
            daily: daily_activity(&table),
            weekday: weekday_histogram(&table),
            dropped_records: table.dropped_records(),
        }))
    }

    /// Everything the contributor details page shows.
    pub async fn contributor_details(&self, username: &str) -> Result<Option<ContributorDetails>> {
        let subject = Subject::Contributor(username.to_string());
        let Some(table) = self.load(&subject).await? else {
            return Ok(None);
        };

        Ok(Some(ContributorDetails {
            summary: contributor_summary(username, &table)?,
            top_articles: top_articles(&table, self.top_n),
            timeline: cumulative_timeline(&table),
            hourly: hourly_histogram(&table),
            dropped_records: table.dropped_records(),
        }))
    }

    /// Monthly edit history of an article and `periods` predicted months.
    pub async fn forecast<F: Forecaster>(
        &self,
        article_name: &str,
        periods: usize,
        forecaster: &F,
    ) -> Result<Option<ArticleForecast>> {
        let subject = Subject::Article(article_name.to_string());
        let Some(table) = self.load(&subject).await? else {
            return Ok(None);
        };

        let history = forecast_input_series(&table);
        let predictions = forecaster.forecast(&history, periods)?;

        Ok(Some(ArticleForecast {
            article_name: article_name.to_string(),
            history,
            predictions,
        }))
    }

    /// Recently searched articles, oldest first.
    pub async fn recent_articles(&self) -> Result<Vec<ArticleStatsSummary>> {
        self.history.list().await
    }

    /// Drop an article from the recent-articles history.
    pub async fn forget_article(&self, article_name: &str) -> Result<Option<ArticleStatsSummary>> {
        self.history.remove(article_name).await
    }
}
