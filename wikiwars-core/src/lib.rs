//! # wikiwars-core
//!
//! Core library for wikiwars - a Wikipedia edit history dashboard.
//!
//! This library provides:
//! - Paginated retrieval of article and contributor histories from the
//!   MediaWiki API
//! - Normalization of raw revision records into a typed table
//! - Pure aggregations: summaries, rankings, activity buckets, forecast input
//! - A bounded history of recently searched articles
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three stages, recomputed on every request:
//! - **Fetch:** [`RevisionFetcher`] drains every page for a subject
//! - **Normalize:** [`normalize()`] validates and types the raw records
//! - **Aggregate:** [`analytics`] derives what the dashboard displays
//!
//! [`Dashboard`] composes the three and owns the recent-articles history.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wikiwars_core::{Config, Dashboard, SearchOutcome};
//!
//! # async fn run() -> wikiwars_core::Result<()> {
//! let config = Config::load()?;
//! let dashboard = Dashboard::from_config(&config)?;
//!
//! if let SearchOutcome::Found { summary, .. } = dashboard.search_article("Earth").await? {
//!     println!("{} edits by {} contributors", summary.total_edits, summary.number_of_contributors);
//! }
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{
    contributor_summary, cumulative_timeline, daily_activity, forecast_input_series,
    hourly_histogram, summary, top_articles, top_contributors, weekday_histogram,
    ArticleStatsSummary, ContributorStatsSummary, ForecastPoint, Forecaster, HourlyHistogram,
    MovingAverageForecaster, TopNRanking, WeekdayHistogram,
};
pub use api::{PageSource, WikiClient};
pub use config::Config;
pub use dashboard::{
    ArticleDetails, ArticleForecast, ContributorDetails, Dashboard, ProgressCallback,
    SearchOutcome,
};
pub use error::{Error, FetchError, Result};
pub use fetch::{FetchOutcome, FetchProgress, RevisionFetcher};
pub use history::{AddOutcome, HistoryHandle, RecentArticles};
pub use normalize::{normalize, RevisionRow, RevisionTable};
pub use types::*;

// Public modules
pub mod analytics;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod format;
pub mod history;
pub mod logging;
pub mod normalize;
pub mod types;
