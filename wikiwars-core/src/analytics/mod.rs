//! Analytics module for wikiwars
//!
//! Pure functions over a [`RevisionTable`](crate::normalize::RevisionTable):
//! - Summaries (edit totals, distinct contributors/articles, last edit)
//! - Top-N rankings of contributors and articles
//! - Time-bucketed activity (daily, hourly, weekday, cumulative)
//! - The monthly series handed to a [`Forecaster`]
//!
//! Nothing here does I/O or mutates its input. Every bucketed aggregate is
//! computed in UTC so results do not depend on the host's timezone.

pub mod activity;
pub mod forecast;
pub mod ranking;
pub mod summary;

pub use activity::{
    cumulative_timeline, daily_activity, hourly_histogram, weekday_histogram, HourlyHistogram,
    WeekdayHistogram,
};
pub use forecast::{forecast_input_series, ForecastPoint, Forecaster, MovingAverageForecaster};
pub use ranking::{top_articles, top_contributors, RankingEntry, TopNRanking, DEFAULT_TOP_N};
pub use summary::{contributor_summary, summary, ArticleStatsSummary, ContributorStatsSummary};
