//! Plain-text rendering of dashboard pages
//!
//! Every function returns the full page as a string so it can be tested
//! without capturing stdout.

use wikiwars_core::format::{format_relative_time, format_timestamp_compact, hour_display};
use wikiwars_core::{
    ArticleDetails, ArticleForecast, ArticleStatsSummary, ContributorDetails, HourlyHistogram,
    TopNRanking, WeekdayHistogram,
};

const BAR_WIDTH: usize = 40;
const DAILY_ROWS: usize = 14;
const FORECAST_HISTORY_ROWS: usize = 12;

/// Line-oriented page buffer.
#[derive(Default)]
struct Page {
    text: String,
}

impl Page {
    fn line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn header(&mut self, title: &str) {
        self.blank();
        self.line(format!("╭{}╮", "─".repeat(60)));
        self.line(format!("│{:^60}│", title));
        self.line(format!("╰{}╯", "─".repeat(60)));
        self.blank();
    }

    fn ranking(&mut self, title: &str, ranking: &TopNRanking) {
        self.line(title);
        if ranking.is_empty() {
            self.line("   (none)");
        }
        for (i, entry) in ranking.iter().enumerate() {
            self.line(format!("   {:>2}. {:<30} {:>7}", i + 1, entry.name, entry.count));
        }
        self.blank();
    }

    fn hourly(&mut self, histogram: &HourlyHistogram) {
        self.line("EDITS BY HOUR (UTC)");
        let max = histogram.counts().iter().copied().max().unwrap_or(0);
        for (hour, &count) in histogram.counts().iter().enumerate() {
            self.line(format!(
                "   {:>4} {:>6} {}",
                hour_display(hour as u8),
                count,
                bar(count, max)
            ));
        }
        self.blank();
    }

    fn time_patterns(&mut self, weekday: &WeekdayHistogram, peak_hour: u8) {
        self.line("TIME PATTERNS");
        self.line(format!("   Peak hour:    {}", hour_display(peak_hour)));
        self.line(format!(
            "   Busiest day:  {}",
            WeekdayHistogram::day_name(weekday.busiest_day())
        ));
        self.blank();
    }

    fn finish(self) -> String {
        self.text
    }
}

/// Scale `count` against `max` into a bar of at most [`BAR_WIDTH`] cells.
fn bar(count: usize, max: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    let cells = (count * BAR_WIDTH).div_ceil(max).max(1);
    "█".repeat(cells)
}

/// Article details page.
pub fn article_details(details: &ArticleDetails) -> String {
    let mut page = Page::default();
    let summary = &details.summary;
    page.header(&summary.article_name);

    page.line("SUMMARY");
    page.line(format!("   Total edits:    {}", summary.total_edits));
    page.line(format!("   Contributors:   {}", summary.number_of_contributors));
    page.line(format!(
        "   Last edit:      {} ({})",
        summary.last_edit_display(),
        format_relative_time(summary.last_edit_timestamp)
    ));
    if details.dropped_records > 0 {
        page.line(format!(
            "   Skipped:        {} malformed record{}",
            details.dropped_records,
            if details.dropped_records == 1 { "" } else { "s" }
        ));
    }
    page.blank();

    page.ranking("TOP CONTRIBUTORS", &details.top_contributors);
    page.time_patterns(&details.weekday, details.hourly.peak_hour());
    page.hourly(&details.hourly);

    page.line("RECENT DAILY ACTIVITY");
    let recent_days = &details.daily[details.daily.len().saturating_sub(DAILY_ROWS)..];
    let max = recent_days.iter().map(|(_, n)| *n).max().unwrap_or(0);
    for (day, count) in recent_days {
        page.line(format!("   {} {:>6} {}", day, count, bar(*count, max)));
    }
    page.blank();

    page.finish()
}

/// Contributor details page.
pub fn contributor_details(details: &ContributorDetails) -> String {
    let mut page = Page::default();
    let summary = &details.summary;
    page.header(&summary.username);

    page.line("SUMMARY");
    page.line(format!("   Total edits:      {}", summary.total_edits));
    page.line(format!("   Articles edited:  {}", summary.articles_edited));
    page.line(format!(
        "   First edit:       {}",
        format_timestamp_compact(summary.first_edit_timestamp)
    ));
    page.line(format!(
        "   Last edit:        {} ({})",
        format_timestamp_compact(summary.last_edit_timestamp),
        format_relative_time(summary.last_edit_timestamp)
    ));
    page.blank();

    page.ranking("MOST EDITED ARTICLES", &details.top_articles);
    page.line(format!(
        "   Peak hour:    {}",
        hour_display(details.hourly.peak_hour())
    ));
    page.blank();
    page.hourly(&details.hourly);

    page.finish()
}

/// Recently searched articles, oldest first.
pub fn comparison_table(recent: &[ArticleStatsSummary]) -> String {
    let mut page = Page::default();
    page.header("RECENTLY SEARCHED ARTICLES");

    if recent.is_empty() {
        page.line("  No articles found.");
        page.blank();
        return page.finish();
    }

    page.line(format!(
        "   {:<30} {:>11} {:>13}  {}",
        "Article", "Total edits", "Contributors", "Last edit"
    ));
    for summary in recent {
        page.line(format!(
            "   {:<30} {:>11} {:>13}  {}",
            summary.article_name,
            summary.total_edits,
            summary.number_of_contributors,
            summary.last_edit_display()
        ));
    }
    page.blank();
    page.finish()
}

/// Monthly history and forecast.
pub fn forecast(forecast: &ArticleForecast) -> String {
    let mut page = Page::default();
    page.header(&format!("{} - EDIT FORECAST", forecast.article_name));

    let start = forecast.history.len().saturating_sub(FORECAST_HISTORY_ROWS);
    let history = &forecast.history[start..];
    let max = history
        .iter()
        .map(|(_, n)| *n)
        .chain(forecast.predictions.iter().map(|p| p.predicted.ceil() as usize))
        .max()
        .unwrap_or(0);

    page.line("HISTORY");
    for (month, count) in history {
        page.line(format!(
            "   {} {:>8} {}",
            month.format("%Y-%m"),
            count,
            bar(*count, max)
        ));
    }
    page.blank();

    page.line("FORECAST");
    for point in &forecast.predictions {
        page.line(format!(
            "   {} {:>8.1} {}",
            point.month_start.format("%Y-%m"),
            point.predicted,
            bar(point.predicted.round() as usize, max)
        ));
    }
    page.blank();

    page.finish()
}
