//! Time-bucketed activity.
//!
//! Buckets come from the table's derived `hour_of_day` / `calendar_day`
//! columns, which are UTC.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Index;

use crate::normalize::RevisionTable;

/// Edit counts per hour of day. Always has all 24 buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HourlyHistogram([usize; 24]);

impl HourlyHistogram {
    pub fn counts(&self) -> &[usize; 24] {
        &self.0
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Busiest hour (0-23); the earliest one wins a tie.
    pub fn peak_hour(&self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, &count)| count)
            .map(|(hour, _)| hour as u8)
            .unwrap_or(0)
    }
}

impl Index<usize> for HourlyHistogram {
    type Output = usize;

    fn index(&self, hour: usize) -> &usize {
        &self.0[hour]
    }
}

/// Edit counts per weekday, Monday first. Always has all 7 buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeekdayHistogram([usize; 7]);

impl WeekdayHistogram {
    pub fn counts(&self) -> &[usize; 7] {
        &self.0
    }

    pub fn get(&self, day: Weekday) -> usize {
        self.0[day.num_days_from_monday() as usize]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Busiest weekday; the earliest in the week wins a tie.
    pub fn busiest_day(&self) -> Weekday {
        let index = self
            .0
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, &count)| count)
            .map(|(day, _)| day)
            .unwrap_or(0);
        weekday_from_monday(index)
    }

    /// Get day name from a weekday.
    pub fn day_name(day: Weekday) -> &'static str {
        match day {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

fn weekday_from_monday(index: usize) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// Edits per calendar day, ascending by day.
///
/// Only days with at least one edit appear.
pub fn daily_activity(table: &RevisionTable) -> Vec<(NaiveDate, usize)> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for row in table {
        *days.entry(row.calendar_day).or_default() += 1;
    }
    days.into_iter().collect()
}

/// Edits per hour of day, all 24 hours present.
pub fn hourly_histogram(table: &RevisionTable) -> HourlyHistogram {
    let mut counts = [0usize; 24];
    for row in table {
        counts[row.hour_of_day as usize % 24] += 1;
    }
    HourlyHistogram(counts)
}

/// Edits per weekday, all 7 days present.
pub fn weekday_histogram(table: &RevisionTable) -> WeekdayHistogram {
    let mut counts = [0usize; 7];
    for row in table {
        counts[row.calendar_day.weekday().num_days_from_monday() as usize] += 1;
    }
    WeekdayHistogram(counts)
}

/// Running edit count in chronological order, one point per revision.
///
/// Feeds the "edit activity over time" line; the last point equals the
/// number of rows.
pub fn cumulative_timeline(table: &RevisionTable) -> Vec<(DateTime<Utc>, usize)> {
    table
        .sorted_by_timestamp(true)
        .into_iter()
        .enumerate()
        .map(|(i, row)| (row.record.timestamp, i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::RawRecord;
    use chrono::TimeZone;

    fn table(timestamps: &[&str]) -> RevisionTable {
        normalize(timestamps.iter().enumerate().map(|(i, ts)| RawRecord {
            revid: Some(i as u64 + 1),
            timestamp: Some(ts.to_string()),
            user: Some("A".to_string()),
            title: None,
        }))
    }

    fn earth() -> RevisionTable {
        table(&[
            "2024-01-01T10:00:00Z",
            "2024-01-01T11:00:00Z",
            "2024-01-02T09:00:00Z",
        ])
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_hourly_histogram_earth() {
        let histogram = hourly_histogram(&earth());
        assert_eq!(histogram.counts().len(), 24);
        assert_eq!(histogram[10], 1);
        assert_eq!(histogram[11], 1);
        assert_eq!(histogram[9], 1);
        for hour in (0..24).filter(|h| ![9, 10, 11].contains(h)) {
            assert_eq!(histogram[hour], 0, "hour {}", hour);
        }
        assert_eq!(histogram.total(), 3);
        assert_eq!(histogram.peak_hour(), 9);
    }

    #[test]
    fn test_hourly_histogram_excludes_dropped_records() {
        let table = table(&["2024-01-01T10:00:00Z", "garbage", "2024-01-01T10:30:00Z"]);
        let histogram = hourly_histogram(&table);
        assert_eq!(histogram.total(), 3 - table.dropped_records());
        assert_eq!(histogram[10], 2);
    }

    #[test]
    fn test_daily_activity_sorted_ascending() {
        let table = table(&[
            "2024-01-03T00:00:00Z",
            "2024-01-01T10:00:00Z",
            "2024-01-03T23:59:59Z",
            "2023-12-31T12:00:00Z",
        ]);
        assert_eq!(
            daily_activity(&table),
            vec![
                (day(2023, 12, 31), 1),
                (day(2024, 1, 1), 1),
                (day(2024, 1, 3), 2),
            ]
        );
    }

    #[test]
    fn test_weekday_histogram() {
        // 2024-01-01 was a Monday
        let table = table(&[
            "2024-01-01T10:00:00Z",
            "2024-01-08T10:00:00Z",
            "2024-01-07T10:00:00Z",
        ]);
        let histogram = weekday_histogram(&table);
        assert_eq!(histogram.get(Weekday::Mon), 2);
        assert_eq!(histogram.get(Weekday::Sun), 1);
        assert_eq!(histogram.total(), 3);
        assert_eq!(histogram.busiest_day(), Weekday::Mon);
        assert_eq!(WeekdayHistogram::day_name(Weekday::Sun), "Sunday");
    }

    #[test]
    fn test_cumulative_timeline() {
        let table = table(&[
            "2024-01-02T09:00:00Z",
            "2024-01-01T11:00:00Z",
            "2024-01-01T10:00:00Z",
        ]);
        let timeline = cumulative_timeline(&table);
        assert_eq!(
            timeline,
            vec![
                (Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(), 1),
                (Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(), 2),
                (Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(), 3),
            ]
        );
    }

    #[test]
    fn test_empty_table_buckets() {
        let table = RevisionTable::default();
        assert_eq!(hourly_histogram(&table).total(), 0);
        assert_eq!(weekday_histogram(&table).counts(), &[0; 7]);
        assert!(daily_activity(&table).is_empty());
        assert!(cumulative_timeline(&table).is_empty());
    }
}
