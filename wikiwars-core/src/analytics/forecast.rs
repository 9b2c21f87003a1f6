//! Monthly edit series and the forecasting seam.
//!
//! [`forecast_input_series`] is the only artifact a [`Forecaster`] ever sees.
//! It owns the timezone stripping: buckets are UTC calendar months keyed by a
//! naive month-start date, so forecasters never deal with offsets.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::normalize::RevisionTable;

/// One predicted period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub month_start: NaiveDate,
    pub predicted: f64,
}

/// Predicts future monthly edit counts from a history.
///
/// Implementations are opaque to the rest of the crate.
pub trait Forecaster {
    /// Predict `periods` months following the last month in `series`.
    ///
    /// `series` is ascending, gap-free, and keyed by month start.
    fn forecast(&self, series: &[(NaiveDate, usize)], periods: usize) -> Result<Vec<ForecastPoint>>;
}

fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Edits per calendar month (UTC), ascending by month start.
///
/// Months with no edits between the first and last active month are present
/// with a zero count, so the series is regular.
pub fn forecast_input_series(table: &RevisionTable) -> Vec<(NaiveDate, usize)> {
    let mut months: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for row in table {
        *months.entry(month_start(row.calendar_day)).or_default() += 1;
    }

    let (Some(&first), Some(&last)) = (months.keys().next(), months.keys().next_back()) else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut month = first;
    while month <= last {
        series.push((month, months.get(&month).copied().unwrap_or(0)));
        match month.checked_add_months(Months::new(1)) {
            Some(next) => month = next,
            None => break,
        }
    }
    series
}

fn horizon_out_of_range() -> Error {
    Error::Forecast("forecast horizon out of range".to_string())
}

/// Fails unless `periods` months after `last_month` is a representable date.
fn check_horizon(last_month: NaiveDate, periods: usize) -> Result<()> {
    let months = u32::try_from(periods).map_err(|_| horizon_out_of_range())?;
    last_month
        .checked_add_months(Months::new(months))
        .map(|_| ())
        .ok_or_else(horizon_out_of_range)
}

/// Flat forecast: every future month gets the mean of the last `window` months.
#[derive(Debug, Clone, Copy)]
pub struct MovingAverageForecaster {
    window: usize,
}

impl MovingAverageForecaster {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }
}

impl Default for MovingAverageForecaster {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Forecaster for MovingAverageForecaster {
    fn forecast(&self, series: &[(NaiveDate, usize)], periods: usize) -> Result<Vec<ForecastPoint>> {
        let Some(&(last_month, _)) = series.last() else {
            return Err(Error::Forecast("cannot forecast an empty series".to_string()));
        };

        check_horizon(last_month, periods)?;

        let recent = &series[series.len().saturating_sub(self.window)..];
        let mean = recent.iter().map(|(_, count)| *count as f64).sum::<f64>() / recent.len() as f64;

        let mut points = Vec::with_capacity(periods);
        let mut month = last_month;
        for _ in 0..periods {
            month = month
                .checked_add_months(Months::new(1))
                .ok_or_else(horizon_out_of_range)?;
            points.push(ForecastPoint {
                month_start: month,
                predicted: mean,
            });
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::RawRecord;

    fn table(timestamps: &[&str]) -> RevisionTable {
        normalize(timestamps.iter().enumerate().map(|(i, ts)| RawRecord {
            revid: Some(i as u64 + 1),
            timestamp: Some(ts.to_string()),
            user: Some("A".to_string()),
            title: None,
        }))
    }

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_monthly_series_fills_gaps() {
        let table = table(&[
            "2024-03-31T23:59:59Z",
            "2023-12-15T00:00:00Z",
            "2024-03-01T00:00:00Z",
            "2023-12-01T08:00:00Z",
        ]);
        assert_eq!(
            forecast_input_series(&table),
            vec![
                (month(2023, 12), 2),
                (month(2024, 1), 0),
                (month(2024, 2), 0),
                (month(2024, 3), 2),
            ]
        );
    }

    #[test]
    fn test_monthly_series_uses_utc_months() {
        // 23:30 at -02:00 is already the next month in UTC.
        let table = table(&["2024-01-31T23:30:00-02:00"]);
        assert_eq!(forecast_input_series(&table), vec![(month(2024, 2), 1)]);
    }

    #[test]
    fn test_empty_series() {
        assert!(forecast_input_series(&RevisionTable::default()).is_empty());
        let err = MovingAverageForecaster::default().forecast(&[], 3);
        assert!(matches!(err, Err(Error::Forecast(_))));
    }

    #[test]
    fn test_unrepresentable_horizon_is_an_error() {
        let series = vec![(month(2024, 1), 3)];
        let forecaster = MovingAverageForecaster::new(1);

        for periods in [usize::MAX, u32::MAX as usize, 5_000_000] {
            let result = forecaster.forecast(&series, periods);
            assert!(
                matches!(result, Err(Error::Forecast(_))),
                "periods {} should be rejected",
                periods
            );
        }

        assert_eq!(forecaster.forecast(&series, 0).unwrap(), vec![]);
    }

    #[test]
    fn test_moving_average_forecast() {
        let series = vec![
            (month(2024, 1), 10),
            (month(2024, 2), 2),
            (month(2024, 3), 4),
            (month(2024, 4), 6),
        ];
        let points = MovingAverageForecaster::new(3).forecast(&series, 2).unwrap();
        assert_eq!(
            points,
            vec![
                ForecastPoint {
                    month_start: month(2024, 5),
                    predicted: 4.0
                },
                ForecastPoint {
                    month_start: month(2024, 6),
                    predicted: 4.0
                },
            ]
        );
    }
}
