//! Revision normalization
//!
//! Turns [`RawRecord`]s into a [`RevisionTable`]: timestamps parsed, derived
//! `hour_of_day` / `calendar_day` columns computed in UTC. Records that cannot
//! be validated are dropped and counted, never merged into aggregates.
//!
//! Row order is whatever the input order was. Callers that need chronology ask
//! for [`RevisionTable::sorted_by_timestamp`].

use chrono::{DateTime, NaiveDate, SecondsFormat, Timelike, Utc};

use crate::types::{RawRecord, RevisionRecord};

/// A normalized record plus the columns derived from its timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRow {
    pub record: RevisionRecord,
    /// Hour of the edit in UTC (0-23)
    pub hour_of_day: u8,
    /// Calendar day of the edit in UTC
    pub calendar_day: NaiveDate,
}

impl RevisionRow {
    /// Derive the time columns for a record.
    pub fn from_record(record: RevisionRecord) -> Self {
        // hour() is always < 24
        let hour_of_day = record.timestamp.hour() as u8;
        let calendar_day = record.timestamp.date_naive();
        Self {
            record,
            hour_of_day,
            calendar_day,
        }
    }
}

/// Normalized revision history of one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionTable {
    rows: Vec<RevisionRow>,
    dropped_records: usize,
}

impl RevisionTable {
    /// Build a table from already-validated records.
    pub fn from_records(records: impl IntoIterator<Item = RevisionRecord>) -> Self {
        Self {
            rows: records.into_iter().map(RevisionRow::from_record).collect(),
            dropped_records: 0,
        }
    }

    pub fn rows(&self) -> &[RevisionRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RevisionRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of input records rejected while building this table.
    pub fn dropped_records(&self) -> usize {
        self.dropped_records
    }

    pub(crate) fn add_dropped(&mut self, count: usize) {
        self.dropped_records += count;
    }

    /// Rows ordered by timestamp, oldest first when `ascending`.
    ///
    /// Equal timestamps are ordered by revision id in the same direction, so
    /// the result does not depend on the API's page order.
    pub fn sorted_by_timestamp(&self, ascending: bool) -> Vec<&RevisionRow> {
        let mut rows: Vec<&RevisionRow> = self.rows.iter().collect();
        rows.sort_by_key(|row| (row.record.timestamp, row.record.revision_id));
        if !ascending {
            rows.reverse();
        }
        rows
    }

    /// Export rows back to the raw shape (timestamps as `...Z` strings).
    pub fn to_raw(&self) -> Vec<RawRecord> {
        self.rows
            .iter()
            .map(|row| RawRecord {
                revid: Some(row.record.revision_id),
                timestamp: Some(
                    row.record
                        .timestamp
                        .to_rfc3339_opts(SecondsFormat::AutoSi, true),
                ),
                user: Some(row.record.user.clone()),
                title: row.record.title.clone(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a RevisionTable {
    type Item = &'a RevisionRow;
    type IntoIter = std::slice::Iter<'a, RevisionRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Why a raw record was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    MissingRevisionId,
    MissingTimestamp,
    BadTimestamp(String),
}

/// Parse an API timestamp (`2024-01-01T10:00:00Z`) into UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Validate one raw record.
pub fn validate(raw: RawRecord) -> Result<RevisionRecord, RecordRejection> {
    let revision_id = raw.revid.ok_or(RecordRejection::MissingRevisionId)?;
    let timestamp_str = raw.timestamp.ok_or(RecordRejection::MissingTimestamp)?;
    let timestamp = parse_timestamp(&timestamp_str)
        .ok_or(RecordRejection::BadTimestamp(timestamp_str))?;

    Ok(RevisionRecord {
        revision_id,
        timestamp,
        user: raw.user.unwrap_or_default(),
        title: raw.title,
    })
}

/// Normalize raw API records into a table.
///
/// Invalid records are skipped and counted in
/// [`RevisionTable::dropped_records`].
pub fn normalize(raw: impl IntoIterator<Item = RawRecord>) -> RevisionTable {
    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in raw {
        let revid = record.revid;
        match validate(record) {
            Ok(record) => rows.push(RevisionRow::from_record(record)),
            Err(reason) => {
                tracing::warn!(?revid, ?reason, "Dropping malformed revision record");
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        tracing::info!(kept = rows.len(), dropped, "Normalized revision records");
    }

    RevisionTable {
        rows,
        dropped_records: dropped,
    }
}
