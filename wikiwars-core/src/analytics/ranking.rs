//! Top-N rankings of contributors and articles.
//!
//! Entries are sorted by count, highest first. Ties keep the order in which
//! each name first appears in the table, so the same table always ranks the
//! same way.

use serde::Serialize;
use std::collections::HashMap;

use crate::normalize::RevisionTable;

/// Ranking length the dashboard shows unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 10;

/// One ranked entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub name: String,
    pub count: usize,
}

/// Entities ordered by edit count, highest first, at most N long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TopNRanking {
    entries: Vec<RankingEntry>,
}

impl TopNRanking {
    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(name, count)` pairs, for callers that want plain tuples.
    pub fn to_pairs(&self) -> Vec<(String, usize)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.count))
            .collect()
    }
}

/// Count names, then rank them.
fn rank<'a>(names: impl Iterator<Item = &'a str>, n: usize) -> TopNRanking {
    // name -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, name) in names.enumerate() {
        counts.entry(name).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(name, (count, first))| (name, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(n);

    TopNRanking {
        entries: ranked
            .into_iter()
            .map(|(name, count, _)| RankingEntry {
                name: name.to_string(),
                count,
            })
            .collect(),
    }
}

/// Editors with the most revisions; rows with a hidden editor are skipped.
pub fn top_contributors(table: &RevisionTable, n: usize) -> TopNRanking {
    rank(
        table
            .iter()
            .map(|row| row.record.user.as_str())
            .filter(|user| !user.is_empty()),
        n,
    )
}

/// Articles with the most contributions; rows without a title are skipped.
pub fn top_articles(table: &RevisionTable, n: usize) -> TopNRanking {
    rank(table.iter().filter_map(|row| row.record.title.as_deref()), n)
}
