// ── Keyed source table ──
//
// Holds the latest known rows for one RouterOS dataset. Rows are only
// ever overwritten, never pruned: a client that drops out of a fetch keeps
// its last row until the key is seen again or the process restarts.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::source::TableRow;

/// In-memory table for one source, keyed by the row's natural key.
///
/// Not internally synchronized. The scheduler owns every table
/// exclusively; readers only ever see the joined snapshot.
#[derive(Debug, Clone)]
pub struct SourceTable<T: TableRow> {
    rows: HashMap<String, T>,
    /// Monotonic time of the last successful merge (drives staleness).
    last_refresh: Option<Instant>,
    /// Wall-clock time of the last successful merge (for status output).
    last_refreshed_at: Option<DateTime<Utc>>,
    /// Bumped on every merge so the scheduler can tell whether a join is owed.
    generation: u64,
}

impl<T: TableRow> Default for SourceTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableRow> SourceTable<T> {
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            last_refresh: None,
            last_refreshed_at: None,
            generation: 0,
        }
    }

    /// Build a table from literal rows, as if one fetch had returned them.
    pub fn from_rows(rows: impl IntoIterator<Item = T>) -> Self {
        let mut table = Self::new();
        table.merge(rows, Instant::now());
        table
    }

    /// Overwrite every incoming row under its key and stamp the refresh time.
    ///
    /// Returns the number of rows merged.
    pub(crate) fn merge(&mut self, rows: impl IntoIterator<Item = T>, now: Instant) -> usize {
        let mut merged = 0;
        for row in rows {
            self.rows.insert(row.key().to_owned(), row);
            merged += 1;
        }
        self.last_refresh = Some(now);
        self.last_refreshed_at = Some(Utc::now());
        self.generation += 1;
        merged
    }

    /// `true` if the table was never refreshed or `interval` has elapsed.
    pub fn is_due(&self, now: Instant, interval: Duration) -> bool {
        self.last_refresh
            .is_none_or(|last| now.saturating_duration_since(last) >= interval)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.rows.get(key)
    }

    pub fn rows(&self) -> &HashMap<String, T> {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed_at
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
