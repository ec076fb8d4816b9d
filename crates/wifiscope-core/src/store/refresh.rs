// ── Per-source refresh policy ──
//
// Decides whether a source is due, fetches it at most once per call, and
// merges the rows into the source's table. Fetch failures are absorbed
// here: the table and its timestamp stay as they were, and the source is
// simply due again on the next cycle.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::SourceTable;
use crate::error::CoreError;
use crate::source::TableRow;
use crate::status::SourceFailure;

/// Owns one [`SourceTable`] and the staleness window that governs it.
#[derive(Debug)]
pub struct Refresher<T: TableRow> {
    interval: Duration,
    table: SourceTable<T>,
    consecutive_failures: u32,
    last_error: Option<SourceFailure>,
}

impl<T: TableRow> Refresher<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            table: SourceTable::new(),
            consecutive_failures: 0,
            last_error: None,
        }
    }

    /// Refresh the table if its interval has elapsed.
    ///
    /// Returns `true` only when a fetch succeeded and its rows were merged.
    /// Returns `false` without calling `fetch` when the table is still fresh,
    /// and `false` after a failed fetch.
    pub async fn maybe_refresh<F, Fut>(&mut self, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, wifiscope_api::Error>>,
    {
        if !self.table.is_due(Instant::now(), self.interval) {
            return false;
        }

        match fetch().await {
            Ok(rows) => {
                let merged = self.table.merge(rows, Instant::now());
                if self.consecutive_failures > 0 {
                    debug!(
                        source = %T::SOURCE,
                        after_failures = self.consecutive_failures,
                        "source recovered"
                    );
                }
                self.consecutive_failures = 0;
                self.last_error = None;
                debug!(source = %T::SOURCE, merged, total = self.table.len(), "source refreshed");
                true
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                let err = CoreError::unavailable(T::SOURCE, &e);
                warn!(
                    error = %err,
                    failures = self.consecutive_failures,
                    transient = e.is_transient(),
                    "refresh failed; keeping last known rows"
                );
                self.last_error = Some(SourceFailure::from_api(&e));
                false
            }
        }
    }

    pub fn table(&self) -> &SourceTable<T> {
        &self.table
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Why the most recent fetch failed; cleared by the next success.
    pub fn last_error(&self) -> Option<&SourceFailure> {
        self.last_error.as_ref()
    }
}
