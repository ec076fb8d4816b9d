// ── Poller status ──
//
// Readiness and per-source freshness, observable through a `watch`
// channel so health endpoints never touch the tables themselves.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::SourceKind;

/// Broad class of a failed fetch, enough to tell a bad password from a
/// router that is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    Authentication,
    Connection,
    Timeout,
    Api,
}

/// The most recent fetch failure of a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SourceFailure {
    pub fn from_api(err: &wifiscope_api::Error) -> Self {
        let kind = match err {
            wifiscope_api::Error::Authentication { .. } => FailureKind::Authentication,
            wifiscope_api::Error::Transport(e) if e.is_timeout() => FailureKind::Timeout,
            wifiscope_api::Error::Transport(e) if e.is_connect() => FailureKind::Connection,
            wifiscope_api::Error::Tls(_) => FailureKind::Connection,
            _ => FailureKind::Api,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Freshness of one source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatus {
    pub source: SourceKind,
    pub rows: usize,
    pub interval_secs: u64,
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<SourceFailure>,
}

/// Snapshot of the scheduler's progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollerStatus {
    /// `true` once the first join has been published.
    pub ready: bool,
    pub running: bool,
    pub cycles: u64,
    pub clients: usize,
    pub last_published_at: Option<DateTime<Utc>>,
    pub sources: Vec<SourceStatus>,
}

impl PollerStatus {
    pub fn source(&self, source: SourceKind) -> Option<&SourceStatus> {
        self.sources.iter().find(|s| s.source == source)
    }

    /// Current failures, one per failing source.
    pub fn failures(&self) -> impl Iterator<Item = (SourceKind, &SourceFailure)> {
        self.sources
            .iter()
            .filter_map(|s| s.last_error.as_ref().map(|f| (s.source, f)))
    }
}
