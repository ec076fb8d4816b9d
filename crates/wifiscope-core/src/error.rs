// ── Core error types ──
//
// Errors from wifiscope-core. Fetch failures never reach readers: the
// refresher logs them and records a `SourceFailure` in the status instead.

use thiserror::Error;

use crate::model::SourceKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Source errors ────────────────────────────────────────────────
    /// A fetch for one source failed. Absorbed by the refresher; it only
    /// ever reaches logs.
    #[error("{table} source unavailable: {reason}")]
    SourceUnavailable { table: SourceKind, reason: String },

    // ── Snapshot errors ──────────────────────────────────────────────
    #[error("No snapshot published after waiting {waited_secs}s")]
    NotReady { waited_secs: u64 },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Poller is already running")]
    AlreadyRunning,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Wrap a failed fetch of `table`.
    pub fn unavailable(table: SourceKind, err: &wifiscope_api::Error) -> Self {
        Self::SourceUnavailable {
            table,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_names_the_table() {
        let api = wifiscope_api::Error::Api {
            status: 503,
            message: "busy".into(),
        };
        let err = CoreError::unavailable(SourceKind::Radios, &api);
        assert_eq!(
            err.to_string(),
            "radios source unavailable: RouterOS API error (HTTP 503): busy"
        );
    }
}
