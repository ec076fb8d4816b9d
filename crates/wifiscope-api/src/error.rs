use thiserror::Error;

/// Top-level error type for the `wifiscope-api` crate.
///
/// Covers every way a single RouterOS REST call can fail: authentication,
/// transport, a RouterOS error object, or a body that does not parse.
/// `wifiscope-core` folds all of these into one "source unavailable"
/// condition.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// RouterOS rejected the basic-auth credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── RouterOS ────────────────────────────────────────────────────
    /// Non-success response, carrying the RouterOS `message`/`detail` when present.
    #[error("RouterOS API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the credentials were rejected.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying soon.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code, if the router answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Authentication { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Api {
            status: 503,
            message: "busy".into(),
        };
        assert!(err.is_transient());
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn client_errors_are_not_transient() {
        let err = Error::Api {
            status: 400,
            message: "no such command".into(),
        };
        assert!(!err.is_transient());

        let auth = Error::Authentication {
            message: "Unauthorized".into(),
        };
        assert!(auth.is_auth_failure());
        assert!(!auth.is_transient());
    }
}
