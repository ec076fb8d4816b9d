//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wifiscope_config::ConfigError;
use wifiscope_core::{CoreError, FailureKind, PollerStatus};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the router at {url}")]
    #[diagnostic(
        code(wifiscope::connection_failed),
        help(
            "Check that the router is up and its REST API (www or www-ssl service) is enabled.\n\
             Last error: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for user '{user}'")]
    #[diagnostic(
        code(wifiscope::auth_failed),
        help(
            "Verify the RouterOS user and password.\n\
             Store a password with: wifiscope config set-password\n\
             Or set WIFISCOPE_PASSWORD."
        )
    )]
    AuthFailed { user: String },

    // ── Readiness ────────────────────────────────────────────────────
    #[error("No client data after waiting {seconds}s")]
    #[diagnostic(
        code(wifiscope::timeout),
        help(
            "The router did not answer every table in time.\n\
             {details}\n\
             Increase --wait, or run with -v to see each fetch."
        )
    )]
    Timeout { seconds: u64, details: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Router API error: {message}")]
    #[diagnostic(code(wifiscope::api_error))]
    ApiError { message: String },

    // ── Validation / Configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wifiscope::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(wifiscope::config),
        help("Show the effective configuration with: wifiscope config show")
    )]
    Config(Box<ConfigError>),

    // ── Server ───────────────────────────────────────────────────────
    #[error("Could not listen on {addr}")]
    #[diagnostic(code(wifiscope::bind), help("Pick another address with --listen."))]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Explain a snapshot that never arrived, using what the poller saw.
    ///
    /// An authentication failure on any source outranks connection
    /// failures, which outrank a plain timeout.
    pub fn not_ready(seconds: u64, status: &PollerStatus, url: &str, user: &str) -> Self {
        let failures: Vec<_> = status.failures().collect();

        if failures
            .iter()
            .any(|(_, f)| f.kind == FailureKind::Authentication)
        {
            return Self::AuthFailed { user: user.into() };
        }

        if let Some((_, f)) = failures
            .iter()
            .find(|(_, f)| f.kind == FailureKind::Connection)
        {
            return Self::ConnectionFailed {
                url: url.into(),
                reason: f.message.clone(),
            };
        }

        let details = if failures.is_empty() {
            "No fetch has failed yet.".to_owned()
        } else {
            failures
                .iter()
                .map(|(source, f)| format!("  {source}: {}", f.message))
                .collect::<Vec<_>>()
                .join("\n")
        };
        Self::Timeout { seconds, details }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotReady { waited_secs } => Self::Timeout {
                seconds: waited_secs,
                details: String::new(),
            },

            CoreError::Config { message } => Self::Validation {
                field: "polling".into(),
                reason: message,
            },

            other @ (CoreError::SourceUnavailable { .. } | CoreError::AlreadyRunning) => {
                Self::ApiError {
                    message: other.to_string(),
                }
            }
        }
    }
}
