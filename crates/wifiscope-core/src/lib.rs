//! Refresh-and-join cache between `wifiscope-api` and HTTP/CLI consumers.
//!
//! This crate owns the only stateful logic in wifiscope:
//!
//! - **Source tables** ([`store::SourceTable`]): one keyed table per
//!   RouterOS dataset (DHCP leases, registrations, radios, interfaces),
//!   each with its own last-refresh timestamp.
//!
//! - **[`Refresher`]**: per-source staleness policy. Fetches only when
//!   the source's interval has elapsed, merges rows by natural key, and
//!   absorbs fetch failures so the last known rows stay authoritative.
//!
//! - **[`join`]**: pure recomputation of the per-client view from the
//!   four tables. Registrations are the spine; leases and radios enrich.
//!
//! - **[`SnapshotStore`]**: the published view. Readers never block once
//!   the first join has been published; before that they wait on the
//!   first-run gate.
//!
//! - **[`Poller`]**: explicitly constructed service with `start()` /
//!   `stop()` that drives the [`Scheduler`] cycle on a fixed cadence.

pub mod config;
pub mod error;
pub mod join;
pub mod model;
pub mod poller;
pub mod scheduler;
pub mod source;
pub mod status;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::PollerConfig;
pub use error::CoreError;
pub use model::{ClientMap, ClientView, SourceKind};
pub use poller::Poller;
pub use scheduler::{CycleOutcome, Scheduler};
pub use source::{RouterApi, TableRow};
pub use status::{FailureKind, PollerStatus, SourceFailure, SourceStatus};
pub use store::{Refresher, SnapshotStore, SourceTable};
