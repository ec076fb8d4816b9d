// ── Storage layer ──
//
// Per-source tables, the refresh policy that fills them, and the
// published snapshot readers consume.

mod refresh;
mod snapshot;
mod table;

pub use refresh::Refresher;
pub use snapshot::SnapshotStore;
pub use table::SourceTable;
