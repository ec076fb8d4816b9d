// ── Poller service ──
//
// Explicit lifecycle around the scheduler loop: construct, `start()`,
// read snapshots, `stop()`. Nothing runs in the background until
// `start()` is called, and `stop()` hands the tables back so a later
// `start()` resumes from the last known state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PollerConfig;
use crate::error::CoreError;
use crate::model::ClientMap;
use crate::scheduler::Scheduler;
use crate::source::RouterApi;
use crate::status::PollerStatus;
use crate::store::SnapshotStore;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<PollerInner>`. Hand a clone to every reader
/// (HTTP handlers, CLI commands, tests).
pub struct Poller<A: RouterApi> {
    inner: Arc<PollerInner<A>>,
}

impl<A: RouterApi> Clone for Poller<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct PollerInner<A: RouterApi> {
    api: Arc<A>,
    config: PollerConfig,
    store: Arc<SnapshotStore>,
    status: Arc<watch::Sender<PollerStatus>>,
    cancel: CancellationToken,
    /// Child token for the current run; cancelled on stop, replaced on
    /// start (avoids permanent cancellation).
    cancel_child: Mutex<CancellationToken>,
    /// Parked scheduler while stopped.
    scheduler: Mutex<Option<Scheduler<A>>>,
    /// Running scheduler task; resolves to the scheduler on stop.
    task: Mutex<Option<JoinHandle<Scheduler<A>>>>,
}

impl<A: RouterApi> Drop for PollerInner<A> {
    fn drop(&mut self) {
        // Last handle gone: make sure the background loop does not outlive us.
        self.cancel.cancel();
    }
}

impl<A: RouterApi> Poller<A> {
    /// Create a poller. Does NOT start polling -- call [`start()`](Self::start).
    pub fn new(api: A, config: PollerConfig) -> Self {
        let api = Arc::new(api);
        let store = Arc::new(SnapshotStore::new());
        let (status, _) = watch::channel(PollerStatus::default());
        let status = Arc::new(status);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();
        let scheduler = Scheduler::new(
            Arc::clone(&api),
            &config,
            Arc::clone(&store),
            Arc::clone(&status),
        );

        Self {
            inner: Arc::new(PollerInner {
                api,
                config,
                store,
                status,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                scheduler: Mutex::new(Some(scheduler)),
                task: Mutex::new(None),
            }),
        }
    }

    /// Access the poller configuration.
    pub fn config(&self) -> &PollerConfig {
        &self.inner.config
    }

    /// Access the underlying SnapshotStore.
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the scheduler loop. The first cycle runs immediately.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.inner.config.validate()?;

        let mut task = self.inner.task.lock().await;
        if task.is_some() {
            return Err(CoreError::AlreadyRunning);
        }

        let scheduler = self.inner.scheduler.lock().await.take().unwrap_or_else(|| {
            // The previous scheduler task panicked and took its tables with it.
            Scheduler::new(
                Arc::clone(&self.inner.api),
                &self.inner.config,
                Arc::clone(&self.inner.store),
                Arc::clone(&self.inner.status),
            )
        });

        // Fresh child token for this run (supports restart).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        *task = Some(tokio::spawn(scheduler.run(self.inner.config.cadence, child)));
        info!(cadence = ?self.inner.config.cadence, "poller started");
        Ok(())
    }

    /// Stop the scheduler loop and wait for it to wind down.
    ///
    /// Interrupts the inter-cycle sleep (and any in-flight fetches). The
    /// published snapshot stays readable after stop. No-op if not running.
    ///
    /// The task lock is held until the scheduler is parked again, so a
    /// concurrent `start()` resumes with the same tables.
    pub async fn stop(&self) {
        let mut task = self.inner.task.lock().await;
        self.inner.cancel_child.lock().await.cancel();

        let Some(handle) = task.take() else {
            return;
        };

        match handle.await {
            Ok(scheduler) => {
                debug!(cycles = scheduler.cycles(), "scheduler parked");
                *self.inner.scheduler.lock().await = Some(scheduler);
            }
            Err(e) => {
                warn!(error = %e, "scheduler task ended abnormally; tables will be rebuilt");
                self.inner.status.send_modify(|s| s.running = false);
            }
        }
        drop(task);
        info!("poller stopped");
    }

    /// Whether the scheduler loop is currently spawned.
    pub async fn is_running(&self) -> bool {
        self.inner.task.lock().await.is_some()
    }

    // ── Snapshot access ──────────────────────────────────────────────

    /// The current client view, waiting for the first join if needed.
    pub async fn snapshot(&self) -> Arc<ClientMap> {
        self.inner.store.snapshot().await
    }

    /// Bounded-wait variant of [`snapshot()`](Self::snapshot).
    pub async fn snapshot_timeout(&self, wait: Duration) -> Result<Arc<ClientMap>, CoreError> {
        self.inner.store.snapshot_timeout(wait).await
    }

    /// Readiness probe: `true` once the first join has been published.
    pub fn is_ready(&self) -> bool {
        self.inner.store.is_ready()
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Subscribe to status updates (one per cycle).
    pub fn status(&self) -> watch::Receiver<PollerStatus> {
        self.inner.status.subscribe()
    }

    /// The latest status.
    pub fn current_status(&self) -> PollerStatus {
        self.inner.status.borrow().clone()
    }
}
