// ── Published snapshot + first-run gate ──
//
// A `watch` channel holds the current joined view. `None` means nothing
// has been published yet (UNINITIALIZED); the first `publish` flips it to
// `Some` (READY) and it never goes back. Readers clone an `Arc` out of the
// channel, so the writer only holds the lock for the pointer swap.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::CoreError;
use crate::model::ClientMap;

/// The currently published client view, shared with any number of readers.
#[derive(Debug)]
pub struct SnapshotStore {
    current: watch::Sender<Option<Arc<ClientMap>>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    /// Replace the published view in one step.
    ///
    /// Returns `true` if this was the first publish, i.e. the call that
    /// released the first-run gate.
    pub fn publish(&self, view: ClientMap) -> bool {
        // `send_replace` updates unconditionally, even with zero receivers.
        self.current.send_replace(Some(Arc::new(view))).is_none()
    }

    /// Whether the first join has been published.
    pub fn is_ready(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// The current view, or `None` before the first publish. Never waits.
    pub fn try_snapshot(&self) -> Option<Arc<ClientMap>> {
        self.current.borrow().clone()
    }

    /// The current view, waiting for the first publish if necessary.
    ///
    /// There is no timeout: if the router is unreachable from startup this
    /// waits forever. Use [`snapshot_timeout`](Self::snapshot_timeout) when
    /// the caller needs liveness.
    pub async fn snapshot(&self) -> Arc<ClientMap> {
        let mut rx = self.current.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(view) = current {
                return view;
            }
            if rx.changed().await.is_err() {
                // The sender lives in `self`, so this cannot happen while we
                // are borrowed. Park rather than invent an empty view.
                std::future::pending::<()>().await;
            }
        }
    }

    /// Like [`snapshot`](Self::snapshot) but gives up after `wait`.
    pub async fn snapshot_timeout(&self, wait: Duration) -> Result<Arc<ClientMap>, CoreError> {
        tokio::time::timeout(wait, self.snapshot())
            .await
            .map_err(|_| CoreError::NotReady {
                waited_secs: wait.as_secs(),
            })
    }

    /// Subscribe to every publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<ClientMap>>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ClientView;

    fn view(macs: &[&str]) -> ClientMap {
        macs.iter()
            .map(|mac| {
                (
                    (*mac).to_owned(),
                    ClientView {
                        mac_address: (*mac).to_owned(),
                        ..ClientView::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn starts_uninitialized() {
        let store = SnapshotStore::new();
        assert!(!store.is_ready());
        assert!(store.try_snapshot().is_none());
    }

    #[test]
    fn only_first_publish_releases_gate() {
        let store = SnapshotStore::new();
        assert!(store.publish(view(&["AA"])));
        assert!(!store.publish(view(&["BB"])));
        assert!(store.is_ready());
        assert!(store.try_snapshot().unwrap().contains_key("BB"));
    }

    #[tokio::test]
    async fn snapshot_returns_immediately_once_ready() {
        let store = SnapshotStore::new();
        store.publish(view(&["AA"]));
        let snap = tokio_test::task::spawn(store.snapshot()).poll();
        match snap {
            std::task::Poll::Ready(v) => assert!(v.contains_key("AA")),
            std::task::Poll::Pending => panic!("snapshot must not wait once ready"),
        }
    }

    #[tokio::test]
    async fn snapshot_waits_for_first_publish() {
        let store = Arc::new(SnapshotStore::new());

        let reader = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.snapshot().await })
        };
        tokio::task::yield_now().await;
        assert!(!reader.is_finished());

        store.publish(view(&["AA", "BB"]));
        let snap = reader.await.unwrap();
        assert_eq!(snap.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_timeout_reports_not_ready() {
        let store = SnapshotStore::new();
        let err = store
            .snapshot_timeout(Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotReady { waited_secs: 5 }));
    }

    #[tokio::test]
    async fn readers_keep_their_snapshot_across_publishes() {
        let store = SnapshotStore::new();
        store.publish(view(&["AA"]));
        let before = store.snapshot().await;

        store.publish(view(&["BB"]));
        let after = store.snapshot().await;

        assert!(before.contains_key("AA") && !before.contains_key("BB"));
        assert!(after.contains_key("BB") && !after.contains_key("AA"));
    }
}
