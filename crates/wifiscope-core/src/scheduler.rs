// ── Scheduler cycle ──
//
// Owns the four refreshers. Each cycle refreshes whatever is due, then
// joins and publishes if any table changed since the last join. The
// tables are never shared: readers only see what `publish` hands out.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use wifiscope_api::{DhcpLease, RegistrationEntry, WifiInterface, WifiRadio};

use crate::config::PollerConfig;
use crate::join;
use crate::model::SourceKind;
use crate::source::{RouterApi, TableRow};
use crate::status::{PollerStatus, SourceStatus};
use crate::store::{Refresher, SnapshotStore, SourceTable};

/// What one call to [`Scheduler::run_cycle`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Sources whose fetch succeeded and merged this cycle.
    pub refreshed: Vec<SourceKind>,
    /// Whether a new view was joined and published.
    pub published: bool,
    /// Whether that publish released the first-run gate.
    pub first_publish: bool,
}

/// The refresh-then-join loop body and the tables it owns.
pub struct Scheduler<A: RouterApi> {
    api: Arc<A>,
    leases: Refresher<DhcpLease>,
    registrations: Refresher<RegistrationEntry>,
    radios: Refresher<WifiRadio>,
    interfaces: Refresher<WifiInterface>,
    store: Arc<SnapshotStore>,
    status: Arc<watch::Sender<PollerStatus>>,
    recompute_every_cycle: bool,
    /// Sum of table generations at the last join (0 = never joined).
    joined_generation: u64,
    cycles: u64,
}

impl<A: RouterApi> Scheduler<A> {
    pub fn new(
        api: Arc<A>,
        config: &PollerConfig,
        store: Arc<SnapshotStore>,
        status: Arc<watch::Sender<PollerStatus>>,
    ) -> Self {
        Self {
            api,
            leases: Refresher::new(config.lease_interval),
            registrations: Refresher::new(config.registration_interval),
            radios: Refresher::new(config.radio_interval),
            interfaces: Refresher::new(config.interface_interval),
            store,
            status,
            recompute_every_cycle: config.recompute_every_cycle,
            joined_generation: 0,
            cycles: 0,
        }
    }

    /// Refresh every due source, then join and publish if anything changed.
    ///
    /// The four fetches run concurrently; all of them finish before the
    /// join reads the tables.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let api = &*self.api;
        let (leases, registrations, radios, interfaces) = tokio::join!(
            self.leases.maybe_refresh(|| api.dhcp_leases()),
            self.registrations.maybe_refresh(|| api.registration_table()),
            self.radios.maybe_refresh(|| api.wifi_radios()),
            self.interfaces.maybe_refresh(|| api.wifi_interfaces()),
        );

        let refreshed: Vec<SourceKind> = [
            (SourceKind::Leases, leases),
            (SourceKind::Registrations, registrations),
            (SourceKind::Radios, radios),
            (SourceKind::Interfaces, interfaces),
        ]
        .into_iter()
        .filter_map(|(source, changed)| changed.then_some(source))
        .collect();

        // Generations, not this cycle's flags, decide whether a join is owed:
        // a cycle cancelled between merge and publish must still be joined.
        let generation = self.generation();
        let owed = generation != self.joined_generation || self.recompute_every_cycle;
        let mut outcome = CycleOutcome {
            refreshed,
            ..CycleOutcome::default()
        };
        let mut published_clients = None;

        if generation > 0 && owed {
            let view = join::recompute(
                self.registrations.table().rows(),
                self.leases.table().rows(),
                self.radios.table().rows(),
                self.interfaces.table().rows(),
            );
            let clients = view.len();
            outcome.first_publish = self.store.publish(view);
            outcome.published = true;
            self.joined_generation = generation;
            published_clients = Some(clients);

            if outcome.first_publish {
                info!(clients, "first snapshot published; readers released");
            } else {
                debug!(clients, refreshed = ?outcome.refreshed, "snapshot published");
            }
        }

        self.cycles += 1;
        self.report(published_clients);
        outcome
    }

    /// Run cycles every `cadence` until `cancel` fires, then hand the
    /// scheduler (and its tables) back.
    ///
    /// Cancellation interrupts both the inter-cycle sleep and an in-flight
    /// cycle; merges are all-or-nothing per source, so an interrupted cycle
    /// leaves consistent tables and its join is picked up next time.
    pub async fn run(mut self, cadence: Duration, cancel: CancellationToken) -> Self {
        let mut interval = tokio::time::interval(cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.status.send_modify(|s| s.running = true);
        debug!(?cadence, "scheduler loop started");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        _ = self.run_cycle() => {}
                    }
                }
            }
        }

        self.status.send_modify(|s| s.running = false);
        debug!(cycles = self.cycles, "scheduler loop stopped");
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn leases(&self) -> &SourceTable<DhcpLease> {
        self.leases.table()
    }

    pub fn registrations(&self) -> &SourceTable<RegistrationEntry> {
        self.registrations.table()
    }

    pub fn radios(&self) -> &SourceTable<WifiRadio> {
        self.radios.table()
    }

    pub fn interfaces(&self) -> &SourceTable<WifiInterface> {
        self.interfaces.table()
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn generation(&self) -> u64 {
        self.leases.table().generation()
            + self.registrations.table().generation()
            + self.radios.table().generation()
            + self.interfaces.table().generation()
    }

    fn report(&self, published_clients: Option<usize>) {
        let sources = vec![
            source_status(&self.leases),
            source_status(&self.registrations),
            source_status(&self.radios),
            source_status(&self.interfaces),
        ];
        let ready = self.store.is_ready();
        let cycles = self.cycles;

        self.status.send_modify(|status| {
            status.ready = ready;
            status.cycles = cycles;
            status.sources = sources;
            if let Some(clients) = published_clients {
                status.clients = clients;
                status.last_published_at = Some(Utc::now());
            }
        });
    }
}

fn source_status<T: TableRow>(refresher: &Refresher<T>) -> SourceStatus {
    SourceStatus {
        source: T::SOURCE,
        rows: refresher.table().len(),
        interval_secs: refresher.interval().as_secs(),
        last_refreshed_at: refresher.table().last_refreshed_at(),
        consecutive_failures: refresher.consecutive_failures(),
        last_error: refresher.last_error().cloned(),
    }
}
