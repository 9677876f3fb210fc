//! # Service: one evening, wired and run to completion.
//!
//! [`Service`] owns the configuration, the event bus and the recorder roster.
//! [`Service::run`] builds a fresh store and rendezvous catalogue, spawns the
//! staff and every party as tokio tasks, and joins them all.
//!
//! ## Architecture
//! ```text
//! Service::run()
//!   ├─ Store + SyncSet (fresh per run)
//!   ├─ listener ── bus.subscribe() ──► RecorderSet ──► recorders
//!   ├─ JoinSet ── receptionist, waiter, chef, party-0..party-n
//!   │      │
//!   │      ├─ all Ok ──► ServiceClosed + Report
//!   │      └─ any Err ─► abort rest, ServiceFailed, Err
//!   └─ drain listener, shut recorder workers down
//! ```
//!
//! ## Rules
//! - The listener subscribes before the first publish, so recorders see the
//!   whole evening from `ServiceOpened` on.
//! - The listener stops after forwarding `ServiceClosed` or `ServiceFailed`;
//!   `run` then drains the recorder queues, so when it returns every recorder
//!   has processed every delivered event.
//! - The first actor error aborts the remaining actors. Their interrupted
//!   protocol state stays in the record for inspection.

use std::sync::Arc;

use tokio::task::{JoinHandle, JoinSet};

use crate::actors::{Chef, Outcome, Party, Receptionist, Waiter};
use crate::config::Config;
use crate::error::{ConfigError, ServiceError};
use crate::events::{Bus, Event, EventKind};
use crate::recorders::{Recorder, RecorderSet};
use crate::state::{FloorState, Store};
use crate::sync::SyncSet;

/// What a completed evening looks like from the outside.
#[derive(Debug, Clone)]
pub struct Report {
    /// Parties that ran all six stages, always the full roster on success.
    pub parties_served: usize,
    /// Desk calls the receptionist handled, `2 × parties`.
    pub desk_handled: u32,
    /// Calls the waiter handled, `2 × parties`.
    pub waiter_handled: u32,
    /// Orders the chef cooked, `parties`.
    pub kitchen_cooked: u32,
    /// The floor as it stood when the last actor finished.
    pub closing: FloorState,
}

/// Builds and runs one evening of service.
///
/// ### Usage
/// ```rust,no_run
/// use brigade::{Config, Service};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let report = Service::new(Config::default())?.run().await?;
/// assert_eq!(report.parties_served, 5);
/// # Ok(())
/// # }
/// ```
pub struct Service {
    cfg: Config,
    bus: Bus,
    recorders: Vec<Arc<dyn Recorder>>,
}

impl Service {
    /// Validates `cfg` and prepares a service around it.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Ok(Self {
            cfg,
            bus,
            recorders: Vec::new(),
        })
    }

    /// Adds a recorder to the roster. Chainable.
    #[must_use]
    pub fn with_recorder(mut self, recorder: Arc<dyn Recorder>) -> Self {
        self.recorders.push(recorder);
        self
    }

    /// The event bus, for subscribing directly instead of (or besides)
    /// attaching recorders.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The validated configuration this service runs on.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Runs one complete evening: every party arrives, dines and leaves.
    ///
    /// Each call builds a fresh floor and rendezvous catalogue, so a service
    /// can be run repeatedly. Returns the [`Report`] once every actor has
    /// finished and every recorder has drained.
    ///
    /// The first actor error is returned after the remaining actors are
    /// aborted and a `ServiceFailed` event is delivered.
    pub async fn run(&self) -> Result<Report, ServiceError> {
        let parties = self.cfg.party_count();
        let store = Arc::new(Store::new(&self.cfg, self.bus.clone()));
        let sync = Arc::new(SyncSet::new(parties, self.cfg.tables));
        let listener = self.recorder_listener();

        self.bus.publish(Event::new(EventKind::ServiceOpened));
        store.record().await;

        let mut tasks = JoinSet::new();
        self.spawn_actors(&mut tasks, &store, &sync);

        self.oversee(tasks, &store, listener).await
    }

    /// Joins every actor, then closes the evening out.
    ///
    /// On the first error the remaining tasks are aborted and drained, a
    /// `ServiceFailed` event is flushed through the recorders, and that
    /// error comes back. Otherwise the closing floor is snapshotted,
    /// `ServiceClosed` goes out, and the [`Report`] is built.
    async fn oversee(
        &self,
        mut tasks: JoinSet<Result<Outcome, ServiceError>>,
        store: &Store,
        listener: JoinHandle<RecorderSet>,
    ) -> Result<Report, ServiceError> {
        let mut parties_served = 0usize;
        let mut desk_handled = 0u32;
        let mut waiter_handled = 0u32;
        let mut kitchen_cooked = 0u32;
        let mut failure: Option<ServiceError> = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(Outcome::Party(_))) => parties_served += 1,
                Ok(Ok(Outcome::Receptionist { handled })) => desk_handled = handled,
                Ok(Ok(Outcome::Waiter { handled })) => waiter_handled = handled,
                Ok(Ok(Outcome::Chef { cooked })) => kitchen_cooked = cooked,
                Ok(Err(err)) => {
                    failure = Some(err);
                    break;
                }
                Err(join_err) => {
                    failure = Some(ServiceError::ActorLost {
                        actor: join_err.to_string(),
                    });
                    break;
                }
            }
        }

        if let Some(err) = failure {
            tasks.abort_all();
            while tasks.join_next().await.is_some() {}
            self.bus.publish(
                Event::new(EventKind::ServiceFailed)
                    .with_note(format!("{}: {}", err.as_label(), err.as_message())),
            );
            Self::drain(listener).await;
            return Err(err);
        }

        let closing = store.snapshot().await;
        self.bus
            .publish(Event::new(EventKind::ServiceClosed).with_floor(Arc::new(closing.clone())));
        Self::drain(listener).await;

        Ok(Report {
            parties_served,
            desk_handled,
            waiter_handled,
            kitchen_cooked,
            closing,
        })
    }

    /// Subscribes to the bus and forwards events into the recorder fan-out.
    ///
    /// The worker returns the set after forwarding a terminal event, so the
    /// caller can drain and shut the recorders down deterministically.
    fn recorder_listener(&self) -> JoinHandle<RecorderSet> {
        let mut rx = self.bus.subscribe();
        let set = RecorderSet::new(self.recorders.clone(), self.bus.clone());

        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                let last = matches!(
                    ev.kind,
                    EventKind::ServiceClosed | EventKind::ServiceFailed
                );
                set.emit_arc(Arc::new(ev));
                if last {
                    break;
                }
            }
            set
        })
    }

    /// Spawns the three staff actors and one task per party.
    fn spawn_actors(
        &self,
        tasks: &mut JoinSet<Result<Outcome, ServiceError>>,
        store: &Arc<Store>,
        sync: &Arc<SyncSet>,
    ) {
        let parties = self.cfg.party_count();

        tasks.spawn(
            Receptionist::new(
                store.clone(),
                sync.clone(),
                self.bus.clone(),
                parties,
                self.cfg.tables,
            )
            .run(),
        );
        tasks.spawn(Waiter::new(store.clone(), sync.clone(), self.bus.clone(), parties).run());
        tasks.spawn(
            Chef::new(
                store.clone(),
                sync.clone(),
                self.bus.clone(),
                parties,
                self.cfg.cook_limit,
            )
            .run(),
        );
        for id in 0..parties {
            tasks.spawn(Party::new(id, store.clone(), sync.clone(), self.bus.clone(), &self.cfg).run());
        }
    }

    /// Waits for the listener to hand the set back, then drains its queues.
    async fn drain(listener: JoinHandle<RecorderSet>) {
        if let Ok(set) = listener.await {
            set.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorders::Transcript;
    use crate::state::PartyStatus;
    use std::time::Duration;
    use tokio::time::timeout;

    /// Zero-spread roster so only the staged arrival offsets order events.
    fn staged(tables: usize, arrivals_ms: &[u64], meals_ms: &[u64]) -> Config {
        let mut cfg = Config::uniform(arrivals_ms.len(), tables);
        cfg.arrivals = arrivals_ms
            .iter()
            .map(|&ms| Duration::from_millis(ms))
            .collect();
        cfg.meals = meals_ms
            .iter()
            .map(|&ms| Duration::from_millis(ms))
            .collect();
        cfg.arrival_spread = Duration::ZERO;
        cfg.meal_spread = Duration::ZERO;
        cfg.cook_limit = Duration::from_millis(5);
        cfg
    }

    async fn run_with_transcript(cfg: Config) -> (Report, Arc<Transcript>) {
        let transcript = Arc::new(Transcript::new());
        let service = Service::new(cfg)
            .expect("valid test config")
            .with_recorder(transcript.clone());
        let report = timeout(Duration::from_secs(10), service.run())
            .await
            .expect("an evening must always end")
            .expect("no actor may fail");
        (report, transcript)
    }

    fn first_seating_index(snaps: &[Arc<FloorState>], party: usize) -> usize {
        snaps
            .iter()
            .position(|f| f.parties[party].table.is_some())
            .unwrap_or(usize::MAX)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(matches!(
            Service::new(Config::uniform(0, 2)),
            Err(ConfigError::NoParties)
        ));
        assert!(matches!(
            Service::new(Config::uniform(3, 0)),
            Err(ConfigError::NoTables)
        ));
        // Three tables with three parties could stall the kitchen handoff.
        assert!(matches!(
            Service::new(Config::uniform(3, 3)),
            Err(ConfigError::TooManyTables { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_full_evening_three_parties_two_tables() {
        let cfg = staged(2, &[5, 5, 5], &[20, 20, 20]);
        let (report, transcript) = run_with_transcript(cfg).await;

        assert_eq!(report.parties_served, 3);
        assert_eq!(report.desk_handled, 6);
        assert_eq!(report.waiter_handled, 6);
        assert_eq!(report.kitchen_cooked, 3);

        // Closing floor: everyone gone, everything released.
        assert_eq!(report.closing.seated_count(), 0);
        assert_eq!(report.closing.waiting, 0);
        assert!(report.closing.desk_inbox.is_none());
        assert!(report.closing.waiter_inbox.is_none());
        assert!(!report.closing.order_pending);
        assert!(
            report
                .closing
                .parties
                .iter()
                .all(|p| p.status == PartyStatus::Leaving)
        );

        // Every intermediate floor respects the table pool.
        let snaps = transcript.snapshots();
        assert!(!snaps.is_empty());
        for floor in &snaps {
            assert!(
                floor.seated_count() <= 2,
                "never more seated parties than tables"
            );
            let eating = floor
                .parties
                .iter()
                .filter(|p| p.status == PartyStatus::Eating)
                .count();
            assert!(eating <= 2, "never more eating parties than tables");
            let mut held: Vec<_> = floor.parties.iter().filter_map(|p| p.table).collect();
            held.sort_unstable();
            held.dedup();
            assert_eq!(
                held.len(),
                floor.seated_count(),
                "a table must never be assigned twice at once"
            );
            assert!(held.iter().all(|&t| t < 2), "table indices stay in range");
        }

        // Each party passes every stage exactly once, in protocol order.
        let protocol = [
            PartyStatus::Traveling,
            PartyStatus::AtReception,
            PartyStatus::Ordering,
            PartyStatus::WaitingForFood,
            PartyStatus::Eating,
            PartyStatus::CheckingOut,
            PartyStatus::Leaving,
        ];
        for party in 0..3 {
            let mut stages: Vec<PartyStatus> = Vec::new();
            for floor in &snaps {
                let status = floor.parties[party].status;
                if stages.last() != Some(&status) {
                    stages.push(status);
                }
            }
            assert_eq!(
                stages, protocol,
                "party {party} must move through the stages without skips or regressions"
            );
        }

        // Lifecycle bookkeeping.
        assert_eq!(transcript.count(EventKind::ServiceOpened), 1);
        assert_eq!(transcript.count(EventKind::ServiceClosed), 1);
        let finished = transcript.finished();
        assert_eq!(finished.len(), 6);
        for name in ["receptionist", "waiter", "chef", "party-0", "party-1", "party-2"] {
            assert!(finished.iter().any(|f| f == name), "{name} must finish");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_earliest_arrival_takes_the_lowest_table() {
        // Party 2 walks in first, then party 0; party 1 finds the floor full.
        let cfg = staged(2, &[80, 160, 0], &[300, 40, 300]);
        let (report, transcript) = run_with_transcript(cfg).await;
        assert_eq!(report.parties_served, 3);

        let snaps = transcript.snapshots();
        let table_of = |party: usize| snaps.iter().find_map(|f| f.parties[party].table);

        assert_eq!(table_of(2), Some(0), "first to arrive takes table 0");
        assert_eq!(table_of(0), Some(1), "second to arrive takes table 1");
        assert!(
            snaps.iter().any(|f| f.waiting == 1),
            "the third party must queue while both tables are held"
        );
        assert!(table_of(1).is_some(), "the queued party is seated eventually");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_freed_table_goes_to_lowest_queued_index() {
        // One table. Party 2 holds it; party 1 queues first, party 0 second.
        let cfg = staged(1, &[160, 80, 0], &[30, 30, 400]);
        let (report, transcript) = run_with_transcript(cfg).await;
        assert_eq!(report.parties_served, 3);

        let snaps = transcript.snapshots();
        assert!(
            snaps.iter().any(|f| f.waiting == 2),
            "both latecomers must queue behind the held table"
        );
        // The grant scans party indices from zero, so party 0 overtakes
        // party 1 even though party 1 was queued first.
        assert!(
            first_seating_index(&snaps, 0) < first_seating_index(&snaps, 1),
            "the freed table goes to the lowest queued index, not to arrival order"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_actor_failure_aborts_the_rest() {
        let transcript = Arc::new(Transcript::new());
        let service = Service::new(staged(2, &[5, 5], &[20, 20]))
            .expect("valid test config")
            .with_recorder(transcript.clone());

        let store = Arc::new(Store::new(service.config(), service.bus().clone()));
        let listener = service.recorder_listener();
        service.bus().publish(Event::new(EventKind::ServiceOpened));

        // One actor fails straight away; its sibling would run for minutes.
        let mut tasks: JoinSet<Result<Outcome, ServiceError>> = JoinSet::new();
        tasks.spawn(async { Err(ServiceError::EmptyMailbox { desk: "service" }) });
        tasks.spawn(async {
            tokio::time::sleep(Duration::from_secs(300)).await;
            Ok(Outcome::Party(0))
        });

        let outcome = timeout(
            Duration::from_secs(5),
            service.oversee(tasks, &store, listener),
        )
        .await
        .expect("the failure path must abort the sibling, not wait it out");

        match outcome {
            Err(ServiceError::EmptyMailbox { desk }) => assert_eq!(desk, "service"),
            other => panic!("expected the actor's own error back, got {other:?}"),
        }
        assert_eq!(
            transcript.count(EventKind::ServiceFailed),
            1,
            "recorders must see the failure before oversee returns"
        );
        assert_eq!(
            transcript.count(EventKind::ServiceClosed),
            0,
            "a failed evening never closes normally"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_default_config_runs_to_completion() {
        // Randomized pacing; the protocol must still terminate.
        let service = Service::new(Config::default()).expect("default config is valid");
        let report = timeout(Duration::from_secs(10), service.run())
            .await
            .expect("an evening with random pacing must still end")
            .expect("no actor may fail");

        assert_eq!(report.parties_served, 5);
        assert_eq!(report.desk_handled, 10);
        assert_eq!(report.waiter_handled, 10);
        assert_eq!(report.kitchen_cooked, 5);
        assert_eq!(report.closing.seated_count(), 0);
        assert_eq!(report.closing.waiting, 0);
    }
}
