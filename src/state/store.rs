//! # Store: exclusive, closure-scoped access to the floor.
//!
//! [`Store`] is the only path to [`FloorState`]. Actors hold an
//! `Arc<Store>` handle and pass synchronous closures to [`Store::update`]
//! or [`Store::transition`]; no reference to the floor can outlive the call,
//! so nothing can read or write it outside the guard.
//!
//! ## Architecture
//! ```text
//!   actor ──► transition(|floor| { ..mutate.. })
//!               │  lock ── run closure ── clone snapshot ── seq
//!               ▼  unlock
//!             Bus ◄─ StateRecorded { floor: Arc<FloorState> }
//! ```
//!
//! ## Rules
//! - **Short critical sections**: closures do a handful of field accesses;
//!   they are synchronous, so the lock can never be held across an `.await`.
//!   This is the invariant the protocol's deadlock freedom rests on: every
//!   blocking rendezvous wait happens outside the guard.
//! - **`transition` records**: the snapshot and its event `seq` are taken
//!   while the lock is held, so `StateRecorded` seq order equals mutation
//!   order; the publish itself happens after release and never blocks.
//! - **`update` is silent**: for copies and mailbox takes that the protocol
//!   does not display.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::events::{Bus, Event, EventKind};

use super::floor::FloorState;

/// Guarded owner of the shared [`FloorState`].
///
/// Cheap to share via `Arc`; every access runs inside one bounded critical
/// section. Cloned snapshots, not references, leave the guard.
#[derive(Debug)]
pub struct Store {
    floor: Mutex<FloorState>,
    bus: Bus,
}

impl Store {
    /// Builds the opening floor from the configuration.
    pub fn new(cfg: &Config, bus: Bus) -> Self {
        Self {
            floor: Mutex::new(FloorState::new(cfg)),
            bus,
        }
    }

    /// Runs `f` under the guard without recording.
    ///
    /// For silent reads and mailbox takes. Returns whatever the closure
    /// returns (owned, never a borrow of the floor).
    pub async fn update<T>(&self, f: impl FnOnce(&mut FloorState) -> T) -> T {
        let mut floor = self.floor.lock().await;
        f(&mut floor)
    }

    /// Runs `f` under the guard, then records the resulting floor.
    ///
    /// Exactly one `StateRecorded` event is published per call, carrying a
    /// snapshot cloned before the lock is released.
    pub async fn transition<T>(&self, f: impl FnOnce(&mut FloorState) -> T) -> T {
        let (out, ev) = {
            let mut floor = self.floor.lock().await;
            let out = f(&mut floor);
            let ev = Event::new(EventKind::StateRecorded).with_floor(Arc::new(floor.clone()));
            (out, ev)
        };
        self.bus.publish(ev);
        out
    }

    /// Records the current floor without mutating it.
    ///
    /// Used once at service open so the opening state appears in the record.
    pub async fn record(&self) {
        self.transition(|_| ()).await;
    }

    /// Returns an owned copy of the current floor.
    pub async fn snapshot(&self) -> FloorState {
        self.floor.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PartyStatus;

    fn store_with_bus(capacity: usize) -> (Arc<Store>, Bus) {
        let bus = Bus::new(capacity);
        let store = Arc::new(Store::new(&Config::uniform(3, 2), bus.clone()));
        (store, bus)
    }

    #[tokio::test]
    async fn test_update_is_silent_and_transition_records() {
        let (store, bus) = store_with_bus(16);
        let mut rx = bus.subscribe();

        store.update(|f| f.waiting += 1).await;
        store.transition(|f| f.waiting += 1).await;

        let ev = rx.recv().await.expect("one recorded event");
        assert_eq!(ev.kind, EventKind::StateRecorded);
        let floor = ev.floor.expect("snapshot attached");
        assert_eq!(floor.waiting, 2, "snapshot reflects both mutations");
        assert!(
            rx.try_recv().is_err(),
            "update must not publish a second event"
        );
    }

    #[tokio::test]
    async fn test_closure_result_leaves_the_guard_owned() {
        let (store, _bus) = store_with_bus(4);
        let status = store
            .update(|f| {
                f.parties[1].status = PartyStatus::AtReception;
                f.parties[1].status
            })
            .await;
        assert_eq!(status, PartyStatus::AtReception);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_snapshot_seq_follows_mutation_order() {
        let (store, bus) = store_with_bus(256);
        let mut rx = bus.subscribe();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..32 {
            let store = store.clone();
            tasks.spawn(async move {
                store.transition(|f| f.waiting += 1).await;
            });
        }
        while tasks.join_next().await.is_some() {}

        let mut seen = Vec::new();
        for _ in 0..32 {
            let ev = rx.recv().await.expect("all snapshots buffered");
            seen.push((ev.seq, ev.floor.expect("snapshot").waiting));
        }
        seen.sort_by_key(|&(seq, _)| seq);
        let counters: Vec<u32> = seen.iter().map(|&(_, w)| w).collect();
        let expected: Vec<u32> = (1..=32).collect();
        assert_eq!(
            counters, expected,
            "ordering snapshots by seq must reproduce the mutation order"
        );
    }
}
