//! # Party actor: the six-stage dining protocol.
//!
//! ## Architecture
//! ```text
//! travel ──► check in ──► place order ──► await food ──► dine ──► check out
//!   sleep     desk gate     waiter gate     food_served   sleep    desk gate
//!             mailbox       mailbox         [table]               mailbox
//!             table_ready   order_taken                           bill_settled
//!             [party]       [table]                               [table]
//! ```
//!
//! ## Rules
//! - Every mailbox write is admitted by the responder's `*_free` gate, so at
//!   most one unread call sits in a mailbox at a time.
//! - Every blocking wait happens outside the store guard.
//! - The assigned table is re-read under the guard at each stage that needs
//!   it; a missing table where the protocol guarantees one is fatal.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::config::Config;
use crate::error::ServiceError;
use crate::events::{Bus, Event, EventKind};
use crate::pace;
use crate::state::{DeskCall, PartyId, PartyStatus, Store, WaiterCall};
use crate::sync::SyncSet;

use super::Outcome;

/// One dining party, driven start to finish by [`Party::run`].
pub(crate) struct Party {
    id: PartyId,
    store: Arc<Store>,
    sync: Arc<SyncSet>,
    bus: Bus,
    arrival_spread: Duration,
    meal_spread: Duration,
}

impl Party {
    pub(crate) fn new(
        id: PartyId,
        store: Arc<Store>,
        sync: Arc<SyncSet>,
        bus: Bus,
        cfg: &Config,
    ) -> Self {
        Self {
            id,
            store,
            sync,
            bus,
            arrival_spread: cfg.arrival_spread,
            meal_spread: cfg.meal_spread,
        }
    }

    /// Runs the six stages in order. Terminal state is `Leaving`.
    pub(crate) async fn run(self) -> Result<Outcome, ServiceError> {
        self.travel().await;
        self.check_in().await?;
        self.place_order().await?;
        self.await_food().await?;
        self.dine().await;
        self.check_out().await?;

        self.bus.publish(
            Event::new(EventKind::ActorFinished).with_actor(format!("party-{}", self.id)),
        );
        Ok(Outcome::Party(self.id))
    }

    /// Sleeps out the trip to the restaurant.
    async fn travel(&self) {
        let estimate = self.store.update(|f| f.parties[self.id].arrival).await;
        time::sleep(pace::around(estimate, self.arrival_spread)).await;
    }

    /// Posts a table request and blocks until a table is granted.
    async fn check_in(&self) -> Result<(), ServiceError> {
        let id = self.id;
        self.sync.receptionist_free.wait().await?;
        self.store
            .transition(|f| {
                f.parties[id].status = PartyStatus::AtReception;
                f.desk_inbox = Some(DeskCall::Table(id));
            })
            .await;
        self.sync.receptionist_called.signal();
        self.sync.table_ready(id).wait().await
    }

    /// Posts a food order and blocks until the waiter acknowledges it.
    async fn place_order(&self) -> Result<(), ServiceError> {
        let id = self.id;
        self.sync.waiter_free.wait().await?;
        let table = self
            .store
            .transition(|f| {
                f.parties[id].status = PartyStatus::Ordering;
                f.waiter_inbox = Some(WaiterCall::Order(id));
                f.parties[id].table
            })
            .await
            .ok_or(ServiceError::TableMissing {
                party: id,
                stage: "place order",
            })?;
        self.sync.waiter_called.signal();
        self.sync.order_taken(table).wait().await
    }

    /// Blocks until the plate lands, then starts eating.
    async fn await_food(&self) -> Result<(), ServiceError> {
        let id = self.id;
        let table = self
            .store
            .transition(|f| {
                f.parties[id].status = PartyStatus::WaitingForFood;
                f.parties[id].table
            })
            .await
            .ok_or(ServiceError::TableMissing {
                party: id,
                stage: "await food",
            })?;
        self.sync.food_served(table).wait().await?;
        self.store
            .transition(|f| f.parties[id].status = PartyStatus::Eating)
            .await;
        Ok(())
    }

    /// Sleeps out the meal.
    async fn dine(&self) {
        let estimate = self.store.update(|f| f.parties[self.id].meal).await;
        time::sleep(pace::around(estimate, self.meal_spread)).await;
    }

    /// Posts a bill request, blocks until the bill is settled, then leaves.
    async fn check_out(&self) -> Result<(), ServiceError> {
        let id = self.id;
        self.sync.receptionist_free.wait().await?;
        let table = self
            .store
            .transition(|f| {
                f.parties[id].status = PartyStatus::CheckingOut;
                f.desk_inbox = Some(DeskCall::Bill(id));
                f.parties[id].table
            })
            .await
            .ok_or(ServiceError::TableMissing {
                party: id,
                stage: "check out",
            })?;
        self.sync.receptionist_called.signal();
        self.sync.bill_settled(table).wait().await?;
        self.store
            .transition(|f| f.parties[id].status = PartyStatus::Leaving)
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rigged(parties: usize, tables: usize) -> (Arc<Store>, Arc<SyncSet>, Bus, Config) {
        let cfg = Config::uniform(parties, tables);
        let bus = Bus::new(64);
        let store = Arc::new(Store::new(&cfg, bus.clone()));
        let sync = Arc::new(SyncSet::new(parties, tables));
        (store, sync, bus, cfg)
    }

    #[tokio::test]
    async fn test_check_in_posts_request_and_takes_the_grant() {
        let (store, sync, bus, cfg) = rigged(3, 2);
        let party = Party::new(1, store.clone(), sync.clone(), bus, &cfg);

        // Grant up front; the permit is durable so check_in sails through.
        sync.table_ready(1).signal();
        party.check_in().await.expect("granted table");

        let floor = store.snapshot().await;
        assert_eq!(floor.desk_inbox, Some(DeskCall::Table(1)));
        assert_eq!(floor.parties[1].status, PartyStatus::AtReception);
        assert!(
            sync.receptionist_called.try_wait(),
            "check_in must post the desk call"
        );
        assert!(
            !sync.receptionist_free.try_wait(),
            "the desk gate stays held until the receptionist reopens it"
        );
    }

    #[tokio::test]
    async fn test_place_order_without_a_table_is_fatal() {
        let (store, sync, bus, cfg) = rigged(2, 1);
        let party = Party::new(0, store, sync, bus, &cfg);
        match party.place_order().await {
            Err(ServiceError::TableMissing { party: 0, .. }) => {}
            other => panic!("expected TableMissing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_await_food_eats_once_served() {
        let (store, sync, bus, cfg) = rigged(2, 1);
        store.update(|f| f.parties[0].table = Some(0)).await;
        sync.food_served(0).signal();

        let party = Party::new(0, store.clone(), sync, bus, &cfg);
        party.await_food().await.expect("plate served");
        assert_eq!(
            store.snapshot().await.parties[0].status,
            PartyStatus::Eating
        );
    }
}
