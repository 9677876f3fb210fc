//! # Waiter actor: order relay and plate delivery.
//!
//! One responder loop of exactly `2 × parties` iterations: every party
//! produces one order call and, via the chef, one plated notice. The waiter
//! is the only bridge between the floor and the kitchen.
//!
//! ## Rules
//! - Same gate discipline as the desk: copy the call out, reopen
//!   `waiter_free`, dispatch.
//! - Relaying an order blocks on `kitchen_ack` so the kitchen slot is never
//!   outrun: the chef has recorded the order before the waiter takes the
//!   next call.

use std::sync::Arc;

use crate::error::ServiceError;
use crate::events::{Bus, Event, EventKind};
use crate::state::{PartyId, Store, WaiterCall, WaiterStatus};
use crate::sync::SyncSet;

use super::Outcome;

/// The single waiter.
pub(crate) struct Waiter {
    store: Arc<Store>,
    sync: Arc<SyncSet>,
    bus: Bus,
    parties: usize,
}

impl Waiter {
    pub(crate) fn new(store: Arc<Store>, sync: Arc<SyncSet>, bus: Bus, parties: usize) -> Self {
        Self {
            store,
            sync,
            bus,
            parties,
        }
    }

    /// Handles every call of the evening, then reports.
    pub(crate) async fn run(self) -> Result<Outcome, ServiceError> {
        let handled = 2 * self.parties as u32;

        for _ in 0..handled {
            match self.next_call().await? {
                WaiterCall::Order(party) => self.relay_order(party).await?,
                WaiterCall::Plated(party) => self.deliver_plate(party).await?,
            }
        }

        self.bus.publish(
            Event::new(EventKind::ActorFinished)
                .with_actor("waiter")
                .with_note(format!("handled={handled}")),
        );
        Ok(Outcome::Waiter { handled })
    }

    /// Waits for a posted call, copies it out, reopens the gate.
    async fn next_call(&self) -> Result<WaiterCall, ServiceError> {
        self.store
            .transition(|f| f.waiter = WaiterStatus::AwaitingRequest)
            .await;
        self.sync.waiter_called.wait().await?;
        let call = self
            .store
            .update(|f| f.waiter_inbox.take())
            .await
            .ok_or(ServiceError::EmptyMailbox { desk: "service" })?;
        self.sync.waiter_free.signal();
        Ok(call)
    }

    /// Writes the kitchen slot, acknowledges the party, wakes the chef, and
    /// waits until the order is recorded.
    async fn relay_order(&self, party: PartyId) -> Result<(), ServiceError> {
        let table = self
            .store
            .transition(|f| {
                f.waiter = WaiterStatus::InformingChef;
                f.order_party = Some(party);
                f.order_pending = true;
                f.parties[party].table
            })
            .await
            .ok_or(ServiceError::TableMissing {
                party,
                stage: "relay order",
            })?;
        self.sync.order_taken(table).signal();
        self.sync.kitchen_order.signal();
        self.sync.kitchen_ack.wait().await
    }

    /// Carries a finished plate to the party's table.
    async fn deliver_plate(&self, party: PartyId) -> Result<(), ServiceError> {
        let table = self
            .store
            .transition(|f| {
                f.waiter = WaiterStatus::Delivering;
                f.parties[party].table
            })
            .await
            .ok_or(ServiceError::TableMissing {
                party,
                stage: "deliver plate",
            })?;
        self.sync.food_served(table).signal();
        Ok(())
    }
}
