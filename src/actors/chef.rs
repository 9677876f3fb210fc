//! # Chef actor: cook every order, one at a time.
//!
//! One loop of exactly `parties` iterations. The chef reads the ordering
//! party's id from the kitchen slot without clearing it; the waiter may
//! overwrite the slot with the next order while this one is still on the
//! stove, so the id travels in a local and only the pending flag is lowered
//! at plate-up.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use crate::error::ServiceError;
use crate::events::{Bus, Event, EventKind};
use crate::pace;
use crate::state::{ChefStatus, PartyId, Store, WaiterCall};
use crate::sync::SyncSet;

use super::Outcome;

/// The single chef.
pub(crate) struct Chef {
    store: Arc<Store>,
    sync: Arc<SyncSet>,
    bus: Bus,
    parties: usize,
    cook_limit: Duration,
}

impl Chef {
    pub(crate) fn new(
        store: Arc<Store>,
        sync: Arc<SyncSet>,
        bus: Bus,
        parties: usize,
        cook_limit: Duration,
    ) -> Self {
        Self {
            store,
            sync,
            bus,
            parties,
            cook_limit,
        }
    }

    /// Cooks every order of the evening, then reports.
    pub(crate) async fn run(self) -> Result<Outcome, ServiceError> {
        let cooked = self.parties as u32;

        for _ in 0..cooked {
            let party = self.take_order().await?;
            time::sleep(pace::within(self.cook_limit)).await;
            self.plate_up(party).await?;
        }

        self.bus.publish(
            Event::new(EventKind::ActorFinished)
                .with_actor("chef")
                .with_note(format!("cooked={cooked}")),
        );
        Ok(Outcome::Chef { cooked })
    }

    /// Waits for the waiter's call, records the ordering party, and frees
    /// the waiter to carry on.
    async fn take_order(&self) -> Result<PartyId, ServiceError> {
        self.sync.kitchen_order.wait().await?;
        let party = self
            .store
            .transition(|f| {
                f.chef = ChefStatus::Cooking;
                f.order_party
            })
            .await
            .ok_or(ServiceError::EmptyMailbox { desk: "kitchen" })?;
        self.sync.kitchen_ack.signal();
        Ok(party)
    }

    /// Hands the finished plate to the waiter through the gated mailbox.
    async fn plate_up(&self, party: PartyId) -> Result<(), ServiceError> {
        self.sync.waiter_free.wait().await?;
        self.store
            .transition(|f| {
                f.waiter_inbox = Some(WaiterCall::Plated(party));
                f.order_pending = false;
                f.chef = ChefStatus::AwaitingOrder;
            })
            .await;
        self.sync.waiter_called.signal();
        Ok(())
    }
}
