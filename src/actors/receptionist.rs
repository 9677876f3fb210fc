//! # Receptionist actor: desk calls, seating, bills.
//!
//! One responder loop of exactly `2 × parties` iterations: each party checks
//! in once and checks out once. Dispatch runs the table-allocation policy
//! from [`tables`](crate::tables) inside a store critical section so a
//! decision and its assignment are indivisible.
//!
//! ## Rules
//! - The desk gate reopens right after the mailbox is copied out, before the
//!   call is dispatched; the next party can post while this one is seated.
//! - A granted table is durably written before `table_ready` is signaled.
//! - The ledger is receptionist-local; no other actor sees it.

use std::sync::Arc;

use crate::error::ServiceError;
use crate::events::{Bus, Event, EventKind};
use crate::state::{DeskCall, PartyId, ReceptionistStatus, Store};
use crate::sync::SyncSet;
use crate::tables::{Ledger, Visit, first_free_table};

use super::Outcome;

/// The single receptionist.
pub(crate) struct Receptionist {
    store: Arc<Store>,
    sync: Arc<SyncSet>,
    bus: Bus,
    parties: usize,
    tables: usize,
}

impl Receptionist {
    pub(crate) fn new(
        store: Arc<Store>,
        sync: Arc<SyncSet>,
        bus: Bus,
        parties: usize,
        tables: usize,
    ) -> Self {
        Self {
            store,
            sync,
            bus,
            parties,
            tables,
        }
    }

    /// Handles every desk call of the evening, then reports.
    pub(crate) async fn run(self) -> Result<Outcome, ServiceError> {
        let mut ledger = Ledger::new(self.parties);
        let handled = 2 * self.parties as u32;

        for _ in 0..handled {
            match self.next_call().await? {
                DeskCall::Table(party) => self.seat_or_queue(&mut ledger, party).await,
                DeskCall::Bill(party) => self.settle_bill(&mut ledger, party).await?,
            }
        }

        self.bus.publish(
            Event::new(EventKind::ActorFinished)
                .with_actor("receptionist")
                .with_note(format!("handled={handled}")),
        );
        Ok(Outcome::Receptionist { handled })
    }

    /// Waits for a posted desk call, copies it out, reopens the gate.
    async fn next_call(&self) -> Result<DeskCall, ServiceError> {
        self.store
            .transition(|f| f.receptionist = ReceptionistStatus::AwaitingRequest)
            .await;
        self.sync.receptionist_called.wait().await?;
        let call = self
            .store
            .update(|f| f.desk_inbox.take())
            .await
            .ok_or(ServiceError::EmptyMailbox { desk: "reception" })?;
        self.sync.receptionist_free.signal();
        Ok(call)
    }

    /// Grants the lowest free table or queues the party.
    async fn seat_or_queue(&self, ledger: &mut Ledger, party: PartyId) {
        self.store
            .transition(|f| f.receptionist = ReceptionistStatus::AssigningTable)
            .await;
        let tables = self.tables;
        self.store
            .transition(|f| match first_free_table(f, tables) {
                Some(table) => {
                    f.parties[party].table = Some(table);
                    ledger.note(party, Visit::Seated);
                    self.sync.table_ready(party).signal();
                }
                None => {
                    ledger.note(party, Visit::Queued);
                    f.waiting += 1;
                }
            })
            .await;
    }

    /// Frees the payer's table, hands it to the first queued party (by
    /// roster index), and settles the bill.
    async fn settle_bill(&self, ledger: &mut Ledger, party: PartyId) -> Result<(), ServiceError> {
        self.store
            .transition(|f| f.receptionist = ReceptionistStatus::ReceivingPayment)
            .await;
        let table = self
            .store
            .transition(|f| {
                let freed = f.parties[party].table.take();
                if let Some(table) = freed {
                    if let Some(next) = ledger.next_queued() {
                        f.parties[next].table = Some(table);
                        ledger.note(next, Visit::Seated);
                        f.waiting -= 1;
                        self.sync.table_ready(next).signal();
                    }
                }
                freed
            })
            .await
            .ok_or(ServiceError::TableMissing {
                party,
                stage: "settle bill",
            })?;
        self.sync.bill_settled(table).signal();
        ledger.note(party, Visit::Settled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::PartyStatus;

    fn rigged(parties: usize, tables: usize) -> (Receptionist, Arc<Store>, Arc<SyncSet>) {
        let cfg = Config::uniform(parties, tables);
        let bus = Bus::new(128);
        let store = Arc::new(Store::new(&cfg, bus.clone()));
        let sync = Arc::new(SyncSet::new(parties, tables));
        let desk = Receptionist::new(store.clone(), sync.clone(), bus, parties, tables);
        (desk, store, sync)
    }

    #[tokio::test]
    async fn test_next_call_copies_and_reopens_the_gate() {
        let (desk, store, sync) = rigged(2, 1);
        assert!(sync.receptionist_free.try_wait(), "take the gate as a party would");
        store
            .update(|f| f.desk_inbox = Some(DeskCall::Table(1)))
            .await;
        sync.receptionist_called.signal();

        let call = desk.next_call().await.expect("posted call");
        assert_eq!(call, DeskCall::Table(1));
        assert!(
            store.snapshot().await.desk_inbox.is_none(),
            "the call is taken out of the mailbox"
        );
        assert!(
            sync.receptionist_free.try_wait(),
            "the gate reopens before dispatch"
        );
    }

    #[tokio::test]
    async fn test_waking_on_an_empty_mailbox_is_fatal() {
        let (desk, _store, sync) = rigged(2, 1);
        sync.receptionist_called.signal();
        match desk.next_call().await {
            Err(ServiceError::EmptyMailbox { desk: "reception" }) => {}
            other => panic!("expected EmptyMailbox, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_seating_grants_the_lowest_free_table() {
        let (desk, store, sync) = rigged(3, 2);
        let mut ledger = Ledger::new(3);

        desk.seat_or_queue(&mut ledger, 2).await;
        desk.seat_or_queue(&mut ledger, 0).await;

        let floor = store.snapshot().await;
        assert_eq!(floor.parties[2].table, Some(0), "first to ask gets table 0");
        assert_eq!(floor.parties[0].table, Some(1));
        assert!(sync.table_ready(2).try_wait());
        assert!(sync.table_ready(0).try_wait());
        assert_eq!(ledger.visit(2), Visit::Seated);
    }

    #[tokio::test]
    async fn test_full_floor_queues_and_counts() {
        let (desk, store, sync) = rigged(3, 1);
        let mut ledger = Ledger::new(3);

        desk.seat_or_queue(&mut ledger, 1).await;
        desk.seat_or_queue(&mut ledger, 2).await;

        let floor = store.snapshot().await;
        assert_eq!(floor.parties[2].table, None);
        assert_eq!(floor.waiting, 1);
        assert_eq!(ledger.visit(2), Visit::Queued);
        assert_eq!(
            ledger.queued_count() as u32,
            floor.waiting,
            "the waiting counter mirrors the queued ledger entries"
        );
        assert!(
            !sync.table_ready(2).try_wait(),
            "a queued party is not signaled until a table frees"
        );
    }

    #[tokio::test]
    async fn test_settling_hands_the_table_to_the_lowest_queued_index() {
        let (desk, store, sync) = rigged(3, 1);
        let mut ledger = Ledger::new(3);

        desk.seat_or_queue(&mut ledger, 2).await;
        // Party 1 queues before party 0; index order decides anyway.
        desk.seat_or_queue(&mut ledger, 1).await;
        desk.seat_or_queue(&mut ledger, 0).await;

        desk.settle_bill(&mut ledger, 2).await.expect("party 2 pays");

        let floor = store.snapshot().await;
        assert_eq!(
            floor.parties[0].table,
            Some(0),
            "the freed table goes to the lowest roster index, not the earliest queuer"
        );
        assert_eq!(floor.parties[1].table, None);
        assert_eq!(floor.waiting, 1);
        assert!(sync.table_ready(0).try_wait());
        assert!(!sync.table_ready(1).try_wait());
        assert!(sync.bill_settled(0).try_wait(), "the payer's handoff fired");
        assert_eq!(ledger.visit(2), Visit::Settled);
    }

    #[tokio::test]
    async fn test_settling_without_a_table_is_fatal() {
        let (desk, store, _sync) = rigged(2, 1);
        let mut ledger = Ledger::new(2);
        store
            .update(|f| f.parties[0].status = PartyStatus::CheckingOut)
            .await;
        match desk.settle_bill(&mut ledger, 0).await {
            Err(ServiceError::TableMissing { party: 0, .. }) => {}
            other => panic!("expected TableMissing, got {other:?}"),
        }
    }
}
