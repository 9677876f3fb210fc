//! # Rendezvous primitives and the per-service catalogue.
//!
//! A [`Rendezvous`] is a labelled counting semaphore used for one-shot
//! handshakes: `signal` deposits a durable permit, `wait` consumes one or
//! blocks until one arrives. Signal-before-wait and wait-before-signal
//! produce identical outcomes; there is no lost-wakeup window and no
//! broadcast.
//!
//! [`SyncSet`] is the fixed catalogue one evening of service runs on,
//! created once at init for the known party and table counts.
//!
//! ## Catalogue (initial permits)
//! ```text
//! rendezvous            permits  signaled by     awaited by
//! receptionist_free        1     receptionist    parties
//! receptionist_called      0     parties         receptionist
//! waiter_free              1     waiter          parties, chef
//! waiter_called            0     parties, chef   waiter
//! kitchen_order            0     waiter          chef
//! kitchen_ack              0     chef            waiter
//! table_ready[party]       0     receptionist    that party
//! order_taken[table]       0     waiter          seated party
//! food_served[table]       0     waiter          seated party
//! bill_settled[table]      0     receptionist    seated party
//! ```
//!
//! ## Rules
//! - `*_free` gates admit one requester into the matching mailbox at a time;
//!   the responder re-opens the gate after copying the call out.
//! - `*_called` wake the responder after the mailbox is written.
//! - The indexed families are strict one-shot handoffs between one signaler
//!   and one waiter; they are never contended.
//! - Nothing here is ever closed during a service; a severed rendezvous is
//!   the fatal [`ServiceError::GateSevered`].

use tokio::sync::Semaphore;

use crate::error::ServiceError;
use crate::state::{PartyId, TableId};

/// A labelled, permit-counted one-shot handshake.
#[derive(Debug)]
pub struct Rendezvous {
    sem: Semaphore,
    label: String,
}

impl Rendezvous {
    /// A rendezvous holding one permit: the first `wait` passes straight
    /// through. Used for the availability gates.
    pub fn open(label: impl Into<String>) -> Self {
        Self {
            sem: Semaphore::new(1),
            label: label.into(),
        }
    }

    /// A rendezvous holding no permits: the first `wait` blocks until
    /// someone signals. Used for everything that is not a gate.
    pub fn closed(label: impl Into<String>) -> Self {
        Self {
            sem: Semaphore::new(0),
            label: label.into(),
        }
    }

    /// Consumes one permit, blocking until one is available.
    ///
    /// Errors only if the underlying semaphore was severed, which the
    /// protocol never does on purpose; callers treat it as fatal.
    pub async fn wait(&self) -> Result<(), ServiceError> {
        match self.sem.acquire().await {
            Ok(permit) => {
                permit.forget();
                Ok(())
            }
            Err(_) => Err(ServiceError::GateSevered {
                gate: self.label.clone(),
            }),
        }
    }

    /// Consumes one permit if immediately available. Never blocks.
    pub fn try_wait(&self) -> bool {
        match self.sem.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    /// Deposits one durable permit. Never blocks, never fails.
    pub fn signal(&self) {
        self.sem.add_permits(1);
    }

    /// The label used in error reports, e.g. `food_served[1]`.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The full rendezvous catalogue for one evening of service.
///
/// Scalar members are public; the indexed families are reached through
/// accessors that map an index to its dedicated rendezvous.
#[derive(Debug)]
pub struct SyncSet {
    /// Gate: the receptionist can accept a desk call.
    pub receptionist_free: Rendezvous,
    /// A desk call has been posted.
    pub receptionist_called: Rendezvous,
    /// Gate: the waiter can accept a call.
    pub waiter_free: Rendezvous,
    /// A waiter call has been posted.
    pub waiter_called: Rendezvous,
    /// An order sits in the kitchen slot.
    pub kitchen_order: Rendezvous,
    /// The chef has recorded the order.
    pub kitchen_ack: Rendezvous,

    table_ready: Box<[Rendezvous]>,
    order_taken: Box<[Rendezvous]>,
    food_served: Box<[Rendezvous]>,
    bill_settled: Box<[Rendezvous]>,
}

impl SyncSet {
    /// Builds the catalogue for `parties` parties over `tables` tables, with
    /// the initial permits of the table above.
    pub fn new(parties: usize, tables: usize) -> Self {
        let per_party = |name: &str| -> Box<[Rendezvous]> {
            (0..parties)
                .map(|g| Rendezvous::closed(format!("{name}[{g}]")))
                .collect()
        };
        let per_table = |name: &str| -> Box<[Rendezvous]> {
            (0..tables)
                .map(|t| Rendezvous::closed(format!("{name}[{t}]")))
                .collect()
        };
        Self {
            receptionist_free: Rendezvous::open("receptionist_free"),
            receptionist_called: Rendezvous::closed("receptionist_called"),
            waiter_free: Rendezvous::open("waiter_free"),
            waiter_called: Rendezvous::closed("waiter_called"),
            kitchen_order: Rendezvous::closed("kitchen_order"),
            kitchen_ack: Rendezvous::closed("kitchen_ack"),
            table_ready: per_party("table_ready"),
            order_taken: per_table("order_taken"),
            food_served: per_table("food_served"),
            bill_settled: per_table("bill_settled"),
        }
    }

    /// The handoff telling `party` its table is assigned.
    pub fn table_ready(&self, party: PartyId) -> &Rendezvous {
        &self.table_ready[party]
    }

    /// The handoff telling the party at `table` its order was taken.
    pub fn order_taken(&self, table: TableId) -> &Rendezvous {
        &self.order_taken[table]
    }

    /// The handoff telling the party at `table` its food arrived.
    pub fn food_served(&self, table: TableId) -> &Rendezvous {
        &self.food_served[table]
    }

    /// The handoff telling the party at `table` its bill is settled.
    pub fn bill_settled(&self, table: TableId) -> &Rendezvous {
        &self.bill_settled[table]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_before_wait_is_not_lost() {
        let rv = Rendezvous::closed("bell");
        rv.signal();
        rv.wait().await.expect("permit deposited before the wait");
    }

    #[tokio::test]
    async fn test_permits_accumulate() {
        let rv = Rendezvous::closed("bell");
        rv.signal();
        rv.signal();
        rv.wait().await.unwrap();
        rv.wait().await.unwrap();
        assert!(!rv.try_wait(), "both permits were consumed");
    }

    #[test]
    fn test_open_gate_admits_exactly_one() {
        let gate = Rendezvous::open("gate");
        assert!(gate.try_wait(), "an open gate starts with one permit");
        assert!(!gate.try_wait(), "a second entry must wait for a signal");
        gate.signal();
        assert!(gate.try_wait());
    }

    #[tokio::test]
    async fn test_wait_blocks_until_signaled() {
        let rv = Arc::new(Rendezvous::closed("bell"));
        let waiter = {
            let rv = rv.clone();
            tokio::spawn(async move { rv.wait().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished(), "no permit yet, wait must block");
        rv.signal();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("signal releases the waiter")
            .expect("join")
            .expect("wait");
    }

    #[test]
    fn test_catalogue_initial_permits() {
        let set = SyncSet::new(3, 2);
        assert!(set.receptionist_free.try_wait());
        assert!(set.waiter_free.try_wait());
        assert!(!set.receptionist_called.try_wait());
        assert!(!set.waiter_called.try_wait());
        assert!(!set.kitchen_order.try_wait());
        assert!(!set.kitchen_ack.try_wait());
        for g in 0..3 {
            assert!(!set.table_ready(g).try_wait(), "table_ready[{g}] starts closed");
        }
        for t in 0..2 {
            assert!(!set.order_taken(t).try_wait());
            assert!(!set.food_served(t).try_wait());
            assert!(!set.bill_settled(t).try_wait());
        }
    }

    #[test]
    fn test_labels_carry_indices() {
        let set = SyncSet::new(2, 1);
        assert_eq!(set.table_ready(1).label(), "table_ready[1]");
        assert_eq!(set.bill_settled(0).label(), "bill_settled[0]");
    }
}
