//! # Floor state: the one structure shared by every actor.
//!
//! [`FloorState`] holds the per-role statuses, the per-party cards, the two
//! request mailboxes and the chef's order slot. It is plain data; exclusion
//! and recording live in [`Store`](super::Store).
//!
//! ## Single-writer discipline
//! - Each status is mutated only by its owning role.
//! - `parties[g].table` and `waiting` are mutated only by the receptionist.
//! - `desk_inbox` / `waiter_inbox` are written by one gated requester at a
//!   time and taken by their single consumer.
//! - `order_party` / `order_pending` are written by the waiter; the chef
//!   only reads the id and lowers the flag. The id deliberately survives the
//!   flag reset: the waiter may already have relayed the next order while
//!   the chef was still plating the previous one.

use std::fmt;
use std::time::Duration;

use crate::config::Config;

/// Index of a dining party, `0..party_count`.
pub type PartyId = usize;

/// Index of a table on the floor, `0..tables`.
pub type TableId = usize;

/// Stage of a dining party, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyStatus {
    /// On the way to the restaurant.
    Traveling,
    /// At the desk, table request posted.
    AtReception,
    /// Seated, food request posted.
    Ordering,
    /// Order taken, waiting for the plate.
    WaitingForFood,
    /// Food on the table.
    Eating,
    /// At the desk, bill request posted.
    CheckingOut,
    /// Paid and gone. Terminal.
    Leaving,
}

/// Phase of the receptionist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceptionistStatus {
    /// Idle at the desk, ready for the next call.
    AwaitingRequest,
    /// Running the table-allocation policy for a party.
    AssigningTable,
    /// Settling a bill and reassigning the freed table.
    ReceivingPayment,
}

/// Phase of the waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaiterStatus {
    /// Idle, ready for the next call.
    AwaitingRequest,
    /// Relaying a party's order to the kitchen.
    InformingChef,
    /// Carrying a plate to its table.
    Delivering,
}

/// Phase of the chef.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChefStatus {
    /// Waiting for the waiter to relay an order.
    AwaitingOrder,
    /// Cooking the current order.
    Cooking,
}

/// A receptionist-bound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskCall {
    /// A party asks to be seated.
    Table(PartyId),
    /// A party asks for the bill.
    Bill(PartyId),
}

/// A waiter-bound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaiterCall {
    /// A seated party orders food.
    Order(PartyId),
    /// The chef announces a finished plate for a party.
    Plated(PartyId),
}

/// Per-party bookkeeping: status, pacing estimates, current table.
#[derive(Debug, Clone)]
pub struct PartyCard {
    /// Current stage of this party.
    pub status: PartyStatus,
    /// Estimated travel delay, fixed at init.
    pub arrival: Duration,
    /// Estimated meal duration, fixed at init.
    pub meal: Duration,
    /// Assigned table; `None` exactly while the party occupies no table.
    pub table: Option<TableId>,
}

/// The shared floor: role statuses, party cards, mailboxes, order slot.
#[derive(Debug, Clone)]
pub struct FloorState {
    /// Receptionist phase.
    pub receptionist: ReceptionistStatus,
    /// Waiter phase.
    pub waiter: WaiterStatus,
    /// Chef phase.
    pub chef: ChefStatus,
    /// One card per party, indexed by [`PartyId`].
    pub parties: Vec<PartyCard>,
    /// Number of parties currently queued for a table.
    pub waiting: u32,
    /// Receptionist mailbox, at most one unread call (gated).
    pub desk_inbox: Option<DeskCall>,
    /// Waiter mailbox, at most one unread call (gated).
    pub waiter_inbox: Option<WaiterCall>,
    /// True while an order sits in the kitchen un-plated.
    pub order_pending: bool,
    /// Party whose order the kitchen saw last; never cleared, only overwritten.
    pub order_party: Option<PartyId>,
}

impl FloorState {
    /// Builds the opening floor: everyone traveling, staff idle, all tables
    /// free, mailboxes empty.
    pub(crate) fn new(cfg: &Config) -> Self {
        let parties = cfg
            .arrivals
            .iter()
            .zip(&cfg.meals)
            .map(|(&arrival, &meal)| PartyCard {
                status: PartyStatus::Traveling,
                arrival,
                meal,
                table: None,
            })
            .collect();
        Self {
            receptionist: ReceptionistStatus::AwaitingRequest,
            waiter: WaiterStatus::AwaitingRequest,
            chef: ChefStatus::AwaitingOrder,
            parties,
            waiting: 0,
            desk_inbox: None,
            waiter_inbox: None,
            order_pending: false,
            order_party: None,
        }
    }

    /// Number of parties currently holding a table.
    pub fn seated_count(&self) -> usize {
        self.parties.iter().filter(|p| p.table.is_some()).count()
    }

    /// The party seated at `table`, if any.
    pub fn occupant(&self, table: TableId) -> Option<PartyId> {
        self.parties.iter().position(|p| p.table == Some(table))
    }
}

impl fmt::Display for PartyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PartyStatus::Traveling => "traveling",
            PartyStatus::AtReception => "at-reception",
            PartyStatus::Ordering => "ordering",
            PartyStatus::WaitingForFood => "waiting-food",
            PartyStatus::Eating => "eating",
            PartyStatus::CheckingOut => "checking-out",
            PartyStatus::Leaving => "leaving",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ReceptionistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReceptionistStatus::AwaitingRequest => "awaiting",
            ReceptionistStatus::AssigningTable => "assigning",
            ReceptionistStatus::ReceivingPayment => "collecting",
        };
        f.write_str(s)
    }
}

impl fmt::Display for WaiterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WaiterStatus::AwaitingRequest => "awaiting",
            WaiterStatus::InformingChef => "informing",
            WaiterStatus::Delivering => "delivering",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ChefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChefStatus::AwaitingOrder => "awaiting",
            ChefStatus::Cooking => "cooking",
        };
        f.write_str(s)
    }
}
