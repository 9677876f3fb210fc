//! # Table allocation policy.
//!
//! Two decision procedures, both run by the receptionist inside a store
//! critical section, both deterministic:
//!
//! - **Assign** ([`first_free_table`]): scan occupancy and return the
//!   lowest-indexed free table, or `None` when the floor is full.
//! - **Reassign** ([`Ledger::next_queued`]): when a table frees, scan the
//!   receptionist's private ledger in ascending party order and return the
//!   first party still queued.
//!
//! Reassignment order is a property of the party *index*, not of how long a
//! party has queued. Two queued parties are served lowest-index-first even
//! if the higher index queued earlier.

use crate::state::{FloorState, PartyId, TableId};

/// Returns the lowest-indexed table no party currently occupies, scanning
/// `0..tables` against the parties' assigned-table fields.
pub fn first_free_table(floor: &FloorState, tables: usize) -> Option<TableId> {
    (0..tables).find(|&t| floor.occupant(t).is_none())
}

/// A party's allocation stage as the receptionist tracks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Not yet checked in.
    Due,
    /// Checked in, no table free, queued.
    Queued,
    /// Holding a table.
    Seated,
    /// Paid and gone.
    Settled,
}

/// The receptionist's private allocation ledger, one entry per party.
///
/// Never shared with other actors and never behind the store guard; only
/// the receptionist reads or writes it.
#[derive(Debug)]
pub struct Ledger {
    visits: Vec<Visit>,
}

impl Ledger {
    /// A fresh ledger with every party still due.
    pub fn new(parties: usize) -> Self {
        Self {
            visits: vec![Visit::Due; parties],
        }
    }

    /// Records `party`'s new allocation stage.
    pub fn note(&mut self, party: PartyId, visit: Visit) {
        self.visits[party] = visit;
    }

    /// Current stage of `party`.
    pub fn visit(&self, party: PartyId) -> Visit {
        self.visits[party]
    }

    /// First queued party in ascending index order, if any.
    pub fn next_queued(&self) -> Option<PartyId> {
        self.visits.iter().position(|v| *v == Visit::Queued)
    }

    /// Number of parties currently queued.
    pub fn queued_count(&self) -> usize {
        self.visits.iter().filter(|v| **v == Visit::Queued).count()
    }
}
