//! The four role actors and their run outcomes.
//!
//! Each actor is a plain struct holding its `Arc<Store>` and `Arc<SyncSet>`
//! handles plus a bus for lifecycle events; `run(self)` drives the role's
//! fixed protocol to completion and returns an [`Outcome`] the service
//! folds into its report.
//!
//! ## Contents
//! - [`Party`] six dining stages, one task per party
//! - [`Receptionist`] `2 × parties` desk calls (one table, one bill each)
//! - [`Waiter`] `2 × parties` calls (one order, one plated notice each)
//! - [`Chef`] `parties` orders
//!
//! Actors never time out and never retry: the loop bounds match the signal
//! counts on the other side, and any primitive failure is fatal.

mod chef;
mod party;
mod receptionist;
mod waiter;

pub(crate) use chef::Chef;
pub(crate) use party::Party;
pub(crate) use receptionist::Receptionist;
pub(crate) use waiter::Waiter;

use crate::state::PartyId;

/// What a finished actor hands back to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// A party completed all six stages.
    Party(PartyId),
    /// The receptionist handled every desk call of the evening.
    Receptionist {
        /// Calls handled, always `2 × parties` on success.
        handled: u32,
    },
    /// The waiter handled every call of the evening.
    Waiter {
        /// Calls handled, always `2 × parties` on success.
        handled: u32,
    },
    /// The chef cooked every order.
    Chef {
        /// Orders cooked, always `parties` on success.
        cooked: u32,
    },
}
