//! Shared floor state and its guarded store.
//!
//! This module groups the **data model** every actor reads and mutates
//! ([`FloorState`] and the per-role status enums) and the **store** that
//! guards it ([`Store`]).
//!
//! ## Contents
//! - [`FloorState`], [`PartyCard`] the shared data model
//! - [`PartyStatus`], [`ReceptionistStatus`], [`WaiterStatus`], [`ChefStatus`]
//! - [`DeskCall`], [`WaiterCall`] the two single-slot mailboxes
//! - [`Store`] exclusive, closure-scoped access plus snapshot recording
//!
//! ## Ownership rules
//! Each status field is written only by the role that owns it; the
//! receptionist alone writes table assignments and the waiting counter; the
//! mailboxes are written by a gated requester and taken by their single
//! consumer. All of it happens inside a [`Store`] closure, never through a
//! retained reference.

mod floor;
mod store;

pub use floor::{
    ChefStatus, DeskCall, FloorState, PartyCard, PartyId, PartyStatus, ReceptionistStatus,
    TableId, WaiterCall, WaiterStatus,
};
pub use store::Store;
