//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the store, the role actors, the
//! service runtime and the recorder workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Store` (one `StateRecorded` per transition), the four
//!   role actors (`ActorFinished`), `Service` (open/close/fail), and
//!   `RecorderSet` workers (overflow/panic).
//! - **Consumers**: `Service::recorder_listener()` (fans out to
//!   `RecorderSet`), plus any direct `Bus::subscribe` caller.
//!
//! See `lib.rs` for the system-level wiring diagram.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
