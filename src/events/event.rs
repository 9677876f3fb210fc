//! # Service events emitted by the store, the actors and the runtime.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Floor events**: one snapshot per store transition (`StateRecorded`)
//! - **Lifecycle events**: service open/close/fail, actor completion
//! - **Recorder events**: fan-out faults (overflow, panic)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! acting role's name, a free-form note, and the recorded floor snapshot.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Snapshots published by the store take their `seq` while the
//! floor lock is still held, so `StateRecorded` order equals mutation order.
//!
//! ## Example
//! ```rust
//! use brigade::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ActorFinished)
//!     .with_actor("waiter")
//!     .with_note("handled=6");
//!
//! assert_eq!(ev.kind, EventKind::ActorFinished);
//! assert_eq!(ev.actor.as_deref(), Some("waiter"));
//! assert_eq!(ev.note.as_deref(), Some("handled=6"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::state::FloorState;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of service events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Recorder events ===
    /// Recorder panicked while processing an event.
    ///
    /// Sets:
    /// - `actor`: recorder name
    /// - `note`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RecorderPanicked,

    /// Recorder dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `actor`: recorder name
    /// - `note`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RecorderOverflow,

    // === Service lifecycle events ===
    /// The service opened: store and rendezvous catalogue built, actors
    /// about to spawn.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ServiceOpened,

    /// Every actor ran to completion; the evening is over.
    ///
    /// Sets:
    /// - `floor`: closing snapshot
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ServiceClosed,

    /// An actor returned a fatal error; the remaining actors were aborted.
    ///
    /// Sets:
    /// - `actor`: failing actor, when known
    /// - `note`: error label and message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ServiceFailed,

    // === Floor events ===
    /// The store recorded the floor after a transition.
    ///
    /// Sets:
    /// - `floor`: snapshot cloned under the store lock
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence (taken under the lock; equals mutation order)
    StateRecorded,

    // === Actor lifecycle events ===
    /// An actor completed its protocol and returned.
    ///
    /// Sets:
    /// - `actor`: actor name (`party-0`, `receptionist`, `waiter`, `chef`)
    /// - `note`: outcome summary (e.g., `handled=6`)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ActorFinished,
}

/// Service event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Name of the acting role or recorder, if applicable.
    pub actor: Option<Arc<str>>,
    /// Human-readable note (outcome summaries, fault details, etc.).
    pub note: Option<Arc<str>>,
    /// Floor snapshot, present on `StateRecorded` and `ServiceClosed`.
    pub floor: Option<Arc<FloorState>>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            actor: None,
            note: None,
            floor: None,
            kind,
        }
    }

    /// Attaches an actor or recorder name.
    #[inline]
    pub fn with_actor(mut self, actor: impl Into<Arc<str>>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Attaches a human-readable note.
    #[inline]
    pub fn with_note(mut self, note: impl Into<Arc<str>>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attaches a floor snapshot.
    #[inline]
    pub fn with_floor(mut self, floor: Arc<FloorState>) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Creates a recorder overflow event.
    #[inline]
    pub fn recorder_overflow(recorder: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::RecorderOverflow)
            .with_actor(recorder)
            .with_note(format!("recorder={recorder} reason={reason}"))
    }

    /// Creates a recorder panic event.
    #[inline]
    pub fn recorder_panicked(recorder: &'static str, info: String) -> Self {
        Event::new(EventKind::RecorderPanicked)
            .with_actor(recorder)
            .with_note(info)
    }

    /// True for fan-out fault events, which the dispatcher must never feed
    /// back into the recorder queues (that could loop forever on a full queue).
    #[inline]
    pub fn is_recorder_fault(&self) -> bool {
        matches!(
            self.kind,
            EventKind::RecorderOverflow | EventKind::RecorderPanicked
        )
    }
}
