//! # Non-blocking event fan-out to multiple recorders.
//!
//! Provides [`RecorderSet`] — distributes events to multiple recorders
//! concurrently without blocking the publisher.
//!
//! ## Architecture
//! ```text
//! emit_arc(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► recorder1.on_event()
//!     │    (bounded)         └──────► panic → RecorderPanicked
//!     ├──► [queue 2] ──► worker 2 ──► recorder2.on_event()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► recorderN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **No cross-recorder ordering**: recorder A may process event N while B
//!   processes N+5 (each event carries `seq` for re-ordering).
//! - **Overflow**: event dropped for that recorder only, `RecorderOverflow` published
//! - **Non-blocking**: `emit_arc()` returns immediately (uses `try_send`)
//! - **Isolation**: a slow or panicking recorder doesn't affect the others
//! - **Per-recorder FIFO**: each recorder sees events in bus order
//!
//! ## Panic handling
//! Worker tasks use `catch_unwind` to isolate panics: the panic becomes a
//! `RecorderPanicked` event and the worker continues with the next item.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave a recorder's own
//! shared state inconsistent if it panics while holding a lock.

use std::any::Any;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event};

use super::recorder::Recorder;

/// Best-effort extraction of a panic payload into a note string.
fn panic_note(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<&'static str>() {
        Ok(msg) => (*msg).to_string(),
        Err(payload) => match payload.downcast::<String>() {
            Ok(msg) => *msg,
            Err(_) => "unknown panic".to_string(),
        },
    }
}

/// Per-recorder channel metadata.
struct RecorderChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for multiple event recorders.
///
/// Manages per-recorder queues and worker tasks, providing:
/// - **Concurrent delivery**: events sent to all recorders simultaneously
/// - **Isolation**: each recorder has a dedicated queue and worker
/// - **Panic safety**: panics caught and reported, don't crash the service
/// - **Overflow handling**: dropped events reported via `RecorderOverflow`
pub struct RecorderSet {
    channels: Vec<RecorderChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl RecorderSet {
    /// Creates a new set and spawns one worker task per recorder.
    ///
    /// ### Per-recorder setup
    /// - Bounded mpsc queue (capacity from [`Recorder::queue_capacity`], min 1)
    /// - Dedicated worker task (runs until the queue closes)
    /// - Panic isolation via `catch_unwind`
    #[must_use]
    pub fn new(recorders: Vec<Arc<dyn Recorder>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(recorders.len());
        let mut workers = Vec::with_capacity(recorders.len());

        for recorder in recorders {
            let cap = recorder.queue_capacity().max(1);
            let name = recorder.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let r = Arc::clone(&recorder);
            let worker_bus = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = r.on_event(ev.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        worker_bus
                            .publish(Event::recorder_panicked(r.name(), panic_note(panic_err)));
                    }
                }
            });
            channels.push(RecorderChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits an event to all recorders (clones the event).
    ///
    /// Clones the event, wraps it in an `Arc` and calls
    /// [`emit_arc`](Self::emit_arc). Returns immediately.
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Emits a pre-allocated `Arc<Event>` to all recorders.
    ///
    /// - Uses `try_send` (non-blocking)
    /// - On queue full: drops the event, publishes `RecorderOverflow`
    /// - On queue closed: publishes `RecorderOverflow` with reason "closed"
    ///
    /// ### Overflow prevention
    /// Fault events (`RecorderOverflow`, `RecorderPanicked`) are never
    /// re-reported when they themselves fail to enqueue, so a full queue
    /// cannot feed itself forever.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let is_fault = event.is_recorder_fault();

        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if !is_fault {
                        self.bus
                            .publish(Event::recorder_overflow(channel.name, "full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if !is_fault {
                        self.bus
                            .publish(Event::recorder_overflow(channel.name, "closed"));
                    }
                }
            }
        }
    }

    /// Gracefully shuts down all recorder workers.
    ///
    /// 1. Drops all channel senders (workers see the channel closed)
    /// 2. Awaits all workers, which first drain their remaining queue items
    pub async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Panicky {
        hits: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Recorder for Panicky {
        async fn on_event(&self, _event: &Event) {
            if self.hits.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("first event is poison");
            }
        }
        fn name(&self) -> &'static str {
            "panicky"
        }
    }

    struct Stuck;

    #[async_trait]
    impl Recorder for Stuck {
        async fn on_event(&self, _event: &Event) {
            std::future::pending::<()>().await;
        }
        fn name(&self) -> &'static str {
            "stuck"
        }
        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn test_panicking_recorder_is_isolated_and_reported() {
        let bus = Bus::new(32);
        let mut rx = bus.subscribe();
        let hits = Arc::new(AtomicUsize::new(0));
        let set = RecorderSet::new(
            vec![Arc::new(Panicky { hits: hits.clone() })],
            bus.clone(),
        );

        set.emit(&Event::new(EventKind::ServiceOpened));
        set.emit(&Event::new(EventKind::ServiceClosed));
        set.shutdown().await;

        assert_eq!(
            hits.load(Ordering::SeqCst),
            2,
            "the worker keeps going after a panic"
        );
        let fault = rx.recv().await.expect("panic reported on the bus");
        assert_eq!(fault.kind, EventKind::RecorderPanicked);
        assert_eq!(fault.actor.as_deref(), Some("panicky"));
        assert!(fault.note.as_deref().unwrap().contains("poison"));
    }

    #[tokio::test]
    async fn test_full_queue_drops_and_reports_overflow() {
        let bus = Bus::new(32);
        let mut rx = bus.subscribe();
        let set = RecorderSet::new(vec![Arc::new(Stuck)], bus.clone());

        // Worker jams on the first event; capacity 1 holds the second; the
        // rest must overflow.
        for _ in 0..4 {
            set.emit(&Event::new(EventKind::ServiceOpened));
        }

        let mut overflowed = false;
        while let Ok(ev) = rx.try_recv() {
            overflowed |= ev.kind == EventKind::RecorderOverflow;
        }
        assert!(overflowed, "at least one drop must be reported");
        // No shutdown: the jammed worker would never drain.
    }
}
