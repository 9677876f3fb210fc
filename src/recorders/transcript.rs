//! In-memory event recorder for inspection after a run.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::state::FloorState;

use super::recorder::Recorder;

/// Records every event it sees into memory.
///
/// Events arrive through a per-recorder queue, so bus arrival order is kept
/// per recorder but may interleave publishers; every accessor therefore sorts
/// by `seq` before returning.
///
/// ### Usage
/// ```rust,no_run
/// use std::sync::Arc;
/// use brigade::{Config, Service, Transcript};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let transcript = Arc::new(Transcript::new());
/// let report = Service::new(Config::default())?
///     .with_recorder(transcript.clone())
///     .run()
///     .await?;
///
/// for floor in transcript.snapshots() {
///     println!("waiting={}", floor.waiting);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Transcript {
    events: RwLock<Vec<Event>>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, sorted by sequence number.
    pub fn events(&self) -> Vec<Event> {
        let mut out = self
            .events
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        out.sort_by_key(|e| e.seq);
        out
    }

    /// Every floor snapshot carried by a `StateRecorded` event, in the order
    /// the mutations happened (seq order, not bus arrival order).
    pub fn snapshots(&self) -> Vec<Arc<FloorState>> {
        self.events()
            .into_iter()
            .filter(|e| e.kind == EventKind::StateRecorded)
            .filter_map(|e| e.floor)
            .collect()
    }

    /// Actor names from `ActorFinished` events, in finish order.
    pub fn finished(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.kind == EventKind::ActorFinished)
            .filter_map(|e| e.actor.map(|a| a.to_string()))
            .collect()
    }

    /// How many recorded events carry the given kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events()
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }
}

#[async_trait]
impl Recorder for Transcript {
    async fn on_event(&self, event: &Event) {
        self.events
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.clone());
    }

    fn name(&self) -> &'static str {
        "transcript"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_come_back_in_seq_order() {
        let t = Transcript::new();
        let first = Event::new(EventKind::ServiceOpened);
        let second = Event::new(EventKind::ServiceClosed);

        // Deliver out of order; the accessor must restore seq order.
        t.on_event(&second).await;
        t.on_event(&first).await;

        let events = t.events();
        assert_eq!(events[0].kind, EventKind::ServiceOpened);
        assert_eq!(events[1].kind, EventKind::ServiceClosed);
        assert_eq!(t.count(EventKind::ServiceOpened), 1);
    }

    #[tokio::test]
    async fn test_snapshots_filters_to_recorded_floors() {
        let t = Transcript::new();
        t.on_event(&Event::new(EventKind::ServiceOpened)).await;
        assert!(t.snapshots().is_empty());
        assert!(t.finished().is_empty());
    }
}
