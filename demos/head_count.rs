//! # Example: head_count
//!
//! Demonstrates how to build and attach a custom event recorder.
//!
//! Shows how to:
//! - Implement the [`Recorder`] trait.
//! - Inspect [`Event`] / [`EventKind`] and the attached floor snapshots.
//! - Wire the recorder into [`Service::with_recorder`].
//!
//! ## Flow
//! ```text
//! Config ──► Service::run()
//!     ├─► Store.transition() ──► Bus.publish(StateRecorded { floor })
//!     ├─► actors ─────────────► Bus.publish(ActorFinished)
//!     └─► recorder_listener (in Service)
//!           └─► RecorderSet.emit_arc() ──► HeadCount.on_event()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example head_count
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use brigade::{Config, Event, EventKind, Recorder, Service};

/// Tracks how crowded the floor got. In real life a recorder could export
/// metrics, ship structured logs, or drive a live dashboard.
#[derive(Default)]
struct HeadCount {
    peak_seated: AtomicUsize,
    peak_waiting: AtomicU32,
}

#[async_trait::async_trait]
impl Recorder for HeadCount {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            // === Floor ===
            EventKind::StateRecorded => {
                if let Some(floor) = &ev.floor {
                    self.peak_seated
                        .fetch_max(floor.seated_count(), Ordering::Relaxed);
                    self.peak_waiting
                        .fetch_max(floor.waiting, Ordering::Relaxed);
                }
            }

            // === Lifecycle ===
            EventKind::ServiceOpened => println!("[head-count] doors open"),
            EventKind::ServiceClosed => println!("[head-count] doors closed"),
            EventKind::ActorFinished => {
                println!(
                    "[head-count] finished: {}",
                    ev.actor.as_deref().unwrap_or("<unknown>")
                );
            }

            // === Ignored ===
            EventKind::ServiceFailed
            | EventKind::RecorderOverflow
            | EventKind::RecorderPanicked => {}
        }
    }

    fn name(&self) -> &'static str {
        "head-count"
    }

    fn queue_capacity(&self) -> usize {
        1024
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let counter = Arc::new(HeadCount::default());

    let report = Service::new(Config::uniform(6, 2))?
        .with_recorder(counter.clone())
        .run()
        .await?;

    println!(
        "\nserved {} parties; floor peaked at {} seated and {} waiting",
        report.parties_served,
        counter.peak_seated.load(Ordering::Relaxed),
        counter.peak_waiting.load(Ordering::Relaxed)
    );
    Ok(())
}
