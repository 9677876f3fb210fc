//! Embedded stdout logger, enabled with the `logging` feature.

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::recorder::Recorder;

/// Prints every event to stdout in a compact, human-readable form.
///
/// For floor snapshots it prints one line per recorded transition, with each
/// party shown as `status@table` (or a bare status while unseated), so a whole
/// evening reads as a trace.
///
/// ### Usage
/// ```rust,no_run
/// use std::sync::Arc;
/// use brigade::{Config, LogWriter, Service};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// Service::new(Config::default())?
///     .with_recorder(Arc::new(LogWriter::new()))
///     .run()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Recorder for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ServiceOpened => println!("[open] seq={}", e.seq),
            EventKind::ServiceClosed => println!("[closed] seq={}", e.seq),
            EventKind::ServiceFailed => {
                println!("[failed] actor={:?} note={:?}", e.actor, e.note);
            }
            EventKind::ActorFinished => {
                println!("[finished] actor={:?} note={:?}", e.actor, e.note);
            }
            EventKind::StateRecorded => {
                if let Some(floor) = &e.floor {
                    let parties = floor
                        .parties
                        .iter()
                        .map(|card| match card.table {
                            Some(t) => format!("{}@{t}", card.status),
                            None => card.status.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(" ");
                    println!(
                        "[floor] seq={} desk={} waiter={} chef={} waiting={} parties=[{parties}]",
                        e.seq, floor.receptionist, floor.waiter, floor.chef, floor.waiting,
                    );
                }
            }
            EventKind::RecorderOverflow => println!("[overflow] note={:?}", e.note),
            EventKind::RecorderPanicked => {
                println!("[panicked] recorder={:?} note={:?}", e.actor, e.note);
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
