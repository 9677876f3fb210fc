//! # Event recorders: where "record current state" goes.
//!
//! Every store transition publishes a floor snapshot on the bus; this module
//! provides the [`Recorder`] trait and the fan-out machinery that delivers
//! those events (and the service lifecycle around them) to any number of
//! consumers without slowing the actors down.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Store/actors ── publish(Event) ──► Bus ──► Service::recorder_listener
//!                                                  │
//!                                            RecorderSet::emit_arc
//!                                                  │
//!                                       ┌──────────┼──────────┐
//!                                       ▼          ▼          ▼
//!                                   LogWriter  Transcript   custom...
//! ```
//!
//! ## Recorder types
//! - **Passive recorders** — print or export events ([`LogWriter`])
//! - **Stateful recorders** — accumulate floor history for later queries
//!   ([`Transcript`], the backbone of the property tests)
//!
//! ## Implementing custom recorders
//! ```no_run
//! use brigade::{Event, EventKind, Recorder};
//! use async_trait::async_trait;
//!
//! struct SeatCounter;
//!
//! #[async_trait]
//! impl Recorder for SeatCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::StateRecorded {
//!             // inspect event.floor ...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "seat-counter" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod recorder;
mod set;
mod transcript;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use recorder::Recorder;
pub use set::RecorderSet;
pub use transcript::Transcript;
