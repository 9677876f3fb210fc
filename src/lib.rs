//! # brigade
//!
//! **Brigade** simulates one evening of restaurant service on tokio: a
//! roster of dining parties and a staff of three (receptionist, waiter,
//! chef) coordinate through one guarded floor state and a fixed catalogue
//! of rendezvous semaphores.
//!
//! Every role runs as its own task with a bounded protocol; the evening
//! ends when every party has arrived, dined, paid and left. Each floor
//! mutation is recorded as an event, so a finished run can be replayed and
//! checked transition by transition.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌──────────┐  ┌──────────┐       ┌──────────┐
//!  │ party-0  │  │ party-1  │  ...  │ party-n  │        each: one task,
//!  └────┬─────┘  └────┬─────┘       └────┬─────┘        six dining stages
//!       │             │                  │
//!       │   desk/waiter gates + mailboxes + per-index handoffs (SyncSet)
//!       │             │                  │
//!  ┌────┴─────────────┴──────────────────┴─────┐
//!  │ receptionist        waiter          chef  │        staff: bounded
//!  │  2n desk calls    2n calls        n orders│        responder loops
//!  └────┬─────────────────┬───────────────┬────┘
//!       │                 │               │
//!       ▼                 ▼               ▼
//!  ┌───────────────────────────────────────────┐
//!  │ Store (Mutex<FloorState>, closure-scoped) │
//!  │   every transition ──► StateRecorded      │
//!  └────────────────────┬──────────────────────┘
//!                       ▼
//!  ┌───────────────────────────────────────────┐
//!  │            Bus (broadcast channel)        │
//!  └────────────────────┬──────────────────────┘
//!                       ▼
//!            ┌─────────────────────┐
//!            │  recorder_listener  │
//!            │    (in Service)     │
//!            └──────────┬──────────┘
//!                       ▼
//!                  RecorderSet
//!              (per-recorder queues)
//!             ┌─────────┼─────────┐
//!             ▼         ▼         ▼
//!          worker1   worker2   workerN
//!             ▼         ▼         ▼
//!        LogWriter  Transcript  custom
//! ```
//!
//! ### Lifecycle
//! ```text
//! Service::run()
//!   ├─► fresh Store + SyncSet, recorder listener on the bus
//!   ├─► publish ServiceOpened, record the opening floor
//!   ├─► spawn staff + parties into a JoinSet
//!   │
//!   │   party protocol (each party, in order):
//!   │     travel ─► check in ─► place order ─► await food ─► dine ─► check out
//!   │       │      desk gate,   waiter gate,   food_served   │      desk gate,
//!   │       │      mailbox,     mailbox,       [table]       │      mailbox,
//!   │       │      table_ready  order_taken                  │      bill_settled
//!   │       └ sleep [party]     [table]                      └ sleep [table]
//!   │
//!   │   staff protocol:
//!   │     receptionist: 2n × { await call; seat-or-queue | settle bill }
//!   │     waiter:       2n × { await call; relay order   | deliver plate }
//!   │     chef:          n × { await order; cook; hand plate to waiter }
//!   │
//!   ├─► all Ok ──► snapshot, publish ServiceClosed, Ok(Report)
//!   └─► any Err ─► abort rest, publish ServiceFailed, Err(error)
//! ```
//!
//! ## Features
//! | Area              | Description                                                        | Key types / traits                   |
//! |-------------------|--------------------------------------------------------------------|--------------------------------------|
//! | **Service**       | Wire one evening and run it to completion.                         | [`Service`], [`Report`]              |
//! | **Floor state**   | The shared data model and its guarded store.                       | [`FloorState`], [`Store`]            |
//! | **Rendezvous**    | Labelled semaphore handshakes and the per-evening catalogue.       | [`Rendezvous`], [`SyncSet`]          |
//! | **Allocation**    | Lowest-free-index table policy and the receptionist's ledger.      | [`first_free_table`], [`Ledger`]     |
//! | **Recorder API**  | Observe every floor transition and lifecycle event.                | [`Recorder`], [`Transcript`]         |
//! | **Errors**        | Typed errors for configuration and protocol faults.                | [`ConfigError`], [`ServiceError`]    |
//! | **Configuration** | Roster, pacing and bus settings in one place.                      | [`Config`]                           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use brigade::{Config, Service, Transcript};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transcript = Arc::new(Transcript::new());
//!
//!     let report = Service::new(Config::uniform(3, 2))?
//!         .with_recorder(transcript.clone())
//!         .run()
//!         .await?;
//!
//!     println!(
//!         "served {} parties over {} desk calls",
//!         report.parties_served, report.desk_handled
//!     );
//!
//!     // One snapshot per floor transition, in mutation order.
//!     for floor in transcript.snapshots() {
//!         assert!(floor.seated_count() <= 2);
//!     }
//!     Ok(())
//! }
//! ```

mod actors;
mod config;
mod error;
mod events;
mod pace;
mod recorders;
mod service;
mod state;
mod sync;
mod tables;

// ---- Public re-exports ----

pub use config::Config;
pub use error::{ConfigError, ServiceError};
pub use events::{Bus, Event, EventKind};
pub use recorders::{Recorder, RecorderSet, Transcript};
pub use service::{Report, Service};
pub use state::{
    ChefStatus, DeskCall, FloorState, PartyCard, PartyId, PartyStatus, ReceptionistStatus,
    Store, TableId, WaiterCall, WaiterStatus,
};
pub use sync::{Rendezvous, SyncSet};
pub use tables::{Ledger, Visit, first_free_table};

// Optional: expose a simple built-in stdout recorder (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use recorders::LogWriter;
