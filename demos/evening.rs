//! # Example: evening
//!
//! Runs one full evening of service with the built-in stdout recorder, so
//! every floor transition prints as it is recorded.
//!
//! Shows how to:
//! - Build a [`Config`] and pace a roster of parties.
//! - Attach the built-in [`LogWriter`] next to a [`Transcript`].
//! - Read the [`Report`] and replay the evening from the transcript.
//!
//! ## Flow
//! ```text
//! Config ──► Service::new()
//!     ├─► with_recorder(LogWriter)     (prints live)
//!     ├─► with_recorder(Transcript)    (keeps history)
//!     └─► run()
//!           ├─► parties dine, staff respond, store records
//!           └─► Report { parties_served, desk_handled, ... }
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogWriter`].
//! ```bash
//! cargo run --example evening --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use brigade::{Config, LogWriter, Service, Transcript};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cfg = Config::uniform(5, 2);
    cfg.arrivals[0] = Duration::from_millis(5);
    cfg.meals[0] = Duration::from_millis(90);

    let transcript = Arc::new(Transcript::new());
    let service = Service::new(cfg)?
        .with_recorder(Arc::new(LogWriter::new()))
        .with_recorder(transcript.clone());

    let report = service.run().await?;

    println!();
    println!(
        "served {} parties: {} desk calls, {} waiter calls, {} orders cooked",
        report.parties_served,
        report.desk_handled,
        report.waiter_handled,
        report.kitchen_cooked
    );

    let snaps = transcript.snapshots();
    let peak_seated = snaps.iter().map(|f| f.seated_count()).max().unwrap_or(0);
    let peak_waiting = snaps.iter().map(|f| f.waiting).max().unwrap_or(0);
    println!(
        "{} floor transitions recorded, peak {} seated, peak {} waiting",
        snaps.len(),
        peak_seated,
        peak_waiting
    );
    println!("finish order: {}", transcript.finished().join(", "));

    Ok(())
}
