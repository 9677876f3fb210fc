//! # Core recorder trait
//!
//! `Recorder` is the extension point for plugging custom event handlers into
//! the service. Each recorder is driven by a dedicated worker loop fed by a
//! bounded queue owned by the [`RecorderSet`](crate::recorders::RecorderSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching); they do **not** block the
//!   publishing actors nor other recorders.
//! - Each recorder **declares** its preferred queue capacity via
//!   [`Recorder::queue_capacity`]. If a queue overflows, events for that
//!   recorder are **dropped** and a `RecorderOverflow` is published.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event recorders.
///
/// Called from a recorder-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Recorder: Send + Sync + 'static {
    /// Handle a single event for this recorder.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs and fault events).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this recorder's queue.
    ///
    /// On overflow, events for this recorder are **dropped**.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
