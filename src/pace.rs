//! # Pacing: randomized delays for travel, meals and cooking.
//!
//! Correctness never depends on these values; they only spread the actors
//! out in time so interleavings vary between runs.
//!
//! - [`around`] — normal distribution around a base estimate (travel, meals)
//! - [`within`] — uniform draw up to a limit (the chef's cook time)

use std::time::Duration;

use rand::Rng;
use rand_distr::Normal;

/// A normally-distributed duration with mean `base` and standard deviation
/// `spread`, clamped to zero when the sample comes out non-positive.
///
/// A zero `spread` returns `base` verbatim, which is what deterministic
/// tests rely on to stage arrival order.
pub fn around(base: Duration, spread: Duration) -> Duration {
    if spread.is_zero() {
        return base;
    }
    let Ok(normal) = Normal::new(base.as_secs_f64(), spread.as_secs_f64()) else {
        return base;
    };
    let sampled: f64 = rand::rng().sample(normal);
    if sampled <= 0.0 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(sampled)
    }
}

/// A uniformly-distributed duration in `[0, limit]`.
pub fn within(limit: Duration) -> Duration {
    let micros = limit.as_micros() as u64;
    if micros == 0 {
        return Duration::ZERO;
    }
    Duration::from_micros(rand::rng().random_range(0..=micros))
}
