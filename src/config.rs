//! # Service configuration.
//!
//! Provides [`Config`], the centralized settings for one evening of service.
//!
//! Config is used in two ways:
//! 1. **Service creation**: `Service::new(config)` validates and stores it.
//! 2. **Floor initialization**: per-party estimates are copied into the
//!    floor state, where parties read them back through the store guard.
//!
//! ## Sentinel values
//! - `arrival_spread = 0s` / `meal_spread = 0s` → no randomness, the
//!   estimate is used verbatim (useful for deterministic tests)
//! - `cook_limit = 0s` → the chef plates instantly
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use brigade::Config;
//!
//! let mut cfg = Config::uniform(3, 2);
//! cfg.arrivals[2] = Duration::ZERO;
//! cfg.meal_spread = Duration::from_millis(5);
//!
//! assert_eq!(cfg.party_count(), 3);
//! assert!(cfg.validate().is_ok());
//! ```

use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the service runtime and the four actor roles.
///
/// Defines:
/// - **Floor shape**: table count and the party roster (one entry per party)
/// - **Pacing**: arrival/meal estimates with normal spreads, chef cook limit
/// - **Event system**: bus capacity for recorder delivery
///
/// ## Field semantics
/// - `arrivals[g]` / `meals[g]`: base estimates for party `g`; the rosters
///   must have equal length, which fixes the party count
/// - `tables`: size of the table pool, indices `0..tables`
/// - `cook_limit`: upper bound of the chef's uniformly-drawn cook time
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
///
/// ## Notes
/// All fields are public; [`Config::uniform`] builds an evenly-paced roster
/// and tests typically overwrite individual entries to stage arrivals.
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of tables on the floor, indexed `0..tables`.
    ///
    /// Capped at two whenever the roster has three or more parties; see
    /// [`Config::validate`].
    pub tables: usize,

    /// Per-party arrival estimate; `arrivals.len()` is the party count.
    pub arrivals: Vec<Duration>,

    /// Per-party meal-duration estimate; must match `arrivals` in length.
    pub meals: Vec<Duration>,

    /// Standard deviation of the normal offset applied to arrivals.
    pub arrival_spread: Duration,

    /// Standard deviation of the normal offset applied to meal durations.
    pub meal_spread: Duration,

    /// Upper bound of the chef's cook time, drawn uniformly per order.
    pub cook_limit: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow recorders that lag behind more than `bus_capacity` events will
    /// skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,
}

impl Config {
    /// Builds a roster of `parties` identical entries using the default
    /// pacing values, over a pool of `tables` tables.
    pub fn uniform(parties: usize, tables: usize) -> Self {
        Self {
            tables,
            arrivals: vec![Duration::from_millis(25); parties],
            meals: vec![Duration::from_millis(60); parties],
            arrival_spread: Duration::from_millis(8),
            meal_spread: Duration::from_millis(15),
            cook_limit: Duration::from_millis(20),
            bus_capacity: 1024,
        }
    }

    /// Number of parties in the roster.
    #[inline]
    pub fn party_count(&self) -> usize {
        self.arrivals.len()
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The `Bus` should use this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks the configuration before any actor is spawned.
    ///
    /// Rejects an empty party roster, an empty table pool, rosters of
    /// differing length, and floors that could seat three or more parties
    /// at once ([`ConfigError::TooManyTables`]): the single waiter and chef
    /// hand orders off one at a time, and a third concurrently seated party
    /// can starve that handoff. More tables than parties is fine as long as
    /// the roster holds at most two, the extras just stay free.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arrivals.is_empty() {
            return Err(ConfigError::NoParties);
        }
        if self.tables == 0 {
            return Err(ConfigError::NoTables);
        }
        if self.arrivals.len() != self.meals.len() {
            return Err(ConfigError::RosterMismatch {
                arrivals: self.arrivals.len(),
                meals: self.meals.len(),
            });
        }
        if self.tables >= 3 && self.party_count() >= 3 {
            return Err(ConfigError::TooManyTables {
                tables: self.tables,
                parties: self.party_count(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - 5 parties, 2 tables
    /// - `arrivals = 25ms` each, `arrival_spread = 8ms`
    /// - `meals = 60ms` each, `meal_spread = 15ms`
    /// - `cook_limit = 20ms`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self::uniform(5, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_roster_is_consistent() {
        let cfg = Config::uniform(4, 2);
        assert_eq!(cfg.party_count(), 4);
        assert_eq!(cfg.meals.len(), 4);
        assert_eq!(cfg.tables, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_roster_is_rejected() {
        let cfg = Config::uniform(0, 2);
        assert!(
            matches!(cfg.validate(), Err(ConfigError::NoParties)),
            "a roster with no parties must not validate"
        );
    }

    #[test]
    fn test_zero_tables_are_rejected() {
        let cfg = Config::uniform(3, 0);
        assert!(
            matches!(cfg.validate(), Err(ConfigError::NoTables)),
            "a floor with no tables must not validate"
        );
    }

    #[test]
    fn test_three_tables_with_three_parties_are_rejected() {
        // Three seated at once can stall the waiter/chef handoff: the
        // waiter blocks for a kitchen ack while the third party holds the
        // waiter gate the chef needs to plate up.
        let cfg = Config::uniform(3, 3);
        match cfg.validate() {
            Err(ConfigError::TooManyTables { tables, parties }) => {
                assert_eq!((tables, parties), (3, 3));
            }
            other => panic!("expected TooManyTables, got {other:?}"),
        }

        // Either side of the cap alone is fine.
        assert!(
            Config::uniform(2, 5).validate().is_ok(),
            "two parties can never fill a third table"
        );
        assert!(
            Config::uniform(5, 2).validate().is_ok(),
            "two tables cap seating no matter the roster size"
        );
    }

    #[test]
    fn test_mismatched_rosters_are_rejected() {
        let mut cfg = Config::uniform(3, 2);
        cfg.meals.pop();
        match cfg.validate() {
            Err(ConfigError::RosterMismatch { arrivals, meals }) => {
                assert_eq!((arrivals, meals), (3, 2));
            }
            other => panic!("expected RosterMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_bus_capacity_is_clamped() {
        let mut cfg = Config::default();
        cfg.bus_capacity = 0;
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
