//! Error types used by the service runtime and the role actors.
//!
//! This module defines two main error enums:
//!
//! - [`ConfigError`] — rejected configurations, raised before any actor starts.
//! - [`ServiceError`] — fatal failures raised mid-protocol by a running actor.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! Every [`ServiceError`] is terminal: the protocol has no retry or rollback
//! path, so the runtime aborts the remaining actors and surfaces the first
//! error it sees.

use thiserror::Error;

/// # Errors produced by configuration validation.
///
/// These are startup failures: the service refuses to construct, and no
/// actor, store, or rendezvous object is ever created.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The arrival roster is empty; a service needs at least one party.
    #[error("party roster is empty")]
    NoParties,

    /// The table pool is empty; every party would queue forever.
    #[error("table pool is empty")]
    NoTables,

    /// The per-party arrival and meal rosters have different lengths.
    #[error("roster length mismatch: {arrivals} arrival estimates vs {meals} meal estimates")]
    RosterMismatch {
        /// Number of arrival estimates supplied.
        arrivals: usize,
        /// Number of meal estimates supplied.
        meals: usize,
    },

    /// Three or more parties could be seated at the same time.
    ///
    /// While the chef cooks one order the waiter may relay the next and
    /// block for the kitchen ack; a third seated party can then claim the
    /// waiter gate ahead of the finished plate, and waiter and chef end up
    /// waiting on each other forever. Seating is capped at two, so a pool
    /// of three or more tables is only valid with at most two parties.
    #[error("{tables} tables for {parties} parties would seat more than two at once")]
    TooManyTables {
        /// Number of tables requested.
        tables: usize,
        /// Number of parties in the roster.
        parties: usize,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use brigade::ConfigError;
    ///
    /// assert_eq!(ConfigError::NoTables.as_label(), "config_no_tables");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::NoParties => "config_no_parties",
            ConfigError::NoTables => "config_no_tables",
            ConfigError::RosterMismatch { .. } => "config_roster_mismatch",
            ConfigError::TooManyTables { .. } => "config_too_many_tables",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::NoParties => "party roster is empty".to_string(),
            ConfigError::NoTables => "table pool is empty".to_string(),
            ConfigError::RosterMismatch { arrivals, meals } => {
                format!("roster mismatch: arrivals={arrivals} meals={meals}")
            }
            ConfigError::TooManyTables { tables, parties } => {
                format!("too many tables: {tables} for a roster of {parties}")
            }
        }
    }
}

/// # Errors produced by a running actor.
///
/// These represent corruption of the coordination environment, not transient
/// conditions. The failing actor returns immediately with no rollback of
/// partially-mutated floor state; the runtime then aborts everyone else.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A rendezvous primitive was severed (closed) while an actor waited on it.
    #[error("rendezvous {gate} severed mid-protocol")]
    GateSevered {
        /// Label of the rendezvous, e.g. `food_served[1]`.
        gate: String,
    },

    /// A responder woke on its request-posted rendezvous but found its
    /// mailbox empty. The availability gate makes this impossible unless
    /// the protocol itself has been violated.
    #[error("{desk} mailbox empty on wake")]
    EmptyMailbox {
        /// Which mailbox: `reception`, `service`, or `kitchen`.
        desk: &'static str,
    },

    /// A stage that is only reachable while seated found no assigned table.
    #[error("party {party} reached {stage} without an assigned table")]
    TableMissing {
        /// The party whose record lacked a table.
        party: usize,
        /// The protocol stage that required one.
        stage: &'static str,
    },

    /// An actor task panicked or was torn down; observed at join time.
    #[error("actor {actor} terminated abnormally")]
    ActorLost {
        /// Name of the actor, e.g. `party-2` or `waiter`.
        actor: String,
    },
}

impl ServiceError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use brigade::ServiceError;
    ///
    /// let err = ServiceError::EmptyMailbox { desk: "reception" };
    /// assert_eq!(err.as_label(), "service_empty_mailbox");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::GateSevered { .. } => "service_gate_severed",
            ServiceError::EmptyMailbox { .. } => "service_empty_mailbox",
            ServiceError::TableMissing { .. } => "service_table_missing",
            ServiceError::ActorLost { .. } => "service_actor_lost",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ServiceError::GateSevered { gate } => format!("severed rendezvous: {gate}"),
            ServiceError::EmptyMailbox { desk } => format!("empty mailbox: {desk}"),
            ServiceError::TableMissing { party, stage } => {
                format!("party {party} has no table at {stage}")
            }
            ServiceError::ActorLost { actor } => format!("lost actor: {actor}"),
        }
    }
}
