//! Error taxonomy surfaced to callers.
//!
//! Every failure is a tagged result: a query either fully succeeds with a
//! complete route or fails with one of these. There are no retries and no
//! partial results.

/// Errors returned by route queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The metro is not operating at the requested departure time, or every
    /// viable path requires a transfer at a time the metro is closed.
    #[error("service is closed at the requested time")]
    Closed,

    /// The destination cannot be reached in the current, possibly
    /// fault-reduced, network.
    #[error("no route from {origin} to {destination}")]
    NoRoute {
        /// The requested origin station.
        origin: String,
        /// The requested destination station.
        destination: String,
    },

    /// A query named a station absent from the network.
    #[error("unknown station: {0}")]
    UnknownStation(String),
}

/// Errors returned by fault injection.
///
/// These leave the adjacency untouched; the operation is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FaultError {
    /// The named station is not a node of the routable graph.
    #[error("not a node station: {0}")]
    UnknownNode(String),

    /// The two nodes have no direct connection to break.
    #[error("{a} and {b} are not adjacent")]
    NotAdjacent {
        /// First endpoint of the requested break.
        a: String,
        /// Second endpoint of the requested break.
        b: String,
    },
}

/// Errors returned by schedule configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Hour outside 0-23.
    #[error("hour must be 0-23, got {0}")]
    InvalidHour(u32),

    /// Minute outside 0-59.
    #[error("minute must be 0-59, got {0}")]
    InvalidMinute(u32),

    /// Speed must be a positive number of km/h.
    #[error("speed must be positive")]
    InvalidSpeed,
}
