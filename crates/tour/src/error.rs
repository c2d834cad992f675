//! Tour construction errors.
//!
//! Only construction can fail. Runtime races (a caption container that is not
//! attached, a timer or camera arrival that outlived its tour) are absorbed
//! where they happen and never reach the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TourError {
    /// A waypoint has coordinates, zoom or pitch outside the supported range.
    #[error("invalid waypoint #{index}: {reason}")]
    InvalidWaypoint { index: usize, reason: String },

    #[error("waypoint table is empty")]
    EmptyTable,

    #[error("itinerary has {waypoints} waypoints but {dwells} dwell durations")]
    DwellMismatch { waypoints: usize, dwells: usize },

    #[error("invalid dwell for waypoint #{index}: {value}")]
    InvalidDwell { index: usize, value: f64 },

    #[error("malformed itinerary: {0}")]
    Itinerary(#[from] serde_json::Error),

    #[error("invalid configuration value for {key}: {reason}")]
    Config { key: &'static str, reason: String },
}
