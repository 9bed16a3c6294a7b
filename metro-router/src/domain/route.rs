//! The route result type.

use std::fmt;

/// A planned route between two stations.
///
/// Produced by a successful query; owned by the caller. Durations are in
/// minutes rounded to one decimal, distances in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Station names from origin to destination, both inclusive.
    pub stations: Vec<String>,
    /// Total distance travelled, in meters.
    pub distance_m: f64,
    /// Total journey time in minutes: riding time plus transfer waits.
    pub duration_min: f64,
    /// Time spent waiting at transfer stations, in minutes.
    pub transfer_wait_min: f64,
}

impl Route {
    /// A route that starts and ends at the same station.
    pub fn trivial(station: &str) -> Self {
        Self {
            stations: vec![station.to_string()],
            distance_m: 0.0,
            duration_min: 0.0,
            transfer_wait_min: 0.0,
        }
    }

    /// Returns the origin station name.
    pub fn origin(&self) -> &str {
        self.stations.first().map(String::as_str).unwrap_or("")
    }

    /// Returns the destination station name.
    pub fn destination(&self) -> &str {
        self.stations.last().map(String::as_str).unwrap_or("")
    }

    /// Number of stations on the route, endpoints included.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if the route has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({:.0} m, {:.1} min, {:.1} min waiting)",
            self.origin(),
            self.destination(),
            self.distance_m,
            self.duration_min,
            self.transfer_wait_min
        )
    }
}
