//! The routing engine facade.
//!
//! Owns every piece of mutable state: the static network model and its
//! derived intervals, the fault-mutable adjacency, and the timetable.
//! Queries take `&self`, configuration and fault injection take
//! `&mut self`; an embedder that needs concurrency wraps the whole engine
//! in a single lock, since searches read the same adjacency that fault
//! injection mutates.

use std::path::Path;

use chrono::Weekday;
use tracing::debug;

use crate::domain::{FaultError, Route, RouteError, ScheduleError};
use crate::network::{Adjacency, ConfigError, Intervals, Network, NetworkConfig};
use crate::planner::{GraphSearch, Locator, Resolution, SearchFailure, stitch};
use crate::schedule::Timetable;

/// The metro routing engine.
///
/// Built once from a network description; the model and intervals stay
/// fixed for its lifetime, while adjacency changes only through fault
/// injection and the timetable only through the setters.
#[derive(Debug, Clone)]
pub struct Engine {
    network: Network,
    intervals: Intervals,
    adjacency: Adjacency,
    timetable: Timetable,
}

impl Engine {
    /// Build an engine from a parsed network description.
    pub fn new(config: &NetworkConfig) -> Result<Self, ConfigError> {
        let network = Network::new(config)?;
        let intervals = Intervals::resolve(&network);
        let timetable = Timetable::default();
        let adjacency = Adjacency::build(&network, timetable.speed_m_per_min());
        debug!(
            lines = network.lines().len(),
            nodes = network.node_count(),
            "engine built"
        );
        Ok(Self {
            network,
            intervals,
            adjacency,
            timetable,
        })
    }

    /// Build an engine from a network description file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::new(&NetworkConfig::from_path(path)?)
    }

    /// Set the trip-start moment for subsequent queries.
    pub fn set_departure(
        &mut self,
        day: Weekday,
        hour: u32,
        minute: u32,
    ) -> Result<(), ScheduleError> {
        self.timetable.set_departure(day, hour, minute)
    }

    /// Set the train speed in km/h for subsequent queries.
    pub fn set_speed_kmh(&mut self, kmh: u32) -> Result<(), ScheduleError> {
        self.timetable.set_speed_kmh(kmh)
    }

    /// Compute the minimum-time route between two stations.
    pub fn compute_route(&self, origin: &str, destination: &str) -> Result<Route, RouteError> {
        let locator = Locator::new(&self.network, &self.intervals, &self.timetable);
        match locator.resolve(origin, destination)? {
            Resolution::Direct(route) => Ok(route),
            Resolution::Graph {
                query,
                prefix,
                suffix,
            } => {
                let search = GraphSearch::new(&self.adjacency, &self.timetable);
                let graph = search.run(&query).map_err(|failure| match failure {
                    SearchFailure::Closed => RouteError::Closed,
                    SearchFailure::NoRoute => RouteError::NoRoute {
                        origin: origin.to_string(),
                        destination: destination.to_string(),
                    },
                })?;
                Ok(stitch(
                    &prefix,
                    graph,
                    &suffix,
                    self.timetable.speed_m_per_min(),
                ))
            }
        }
    }

    /// Remove the direct connection between two adjacent nodes, both
    /// directions. The graph is untouched on error.
    pub fn break_connection(&mut self, a: &str, b: &str) -> Result<(), FaultError> {
        self.adjacency.break_connection(a, b)
    }

    /// Discard all injected faults by rebuilding adjacency from the
    /// static node set. Restoration is all-or-nothing.
    pub fn clear_faults(&mut self) {
        self.adjacency = Adjacency::build(&self.network, self.timetable.speed_m_per_min());
        debug!("faults cleared");
    }

    /// Returns true if the station is a node of the routable graph.
    pub fn is_node(&self, name: &str) -> bool {
        self.network.is_node(name)
    }

    /// The static network model.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The current, possibly fault-reduced, adjacency.
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::round_to_tenth;

    const ATHENS: &str = include_str!("../data/athens.json");

    /// Athens network at 60 km/h (1000 m/min), Monday noon.
    fn athens() -> Engine {
        let config = NetworkConfig::from_json(ATHENS).unwrap();
        let mut engine = Engine::new(&config).unwrap();
        engine.set_speed_kmh(60).unwrap();
        engine
    }

    /// Sum of adjacency hop distances along a node path.
    fn hop_sum(engine: &Engine, path: &[String]) -> f64 {
        path.windows(2)
            .map(|pair| {
                engine
                    .adjacency()
                    .neighbors(&pair[0])
                    .iter()
                    .find(|e| e.to == pair[1])
                    .expect("consecutive path stations must be adjacent")
                    .distance_m
            })
            .sum()
    }

    #[test]
    fn node_to_node_on_one_line() {
        let engine = athens();
        let route = engine.compute_route("Attiki", "Syntagma").unwrap();

        assert_eq!(
            route.stations,
            vec![
                "Attiki",
                "Larissa Station",
                "Metaxourghio",
                "Omonia",
                "Panepistimio",
                "Syntagma"
            ]
        );
        assert_eq!(route.distance_m, 3900.0);
        assert_eq!(route.transfer_wait_min, 0.0);
        assert_eq!(route.duration_min, 3.9);
    }

    #[test]
    fn distance_is_the_sum_of_hops() {
        let engine = athens();
        let nodes = ["Monastiraki", "Victoria", "Syntagma", "Larissa Station"];

        for origin in nodes {
            for destination in nodes {
                if origin == destination {
                    continue;
                }
                let route = engine.compute_route(origin, destination).unwrap();
                assert_eq!(route.distance_m, hop_sum(&engine, &route.stations));
                assert_eq!(
                    route.duration_min,
                    round_to_tenth(route.distance_m / 1000.0 + route.transfer_wait_min)
                );
            }
        }
    }

    #[test]
    fn transfer_adds_the_midday_wait() {
        let engine = athens();
        let route = engine.compute_route("Victoria", "Syntagma").unwrap();

        // The line 2 branch through Panepistimio beats the Monastiraki
        // one even with the line change at Omonia.
        assert_eq!(
            route.stations,
            vec!["Victoria", "Omonia", "Panepistimio", "Syntagma"]
        );
        assert_eq!(route.distance_m, 2300.0);
        assert_eq!(route.transfer_wait_min, 3.0);
        assert_eq!(route.duration_min, 5.3);
    }

    #[test]
    fn same_interval_fast_path() {
        let engine = athens();
        let route = engine.compute_route("Piraeus", "Thissio").unwrap();

        // No node lies between them, so the answer is the line segment
        // itself, not a detour through the graph.
        assert_eq!(
            route.stations,
            vec![
                "Piraeus",
                "Faliro",
                "Moschato",
                "Kalithea",
                "Tavros",
                "Petralona",
                "Thissio"
            ]
        );
        assert_eq!(route.distance_m, 6100.0);
        assert_eq!(route.transfer_wait_min, 0.0);
        assert_eq!(route.duration_min, 6.1);
    }

    #[test]
    fn interior_endpoints_are_walked_to_the_graph() {
        let engine = athens();
        let route = engine.compute_route("Sepolia", "Akropoli").unwrap();

        assert_eq!(
            route.stations,
            vec![
                "Sepolia",
                "Attiki",
                "Larissa Station",
                "Metaxourghio",
                "Omonia",
                "Panepistimio",
                "Syntagma",
                "Akropoli"
            ]
        );
        assert_eq!(route.distance_m, 5800.0);
        assert_eq!(route.transfer_wait_min, 0.0);
        assert_eq!(route.duration_min, 5.8);
    }

    #[test]
    fn unknown_station_is_rejected() {
        let engine = athens();
        assert_eq!(
            engine.compute_route("Atlantis", "Omonia"),
            Err(RouteError::UnknownStation("Atlantis".into()))
        );
        assert_eq!(
            engine.compute_route("Omonia", "Atlantis"),
            Err(RouteError::UnknownStation("Atlantis".into()))
        );
    }

    #[test]
    fn weekday_night_is_closed() {
        let mut engine = athens();
        engine.set_departure(Weekday::Tue, 0, 45).unwrap();
        assert_eq!(
            engine.compute_route("Victoria", "Syntagma"),
            Err(RouteError::Closed)
        );
    }

    #[test]
    fn saturday_night_transfer_waits_instead_of_closing() {
        let mut engine = athens();
        engine.set_departure(Weekday::Sat, 1, 0).unwrap();

        let route = engine.compute_route("Victoria", "Syntagma").unwrap();
        assert_eq!(route.transfer_wait_min, 15.0);
    }

    #[test]
    fn cutting_omonia_splits_the_network() {
        let mut engine = athens();
        engine.break_connection("Omonia", "Monastiraki").unwrap();
        engine.break_connection("Omonia", "Panepistimio").unwrap();

        // Everything south of Omonia is now unreachable from the north.
        assert_eq!(
            engine.compute_route("Victoria", "Syntagma"),
            Err(RouteError::NoRoute {
                origin: "Victoria".into(),
                destination: "Syntagma".into(),
            })
        );
        // An unaffected pair still routes.
        let route = engine.compute_route("Victoria", "Attiki").unwrap();
        assert_eq!(route.stations, vec!["Victoria", "Attiki"]);
    }

    #[test]
    fn clear_faults_restores_a_fresh_graph() {
        let fresh = athens();
        let mut engine = athens();

        engine.break_connection("Omonia", "Monastiraki").unwrap();
        engine.break_connection("Omonia", "Panepistimio").unwrap();
        engine.break_connection("Syntagma", "Monastiraki").unwrap();
        assert_ne!(engine.adjacency(), fresh.adjacency());

        engine.clear_faults();
        assert_eq!(engine.adjacency(), fresh.adjacency());
        assert!(engine.compute_route("Victoria", "Syntagma").is_ok());
    }

    #[test]
    fn broken_connection_is_gone_in_both_directions() {
        let mut engine = athens();
        engine.break_connection("Omonia", "Victoria").unwrap();

        let adjacency = engine.adjacency();
        assert!(!adjacency.neighbors("Omonia").iter().any(|e| e.to == "Victoria"));
        assert!(!adjacency.neighbors("Victoria").iter().any(|e| e.to == "Omonia"));
    }

    #[test]
    fn fault_injection_validates_its_endpoints() {
        let mut engine = athens();
        // Thissio is a station but not a node.
        assert_eq!(
            engine.break_connection("Thissio", "Monastiraki"),
            Err(FaultError::UnknownNode("Thissio".into()))
        );
        // Victoria and Syntagma are nodes but not adjacent.
        assert!(matches!(
            engine.break_connection("Victoria", "Syntagma"),
            Err(FaultError::NotAdjacent { .. })
        ));
        // Both no-ops: the graph still routes.
        assert!(engine.compute_route("Victoria", "Syntagma").is_ok());
    }

    #[test]
    fn is_node_distinguishes_graph_members() {
        let engine = athens();
        assert!(engine.is_node("Omonia"));
        assert!(!engine.is_node("Thissio"));
        assert!(!engine.is_node("Atlantis"));
    }

    #[test]
    fn origin_equals_destination() {
        let engine = athens();
        let route = engine.compute_route("Omonia", "Omonia").unwrap();
        assert_eq!(route, Route::trivial("Omonia"));
    }

    #[test]
    fn speed_change_rescales_durations() {
        let mut engine = athens();
        let at_60 = engine.compute_route("Piraeus", "Thissio").unwrap();
        engine.set_speed_kmh(30).unwrap();
        let at_30 = engine.compute_route("Piraeus", "Thissio").unwrap();

        assert_eq!(at_60.distance_m, at_30.distance_m);
        assert_eq!(at_30.duration_min, 2.0 * at_60.duration_min);
    }
}
