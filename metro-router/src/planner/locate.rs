//! Station resolution onto the node graph.
//!
//! The locator is the first stage of every query: it checks the schedule
//! and the station names, answers same-interval journeys directly, walks
//! interior endpoints to their anchor nodes, and otherwise produces a
//! normalized node-to-node query for the search. Whatever the search
//! returns is stitched back together with the walked boundary sub-paths.

use crate::domain::{Position, Route, RouteError};
use crate::network::{Anchor, Intervals, Network};
use crate::schedule::{Timetable, round_to_tenth};

use super::search::{GraphPath, NodeQuery};

/// The walk from a query endpoint to its anchor node.
///
/// For an endpoint that already is a node the walk is empty and the
/// anchor is the endpoint itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Stations walked, starting at the endpoint, anchor excluded.
    pub path: Vec<String>,
    /// Distance walked, meters.
    pub distance_m: f64,
    /// The anchor node reached.
    pub node: String,
}

impl Boundary {
    /// A boundary for an endpoint that is itself a node.
    fn at_node(name: &str) -> Self {
        Self {
            path: Vec::new(),
            distance_m: 0.0,
            node: name.to_string(),
        }
    }
}

/// Outcome of endpoint resolution.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The query never needs the graph: answered on the spot.
    Direct(Route),
    /// Both endpoints resolved to distinct nodes; run the search and
    /// stitch its result between the two boundaries.
    Graph {
        /// Normalized node-to-node query for the search.
        query: NodeQuery,
        /// Walk from the origin to its anchor node.
        prefix: Boundary,
        /// Walk from the destination to its anchor node.
        suffix: Boundary,
    },
}

/// Resolves arbitrary stations onto the routable graph.
pub struct Locator<'a> {
    network: &'a Network,
    intervals: &'a Intervals,
    timetable: &'a Timetable,
}

impl<'a> Locator<'a> {
    /// Create a locator over the static model and current schedule.
    pub fn new(network: &'a Network, intervals: &'a Intervals, timetable: &'a Timetable) -> Self {
        Self {
            network,
            intervals,
            timetable,
        }
    }

    /// Resolve a station to the node graph.
    ///
    /// A node resolves to itself with an empty walk. An interior station
    /// walks its interval to the anchor node. Errors with
    /// [`RouteError::UnknownStation`] for unknown names, or
    /// [`RouteError::NoRoute`] when the station's line has no node.
    pub fn locate(&self, name: &str) -> Result<Boundary, RouteError> {
        if !self.network.contains(name) {
            return Err(RouteError::UnknownStation(name.to_string()));
        }
        match self.interior_position(name) {
            None => Ok(Boundary::at_node(name)),
            Some(position) => {
                self.walk_to_node(position)
                    .ok_or_else(|| RouteError::NoRoute {
                        origin: name.to_string(),
                        destination: name.to_string(),
                    })
            }
        }
    }

    /// Resolve a full query: either answer it directly or normalize it to
    /// a node-to-node search.
    pub fn resolve(&self, origin: &str, destination: &str) -> Result<Resolution, RouteError> {
        // The metro must be open at departure for any query to make sense.
        if !self.timetable.is_open(0.0) {
            return Err(RouteError::Closed);
        }
        for name in [origin, destination] {
            if !self.network.contains(name) {
                return Err(RouteError::UnknownStation(name.to_string()));
            }
        }
        if origin == destination {
            return Ok(Resolution::Direct(Route::trivial(origin)));
        }

        let speed = self.timetable.speed_m_per_min();
        let origin_pos = self.interior_position(origin);
        let destination_pos = self.interior_position(destination);

        // Fast path: two interior stations on one line with no node
        // between them never touch the graph.
        if let (Some(from), Some(to)) = (origin_pos, destination_pos) {
            if from.line == to.line
                && self.intervals.same_interval(from.line, from.index, to.index)
            {
                return Ok(Resolution::Direct(self.ride_along_line(from, to)));
            }
        }

        let no_route = || RouteError::NoRoute {
            origin: origin.to_string(),
            destination: destination.to_string(),
        };
        let prefix = match origin_pos {
            None => Boundary::at_node(origin),
            Some(position) => self.walk_to_node(position).ok_or_else(no_route)?,
        };
        let suffix = match destination_pos {
            None => Boundary::at_node(destination),
            Some(position) => self.walk_to_node(position).ok_or_else(no_route)?,
        };
        let offset_min = round_to_tenth(prefix.distance_m / speed);

        if prefix.node == suffix.node {
            return Ok(Resolution::Direct(self.meet_at_node(
                &prefix,
                &suffix,
                origin_pos,
                destination_pos,
                offset_min,
            )?));
        }

        Ok(Resolution::Graph {
            query: NodeQuery {
                origin: prefix.node.clone(),
                destination: suffix.node.clone(),
                origin_line: origin_pos.map(|p| p.line),
                destination_line: destination_pos.map(|p| p.line),
                offset_min,
            },
            prefix,
            suffix,
        })
    }

    /// The `(line, index)` of a station when it is interior, `None` when
    /// it is a node. Interior stations resolve via their first-listed
    /// occurrence.
    fn interior_position(&self, name: &str) -> Option<Position> {
        if self.network.is_node(name) {
            None
        } else {
            self.network.occurrences(name).first().copied()
        }
    }

    /// Walk an interior position to its anchor node. `None` when the line
    /// has no node to walk to.
    fn walk_to_node(&self, position: Position) -> Option<Boundary> {
        let interval = self
            .intervals
            .find(position.line, position.index)
            .expect("interior position must lie in an interval");
        let line = self.network.line(position.line);

        let node_index = match interval.anchor {
            Anchor::Lower => interval.start - 1,
            Anchor::Upper => interval.end + 1,
            Anchor::Both => {
                // No default side: measure both boundary nodes and take
                // the nearer one, the lower end on a tie.
                let lower = interval.start - 1;
                let upper = interval.end + 1;
                if line.span(position.index, lower) <= line.span(position.index, upper) {
                    lower
                } else {
                    upper
                }
            }
            Anchor::Isolated => return None,
        };

        let path: Vec<String> = if node_index < position.index {
            (node_index + 1..=position.index)
                .rev()
                .map(|i| line.station(i).to_string())
                .collect()
        } else {
            (position.index..node_index)
                .map(|i| line.station(i).to_string())
                .collect()
        };

        Some(Boundary {
            path,
            distance_m: line.span(position.index, node_index),
            node: line.station(node_index).to_string(),
        })
    }

    /// Direct ride between two same-interval positions.
    fn ride_along_line(&self, from: Position, to: Position) -> Route {
        let line = self.network.line(from.line);
        let stations: Vec<String> = if from.index <= to.index {
            (from.index..=to.index)
                .map(|i| line.station(i).to_string())
                .collect()
        } else {
            (to.index..=from.index)
                .rev()
                .map(|i| line.station(i).to_string())
                .collect()
        };
        let distance_m = line.span(from.index, to.index);

        Route {
            stations,
            distance_m,
            duration_min: round_to_tenth(distance_m / self.timetable.speed_m_per_min()),
            transfer_wait_min: 0.0,
        }
    }

    /// Both endpoints walked to the same node: prefix + node + reversed
    /// suffix, with a transfer wait only when the two walks ride
    /// different lines.
    fn meet_at_node(
        &self,
        prefix: &Boundary,
        suffix: &Boundary,
        origin_pos: Option<Position>,
        destination_pos: Option<Position>,
        offset_min: f64,
    ) -> Result<Route, RouteError> {
        let mut transfer_wait_min = 0.0;
        if let (Some(from), Some(to)) = (origin_pos, destination_pos) {
            if from.line != to.line {
                transfer_wait_min = self
                    .timetable
                    .transfer_wait(offset_min)
                    .ok_or(RouteError::Closed)?;
            }
        }

        let mut stations = prefix.path.clone();
        stations.push(prefix.node.clone());
        stations.extend(suffix.path.iter().rev().cloned());

        let distance_m = prefix.distance_m + suffix.distance_m;
        Ok(Route {
            stations,
            distance_m,
            duration_min: round_to_tenth(
                distance_m / self.timetable.speed_m_per_min() + transfer_wait_min,
            ),
            transfer_wait_min,
        })
    }
}

/// Assemble the full route from the walked boundaries and the graph path.
pub fn stitch(
    prefix: &Boundary,
    graph: GraphPath,
    suffix: &Boundary,
    speed_m_per_min: f64,
) -> Route {
    let mut stations = prefix.path.clone();
    stations.extend(graph.path);
    stations.extend(suffix.path.iter().rev().cloned());

    let distance_m = prefix.distance_m + graph.distance_m + suffix.distance_m;
    Route {
        stations,
        distance_m,
        duration_min: round_to_tenth(
            distance_m / speed_m_per_min + graph.transfer_wait_min,
        ),
        transfer_wait_min: graph.transfer_wait_min,
    }
}
