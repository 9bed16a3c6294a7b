//! Node adjacency and fault injection.
//!
//! For every node, the nearest node in each direction of each line it
//! touches, with the physical distance between them. Connections are
//! stored symmetrically but each direction is independently removable,
//! which is what fault injection exploits. Rebuilding from the static
//! node set heals all faults at once.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{FaultError, LineId};

use super::Network;

/// A direct connection from one node to a neighboring node.
///
/// "Neighboring" means the nearest node reachable by riding `line`
/// without passing another node.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// The neighboring node's station name.
    pub to: String,
    /// The line the connection rides on.
    pub line: LineId,
    /// Physical distance in meters.
    pub distance_m: f64,
}

/// The routable graph: per-node outgoing edges plus the minimum observed
/// node-to-node span, which seeds the search heuristic.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjacency {
    edges: HashMap<String, Vec<Edge>>,
    min_span_m: f64,
}

impl Adjacency {
    /// Derive the adjacency of every node from the static network.
    ///
    /// The minimum span starts at the distance covered in one minute at
    /// the given speed, so the derived heuristic unit cost never exceeds
    /// one minute. Calling this again with the same network replaces all
    /// adjacency, discarding any injected faults.
    pub fn build(network: &Network, speed_m_per_min: f64) -> Self {
        let mut edges: HashMap<String, Vec<Edge>> = HashMap::new();
        let mut min_span_m = speed_m_per_min;

        for node in network.nodes() {
            let mut outgoing = Vec::new();
            for position in network.occurrences(node) {
                let line = network.line(position.line);
                let index = position.index;

                if index > 0 && network.is_node(line.station(index - 1)) {
                    let distance_m = line.span(index - 1, index);
                    min_span_m = min_span_m.min(distance_m);
                    outgoing.push(Edge {
                        to: line.station(index - 1).to_string(),
                        line: position.line,
                        distance_m,
                    });
                }
                if index + 1 < line.len() && network.is_node(line.station(index + 1)) {
                    let distance_m = line.span(index, index + 1);
                    min_span_m = min_span_m.min(distance_m);
                    outgoing.push(Edge {
                        to: line.station(index + 1).to_string(),
                        line: position.line,
                        distance_m,
                    });
                }
            }
            edges.insert(node.to_string(), outgoing);
        }

        Self { edges, min_span_m }
    }

    /// Outgoing edges of a node; empty when the name is not a node.
    pub fn neighbors(&self, node: &str) -> &[Edge] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if the name is a node of the graph.
    pub fn contains(&self, node: &str) -> bool {
        self.edges.contains_key(node)
    }

    /// Returns true if a direct connection exists in either direction.
    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbors(a).iter().any(|e| e.to == b)
            || self.neighbors(b).iter().any(|e| e.to == a)
    }

    /// Minimum observed node-to-node span in meters.
    pub fn min_span_m(&self) -> f64 {
        self.min_span_m
    }

    /// Remove the connection between two adjacent nodes, both directions.
    ///
    /// The adjacency is untouched on error. Restoration is all-or-nothing,
    /// via a full rebuild.
    pub fn break_connection(&mut self, a: &str, b: &str) -> Result<(), FaultError> {
        for node in [a, b] {
            if !self.edges.contains_key(node) {
                return Err(FaultError::UnknownNode(node.to_string()));
            }
        }
        if !self.are_adjacent(a, b) {
            return Err(FaultError::NotAdjacent {
                a: a.to_string(),
                b: b.to_string(),
            });
        }

        if let Some(edges) = self.edges.get_mut(a) {
            edges.retain(|e| e.to != b);
        }
        if let Some(edges) = self.edges.get_mut(b) {
            edges.retain(|e| e.to != a);
        }
        debug!(from = a, to = b, "connection broken");
        Ok(())
    }
}
