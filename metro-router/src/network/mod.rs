//! Static network model.
//!
//! Built once from a [`NetworkConfig`] and fixed for the lifetime of the
//! engine: per-line station order and cumulative distances, a station →
//! occurrences index, and the explicit set of node stations that make up
//! the routable graph. Only the adjacency derived from this model is
//! mutable, via fault injection.

mod adjacency;
mod config;
mod interval;

pub use adjacency::{Adjacency, Edge};
pub use config::{ConfigError, NetworkConfig};
pub use interval::{Anchor, Interval, Intervals};

use std::collections::{HashMap, HashSet};

use crate::domain::{LineId, Position};

/// One metro line: ordered stations with cumulative distances in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    stations: Vec<String>,
    distances: Vec<f64>,
}

impl Line {
    /// Number of stations on the line.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if the line has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station name at the given index.
    pub fn station(&self, index: usize) -> &str {
        &self.stations[index]
    }

    /// All station names in line order.
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    /// Physical distance in meters between two positions on this line.
    pub fn span(&self, a: usize, b: usize) -> f64 {
        (self.distances[a] - self.distances[b]).abs()
    }
}

/// The static network: lines, station occurrences, and the node set.
#[derive(Debug, Clone)]
pub struct Network {
    lines: Vec<Line>,
    occurrences: HashMap<String, Vec<Position>>,
    nodes: HashSet<String>,
}

impl Network {
    /// Build the model from a parsed description.
    ///
    /// Validates that every line is non-empty, that no station repeats
    /// within one line, and that every declared node names a known station.
    pub fn new(config: &NetworkConfig) -> Result<Self, ConfigError> {
        let mut lines = Vec::with_capacity(config.lines.len());
        let mut occurrences: HashMap<String, Vec<Position>> = HashMap::new();

        for (line_idx, entries) in config.lines.iter().enumerate() {
            if entries.is_empty() {
                return Err(ConfigError::EmptyLine(line_idx));
            }

            let mut stations = Vec::with_capacity(entries.len());
            let mut distances = Vec::with_capacity(entries.len());
            let mut seen: HashSet<&str> = HashSet::new();

            for (index, (name, distance)) in entries.iter().enumerate() {
                if !seen.insert(name) {
                    return Err(ConfigError::DuplicateStation {
                        line: line_idx,
                        station: name.clone(),
                    });
                }
                stations.push(name.clone());
                distances.push(*distance);
                occurrences
                    .entry(name.clone())
                    .or_default()
                    .push(Position::new(LineId::new(line_idx), index));
            }

            lines.push(Line {
                stations,
                distances,
            });
        }

        let mut nodes = HashSet::with_capacity(config.nodes.len());
        for node in &config.nodes {
            if !occurrences.contains_key(node) {
                return Err(ConfigError::UnknownNode(node.clone()));
            }
            nodes.insert(node.clone());
        }

        Ok(Self {
            lines,
            occurrences,
            nodes,
        })
    }

    /// Returns true if the network knows this station name.
    pub fn contains(&self, name: &str) -> bool {
        self.occurrences.contains_key(name)
    }

    /// Returns true if the station is a node of the routable graph.
    pub fn is_node(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    /// All `(line, index)` occurrences of a station; empty when unknown.
    pub fn occurrences(&self, name: &str) -> &[Position] {
        self.occurrences
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The line with the given identifier.
    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.index()]
    }

    /// All lines in description order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Iterator over the node station names, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// Number of node stations.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
