//! On-disk network description.
//!
//! A network file is a JSON document with one ordered group per line, each
//! entry a `[stationName, cumulativeDistance]` pair, plus the explicit set
//! of station names that form the routable graph:
//!
//! ```json
//! {
//!   "lines": [
//!     [["Piraeus", 0.0], ["Faliro", 1600.0], ["Moschato", 2500.0]],
//!     [["Egaleo", 0.0], ["Eleonas", 1400.0]]
//!   ],
//!   "nodes": ["Moschato"]
//! }
//! ```
//!
//! Distances are meters along the line; they are only comparable within
//! one line. The file is loaded once at startup; reloading rebuilds the
//! whole model from scratch.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating a network description.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("failed to read network file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON in the expected shape
    #[error("failed to parse network file: {0}")]
    Json(#[from] serde_json::Error),

    /// A line has no stations
    #[error("line {0} has no stations")]
    EmptyLine(usize),

    /// A station appears twice on the same line
    #[error("station {station} appears twice on line {line}")]
    DuplicateStation {
        /// Zero-based line index in the description.
        line: usize,
        /// The repeated station name.
        station: String,
    },

    /// A declared node does not name any station
    #[error("node {0} does not name any station")]
    UnknownNode(String),
}

/// Parsed network description, prior to model construction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// One entry per line: ordered `(station, cumulative distance)` pairs.
    pub lines: Vec<Vec<(String, f64)>>,
    /// Station names designated as nodes of the routable graph.
    pub nodes: Vec<String>,
}

impl NetworkConfig {
    /// Parse a network description from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a network description from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "lines": [
            [["A", 0.0], ["B", 1000.0], ["C", 2100.0]],
            [["D", 0.0], ["B", 900.0], ["E", 1800.0]]
        ],
        "nodes": ["B"]
    }"#;

    #[test]
    fn parse_sample() {
        let config = NetworkConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.lines.len(), 2);
        assert_eq!(config.lines[0].len(), 3);
        assert_eq!(config.lines[0][1], ("B".to_string(), 1000.0));
        assert_eq!(config.nodes, vec!["B"]);
    }

    #[test]
    fn reject_malformed_json() {
        let err = NetworkConfig::from_json("{\"lines\": [").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn reject_wrong_shape() {
        // Entries must be [name, distance] pairs.
        let err = NetworkConfig::from_json(r#"{"lines": [[["A"]]], "nodes": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = NetworkConfig::from_path(file.path()).unwrap();
        assert_eq!(config.lines.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = NetworkConfig::from_path("/nonexistent/network.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
