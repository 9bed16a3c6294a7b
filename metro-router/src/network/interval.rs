//! Interval resolution.
//!
//! An interval is a maximal contiguous run of non-node stations on one
//! line. Each interval knows which boundary node anchors it, so any
//! interior station can be walked to the routable graph in O(run length).
//! The intervals of a line partition exactly its non-node positions.

use crate::domain::LineId;

use super::Network;

/// Which boundary node a run of interior stations resolves toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// A node sits just below the run's start; walk toward lower indices.
    Lower,
    /// A node sits just above the run's end; walk toward higher indices.
    Upper,
    /// Nodes on both sides. No default direction: resolution picks the
    /// nearer boundary by measured distance at locate time.
    Both,
    /// The line has no node at all; the run covers the whole line and
    /// cannot reach the graph.
    Isolated,
}

/// A maximal run of non-node positions on one line, `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// First interior position of the run.
    pub start: usize,
    /// Last interior position of the run, inclusive.
    pub end: usize,
    /// Which side the anchoring node is on.
    pub anchor: Anchor,
}

impl Interval {
    /// Returns true if the position lies inside this interval.
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

/// The intervals of every line, indexed by `LineId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intervals {
    per_line: Vec<Vec<Interval>>,
}

impl Intervals {
    /// Partition each line's non-node positions into anchored intervals.
    pub fn resolve(network: &Network) -> Self {
        let per_line = network
            .lines()
            .iter()
            .map(|line| {
                let mut intervals = Vec::new();
                let mut run_start: Option<usize> = None;
                let len = line.len();

                for index in 0..len {
                    if network.is_node(line.station(index)) {
                        if let Some(start) = run_start.take() {
                            intervals.push(make_interval(start, index - 1, len));
                        }
                    } else if run_start.is_none() {
                        run_start = Some(index);
                    }
                }
                if let Some(start) = run_start {
                    intervals.push(make_interval(start, len - 1, len));
                }

                intervals
            })
            .collect();

        Self { per_line }
    }

    /// The intervals of one line, in position order.
    pub fn of_line(&self, line: LineId) -> &[Interval] {
        &self.per_line[line.index()]
    }

    /// The interval containing the given position, if it is interior.
    pub fn find(&self, line: LineId, index: usize) -> Option<&Interval> {
        self.of_line(line).iter().find(|iv| iv.contains(index))
    }

    /// Returns true if both positions lie in the same interval, meaning no
    /// node separates them on this line.
    pub fn same_interval(&self, line: LineId, a: usize, b: usize) -> bool {
        self.of_line(line)
            .iter()
            .any(|iv| iv.contains(a) && iv.contains(b))
    }
}

/// Classify a closed run by which of its sides is bounded by a node.
///
/// The run is maximal, so a position just outside it is a node exactly
/// when that position exists on the line.
fn make_interval(start: usize, end: usize, line_len: usize) -> Interval {
    let node_below = start > 0;
    let node_above = end + 1 < line_len;
    let anchor = match (node_below, node_above) {
        (true, true) => Anchor::Both,
        (true, false) => Anchor::Lower,
        (false, true) => Anchor::Upper,
        (false, false) => Anchor::Isolated,
    };
    Interval { start, end, anchor }
}
