//! Time-aware A* over the node graph.
//!
//! Expands nodes in order of estimated total time (real cost so far plus
//! the heuristic lower bound), charging a schedule-dependent wait whenever
//! an expansion changes line. A transfer that falls inside a closure
//! window prunes only that edge; the search remembers that this happened
//! so callers can tell "closed" apart from "disconnected" when the
//! frontier runs dry.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::domain::LineId;
use crate::network::Adjacency;
use crate::schedule::{Timetable, round_to_tenth};

use super::heuristic::heuristic_costs;

/// A node-to-node query, as produced by the locator.
///
/// `origin_line`/`destination_line` carry the line commitment of walked
/// boundary sub-paths: `None` means the trip has not boarded any line yet
/// (or may arrive on any line). `offset_min` is the time already spent
/// before entering the graph, used to evaluate the schedule at the right
/// wall-clock moment.
#[derive(Debug, Clone)]
pub struct NodeQuery {
    /// Origin node name.
    pub origin: String,
    /// Destination node name.
    pub destination: String,
    /// Line the trip arrives at the origin node on, if committed.
    pub origin_line: Option<LineId>,
    /// Line the trip must leave the destination node on, if any.
    pub destination_line: Option<LineId>,
    /// Minutes already used before the graph segment starts.
    pub offset_min: f64,
}

/// A path through the node graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    /// Node names from origin to destination, both inclusive.
    pub path: Vec<String>,
    /// Distance ridden within the graph, meters.
    pub distance_m: f64,
    /// Accumulated transfer wait within the graph, minutes.
    pub transfer_wait_min: f64,
}

/// Why the search ended without a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    /// The frontier ran dry with no closure involved: the destination is
    /// disconnected in the current graph.
    NoRoute,
    /// Every remaining option required a transfer while the metro was
    /// closed.
    Closed,
}

/// Frontier entry. The heap is a min-heap on estimated total cost with
/// insertion order breaking ties; stale duplicates of a settled node are
/// discarded when popped.
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    cost: OrderedFloat<f64>,
    seq: u64,
    node: String,
    predecessor: String,
    distance_m: f64,
    line: Option<LineId>,
    wait_min: f64,
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.cost, other.seq).cmp(&(self.cost, self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search over the adjacency, consulting the timetable for transfer
/// feasibility along the way.
pub struct GraphSearch<'a> {
    adjacency: &'a Adjacency,
    timetable: &'a Timetable,
}

impl<'a> GraphSearch<'a> {
    /// Create a search over the given graph and schedule.
    pub fn new(adjacency: &'a Adjacency, timetable: &'a Timetable) -> Self {
        Self {
            adjacency,
            timetable,
        }
    }

    /// Find the minimum-time path for the query.
    pub fn run(&self, query: &NodeQuery) -> Result<GraphPath, SearchFailure> {
        let speed = self.timetable.speed_m_per_min();
        let estimates = heuristic_costs(
            self.adjacency,
            speed,
            &query.destination,
            query.destination_line,
        );
        debug!(
            origin = %query.origin,
            destination = %query.destination,
            "graph search"
        );

        // node -> predecessor; doubles as the closed set. The origin is
        // its own predecessor, which path reconstruction uses as the stop
        // sentinel.
        let mut settled: HashMap<String, String> = HashMap::new();
        let mut frontier = BinaryHeap::new();
        let mut seq: u64 = 0;
        let mut closure_pruned = false;

        frontier.push(Entry {
            cost: OrderedFloat(0.0),
            seq,
            node: query.origin.clone(),
            predecessor: query.origin.clone(),
            distance_m: 0.0,
            line: query.origin_line,
            wait_min: 0.0,
        });

        while let Some(entry) = frontier.pop() {
            if entry.node == query.destination {
                return Ok(self.reconstruct(entry, &settled));
            }
            if settled.contains_key(&entry.node) {
                continue;
            }
            settled.insert(entry.node.clone(), entry.predecessor.clone());

            for edge in self.adjacency.neighbors(&entry.node) {
                if settled.contains_key(&edge.to) {
                    continue;
                }
                // Nodes the heuristic never reached cannot reach the
                // destination either.
                let Some(&remaining) = estimates.get(&edge.to) else {
                    continue;
                };

                let distance_m = entry.distance_m + edge.distance_m;
                let travel_min = round_to_tenth(distance_m / speed);
                let mut hop_wait = 0.0;

                // Changing lines costs a schedule-dependent wait; inside a
                // closure window this edge is not an option.
                if entry.line.is_some_and(|line| line != edge.line) {
                    let elapsed =
                        round_to_tenth(travel_min + entry.wait_min + query.offset_min);
                    match self.timetable.transfer_wait(elapsed) {
                        Some(wait) => hop_wait += wait,
                        None => {
                            trace!(at = %entry.node, to = %edge.to, "transfer pruned: closed");
                            closure_pruned = true;
                            continue;
                        }
                    }
                }

                // Reaching the destination on the wrong line means one
                // more transfer there.
                if edge.to == query.destination
                    && query.destination_line.is_some_and(|line| line != edge.line)
                {
                    let elapsed = round_to_tenth(
                        travel_min + entry.wait_min + hop_wait + query.offset_min,
                    );
                    match self.timetable.transfer_wait(elapsed) {
                        Some(wait) => hop_wait += wait,
                        None => {
                            trace!(to = %edge.to, "arrival transfer pruned: closed");
                            closure_pruned = true;
                            continue;
                        }
                    }
                }

                let wait_min = entry.wait_min + hop_wait;
                seq += 1;
                frontier.push(Entry {
                    cost: OrderedFloat(travel_min + wait_min + remaining),
                    seq,
                    node: edge.to.clone(),
                    predecessor: entry.node.clone(),
                    distance_m,
                    line: Some(edge.line),
                    wait_min,
                });
            }
        }

        Err(if closure_pruned {
            SearchFailure::Closed
        } else {
            SearchFailure::NoRoute
        })
    }

    /// Follow predecessor links back from the destination entry to the
    /// node that is its own predecessor.
    fn reconstruct(&self, entry: Entry, settled: &HashMap<String, String>) -> GraphPath {
        let mut path = vec![entry.node.clone()];
        if entry.node != entry.predecessor {
            let mut current = entry.predecessor;
            loop {
                path.push(current.clone());
                let parent = &settled[&current];
                if *parent == current {
                    break;
                }
                current = parent.clone();
            }
        }
        path.reverse();

        GraphPath {
            path,
            distance_m: entry.distance_m,
            transfer_wait_min: entry.wait_min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{Network, NetworkConfig};
    use chrono::Weekday;

    // Two parallel lines joined at both ends, with a shortcut line:
    //   line 0: A - B - C      (1000 m hops)
    //   line 1: A - D - C      (A-D 4000 m, D-C 4000 m)
    //   line 2: B - D          (600 m)
    fn network() -> Network {
        let config = NetworkConfig {
            lines: vec![
                vec![
                    ("A".into(), 0.0),
                    ("B".into(), 1000.0),
                    ("C".into(), 2000.0),
                ],
                vec![
                    ("A".into(), 0.0),
                    ("D".into(), 4000.0),
                    ("C".into(), 8000.0),
                ],
                vec![("B".into(), 0.0), ("D".into(), 600.0)],
            ],
            nodes: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        };
        Network::new(&config).unwrap()
    }

    fn timetable(day: Weekday, hour: u32, minute: u32) -> Timetable {
        let mut timetable = Timetable::default();
        timetable.set_departure(day, hour, minute).unwrap();
        timetable.set_speed_kmh(60).unwrap(); // 1000 m/min
        timetable
    }

    fn query(origin: &str, destination: &str) -> NodeQuery {
        NodeQuery {
            origin: origin.into(),
            destination: destination.into(),
            origin_line: None,
            destination_line: None,
            offset_min: 0.0,
        }
    }

    #[test]
    fn prefers_the_short_line() {
        let timetable = timetable(Weekday::Mon, 12, 0);
        let adjacency = Adjacency::build(&network(), timetable.speed_m_per_min());
        let search = GraphSearch::new(&adjacency, &timetable);

        let found = search.run(&query("A", "C")).unwrap();
        assert_eq!(found.path, vec!["A", "B", "C"]);
        assert_eq!(found.distance_m, 2000.0);
        assert_eq!(found.transfer_wait_min, 0.0);
    }

    #[test]
    fn single_hop() {
        let timetable = timetable(Weekday::Mon, 12, 0);
        let adjacency = Adjacency::build(&network(), timetable.speed_m_per_min());
        let search = GraphSearch::new(&adjacency, &timetable);

        let found = search.run(&query("A", "B")).unwrap();
        assert_eq!(found.path, vec!["A", "B"]);
        assert_eq!(found.distance_m, 1000.0);
    }

    #[test]
    fn charges_transfer_when_changing_lines() {
        // B -> D is only reachable by switching from line 0 to line 2.
        let timetable = timetable(Weekday::Mon, 12, 0);
        let adjacency = Adjacency::build(&network(), timetable.speed_m_per_min());
        let search = GraphSearch::new(&adjacency, &timetable);

        let mut q = query("B", "D");
        q.origin_line = Some(LineId::new(0)); // arrived at B on line 0
        let found = search.run(&q).unwrap();

        assert_eq!(found.path, vec!["B", "D"]);
        // Midday wait is 3 minutes.
        assert_eq!(found.transfer_wait_min, 3.0);
    }

    #[test]
    fn no_transfer_without_line_commitment() {
        let timetable = timetable(Weekday::Mon, 12, 0);
        let adjacency = Adjacency::build(&network(), timetable.speed_m_per_min());
        let search = GraphSearch::new(&adjacency, &timetable);

        let found = search.run(&query("B", "D")).unwrap();
        assert_eq!(found.transfer_wait_min, 0.0);
    }

    #[test]
    fn arrival_line_requirement_adds_a_wait() {
        let timetable = timetable(Weekday::Mon, 12, 0);
        let adjacency = Adjacency::build(&network(), timetable.speed_m_per_min());
        let search = GraphSearch::new(&adjacency, &timetable);

        // Must arrive at B ready to continue on line 2, but the ride in
        // comes on line 0.
        let mut q = query("A", "B");
        q.destination_line = Some(LineId::new(2));
        let found = search.run(&q).unwrap();
        assert_eq!(found.path, vec!["A", "B"]);
        assert_eq!(found.transfer_wait_min, 3.0);
    }

    #[test]
    fn severed_graph_reports_no_route() {
        let timetable = timetable(Weekday::Mon, 12, 0);
        let mut adjacency = Adjacency::build(&network(), timetable.speed_m_per_min());
        adjacency.break_connection("A", "B").unwrap();
        adjacency.break_connection("A", "D").unwrap();
        let search = GraphSearch::new(&adjacency, &timetable);

        assert_eq!(search.run(&query("A", "C")), Err(SearchFailure::NoRoute));
    }

    #[test]
    fn closure_pruning_reports_closed() {
        // Depart Tuesday 00:20: the only route B -> D needs a line change,
        // and by the time it happens the metro has shut.
        let timetable = timetable(Weekday::Tue, 0, 20);
        let adjacency = Adjacency::build(&network(), timetable.speed_m_per_min());
        let search = GraphSearch::new(&adjacency, &timetable);

        let mut q = query("B", "D");
        q.origin_line = Some(LineId::new(0));
        q.offset_min = 15.0; // already 15 minutes into the trip: 00:35
        assert_eq!(search.run(&q), Err(SearchFailure::Closed));
    }

    #[test]
    fn duplicate_frontier_entries_are_ignored() {
        // A is reachable from both B and D; the worse entry must be
        // discarded, not corrupt the path.
        let timetable = timetable(Weekday::Mon, 12, 0);
        let adjacency = Adjacency::build(&network(), timetable.speed_m_per_min());
        let search = GraphSearch::new(&adjacency, &timetable);

        let found = search.run(&query("C", "A")).unwrap();
        assert_eq!(found.path, vec!["C", "B", "A"]);
    }
}
