//! Route planning over the node graph.
//!
//! The planner is a two-stage pipeline. The locator resolves arbitrary
//! stations onto the routable graph (answering directly when no node is
//! involved), and the search runs a time-aware A* between nodes, guided by
//! an admissible per-query heuristic.

mod heuristic;
mod locate;
mod search;

pub use heuristic::heuristic_costs;
pub use locate::{Boundary, Locator, Resolution, stitch};
pub use search::{GraphPath, GraphSearch, NodeQuery, SearchFailure};
