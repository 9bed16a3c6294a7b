//! Domain types for the metro routing engine.
//!
//! The vocabulary shared by the network model, the scheduler and the
//! planner: line/position identifiers, the route result type, and the
//! error taxonomy surfaced to callers.

mod error;
mod line;
mod route;

pub use error::{FaultError, RouteError, ScheduleError};
pub use line::{LineId, Position};
pub use route::Route;
