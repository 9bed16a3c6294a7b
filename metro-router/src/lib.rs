//! Metro route planning engine.
//!
//! An in-process library that answers: "starting from this station at this
//! time, what is the quickest way to that station?" over a fixed-topology
//! metro network, accounting for train speed, time-of-day transfer waits,
//! service-closure windows, and simulated line faults.

pub mod domain;
pub mod engine;
pub mod network;
pub mod planner;
pub mod schedule;
