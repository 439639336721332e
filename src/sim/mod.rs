//! Simulation module
//!
//! Counting and lifecycle. Physics stepping, collision dispatch and tally
//! updates all happen on one thread, so the tally needs no locking: it is
//! shared only between the controller and its current collision handler.

pub mod controller;
pub mod histogram;
pub mod tally;

pub use controller::{SimPhase, SimulationController};
pub use histogram::Histogram;
pub use tally::{Attribution, BinTally};
