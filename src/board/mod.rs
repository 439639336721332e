//! Board layout
//!
//! Everything here is pure: a `BoardConfig` goes in, an immutable
//! `GeometryModel` comes out. No physics engine knowledge.

pub mod config;
pub mod geometry;
pub mod layout;

pub use config::{BoardConfig, PegLayout};
pub use geometry::{BinSensor, GeometryModel, Peg, Rect};
pub use layout::generate;
