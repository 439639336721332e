//! Physics engine boundary
//!
//! The simulation core never integrates motion itself. It talks to an engine
//! through `PhysicsAdapter`: create bodies, add them to the world, tear the
//! world down, and listen for collision-start events. Every body carries a
//! `BodyTag` set by the core; the engine hands tags back in events without
//! interpreting them.

pub mod contact;
pub mod world;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use contact::{Contact, bounce_velocity, circle_circle_contact, circle_rect_contact};
pub use world::{KinematicWorld, PhysicsTuning};

/// Opaque ball identity, allocated by the simulation controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u64);

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engine-side handle for a created body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// What a body is, from the core's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyTag {
    Peg,
    Wall,
    Floor,
    Partition,
    BinSensor(usize),
    Ball(BallId),
}

/// Collision shape, positioned at the body's center
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// Two bodies that started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: BodyTag,
    pub b: BodyTag,
}

impl CollisionPair {
    /// The (bin, ball) pair if this is a ball entering a bin sensor, in either order
    pub fn sensor_hit(&self) -> Option<(usize, BallId)> {
        match (self.a, self.b) {
            (BodyTag::BinSensor(bin), BodyTag::Ball(ball))
            | (BodyTag::Ball(ball), BodyTag::BinSensor(bin)) => Some((bin, ball)),
            _ => None,
        }
    }
}

/// Callback invoked synchronously for each collision-start event
pub type CollisionHandler = Box<dyn FnMut(CollisionPair)>;

/// Contract the simulation needs from a rigid-body engine
pub trait PhysicsAdapter {
    /// Whether the engine can accept bodies right now
    fn is_ready(&self) -> bool {
        true
    }

    /// Create a static body. Sensors report overlaps but never block motion.
    fn create_static_body(
        &mut self,
        shape: Shape,
        position: Vec2,
        tag: BodyTag,
        sensor: bool,
    ) -> BodyHandle;

    /// Create a dynamic body (a ball)
    fn create_dynamic_body(
        &mut self,
        shape: Shape,
        position: Vec2,
        velocity: Vec2,
        tag: BodyTag,
    ) -> BodyHandle;

    /// Make created bodies part of the simulated world
    fn add_to_world(&mut self, handles: &[BodyHandle]);

    /// Drop every body, static and dynamic
    fn remove_all_from_world(&mut self);

    /// Replace the collision listener; only one is active at a time
    fn subscribe_collisions(&mut self, handler: CollisionHandler);

    /// Stop delivering collision events
    fn unsubscribe_collisions(&mut self);

    /// Advance the world by `dt` seconds, delivering events as they are detected
    fn step(&mut self, dt: f32);

    /// Upper bound on how far any body moves in one step of `dt`, if known
    fn max_step_displacement(&self, _dt: f32) -> Option<f32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_hit_either_order() {
        let ball = BodyTag::Ball(BallId(3));
        let sensor = BodyTag::BinSensor(4);

        let pair = CollisionPair { a: sensor, b: ball };
        assert_eq!(pair.sensor_hit(), Some((4, BallId(3))));

        let pair = CollisionPair { a: ball, b: sensor };
        assert_eq!(pair.sensor_hit(), Some((4, BallId(3))));
    }

    #[test]
    fn test_non_sensor_pairs_ignored() {
        let pair = CollisionPair {
            a: BodyTag::Ball(BallId(1)),
            b: BodyTag::Peg,
        };
        assert_eq!(pair.sensor_hit(), None);

        let pair = CollisionPair {
            a: BodyTag::Ball(BallId(1)),
            b: BodyTag::Ball(BallId(2)),
        };
        assert_eq!(pair.sensor_hit(), None);
    }
}
