//! In-process physics world
//!
//! A small fixed-step engine that is just enough to drive a Galton board:
//! gravity, a terminal speed cap, balls bouncing off static circles and
//! rectangles, and sensors that report when a ball starts overlapping them.
//! Balls do not collide with each other.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::{Contact, bounce_velocity, circle_circle_contact, circle_rect_contact};
use super::{
    BallId, BodyHandle, BodyTag, CollisionHandler, CollisionPair, PhysicsAdapter, Shape,
};
use crate::consts::*;

/// Engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Fraction of normal speed kept after a bounce
    pub restitution: f32,
    /// Fraction of tangential speed lost per contact
    pub friction: f32,
    /// Terminal ball speed (px/s); keeps per-step travel below the sensor height
    pub max_ball_speed: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            restitution: BALL_RESTITUTION,
            friction: BALL_FRICTION,
            max_ball_speed: MAX_BALL_SPEED,
        }
    }
}

#[derive(Debug, Clone)]
struct Body {
    handle: BodyHandle,
    shape: Shape,
    pos: Vec2,
    vel: Vec2,
    tag: BodyTag,
    sensor: bool,
    in_world: bool,
}

impl Body {
    /// Contact between a ball at `ball_pos` and this body
    fn contact_with(&self, ball_pos: Vec2, ball_radius: f32) -> Contact {
        match self.shape {
            Shape::Circle { radius } => circle_circle_contact(ball_pos, ball_radius, self.pos, radius),
            Shape::Rect { half_extents } => circle_rect_contact(
                ball_pos,
                ball_radius,
                self.pos - half_extents,
                self.pos + half_extents,
            ),
        }
    }
}

fn bounding_radius(shape: Shape) -> f32 {
    match shape {
        Shape::Circle { radius } => radius,
        Shape::Rect { half_extents } => half_extents.max_element(),
    }
}

/// Reference `PhysicsAdapter`
pub struct KinematicWorld {
    tuning: PhysicsTuning,
    statics: Vec<Body>,
    balls: Vec<Body>,
    handler: Option<CollisionHandler>,
    /// (sensor, ball) pairs overlapping at the end of the last step
    touching: HashSet<(BodyHandle, BodyHandle)>,
    next_handle: u32,
}

impl KinematicWorld {
    pub fn new(tuning: PhysicsTuning) -> Self {
        Self {
            tuning,
            statics: Vec::new(),
            balls: Vec::new(),
            handler: None,
            touching: HashSet::new(),
            next_handle: 1,
        }
    }

    /// Bodies currently simulated (static and dynamic)
    pub fn body_count(&self) -> usize {
        self.statics.iter().chain(&self.balls).filter(|b| b.in_world).count()
    }

    pub fn ball_count(&self) -> usize {
        self.balls.iter().filter(|b| b.in_world).count()
    }

    pub fn is_subscribed(&self) -> bool {
        self.handler.is_some()
    }

    /// Positions of every ball in the world, in spawn order
    pub fn ball_positions(&self) -> Vec<(BallId, Vec2)> {
        self.balls
            .iter()
            .filter(|b| b.in_world)
            .filter_map(|b| match b.tag {
                BodyTag::Ball(id) => Some((id, b.pos)),
                _ => None,
            })
            .collect()
    }

    fn alloc_handle(&mut self) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl Default for KinematicWorld {
    fn default() -> Self {
        Self::new(PhysicsTuning::default())
    }
}

impl PhysicsAdapter for KinematicWorld {
    fn create_static_body(
        &mut self,
        shape: Shape,
        position: Vec2,
        tag: BodyTag,
        sensor: bool,
    ) -> BodyHandle {
        let handle = self.alloc_handle();
        self.statics.push(Body {
            handle,
            shape,
            pos: position,
            vel: Vec2::ZERO,
            tag,
            sensor,
            in_world: false,
        });
        handle
    }

    fn create_dynamic_body(
        &mut self,
        shape: Shape,
        position: Vec2,
        velocity: Vec2,
        tag: BodyTag,
    ) -> BodyHandle {
        let handle = self.alloc_handle();
        self.balls.push(Body {
            handle,
            shape,
            pos: position,
            vel: velocity,
            tag,
            sensor: false,
            in_world: false,
        });
        handle
    }

    fn add_to_world(&mut self, handles: &[BodyHandle]) {
        let wanted: HashSet<BodyHandle> = handles.iter().copied().collect();
        for body in self.statics.iter_mut().chain(self.balls.iter_mut()) {
            if wanted.contains(&body.handle) {
                body.in_world = true;
            }
        }
    }

    fn remove_all_from_world(&mut self) {
        log::debug!(
            "Removing {} static bodies and {} balls",
            self.statics.len(),
            self.balls.len()
        );
        self.statics.clear();
        self.balls.clear();
        self.touching.clear();
    }

    fn subscribe_collisions(&mut self, handler: CollisionHandler) {
        if self.handler.is_some() {
            log::warn!("Replacing an existing collision subscription");
        }
        self.handler = Some(handler);
    }

    fn unsubscribe_collisions(&mut self) {
        self.handler = None;
    }

    fn step(&mut self, dt: f32) {
        let gravity = Vec2::new(0.0, self.tuning.gravity);
        let max_speed = self.tuning.max_ball_speed;
        let restitution = self.tuning.restitution;
        let friction = self.tuning.friction;

        let mut events = Vec::new();
        let mut now_touching = HashSet::with_capacity(self.touching.len());

        for ball in self.balls.iter_mut().filter(|b| b.in_world) {
            let radius = bounding_radius(ball.shape);

            // Semi-implicit Euler
            ball.vel = (ball.vel + gravity * dt).clamp_length_max(max_speed);
            ball.pos += ball.vel * dt;

            for solid in self.statics.iter().filter(|s| s.in_world && !s.sensor) {
                let contact = solid.contact_with(ball.pos, radius);
                if contact.hit {
                    ball.pos += contact.normal * contact.penetration;
                    ball.vel = bounce_velocity(ball.vel, contact.normal, restitution, friction);
                }
            }

            for sensor in self.statics.iter().filter(|s| s.in_world && s.sensor) {
                if !sensor.contact_with(ball.pos, radius).hit {
                    continue;
                }
                let key = (sensor.handle, ball.handle);
                if !self.touching.contains(&key) {
                    events.push(CollisionPair {
                        a: sensor.tag,
                        b: ball.tag,
                    });
                }
                now_touching.insert(key);
            }
        }

        self.touching = now_touching;

        if let Some(handler) = self.handler.as_mut() {
            for event in events {
                handler(event);
            }
        }
    }

    fn max_step_displacement(&self, dt: f32) -> Option<f32> {
        Some(self.tuning.max_ball_speed * dt)
    }
}
