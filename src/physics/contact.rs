//! Contact detection and response for balls
//!
//! Balls are circles; everything they hit is either a circle (pegs) or an
//! axis-aligned rectangle (walls, floor, partitions, sensors).

use glam::Vec2;

/// Result of a contact check
#[derive(Debug, Clone)]
pub struct Contact {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Surface normal pointing from the obstacle toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against a circular obstacle
pub fn circle_circle_contact(
    ball_pos: Vec2,
    ball_radius: f32,
    center: Vec2,
    radius: f32,
) -> Contact {
    let delta = ball_pos - center;
    let dist = delta.length();
    let reach = ball_radius + radius;

    if dist >= reach {
        return Contact::miss();
    }

    // Concentric: push straight up, against gravity
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::NEG_Y
    };

    Contact {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Check a ball against an axis-aligned rectangle given by its corners
pub fn circle_rect_contact(ball_pos: Vec2, ball_radius: f32, min: Vec2, max: Vec2) -> Contact {
    let closest = ball_pos.clamp(min, max);
    let delta = ball_pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq >= ball_radius * ball_radius {
        return Contact::miss();
    }

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        return Contact {
            hit: true,
            normal: delta / dist,
            penetration: ball_radius - dist,
        };
    }

    // Center is inside the rectangle: exit through the nearest face
    let to_min = ball_pos - min;
    let to_max = max - ball_pos;
    let faces = [
        (to_min.x, Vec2::NEG_X),
        (to_max.x, Vec2::X),
        (to_min.y, Vec2::NEG_Y),
        (to_max.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, Vec2::NEG_Y));

    Contact {
        hit: true,
        normal,
        penetration: depth + ball_radius,
    }
}

/// Velocity after hitting a surface, with energy loss
///
/// The normal component is reversed and scaled by `restitution`, the
/// tangential component is scaled by `1 - friction`. A ball already moving
/// away from the surface is left alone.
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32, friction: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return velocity;
    }
    let normal_part = normal * vn;
    let tangent_part = velocity - normal_part;
    tangent_part * (1.0 - friction) - normal_part * restitution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle_hit() {
        let result = circle_circle_contact(Vec2::new(0.0, -10.0), 7.0, Vec2::ZERO, 5.0);
        assert!(result.hit);
        assert!((result.penetration - 2.0).abs() < 0.001);
        // Ball is above the peg, normal points up (negative y)
        assert!((result.normal - Vec2::NEG_Y).length() < 0.001);
    }

    #[test]
    fn test_circle_circle_miss() {
        let result = circle_circle_contact(Vec2::new(20.0, 0.0), 7.0, Vec2::ZERO, 5.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_rect_from_above() {
        let min = Vec2::new(0.0, 100.0);
        let max = Vec2::new(50.0, 120.0);
        let result = circle_rect_contact(Vec2::new(25.0, 95.0), 7.0, min, max);
        assert!(result.hit);
        assert!((result.normal - Vec2::NEG_Y).length() < 0.001);
        assert!((result.penetration - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_rect_center_inside() {
        let min = Vec2::new(0.0, 0.0);
        let max = Vec2::new(100.0, 20.0);
        // Closer to the top face than any other
        let result = circle_rect_contact(Vec2::new(50.0, 3.0), 7.0, min, max);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        assert!((result.penetration - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_rect_miss() {
        let result = circle_rect_contact(
            Vec2::new(25.0, 80.0),
            7.0,
            Vec2::new(0.0, 100.0),
            Vec2::new(50.0, 120.0),
        );
        assert!(!result.hit);
    }

    #[test]
    fn test_bounce_loses_energy() {
        let velocity = Vec2::new(10.0, 100.0);
        let bounced = bounce_velocity(velocity, Vec2::NEG_Y, 0.5, 0.1);
        assert!((bounced.y - (-50.0)).abs() < 0.001);
        assert!((bounced.x - 9.0).abs() < 0.001);
    }

    #[test]
    fn test_bounce_ignores_separating_ball() {
        let velocity = Vec2::new(0.0, -30.0);
        assert_eq!(bounce_velocity(velocity, Vec2::NEG_Y, 0.5, 0.1), velocity);
    }
}
