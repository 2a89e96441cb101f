//! Collision detection and response for circles against circles and walls
//!
//! Everything is tested as circles: the chain head, the mover, and the
//! arena edges as half-planes. Wall hits report an inward normal so the
//! mover can reflect off them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;

/// Collision bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strict overlap (touching circles do not intersect)
    #[inline]
    pub fn intersects(&self, other: &Circle) -> bool {
        let r = self.radius + other.radius;
        self.center.distance_squared(other.center) < r * r
    }
}

/// Arena edges a circle crosses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    /// Inward normal for the crossed horizontal edge (top/bottom), if any
    pub fn vertical_normal(&self) -> Option<Vec2> {
        if self.top {
            Some(Vec2::Y)
        } else if self.bottom {
            Some(Vec2::NEG_Y)
        } else {
            None
        }
    }

    /// Inward normal for the crossed vertical edge (left/right), if any
    pub fn horizontal_normal(&self) -> Option<Vec2> {
        if self.left {
            Some(Vec2::X)
        } else if self.right {
            Some(Vec2::NEG_X)
        } else {
            None
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, with `n` unit length.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Result of one frame's cross-entity and wall checks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Chain head overlaps the mover
    pub eaten: bool,
    /// Chain head crossed an arena edge
    pub head_hit_wall: bool,
    /// Inward normals the mover should bounce on, vertical axis first
    pub body_bounces: Vec<Vec2>,
}

/// Run every check for one frame, in the order the round resolves them
///
/// A mover already travelling away from a crossed wall is left alone so it
/// can leave the edge without being reflected back into it.
pub fn detect(head: Circle, body: Circle, body_velocity: Vec2, arena: &Arena) -> CollisionReport {
    let eaten = head.intersects(&body);
    let head_hit_wall = arena.wall_contact(head).any();

    let contact = arena.wall_contact(body);
    let body_bounces = [contact.vertical_normal(), contact.horizontal_normal()]
        .into_iter()
        .flatten()
        .filter(|normal| body_velocity.dot(*normal) < 0.0)
        .collect();

    CollisionReport {
        eaten,
        head_hit_wall,
        body_bounces,
    }
}
