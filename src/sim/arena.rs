//! Rectangular play field

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, WallContact};
use crate::consts::*;

/// Axis-aligned arena bounds (screen coordinates, +Y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_LEFT, ARENA_TOP, ARENA_RIGHT, ARENA_BOTTOM)
    }
}

impl Arena {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// True when the arena has a positive interior
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Point containment (edges inclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Which edges a circle pokes through
    pub fn wall_contact(&self, circle: Circle) -> WallContact {
        WallContact {
            left: circle.center.x - circle.radius < self.left,
            right: circle.center.x + circle.radius > self.right,
            top: circle.center.y - circle.radius < self.top,
            bottom: circle.center.y + circle.radius > self.bottom,
        }
    }
}
