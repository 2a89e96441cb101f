//! The bouncing mover the chain hunts
//!
//! The mover drifts at constant speed, reflects off arena walls, and after
//! being caught respawns on the side of the arena away from the chain head.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::collision::{Circle, reflect_velocity};
use crate::{polar_to_cartesian, sprite_center};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BouncingBody {
    /// Top-left corner of the sprite
    pub position: Vec2,
    pub velocity: Vec2,
    /// Sprite footprint
    pub footprint: Vec2,
    /// Magnitude of `velocity`
    speed: f32,
    /// Fraction of the footprint width the mover is pushed off a wall
    nudge: f32,
}

impl BouncingBody {
    /// Stationary mover; call `randomize_velocity` to set it going
    pub fn new(position: Vec2, footprint: Vec2, speed: f32, nudge: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            footprint,
            speed,
            nudge,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn center(&self) -> Vec2 {
        sprite_center(self.position, self.footprint)
    }

    /// Collision radius: a quarter of the footprint width
    pub fn radius(&self) -> f32 {
        self.footprint.x * 0.25
    }

    pub fn bounds(&self) -> Circle {
        Circle::new(self.center(), self.radius())
    }

    /// Point the mover in a uniformly random direction at its fixed speed
    pub fn randomize_velocity(&mut self, rng: &mut impl Rng) {
        let theta = rng.random_range(0.0..std::f32::consts::TAU);
        self.velocity = polar_to_cartesian(self.speed, theta);
    }

    /// Push off a wall along its unit `normal`, then reflect
    pub fn bounce(&mut self, normal: Vec2) {
        let normal = normal.normalize_or_zero();
        self.position += normal * self.footprint.x * self.nudge;
        self.velocity = reflect_velocity(self.velocity, normal);
    }

    /// Advance one frame
    ///
    /// `frame_scale` is 1.0 for the classic fixed per-frame step, or
    /// `dt * reference_fps` for frame-rate independent motion.
    pub fn update(&mut self, frame_scale: f32) {
        self.position += self.velocity * frame_scale;
    }

    /// Respawn against the wall opposite the chain head
    ///
    /// If the head is further from the arena center horizontally than
    /// vertically, the mover is pinned near the opposite left/right wall and
    /// given a random height; otherwise it is pinned near the opposite
    /// top/bottom wall and given a random x. Padding is twice the mover's
    /// radius.
    pub fn position_away_from(&mut self, head_center: Vec2, arena: &Arena, rng: &mut impl Rng) {
        let padding = self.radius() * 2.0;
        let center_to_head = head_center - arena.center();

        let center = if center_to_head.x.abs() > center_to_head.y.abs() {
            let x = if center_to_head.x > 0.0 {
                arena.left + padding
            } else {
                arena.right - padding
            };
            Vec2::new(x, random_between(rng, arena.top + padding, arena.bottom - padding))
        } else {
            let y = if center_to_head.y > 0.0 {
                arena.top + padding
            } else {
                arena.bottom - padding
            };
            Vec2::new(random_between(rng, arena.left + padding, arena.right - padding), y)
        };

        self.position = center - self.footprint * 0.5;
    }
}

/// Uniform in [lo, hi), collapsing to `lo` on an empty range
fn random_between(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn body_at(x: f32, y: f32) -> BouncingBody {
        BouncingBody::new(Vec2::new(x, y), Vec2::splat(32.0), 5.0, 0.1)
    }

    #[test]
    fn test_bounds() {
        let body = body_at(10.0, 50.0);
        let bounds = body.bounds();
        assert_eq!(bounds.center, Vec2::new(26.0, 66.0));
        assert_eq!(bounds.radius, 8.0);
    }

    #[test]
    fn test_randomize_velocity_keeps_speed() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut body = body_at(0.0, 0.0);
        for _ in 0..32 {
            body.randomize_velocity(&mut rng);
            assert!((body.velocity.length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_left_wall_bounce() {
        let arena = Arena::new(20.0, 0.0, 400.0, 400.0);
        let mut body = body_at(10.0, 50.0);
        body.velocity = Vec2::new(-5.0, 0.0);

        let contact = arena.wall_contact(body.bounds());
        assert!(contact.left);
        let normal = contact.horizontal_normal().unwrap();
        assert_eq!(normal, Vec2::X);

        body.bounce(normal);
        assert!((body.position.x - 13.2).abs() < 1e-4);
        assert_eq!(body.position.y, 50.0);
        assert!((body.velocity - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_update_is_per_frame() {
        let mut body = body_at(0.0, 0.0);
        body.velocity = Vec2::new(3.0, -4.0);
        body.update(1.0);
        body.update(1.0);
        assert_eq!(body.position, Vec2::new(6.0, -8.0));
        body.update(0.5);
        assert_eq!(body.position, Vec2::new(7.5, -10.0));
    }

    #[test]
    fn test_relocates_to_opposite_vertical_wall() {
        let arena = Arena::new(0.0, 0.0, 800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut body = body_at(0.0, 0.0);

        body.position_away_from(Vec2::new(700.0, 320.0), &arena, &mut rng);
        assert_eq!(body.center().x, 16.0);
        assert!(body.center().y >= 16.0 && body.center().y < 584.0);

        body.position_away_from(Vec2::new(100.0, 280.0), &arena, &mut rng);
        assert_eq!(body.center().x, 784.0);
    }

    #[test]
    fn test_relocates_to_opposite_horizontal_wall() {
        let arena = Arena::new(0.0, 0.0, 800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut body = body_at(0.0, 0.0);

        body.position_away_from(Vec2::new(400.0, 550.0), &arena, &mut rng);
        assert_eq!(body.center().y, 16.0);
        assert!(body.center().x >= 16.0 && body.center().x < 784.0);

        body.position_away_from(Vec2::new(410.0, 40.0), &arena, &mut rng);
        assert_eq!(body.center().y, 584.0);
    }

    proptest! {
        #[test]
        fn prop_bounce_preserves_speed(
            angle in 0.0f32..std::f32::consts::TAU,
            normal_angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let mut body = body_at(100.0, 100.0);
            body.velocity = polar_to_cartesian(5.0, angle);
            body.bounce(polar_to_cartesian(1.0, normal_angle));
            prop_assert!((body.velocity.length() - 5.0).abs() < 1e-3);
        }

        #[test]
        fn prop_relocation_clears_head(
            hx in 20.0f32..780.0,
            hy in 20.0f32..580.0,
            seed in any::<u64>(),
        ) {
            let arena = Arena::new(0.0, 0.0, 800.0, 600.0);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut body = body_at(0.0, 0.0);
            let head = Circle::new(Vec2::new(hx, hy), 20.0);

            body.position_away_from(head.center, &arena, &mut rng);
            prop_assert!(!body.bounds().intersects(&head));
        }
    }
}
