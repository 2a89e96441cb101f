//! Chain Chase - a grid-stepping chain hunting a bouncing mover
//!
//! Core modules:
//! - `sim`: Deterministic simulation (chain, mover, collisions, round state)
//! - `settings`: Data-driven tunables
//! - `audio`: Sound effect sink injected into the round
//! - `platform`: Input polling abstraction

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, LogAudio, SilentAudio, SoundEffect};
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Time between chain steps (seconds)
    pub const TICK_INTERVAL: f32 = 0.2;
    /// Grid distance a segment advances per tick
    pub const STRIDE: f32 = 40.0;
    /// Most chain steps taken in one frame; longer stalls drop the excess
    pub const MAX_CATCH_UP_TICKS: u32 = 8;
    /// Queued turns the input buffer holds
    pub const INPUT_BUFFER_CAPACITY: usize = 2;

    /// Chain segment sprite footprint (square)
    pub const SEGMENT_SIZE: f32 = 40.0;
    /// Head start position (top-left of sprite)
    pub const START_X: f32 = 100.0;
    pub const START_Y: f32 = 100.0;

    /// Mover sprite footprint (square)
    pub const BODY_SIZE: f32 = 32.0;
    /// Mover displacement per frame
    pub const BODY_SPEED: f32 = 5.0;
    /// Fraction of the mover footprint it is pushed off a wall before reflecting
    pub const BOUNCE_NUDGE: f32 = 0.1;

    /// Score awarded per catch
    pub const EAT_REWARD: u64 = 100;

    /// Arena rectangle
    pub const ARENA_LEFT: f32 = 0.0;
    pub const ARENA_TOP: f32 = 0.0;
    pub const ARENA_RIGHT: f32 = 800.0;
    pub const ARENA_BOTTOM: f32 = 600.0;

    /// Frame rate the per-frame mover step was tuned for
    pub const REFERENCE_FPS: f32 = 60.0;
}

/// Convert an angle to a unit vector scaled by `len`
#[inline]
pub fn polar_to_cartesian(len: f32, theta: f32) -> Vec2 {
    Vec2::new(len * theta.cos(), len * theta.sin())
}

/// Center of a sprite whose top-left corner is `pos`
#[inline]
pub fn sprite_center(pos: Vec2, footprint: Vec2) -> Vec2 {
    pos + footprint * 0.5
}
