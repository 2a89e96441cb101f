//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Movement advances only on clock ticks
//! - Seeded RNG only
//! - Outcomes are returned as values, never broadcast
//! - No rendering or platform dependencies

pub mod arena;
pub mod body;
pub mod chain;
pub mod clock;
pub mod collision;
pub mod input_buffer;
pub mod round;

pub use arena::Arena;
pub use body::BouncingBody;
pub use chain::{Chain, ChainStep, MoveOutcome, Segment};
pub use clock::MovementClock;
pub use collision::{Circle, CollisionReport, WallContact, detect, reflect_velocity};
pub use input_buffer::{Direction, InputBuffer};
pub use round::{FrameInput, GameOverCause, RoundController, RoundEvent, RoundPhase};
