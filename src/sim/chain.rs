//! The player's segment chain
//!
//! The chain steps one stride per clock tick. Each segment remembers where it
//! is (`at`) and where it is heading (`to`), so a renderer can slide every
//! segment between the two using the clock's progress. A step pushes a new
//! head and drops the tail, which is the same as every segment taking over
//! the state of the one ahead of it.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::MovementClock;
use super::collision::Circle;
use super::input_buffer::{Direction, InputBuffer};
use crate::sprite_center;

/// Positions closer than this are treated as the same grid cell
const CELL_EPSILON: f32 = 1e-3;

/// One link of the chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Grid position occupied now
    pub at: Vec2,
    /// Grid position being moved toward
    pub to: Vec2,
    pub direction: Direction,
}

impl Segment {
    pub fn new(at: Vec2, direction: Direction, stride: f32) -> Self {
        Self {
            at,
            to: at + direction.vector() * stride,
            direction,
        }
    }

    #[inline]
    pub fn reverse_direction(&self) -> Direction {
        self.direction.reversed()
    }

    /// Linear blend from `at` to `to`
    #[inline]
    pub fn interpolated(&self, progress: f32) -> Vec2 {
        self.at.lerp(self.to, progress)
    }
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// The new head landed on a body segment
    SelfCollision,
}

/// Result of feeding frame time to the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStep {
    /// Steps actually taken this frame
    pub ticks: u32,
    pub outcome: MoveOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    /// Head at the front, tail at the back
    segments: VecDeque<Segment>,
    stride: f32,
    /// Sprite footprint of one segment
    footprint: Vec2,
    clock: MovementClock,
    input: InputBuffer,
    collided: bool,
}

impl Chain {
    /// Single-segment chain at `start` heading `direction`
    ///
    /// # Panics
    /// If `stride` or `tick_interval` is not positive.
    pub fn new(start: Vec2, direction: Direction, stride: f32, footprint: Vec2, tick_interval: f32) -> Self {
        assert!(stride > 0.0, "stride must be positive");
        Self::from_segments(
            [Segment::new(start, direction, stride)],
            stride,
            footprint,
            tick_interval,
        )
    }

    /// Chain from explicit segments, head first
    ///
    /// # Panics
    /// If `segments` is empty or a segment breaks `to - at == direction * stride`.
    pub fn from_segments(
        segments: impl IntoIterator<Item = Segment>,
        stride: f32,
        footprint: Vec2,
        tick_interval: f32,
    ) -> Self {
        let segments: VecDeque<Segment> = segments.into_iter().collect();
        assert!(!segments.is_empty(), "chain needs at least one segment");
        for seg in &segments {
            assert!(
                (seg.to - seg.at).abs_diff_eq(seg.direction.vector() * stride, CELL_EPSILON),
                "segment {seg:?} does not span one stride along its direction"
            );
        }
        let mut chain = Self {
            segments,
            stride,
            footprint,
            clock: MovementClock::new(tick_interval),
            input: InputBuffer::new(),
            collided: false,
        };
        // One spare slot so growth between steps does not reallocate every time
        chain.segments.reserve(1);
        chain
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true for a constructed chain
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn stride(&self) -> f32 {
        self.stride
    }

    pub fn footprint(&self) -> Vec2 {
        self.footprint
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn tail(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn has_collided(&self) -> bool {
        self.collided
    }

    /// Clock progress toward the next step, in [0, 1)
    pub fn progress(&self) -> f32 {
        self.clock.progress()
    }

    /// Queue a turn; reversals and overflow are dropped
    pub fn steer(&mut self, direction: Direction) -> bool {
        let current = self.head().direction;
        self.input.try_enqueue(direction, current)
    }

    /// Advance the movement clock and take every step that elapsed
    ///
    /// Stops at the first self-collision; later steps in the same frame are
    /// discarded and the chain stays frozen from then on. Callers that need to
    /// react between steps drive `advance_clock` and `step_next` themselves.
    pub fn update(&mut self, dt: f32) -> ChainStep {
        if self.collided {
            return ChainStep {
                ticks: 0,
                outcome: MoveOutcome::SelfCollision,
            };
        }
        let due = self.advance_clock(dt);
        let mut ticks = 0;
        for _ in 0..due {
            ticks += 1;
            if self.step_next() == MoveOutcome::SelfCollision {
                return ChainStep {
                    ticks,
                    outcome: MoveOutcome::SelfCollision,
                };
            }
        }
        ChainStep {
            ticks,
            outcome: MoveOutcome::Moved,
        }
    }

    /// Feed frame time to the movement clock; returns the steps now due
    pub fn advance_clock(&mut self, dt: f32) -> u32 {
        if self.collided {
            return 0;
        }
        self.clock.advance(dt)
    }

    /// Take one step along the oldest queued turn, or straight on
    pub fn step_next(&mut self) -> MoveOutcome {
        let next = self.input.dequeue().unwrap_or(self.head().direction);
        self.step(next)
    }

    /// Move one stride, turning the head toward `next`
    pub fn step(&mut self, next: Direction) -> MoveOutcome {
        if self.collided {
            return MoveOutcome::SelfCollision;
        }
        let head = *self.head();
        let new_head = Segment::new(head.to, next, self.stride);
        self.segments.push_front(new_head);
        self.segments.pop_back();

        let hit = self
            .segments
            .iter()
            .skip(1)
            .any(|seg| seg.at.abs_diff_eq(new_head.at, CELL_EPSILON));
        if hit {
            log::debug!("Chain head ran into its body at {:?}", new_head.at);
            self.collided = true;
            return MoveOutcome::SelfCollision;
        }
        MoveOutcome::Moved
    }

    /// Append one segment a stride behind the tail, travelling the same way
    pub fn grow(&mut self) {
        let tail = *self.tail();
        let at = tail.at + tail.reverse_direction().vector() * self.stride;
        self.segments.push_back(Segment {
            at,
            to: tail.at,
            direction: tail.direction,
        });
    }

    /// Interpolated position of every segment at the current clock progress
    pub fn interpolated_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        let progress = self.progress();
        self.segments.iter().map(move |seg| seg.interpolated(progress))
    }

    /// Head collision circle at the current interpolated position
    pub fn bounds(&self) -> Circle {
        self.bounds_at(self.progress())
    }

    /// Head collision circle at an explicit interpolation factor
    ///
    /// `bounds_at(0.0)` is the head exactly on its grid cell, as at the
    /// instant of a step.
    pub fn bounds_at(&self, progress: f32) -> Circle {
        let pos = self.head().interpolated(progress);
        Circle::new(sprite_center(pos, self.footprint), self.footprint.x * 0.5)
    }
}
