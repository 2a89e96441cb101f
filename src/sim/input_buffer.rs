//! Buffered directional input with anti-reversal

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::INPUT_BUFFER_CAPACITY;

/// Axis-aligned travel direction (screen coordinates, +Y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    #[inline]
    pub fn dot(self, other: Direction) -> f32 {
        self.vector().dot(other.vector())
    }
}

/// Fixed-capacity FIFO of pending turns
///
/// Ring storage: `start` is the oldest slot, `len` the number of queued turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBuffer {
    slots: [Option<Direction>; INPUT_BUFFER_CAPACITY],
    start: usize,
    len: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == INPUT_BUFFER_CAPACITY
    }

    /// Most recently queued turn
    pub fn last(&self) -> Option<Direction> {
        if self.len == 0 {
            return None;
        }
        self.slots[(self.start + self.len - 1) % INPUT_BUFFER_CAPACITY]
    }

    /// Queue `candidate` unless the buffer is full or it would reverse the
    /// direction it follows (the last queued turn, or `current` when empty).
    pub fn try_enqueue(&mut self, candidate: Direction, current: Direction) -> bool {
        if self.is_full() {
            return false;
        }
        let reference = self.last().unwrap_or(current);
        if candidate.dot(reference) < 0.0 {
            return false;
        }
        let slot = (self.start + self.len) % INPUT_BUFFER_CAPACITY;
        self.slots[slot] = Some(candidate);
        self.len += 1;
        true
    }

    /// Pop the oldest queued turn
    pub fn dequeue(&mut self) -> Option<Direction> {
        if self.len == 0 {
            return None;
        }
        let next = self.slots[self.start].take();
        self.start = (self.start + 1) % INPUT_BUFFER_CAPACITY;
        self.len -= 1;
        next
    }

    /// Queued turns, oldest first
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        (0..self.len).filter_map(move |i| self.slots[(self.start + i) % INPUT_BUFFER_CAPACITY])
    }
}
