//! Platform abstraction layer
//!
//! The host polls its keyboard/gamepad and answers "is this key down right
//! now". `EdgeTrigger` turns those levels into presses that fire once, on the
//! frame a key goes down.

use crate::sim::{Direction, FrameInput};

/// Logical keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Pause,
}

impl Key {
    pub const ALL: [Key; 5] = [Key::Up, Key::Down, Key::Left, Key::Right, Key::Pause];

    fn index(self) -> usize {
        self as usize
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Pause => None,
        }
    }
}

/// Level-triggered key state supplied by the host
pub trait InputSource {
    fn is_down(&self, key: Key) -> bool;
}

/// Fixed snapshot of held keys, handy for scripted input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    held: [bool; 5],
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: Key) -> Self {
        self.held[key.index()] = true;
        self
    }

    pub fn set(&mut self, key: Key, down: bool) {
        self.held[key.index()] = down;
    }
}

impl InputSource for KeyState {
    fn is_down(&self, key: Key) -> bool {
        self.held[key.index()]
    }
}

/// Remembers last frame's levels to report fresh presses only
#[derive(Debug, Clone, Default)]
pub struct EdgeTrigger {
    previous: KeyState,
}

impl EdgeTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys that went down since the previous poll
    pub fn pressed(&mut self, source: &impl InputSource) -> KeyState {
        let mut pressed = KeyState::new();
        for key in Key::ALL {
            let down = source.is_down(key);
            if down && !self.previous.is_down(key) {
                pressed.set(key, true);
            }
            self.previous.set(key, down);
        }
        pressed
    }
}

impl FrameInput {
    /// Sample one frame of edge-triggered input
    pub fn poll(trigger: &mut EdgeTrigger, source: &impl InputSource) -> Self {
        let pressed = trigger.pressed(source);
        let mut input = FrameInput {
            pause: pressed.is_down(Key::Pause),
            ..Default::default()
        };
        for key in Key::ALL {
            if let Some(dir) = key.direction().filter(|_| pressed.is_down(key)) {
                input.press(dir);
            }
        }
        input
    }
}
