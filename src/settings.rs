//! Game tunables
//!
//! Loaded from JSON; any field left out falls back to the value in `consts`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Arena, Direction};

/// Why a settings file could not be used
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Chain ===
    /// Seconds between chain steps
    pub tick_interval: f32,
    /// Distance the chain moves per step
    pub stride: f32,
    /// Segment sprite size (square)
    pub segment_size: f32,
    /// Head start position (top-left of sprite)
    pub start_position: Vec2,
    pub start_direction: Direction,

    // === Mover ===
    /// Mover sprite size (square)
    pub body_size: f32,
    /// Mover displacement per frame
    pub body_speed: f32,
    /// Fraction of the mover size it is pushed off a wall on bounce
    pub bounce_nudge: f32,
    /// Scale the mover step by elapsed time instead of moving a fixed amount per frame
    pub frame_rate_independent_body: bool,
    /// Frame rate the per-frame step is defined against
    pub reference_fps: f32,

    // === Round ===
    pub arena: Arena,
    /// Points per catch
    pub eat_reward: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval: TICK_INTERVAL,
            stride: STRIDE,
            segment_size: SEGMENT_SIZE,
            start_position: Vec2::new(START_X, START_Y),
            start_direction: Direction::Right,

            body_size: BODY_SIZE,
            body_speed: BODY_SPEED,
            bounce_nudge: BOUNCE_NUDGE,
            frame_rate_independent_body: false,
            reference_fps: REFERENCE_FPS,

            arena: Arena::default(),
            eat_reward: EAT_REWARD,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn segment_footprint(&self) -> Vec2 {
        Vec2::splat(self.segment_size)
    }

    pub fn body_footprint(&self) -> Vec2 {
        Vec2::splat(self.body_size)
    }

    /// Mover step multiplier for a frame lasting `dt` seconds
    pub fn body_frame_scale(&self, dt: f32) -> f32 {
        if self.frame_rate_independent_body {
            dt * self.reference_fps
        } else {
            1.0
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("tick_interval", self.tick_interval),
            ("stride", self.stride),
            ("segment_size", self.segment_size),
            ("body_size", self.body_size),
            ("body_speed", self.body_speed),
            ("reference_fps", self.reference_fps),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SettingsError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !(0.0..1.0).contains(&self.bounce_nudge) {
            return Err(SettingsError::Invalid(format!(
                "bounce_nudge must be in [0, 1), got {}",
                self.bounce_nudge
            )));
        }
        if !self.arena.is_valid() {
            return Err(SettingsError::Invalid(format!("arena {:?} has no interior", self.arena)));
        }
        if !self.arena.contains(self.start_position) {
            return Err(SettingsError::Invalid(format!(
                "start position {} lies outside the arena",
                self.start_position
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.tick_interval, 0.2);
        assert_eq!(settings.eat_reward, 100);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "stride": 20.0, "start_direction": "Down" }"#).unwrap();
        assert_eq!(settings.stride, 20.0);
        assert_eq!(settings.start_direction, Direction::Down);
        assert_eq!(settings.body_speed, BODY_SPEED);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.arena = Arena::new(10.0, 10.0, 500.0, 400.0);
        settings.frame_rate_independent_body = true;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Settings::from_json(r#"{ "tick_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_json(r#"{ "bounce_nudge": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_json(r#"{ "start_position": [900.0, 100.0] }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/nonexistent/chain-chase.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_body_frame_scale() {
        let mut settings = Settings::default();
        assert_eq!(settings.body_frame_scale(1.0 / 30.0), 1.0);
        settings.frame_rate_independent_body = true;
        assert!((settings.body_frame_scale(1.0 / 30.0) - 2.0).abs() < 1e-5);
    }
}
