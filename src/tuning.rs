//! Physics and feel tuning
//!
//! Every constant that shapes how the marble handles lives here so it can be
//! loaded from JSON. Missing fields fall back to the shipped values.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Thresholds for the forgiving "can jump near a platform" band
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpBandTuning {
    /// Platforms whose smaller horizontal half extent is below this count as small
    pub small_platform_threshold: f32,
    /// Small platforms: buffer = max(small_min_buffer, half * small_buffer_scale)
    pub small_min_buffer: f32,
    pub small_buffer_scale: f32,
    /// Regular platforms: buffer = max(regular_min_buffer, half * regular_buffer_scale)
    pub regular_min_buffer: f32,
    pub regular_buffer_scale: f32,
    /// Highest marble offset above the top face still counted as near
    pub small_max_height: f32,
    pub regular_max_height: f32,
    /// Lowest offset (below the top face) still counted as near
    pub min_height: f32,
    /// Center-distance check for small platforms
    pub small_center_radius: f32,
    pub small_center_below: f32,
    pub small_center_above: f32,
}

impl Default for JumpBandTuning {
    fn default() -> Self {
        Self {
            small_platform_threshold: 1.5,
            small_min_buffer: 2.0,
            small_buffer_scale: 1.5,
            regular_min_buffer: 1.0,
            regular_buffer_scale: 0.6,
            small_max_height: 1.8,
            regular_max_height: 1.2,
            min_height: -0.5,
            small_center_radius: 2.5,
            small_center_below: 1.0,
            small_center_above: 1.8,
        }
    }
}

/// Camera framing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Placement relative to the start point when a level loads
    pub intro_offset: Vec3,
    /// Ideal placement relative to the marble while playing
    pub follow_offset: Vec3,
    /// Fraction of the gap to the ideal placement closed per tick
    pub follow_lerp: f32,
    /// How far ahead (+z) of the marble the camera looks
    pub look_ahead: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            intro_offset: Vec3::new(0.0, 12.0, -15.0),
            follow_offset: Vec3::new(0.0, 6.0, -10.0),
            follow_lerp: 0.005,
            look_ahead: 2.0,
        }
    }
}

/// Marble handling constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Integration ===
    /// Subtracted from velocity.y once per airborne tick (not scaled by dt)
    pub gravity_per_tick: f32,
    /// Velocity added per tick for each active movement axis
    pub move_force: f32,
    /// Horizontal drag applied every tick
    pub air_drag: f32,
    /// Extra horizontal friction applied while grounded
    pub ground_friction: f32,
    /// Speed cap (units/sec)
    pub max_speed: f32,
    /// Vertical velocity set by an honored jump
    pub jump_velocity: f32,

    // === Collision ===
    pub marble_radius: f32,
    /// Snap to a supporting top face while within this distance above contact
    pub support_tolerance: f32,
    /// Landing only counts as grounded when velocity.y is at most this
    pub landing_speed: f32,
    /// velocity.y multiplier on landing (then clamped at zero)
    pub landing_damping: f32,
    /// Positional push per tick out of an obstacle
    pub obstacle_push: f32,
    /// Velocity multiplier while overlapping an obstacle
    pub obstacle_damping: f32,
    /// Center-distance that triggers level completion
    pub finish_radius: f32,
    /// Below this height the marble respawns
    pub fall_floor: f32,

    // === Jumping ===
    /// Grace period after leaving the ground (milliseconds)
    pub coyote_ms: f64,
    /// Coyote time is void once falling faster than this (velocity.y)
    pub coyote_fall_cutoff: f32,
    pub jump_band: JumpBandTuning,

    // === Input / camera ===
    /// Joystick axes with a smaller magnitude are ignored
    pub joystick_dead_zone: f32,
    pub camera: CameraTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_per_tick: 0.095,
            move_force: 0.28,
            air_drag: 0.99,
            ground_friction: 0.94,
            max_speed: 7.0,
            jump_velocity: 19.8,

            marble_radius: 0.6,
            support_tolerance: 0.3,
            landing_speed: 1.0,
            landing_damping: 0.1,
            obstacle_push: 0.1,
            obstacle_damping: 0.5,
            finish_radius: 3.0,
            fall_floor: -5.0,

            coyote_ms: 150.0,
            coyote_fall_cutoff: -5.0,
            jump_band: JumpBandTuning::default(),

            joystick_dead_zone: 0.1,
            camera: CameraTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.marble_radius > 0.0) {
            return Err(ConfigError::InvalidTuning(format!(
                "marble_radius must be positive, got {}",
                self.marble_radius
            )));
        }
        if !(self.max_speed > 0.0) {
            return Err(ConfigError::InvalidTuning(format!(
                "max_speed must be positive, got {}",
                self.max_speed
            )));
        }
        if !(self.coyote_ms >= 0.0) {
            return Err(ConfigError::InvalidTuning(format!(
                "coyote_ms must not be negative, got {}",
                self.coyote_ms
            )));
        }
        if !(self.finish_radius > 0.0) {
            return Err(ConfigError::InvalidTuning(format!(
                "finish_radius must be positive, got {}",
                self.finish_radius
            )));
        }
        Ok(())
    }
}
