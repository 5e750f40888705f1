//! Marble Run - fixed-tick core of a 3D marble platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, box collisions, marble state)
//! - `game`: Level state machine (menu / playing / finished)
//! - `best_times`: Per-level best completion times
//! - `levels`: Static level geometry
//! - `input`: Keyboard + virtual joystick aggregation into per-tick snapshots
//! - `camera`: Follow camera handed to the renderer
//! - `scheduler`: Frame pacing with a pluggable clock
//! - `tuning`: Data-driven physics balance

pub mod best_times;
pub mod camera;
pub mod error;
pub mod game;
pub mod input;
pub mod levels;
pub mod scheduler;
pub mod sim;
pub mod tuning;

pub use best_times::BestTimes;
pub use error::ConfigError;
pub use game::{Game, GameEvent, RenderFrame};
pub use tuning::Tuning;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: f64 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frames closer together than this are skipped (caps the tick rate)
    pub const MIN_FRAME_INTERVAL_MS: f64 = 16.0;

    /// Level index reserved for "no level loaded"
    pub const MENU_LEVEL_INDEX: usize = 0;

    /// Start and finish pads are thin boxes hung below the level's anchor points
    pub const PAD_SIZE: [f32; 3] = [6.0, 0.3, 6.0];
    pub const PAD_DROP: f32 = 1.5;

    /// Absorbs f32 rounding when a snapped marble is re-tested against the same top face
    pub const CONTACT_EPSILON: f32 = 1e-4;

    /// Elapsed time shown on the HUD refreshes this often (100 ms)
    pub const DISPLAY_INTERVAL_TICKS: u64 = 6;
}

/// Simulation tick index; timestamps inside the core are tick counts
pub type Tick = u64;

/// Convert a tick span to seconds
#[inline]
pub fn ticks_to_secs(ticks: Tick) -> f64 {
    ticks as f64 / consts::TICK_RATE
}

/// Convert a tick span to milliseconds
#[inline]
pub fn ticks_to_ms(ticks: Tick) -> f64 {
    (ticks as f64 * 1000.0) / consts::TICK_RATE
}
