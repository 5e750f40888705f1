//! Deterministic simulation module
//!
//! All marble physics lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Time measured in ticks, never wall clock
//! - Stable box scan order (level materialization order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionOutcome, finish_reached, near_small_platform_center, obstacle_overlap,
    push_out_of_obstacle, resolve, strict_support_offset, within_jump_band, within_jump_buffer,
};
pub use geometry::Aabb;
pub use physics::{clamp_speed, integrate, try_jump};
pub use state::{BoxRole, GamePhase, LevelRuntime, MarbleState, SimContext, WorldBox};
pub use tick::{TickInput, TickReport, tick};
