//! Collision resolution against the level's boxes
//!
//! The marble is a sphere tested against every box each tick (levels hold
//! tens of boxes, so there is no broad phase). Two independent predicates
//! run over platform geometry:
//! - strict support: the marble sits on a top face and gets grounded
//! - jump band: a looser region, generous around small platforms, that only
//!   grants the ability to jump

use glam::Vec3;

use super::geometry::Aabb;
use super::state::{BoxRole, LevelRuntime, MarbleState};
use crate::consts::CONTACT_EPSILON;
use crate::tuning::{JumpBandTuning, Tuning};
use crate::{Tick, ticks_to_ms, ticks_to_secs};

/// Result of resolving one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Supported by a platform this tick
    pub on_ground: bool,
    /// Inside some platform's jump band this tick
    pub near_platform: bool,
    /// Jump availability after this tick
    pub can_jump: bool,
    /// Index into `LevelRuntime::boxes` of the supporting platform
    pub support: Option<usize>,
    /// Number of obstacles the marble was pushed out of
    pub obstacle_hits: u32,
    /// Set on the tick the finish pad is reached: the latched completion time
    pub finished: Option<f64>,
}

/// Offset of the marble center above a platform's top face, if the marble is
/// inside the strict support region (exact footprint, within one radius of the top).
pub fn strict_support_offset(pos: Vec3, platform: &Aabb, radius: f32) -> Option<f32> {
    if !platform.contains_xz(pos) {
        return None;
    }
    let d = pos.y - platform.top();
    (d >= -radius && d <= radius + CONTACT_EPSILON).then_some(d)
}

/// Whether the platform counts as small for the jump band
#[inline]
fn is_small(platform: &Aabb, band: &JumpBandTuning) -> bool {
    platform.min_horizontal_half_extent() < band.small_platform_threshold
}

/// Footprint test: the marble is over the platform grown by a size-dependent
/// buffer and within a height window around its top face.
pub fn within_jump_buffer(pos: Vec3, platform: &Aabb, band: &JumpBandTuning) -> bool {
    let size = platform.min_horizontal_half_extent();
    let small = is_small(platform, band);
    let buffer = if small {
        (size * band.small_buffer_scale).max(band.small_min_buffer)
    } else {
        (size * band.regular_buffer_scale).max(band.regular_min_buffer)
    };
    if !platform.contains_xz_expanded(pos, buffer) {
        return false;
    }

    let d = pos.y - platform.top();
    let max_height = if small {
        band.small_max_height
    } else {
        band.regular_max_height
    };
    d >= band.min_height && d <= max_height
}

/// Small platforms only: the marble is close to the box center and roughly
/// level with the top face. Overlaps `within_jump_buffer` on purpose.
pub fn near_small_platform_center(pos: Vec3, platform: &Aabb, band: &JumpBandTuning) -> bool {
    if !is_small(platform, band) {
        return false;
    }
    let top = platform.top();
    pos.distance(platform.center) < band.small_center_radius
        && pos.y >= top - band.small_center_below
        && pos.y <= top + band.small_center_above
}

/// The full jump-eligibility predicate for one platform
pub fn within_jump_band(pos: Vec3, platform: &Aabb, band: &JumpBandTuning) -> bool {
    within_jump_buffer(pos, platform, band) || near_small_platform_center(pos, platform, band)
}

/// Sphere vs obstacle overlap
#[inline]
pub fn obstacle_overlap(pos: Vec3, obstacle: &Aabb, radius: f32) -> bool {
    obstacle.overlaps_sphere(pos, radius)
}

/// Direction the marble is pushed out of an obstacle: away from its center
#[inline]
pub fn push_direction(pos: Vec3, obstacle: &Aabb) -> Vec3 {
    (pos - obstacle.center).normalize_or(Vec3::Y)
}

/// Nudge the marble a fixed step away from the obstacle center and damp its velocity.
///
/// Deep penetration takes several ticks to clear.
pub fn push_out_of_obstacle(marble: &mut MarbleState, obstacle: &Aabb, tuning: &Tuning) {
    let dir = push_direction(marble.position, obstacle);
    marble.position += dir * tuning.obstacle_push;
    marble.velocity *= tuning.obstacle_damping;
}

/// Whether the marble center is within the finish radius of the pad center
#[inline]
pub fn finish_reached(pos: Vec3, pad: &Aabb, tuning: &Tuning) -> bool {
    pos.distance(pad.center) < tuning.finish_radius
}

/// Freeze the marble and latch its completion time
fn finish(marble: &mut MarbleState, now: Tick) -> f64 {
    marble.velocity = Vec3::ZERO;
    marble.finished = true;
    let elapsed = ticks_to_secs(now.saturating_sub(marble.timer_origin()));
    marble.finish_time = Some(elapsed);
    elapsed
}

/// Resolve the marble against every box in scan order.
///
/// Obstacle pushes take effect immediately, so later boxes see the corrected
/// position. Reaching the finish pad ends the scan and skips ground and jump
/// updates for the tick.
pub fn resolve(
    marble: &mut MarbleState,
    level: &LevelRuntime,
    now: Tick,
    tuning: &Tuning,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    if marble.finished {
        outcome.on_ground = marble.on_ground;
        outcome.can_jump = marble.can_jump;
        return outcome;
    }

    let radius = tuning.marble_radius;
    // (box index, offset above top); first in list wins ties
    let mut closest: Option<(usize, f32)> = None;

    for (i, world_box) in level.boxes.iter().enumerate() {
        let aabb = &world_box.aabb;
        let pos = marble.position;

        if world_box.role.is_platform() {
            if within_jump_band(pos, aabb, &tuning.jump_band) {
                outcome.near_platform = true;
            }
            if let Some(d) = strict_support_offset(pos, aabb, radius) {
                if closest.is_none_or(|(_, best)| d < best) {
                    closest = Some((i, d));
                }
            }
        } else if obstacle_overlap(pos, aabb, radius) {
            push_out_of_obstacle(marble, aabb, tuning);
            outcome.obstacle_hits += 1;
        }

        if world_box.role == BoxRole::FinishPad && finish_reached(marble.position, aabb, tuning) {
            let elapsed = finish(marble, now);
            log::info!("Level {} completed in {:.2}s", level.index, elapsed);
            outcome.on_ground = marble.on_ground;
            outcome.can_jump = marble.can_jump;
            outcome.finished = Some(elapsed);
            return outcome;
        }
    }

    if let Some((i, _)) = closest {
        let top = level.boxes[i].aabb.top();
        if marble.position.y - radius <= top + tuning.support_tolerance {
            marble.position.y = top + radius;
            outcome.support = Some(i);

            if marble.velocity.y <= tuning.landing_speed {
                marble.velocity.y = (marble.velocity.y * tuning.landing_damping).max(0.0);
                outcome.on_ground = true;
                marble.last_ground_tick = now;
            }
        }
    }

    let since_ground = ticks_to_ms(now.saturating_sub(marble.last_ground_tick));
    let coyote = since_ground < tuning.coyote_ms && marble.velocity.y > tuning.coyote_fall_cutoff;
    outcome.can_jump = outcome.on_ground || outcome.near_platform || coyote;

    marble.on_ground = outcome.on_ground;
    marble.can_jump = outcome.can_jump;
    outcome
}
