//! Marble integration
//!
//! One fixed step: gravity, input force, drag, ground friction, speed cap,
//! then position. Gravity and force are per-tick impulses, not scaled by dt.

use glam::Vec3;

use super::state::MarbleState;
use super::tick::TickInput;
use crate::consts::SIM_DT;
use crate::tuning::Tuning;

/// Honor a jump request if the marble can currently jump.
///
/// Returns true when the jump happened. The marble cannot jump again until
/// collision resolution re-grants it.
pub fn try_jump(marble: &mut MarbleState, tuning: &Tuning) -> bool {
    if marble.finished || !marble.can_jump {
        return false;
    }
    marble.velocity.y = tuning.jump_velocity;
    marble.can_jump = false;
    true
}

/// Advance velocity and position by one tick
pub fn integrate(marble: &mut MarbleState, input: &TickInput, tuning: &Tuning) {
    if marble.finished {
        return;
    }

    let vel = &mut marble.velocity;

    if !marble.on_ground {
        vel.y -= tuning.gravity_per_tick;
    }

    // Diagonals accumulate per axis; no normalization
    vel.x += input.move_x * tuning.move_force;
    vel.z += input.move_z * tuning.move_force;

    vel.x *= tuning.air_drag;
    vel.z *= tuning.air_drag;

    if marble.on_ground {
        vel.x *= tuning.ground_friction;
        vel.z *= tuning.ground_friction;
    }

    *vel = clamp_speed(*vel, tuning.max_speed);

    marble.position += *vel * SIM_DT;
}

/// Rescale a velocity to `max_speed` if it is faster, keeping its direction
#[inline]
pub fn clamp_speed(vel: Vec3, max_speed: f32) -> Vec3 {
    if vel.length() > max_speed {
        vel.normalize() * max_speed
    } else {
        vel
    }
}
