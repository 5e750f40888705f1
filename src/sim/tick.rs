//! Fixed timestep simulation tick
//!
//! Input snapshot -> jump -> integrate -> fall-out check -> collision.

use super::collision;
use super::physics;
use super::state::SimContext;
use crate::tuning::Tuning;

/// Movement intent and jump request sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Per-axis intent; keys and joystick add, so values may exceed 1
    pub move_x: f32,
    pub move_z: f32,
    /// Discrete jump request
    pub jump: bool,
}

impl TickInput {
    /// Whether the snapshot carries any movement
    pub fn has_movement(&self) -> bool {
        self.move_x != 0.0 || self.move_z != 0.0
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// The tick was skipped because the marble is frozen
    pub frozen: bool,
    pub jumped: bool,
    /// The marble fell below the floor and went back to the start
    pub respawned: bool,
    pub on_ground: bool,
    pub can_jump: bool,
    /// Completion time, on the tick the finish pad is reached
    pub finished: Option<f64>,
}

/// Advance the simulation by one fixed timestep
pub fn tick(ctx: &mut SimContext, input: &TickInput, tuning: &Tuning) -> TickReport {
    if ctx.marble.finished {
        return TickReport {
            frozen: true,
            on_ground: ctx.marble.on_ground,
            can_jump: ctx.marble.can_jump,
            ..Default::default()
        };
    }

    ctx.now += 1;
    let now = ctx.now;
    let marble = &mut ctx.marble;

    if marble.start_tick.is_none() && input.has_movement() {
        marble.start_tick = Some(now);
    }

    let jumped = input.jump && physics::try_jump(marble, tuning);
    if jumped {
        log::debug!("Jump at tick {now}");
    }

    physics::integrate(marble, input, tuning);

    if marble.position.y < tuning.fall_floor {
        log::debug!("Marble fell out at {:?}, respawning", marble.position);
        marble.respawn(ctx.level.start, now);
        return TickReport {
            jumped,
            respawned: true,
            on_ground: marble.on_ground,
            can_jump: marble.can_jump,
            ..Default::default()
        };
    }

    let outcome = collision::resolve(marble, &ctx.level, now, tuning);

    TickReport {
        frozen: false,
        jumped,
        respawned: false,
        on_ground: outcome.on_ground,
        can_jump: outcome.can_jump,
        finished: outcome.finished,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    use crate::sim::state::{BoxRole, LevelRuntime, WorldBox};

    fn single_platform_level(start: Vec3) -> LevelRuntime {
        LevelRuntime::from_boxes(
            1,
            start,
            vec![WorldBox::new(
                BoxRole::Platform,
                Vec3::new(0.0, 0.0, 5.0),
                Vec3::new(15.0, 1.0, 15.0),
            )],
        )
    }

    #[test]
    fn test_drop_settles_on_platform_top() {
        let tuning = Tuning::default();
        let mut ctx = SimContext::new(single_platform_level(Vec3::new(0.0, 2.0, 5.0)));

        let mut settled_at = None;
        for i in 0..240 {
            let report = tick(&mut ctx, &TickInput::default(), &tuning);
            if report.on_ground && settled_at.is_none() {
                settled_at = Some(i);
            }
        }

        assert!(settled_at.is_some_and(|t| t < 60));
        assert!(ctx.marble.on_ground);
        assert!((ctx.marble.position.y - 1.1).abs() < 1e-4);
        assert_eq!(ctx.marble.velocity, Vec3::ZERO);
        // Nothing moved the timer
        assert_eq!(ctx.marble.start_tick, None);
    }

    #[test]
    fn test_resting_marble_stays_grounded() {
        let tuning = Tuning::default();
        let mut ctx = SimContext::new(single_platform_level(Vec3::new(0.0, 2.0, 5.0)));
        for _ in 0..120 {
            tick(&mut ctx, &TickInput::default(), &tuning);
        }
        let rest = ctx.marble.position;
        for _ in 0..60 {
            let report = tick(&mut ctx, &TickInput::default(), &tuning);
            assert!(report.on_ground);
            assert_eq!(ctx.marble.position, rest);
        }
    }

    #[test]
    fn test_first_movement_starts_timer() {
        let tuning = Tuning::default();
        let mut ctx = SimContext::new(single_platform_level(Vec3::new(0.0, 1.1, 5.0)));

        tick(&mut ctx, &TickInput::default(), &tuning);
        assert_eq!(ctx.marble.start_tick, None);

        let forward = TickInput {
            move_z: 1.0,
            ..Default::default()
        };
        tick(&mut ctx, &forward, &tuning);
        assert_eq!(ctx.marble.start_tick, Some(2));
        tick(&mut ctx, &forward, &tuning);
        assert_eq!(ctx.marble.start_tick, Some(2));
    }

    #[test]
    fn test_fall_out_respawns_same_tick() {
        let tuning = Tuning::default();
        let start = Vec3::new(0.0, 2.0, 5.0);
        let mut ctx = SimContext::new(single_platform_level(start));
        ctx.marble.position = Vec3::new(30.0, -4.99, 30.0);
        ctx.marble.velocity = Vec3::new(0.0, -6.0, 0.0);
        ctx.marble.start_tick = Some(1);
        ctx.marble.can_jump = false;

        let report = tick(&mut ctx, &TickInput::default(), &tuning);
        assert!(report.respawned);
        assert_eq!(ctx.marble.position, start);
        assert_eq!(ctx.marble.velocity, Vec3::ZERO);
        assert_eq!(ctx.marble.start_tick, None);
        assert!(ctx.marble.can_jump);
        assert_eq!(ctx.marble.last_ground_tick, ctx.now);
    }

    #[test]
    fn test_jump_only_when_allowed() {
        let tuning = Tuning::default();
        let mut ctx = SimContext::new(single_platform_level(Vec3::new(0.0, 1.1, 5.0)));
        for _ in 0..5 {
            tick(&mut ctx, &TickInput::default(), &tuning);
        }
        assert!(ctx.marble.can_jump);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let report = tick(&mut ctx, &jump, &tuning);
        assert!(report.jumped);
        assert!(ctx.marble.velocity.y > 0.0);
        assert!(!ctx.marble.on_ground);

        // Far from any platform and long past coyote time: request dropped
        ctx.marble.position = Vec3::new(50.0, 20.0, 50.0);
        ctx.marble.velocity = Vec3::ZERO;
        ctx.marble.can_jump = false;
        let report = tick(&mut ctx, &jump, &tuning);
        assert!(!report.jumped);
        assert!(ctx.marble.velocity.y < 0.0);
    }

    #[test]
    fn test_finished_tick_is_frozen() {
        let tuning = Tuning::default();
        let mut ctx = SimContext::new(single_platform_level(Vec3::new(0.0, 1.1, 5.0)));
        ctx.marble.finished = true;
        let before = ctx.marble.clone();
        let now = ctx.now;

        let input = TickInput {
            move_x: 1.0,
            move_z: 1.0,
            jump: true,
        };
        let report = tick(&mut ctx, &input, &tuning);
        assert!(report.frozen);
        assert_eq!(ctx.now, now);
        assert_eq!(ctx.marble.position, before.position);
        assert_eq!(ctx.marble.velocity, Vec3::ZERO);
    }
}
