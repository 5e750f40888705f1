//! Simulation state and core types
//!
//! The marble, the materialized level, and the context that the per-tick
//! phase functions mutate.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use crate::Tick;
use crate::consts::{PAD_DROP, PAD_SIZE};
use crate::levels::LevelData;

/// Top-level phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level loaded, no marble exists
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Finish pad reached; simulation frozen
    Finished,
}

/// What a world box does to the marble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxRole {
    /// Standable top face
    Platform,
    /// Solid hazard, never standable
    Obstacle,
    /// Standable pad under the spawn point
    StartPad,
    /// Standable pad whose proximity completes the level
    FinishPad,
}

impl BoxRole {
    /// Roles whose top face can support the marble
    pub fn is_platform(&self) -> bool {
        !matches!(self, BoxRole::Obstacle)
    }
}

/// A box placed in the running level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldBox {
    pub aabb: Aabb,
    pub role: BoxRole,
}

impl WorldBox {
    pub fn new(role: BoxRole, center: Vec3, size: Vec3) -> Self {
        Self {
            aabb: Aabb::new(center, size),
            role,
        }
    }
}

/// Geometry of the loaded level. Immutable while the level runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRuntime {
    /// 1-based level index
    pub index: usize,
    pub name: String,
    /// Marble spawn point
    pub start: Vec3,
    /// All boxes in scan order: platforms, obstacles, start pad, finish pad
    pub boxes: Vec<WorldBox>,
}

impl LevelRuntime {
    /// Materialize a level, adding the start and finish pads below their anchor points
    pub fn from_level(index: usize, level: &LevelData) -> Self {
        let pad_size = Vec3::from_array(PAD_SIZE);
        let pad_drop = Vec3::new(0.0, PAD_DROP, 0.0);

        let mut boxes = Vec::with_capacity(level.platforms.len() + level.obstacles.len() + 2);
        boxes.extend(
            level
                .platforms
                .iter()
                .map(|p| WorldBox::new(BoxRole::Platform, p.pos, p.size)),
        );
        boxes.extend(
            level
                .obstacles
                .iter()
                .map(|o| WorldBox::new(BoxRole::Obstacle, o.pos, o.size)),
        );
        boxes.push(WorldBox::new(BoxRole::StartPad, level.start - pad_drop, pad_size));
        boxes.push(WorldBox::new(BoxRole::FinishPad, level.finish - pad_drop, pad_size));

        Self {
            index,
            name: level.name.clone(),
            start: level.start,
            boxes,
        }
    }

    /// Build a runtime from explicit boxes (scan order is the given order)
    pub fn from_boxes(index: usize, start: Vec3, boxes: Vec<WorldBox>) -> Self {
        Self {
            index,
            name: format!("Level {index}"),
            start,
            boxes,
        }
    }

    pub fn platforms(&self) -> impl Iterator<Item = &WorldBox> {
        self.boxes.iter().filter(|b| b.role.is_platform())
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &WorldBox> {
        self.boxes.iter().filter(|b| b.role == BoxRole::Obstacle)
    }

    pub fn finish_pad(&self) -> Option<&WorldBox> {
        self.boxes.iter().find(|b| b.role == BoxRole::FinishPad)
    }
}

/// The player's marble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarbleState {
    /// Sphere center
    pub position: Vec3,
    pub velocity: Vec3,
    /// Supported by a platform this tick
    pub on_ground: bool,
    /// A jump request would be honored now
    pub can_jump: bool,
    /// Last tick the marble was grounded
    pub last_ground_tick: Tick,
    /// Finish reached; marble frozen
    pub finished: bool,
    /// Tick of the last spawn or respawn
    pub spawn_tick: Tick,
    /// Tick of the first movement input since (re)spawn
    pub start_tick: Option<Tick>,
    /// Completion time latched at the finish tick (seconds)
    pub finish_time: Option<f64>,
}

impl MarbleState {
    /// A fresh marble resting at the spawn point
    pub fn spawn(start: Vec3, now: Tick) -> Self {
        Self {
            position: start,
            velocity: Vec3::ZERO,
            on_ground: false,
            can_jump: true,
            last_ground_tick: now,
            finished: false,
            spawn_tick: now,
            start_tick: None,
            finish_time: None,
        }
    }

    /// Put the marble back at the spawn point after falling out; the timer restarts
    pub fn respawn(&mut self, start: Vec3, now: Tick) {
        self.position = start;
        self.velocity = Vec3::ZERO;
        self.start_tick = None;
        self.spawn_tick = now;
        self.can_jump = true;
        self.last_ground_tick = now;
    }

    /// Tick the completion time counts from. Falls back to the spawn tick
    /// when the marble reaches the finish without any movement input.
    pub fn timer_origin(&self) -> Tick {
        self.start_tick.unwrap_or(self.spawn_tick)
    }

    /// Seconds since the timer started, if it has
    pub fn elapsed_secs(&self, now: Tick) -> Option<f64> {
        if let Some(t) = self.finish_time {
            return Some(t);
        }
        self.start_tick
            .map(|start| crate::ticks_to_secs(now.saturating_sub(start)))
    }
}

/// Everything a tick reads and writes
#[derive(Debug, Clone)]
pub struct SimContext {
    pub marble: MarbleState,
    pub level: LevelRuntime,
    /// Current tick; advanced at the start of every simulated tick
    pub now: Tick,
}

impl SimContext {
    pub fn new(level: LevelRuntime) -> Self {
        Self {
            marble: MarbleState::spawn(level.start, 0),
            level,
            now: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::builtin_levels;

    #[test]
    fn test_runtime_scan_order_and_pads() {
        let levels = builtin_levels();
        let runtime = LevelRuntime::from_level(2, &levels[1]);

        let n = levels[1].platforms.len() + levels[1].obstacles.len();
        assert_eq!(runtime.boxes.len(), n + 2);
        assert_eq!(runtime.boxes[0].role, BoxRole::Platform);
        assert_eq!(runtime.boxes[n - 1].role, BoxRole::Obstacle);
        assert_eq!(runtime.boxes[n].role, BoxRole::StartPad);
        assert_eq!(runtime.boxes[n + 1].role, BoxRole::FinishPad);

        let finish = runtime.finish_pad().unwrap();
        assert_eq!(finish.aabb.center, Vec3::new(0.0, 0.5, 70.0));
        assert!((finish.aabb.top() - 0.65).abs() < 1e-6);
        assert_eq!(runtime.obstacles().count(), 3);
        assert_eq!(runtime.platforms().count(), levels[1].platforms.len() + 2);
    }

    #[test]
    fn test_respawn_resets_timer() {
        let mut marble = MarbleState::spawn(Vec3::ZERO, 0);
        marble.position = Vec3::new(3.0, -6.0, 1.0);
        marble.velocity = Vec3::new(1.0, -4.0, 0.0);
        marble.start_tick = Some(10);
        marble.can_jump = false;

        marble.respawn(Vec3::new(0.0, 2.0, -5.0), 120);
        assert_eq!(marble.position, Vec3::new(0.0, 2.0, -5.0));
        assert_eq!(marble.velocity, Vec3::ZERO);
        assert_eq!(marble.start_tick, None);
        assert!(marble.can_jump);
        assert_eq!(marble.last_ground_tick, 120);
        assert_eq!(marble.elapsed_secs(200), None);
        assert_eq!(marble.timer_origin(), 120);

        marble.start_tick = Some(130);
        assert_eq!(marble.timer_origin(), 130);
    }
}
