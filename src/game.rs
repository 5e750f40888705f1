//! Level state machine
//!
//! Owns everything that lives across ticks: which level is loaded, the
//! simulation context, the camera and the best times. Transitions:
//!
//! ```text
//! Menu --start_level--> Playing --(finish pad)--> Finished
//! Finished --retry / next_level--> Playing
//! Finished --next_level (no more levels)--> Menu
//! Playing | Finished --back_to_menu--> Menu
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Tick;
use crate::best_times::BestTimes;
use crate::camera::FollowCamera;
use crate::consts::{DISPLAY_INTERVAL_TICKS, MENU_LEVEL_INDEX};
use crate::levels::{LevelData, builtin_levels};
use crate::sim::{GamePhase, LevelRuntime, SimContext, TickInput, TickReport, tick};
use crate::tuning::Tuning;

/// State changes reported to the menu/HUD layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnteredPlaying { level: usize },
    Finished {
        level: usize,
        elapsed: f64,
        is_new_best: bool,
    },
    BackToMenu,
}

/// Everything the renderer and HUD need after a tick. Read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame {
    pub marble_position: Vec3,
    pub camera_position: Vec3,
    pub camera_look_at: Vec3,
    pub on_ground: bool,
    pub can_jump: bool,
    pub finished: bool,
    /// Authoritative elapsed time (None until the timer starts)
    pub elapsed: Option<f64>,
    /// Throttled elapsed time for on-screen display
    pub display_time: f64,
}

/// A running game session
#[derive(Debug, Clone)]
pub struct Game {
    phase: GamePhase,
    levels: Vec<LevelData>,
    tuning: Tuning,
    sim: Option<SimContext>,
    camera: Option<FollowCamera>,
    best_times: BestTimes,
    events: Vec<GameEvent>,
    display_time: f64,
    last_display_tick: Tick,
}

impl Game {
    /// Create a game in the menu. `levels[0]` is level 1.
    pub fn new(levels: Vec<LevelData>, tuning: Tuning) -> Self {
        Self {
            phase: GamePhase::Menu,
            levels,
            tuning,
            sim: None,
            camera: None,
            best_times: BestTimes::new(),
            events: Vec::new(),
            display_time: 0.0,
            last_display_tick: 0,
        }
    }

    /// A game with the shipped levels and default tuning
    pub fn with_builtin_levels() -> Self {
        Self::new(builtin_levels(), Tuning::default())
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Loaded level index, None in the menu
    pub fn current_level(&self) -> Option<usize> {
        self.sim.as_ref().map(|s| s.level.index)
    }

    /// Loaded level index, or `MENU_LEVEL_INDEX` in the menu
    pub fn level_index(&self) -> usize {
        self.current_level().unwrap_or(MENU_LEVEL_INDEX)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Name of a 1-based level
    pub fn level_name(&self, index: usize) -> Option<&str> {
        self.level_data(index).map(|l| l.name.as_str())
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn best_times(&self) -> &BestTimes {
        &self.best_times
    }

    pub fn sim(&self) -> Option<&SimContext> {
        self.sim.as_ref()
    }

    /// Throttled timer value for the HUD
    pub fn display_time(&self) -> f64 {
        self.display_time
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn level_data(&self, index: usize) -> Option<&LevelData> {
        index.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    /// Menu -> Playing
    pub fn start_level(&mut self, index: usize) -> bool {
        if self.phase != GamePhase::Menu {
            log::warn!("start_level ignored in {:?}", self.phase);
            return false;
        }
        self.load(index)
    }

    /// Finished -> Playing on the same level
    pub fn retry(&mut self) -> bool {
        if self.phase != GamePhase::Finished {
            log::warn!("retry ignored in {:?}", self.phase);
            return false;
        }
        match self.current_level() {
            Some(index) => self.load(index),
            None => false,
        }
    }

    /// Finished -> Playing on the next level, or Menu after the last one
    pub fn next_level(&mut self) -> bool {
        if self.phase != GamePhase::Finished {
            log::warn!("next_level ignored in {:?}", self.phase);
            return false;
        }
        let Some(index) = self.current_level() else {
            return false;
        };
        if self.level_data(index + 1).is_some() {
            self.load(index + 1)
        } else {
            log::info!("No level after {index}, returning to menu");
            self.back_to_menu()
        }
    }

    /// Playing | Finished -> Menu. Best times are kept.
    pub fn back_to_menu(&mut self) -> bool {
        if self.phase == GamePhase::Menu {
            return false;
        }
        self.sim = None;
        self.camera = None;
        self.display_time = 0.0;
        self.last_display_tick = 0;
        self.phase = GamePhase::Menu;
        self.events.push(GameEvent::BackToMenu);
        log::info!("Back to menu");
        true
    }

    fn load(&mut self, index: usize) -> bool {
        let Some(data) = self.level_data(index) else {
            log::warn!("No level at index {index}");
            return false;
        };
        let runtime = LevelRuntime::from_level(index, data);
        log::info!(
            "Loading level {index} \"{}\" ({} boxes)",
            runtime.name,
            runtime.boxes.len()
        );

        self.camera = Some(FollowCamera::framing_start(runtime.start, &self.tuning.camera));
        self.sim = Some(SimContext::new(runtime));
        self.display_time = 0.0;
        self.last_display_tick = 0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::EnteredPlaying { level: index });
        true
    }

    /// Run one simulation tick. A no-op outside `Playing`.
    pub fn tick(&mut self, input: &TickInput) -> Option<TickReport> {
        if self.phase != GamePhase::Playing {
            log::trace!("Tick ignored in {:?}", self.phase);
            return None;
        }
        let Some(sim) = self.sim.as_mut() else {
            log::trace!("Tick ignored: no level loaded");
            return None;
        };

        let report = tick(sim, input, &self.tuning);

        if let Some(camera) = self.camera.as_mut() {
            camera.follow(sim.marble.position, &self.tuning.camera);
        }

        if report.respawned {
            self.display_time = 0.0;
            self.last_display_tick = sim.now;
        } else if sim.now - self.last_display_tick >= DISPLAY_INTERVAL_TICKS {
            if let Some(elapsed) = sim.marble.elapsed_secs(sim.now) {
                self.display_time = elapsed;
                self.last_display_tick = sim.now;
            }
        }

        if let Some(elapsed) = report.finished {
            let level = sim.level.index;
            let is_new_best = self.best_times.record(level, elapsed);
            self.display_time = elapsed;
            self.phase = GamePhase::Finished;
            self.events.push(GameEvent::Finished {
                level,
                elapsed,
                is_new_best,
            });
        }

        Some(report)
    }

    /// Render-ready snapshot, None in the menu
    pub fn frame(&self) -> Option<RenderFrame> {
        let sim = self.sim.as_ref()?;
        let camera = self.camera.as_ref()?;
        Some(RenderFrame {
            marble_position: sim.marble.position,
            camera_position: camera.position,
            camera_look_at: camera.look_at,
            on_ground: sim.marble.on_ground,
            can_jump: sim.marble.can_jump,
            finished: sim.marble.finished,
            elapsed: sim.marble.elapsed_secs(sim.now),
            display_time: self.display_time,
        })
    }
}
