//! Input aggregation
//!
//! Keyboard state and an optional virtual joystick are merged into one
//! `TickInput` per tick. Event handlers may update the aggregator at any
//! time; the simulation only sees the snapshot taken at the start of a tick.

use glam::Vec2;

use crate::sim::TickInput;

/// Joystick drag distance (in screen units) that maps to full deflection
pub const JOYSTICK_RADIUS: f32 = 50.0;

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Jump,
}

impl Key {
    /// Map a browser-style key name (case-insensitive) to a game key
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Key::Forward),
            "s" | "arrowdown" => Some(Key::Back),
            "a" | "arrowleft" => Some(Key::Left),
            "d" | "arrowright" => Some(Key::Right),
            "j" => Some(Key::Jump),
            _ => None,
        }
    }
}

/// Held movement keys
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Per-axis intent. Left is +x and forward is +z in world space.
    pub fn axes(&self) -> Vec2 {
        let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.forward, self.back))
    }
}

/// Virtual on-screen joystick
#[derive(Debug, Clone, Copy, Default)]
pub struct Joystick {
    /// Screen position of the stick's center while a drag is active
    origin: Option<Vec2>,
    /// Deflection in the unit disc; +y is "up" on screen
    vector: Vec2,
}

impl Joystick {
    pub fn begin(&mut self, center: Vec2) {
        self.origin = Some(center);
        self.vector = Vec2::ZERO;
    }

    /// Update from the current touch point (screen coordinates, y down)
    pub fn drag(&mut self, point: Vec2) {
        let Some(origin) = self.origin else {
            return;
        };
        let delta = point - origin;
        let distance = delta.length();
        let normalized = if distance > JOYSTICK_RADIUS {
            delta / distance
        } else {
            delta / JOYSTICK_RADIUS
        };
        // Screen y grows downward; forward is up
        self.vector = Vec2::new(normalized.x, -normalized.y);
    }

    pub fn end(&mut self) {
        self.origin = None;
        self.vector = Vec2::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    pub fn vector(&self) -> Vec2 {
        self.vector
    }
}

/// Merges every input source into per-tick snapshots
#[derive(Debug, Clone, Default)]
pub struct InputAggregator {
    keys: KeyState,
    joystick: Joystick,
    /// Touch controls are only honored when enabled (landscape mobile)
    joystick_enabled: bool,
    /// One-shot jump request, cleared by `snapshot`
    jump_pending: bool,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_joystick_enabled(&mut self, enabled: bool) {
        self.joystick_enabled = enabled;
        if !enabled {
            self.joystick.end();
        }
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Forward => self.keys.forward = true,
            Key::Back => self.keys.back = true,
            Key::Left => self.keys.left = true,
            Key::Right => self.keys.right = true,
            Key::Jump => self.jump_pending = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Forward => self.keys.forward = false,
            Key::Back => self.keys.back = false,
            Key::Left => self.keys.left = false,
            Key::Right => self.keys.right = false,
            Key::Jump => {}
        }
    }

    /// Touch jump button
    pub fn press_jump(&mut self) {
        self.jump_pending = true;
    }

    pub fn joystick_mut(&mut self) -> &mut Joystick {
        &mut self.joystick
    }

    /// Drop all held keys, the joystick drag and any pending jump
    pub fn clear(&mut self) {
        self.keys = KeyState::default();
        self.joystick.end();
        self.jump_pending = false;
    }

    /// Sample the current intent and consume the pending jump
    pub fn snapshot(&mut self, dead_zone: f32) -> TickInput {
        let mut axes = self.keys.axes();

        if self.joystick_enabled {
            let stick = self.joystick.vector();
            if stick.x.abs() > dead_zone || stick.y.abs() > dead_zone {
                axes.x -= stick.x;
                axes.y += stick.y;
            }
        }

        let jump = std::mem::take(&mut self.jump_pending);
        TickInput {
            move_x: axes.x,
            move_z: axes.y,
            jump,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("W"), Some(Key::Forward));
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_name("j"), Some(Key::Jump));
        assert_eq!(Key::from_name("q"), None);
        assert_eq!(Key::from_name(" "), None);
    }

    #[test]
    fn test_keys_accumulate_per_axis() {
        let mut input = InputAggregator::new();
        input.key_down(Key::Forward);
        input.key_down(Key::Left);
        let snap = input.snapshot(0.1);
        assert_eq!((snap.move_x, snap.move_z), (1.0, 1.0));

        input.key_down(Key::Back);
        input.key_down(Key::Right);
        let snap = input.snapshot(0.1);
        assert_eq!((snap.move_x, snap.move_z), (0.0, 0.0));
        assert!(!snap.has_movement());
    }

    #[test]
    fn test_jump_is_one_shot() {
        let mut input = InputAggregator::new();
        input.key_down(Key::Jump);
        assert!(input.snapshot(0.1).jump);
        assert!(!input.snapshot(0.1).jump);

        input.press_jump();
        assert!(input.snapshot(0.1).jump);
    }

    #[test]
    fn test_joystick_dead_zone_and_mapping() {
        let mut input = InputAggregator::new();
        input.set_joystick_enabled(true);

        let stick = input.joystick_mut();
        stick.begin(Vec2::new(100.0, 100.0));
        stick.drag(Vec2::new(104.0, 97.0));
        let snap = input.snapshot(0.1);
        assert!(!snap.has_movement());

        // Drag right and up past the rim: clamped to the unit circle
        input.joystick_mut().drag(Vec2::new(160.0, 20.0));
        let snap = input.snapshot(0.1);
        assert!((snap.move_x + 0.6).abs() < 1e-6);
        assert!((snap.move_z - 0.8).abs() < 1e-6);

        // Keys and stick add
        input.key_down(Key::Forward);
        let snap = input.snapshot(0.1);
        assert!((snap.move_z - 1.8).abs() < 1e-6);

        input.joystick_mut().end();
        let snap = input.snapshot(0.1);
        assert_eq!(snap.move_z, 1.0);
    }

    #[test]
    fn test_clear_drops_held_state() {
        let mut input = InputAggregator::new();
        input.set_joystick_enabled(true);
        input.key_down(Key::Forward);
        input.key_down(Key::Jump);
        let stick = input.joystick_mut();
        stick.begin(Vec2::ZERO);
        stick.drag(Vec2::new(50.0, 0.0));
        assert!(input.joystick_mut().is_active());

        input.clear();
        assert!(!input.joystick_mut().is_active());
        let snap = input.snapshot(0.1);
        assert!(!snap.has_movement());
        assert!(!snap.jump);
    }

    #[test]
    fn test_disabled_joystick_is_ignored() {
        let mut input = InputAggregator::new();
        let stick = input.joystick_mut();
        stick.begin(Vec2::ZERO);
        stick.drag(Vec2::new(50.0, 0.0));
        assert!(!input.snapshot(0.1).has_movement());
    }
}
