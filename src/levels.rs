//! Level geometry
//!
//! Levels are pure data: platform and obstacle boxes plus a start and a
//! finish point. Level indices are 1-based; index 0 means "menu".

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A box as authored in level data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxDef {
    pub pos: Vec3,
    pub size: Vec3,
    /// Display color (renderer only)
    #[serde(default)]
    pub color: u32,
}

/// One level's static description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub platforms: Vec<BoxDef>,
    #[serde(default)]
    pub obstacles: Vec<BoxDef>,
    pub start: Vec3,
    pub finish: Vec3,
}

impl LevelData {
    /// Check that every coordinate is finite and every box has positive extents
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidLevel { index, reason };

        if !self.start.is_finite() {
            return Err(invalid("start point is not finite".into()));
        }
        if !self.finish.is_finite() {
            return Err(invalid("finish point is not finite".into()));
        }
        let boxes = self
            .platforms
            .iter()
            .map(|b| ("platform", b))
            .chain(self.obstacles.iter().map(|b| ("obstacle", b)));
        for (i, (kind, def)) in boxes.enumerate() {
            if !def.pos.is_finite() || !def.size.is_finite() {
                return Err(invalid(format!("{kind} #{i} has non-finite values")));
            }
            if def.size.min_element() <= 0.0 {
                return Err(invalid(format!("{kind} #{i} has a non-positive size")));
            }
        }
        Ok(())
    }
}

/// Parse and validate a JSON array of levels (first entry is level 1)
pub fn load_levels_json(json: &str) -> Result<Vec<LevelData>, ConfigError> {
    let levels: Vec<LevelData> = serde_json::from_str(json)?;
    for (i, level) in levels.iter().enumerate() {
        level.validate(i + 1)?;
    }
    Ok(levels)
}

/// Load levels from a JSON file
pub fn load_levels_file(path: impl AsRef<Path>) -> Result<Vec<LevelData>, ConfigError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    let levels = load_levels_json(&json)?;
    log::info!("Loaded {} levels from {}", levels.len(), path.as_ref().display());
    Ok(levels)
}

const BLUE: u32 = 0x4a90e2;
const ORANGE: u32 = 0xf39c12;
const RED: u32 = 0xe74c3c;
const PURPLE: u32 = 0x9b59b6;
const GREEN: u32 = 0x2ecc71;
const BROWN: u32 = 0x8b4513;

fn b(pos: [f32; 3], size: [f32; 3], color: u32) -> BoxDef {
    BoxDef {
        pos: Vec3::from_array(pos),
        size: Vec3::from_array(size),
        color,
    }
}

/// The levels shipped with the game
pub fn builtin_levels() -> Vec<LevelData> {
    vec![getting_started(), call_to_adventure(), belly_of_the_beast()]
}

fn getting_started() -> LevelData {
    LevelData {
        name: "Getting Started".into(),
        platforms: vec![
            b([0.0, 0.0, 5.0], [15.0, 1.0, 15.0], BLUE),
            b([5.0, 1.0, 10.0], [2.0, 1.0, 2.0], ORANGE),
            b([-5.0, 2.0, 12.0], [1.5, 1.0, 1.5], RED),
            b([0.0, 3.0, 8.0], [0.8, 1.0, 0.8], PURPLE),
        ],
        obstacles: vec![],
        start: Vec3::new(0.0, 2.0, -5.0),
        finish: Vec3::new(0.0, 2.0, 15.0),
    }
}

fn call_to_adventure() -> LevelData {
    LevelData {
        name: "Call to Adventure".into(),
        platforms: vec![
            b([0.0, 0.0, 0.0], [12.0, 1.0, 8.0], BLUE),
            b([0.0, 0.0, 15.0], [8.0, 1.0, 6.0], BLUE),
            b([0.0, 3.0, 30.0], [10.0, 1.0, 8.0], ORANGE),
            b([0.0, 3.0, 45.0], [6.0, 1.0, 12.0], ORANGE),
            b([0.0, 0.0, 65.0], [12.0, 1.0, 8.0], PURPLE),
            b([15.0, 0.0, 15.0], [6.0, 1.0, 6.0], GREEN),
            b([-15.0, 0.0, 30.0], [6.0, 1.0, 6.0], GREEN),
            b([20.0, 3.0, 45.0], [4.0, 1.0, 4.0], RED),
            // Pillar tops
            b([3.0, 1.5, 8.0], [1.0, 1.0, 1.0], RED),
            b([-3.0, 1.5, 22.0], [1.0, 1.0, 1.0], RED),
            b([2.0, 4.5, 35.0], [1.0, 1.0, 1.0], RED),
        ],
        obstacles: vec![
            // Pillar bases
            b([3.0, 0.5, 8.0], [1.0, 1.0, 1.0], RED),
            b([-3.0, 0.5, 22.0], [1.0, 1.0, 1.0], RED),
            b([2.0, 3.5, 35.0], [1.0, 1.0, 1.0], RED),
        ],
        start: Vec3::new(0.0, 2.0, -5.0),
        finish: Vec3::new(0.0, 2.0, 70.0),
    }
}

fn belly_of_the_beast() -> LevelData {
    LevelData {
        name: "Belly of the Beast".into(),
        platforms: vec![
            b([0.0, 0.0, 0.0], [8.0, 1.0, 6.0], BLUE),
            // Stepping stones
            b([8.0, 1.0, 8.0], [1.5, 1.0, 1.5], ORANGE),
            b([12.0, 2.0, 15.0], [1.2, 1.0, 1.2], ORANGE),
            b([15.0, 3.0, 22.0], [1.0, 1.0, 1.0], RED),
            // Narrow bridge
            b([18.0, 4.0, 30.0], [2.0, 1.0, 8.0], PURPLE),
            b([25.0, 5.0, 38.0], [1.5, 1.0, 1.5], RED),
            // Long gap
            b([30.0, 6.0, 45.0], [1.0, 1.0, 1.0], RED),
            b([35.0, 7.0, 52.0], [1.2, 1.0, 1.2], ORANGE),
            b([40.0, 8.0, 60.0], [1.0, 1.0, 1.0], RED),
            // Checkpoint
            b([45.0, 9.0, 68.0], [6.0, 1.0, 4.0], GREEN),
            // Descent
            b([52.0, 8.0, 75.0], [1.5, 1.0, 1.5], ORANGE),
            b([58.0, 7.0, 82.0], [1.0, 1.0, 1.0], RED),
            b([62.0, 6.0, 88.0], [1.2, 1.0, 1.2], ORANGE),
            // Zigzag
            b([65.0, 5.0, 95.0], [2.0, 1.0, 2.0], PURPLE),
            b([70.0, 4.0, 100.0], [1.5, 1.0, 1.5], RED),
            b([75.0, 3.0, 105.0], [1.0, 1.0, 1.0], RED),
            // Side route
            b([80.0, 2.0, 110.0], [1.5, 1.0, 1.5], ORANGE),
            b([85.0, 1.0, 115.0], [1.0, 1.0, 1.0], RED),
            // Final approach
            b([88.0, 0.0, 120.0], [1.2, 1.0, 1.2], ORANGE),
            b([90.0, 1.0, 125.0], [1.0, 1.0, 1.0], RED),
            b([92.0, 2.0, 130.0], [1.5, 1.0, 1.5], RED),
            b([95.0, 3.0, 135.0], [4.0, 1.0, 4.0], PURPLE),
            // Pillar tops
            b([10.0, 2.5, 12.0], [1.0, 1.0, 1.0], RED),
            b([20.0, 5.5, 32.0], [1.0, 1.0, 1.0], RED),
            b([32.0, 7.5, 48.0], [1.0, 1.0, 1.0], RED),
            b([48.0, 9.5, 70.0], [1.0, 1.0, 1.0], RED),
            b([60.0, 7.5, 85.0], [1.0, 1.0, 1.0], RED),
            b([72.0, 4.5, 102.0], [1.0, 1.0, 1.0], RED),
            b([82.0, 2.5, 112.0], [1.0, 1.0, 1.0], RED),
            b([89.0, 1.5, 122.0], [1.0, 1.0, 1.0], RED),
        ],
        obstacles: vec![
            b([10.0, 2.0, 12.0], [1.0, 3.0, 1.0], BROWN),
            b([20.0, 5.0, 32.0], [1.0, 2.0, 1.0], BROWN),
            b([32.0, 7.0, 48.0], [1.0, 2.0, 1.0], BROWN),
            b([48.0, 9.0, 70.0], [1.0, 3.0, 1.0], BROWN),
            b([60.0, 7.0, 85.0], [1.0, 2.0, 1.0], BROWN),
            b([72.0, 4.0, 102.0], [1.0, 2.0, 1.0], BROWN),
            b([82.0, 2.0, 112.0], [1.0, 3.0, 1.0], BROWN),
            b([89.0, 1.0, 122.0], [1.0, 2.0, 1.0], BROWN),
        ],
        // The finish sits high, so the last pad needs a jump
        start: Vec3::new(0.0, 2.0, -5.0),
        finish: Vec3::new(95.0, 5.0, 145.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_are_valid() {
        let levels = builtin_levels();
        assert_eq!(levels.len(), 3);
        for (i, level) in levels.iter().enumerate() {
            level.validate(i + 1).unwrap();
        }
        assert_eq!(levels[0].name, "Getting Started");
        assert_eq!(levels[2].obstacles.len(), 8);
    }

    #[test]
    fn test_load_levels_json() {
        let json = r#"[{
            "name": "Tiny",
            "platforms": [{ "pos": [0, 0, 0], "size": [4, 1, 4] }],
            "start": [0, 2, 0],
            "finish": [0, 2, 10]
        }]"#;
        let levels = load_levels_json(json).unwrap();
        assert_eq!(levels.len(), 1);
        assert!(levels[0].obstacles.is_empty());
        assert_eq!(levels[0].platforms[0].size, Vec3::new(4.0, 1.0, 4.0));
    }

    #[test]
    fn test_load_levels_file() {
        let path = std::env::temp_dir().join(format!("marble-run-levels-{}.json", std::process::id()));
        let json = serde_json::to_string(&builtin_levels()[..1]).unwrap();
        std::fs::write(&path, json).unwrap();

        let levels = load_levels_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].name, "Getting Started");
        assert_eq!(levels[0].platforms.len(), 4);

        let missing = load_levels_file(path.with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_rejects_degenerate_box() {
        let json = r#"[{
            "name": "Broken",
            "platforms": [{ "pos": [0, 0, 0], "size": [4, 0, 4] }],
            "start": [0, 2, 0],
            "finish": [0, 2, 10]
        }]"#;
        let err = load_levels_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel { index: 1, .. }));
    }
}
