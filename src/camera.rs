//! Follow camera
//!
//! Trails behind the marble with a very slow lerp so the view stays calm.

use glam::Vec3;

use crate::tuning::CameraTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl FollowCamera {
    /// Wide framing of the start point used when a level loads
    pub fn framing_start(start: Vec3, tuning: &CameraTuning) -> Self {
        Self {
            position: start + tuning.intro_offset,
            look_at: start,
        }
    }

    /// Ease toward the ideal spot behind the marble and look just ahead of it
    pub fn follow(&mut self, marble: Vec3, tuning: &CameraTuning) {
        let ideal = marble + tuning.follow_offset;
        self.position = self.position.lerp(ideal, tuning.follow_lerp);
        self.look_at = marble + Vec3::new(0.0, 0.0, tuning.look_ahead);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_start() {
        let cam = FollowCamera::framing_start(Vec3::new(0.0, 2.0, -5.0), &CameraTuning::default());
        assert_eq!(cam.position, Vec3::new(0.0, 14.0, -20.0));
        assert_eq!(cam.look_at, Vec3::new(0.0, 2.0, -5.0));
    }

    #[test]
    fn test_follow_converges_slowly() {
        let tuning = CameraTuning::default();
        let marble = Vec3::new(0.0, 1.1, 10.0);
        let mut cam = FollowCamera::framing_start(Vec3::ZERO, &tuning);
        let ideal = marble + tuning.follow_offset;

        let start_gap = cam.position.distance(ideal);
        cam.follow(marble, &tuning);
        let gap = cam.position.distance(ideal);
        assert!((gap - start_gap * 0.995).abs() < 1e-3);
        assert_eq!(cam.look_at, Vec3::new(0.0, 1.1, 12.0));

        for _ in 0..2000 {
            cam.follow(marble, &tuning);
        }
        assert!(cam.position.distance(ideal) < start_gap * 0.001);
    }
}
