//! # Jump Model
//!
//! Decides whether a player can get from one platform to another.
//!
//! The model is deliberately simple: a horizontal reach limit, a climb limit,
//! and a much looser fall limit. No trajectories are simulated.
//!
//! ## Thresholds
//!
//! Every check runs against the *safe* thresholds, i.e. the raw limits scaled
//! by the safety margin, so generated courses never ask for a perfect jump.
//!
//! | Direction | Fails when                      |
//! |-----------|---------------------------------|
//! | Across    | planar gap `> safe_distance`    |
//! | Up        | rise `> safe_height`            |
//! | Down      | drop `> 3 × safe_height`        |

use serde::{Deserialize, Serialize};

use parkour_shared::constants::FALL_TOLERANCE_FACTOR;
use parkour_shared::{Vec3, DEFAULT_MAX_JUMP_DISTANCE, DEFAULT_MAX_JUMP_HEIGHT, DEFAULT_SAFETY_MARGIN};

/// Outcome of checking a single jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JumpVerdict {
    /// Reachable.
    Valid,
    /// Planar gap exceeds the safe distance.
    TooFar,
    /// Climb exceeds the safe height.
    TooHigh,
    /// Drop exceeds the fall tolerance.
    TooDeep,
}

impl JumpVerdict {
    /// True for [`JumpVerdict::Valid`].
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Named jump profiles for common character types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpPreset {
    /// 150 high, 350 far.
    Realistic,
    /// 250 high, 500 far.
    Athletic,
    /// 400 high, 800 far.
    Superhuman,
}

impl JumpPreset {
    /// Returns `(max_height, max_distance)` for this preset.
    #[must_use]
    pub const fn limits(self) -> (f64, f64) {
        match self {
            Self::Realistic => (150.0, 350.0),
            Self::Athletic => (250.0, 500.0),
            Self::Superhuman => (400.0, 800.0),
        }
    }
}

/// Jump limits of the player character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConstraints {
    /// Maximum climb in one jump.
    pub max_height: f64,
    /// Maximum planar distance in one jump.
    pub max_distance: f64,
    /// Fraction of the limits the generator plans with, in `(0, 1]`.
    pub safety_margin: f64,
}

impl Default for JumpConstraints {
    fn default() -> Self {
        Self {
            max_height: DEFAULT_MAX_JUMP_HEIGHT,
            max_distance: DEFAULT_MAX_JUMP_DISTANCE,
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }
}

impl JumpConstraints {
    /// Creates jump constraints.
    #[must_use]
    pub const fn new(max_height: f64, max_distance: f64, safety_margin: f64) -> Self {
        Self {
            max_height,
            max_distance,
            safety_margin,
        }
    }

    /// Creates constraints from a preset, keeping the given margin.
    #[must_use]
    pub const fn from_preset(preset: JumpPreset, safety_margin: f64) -> Self {
        let (max_height, max_distance) = preset.limits();
        Self::new(max_height, max_distance, safety_margin)
    }

    /// Planar distance the generator plans jumps with.
    #[inline]
    #[must_use]
    pub fn safe_distance(&self) -> f64 {
        self.max_distance * self.safety_margin
    }

    /// Climb the generator plans jumps with.
    #[inline]
    #[must_use]
    pub fn safe_height(&self) -> f64 {
        self.max_height * self.safety_margin
    }

    /// Deepest drop still considered survivable.
    #[inline]
    #[must_use]
    pub fn max_safe_drop(&self) -> f64 {
        self.safe_height() * FALL_TOLERANCE_FACTOR
    }

    /// True when both safe thresholds are positive and finite.
    ///
    /// Placement refuses to run on unusable constraints instead of looping on
    /// zero-length strides.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        let d = self.safe_distance();
        let h = self.safe_height();
        d > 0.0 && d.is_finite() && h > 0.0 && h.is_finite()
    }

    /// Classifies the jump from `from` to `to`.
    #[must_use]
    pub fn evaluate(&self, from: Vec3, to: Vec3) -> JumpVerdict {
        let diff = to - from;

        if diff.planar_length() > self.safe_distance() {
            return JumpVerdict::TooFar;
        }

        let vertical = diff.z;
        if vertical > 0.0 && vertical > self.safe_height() {
            return JumpVerdict::TooHigh;
        }

        if vertical < -self.max_safe_drop() {
            return JumpVerdict::TooDeep;
        }

        JumpVerdict::Valid
    }

    /// True when the player can make the jump from `from` to `to`.
    #[inline]
    #[must_use]
    pub fn is_jump_valid(&self, from: Vec3, to: Vec3) -> bool {
        self.evaluate(from, to).is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints() -> JumpConstraints {
        // safe distance 340, safe height 170
        JumpConstraints::new(200.0, 400.0, 0.85)
    }

    #[test]
    fn test_safe_thresholds() {
        let c = constraints();
        assert!((c.safe_distance() - 340.0).abs() < 1e-9);
        assert!((c.safe_height() - 170.0).abs() < 1e-9);
        assert!((c.max_safe_drop() - 510.0).abs() < 1e-9);
        assert!(c.is_usable());
    }

    #[test]
    fn test_horizontal_limit() {
        let c = constraints();
        assert!(c.is_jump_valid(Vec3::ZERO, Vec3::new(300.0, 0.0, 0.0)));
        assert!(c.is_jump_valid(Vec3::ZERO, Vec3::new(200.0, 200.0, 0.0)));
        assert_eq!(c.evaluate(Vec3::ZERO, Vec3::new(1000.0, 0.0, 0.0)), JumpVerdict::TooFar);
    }

    #[test]
    fn test_height_does_not_count_as_distance() {
        let c = constraints();
        // 300 across, 150 up: the 3D length is >340 but the planar gap is not.
        assert!(c.is_jump_valid(Vec3::ZERO, Vec3::new(300.0, 0.0, 150.0)));
    }

    #[test]
    fn test_climb_limit() {
        let c = constraints();
        assert!(c.is_jump_valid(Vec3::ZERO, Vec3::new(100.0, 0.0, 160.0)));
        assert_eq!(c.evaluate(Vec3::ZERO, Vec3::new(100.0, 0.0, 200.0)), JumpVerdict::TooHigh);
    }

    #[test]
    fn test_falls_are_looser_than_climbs() {
        let c = constraints();
        // A 400 drop would be far too much as a climb, but is a fine fall.
        assert!(c.is_jump_valid(Vec3::ZERO, Vec3::new(100.0, 0.0, -400.0)));
        assert!(!c.is_jump_valid(Vec3::ZERO, Vec3::new(100.0, 0.0, 400.0)));
        assert_eq!(c.evaluate(Vec3::ZERO, Vec3::new(100.0, 0.0, -600.0)), JumpVerdict::TooDeep);
    }

    #[test]
    fn test_unusable_constraints() {
        assert!(!JumpConstraints::new(200.0, 0.0, 0.85).is_usable());
        assert!(!JumpConstraints::new(200.0, 400.0, 0.0).is_usable());
        assert!(!JumpConstraints::new(f64::NAN, 400.0, 0.85).is_usable());
    }

    #[test]
    fn test_presets() {
        let c = JumpConstraints::from_preset(JumpPreset::Athletic, 1.0);
        assert_eq!(c.max_height, 250.0);
        assert_eq!(c.max_distance, 500.0);
        assert_eq!(JumpPreset::Realistic.limits(), (150.0, 350.0));
        assert_eq!(JumpPreset::Superhuman.limits(), (400.0, 800.0));
    }
}
