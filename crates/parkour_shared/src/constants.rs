//! # Generator Defaults
//!
//! Default values for newly created paths and play areas.
//!
//! All lengths are in world units (centimetres).

use crate::math::Vec3;

// =============================================================================
// JUMP MODEL
// =============================================================================

/// Default maximum jump height.
pub const DEFAULT_MAX_JUMP_HEIGHT: f64 = 200.0;

/// Default maximum horizontal jump distance.
pub const DEFAULT_MAX_JUMP_DISTANCE: f64 = 400.0;

/// Default safety margin (0.85 = plan jumps at 85% of the maximum).
pub const DEFAULT_SAFETY_MARGIN: f64 = 0.85;

/// Falls are tolerated down to this many safe jump heights.
pub const FALL_TOLERANCE_FACTOR: f64 = 3.0;

// =============================================================================
// PLATFORMS
// =============================================================================

/// Default platform width (across the path).
pub const DEFAULT_PLATFORM_WIDTH: f64 = 200.0;

/// Default platform depth (along the path).
pub const DEFAULT_PLATFORM_DEPTH: f64 = 200.0;

/// Default platform thickness.
pub const DEFAULT_PLATFORM_THICKNESS: f64 = 50.0;

/// Default lower bound of the platform count estimate.
pub const DEFAULT_MIN_PLATFORMS: usize = 5;

/// Default hard cap on platforms per path.
pub const DEFAULT_MAX_PLATFORMS: usize = 50;

/// Default stride/size variation.
pub const DEFAULT_PLATFORM_VARIATION: f64 = 0.3;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Default building density (0-1).
pub const DEFAULT_BUILDING_DENSITY: f64 = 0.5;

/// Default minimum planar gap between buildings and the path.
pub const DEFAULT_PATH_CLEARANCE: f64 = 500.0;

/// Default minimum building size (length, width, height).
pub const DEFAULT_MIN_BUILDING_SIZE: Vec3 = Vec3::new(300.0, 300.0, 400.0);

/// Default maximum building size (length, width, height).
pub const DEFAULT_MAX_BUILDING_SIZE: Vec3 = Vec3::new(1000.0, 1000.0, 2000.0);

/// Arc-length step used when sampling the path for clearance checks.
pub const PATH_SAMPLE_STEP: f64 = 100.0;

// =============================================================================
// PLAY AREA
// =============================================================================

/// Default play area dimensions (length, width, height).
pub const DEFAULT_AREA_DIMENSIONS: Vec3 = Vec3::new(5000.0, 5000.0, 2000.0);

/// Default L-shape secondary arm width.
pub const DEFAULT_L_ARM_WIDTH: f64 = 2000.0;

/// Default U-shape arm width.
pub const DEFAULT_U_ARM_WIDTH: f64 = 1500.0;

/// How far below the area origin a point may sit and still count as inside.
pub const AREA_GROUND_TOLERANCE: f64 = 10.0;
