//! # Parkour Shared
//!
//! Common types used by the generator library and the headless tools.
//!
//! ## Conventions
//!
//! - World space is Z-up, units are centimetres.
//! - "Planar" always means the XY plane: heights never count towards
//!   horizontal distances.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    DEFAULT_AREA_DIMENSIONS, DEFAULT_BUILDING_DENSITY, DEFAULT_MAX_JUMP_DISTANCE,
    DEFAULT_MAX_JUMP_HEIGHT, DEFAULT_PATH_CLEARANCE, DEFAULT_SAFETY_MARGIN,
};
pub use math::{Quaternion, Transform, Vec2, Vec3};
