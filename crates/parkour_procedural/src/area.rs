//! # Play Areas
//!
//! Footprints that bound where environment geometry may go.
//!
//! All shape tests run on the point relative to the area origin; areas are
//! axis-aligned and never rotated. Every shape shares the same vertical band,
//! from just below the origin up to the area height.
//!
//! ```text
//!   Box            L-shape              U-shape
//!  +-----+        +-----+---+         +--+     +--+
//!  |     |        |     |arm|         |  |     |  |
//!  |  o  |        |  o  |   |         |  +--o--+  |
//!  |     |        |     |   |         +-----------+
//!  +-----+        +-----+---+
//! ```

use serde::{Deserialize, Serialize};

use parkour_shared::constants::AREA_GROUND_TOLERANCE;
use parkour_shared::{Vec2, Vec3, DEFAULT_AREA_DIMENSIONS};

use crate::random::RandomStream;

/// Fraction of the area height random points are drawn from.
const RANDOM_HEIGHT_FRACTION: f64 = 0.2;

/// Footprint of a play area.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AreaShape {
    /// Plain rectangle.
    #[default]
    Box,
    /// Rectangle with an extra arm attached along +X.
    LShape {
        /// Arm length along X.
        arm_width: f64,
    },
    /// A corridor along X with two arms running out along ±Y.
    UShape {
        /// Corridor width, and arm width.
        arm_width: f64,
    },
    /// Arbitrary simple polygon in local XY.
    Custom {
        /// Vertices, in order. Closed implicitly.
        polygon: Vec<Vec2>,
    },
}

impl AreaShape {
    /// Short name for logs and reports.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::LShape { .. } => "l_shape",
            Self::UShape { .. } => "u_shape",
            Self::Custom { .. } => "custom",
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two corners.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when `point` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }
}

/// A play area: shape, size, and where it sits in the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaModel {
    origin: Vec3,
    dimensions: Vec3,
    shape: AreaShape,
}

impl Default for AreaModel {
    fn default() -> Self {
        Self::new(Vec3::ZERO, DEFAULT_AREA_DIMENSIONS, AreaShape::Box)
    }
}

impl AreaModel {
    /// Creates an area. `dimensions` is (length, width, height).
    #[must_use]
    pub const fn new(origin: Vec3, dimensions: Vec3, shape: AreaShape) -> Self {
        Self {
            origin,
            dimensions,
            shape,
        }
    }

    /// World position of the area centre at ground level.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Length (X), width (Y), height (Z).
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> Vec3 {
        self.dimensions
    }

    /// The footprint shape.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> &AreaShape {
        &self.shape
    }

    /// Resizes the area.
    pub fn set_dimensions(&mut self, dimensions: Vec3) {
        self.dimensions = dimensions;
    }

    /// True when the world-space `point` lies inside the area.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        let local = point - self.origin;
        if !(-AREA_GROUND_TOLERANCE..=self.dimensions.z).contains(&local.z) {
            return false;
        }

        let hx = self.dimensions.x * 0.5;
        let hy = self.dimensions.y * 0.5;
        let in_main = local.x.abs() <= hx && local.y.abs() <= hy;

        match &self.shape {
            AreaShape::Box => in_main,
            AreaShape::LShape { arm_width } => {
                let in_arm =
                    local.x >= hx && local.x <= hx + arm_width && local.y.abs() <= hy;
                in_main || in_arm
            }
            AreaShape::UShape { arm_width } => {
                let ha = arm_width * 0.5;
                let in_corridor = local.x.abs() <= hx && local.y.abs() <= ha;
                let in_left = local.x.abs() <= ha && local.y <= -ha && local.y >= -hy;
                let in_right = local.x.abs() <= ha && local.y >= ha && local.y <= hy;
                in_corridor || in_left || in_right
            }
            AreaShape::Custom { polygon } => polygon_contains(polygon, local.truncate()),
        }
    }

    /// Draws a point inside the area, near the ground.
    ///
    /// Multi-part shapes pick a part first (L-shape 60/40, U-shape 40/30/30)
    /// and then sample it uniformly; height is uniform in the lowest fifth of
    /// the area.
    pub fn random_point(&self, rng: &mut RandomStream) -> Vec3 {
        let hx = self.dimensions.x * 0.5;
        let hy = self.dimensions.y * 0.5;

        let (x, y) = match &self.shape {
            AreaShape::Box => (rng.frand_range(-hx, hx), rng.frand_range(-hy, hy)),
            AreaShape::LShape { arm_width } => {
                if rng.frand() < 0.6 {
                    (rng.frand_range(-hx, hx), rng.frand_range(-hy, hy))
                } else {
                    (hx + rng.frand_range(0.0, *arm_width), rng.frand_range(-hy, hy))
                }
            }
            AreaShape::UShape { arm_width } => {
                let ha = arm_width * 0.5;
                let choice = rng.frand();
                if choice < 0.4 {
                    (rng.frand_range(-hx, hx), rng.frand_range(-ha, ha))
                } else if choice < 0.7 {
                    (rng.frand_range(-ha, ha), rng.frand_range(-hy, -ha))
                } else {
                    (rng.frand_range(-ha, ha), rng.frand_range(ha, hy))
                }
            }
            AreaShape::Custom { polygon } => match polygon_bounds(polygon) {
                Some((min, max)) => (
                    rng.frand_range(min.x, max.x),
                    rng.frand_range(min.y, max.y),
                ),
                None => (rng.frand_range(-hx, hx), rng.frand_range(-hy, hy)),
            },
        };

        let z = rng.frand_range(0.0, self.dimensions.z * RANDOM_HEIGHT_FRACTION);
        self.origin + Vec3::new(x, y, z)
    }

    /// World-space bounding box of the whole area.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let hx = self.dimensions.x * 0.5;
        let hy = self.dimensions.y * 0.5;

        let (local_min, local_max) = match &self.shape {
            AreaShape::Box | AreaShape::UShape { .. } => {
                (Vec2::new(-hx, -hy), Vec2::new(hx, hy))
            }
            AreaShape::LShape { arm_width } => {
                (Vec2::new(-hx, -hy), Vec2::new(hx + arm_width, hy))
            }
            AreaShape::Custom { polygon } => polygon_bounds(polygon)
                .unwrap_or((Vec2::new(-hx, -hy), Vec2::new(hx, hy))),
        };

        Aabb::new(
            self.origin + local_min.extend(-AREA_GROUND_TOLERANCE),
            self.origin + local_max.extend(self.dimensions.z),
        )
    }
}

/// Even-odd ray cast. Degenerate polygons contain nothing.
fn polygon_contains(polygon: &[Vec2], point: Vec2) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let crossing = a.x + (b.x - a.x) * (point.y - a.y) / (b.y - a.y);
            if point.x < crossing {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn polygon_bounds(polygon: &[Vec2]) -> Option<(Vec2, Vec2)> {
    if polygon.len() < 3 {
        return None;
    }
    let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for v in polygon {
        min = Vec2::new(min.x.min(v.x), min.y.min(v.y));
        max = Vec2::new(max.x.max(v.x), max.y.max(v.y));
    }
    (min.x.is_finite() && max.x.is_finite() && min.y.is_finite() && max.y.is_finite())
        .then_some((min, max))
}
