//! # Platform Placement
//!
//! Walks a guide curve and drops platforms a player can jump between.
//!
//! ## Algorithm
//!
//! Single greedy pass, no backtracking:
//!
//! 1. First platform at arc length 0.
//! 2. Step forward by the safe jump distance (optionally jittered, never below
//!    half of it) and sample the curve there.
//! 3. If the jump from the last platform is valid, place the platform.
//! 4. Otherwise repair: cut the straight segment to the target into enough
//!    evenly spaced intermediates that every hop is valid, then place the
//!    target itself.
//! 5. Repeat until the end of the curve or the platform cap.
//!
//! The loop is bounded by `max_platforms`, so generation always terminates.

use serde::{Deserialize, Serialize};

use parkour_shared::constants::{
    DEFAULT_MAX_PLATFORMS, DEFAULT_MIN_PLATFORMS, DEFAULT_PLATFORM_DEPTH,
    DEFAULT_PLATFORM_THICKNESS, DEFAULT_PLATFORM_VARIATION, DEFAULT_PLATFORM_WIDTH,
};
use parkour_shared::{Quaternion, Transform, Vec3};

use crate::curve::Curve;
use crate::jump::JumpConstraints;
use crate::random::RandomStream;

/// Strides never shrink below this fraction of the safe distance.
const MIN_STRIDE_FRACTION: f64 = 0.5;

/// Largest variation the engine accepts; keeps strides and scales positive.
const MAX_VARIATION: f64 = 0.95;

/// Why a platform exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlatformRole {
    /// First platform, at the start of the curve.
    Start,
    /// Regular stride along the curve.
    Stride,
    /// Inserted to split an unreachable jump.
    Intermediate,
    /// The curve point an unreachable jump was aiming for.
    RepairTarget,
}

/// A single placed platform.
///
/// The platform's position is the centre of its top face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Platform {
    /// Ordinal in the plan.
    pub index: usize,
    /// Position, facing (+X along the path), footprint scale.
    pub transform: Transform,
    /// Arc length this platform was sampled at; `None` for intermediates.
    pub curve_distance: Option<f64>,
    /// Why the platform was placed.
    pub role: PlatformRole,
}

impl Platform {
    /// Top-face centre.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Facing.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> Quaternion {
        self.transform.rotation
    }

    /// Full box size in local axes: depth along +X, width along +Y,
    /// thickness along +Z.
    #[must_use]
    pub fn extent(&self, dimensions: &PlatformDimensions) -> Vec3 {
        Vec3::new(dimensions.depth, dimensions.width, dimensions.thickness)
            .mul_elements(self.transform.scale)
    }
}

/// Base size of a platform before variation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformDimensions {
    /// Across the path.
    pub width: f64,
    /// Along the path.
    pub depth: f64,
    /// Vertical.
    pub thickness: f64,
}

impl Default for PlatformDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLATFORM_WIDTH,
            depth: DEFAULT_PLATFORM_DEPTH,
            thickness: DEFAULT_PLATFORM_THICKNESS,
        }
    }
}

/// Knobs of the placement pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Lower bound of the platform count estimate.
    pub min_platforms: usize,
    /// Hard cap on platforms in a plan.
    pub max_platforms: usize,
    /// Jitter strides and footprint sizes.
    pub allow_variation: bool,
    /// Jitter amount in `[0, 1)`.
    pub variation: f64,
    /// Platform box size.
    pub dimensions: PlatformDimensions,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            min_platforms: DEFAULT_MIN_PLATFORMS,
            max_platforms: DEFAULT_MAX_PLATFORMS,
            allow_variation: true,
            variation: DEFAULT_PLATFORM_VARIATION,
            dimensions: PlatformDimensions::default(),
        }
    }
}

impl PlacementSettings {
    /// Variation the engine actually applies: `0` when disabled or invalid.
    #[must_use]
    pub fn effective_variation(&self) -> f64 {
        if self.allow_variation && self.variation.is_finite() {
            self.variation.clamp(0.0, MAX_VARIATION)
        } else {
            0.0
        }
    }
}

/// Ordered platforms of one path.
///
/// Replaced wholesale on regeneration; never edited in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformPlan {
    platforms: Vec<Platform>,
    seed: u64,
}

impl PlatformPlan {
    /// A plan with no platforms.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            platforms: Vec::new(),
            seed: 0,
        }
    }

    /// Seed the plan was generated with (`0` for an empty plan).
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// All platforms in order.
    #[must_use]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Number of platforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    /// True when there are no platforms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Iterates over the platforms in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Platform> {
        self.platforms.iter()
    }

    /// First platform.
    #[must_use]
    pub fn first(&self) -> Option<&Platform> {
        self.platforms.first()
    }

    /// Last platform.
    #[must_use]
    pub fn last(&self) -> Option<&Platform> {
        self.platforms.last()
    }

    /// Indices `i` for which the jump `i -> i + 1` is not valid.
    ///
    /// Empty and single-platform plans are trivially valid.
    #[must_use]
    pub fn invalid_jumps(&self, constraints: &JumpConstraints) -> Vec<usize> {
        self.platforms
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| !constraints.is_jump_valid(pair[0].position(), pair[1].position()))
            .map(|(i, _)| i)
            .collect()
    }
}

impl<'a> IntoIterator for &'a PlatformPlan {
    type Item = &'a Platform;
    type IntoIter = std::slice::Iter<'a, Platform>;

    fn into_iter(self) -> Self::IntoIter {
        self.platforms.iter()
    }
}

/// Accumulates platforms up to the cap.
struct PlanBuilder {
    platforms: Vec<Platform>,
    cap: usize,
}

impl PlanBuilder {
    fn new(capacity: usize, cap: usize) -> Self {
        Self {
            platforms: Vec::with_capacity(capacity.min(cap)),
            cap,
        }
    }

    fn is_full(&self) -> bool {
        self.platforms.len() >= self.cap
    }

    /// Appends a platform; returns `false` once the cap is reached.
    fn push(
        &mut self,
        transform: Transform,
        curve_distance: Option<f64>,
        role: PlatformRole,
    ) -> bool {
        if self.is_full() {
            return false;
        }
        self.platforms.push(Platform {
            index: self.platforms.len(),
            transform,
            curve_distance,
            role,
        });
        true
    }

    fn last_position(&self) -> Option<Vec3> {
        self.platforms.last().map(Platform::position)
    }
}

/// Places platforms along a curve under a jump model.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlatformPlacementEngine {
    constraints: JumpConstraints,
    settings: PlacementSettings,
}

impl PlatformPlacementEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new(constraints: JumpConstraints, settings: PlacementSettings) -> Self {
        Self {
            constraints,
            settings,
        }
    }

    /// The jump model in use.
    #[must_use]
    pub const fn constraints(&self) -> &JumpConstraints {
        &self.constraints
    }

    /// The placement settings in use.
    #[must_use]
    pub const fn settings(&self) -> &PlacementSettings {
        &self.settings
    }

    /// Expected platform count for a curve of `curve_length`, clamped into
    /// `[min_platforms, max_platforms]`.
    ///
    /// Only sizes buffers; the real count is driven by the curve and the cap.
    #[must_use]
    pub fn estimate_count(&self, curve_length: f64) -> usize {
        let max = self.settings.max_platforms;
        let min = self.settings.min_platforms.min(max);
        let safe = self.constraints.safe_distance();
        if !(safe > 0.0 && curve_length.is_finite()) {
            return min;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (curve_length.max(0.0) / safe).ceil() as usize;
        steps.saturating_add(1).clamp(min, max)
    }

    /// Generates a plan, seeding a fresh stream from `seed` (`0` = self-seed).
    #[must_use]
    pub fn generate(&self, curve: &dyn Curve, seed: u64) -> PlatformPlan {
        if curve.point_count() < 2 {
            return PlatformPlan::empty();
        }
        let mut rng = RandomStream::new(seed);
        self.generate_with(curve, &mut rng)
    }

    /// Generates a plan drawing from an existing stream.
    pub fn generate_with(&self, curve: &dyn Curve, rng: &mut RandomStream) -> PlatformPlan {
        if curve.point_count() < 2 || self.settings.max_platforms == 0 {
            return PlatformPlan::empty();
        }
        if !self.constraints.is_usable() {
            tracing::warn!(
                "Unusable jump constraints {:?}, no platforms generated",
                self.constraints
            );
            return PlatformPlan::empty();
        }
        let length = curve.length();
        if !length.is_finite() {
            tracing::warn!("Curve length {} is not finite, no platforms generated", length);
            return PlatformPlan::empty();
        }

        let mut builder =
            PlanBuilder::new(self.estimate_count(length), self.settings.max_platforms);

        let start = curve.position_at(0.0);
        builder.push(
            Transform::new(start, Quaternion::from_direction(curve.direction_at(0.0)), Vec3::ONE),
            Some(0.0),
            PlatformRole::Start,
        );

        let mut current = 0.0;
        let mut last = start;
        let mut repairs = 0usize;

        while current < length && !builder.is_full() {
            let target_distance = (current + self.next_stride(rng)).min(length);
            let target = curve.position_at(target_distance);
            let rotation = Quaternion::from_direction(curve.direction_at(target_distance));

            if self.constraints.is_jump_valid(last, target) {
                let scale = self.footprint_scale(rng);
                builder.push(
                    Transform::new(target, rotation, scale),
                    Some(target_distance),
                    PlatformRole::Stride,
                );
            } else {
                repairs += 1;
                self.repair(
                    &mut builder,
                    rng,
                    last,
                    Transform::new(target, rotation, Vec3::ONE),
                    target_distance,
                );
            }

            last = builder.last_position().unwrap_or(target);
            current = target_distance;
        }

        let plan = PlatformPlan {
            platforms: builder.platforms,
            seed: rng.seed(),
        };

        tracing::info!(
            "Generated {} platforms over {:.0} units ({} repairs, seed {})",
            plan.len(),
            length,
            repairs,
            plan.seed
        );

        plan
    }

    /// Arc length to the next platform.
    fn next_stride(&self, rng: &mut RandomStream) -> f64 {
        let safe = self.constraints.safe_distance();
        let variation = self.settings.effective_variation();

        let mut stride = safe;
        if self.settings.allow_variation {
            stride *= 1.0 + rng.frand_range(-variation, variation);
        }
        stride.max(safe * MIN_STRIDE_FRACTION)
    }

    /// Isotropic footprint scale for a regular stride platform.
    fn footprint_scale(&self, rng: &mut RandomStream) -> Vec3 {
        if !self.settings.allow_variation {
            return Vec3::ONE;
        }
        let half = self.settings.effective_variation() * 0.5;
        let s = 1.0 + rng.frand_range(-half, half);
        Vec3::new(s, s, 1.0)
    }

    /// Number of intermediates needed so every hop from `from` to `to` is
    /// valid.
    fn intermediate_count(&self, diff: Vec3) -> f64 {
        let safe_distance = self.constraints.safe_distance();
        let safe_height = self.constraints.safe_height();
        let max_drop = self.constraints.max_safe_drop();

        let horizontal = diff.planar_length();
        let mut count: f64 = 1.0;

        if horizontal > safe_distance {
            count = count.max((horizontal / safe_distance).ceil());
        }
        if diff.z > safe_height {
            count = count.max((diff.z / safe_height).ceil());
        }
        if -diff.z > max_drop {
            count = count.max((-diff.z / max_drop).ceil());
        }
        count
    }

    /// Largest sideways nudge that keeps two neighbouring intermediates,
    /// `step` apart along the segment, within jump range of each other.
    fn lateral_offset_limit(&self, step: f64) -> f64 {
        let safe = self.constraints.safe_distance();
        let slack = (safe * safe - step * step).max(0.0).sqrt() * 0.5;
        (self.settings.dimensions.width * 0.5).min(slack).max(0.0)
    }

    /// Positions that split the jump `from -> to` into valid hops, in order,
    /// excluding `to` itself.
    ///
    /// The points are evenly spaced on the straight segment at `i / (n + 1)`.
    /// With variation enabled and more than one point, each is nudged
    /// sideways by a bounded amount. Always at least one point unless the
    /// platform cap is zero; never more than the cap.
    pub fn bridge(&self, from: Vec3, to: Vec3, rng: &mut RandomStream) -> Vec<Vec3> {
        let diff = to - from;
        let count = self.intermediate_count(diff);
        let divisions = count + 1.0;

        let jitter = self.settings.allow_variation && count > 1.0;
        let side = diff.cross(Vec3::UP).normalize_or_zero();
        let max_offset = self.lateral_offset_limit(diff.planar_length() / divisions);

        tracing::debug!(
            "Bridging jump {:?} -> {:?} with {} intermediates",
            from,
            to,
            count
        );

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = (count as usize).min(self.settings.max_platforms);
        (1..=n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let mut position = from.lerp(to, i as f64 / divisions);
                if jitter {
                    position += side * rng.frand_range(-max_offset, max_offset);
                }
                position
            })
            .collect()
    }

    /// Replaces the unreachable jump `from -> target` with a bridge of
    /// intermediates sharing the target's facing, then the target itself.
    fn repair(
        &self,
        builder: &mut PlanBuilder,
        rng: &mut RandomStream,
        from: Vec3,
        target: Transform,
        target_distance: f64,
    ) {
        for position in self.bridge(from, target.position, rng) {
            let pushed = builder.push(
                Transform::new(position, target.rotation, Vec3::ONE),
                None,
                PlatformRole::Intermediate,
            );
            if !pushed {
                return;
            }
        }

        builder.push(target, Some(target_distance), PlatformRole::RepairTarget);
    }
}
