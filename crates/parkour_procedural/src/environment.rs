//! # Environment Placement
//!
//! Fills a play area with buildings while keeping the parkour path clear.
//!
//! ## Styles
//!
//! | Style      | Layout        | Cell            | Accept          | Jitter    |
//! |------------|---------------|-----------------|-----------------|-----------|
//! | Urban      | grid          | 1.5 × max size  | `density`       | 0.5 cell  |
//! | Industrial | grid          | 2.0 × max size  | `0.8 × density` | 0.3 cell  |
//! | Abstract   | random points | -               | `ceil(30 × density)` tries | - |
//! | None       | nothing       | -               | -               | -         |
//!
//! A candidate is dropped (never retried) when it falls outside the area or
//! when its footprint comes within the path clearance of a path sample or a
//! platform.

use serde::{Deserialize, Serialize};

use parkour_shared::constants::{
    DEFAULT_MAX_BUILDING_SIZE, DEFAULT_MIN_BUILDING_SIZE, PATH_SAMPLE_STEP,
};
use parkour_shared::{Vec2, Vec3, DEFAULT_BUILDING_DENSITY, DEFAULT_PATH_CLEARANCE};

use crate::area::AreaModel;
use crate::curve::Curve;
use crate::platform::PlatformPlan;
use crate::random::RandomStream;

/// Candidate count of the abstract style at full density.
const ABSTRACT_BLOCKS_AT_FULL_DENSITY: f64 = 30.0;
/// Upper bound on grid cells visited by one scatter pass.
pub const MAX_GRID_CELLS: usize = 1_000_000;

/// Environment look.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentStyle {
    /// Tall blocks on a loose grid.
    #[default]
    Urban,
    /// Wide, low structures on a sparser grid.
    Industrial,
    /// Blocks of any proportion scattered at random points.
    Abstract,
    /// No buildings.
    None,
}

/// Grid parameters of the grid styles.
#[derive(Clone, Copy, Debug, PartialEq)]
struct GridLayout {
    cell_factor: f64,
    density_factor: f64,
    jitter: f64,
}

impl EnvironmentStyle {
    /// Short name for logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Urban => "urban",
            Self::Industrial => "industrial",
            Self::Abstract => "abstract",
            Self::None => "none",
        }
    }

    const fn grid_layout(self) -> Option<GridLayout> {
        match self {
            Self::Urban => Some(GridLayout {
                cell_factor: 1.5,
                density_factor: 1.0,
                jitter: 0.5,
            }),
            Self::Industrial => Some(GridLayout {
                cell_factor: 2.0,
                density_factor: 0.8,
                jitter: 0.3,
            }),
            Self::Abstract | Self::None => None,
        }
    }

    /// Building size range `(low, high)` for this style.
    #[must_use]
    pub fn size_range(self, min: Vec3, max: Vec3) -> (Vec3, Vec3) {
        match self {
            Self::Urban | Self::None => (min, max),
            Self::Industrial => (
                Vec3::new(min.x * 1.5, min.y * 1.5, min.z * 0.5),
                Vec3::new(max.x * 1.5, max.y * 1.5, max.z * 0.6),
            ),
            Self::Abstract => (
                Vec3::new(min.x * 0.5, min.y * 0.5, min.z * 0.3),
                Vec3::new(max.x, max.y, max.z * 1.2),
            ),
        }
    }
}

/// Environment knobs of one play area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    /// Look of the environment.
    pub style: EnvironmentStyle,
    /// Building density in `[0, 1]`.
    pub density: f64,
    /// Smallest building (length, width, height).
    pub min_building_size: Vec3,
    /// Largest building (length, width, height).
    pub max_building_size: Vec3,
    /// Minimum free ground between the path and any building footprint.
    pub path_clearance: f64,
    /// Emit a floor under the area.
    pub generate_floor: bool,
    /// How far below the area origin the floor sits.
    pub floor_offset: f64,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            style: EnvironmentStyle::Urban,
            density: DEFAULT_BUILDING_DENSITY,
            min_building_size: DEFAULT_MIN_BUILDING_SIZE,
            max_building_size: DEFAULT_MAX_BUILDING_SIZE,
            path_clearance: DEFAULT_PATH_CLEARANCE,
            generate_floor: true,
            floor_offset: 0.0,
        }
    }
}

/// A placed building. Its position is the centre of its base.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Building {
    /// Ordinal in the plan.
    pub index: usize,
    /// Base centre.
    pub position: Vec3,
    /// Length, width, height.
    pub size: Vec3,
}

/// A flat rectangle under the play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorPlan {
    /// Centre of the rectangle.
    pub center: Vec3,
    /// Half length and half width.
    pub half_extents: Vec2,
}

/// Where candidates went during a scatter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScatterStats {
    /// Candidates that passed the density roll.
    pub candidates: usize,
    /// Dropped for lying outside the area.
    pub outside_area: usize,
    /// Dropped for crowding the path.
    pub blocked_by_path: usize,
}

/// Generated environment of one play area.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvironmentPlan {
    floor: Option<FloorPlan>,
    buildings: Vec<Building>,
    style: EnvironmentStyle,
    seed: u64,
    stats: ScatterStats,
}

impl EnvironmentPlan {
    /// An empty plan: no floor, no buildings.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The floor, if one was requested.
    #[must_use]
    pub const fn floor(&self) -> Option<&FloorPlan> {
        self.floor.as_ref()
    }

    /// Buildings in placement order.
    #[must_use]
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Style the plan was generated with.
    #[must_use]
    pub const fn style(&self) -> EnvironmentStyle {
        self.style
    }

    /// Seed the plan was generated with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Candidate bookkeeping of the scatter.
    #[must_use]
    pub const fn stats(&self) -> &ScatterStats {
        &self.stats
    }

    /// True when there is neither a floor nor a building.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floor.is_none() && self.buildings.is_empty()
    }
}

/// Points buildings must keep clear of: curve samples and platform centres.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathObstacles {
    points: Vec<Vec3>,
}

impl PathObstacles {
    /// No path at all; nothing blocks placement.
    #[must_use]
    pub const fn none() -> Self {
        Self { points: Vec::new() }
    }

    /// Obstacles of a generated path.
    #[must_use]
    pub fn from_path(curve: &dyn Curve, plan: &PlatformPlan) -> Self {
        let mut points = curve.sample_points(PATH_SAMPLE_STEP);
        points.extend(plan.iter().map(|p| p.position()));
        Self { points }
    }

    /// Obstacles from raw points.
    #[must_use]
    pub const fn from_points(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Obstacle points.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// True when a building of `size` at `position` keeps `clearance` from
    /// every obstacle, measured in the ground plane.
    #[must_use]
    pub fn is_clear(&self, position: Vec3, size: Vec3, clearance: f64) -> bool {
        let reach = clearance + size.x.max(size.y) * 0.5;
        self.points
            .iter()
            .all(|p| position.planar_distance(*p) >= reach)
    }
}

/// Scatters buildings over a play area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnvironmentPlacementEngine {
    settings: EnvironmentSettings,
}

impl EnvironmentPlacementEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new(settings: EnvironmentSettings) -> Self {
        Self { settings }
    }

    /// Settings in use.
    #[must_use]
    pub const fn settings(&self) -> &EnvironmentSettings {
        &self.settings
    }

    /// Generates with a fresh stream from `seed` (`0` = self-seed).
    #[must_use]
    pub fn generate(&self, area: &AreaModel, obstacles: &PathObstacles, seed: u64) -> EnvironmentPlan {
        let mut rng = RandomStream::new(seed);
        self.generate_with(area, obstacles, &mut rng)
    }

    /// Generates drawing from an existing stream.
    pub fn generate_with(
        &self,
        area: &AreaModel,
        obstacles: &PathObstacles,
        rng: &mut RandomStream,
    ) -> EnvironmentPlan {
        let style = self.settings.style;
        let mut plan = EnvironmentPlan {
            floor: self.floor(area),
            buildings: Vec::new(),
            style,
            seed: rng.seed(),
            stats: ScatterStats::default(),
        };

        match style.grid_layout() {
            Some(layout) => self.scatter_grid(area, obstacles, rng, layout, &mut plan),
            None if style == EnvironmentStyle::Abstract => {
                self.scatter_points(area, obstacles, rng, &mut plan);
            }
            None => {}
        }

        tracing::debug!(
            "{} scatter: {} candidates, {} outside area, {} blocked by path",
            style.name(),
            plan.stats.candidates,
            plan.stats.outside_area,
            plan.stats.blocked_by_path
        );
        tracing::info!(
            "Generated {} {} buildings (floor: {}, seed {})",
            plan.buildings.len(),
            style.name(),
            plan.floor.is_some(),
            plan.seed
        );

        plan
    }

    fn floor(&self, area: &AreaModel) -> Option<FloorPlan> {
        if !self.settings.generate_floor {
            return None;
        }
        let dims = area.dimensions();
        Some(FloorPlan {
            center: area.origin() - Vec3::new(0.0, 0.0, self.settings.floor_offset),
            half_extents: Vec2::new(dims.x * 0.5, dims.y * 0.5),
        })
    }

    fn density(&self) -> f64 {
        if self.settings.density.is_finite() {
            self.settings.density.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Draws a size, then places the building unless it crowds the path.
    fn try_place(
        &self,
        position: Vec3,
        obstacles: &PathObstacles,
        rng: &mut RandomStream,
        plan: &mut EnvironmentPlan,
    ) {
        let (low, high) = plan
            .style
            .size_range(self.settings.min_building_size, self.settings.max_building_size);
        let size = Vec3::new(
            rng.frand_range(low.x, high.x),
            rng.frand_range(low.y, high.y),
            rng.frand_range(low.z, high.z),
        );

        if !obstacles.is_clear(position, size, self.settings.path_clearance) {
            plan.stats.blocked_by_path += 1;
            return;
        }

        plan.buildings.push(Building {
            index: plan.buildings.len(),
            position,
            size,
        });
    }

    fn scatter_grid(
        &self,
        area: &AreaModel,
        obstacles: &PathObstacles,
        rng: &mut RandomStream,
        layout: GridLayout,
        plan: &mut EnvironmentPlan,
    ) {
        let max = self.settings.max_building_size;
        let cell = max.x.max(max.y) * layout.cell_factor;
        let bounds = area.bounds();
        let extent = bounds.size();

        if !(cell > 0.0 && cell.is_finite() && extent.is_finite()) {
            tracing::warn!("Grid cell size {} is unusable, no buildings placed", cell);
            return;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (cells_x, cells_y) = (
            (extent.x.max(0.0) / cell).ceil() as usize,
            (extent.y.max(0.0) / cell).ceil() as usize,
        );
        if cells_x.saturating_mul(cells_y) > MAX_GRID_CELLS {
            tracing::warn!(
                "Grid of {}x{} cells exceeds the {} cell limit, no buildings placed",
                cells_x,
                cells_y,
                MAX_GRID_CELLS
            );
            return;
        }
        let accept = self.density() * layout.density_factor;

        for gx in 0..cells_x {
            for gy in 0..cells_y {
                if !rng.chance(accept) {
                    continue;
                }
                plan.stats.candidates += 1;

                #[allow(clippy::cast_precision_loss)]
                let cell_origin = Vec3::new(
                    bounds.min.x + gx as f64 * cell,
                    bounds.min.y + gy as f64 * cell,
                    area.origin().z,
                );
                let position = cell_origin
                    + Vec3::new(
                        rng.frand_range(0.0, cell * layout.jitter),
                        rng.frand_range(0.0, cell * layout.jitter),
                        0.0,
                    );

                if !area.contains(position) {
                    plan.stats.outside_area += 1;
                    continue;
                }

                self.try_place(position, obstacles, rng, plan);
            }
        }
    }

    fn scatter_points(
        &self,
        area: &AreaModel,
        obstacles: &PathObstacles,
        rng: &mut RandomStream,
        plan: &mut EnvironmentPlan,
    ) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = (self.density() * ABSTRACT_BLOCKS_AT_FULL_DENSITY).ceil() as usize;

        for _ in 0..count {
            plan.stats.candidates += 1;
            let position = area.random_point(rng);

            if !area.contains(position) {
                plan.stats.outside_area += 1;
                continue;
            }

            self.try_place(position, obstacles, rng, plan);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::AreaShape;
    use crate::curve::PolylineCurve;
    use crate::jump::JumpConstraints;
    use crate::platform::{PlacementSettings, PlatformPlacementEngine};

    fn square_area() -> AreaModel {
        AreaModel::new(Vec3::ZERO, Vec3::new(5000.0, 5000.0, 2000.0), AreaShape::Box)
    }

    fn settings(style: EnvironmentStyle, density: f64) -> EnvironmentSettings {
        EnvironmentSettings {
            style,
            density,
            ..EnvironmentSettings::default()
        }
    }

    fn path_through_middle() -> (PolylineCurve, PlatformPlan) {
        let curve = PolylineCurve::new(vec![
            Vec3::new(-2500.0, 0.0, 0.0),
            Vec3::new(2500.0, 0.0, 0.0),
        ]);
        let plan = PlatformPlacementEngine::new(JumpConstraints::default(), PlacementSettings::default())
            .generate(&curve, 11);
        (curve, plan)
    }

    #[test]
    fn test_none_style_places_only_floor() {
        let engine = EnvironmentPlacementEngine::new(settings(EnvironmentStyle::None, 1.0));
        let plan = engine.generate(&square_area(), &PathObstacles::none(), 42);
        assert!(plan.buildings().is_empty());
        assert!(plan.floor().is_some());
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_floor_sits_below_origin() {
        let env = EnvironmentSettings {
            floor_offset: 25.0,
            ..settings(EnvironmentStyle::None, 0.0)
        };
        let area = AreaModel::new(
            Vec3::new(100.0, 100.0, 50.0),
            Vec3::new(4000.0, 3000.0, 1000.0),
            AreaShape::LShape { arm_width: 2000.0 },
        );
        let plan = EnvironmentPlacementEngine::new(env).generate(&area, &PathObstacles::none(), 1);
        let floor = plan.floor().copied();
        assert_eq!(
            floor,
            Some(FloorPlan {
                center: Vec3::new(100.0, 100.0, 25.0),
                half_extents: Vec2::new(2000.0, 1500.0),
            })
        );

        let no_floor = EnvironmentSettings {
            generate_floor: false,
            ..env
        };
        let plan = EnvironmentPlacementEngine::new(no_floor).generate(&area, &PathObstacles::none(), 1);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_urban_keeps_path_clear() {
        let (curve, platforms) = path_through_middle();
        let obstacles = PathObstacles::from_path(&curve, &platforms);
        // Wide enough that the whole row of cells next to the path is blocked.
        let engine = EnvironmentPlacementEngine::new(EnvironmentSettings {
            path_clearance: 1200.0,
            ..settings(EnvironmentStyle::Urban, 1.0)
        });
        let area = square_area();
        let plan = engine.generate(&area, &obstacles, 42);

        assert!(!plan.buildings().is_empty());
        assert!(plan.stats().blocked_by_path >= 3);
        for b in plan.buildings() {
            assert!(area.contains(b.position));
            let reach = 1200.0 + b.size.x.max(b.size.y) * 0.5;
            for p in platforms.iter() {
                assert!(b.position.planar_distance(p.position()) >= reach);
            }
            for s in curve.sample_points(PATH_SAMPLE_STEP) {
                assert!(b.position.planar_distance(s) >= reach);
            }
        }
    }

    #[test]
    fn test_same_seed_same_environment() {
        let (curve, platforms) = path_through_middle();
        let obstacles = PathObstacles::from_path(&curve, &platforms);
        for style in [
            EnvironmentStyle::Urban,
            EnvironmentStyle::Industrial,
            EnvironmentStyle::Abstract,
        ] {
            let engine = EnvironmentPlacementEngine::new(settings(style, 0.8));
            let a = engine.generate(&square_area(), &obstacles, 1234);
            let b = engine.generate(&square_area(), &obstacles, 1234);
            assert_eq!(a, b, "{} is not deterministic", style.name());
        }
    }

    #[test]
    fn test_zero_density_places_nothing() {
        for style in [
            EnvironmentStyle::Urban,
            EnvironmentStyle::Industrial,
            EnvironmentStyle::Abstract,
        ] {
            let engine = EnvironmentPlacementEngine::new(settings(style, 0.0));
            let plan = engine.generate(&square_area(), &PathObstacles::none(), 3);
            assert!(plan.buildings().is_empty());
            assert_eq!(plan.stats().candidates, 0);
        }
    }

    #[test]
    fn test_industrial_sizes() {
        let engine = EnvironmentPlacementEngine::new(settings(EnvironmentStyle::Industrial, 1.0));
        let plan = engine.generate(&square_area(), &PathObstacles::none(), 8);
        assert!(!plan.buildings().is_empty());
        for b in plan.buildings() {
            assert!((450.0..=1500.0).contains(&b.size.x));
            assert!((450.0..=1500.0).contains(&b.size.y));
            assert!((200.0..=1200.0).contains(&b.size.z));
        }
    }

    #[test]
    fn test_abstract_candidate_count() {
        let engine = EnvironmentPlacementEngine::new(settings(EnvironmentStyle::Abstract, 0.5));
        let plan = engine.generate(&square_area(), &PathObstacles::none(), 8);
        assert_eq!(plan.stats().candidates, 15);
        assert_eq!(plan.buildings().len(), 15);
        for (i, b) in plan.buildings().iter().enumerate() {
            assert_eq!(b.index, i);
        }
    }

    #[test]
    fn test_unusable_cell_size() {
        let env = EnvironmentSettings {
            max_building_size: Vec3::ZERO,
            ..settings(EnvironmentStyle::Urban, 1.0)
        };
        let plan = EnvironmentPlacementEngine::new(env).generate(&square_area(), &PathObstacles::none(), 8);
        assert!(plan.buildings().is_empty());
    }

    #[test]
    fn test_oversized_grid_is_skipped() {
        let area = AreaModel::new(Vec3::ZERO, Vec3::new(1.0e9, 1.0e9, 2000.0), AreaShape::Box);
        let engine = EnvironmentPlacementEngine::new(settings(EnvironmentStyle::Urban, 1.0));
        let plan = engine.generate(&area, &PathObstacles::none(), 8);
        assert!(plan.buildings().is_empty());
        assert_eq!(plan.stats().candidates, 0);
        assert!(plan.floor().is_some());
    }

    #[test]
    fn test_obstacle_clearance() {
        let obstacles = PathObstacles::from_points(vec![Vec3::ZERO]);
        let size = Vec3::new(400.0, 200.0, 1000.0);
        // 500 clearance + 200 half footprint
        assert!(!obstacles.is_clear(Vec3::new(699.0, 0.0, 0.0), size, 500.0));
        assert!(obstacles.is_clear(Vec3::new(700.0, 0.0, 5000.0), size, 500.0));
        assert!(PathObstacles::none().is_clear(Vec3::ZERO, size, 500.0));
    }
}
