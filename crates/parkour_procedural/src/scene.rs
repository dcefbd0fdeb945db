//! # Scene
//!
//! Owns every parkour path and play area of a level and sequences their
//! generation.
//!
//! ## Ordering
//!
//! Environments avoid the platforms of their linked path, so:
//!
//! - generate: all platform plans first, then all environments
//! - clear: all environments first, then all platform plans
//!
//! A play area links to at most one path. Areas without a link (or whose
//! path has no plan yet) are generated with nothing to avoid.

use std::fmt;

use parkour_shared::{Vec3, DEFAULT_AREA_DIMENSIONS};

use crate::area::AreaModel;
use crate::config::GeneratorSettings;
use crate::curve::{Curve, PolylineCurve};
use crate::environment::{EnvironmentPlacementEngine, EnvironmentPlan, PathObstacles};
use crate::error::{GeneratorError, GeneratorResult};
use crate::export::{export_environment, export_platforms, GeometrySink, PathPreview};
use crate::platform::{PlatformPlacementEngine, PlatformPlan};

/// Control points of a freshly spawned path, relative to its location.
pub const DEFAULT_PATH_POINTS: [Vec3; 5] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(500.0, 0.0, 100.0),
    Vec3::new(1000.0, 300.0, 200.0),
    Vec3::new(1500.0, 300.0, 400.0),
    Vec3::new(2000.0, 0.0, 300.0),
];

/// Tessellation of the default path.
const DEFAULT_PATH_SUBDIVISIONS: usize = 16;

/// Handle of a path in a [`ParkourScene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(pub usize);

/// Handle of a play area in a [`ParkourScene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AreaId(pub usize);

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path#{}", self.0)
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area#{}", self.0)
    }
}

// =============================================================================
// PARKOUR PATH
// =============================================================================

/// A guide curve and the platforms generated along it.
pub struct ParkourPath {
    curve: Box<dyn Curve>,
    engine: PlatformPlacementEngine,
    seed: u64,
    plan: PlatformPlan,
}

impl fmt::Debug for ParkourPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParkourPath")
            .field("curve_points", &self.curve.point_count())
            .field("curve_length", &self.curve.length())
            .field("engine", &self.engine)
            .field("seed", &self.seed)
            .field("platforms", &self.plan.len())
            .finish()
    }
}

impl ParkourPath {
    /// Creates a path over `curve` with no plan yet.
    #[must_use]
    pub fn new(curve: Box<dyn Curve>, engine: PlatformPlacementEngine, seed: u64) -> Self {
        Self {
            curve,
            engine,
            seed,
            plan: PlatformPlan::empty(),
        }
    }

    /// Creates a path over the default five-point curve placed at `location`.
    #[must_use]
    pub fn with_default_curve(location: Vec3, engine: PlatformPlacementEngine, seed: u64) -> Self {
        let control = DEFAULT_PATH_POINTS.map(|p| p + location);
        let curve = PolylineCurve::catmull_rom(&control, DEFAULT_PATH_SUBDIVISIONS);
        Self::new(Box::new(curve), engine, seed)
    }

    /// The guide curve.
    #[must_use]
    pub fn curve(&self) -> &dyn Curve {
        self.curve.as_ref()
    }

    /// The placement engine.
    #[must_use]
    pub const fn engine(&self) -> &PlatformPlacementEngine {
        &self.engine
    }

    /// Replaces the placement engine. The current plan is kept until the
    /// next generate.
    pub fn set_engine(&mut self, engine: PlatformPlacementEngine) {
        self.engine = engine;
    }

    /// Configured seed (`0` = fresh seed on each generate).
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Changes the seed.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Current plan; empty until generated.
    #[must_use]
    pub const fn plan(&self) -> &PlatformPlan {
        &self.plan
    }

    /// Replaces the plan with a fresh one.
    pub fn generate(&mut self) -> &PlatformPlan {
        self.clear();
        self.plan = self.engine.generate(self.curve.as_ref(), self.seed);
        &self.plan
    }

    /// Drops the plan.
    pub fn clear(&mut self) {
        if !self.plan.is_empty() {
            tracing::info!("Cleared {} platforms", self.plan.len());
        }
        self.plan = PlatformPlan::empty();
    }

    /// Computes a plan without storing it and returns its overlay.
    #[must_use]
    pub fn preview(&self) -> PathPreview {
        let plan = self.engine.generate(self.curve.as_ref(), self.seed);
        PathPreview::from_plan(
            &plan,
            &self.engine.settings().dimensions,
            self.engine.constraints(),
        )
    }

    /// Indices of invalid jumps in the current plan.
    #[must_use]
    pub fn validate(&self) -> Vec<usize> {
        self.plan.invalid_jumps(self.engine.constraints())
    }

    /// What an environment around this path has to keep clear of.
    #[must_use]
    pub fn obstacles(&self) -> PathObstacles {
        PathObstacles::from_path(self.curve.as_ref(), &self.plan)
    }

    /// Sends the current plan to `sink`.
    pub fn export<S: GeometrySink + ?Sized>(&self, sink: &mut S) {
        export_platforms(&self.plan, &self.engine.settings().dimensions, sink);
    }
}

// =============================================================================
// PLAY AREA
// =============================================================================

/// A bounded region and the environment generated inside it.
#[derive(Clone, Debug)]
pub struct PlayArea {
    model: AreaModel,
    engine: EnvironmentPlacementEngine,
    seed: u64,
    plan: EnvironmentPlan,
    linked_path: Option<PathId>,
}

impl PlayArea {
    /// Creates an area with no environment and no linked path.
    #[must_use]
    pub fn new(model: AreaModel, engine: EnvironmentPlacementEngine, seed: u64) -> Self {
        Self {
            model,
            engine,
            seed,
            plan: EnvironmentPlan::empty(),
            linked_path: None,
        }
    }

    /// The area shape.
    #[must_use]
    pub const fn model(&self) -> &AreaModel {
        &self.model
    }

    /// The placement engine.
    #[must_use]
    pub const fn engine(&self) -> &EnvironmentPlacementEngine {
        &self.engine
    }

    /// Replaces the placement engine.
    pub fn set_engine(&mut self, engine: EnvironmentPlacementEngine) {
        self.engine = engine;
    }

    /// Configured seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Changes the seed.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Current environment; empty until generated.
    #[must_use]
    pub const fn plan(&self) -> &EnvironmentPlan {
        &self.plan
    }

    /// The path this area keeps clear of.
    #[must_use]
    pub const fn linked_path(&self) -> Option<PathId> {
        self.linked_path
    }

    /// Replaces the environment, keeping clear of `path` if given.
    pub fn generate_environment(&mut self, path: Option<&ParkourPath>) -> &EnvironmentPlan {
        self.clear_environment();
        let obstacles = path.map_or_else(PathObstacles::none, ParkourPath::obstacles);
        self.plan = self.engine.generate(&self.model, &obstacles, self.seed);
        &self.plan
    }

    /// Drops the environment.
    pub fn clear_environment(&mut self) {
        if !self.plan.is_empty() {
            tracing::info!(
                "Cleared {} buildings (floor: {})",
                self.plan.buildings().len(),
                self.plan.floor().is_some()
            );
        }
        self.plan = EnvironmentPlan::empty();
    }

    /// Sends the current environment to `sink`.
    pub fn export<S: GeometrySink + ?Sized>(&self, sink: &mut S) {
        export_environment(&self.plan, sink);
    }
}

// =============================================================================
// SCENE
// =============================================================================

/// Registry of paths and play areas.
#[derive(Debug, Default)]
pub struct ParkourScene {
    settings: GeneratorSettings,
    paths: Vec<ParkourPath>,
    areas: Vec<PlayArea>,
}

impl ParkourScene {
    /// Creates an empty scene; spawned entities use `settings`.
    #[must_use]
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            paths: Vec::new(),
            areas: Vec::new(),
        }
    }

    /// Settings used for spawning.
    #[must_use]
    pub const fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Adds an existing path.
    pub fn add_path(&mut self, path: ParkourPath) -> PathId {
        let id = PathId(self.paths.len());
        self.paths.push(path);
        id
    }

    /// Adds an existing area.
    pub fn add_area(&mut self, area: PlayArea) -> AreaId {
        let id = AreaId(self.areas.len());
        self.areas.push(area);
        id
    }

    /// Spawns a path on the default curve at `location`.
    pub fn spawn_path(&mut self, location: Vec3) -> PathId {
        let path = ParkourPath::with_default_curve(
            location,
            self.settings.platform_engine(),
            self.settings.seeds.path,
        );
        let id = self.add_path(path);
        tracing::info!("Spawned parkour path {} at {:?}", id, location);
        id
    }

    /// Spawns a play area of the configured shape at `location`.
    pub fn spawn_area(&mut self, location: Vec3, dimensions: Vec3) -> AreaId {
        let mut model = self.settings.area_model(location);
        model.set_dimensions(dimensions);
        let area = PlayArea::new(
            model,
            self.settings.environment_engine(),
            self.settings.seeds.environment,
        );
        let id = self.add_area(area);
        tracing::info!(
            "Spawned play area {} at {:?} with dimensions {:?}",
            id,
            location,
            dimensions
        );
        id
    }

    /// Spawns a default-size area and a path at the same spot, linked.
    pub fn spawn_complete_setup(&mut self, location: Vec3) -> (PathId, AreaId) {
        let area = self.spawn_area(location, DEFAULT_AREA_DIMENSIONS);
        let path = self.spawn_path(location);
        self.areas[area.0].linked_path = Some(path);
        tracing::info!("Spawned complete parkour setup ({}, {})", path, area);
        (path, area)
    }

    /// Makes `area` keep clear of `path`.
    ///
    /// # Errors
    ///
    /// Unknown path or area id.
    pub fn link(&mut self, area: AreaId, path: PathId) -> GeneratorResult<()> {
        self.path(path)?;
        self.area_mut(area)?.linked_path = Some(path);
        Ok(())
    }

    /// Removes the path link of `area`.
    ///
    /// # Errors
    ///
    /// Unknown area id.
    pub fn unlink(&mut self, area: AreaId) -> GeneratorResult<()> {
        self.area_mut(area)?.linked_path = None;
        Ok(())
    }

    /// Looks up a path.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::UnknownPath`].
    pub fn path(&self, id: PathId) -> GeneratorResult<&ParkourPath> {
        self.paths.get(id.0).ok_or(GeneratorError::UnknownPath(id.0))
    }

    /// Looks up a path for editing.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::UnknownPath`].
    pub fn path_mut(&mut self, id: PathId) -> GeneratorResult<&mut ParkourPath> {
        self.paths.get_mut(id.0).ok_or(GeneratorError::UnknownPath(id.0))
    }

    /// Looks up an area.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::UnknownArea`].
    pub fn area(&self, id: AreaId) -> GeneratorResult<&PlayArea> {
        self.areas.get(id.0).ok_or(GeneratorError::UnknownArea(id.0))
    }

    /// Looks up an area for editing.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::UnknownArea`].
    pub fn area_mut(&mut self, id: AreaId) -> GeneratorResult<&mut PlayArea> {
        self.areas.get_mut(id.0).ok_or(GeneratorError::UnknownArea(id.0))
    }

    /// All paths with their ids.
    pub fn paths(&self) -> impl Iterator<Item = (PathId, &ParkourPath)> {
        self.paths.iter().enumerate().map(|(i, p)| (PathId(i), p))
    }

    /// All areas with their ids.
    pub fn areas(&self) -> impl Iterator<Item = (AreaId, &PlayArea)> {
        self.areas.iter().enumerate().map(|(i, a)| (AreaId(i), a))
    }

    /// Number of paths.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Number of areas.
    #[must_use]
    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    /// Generates every path; returns the total platform count.
    pub fn generate_all_paths(&mut self) -> usize {
        self.paths.iter_mut().map(|p| p.generate().len()).sum()
    }

    /// Clears every path.
    pub fn clear_all_paths(&mut self) {
        for path in &mut self.paths {
            path.clear();
        }
    }

    /// Generates every environment against the current path plans; returns
    /// the total building count.
    pub fn generate_all_environments(&mut self) -> usize {
        let paths = &self.paths;
        self.areas
            .iter_mut()
            .map(|area| {
                let path = area.linked_path.and_then(|id| paths.get(id.0));
                area.generate_environment(path).buildings().len()
            })
            .sum()
    }

    /// Clears every environment.
    pub fn clear_all_environments(&mut self) {
        for area in &mut self.areas {
            area.clear_environment();
        }
    }

    /// Paths, then environments.
    pub fn generate_everything(&mut self) {
        let platforms = self.generate_all_paths();
        let buildings = self.generate_all_environments();
        tracing::info!(
            "Generated scene: {} platforms on {} paths, {} buildings in {} areas",
            platforms,
            self.paths.len(),
            buildings,
            self.areas.len()
        );
    }

    /// Environments, then paths.
    pub fn clear_everything(&mut self) {
        self.clear_all_environments();
        self.clear_all_paths();
    }

    /// Generates the linked path of `id` (if any), then its environment.
    ///
    /// # Errors
    ///
    /// Unknown area id.
    pub fn generate_area(&mut self, id: AreaId) -> GeneratorResult<()> {
        let linked = self.area(id)?.linked_path;
        if let Some(path_id) = linked {
            self.path_mut(path_id)?.generate();
        }
        let path = linked.and_then(|p| self.paths.get(p.0));
        self.areas[id.0].generate_environment(path);
        Ok(())
    }

    /// Clears the environment of `id`, then its linked path (if any).
    ///
    /// # Errors
    ///
    /// Unknown area id.
    pub fn clear_area(&mut self, id: AreaId) -> GeneratorResult<()> {
        let area = self.area_mut(id)?;
        area.clear_environment();
        let linked = area.linked_path;
        if let Some(path_id) = linked {
            self.path_mut(path_id)?.clear();
        }
        Ok(())
    }

    /// Indices of invalid jumps on a path.
    ///
    /// # Errors
    ///
    /// Unknown path id.
    pub fn validate_path(&self, id: PathId) -> GeneratorResult<Vec<usize>> {
        Ok(self.path(id)?.validate())
    }

    /// Preview of a path without touching its plan.
    ///
    /// # Errors
    ///
    /// Unknown path id.
    pub fn preview_path(&self, id: PathId) -> GeneratorResult<PathPreview> {
        Ok(self.path(id)?.preview())
    }

    /// Sends every plan to `sink`: all paths, then all areas.
    pub fn export<S: GeometrySink + ?Sized>(&self, sink: &mut S) {
        for path in &self.paths {
            path.export(sink);
        }
        for area in &self.areas {
            area.export(sink);
        }
    }
}
