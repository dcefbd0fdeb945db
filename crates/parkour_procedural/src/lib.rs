//! # Parkour Procedural Generation
//!
//! Deterministic parkour course generation: platforms a player can actually
//! jump between, laid along a guide curve, and an environment of buildings
//! that stays out of the way.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same inputs and nonzero seed, same course
//! 2. **Total**: generation never fails; degenerate input gives empty output
//! 3. **Bounded**: every pass is capped by platform count, grid size or a
//!    fixed candidate count
//! 4. **Engine-agnostic**: plans are plain data, geometry goes out through
//!    [`GeometrySink`]
//!
//! ## Core Components
//!
//! - `JumpConstraints`: what a single jump may cover
//! - `PlatformPlacementEngine`: greedy walk along a `Curve` with local repair
//! - `AreaModel`: box, L, U or polygon footprints
//! - `EnvironmentPlacementEngine`: grid and point scatter around the path
//! - `ParkourScene`: registry that sequences generation and clearing
//! - `GeneratorSettings`: TOML configuration
//!
//! ## Example
//!
//! ```rust,ignore
//! use parkour_procedural::{GeneratorSettings, ParkourScene};
//! use parkour_shared::Vec3;
//!
//! let mut scene = ParkourScene::new(GeneratorSettings::default());
//! let (path, area) = scene.spawn_complete_setup(Vec3::ZERO);
//! scene.generate_everything();
//!
//! assert!(scene.validate_path(path)?.is_empty());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod area;
pub mod config;
pub mod curve;
pub mod environment;
pub mod error;
pub mod export;
pub mod jump;
pub mod platform;
pub mod random;
pub mod scene;

pub use area::{Aabb, AreaModel, AreaShape};
pub use config::{AreaSettings, GeneratorSettings, JumpSettings, SeedSettings};
pub use curve::{Curve, PolylineCurve};
pub use environment::{
    Building, EnvironmentPlacementEngine, EnvironmentPlan, EnvironmentSettings, EnvironmentStyle,
    FloorPlan, PathObstacles, ScatterStats,
};
pub use error::{GeneratorError, GeneratorResult};
pub use export::{
    BoxGeometry, BuildingInstance, FloorInstance, GeometrySink, InstanceCollector, JumpArc,
    PathPreview, PlatformInstance, PreviewLabel,
};
pub use jump::{JumpConstraints, JumpPreset, JumpVerdict};
pub use platform::{
    PlacementSettings, Platform, PlatformDimensions, PlatformPlacementEngine, PlatformPlan,
    PlatformRole,
};
pub use random::RandomStream;
pub use scene::{AreaId, ParkourPath, ParkourScene, PathId, PlayArea};
