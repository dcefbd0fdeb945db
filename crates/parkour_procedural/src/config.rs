//! # Generator Settings
//!
//! Every knob of a scene in one TOML document. Missing sections and fields
//! fall back to defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! [jump]
//! preset = "athletic"
//! safety_margin = 0.9
//!
//! [platforms]
//! max_platforms = 80
//! variation = 0.2
//!
//! [environment]
//! style = "industrial"
//! density = 0.7
//!
//! [area.shape]
//! kind = "l_shape"
//! arm_width = 2000.0
//!
//! [seeds]
//! path = 42
//! environment = 7
//! ```
//!
//! Loading runs two passes: [`GeneratorSettings::validate`] rejects values
//! that cannot be repaired (non-finite numbers, polygons with fewer than
//! three vertices), then [`GeneratorSettings::sanitized`] clamps everything
//! else into the ranges a designer can pick from.

use std::path::Path;

use serde::{Deserialize, Serialize};

use parkour_shared::constants::{DEFAULT_L_ARM_WIDTH, DEFAULT_U_ARM_WIDTH};
use parkour_shared::{
    Vec3, DEFAULT_AREA_DIMENSIONS, DEFAULT_MAX_JUMP_DISTANCE, DEFAULT_MAX_JUMP_HEIGHT,
    DEFAULT_SAFETY_MARGIN,
};

use crate::area::{AreaModel, AreaShape};
use crate::environment::{EnvironmentPlacementEngine, EnvironmentSettings};
use crate::error::{GeneratorError, GeneratorResult};
use crate::jump::{JumpConstraints, JumpPreset};
use crate::platform::{PlacementSettings, PlatformPlacementEngine};

/// Smallest area dimension or arm width.
const MIN_AREA_EXTENT: f64 = 100.0;
/// Largest area extent on any axis.
const MAX_AREA_EXTENT: f64 = 100_000.0;
/// Smallest building dimension.
const MIN_BUILDING_EXTENT: f64 = 100.0;
/// Fewest platforms a path may be asked for.
const MIN_PLATFORM_COUNT: usize = 2;

/// Jump section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpSettings {
    /// Named profile; overrides the explicit limits when set.
    pub preset: Option<JumpPreset>,
    /// Maximum climb.
    pub max_height: f64,
    /// Maximum planar distance.
    pub max_distance: f64,
    /// Fraction of the limits used for planning.
    pub safety_margin: f64,
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self {
            preset: None,
            max_height: DEFAULT_MAX_JUMP_HEIGHT,
            max_distance: DEFAULT_MAX_JUMP_DISTANCE,
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }
}

impl JumpSettings {
    /// The jump model these settings describe.
    #[must_use]
    pub const fn constraints(&self) -> JumpConstraints {
        match self.preset {
            Some(preset) => JumpConstraints::from_preset(preset, self.safety_margin),
            None => JumpConstraints::new(self.max_height, self.max_distance, self.safety_margin),
        }
    }
}

/// Area section: size and footprint of spawned play areas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaSettings {
    /// Length, width, height.
    pub dimensions: Vec3,
    /// Footprint.
    pub shape: AreaShape,
}

impl Default for AreaSettings {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_AREA_DIMENSIONS,
            shape: AreaShape::Box,
        }
    }
}

/// Seeds; `0` draws a fresh seed on every generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    /// Seed of spawned paths.
    pub path: u64,
    /// Seed of spawned play areas.
    pub environment: u64,
}

/// Complete generator configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Jump model.
    pub jump: JumpSettings,
    /// Platform placement.
    pub platforms: PlacementSettings,
    /// Environment placement.
    pub environment: EnvironmentSettings,
    /// Play area shape.
    pub area: AreaSettings,
    /// Seeds.
    pub seeds: SeedSettings,
}

impl GeneratorSettings {
    /// Parses, validates and sanitizes a TOML document.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Parse`] for malformed TOML, or
    /// [`GeneratorError::InvalidConfig`] when [`Self::validate`] fails.
    pub fn from_toml_str(text: &str) -> GeneratorResult<Self> {
        let settings: Self =
            toml::from_str(text).map_err(|e| GeneratorError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings.sanitized())
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Io`] when the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> GeneratorResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| GeneratorError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let settings = Self::from_toml_str(&text)?;
        tracing::info!("Loaded generator settings from {}", path.display());
        Ok(settings)
    }

    /// Settings with a named jump profile.
    #[must_use]
    pub fn with_preset(preset: JumpPreset) -> Self {
        let mut settings = Self::default();
        settings.jump.preset = Some(preset);
        settings
    }

    /// Rejects values no clamp can repair.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> GeneratorResult<()> {
        let scalars = [
            ("jump.max_height", self.jump.max_height),
            ("jump.max_distance", self.jump.max_distance),
            ("jump.safety_margin", self.jump.safety_margin),
            ("platforms.variation", self.platforms.variation),
            ("platforms.dimensions.width", self.platforms.dimensions.width),
            ("platforms.dimensions.depth", self.platforms.dimensions.depth),
            ("platforms.dimensions.thickness", self.platforms.dimensions.thickness),
            ("environment.density", self.environment.density),
            ("environment.path_clearance", self.environment.path_clearance),
            ("environment.floor_offset", self.environment.floor_offset),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(GeneratorError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        let vectors = [
            ("environment.min_building_size", self.environment.min_building_size),
            ("environment.max_building_size", self.environment.max_building_size),
            ("area.dimensions", self.area.dimensions),
        ];
        for (name, value) in vectors {
            if !value.is_finite() {
                return Err(GeneratorError::InvalidConfig(format!(
                    "{name} must be finite, got {value:?}"
                )));
            }
        }

        match &self.area.shape {
            AreaShape::Box => {}
            AreaShape::LShape { arm_width } | AreaShape::UShape { arm_width } => {
                if !arm_width.is_finite() {
                    return Err(GeneratorError::InvalidConfig(format!(
                        "area.shape.arm_width must be finite, got {arm_width}"
                    )));
                }
            }
            AreaShape::Custom { polygon } => {
                if polygon.len() < 3 {
                    return Err(GeneratorError::InvalidConfig(format!(
                        "custom area polygon needs at least 3 vertices, got {}",
                        polygon.len()
                    )));
                }
                if polygon.iter().any(|v| !(v.x.is_finite() && v.y.is_finite())) {
                    return Err(GeneratorError::InvalidConfig(
                        "custom area polygon has a non-finite vertex".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Copy with every value clamped into its designer range.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();

        s.jump.max_height = s.jump.max_height.clamp(50.0, 1000.0);
        s.jump.max_distance = s.jump.max_distance.clamp(100.0, 2000.0);
        s.jump.safety_margin = s.jump.safety_margin.clamp(0.5, 1.0);

        let dims = &mut s.platforms.dimensions;
        dims.width = dims.width.max(50.0);
        dims.depth = dims.depth.max(50.0);
        dims.thickness = dims.thickness.max(10.0);
        s.platforms.min_platforms = s.platforms.min_platforms.max(MIN_PLATFORM_COUNT);
        s.platforms.max_platforms = s.platforms.max_platforms.max(s.platforms.min_platforms);
        s.platforms.variation = s.platforms.variation.clamp(0.1, 0.5);

        let env = &mut s.environment;
        env.density = env.density.clamp(0.0, 1.0);
        env.path_clearance = env.path_clearance.max(100.0);
        env.min_building_size = env.min_building_size.max(Vec3::ONE * MIN_BUILDING_EXTENT);
        env.max_building_size = env.max_building_size.max(env.min_building_size);

        s.area.dimensions = s
            .area
            .dimensions
            .max(Vec3::ONE * MIN_AREA_EXTENT)
            .min(Vec3::ONE * MAX_AREA_EXTENT);
        match &mut s.area.shape {
            AreaShape::LShape { arm_width } | AreaShape::UShape { arm_width } => {
                *arm_width = arm_width.max(MIN_AREA_EXTENT);
            }
            AreaShape::Box | AreaShape::Custom { .. } => {}
        }

        s
    }

    /// Jump model.
    #[must_use]
    pub const fn jump_constraints(&self) -> JumpConstraints {
        self.jump.constraints()
    }

    /// Platform engine for these settings.
    #[must_use]
    pub const fn platform_engine(&self) -> PlatformPlacementEngine {
        PlatformPlacementEngine::new(self.jump.constraints(), self.platforms)
    }

    /// Environment engine for these settings.
    #[must_use]
    pub const fn environment_engine(&self) -> EnvironmentPlacementEngine {
        EnvironmentPlacementEngine::new(self.environment)
    }

    /// Area of the configured shape at `origin`.
    #[must_use]
    pub fn area_model(&self, origin: Vec3) -> AreaModel {
        AreaModel::new(origin, self.area.dimensions, self.area.shape.clone())
    }
}

/// L-shape with the default arm width.
#[must_use]
pub const fn default_l_shape() -> AreaShape {
    AreaShape::LShape {
        arm_width: DEFAULT_L_ARM_WIDTH,
    }
}

/// U-shape with the default arm width.
#[must_use]
pub const fn default_u_shape() -> AreaShape {
    AreaShape::UShape {
        arm_width: DEFAULT_U_ARM_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::PolylineCurve;
    use crate::environment::EnvironmentStyle;
    use crate::random::RandomStream;

    #[test]
    fn test_empty_document_is_default() {
        let settings = GeneratorSettings::from_toml_str("").unwrap();
        assert_eq!(settings, GeneratorSettings::default().sanitized());
        assert_eq!(settings.jump_constraints(), JumpConstraints::default());
    }

    #[test]
    fn test_partial_document() {
        let text = r#"
            [jump]
            preset = "athletic"
            safety_margin = 0.9

            [platforms]
            max_platforms = 80
            allow_variation = false

            [environment]
            style = "industrial"
            density = 0.7

            [area.shape]
            kind = "l_shape"
            arm_width = 1200.0

            [seeds]
            path = 42
        "#;
        let settings = GeneratorSettings::from_toml_str(text).unwrap();

        let jump = settings.jump_constraints();
        assert_eq!((jump.max_height, jump.max_distance), (250.0, 500.0));
        assert_eq!(jump.safety_margin, 0.9);
        assert_eq!(settings.platforms.max_platforms, 80);
        assert_eq!(settings.platforms.min_platforms, 5);
        assert!(!settings.platforms.allow_variation);
        assert_eq!(settings.environment.style, EnvironmentStyle::Industrial);
        assert_eq!(settings.area.shape, AreaShape::LShape { arm_width: 1200.0 });
        assert_eq!(settings.seeds.path, 42);
        assert_eq!(settings.seeds.environment, 0);
    }

    #[test]
    fn test_custom_polygon_document() {
        let text = r#"
            [area.shape]
            kind = "custom"
            polygon = [
                { x = -1000.0, y = -1000.0 },
                { x = 1000.0, y = -1000.0 },
                { x = 0.0, y = 1000.0 },
            ]
        "#;
        let settings = GeneratorSettings::from_toml_str(text).unwrap();
        let area = settings.area_model(Vec3::ZERO);
        assert!(area.contains(Vec3::new(0.0, 0.0, 0.0)));
        assert!(!area.contains(Vec3::new(900.0, 900.0, 0.0)));
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut settings = GeneratorSettings::default();
        settings.jump.max_height = 5.0;
        settings.jump.max_distance = 9000.0;
        settings.jump.safety_margin = 0.1;
        settings.platforms.min_platforms = 10;
        settings.platforms.max_platforms = 3;
        settings.platforms.variation = 0.9;
        settings.environment.density = 4.0;
        settings.environment.min_building_size = Vec3::new(10.0, 500.0, 10.0);
        settings.environment.max_building_size = Vec3::new(50.0, 400.0, 3000.0);
        settings.area.shape = AreaShape::UShape { arm_width: 1.0 };

        let s = settings.sanitized();
        assert_eq!(s.jump.max_height, 50.0);
        assert_eq!(s.jump.max_distance, 2000.0);
        assert_eq!(s.jump.safety_margin, 0.5);
        assert_eq!(s.platforms.min_platforms, 10);
        assert_eq!(s.platforms.max_platforms, 10);
        assert_eq!(s.platforms.variation, 0.5);
        assert_eq!(s.environment.density, 1.0);
        assert_eq!(s.environment.min_building_size, Vec3::new(100.0, 500.0, 100.0));
        assert_eq!(s.environment.max_building_size, Vec3::new(100.0, 500.0, 3000.0));
        assert_eq!(s.area.shape, AreaShape::UShape { arm_width: 100.0 });
    }

    #[test]
    fn test_area_size_is_capped() {
        let text = "[area]\ndimensions = { x = 1.0e9, y = 50.0, z = 2000.0 }\n";
        let settings = GeneratorSettings::from_toml_str(text).unwrap();
        assert_eq!(settings.area.dimensions, Vec3::new(100_000.0, 100.0, 2000.0));
    }

    #[test]
    fn test_fresh_seed_replays_from_settings() {
        let path = RandomStream::new(0).seed();
        let environment = RandomStream::new(0).seed();
        let text = format!("[seeds]\npath = {path}\nenvironment = {environment}\n");
        let settings = GeneratorSettings::from_toml_str(&text).unwrap();
        assert_eq!(settings.seeds, SeedSettings { path, environment });

        let curve = PolylineCurve::new(vec![Vec3::ZERO, Vec3::new(3000.0, 800.0, 300.0)]);
        let engine = settings.platform_engine();
        let first = engine.generate(&curve, settings.seeds.path);
        let replay = engine.generate(&curve, path);
        assert_eq!(first.seed(), path);
        assert_eq!(first, replay);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let err = GeneratorSettings::from_toml_str("[jump]\nmax_height = nan\n").unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidConfig(_)));

        let err = GeneratorSettings::from_toml_str("[environment]\ndensity = inf\n").unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidConfig(_)));
    }

    #[test]
    fn test_degenerate_polygon_is_rejected() {
        let mut settings = GeneratorSettings::default();
        settings.area.shape = AreaShape::Custom {
            polygon: vec![parkour_shared::Vec2::ZERO],
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_and_io_errors() {
        let err = GeneratorSettings::from_toml_str("[jump\n").unwrap_err();
        assert!(matches!(err, GeneratorError::Parse(_)));

        let err = GeneratorSettings::from_toml_str("[jump]\nmax_height = \"high\"\n").unwrap_err();
        assert!(matches!(err, GeneratorError::Parse(_)));

        let err = GeneratorSettings::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, GeneratorError::Io { .. }));
    }

    #[test]
    fn test_engines_follow_settings() {
        let settings = GeneratorSettings::with_preset(JumpPreset::Superhuman);
        assert_eq!(settings.platform_engine().constraints().max_distance, 800.0);
        assert_eq!(
            settings.environment_engine().settings(),
            &EnvironmentSettings::default()
        );
        assert_eq!(default_l_shape(), AreaShape::LShape { arm_width: 2000.0 });
        assert_eq!(default_u_shape(), AreaShape::UShape { arm_width: 1500.0 });
    }
}
