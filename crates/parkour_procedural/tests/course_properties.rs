//! # Course Property Tests
//!
//! Checks the guarantees every generated course must keep, across many seeds,
//! curve shapes and jump models.

use parkour_procedural::{
    AreaModel, AreaShape, Curve, EnvironmentPlacementEngine, EnvironmentSettings,
    EnvironmentStyle, GeneratorSettings, JumpConstraints, JumpPreset, ParkourScene,
    PathObstacles, PlacementSettings, PlatformPlacementEngine, PlatformRole, PolylineCurve,
};
use parkour_shared::constants::PATH_SAMPLE_STEP;
use parkour_shared::{Vec2, Vec3};

/// Curves that stress different parts of the engine.
fn test_curves() -> Vec<(&'static str, PolylineCurve)> {
    vec![
        (
            "default",
            PolylineCurve::catmull_rom(
                &[
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(500.0, 0.0, 100.0),
                    Vec3::new(1000.0, 300.0, 200.0),
                    Vec3::new(1500.0, 300.0, 400.0),
                    Vec3::new(2000.0, 0.0, 300.0),
                ],
                16,
            ),
        ),
        (
            "staircase",
            PolylineCurve::new(vec![
                Vec3::ZERO,
                Vec3::new(300.0, 0.0, 600.0),
                Vec3::new(600.0, 0.0, 1200.0),
                Vec3::new(900.0, 200.0, 1800.0),
            ]),
        ),
        (
            "cliff",
            PolylineCurve::new(vec![
                Vec3::new(0.0, 0.0, 3000.0),
                Vec3::new(200.0, 0.0, 3000.0),
                Vec3::new(400.0, 0.0, 0.0),
                Vec3::new(2000.0, 0.0, 0.0),
            ]),
        ),
        (
            "zigzag",
            PolylineCurve::new(
                (0..12)
                    .map(|i| {
                        let y = if i % 2 == 0 { 0.0 } else { 900.0 };
                        Vec3::new(f64::from(i) * 400.0, y, f64::from(i % 3) * 150.0)
                    })
                    .collect(),
            ),
        ),
    ]
}

fn jump_models() -> Vec<JumpConstraints> {
    vec![
        JumpConstraints::default(),
        JumpConstraints::from_preset(JumpPreset::Realistic, 0.85),
        JumpConstraints::from_preset(JumpPreset::Superhuman, 1.0),
        JumpConstraints::new(60.0, 150.0, 0.5),
    ]
}

fn placement(allow_variation: bool, variation: f64) -> PlacementSettings {
    PlacementSettings {
        allow_variation,
        variation,
        max_platforms: 500,
        ..PlacementSettings::default()
    }
}

/// Test: every consecutive pair of platforms is a valid jump.
#[test]
fn test_reachability() {
    for (name, curve) in test_curves() {
        for constraints in jump_models() {
            for (allow, variation) in [(false, 0.0), (true, 0.3), (true, 0.5)] {
                let engine = PlatformPlacementEngine::new(constraints, placement(allow, variation));
                for seed in 1..=20 {
                    let plan = engine.generate(&curve, seed);
                    let invalid = plan.invalid_jumps(&constraints);
                    assert!(
                        invalid.is_empty(),
                        "{name} seed {seed} {constraints:?}: invalid jumps at {invalid:?}"
                    );
                }
            }
        }
    }
}

/// Test: plans never exceed the cap, even when the curve needs more.
#[test]
fn test_bounds() {
    for (name, curve) in test_curves() {
        for cap in [1, 2, 3, 7, 20] {
            let settings = PlacementSettings {
                max_platforms: cap,
                ..placement(true, 0.3)
            };
            let engine = PlatformPlacementEngine::new(JumpConstraints::new(60.0, 150.0, 0.5), settings);
            for seed in 1..=10 {
                let len = engine.generate(&curve, seed).len();
                assert!(len <= cap, "{name}: {len} platforms over cap {cap}");
                assert!(len >= 1);
            }
        }
    }
}

/// Test: same inputs and nonzero seed give identical plans.
#[test]
fn test_determinism() {
    for (_, curve) in test_curves() {
        let engine = PlatformPlacementEngine::new(JumpConstraints::default(), placement(true, 0.4));
        for seed in [1, 42, 9999, u64::MAX] {
            assert_eq!(engine.generate(&curve, seed), engine.generate(&curve, seed));
        }
    }

    let area = AreaModel::default();
    let env = EnvironmentPlacementEngine::new(EnvironmentSettings {
        style: EnvironmentStyle::Abstract,
        density: 1.0,
        ..EnvironmentSettings::default()
    });
    assert_eq!(
        env.generate(&area, &PathObstacles::none(), 5),
        env.generate(&area, &PathObstacles::none(), 5)
    );
}

/// Test: the first platform is at the curve start and, without hitting the
/// cap, the last one is at the curve end.
#[test]
fn test_coverage() {
    for (name, curve) in test_curves() {
        let engine = PlatformPlacementEngine::new(JumpConstraints::default(), placement(true, 0.3));
        for seed in 1..=10 {
            let plan = engine.generate(&curve, seed);
            assert!(plan.len() < 500, "{name} hit the cap");

            let first = plan.first().copied();
            let last = plan.last().copied();
            assert_eq!(first.map(|p| p.role), Some(PlatformRole::Start));
            assert_eq!(first.and_then(|p| p.curve_distance), Some(0.0));
            assert_eq!(
                first.map(|p| p.position()),
                Some(curve.position_at(0.0))
            );
            assert_eq!(last.and_then(|p| p.curve_distance), Some(curve.length()));
        }
    }
}

/// Test: repair inserts intermediates on the straight segment and ends on
/// the target it was bridging to.
#[test]
fn test_repair_correctness() {
    let constraints = JumpConstraints::default();
    let engine = PlatformPlacementEngine::new(constraints, placement(false, 0.0));

    let (_, staircase) = test_curves().remove(1);
    let plan = engine.generate(&staircase, 3);
    let platforms = plan.platforms();

    assert!(platforms.iter().any(|p| p.role == PlatformRole::Intermediate));
    for (i, p) in platforms.iter().enumerate() {
        if p.role != PlatformRole::Intermediate {
            continue;
        }
        assert!(p.curve_distance.is_none());

        // Walk forward to the repair target and back to the take-off point.
        let target = platforms[i..]
            .iter()
            .find(|q| q.role == PlatformRole::RepairTarget)
            .copied();
        let origin = platforms[..i]
            .iter()
            .rev()
            .find(|q| q.role != PlatformRole::Intermediate)
            .copied();
        let (Some(target), Some(origin)) = (target, origin) else {
            panic!("intermediate {i} is not bracketed");
        };

        // Collinear with the segment (no lateral offset without variation).
        let a = origin.position();
        let b = target.position();
        let along = (p.position() - a).cross(b - a).length();
        assert!(along < 1e-6 * (b - a).length_squared().max(1.0), "intermediate {i} off segment");
    }
    assert!(plan.invalid_jumps(&constraints).is_empty());
}

/// Test: no building crowds the path, for every style and shape.
#[test]
fn test_clearance() {
    let (_, curve) = test_curves().remove(0);
    let platforms = PlatformPlacementEngine::default().generate(&curve, 8);
    let obstacles = PathObstacles::from_path(&curve, &platforms);
    let samples = curve.sample_points(PATH_SAMPLE_STEP);

    let shapes = [
        AreaShape::Box,
        AreaShape::LShape { arm_width: 2000.0 },
        AreaShape::UShape { arm_width: 1500.0 },
        AreaShape::Custom {
            polygon: vec![
                Vec2::new(-2500.0, -2000.0),
                Vec2::new(2500.0, -2500.0),
                Vec2::new(3000.0, 1500.0),
                Vec2::new(0.0, 2500.0),
                Vec2::new(-2000.0, 1000.0),
            ],
        },
    ];
    for shape in shapes {
        let area = AreaModel::new(Vec3::new(1000.0, 0.0, 0.0), Vec3::new(5000.0, 5000.0, 2000.0), shape);
        for style in [
            EnvironmentStyle::Urban,
            EnvironmentStyle::Industrial,
            EnvironmentStyle::Abstract,
        ] {
            let engine = EnvironmentPlacementEngine::new(EnvironmentSettings {
                style,
                density: 1.0,
                path_clearance: 400.0,
                ..EnvironmentSettings::default()
            });
            for seed in 1..=5 {
                let plan = engine.generate(&area, &obstacles, seed);
                for b in plan.buildings() {
                    assert!(area.contains(b.position));
                    let reach = 400.0 + b.size.x.max(b.size.y) * 0.5;
                    for p in platforms.iter().map(|p| p.position()).chain(samples.iter().copied()) {
                        assert!(
                            b.position.planar_distance(p) >= reach,
                            "{} building {} crowds the path",
                            style.name(),
                            b.index
                        );
                    }
                }
            }
        }
    }
}

/// Test: clearing leaves nothing behind, twice in a row, and regeneration
/// after a clear reproduces the same scene.
#[test]
fn test_idempotent_clear() {
    let mut settings = GeneratorSettings::default();
    settings.seeds.path = 12;
    settings.seeds.environment = 34;
    let mut scene = ParkourScene::new(settings);
    let (path, area) = scene.spawn_complete_setup(Vec3::new(-500.0, 250.0, 0.0));

    scene.generate_everything();
    let first_path = scene.path(path).unwrap().plan().clone();
    let first_env = scene.area(area).unwrap().plan().clone();

    for _ in 0..2 {
        scene.clear_everything();
        assert!(scene.path(path).unwrap().plan().is_empty());
        assert!(scene.area(area).unwrap().plan().is_empty());
    }

    scene.generate_everything();
    scene.generate_everything();
    assert_eq!(scene.path(path).unwrap().plan(), &first_path);
    assert_eq!(scene.area(area).unwrap().plan(), &first_env);
}
