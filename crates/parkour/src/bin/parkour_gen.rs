//! # Parkour Course Generator
//!
//! Builds a path and a linked play area from a settings file, generates
//! both and reports what came out.
//!
//! Usage: `parkour_gen [settings.toml]`
//!
//! Without an argument the built-in defaults are used.

use std::process::ExitCode;

use parkour_procedural::{GeneratorSettings, InstanceCollector, ParkourScene};
use parkour_shared::Vec3;

fn load_settings() -> Result<GeneratorSettings, String> {
    match std::env::args().nth(1) {
        Some(path) => {
            println!("📄 Loading settings from {} ...", path);
            GeneratorSettings::load(&path).map_err(|e| e.to_string())
        }
        None => {
            println!("📄 No settings file given, using defaults");
            Ok(GeneratorSettings::default())
        }
    }
}

fn main() -> ExitCode {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                  PARKOUR FORGE GENERATOR v0.1.0");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("   ✗ FATAL: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let constraints = settings.jump_constraints();
    println!(
        "   ✓ Jump model: height {:.0}, distance {:.0}, margin {:.2}",
        constraints.max_height,
        constraints.max_distance,
        constraints.safety_margin
    );
    println!(
        "   ✓ Environment: {} at density {:.2}",
        settings.environment.style.name(),
        settings.environment.density
    );
    println!(
        "   ✓ Seeds: path {}, environment {}",
        settings.seeds.path, settings.seeds.environment
    );

    let mut scene = ParkourScene::new(settings);
    let (path_id, area_id) = scene.spawn_complete_setup(Vec3::ZERO);

    println!();
    println!("🏗️  Generating {} and {} ...", path_id, area_id);
    scene.generate_everything();

    let (path, area) = match (scene.path(path_id), scene.area(area_id)) {
        (Ok(path), Ok(area)) => (path, area),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("   ✗ FATAL: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let plan = path.plan();
    println!(
        "   ✓ {} platforms over {:.0} units",
        plan.len(),
        path.curve().length()
    );
    for platform in plan {
        let p = platform.position();
        println!(
            "     #{:<3} {:<13} ({:>8.1}, {:>8.1}, {:>8.1})",
            platform.index,
            format!("{:?}", platform.role),
            p.x,
            p.y,
            p.z
        );
    }

    let environment = area.plan();
    let stats = environment.stats();
    println!(
        "   ✓ {} buildings ({} candidates, {} outside, {} blocked by path)",
        environment.buildings().len(),
        stats.candidates,
        stats.outside_area,
        stats.blocked_by_path
    );

    let invalid = path.validate();
    if invalid.is_empty() {
        println!("   ✓ Every jump is within limits");
    } else {
        println!("   ⚠ Invalid jumps ending at {:?}", invalid);
    }

    let mut collector = InstanceCollector::new();
    scene.export(&mut collector);
    println!();
    println!("📦 Instance buffers:");
    println!("     platforms: {} bytes", collector.platform_bytes().len());
    println!("     buildings: {} bytes", collector.building_bytes().len());
    println!("     floors:    {} bytes", collector.floor_bytes().len());

    if invalid.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
