//! # Geometry Export
//!
//! Plans are pure data; turning them into meshes and colliders is the host's
//! job. This module hands every placement to a [`GeometrySink`] as an
//! oriented box, and ships [`InstanceCollector`], a sink that packs them into
//! GPU-ready instance records.
//!
//! It also builds the read-only path preview: platform boxes, jump arcs and
//! index labels for an editor overlay.

use bytemuck::{Pod, Zeroable};

use parkour_shared::{Quaternion, Vec3};

use crate::environment::{Building, EnvironmentPlan, FloorPlan};
use crate::jump::JumpConstraints;
use crate::platform::{Platform, PlatformDimensions, PlatformPlan, PlatformRole};

/// Labels float this far above their platform.
const LABEL_HEIGHT: f64 = 50.0;

/// An oriented box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxGeometry {
    /// Box centre.
    pub center: Vec3,
    /// Half size along the local axes.
    pub half_extents: Vec3,
    /// Orientation.
    pub rotation: Quaternion,
}

impl BoxGeometry {
    /// Box of a platform: top face centred on the platform position.
    #[must_use]
    pub fn platform(platform: &Platform, dimensions: &PlatformDimensions) -> Self {
        let half = platform.extent(dimensions) * 0.5;
        Self {
            center: platform.position() - Vec3::new(0.0, 0.0, half.z),
            half_extents: half,
            rotation: platform.rotation(),
        }
    }

    /// Box of a building: base centred on the building position.
    #[must_use]
    pub fn building(building: &Building) -> Self {
        let half = building.size * 0.5;
        Self {
            center: building.position + Vec3::new(0.0, 0.0, half.z),
            half_extents: half,
            rotation: Quaternion::IDENTITY,
        }
    }
}

/// Receives generated placements.
pub trait GeometrySink {
    /// One platform and its box.
    fn platform(&mut self, platform: &Platform, geometry: &BoxGeometry);

    /// One building and its box.
    fn building(&mut self, building: &Building, geometry: &BoxGeometry);

    /// The floor rectangle.
    fn floor(&mut self, floor: &FloorPlan);
}

/// Feeds every platform of `plan` to `sink`, in order.
pub fn export_platforms<S: GeometrySink + ?Sized>(
    plan: &PlatformPlan,
    dimensions: &PlatformDimensions,
    sink: &mut S,
) {
    for platform in plan {
        sink.platform(platform, &BoxGeometry::platform(platform, dimensions));
    }
}

/// Feeds the floor (first) and every building of `plan` to `sink`.
pub fn export_environment<S: GeometrySink + ?Sized>(plan: &EnvironmentPlan, sink: &mut S) {
    if let Some(floor) = plan.floor() {
        sink.floor(floor);
    }
    for building in plan.buildings() {
        sink.building(building, &BoxGeometry::building(building));
    }
}

// =============================================================================
// GPU INSTANCE RECORDS
// =============================================================================

/// Platform instance (64 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PlatformInstance {
    /// Box centre (xyz), unused (w)
    pub center: [f32; 4],
    /// Rotation quaternion (xyzw)
    pub rotation: [f32; 4],
    /// Half extents (xyz), unused (w)
    pub half_extents: [f32; 4],
    /// Index, role, reserved, reserved
    pub meta: [u32; 4],
}

impl PlatformInstance {
    /// Size in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Role codes stored in `meta[1]`.
    #[must_use]
    pub const fn role_code(role: PlatformRole) -> u32 {
        match role {
            PlatformRole::Start => 0,
            PlatformRole::Stride => 1,
            PlatformRole::Intermediate => 2,
            PlatformRole::RepairTarget => 3,
        }
    }
}

/// Building instance (48 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BuildingInstance {
    /// Box centre (xyz), unused (w)
    pub center: [f32; 4],
    /// Half extents (xyz), unused (w)
    pub half_extents: [f32; 4],
    /// Index, reserved x3
    pub meta: [u32; 4],
}

impl BuildingInstance {
    /// Size in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Floor quad (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FloorInstance {
    /// Centre (xyz), unused (w)
    pub center: [f32; 4],
    /// Half length, half width, unused x2
    pub half_extents: [f32; 4],
}

fn pack(v: Vec3) -> [f32; 4] {
    let [x, y, z] = v.to_f32_array();
    [x, y, z, 0.0]
}

fn pack_index(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

/// Sink that packs placements into instance buffers.
#[derive(Debug, Default, Clone)]
pub struct InstanceCollector {
    platforms: Vec<PlatformInstance>,
    buildings: Vec<BuildingInstance>,
    floors: Vec<FloorInstance>,
}

impl InstanceCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform records.
    #[must_use]
    pub fn platforms(&self) -> &[PlatformInstance] {
        &self.platforms
    }

    /// Building records.
    #[must_use]
    pub fn buildings(&self) -> &[BuildingInstance] {
        &self.buildings
    }

    /// Floor records.
    #[must_use]
    pub fn floors(&self) -> &[FloorInstance] {
        &self.floors
    }

    /// Raw platform buffer for upload.
    #[must_use]
    pub fn platform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.platforms)
    }

    /// Raw building buffer for upload.
    #[must_use]
    pub fn building_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.buildings)
    }

    /// Raw floor buffer for upload.
    #[must_use]
    pub fn floor_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.floors)
    }

    /// Drops all records, keeping the allocations.
    pub fn clear(&mut self) {
        self.platforms.clear();
        self.buildings.clear();
        self.floors.clear();
    }
}

impl GeometrySink for InstanceCollector {
    fn platform(&mut self, platform: &Platform, geometry: &BoxGeometry) {
        self.platforms.push(PlatformInstance {
            center: pack(geometry.center),
            rotation: geometry.rotation.to_f32_array(),
            half_extents: pack(geometry.half_extents),
            meta: [
                pack_index(platform.index),
                PlatformInstance::role_code(platform.role),
                0,
                0,
            ],
        });
    }

    fn building(&mut self, building: &Building, geometry: &BoxGeometry) {
        self.buildings.push(BuildingInstance {
            center: pack(geometry.center),
            half_extents: pack(geometry.half_extents),
            meta: [pack_index(building.index), 0, 0, 0],
        });
    }

    #[allow(clippy::cast_possible_truncation)]
    fn floor(&mut self, floor: &FloorPlan) {
        self.floors.push(FloorInstance {
            center: pack(floor.center),
            half_extents: [
                floor.half_extents.x as f32,
                floor.half_extents.y as f32,
                0.0,
                0.0,
            ],
        });
    }
}

// =============================================================================
// PREVIEW
// =============================================================================

/// Two-segment arc between consecutive platforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpArc {
    /// Take-off platform position.
    pub from: Vec3,
    /// Midpoint lifted by half the safe jump height.
    pub apex: Vec3,
    /// Landing platform position.
    pub to: Vec3,
    /// Whether the jump model accepts this jump.
    pub valid: bool,
}

/// Index label above a platform.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewLabel {
    /// Anchor point.
    pub position: Vec3,
    /// Label text.
    pub text: String,
}

/// Overlay data of a path that was computed but not stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathPreview {
    /// One box per platform.
    pub boxes: Vec<BoxGeometry>,
    /// One arc per consecutive pair.
    pub arcs: Vec<JumpArc>,
    /// One label per platform.
    pub labels: Vec<PreviewLabel>,
}

impl PathPreview {
    /// Builds the overlay of `plan`.
    #[must_use]
    pub fn from_plan(
        plan: &PlatformPlan,
        dimensions: &PlatformDimensions,
        constraints: &JumpConstraints,
    ) -> Self {
        let lift = Vec3::new(0.0, 0.0, constraints.safe_height() * 0.5);

        let boxes = plan
            .iter()
            .map(|p| BoxGeometry::platform(p, dimensions))
            .collect();

        let arcs = plan
            .platforms()
            .windows(2)
            .map(|pair| {
                let (from, to) = (pair[0].position(), pair[1].position());
                JumpArc {
                    from,
                    apex: from.lerp(to, 0.5) + lift,
                    to,
                    valid: constraints.is_jump_valid(from, to),
                }
            })
            .collect();

        let labels = plan
            .iter()
            .map(|p| PreviewLabel {
                position: p.position() + Vec3::new(0.0, 0.0, LABEL_HEIGHT),
                text: p.index.to_string(),
            })
            .collect();

        Self {
            boxes,
            arcs,
            labels,
        }
    }

    /// True when every arc is a valid jump.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.arcs.iter().all(|arc| arc.valid)
    }
}
