//! # Guide Curves
//!
//! The platform engine only needs three questions answered about a path:
//! how long it is, where a given arc length lands, and which way it faces
//! there. [`Curve`] is that seam; hosts with their own spline type implement
//! it directly, everyone else can use [`PolylineCurve`].
//!
//! All positions are world space.

use parkour_shared::Vec3;

/// Arc-length parameterized guide curve.
pub trait Curve: Send + Sync {
    /// Number of points that define the curve.
    ///
    /// Curves with fewer than two defining points produce no platforms.
    fn point_count(&self) -> usize;

    /// Total arc length.
    fn length(&self) -> f64;

    /// Position at `distance` along the curve (clamped to `[0, length]`).
    fn position_at(&self, distance: f64) -> Vec3;

    /// Unit tangent at `distance` along the curve, or zero when undefined.
    fn direction_at(&self, distance: f64) -> Vec3;

    /// Positions every `step` units from the start, excluding the end point.
    ///
    /// Returns nothing for a non-positive or non-finite step.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn sample_points(&self, step: f64) -> Vec<Vec3> {
        let length = self.length();
        if !(step > 0.0 && step.is_finite() && length.is_finite()) {
            return Vec::new();
        }
        let count = (length / step).ceil() as usize;
        (0..count).map(|i| self.position_at(i as f64 * step)).collect()
    }
}

/// Piecewise-linear curve through a list of points.
#[derive(Clone, Debug, PartialEq)]
pub struct PolylineCurve {
    /// Points the caller defined the curve with (before tessellation).
    control_points: usize,
    /// Polyline vertices.
    points: Vec<Vec3>,
    /// Arc length at each vertex; `cumulative[0] == 0`.
    cumulative: Vec<f64>,
}

impl PolylineCurve {
    /// Creates a polyline through `points`.
    #[must_use]
    pub fn new(points: Vec<Vec3>) -> Self {
        let control_points = points.len();
        Self::tessellated(points, control_points)
    }

    /// Creates a smooth curve through `control` using uniform Catmull-Rom
    /// interpolation, tessellated into `subdivisions` pieces per span.
    ///
    /// The curve passes through every control point.
    #[must_use]
    pub fn catmull_rom(control: &[Vec3], subdivisions: usize) -> Self {
        if control.len() < 2 {
            return Self::new(control.to_vec());
        }

        let subdivisions = subdivisions.max(1);
        let last = control.len() - 1;
        let mut points = Vec::with_capacity(last * subdivisions + 1);

        for i in 0..last {
            let p0 = control[i.saturating_sub(1)];
            let p1 = control[i];
            let p2 = control[i + 1];
            let p3 = control[(i + 2).min(last)];

            for s in 0..subdivisions {
                #[allow(clippy::cast_precision_loss)]
                let t = s as f64 / subdivisions as f64;
                points.push(catmull_rom_point(p0, p1, p2, p3, t));
            }
        }
        points.push(control[last]);

        Self::tessellated(points, control.len())
    }

    fn tessellated(points: Vec<Vec3>, control_points: usize) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                total += point.distance(points[i - 1]);
            }
            cumulative.push(total);
        }

        Self {
            control_points,
            points,
            cumulative,
        }
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            control_points: self.control_points,
            points: self.points.iter().map(|p| *p + offset).collect(),
            cumulative: self.cumulative.clone(),
        }
    }

    /// Polyline vertices.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Index of the segment `(i, i + 1)` containing `distance`.
    fn segment_at(&self, distance: f64) -> Option<usize> {
        if self.points.len() < 2 {
            return None;
        }
        let d = distance.max(0.0).min(self.length());
        let idx = self
            .cumulative
            .partition_point(|&c| c < d)
            .clamp(1, self.points.len() - 1);
        Some(idx - 1)
    }

    fn segment_length(&self, segment: usize) -> f64 {
        self.cumulative[segment + 1] - self.cumulative[segment]
    }
}

impl Curve for PolylineCurve {
    fn point_count(&self) -> usize {
        self.control_points
    }

    fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn position_at(&self, distance: f64) -> Vec3 {
        let Some(segment) = self.segment_at(distance) else {
            return self.points.first().copied().unwrap_or(Vec3::ZERO);
        };

        let seg_len = self.segment_length(segment);
        let start = self.points[segment];
        if seg_len <= 0.0 {
            return start;
        }

        let d = distance.max(0.0).min(self.length());
        let t = ((d - self.cumulative[segment]) / seg_len).clamp(0.0, 1.0);
        start.lerp(self.points[segment + 1], t)
    }

    fn direction_at(&self, distance: f64) -> Vec3 {
        let Some(segment) = self.segment_at(distance) else {
            return Vec3::ZERO;
        };

        // Duplicate vertices make zero-length segments; borrow the nearest
        // real tangent instead.
        let forward = (segment..self.points.len() - 1).find(|&s| self.segment_length(s) > 0.0);
        let backward = || (0..segment).rev().find(|&s| self.segment_length(s) > 0.0);

        forward
            .or_else(backward)
            .map_or(Vec3::ZERO, |s| {
                (self.points[s + 1] - self.points[s]).normalize_or_zero()
            })
    }
}

fn catmull_rom_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f64) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    (p1 * 2.0
        + (p2 - p0) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * t3)
        * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(length: f64) -> PolylineCurve {
        PolylineCurve::new(vec![Vec3::ZERO, Vec3::new(length, 0.0, 0.0)])
    }

    #[test]
    fn test_straight_line_sampling() {
        let curve = straight(2000.0);

        assert_eq!(curve.point_count(), 2);
        assert_eq!(curve.length(), 2000.0);
        assert_eq!(curve.position_at(500.0), Vec3::new(500.0, 0.0, 0.0));
        assert_eq!(curve.direction_at(500.0), Vec3::X);
    }

    #[test]
    fn test_distance_is_clamped() {
        let curve = straight(100.0);
        assert_eq!(curve.position_at(-50.0), Vec3::ZERO);
        assert_eq!(curve.position_at(1e9), Vec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_corner_direction_changes() {
        let curve = PolylineCurve::new(vec![
            Vec3::ZERO,
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(100.0, 100.0, 0.0),
        ]);

        assert_eq!(curve.length(), 200.0);
        assert_eq!(curve.direction_at(50.0), Vec3::X);
        assert_eq!(curve.direction_at(150.0), Vec3::Y);
        assert_eq!(curve.position_at(150.0), Vec3::new(100.0, 50.0, 0.0));
    }

    #[test]
    fn test_duplicate_vertices_keep_a_direction() {
        let curve = PolylineCurve::new(vec![
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::new(0.0, 10.0, 0.0),
        ]);
        assert_eq!(curve.direction_at(0.0), Vec3::Y);
    }

    #[test]
    fn test_degenerate_curves() {
        let empty = PolylineCurve::new(Vec::new());
        assert_eq!(empty.point_count(), 0);
        assert_eq!(empty.length(), 0.0);
        assert_eq!(empty.position_at(10.0), Vec3::ZERO);

        let single = PolylineCurve::new(vec![Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(single.point_count(), 1);
        assert_eq!(single.position_at(10.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(single.direction_at(10.0), Vec3::ZERO);
    }

    #[test]
    fn test_catmull_rom_passes_through_controls() {
        let control = [
            Vec3::ZERO,
            Vec3::new(500.0, 0.0, 100.0),
            Vec3::new(1000.0, 300.0, 200.0),
            Vec3::new(1500.0, 300.0, 400.0),
        ];
        let curve = PolylineCurve::catmull_rom(&control, 8);

        assert_eq!(curve.point_count(), 4);
        assert_eq!(curve.points().len(), 3 * 8 + 1);
        for c in control {
            assert!(curve.points().iter().any(|p| p.distance(c) < 1e-9));
        }
        // A smooth curve through the same points is never shorter.
        assert!(curve.length() >= PolylineCurve::new(control.to_vec()).length() - 1e-6);
    }

    #[test]
    fn test_sample_points_step() {
        let curve = straight(1000.0);
        let samples = curve.sample_points(100.0);
        assert_eq!(samples.len(), 10);
        assert!(samples[3].distance(Vec3::new(300.0, 0.0, 0.0)) < 1e-9);

        assert!(curve.sample_points(0.0).is_empty());
        assert!(curve.sample_points(f64::NAN).is_empty());
    }

    #[test]
    fn test_translated_keeps_length() {
        let curve = straight(250.0).translated(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(curve.length(), 250.0);
        assert_eq!(curve.position_at(0.0), Vec3::new(10.0, 20.0, 30.0));
    }
}
