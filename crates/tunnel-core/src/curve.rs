//! Catmull-Rom curve evaluation with arc-length parametrisation
//!
//! The curve interpolates an open sequence of control points. Two families
//! of queries are provided:
//! - `point(t)` / `tangent(t)` take the raw spline parameter, where each
//!   control point sits at `t = i / (n - 1)`
//! - `point_at(u)` / `tangent_at(u)` take a normalized arc length, so equal
//!   steps in `u` cover equal distances along the curve
//!
//! The arc-length table is built once at construction and reused by every
//! `*_at` query.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameter step used for finite-difference tangents
const TANGENT_DELTA: f32 = 1e-4;

/// Squared-distance weights below this are treated as coincident points
const MIN_KNOT_SPACING: f32 = 1e-4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("a curve needs at least 2 control points, got {0}")]
    TooFewPoints(usize),
    #[error("arc length table needs at least one division")]
    ZeroDivisions,
}

/// Knot parametrisation of the spline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveKind {
    /// Uniform Catmull-Rom with the given tension
    Uniform { tension: f32 },
    /// Knot spacing proportional to sqrt(distance)
    Centripetal,
    /// Knot spacing proportional to distance
    Chordal,
}

impl Default for CurveKind {
    fn default() -> Self {
        CurveKind::Centripetal
    }
}

/// Cubic polynomial in Hermite form for one coordinate of one segment
#[derive(Debug, Clone, Copy)]
struct CubicPoly {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl CubicPoly {
    fn hermite(x0: f32, x1: f32, t0: f32, t1: f32) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(x0: f32, x1: f32, x2: f32, x3: f32, tension: f32) -> Self {
        Self::hermite(x1, x2, tension * (x2 - x0), tension * (x3 - x1))
    }

    fn non_uniform(x0: f32, x1: f32, x2: f32, x3: f32, dt0: f32, dt1: f32, dt2: f32) -> Self {
        // Tangents for a non-uniform knot sequence, rescaled to [0, 1]
        let mut t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let mut t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        t1 *= dt1;
        t2 *= dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    fn eval(&self, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t3
    }
}

/// Orthonormal frames sampled along a curve
#[derive(Debug, Clone)]
pub struct Frames {
    pub tangents: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub binormals: Vec<Vec3>,
}

impl Frames {
    pub fn len(&self) -> usize {
        self.tangents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tangents.is_empty()
    }
}

/// Open Catmull-Rom spline through a list of control points
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    kind: CurveKind,
    /// Cumulative arc length at `i / divisions`, first entry is 0
    arc_lengths: Vec<f32>,
}

impl CatmullRomCurve {
    /// Build a curve and precompute its arc-length table
    pub fn new(points: Vec<Vec3>, kind: CurveKind, divisions: usize) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints(points.len()));
        }
        if divisions == 0 {
            return Err(CurveError::ZeroDivisions);
        }

        let mut curve = Self {
            points,
            kind,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.compute_lengths(divisions);
        Ok(curve)
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Number of divisions in the arc-length table
    pub fn divisions(&self) -> usize {
        self.arc_lengths.len() - 1
    }

    /// Total approximate arc length
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at spline parameter `t` in [0, 1]
    pub fn point(&self, t: f32) -> Vec3 {
        let points = &self.points;
        let l = points.len();
        let t = t.clamp(0.0, 1.0);

        let p = (l - 1) as f32 * t;
        let mut int_point = p.floor() as usize;
        let mut weight = p - int_point as f32;

        // t == 1 lands on the last point; evaluate the final segment at its end
        if int_point >= l - 1 {
            int_point = l - 2;
            weight = 1.0;
        }

        let p1 = points[int_point];
        let p2 = points[int_point + 1];
        let p0 = if int_point > 0 {
            points[int_point - 1]
        } else {
            p1 * 2.0 - p2
        };
        let p3 = if int_point + 2 < l {
            points[int_point + 2]
        } else {
            p2 * 2.0 - p1
        };

        let (px, py, pz) = match self.kind {
            CurveKind::Uniform { tension } => (
                CubicPoly::uniform(p0.x, p1.x, p2.x, p3.x, tension),
                CubicPoly::uniform(p0.y, p1.y, p2.y, p3.y, tension),
                CubicPoly::uniform(p0.z, p1.z, p2.z, p3.z, tension),
            ),
            CurveKind::Centripetal | CurveKind::Chordal => {
                let pow = if self.kind == CurveKind::Chordal { 0.5 } else { 0.25 };
                let mut dt0 = p0.distance_squared(p1).powf(pow);
                let mut dt1 = p1.distance_squared(p2).powf(pow);
                let mut dt2 = p2.distance_squared(p3).powf(pow);

                if dt1 < MIN_KNOT_SPACING {
                    dt1 = 1.0;
                }
                if dt0 < MIN_KNOT_SPACING {
                    dt0 = dt1;
                }
                if dt2 < MIN_KNOT_SPACING {
                    dt2 = dt1;
                }

                (
                    CubicPoly::non_uniform(p0.x, p1.x, p2.x, p3.x, dt0, dt1, dt2),
                    CubicPoly::non_uniform(p0.y, p1.y, p2.y, p3.y, dt0, dt1, dt2),
                    CubicPoly::non_uniform(p0.z, p1.z, p2.z, p3.z, dt0, dt1, dt2),
                )
            }
        };

        Vec3::new(px.eval(weight), py.eval(weight), pz.eval(weight))
    }

    /// Unit tangent at spline parameter `t`
    pub fn tangent(&self, t: f32) -> Vec3 {
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).normalize_or_zero()
    }

    /// Map normalized arc length `u` to the spline parameter
    pub fn u_to_t(&self, u: f32) -> f32 {
        let lengths = &self.arc_lengths;
        let last = lengths.len() - 1;
        let target = u.clamp(0.0, 1.0) * lengths[last];

        // Largest index whose cumulative length does not exceed the target
        let mut low: isize = 0;
        let mut high: isize = last as isize;
        while low <= high {
            let mid = low + (high - low) / 2;
            let cmp = lengths[mid as usize] - target;
            if cmp < 0.0 {
                low = mid + 1;
            } else if cmp > 0.0 {
                high = mid - 1;
            } else {
                high = mid;
                break;
            }
        }
        let i = high.max(0) as usize;

        if lengths[i] == target || i >= last {
            return i as f32 / last as f32;
        }

        let before = lengths[i];
        let segment = lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        (i as f32 + fraction) / last as f32
    }

    /// Point at normalized arc length `u`
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at normalized arc length `u`
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        self.tangent(self.u_to_t(u))
    }

    /// `divisions + 1` points equally spaced by arc length
    pub fn spaced_points(&self, divisions: usize) -> Vec<Vec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|d| self.point_at(d as f32 / divisions as f32))
            .collect()
    }

    /// Parallel-transport frames at `segments + 1` arc-length-spaced samples
    pub fn frenet_frames(&self, segments: usize) -> Frames {
        let segments = segments.max(1);
        let tangents: Vec<Vec3> = (0..=segments)
            .map(|i| self.tangent_at(i as f32 / segments as f32))
            .collect();

        let mut normals = Vec::with_capacity(segments + 1);
        let mut binormals = Vec::with_capacity(segments + 1);

        // Seed with the axis least aligned with the first tangent
        let t0 = tangents[0];
        let abs = t0.abs();
        let mut min = f32::MAX;
        let mut seed = Vec3::X;
        if abs.x <= min {
            min = abs.x;
            seed = Vec3::X;
        }
        if abs.y <= min {
            min = abs.y;
            seed = Vec3::Y;
        }
        if abs.z <= min {
            seed = Vec3::Z;
        }

        let side = t0.cross(seed).normalize_or_zero();
        normals.push(t0.cross(side));
        binormals.push(t0.cross(normals[0]));

        for i in 1..=segments {
            let prev = tangents[i - 1];
            let cur = tangents[i];
            let mut normal = normals[i - 1];

            let axis = prev.cross(cur);
            if axis.length() > f32::EPSILON {
                let theta = prev.dot(cur).clamp(-1.0, 1.0).acos();
                normal = Mat3::from_axis_angle(axis.normalize(), theta) * normal;
            }

            binormals.push(cur.cross(normal));
            normals.push(normal);
        }

        Frames {
            tangents,
            normals,
            binormals,
        }
    }

    fn compute_lengths(&self, divisions: usize) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(divisions + 1);
        lengths.push(0.0);

        let mut last = self.point(0.0);
        let mut sum = 0.0;
        for p in 1..=divisions {
            let current = self.point(p as f32 / divisions as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3, eps: f32) {
        assert!(a.distance(b) < eps, "{a:?} != {b:?}");
    }

    fn zigzag() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 0.0, 1.0),
            Vec3::new(6.0, 1.0, -1.0),
        ]
    }

    #[test]
    fn test_rejects_too_few_points() {
        let err = CatmullRomCurve::new(vec![Vec3::ZERO], CurveKind::Centripetal, 10).unwrap_err();
        assert_eq!(err, CurveError::TooFewPoints(1));

        let err = CatmullRomCurve::new(zigzag(), CurveKind::Centripetal, 0).unwrap_err();
        assert_eq!(err, CurveError::ZeroDivisions);
    }

    #[test]
    fn test_interpolates_control_points() {
        let points = zigzag();
        for kind in [
            CurveKind::Centripetal,
            CurveKind::Chordal,
            CurveKind::Uniform { tension: 0.5 },
        ] {
            let curve = CatmullRomCurve::new(points.clone(), kind, 50).unwrap();
            for (i, p) in points.iter().enumerate() {
                let t = i as f32 / (points.len() - 1) as f32;
                assert_close(curve.point(t), *p, 1e-4);
            }
        }
    }

    #[test]
    fn test_two_points_is_a_line() {
        let curve = CatmullRomCurve::new(
            vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
            CurveKind::Centripetal,
            20,
        )
        .unwrap();
        assert_close(curve.point_at(0.5), Vec3::new(5.0, 0.0, 0.0), 1e-3);
        assert!((curve.length() - 10.0).abs() < 1e-3);
        assert_close(curve.tangent_at(0.3), Vec3::X, 1e-4);
    }

    #[test]
    fn test_arc_length_endpoints() {
        let curve = CatmullRomCurve::new(zigzag(), CurveKind::Centripetal, 200).unwrap();
        assert_eq!(curve.u_to_t(0.0), 0.0);
        assert_eq!(curve.u_to_t(1.0), 1.0);
        assert_close(curve.point_at(0.0), zigzag()[0], 1e-5);
        assert_close(curve.point_at(1.0), zigzag()[3], 1e-4);
    }

    #[test]
    fn test_u_to_t_is_monotonic() {
        let curve = CatmullRomCurve::new(zigzag(), CurveKind::Centripetal, 100).unwrap();
        let mut prev = -1.0;
        for i in 0..=100 {
            let t = curve.u_to_t(i as f32 / 100.0);
            assert!(t >= prev);
            prev = t;
        }
    }

    #[test]
    fn test_spaced_points_are_evenly_spaced() {
        let curve = CatmullRomCurve::new(zigzag(), CurveKind::Centripetal, 400).unwrap();
        let pts = curve.spaced_points(20);
        assert_eq!(pts.len(), 21);

        let expected = curve.length() / 20.0;
        for pair in pts.windows(2) {
            // Chords are slightly shorter than arcs on a bent curve
            let chord = pair[0].distance(pair[1]);
            assert!((chord - expected).abs() < expected * 0.1, "chord {chord} vs {expected}");
        }
    }

    #[test]
    fn test_tangents_are_unit_length() {
        let curve = CatmullRomCurve::new(zigzag(), CurveKind::Chordal, 100).unwrap();
        for i in 0..=10 {
            let t = curve.tangent_at(i as f32 / 10.0);
            assert!((t.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_coincident_points_do_not_produce_nan() {
        let curve = CatmullRomCurve::new(
            vec![Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)],
            CurveKind::Centripetal,
            10,
        )
        .unwrap();
        for i in 0..=10 {
            assert!(curve.point(i as f32 / 10.0).is_finite());
        }
    }

    #[test]
    fn test_frenet_frames_are_orthonormal() {
        let curve = CatmullRomCurve::new(zigzag(), CurveKind::Centripetal, 200).unwrap();
        let frames = curve.frenet_frames(32);
        assert_eq!(frames.len(), 33);

        for i in 0..frames.len() {
            let (t, n, b) = (frames.tangents[i], frames.normals[i], frames.binormals[i]);
            assert!((n.length() - 1.0).abs() < 1e-3);
            assert!((b.length() - 1.0).abs() < 1e-3);
            assert!(t.dot(n).abs() < 1e-3);
            assert!(t.dot(b).abs() < 1e-3);
            assert!(n.dot(b).abs() < 1e-3);
        }
    }
}
