//! Centripetal Catmull-Rom curves used for camera paths.

use bevy::math::Vec3;

/// Samples used to approximate arc length.
const ARC_DIVISIONS: usize = 200;

/// Parameter step for finite-difference tangents.
const TANGENT_DELTA: f32 = 0.0001;

/// Master path points closer than this collapse into one.
const DEDUPE_DISTANCE: f32 = 0.1;

/// Points taken from each drill segment appended to the master path.
const SEGMENT_POINTS: usize = 10;

/// An open centripetal Catmull-Rom spline through a list of control points.
///
/// End segments use control points mirrored past the first and last points.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    lengths: Vec<f32>,
}

impl CatmullRomCurve {
    /// Build a curve. Needs at least two points.
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let mut curve = Self {
            points,
            lengths: Vec::new(),
        };
        curve.lengths = curve.arc_lengths();
        Some(curve)
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Approximate total length.
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at curve parameter `t ∈ [0, 1]`.
    pub fn point(&self, t: f32) -> Vec3 {
        let points = &self.points;
        let l = points.len();

        let p = (l - 1) as f32 * t.clamp(0.0, 1.0);
        let mut segment = p.floor() as usize;
        let mut weight = p - segment as f32;
        if segment >= l - 1 {
            segment = l - 2;
            weight = 1.0;
        }

        let p1 = points[segment];
        let p2 = points[segment + 1];
        let p0 = if segment > 0 {
            points[segment - 1]
        } else {
            p1 + (p1 - p2)
        };
        let p3 = if segment + 2 < l {
            points[segment + 2]
        } else {
            p2 + (p2 - p1)
        };

        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

        // Cubic Hermite between p1 and p2
        let c0 = p1;
        let c1 = t1;
        let c2 = p1 * -3.0 + p2 * 3.0 - t1 * 2.0 - t2;
        let c3 = p1 * 2.0 - p2 * 2.0 + t1 + t2;
        let w = weight;
        c0 + c1 * w + c2 * (w * w) + c3 * (w * w * w)
    }

    /// `divisions + 1` points evenly spaced in curve parameter.
    pub fn points(&self, divisions: usize) -> Vec<Vec3> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|i| self.point(i as f32 / divisions as f32))
            .collect()
    }

    fn arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_DIVISIONS + 1);
        let mut previous = self.point(0.0);
        let mut total = 0.0;
        lengths.push(0.0);
        for i in 1..=ARC_DIVISIONS {
            let current = self.point(i as f32 / ARC_DIVISIONS as f32);
            total += current.distance(previous);
            lengths.push(total);
            previous = current;
        }
        lengths
    }

    /// Convert an arc-length fraction into a curve parameter.
    fn u_to_t(&self, u: f32) -> f32 {
        let total = self.length();
        if total <= f32::EPSILON {
            return u.clamp(0.0, 1.0);
        }
        let target = u.clamp(0.0, 1.0) * total;
        let last = self.lengths.len() - 1;

        let index = self.lengths.partition_point(|&l| l < target);
        if index == 0 {
            return 0.0;
        }
        if index > last {
            return 1.0;
        }
        if self.lengths[index] == target {
            return index as f32 / last as f32;
        }

        let before = self.lengths[index - 1];
        let segment = self.lengths[index] - before;
        let fraction = (target - before) / segment;
        (index as f32 - 1.0 + fraction) / last as f32
    }

    /// Point at arc-length fraction `u ∈ [0, 1]`.
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at arc-length fraction `u`.
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        let t = self.u_to_t(u);
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).normalize_or(Vec3::X)
    }
}

/// A three-point arc from `start` to `end` bulging upward by `curviness` and
/// sideways by half of it.
pub fn transition_curve(start: Vec3, end: Vec3, curviness: f32) -> Option<CatmullRomCurve> {
    let mut mid = start.lerp(end, 0.5);
    mid.y += curviness;

    let dir = (end - start).normalize_or_zero();
    let lateral = dir.cross(Vec3::Y).normalize_or_zero();
    mid += lateral * (curviness * 0.5);

    CatmullRomCurve::new(vec![start, mid, end])
}

/// The cumulative path a riding camera follows: the spawn segment plus one
/// arc per drill-down.
#[derive(Debug, Clone)]
pub struct MasterPath {
    points: Vec<Vec3>,
    curve: Option<CatmullRomCurve>,
}

impl MasterPath {
    pub fn new(spawn: Vec3, start_target: Vec3) -> Self {
        let mut path = Self {
            points: vec![spawn, start_target],
            curve: None,
        };
        path.rebuild();
        path
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn curve(&self) -> Option<&CatmullRomCurve> {
        self.curve.as_ref()
    }

    /// Append a transition arc from the current path end to `target`.
    pub fn extend_to(&mut self, target: Vec3, curviness: f32) {
        let start = self.points.last().copied().unwrap_or(target);
        if let Some(segment) = transition_curve(start, target, curviness) {
            self.points
                .extend(segment.points(SEGMENT_POINTS).into_iter().skip(1));
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let mut unique: Vec<Vec3> = Vec::with_capacity(self.points.len());
        for point in &self.points {
            match unique.last() {
                Some(last) if last.distance(*point) <= DEDUPE_DISTANCE => {}
                _ => unique.push(*point),
            }
        }
        self.points = unique;
        self.curve = CatmullRomCurve::new(self.points.clone());
    }

    /// Evenly spaced points along the path, for drawing.
    pub fn sample(&self, divisions: usize) -> Vec<Vec3> {
        match &self.curve {
            Some(curve) => curve.points(divisions),
            None => self.points.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn test_needs_two_points() {
        assert!(CatmullRomCurve::new(vec![Vec3::ZERO]).is_none());
        assert!(CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::X]).is_some());
    }

    #[test]
    fn test_curve_hits_control_points() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(5.0, 10.0, 2.0);
        let c = Vec3::new(10.0, 0.0, 0.0);
        let curve = CatmullRomCurve::new(vec![a, b, c]).unwrap();

        assert!(close(curve.point(0.0), a));
        assert!(close(curve.point(0.5), b));
        assert!(close(curve.point(1.0), c));
    }

    #[test]
    fn test_two_point_curve_is_straight() {
        let curve = CatmullRomCurve::new(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]).unwrap();
        let mid = curve.point_at(0.5);
        assert!(close(mid, Vec3::new(5.0, 0.0, 0.0)));
        assert!((curve.length() - 10.0).abs() < 1e-2);
        assert!(close(curve.tangent_at(1.0), Vec3::X));
    }

    #[test]
    fn test_arc_length_steps_are_even() {
        let curve = transition_curve(Vec3::ZERO, Vec3::new(0.0, -20.0, 20.0), 10.0).unwrap();
        let step = curve.length() / 10.0;
        for i in 0..10 {
            let a = curve.point_at(i as f32 / 10.0);
            let b = curve.point_at((i + 1) as f32 / 10.0);
            assert!((a.distance(b) - step).abs() < step * 0.05, "segment {i}");
        }
        assert!(close(curve.point_at(1.0), Vec3::new(0.0, -20.0, 20.0)));
    }

    #[test]
    fn test_transition_curve_bulges() {
        let start = Vec3::ZERO;
        let end = Vec3::new(10.0, 0.0, 0.0);
        let curve = transition_curve(start, end, 10.0).unwrap();
        let mid = curve.control_points()[1];
        assert_eq!(mid.y, 10.0);
        // dir = +X, lateral = X × Y = +Z
        assert!((mid.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_master_path_grows_and_dedupes() {
        let spawn = Vec3::new(0.0, 30.0, 40.0);
        let mut path = MasterPath::new(spawn, Vec3::ZERO);
        assert_eq!(path.points().len(), 2);

        path.extend_to(Vec3::new(5.0, 0.0, 20.0), 10.0);
        assert_eq!(path.points().len(), 2 + SEGMENT_POINTS);
        assert!(close(*path.points().last().unwrap(), Vec3::new(5.0, 0.0, 20.0)));

        // Extending to the current end adds nothing but duplicates
        let before = path.points().len();
        path.extend_to(Vec3::new(5.0, 0.0, 20.0), 0.0);
        assert_eq!(path.points().len(), before);

        let curve = path.curve().unwrap();
        assert!(close(curve.point_at(0.0), spawn));
    }
}
