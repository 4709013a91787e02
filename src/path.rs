use crate::geometry::{segments_intersect, Point, Side};

/// Default ratio between anchor distance and control point offset
pub const DEFAULT_CURVATURE: f32 = 0.5;

/// Default minimum control point offset, so very close nodes still curve
pub const DEFAULT_MIN_OFFSET: f32 = 40.0;

/// Default number of segments used to flatten a curve for cut testing
pub const DEFAULT_CUT_SAMPLES: usize = 24;

/// Cubic bezier curve between two anchors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start anchor
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End anchor
}

impl CubicBezier {
    /// Create a bezier whose ends leave and arrive perpendicular to their sides.
    ///
    /// Each control point sits on its side's outward normal, at a distance of
    /// `curvature * |p3 - p0|` clamped below by `min_offset`.
    ///
    /// # Arguments
    /// * `start`, `end` - Anchor points
    /// * `start_side`, `end_side` - Sides the anchors belong to
    /// * `curvature` - Offset as a fraction of the anchor distance
    /// * `min_offset` - Minimum control point offset
    pub fn between(
        start: Point,
        end: Point,
        start_side: Side,
        end_side: Side,
        curvature: f32,
        min_offset: f32,
    ) -> Self {
        let offset = (start.distance(end) * curvature).max(min_offset);
        CubicBezier {
            p0: start,
            p1: start + start_side.normal() * offset,
            p2: end + end_side.normal() * offset,
            p3: end,
        }
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.x
            + 3.0 * mt2 * t * self.p1.x
            + 3.0 * mt * t2 * self.p2.x
            + t3 * self.p3.x;
        let y = mt3 * self.p0.y
            + 3.0 * mt2 * t * self.p1.y
            + 3.0 * mt * t2 * self.p2.y
            + t3 * self.p3.y;

        Point::new(x, y)
    }

    /// Point at t = 0.5, where labels and handles are placed
    pub fn midpoint(&self) -> Point {
        self.eval(0.5)
    }

    /// Polyline approximation with `segments` pieces (`segments + 1` points).
    pub fn flatten(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.eval(i as f32 / segments as f32))
            .collect()
    }

    /// SVG path command for the curve (e.g. "M 10 20 C 60 20 90 80 140 80")
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }
}

/// Build the curve between two anchors with the default curvature.
pub fn bezier_path(p1: Point, p2: Point, side1: Side, side2: Side) -> CubicBezier {
    CubicBezier::between(p1, p2, side1, side2, DEFAULT_CURVATURE, DEFAULT_MIN_OFFSET)
}

/// Midpoint (t = 0.5) of the curve [`bezier_path`] builds for the same inputs.
pub fn bezier_midpoint(p1: Point, p2: Point, side1: Side, side2: Side) -> Point {
    bezier_path(p1, p2, side1, side2).midpoint()
}

/// Whether the segment `seg_start-seg_end` crosses the curve.
///
/// The curve is flattened into `samples` segments which are tested in order;
/// returns on the first hit.
pub fn segment_intersects_curve(
    seg_start: Point,
    seg_end: Point,
    curve: &CubicBezier,
    samples: usize,
) -> bool {
    let samples = if samples == 0 { DEFAULT_CUT_SAMPLES } else { samples };
    let mut prev = curve.p0;
    for i in 1..=samples {
        let curr = curve.eval(i as f32 / samples as f32);
        if segments_intersect(seg_start, seg_end, prev, curr) {
            return true;
        }
        prev = curr;
    }
    false
}

/// Whether a straight segment crosses the default curve between two anchors.
pub fn line_intersects_bezier(
    seg_start: Point,
    seg_end: Point,
    curve_start: Point,
    curve_end: Point,
    side1: Side,
    side2: Side,
) -> bool {
    let curve = bezier_path(curve_start, curve_end, side1, side2);
    segment_intersects_curve(seg_start, seg_end, &curve, DEFAULT_CUT_SAMPLES)
}

/// Calculate squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);
    point.distance_sq(a + ab * t)
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Samples the curve at regular intervals and measures against each piece.
///
/// # Arguments
/// * `point` - The point to measure distance from
/// * `bezier` - The bezier curve
/// * `num_samples` - Number of samples for distance calculation (default: 20)
pub fn distance_to_bezier(point: Point, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.p0;

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}
