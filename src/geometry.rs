//! Rectangle geometry for node boxes: side selection, anchor placement and
//! robust segment intersection.
//!
//! All functions are pure. Side selection is recomputed from current positions
//! on every call; nothing here caches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Relative tolerance for the orientation test in [`segments_intersect`].
pub const EPS_ORIENT: f64 = 1e-9;

/// Absolute slack (canvas units) when checking that a collinear point lies on a segment.
pub const EPS_POS: f64 = 1e-4;

/// A point (or vector) in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Width and height of a node box. Height may be a rendered minimum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Build a rectangle from two corners given in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Rect::new(min_x, min_y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }

    pub fn top(&self) -> f32 {
        self.origin.y
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width * 0.5,
            self.origin.y + self.size.height * 0.5,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Overlap test. Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// The face of a node box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Unit outward normal of this side.
    pub fn normal(self) -> Point {
        match self {
            Side::Top => Point::new(0.0, -1.0),
            Side::Bottom => Point::new(0.0, 1.0),
            Side::Left => Point::new(-1.0, 0.0),
            Side::Right => Point::new(1.0, 0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side whose outward normal faces an offset vector.
///
/// The dominant axis decides; horizontal wins an exact tie and a zero offset
/// yields `Right`.
fn side_for_offset(dx: f32, dy: f32) -> Side {
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            Side::Right
        } else {
            Side::Left
        }
    } else if dy >= 0.0 {
        Side::Bottom
    } else {
        Side::Top
    }
}

/// Pick the side of a box that faces `toward`.
///
/// Compares the target against the box center and uses the dominant axis of
/// the offset (horizontal magnitude vs vertical magnitude).
pub fn closest_side(origin: Point, width: f32, height: f32, toward: Point) -> Side {
    let center = Rect { origin, size: Size::new(width, height) }.center();
    side_for_offset(toward.x - center.x, toward.y - center.y)
}

/// Midpoint of the given side of a box.
pub fn anchor_point(origin: Point, width: f32, height: f32, side: Side) -> Point {
    match side {
        Side::Top => Point::new(origin.x + width * 0.5, origin.y),
        Side::Bottom => Point::new(origin.x + width * 0.5, origin.y + height),
        Side::Left => Point::new(origin.x, origin.y + height * 0.5),
        Side::Right => Point::new(origin.x + width, origin.y + height * 0.5),
    }
}

/// Side a curve ending at `p2` should enter from when `p2` is a free point
/// rather than a node (e.g. a link dragged over open canvas).
///
/// Treats `p2` as a zero-sized box and asks which of its sides faces `p1`.
pub fn natural_entering_side(p1: Point, p2: Point) -> Side {
    side_for_offset(p1.x - p2.x, p1.y - p2.y)
}

/// Endpoints of an edge after side resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAnchors {
    pub start: Point,
    pub end: Point,
    pub start_side: Side,
    pub end_side: Side,
}

/// Resolve an edge's anchors between two node boxes.
///
/// A pinned side is used as-is; a missing side is the closest side toward the
/// other box's center.
pub fn resolve_edge(
    from: Rect,
    to: Rect,
    from_side: Option<Side>,
    to_side: Option<Side>,
) -> EdgeAnchors {
    let start_side = from_side.unwrap_or_else(|| {
        closest_side(from.origin, from.size.width, from.size.height, to.center())
    });
    let end_side = to_side
        .unwrap_or_else(|| closest_side(to.origin, to.size.width, to.size.height, from.center()));
    EdgeAnchors {
        start: anchor_point(from.origin, from.size.width, from.size.height, start_side),
        end: anchor_point(to.origin, to.size.width, to.size.height, end_side),
        start_side,
        end_side,
    }
}

#[inline]
fn orient(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

#[inline]
fn within_box(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    p.0 >= a.0.min(b.0) - EPS_POS
        && p.0 <= a.0.max(b.0) + EPS_POS
        && p.1 >= a.1.min(b.1) - EPS_POS
        && p.1 <= a.1.max(b.1) + EPS_POS
}

/// Whether segment `a-b` intersects segment `c-d`.
///
/// Computed in f64 with an orientation tolerance scaled by the segment
/// lengths, so nearly parallel and nearly collinear inputs are classified
/// consistently. Endpoint touches and collinear overlaps count as hits.
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let a = (a.x as f64, a.y as f64);
    let b = (b.x as f64, b.y as f64);
    let c = (c.x as f64, c.y as f64);
    let d = (d.x as f64, d.y as f64);

    let len_ab = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
    let len_cd = ((d.0 - c.0).powi(2) + (d.1 - c.1).powi(2)).sqrt();
    let eps = EPS_ORIENT * (len_ab * len_cd).max(1.0);

    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);

    let straddles = |p: f64, q: f64| (p > eps && q < -eps) || (p < -eps && q > eps);
    if straddles(o1, o2) && straddles(o3, o4) {
        return true;
    }

    // Touching or collinear cases
    (o1.abs() <= eps && within_box(a, b, c))
        || (o2.abs() <= eps && within_box(a, b, d))
        || (o3.abs() <= eps && within_box(c, d, a))
        || (o4.abs() <= eps && within_box(c, d, b))
}
