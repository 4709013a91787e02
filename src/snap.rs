//! Snap points: the four side anchors of every node, cached for the length of
//! one linking or edge-modification gesture.

use crate::geometry::{anchor_point, Point, Side};
use crate::hit_test::NodeGeometry;

/// An anchor eligible for attraction while a link is being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPoint {
    pub node_id: String,
    pub side: Side,
    pub x: f32,
    pub y: f32,
}

impl SnapPoint {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Snap points computed once at gesture start.
///
/// Rebuilding is O(nodes); lookups during pointer moves scan the cached list
/// and never touch the host.
#[derive(Debug, Default, Clone)]
pub struct SnapCache {
    points: Vec<SnapPoint>,
}

impl SnapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with the anchors of `nodes`.
    pub fn rebuild<N, I>(&mut self, nodes: I)
    where
        N: NodeGeometry,
        I: IntoIterator<Item = N>,
    {
        self.points.clear();
        for node in nodes {
            let rect = node.rect();
            for side in Side::ALL {
                let p = anchor_point(rect.origin, rect.size.width, rect.size.height, side);
                self.points.push(SnapPoint {
                    node_id: node.id().to_string(),
                    side,
                    x: p.x,
                    y: p.y,
                });
            }
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[SnapPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Nearest snap point within `max_distance` (inclusive). Earlier entries
    /// win ties.
    pub fn nearest(&self, point: Point, max_distance: f32) -> Option<&SnapPoint> {
        let mut best: Option<(&SnapPoint, f32)> = None;
        let max_sq = max_distance * max_distance;
        for snap in &self.points {
            let d = point.distance_sq(snap.position());
            if d > max_sq {
                continue;
            }
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((snap, d));
            }
        }
        best.map(|(snap, _)| snap)
    }
}
