//! The cutting-line sub-session.
//!
//! While the cut modifier is held on empty canvas the pointer draws a
//! polyline. Each new segment is tested against the curve of every edge not
//! yet hit; hits are remembered in first-hit order and only turned into
//! deletions when the gesture ends.

use crate::geometry::Point;
use crate::hit_test::EdgeGeometry;
use crate::path::segment_intersects_curve;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CuttingSession {
    path: Vec<Point>,
    hits: Vec<String>,
    hit_set: HashSet<String>,
}

impl CuttingSession {
    pub fn new(start: Point) -> Self {
        Self {
            path: vec![start],
            ..Self::default()
        }
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Edges hit so far, in first-hit order, each once.
    pub fn hits(&self) -> &[String] {
        &self.hits
    }

    pub fn is_hit(&self, edge_id: &str) -> bool {
        self.hit_set.contains(edge_id)
    }

    /// Append `point` and test the new segment against the given edges.
    ///
    /// Returns the ids newly hit by this segment.
    pub fn extend<E, I>(&mut self, point: Point, edges: I, samples: usize) -> Vec<String>
    where
        E: EdgeGeometry,
        I: IntoIterator<Item = E>,
    {
        let Some(&previous) = self.path.last() else {
            self.path.push(point);
            return Vec::new();
        };
        self.path.push(point);

        let mut newly_hit = Vec::new();
        for edge in edges {
            if self.hit_set.contains(edge.id()) {
                continue;
            }
            if segment_intersects_curve(previous, point, &edge.curve(), samples) {
                log::trace!("cutting line crossed edge {}", edge.id());
                self.hit_set.insert(edge.id().to_string());
                self.hits.push(edge.id().to_string());
                newly_hit.push(edge.id().to_string());
            }
        }
        newly_hit
    }

    /// Consume the session, yielding the hit edge ids.
    pub fn into_hits(self) -> Vec<String> {
        self.hits
    }

    /// SVG polyline for drawing the cutting line (e.g. "M 0 0 L 10 5 L 20 0")
    pub fn to_svg_path(&self) -> String {
        let mut commands = String::new();
        for (i, p) in self.path.iter().enumerate() {
            if i > 0 {
                commands.push(' ');
            }
            let op = if i == 0 { "M" } else { "L" };
            commands.push_str(&format!("{} {} {}", op, p.x, p.y));
        }
        commands
    }
}
