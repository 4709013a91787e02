//! The boundary between the interaction core and the graph model that owns
//! nodes and edges.
//!
//! The core reads through [`GraphHost`] and writes only by emitting
//! [`Intent`]s, which a host applies through [`IntentSink`].

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::geometry::{resolve_edge, Point, Rect, Side, Size};
use crate::hit_test::{find_node_at, EdgeShape, NodeGeometry};
use crate::path::CubicBezier;
use crate::session::Handle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node as the core sees it: an id and a bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Top-left corner of the bounding box
    pub position: Point,
    pub dimensions: Size,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            position: Point::new(x, y),
            dimensions: Size::new(width, height),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect { origin: self.position, size: self.dimensions }
    }
}

impl NodeGeometry for GraphNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn rect(&self) -> Rect {
        GraphNode::rect(self)
    }
}

/// A directed edge. Missing sides are resolved from geometry at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_side: Option<Side>,
}

impl GraphEdge {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from_node_id: from.into(),
            to_node_id: to.into(),
            from_side: None,
            to_side: None,
        }
    }

    pub fn with_sides(mut self, from_side: Option<Side>, to_side: Option<Side>) -> Self {
        self.from_side = from_side;
        self.to_side = to_side;
        self
    }

    /// Node id at the given end
    pub fn endpoint(&self, handle: Handle) -> &str {
        match handle {
            Handle::Source => &self.from_node_id,
            Handle::Target => &self.to_node_id,
        }
    }
}

/// Read access to the authoritative graph.
///
/// Every method is queried fresh; the core keeps nothing beyond one gesture.
pub trait GraphHost {
    /// Current nodes in draw order (last is topmost)
    fn nodes(&self) -> Vec<GraphNode>;

    fn edges(&self) -> Vec<GraphEdge>;

    /// Map a pointer position to canvas coordinates (scroll, pan, zoom).
    fn content_offset(&self, pointer: Point) -> Point {
        pointer
    }

    /// Topmost node under a canvas point.
    fn node_at(&self, point: Point) -> Option<String> {
        find_node_at(point, self.nodes())
    }

    /// The multi-selection, for hosts that own it.
    ///
    /// `None` leaves the engine's own selection in charge. A host returning
    /// `Some` is read at every node press, so deleting selected nodes or
    /// changing the selection elsewhere is picked up by the next drag.
    fn selected_ids(&self) -> Option<Vec<String>> {
        None
    }
}

/// Side preferences attached to a completed link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkSides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_side: Option<Side>,
}

/// A change the core asks the host to make. At most one gesture's worth is
/// emitted per pointer-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    NodeMove { node_id: String, position: Point },
    MultiNodeMove { node_ids: Vec<String>, delta: Point },
    LinkComplete { source_id: String, target_id: String, sides: LinkSides },
    LinkUpdate { edge_id: String, handle: Handle, target_id: String, side: Option<Side> },
    LinkDelete { edge_id: String },
    BoxSelectEnd { node_ids: Vec<String> },
}

impl Intent {
    /// Hand the intent to the matching [`IntentSink`] callback.
    pub fn dispatch<S: IntentSink + ?Sized>(self, sink: &mut S) -> Result<(), EditorError> {
        match self {
            Intent::NodeMove { node_id, position } => sink.on_node_move(&node_id, position),
            Intent::MultiNodeMove { node_ids, delta } => sink.on_multi_node_move(&node_ids, delta),
            Intent::LinkComplete { source_id, target_id, sides } => {
                sink.on_link_complete(&source_id, &target_id, sides)
            }
            Intent::LinkUpdate { edge_id, handle, target_id, side } => {
                sink.on_link_update(&edge_id, handle, &target_id, side)
            }
            Intent::LinkDelete { edge_id } => sink.on_link_delete(&edge_id),
            Intent::BoxSelectEnd { node_ids } => sink.on_box_select_end(&node_ids),
        }
    }
}

/// Write side of the host: one callback per intent kind.
///
/// Hosts own graph semantics, so rejecting an intent (duplicate edge,
/// self-link) is done here and reported as an error.
pub trait IntentSink {
    fn on_node_move(&mut self, node_id: &str, position: Point) -> Result<(), EditorError>;

    fn on_multi_node_move(&mut self, node_ids: &[String], delta: Point) -> Result<(), EditorError>;

    fn on_link_complete(
        &mut self,
        source_id: &str,
        target_id: &str,
        sides: LinkSides,
    ) -> Result<(), EditorError>;

    fn on_link_update(
        &mut self,
        edge_id: &str,
        handle: Handle,
        target_id: &str,
        side: Option<Side>,
    ) -> Result<(), EditorError>;

    fn on_link_delete(&mut self, edge_id: &str) -> Result<(), EditorError>;

    fn on_box_select_end(&mut self, node_ids: &[String]) -> Result<(), EditorError>;
}

/// Resolve every edge whose endpoints exist into anchors and a curve.
///
/// Edges referencing missing nodes are skipped.
pub fn edge_shapes(nodes: &[GraphNode], edges: &[GraphEdge], config: &EditorConfig) -> Vec<EdgeShape> {
    let by_id: HashMap<&str, &GraphNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    edges
        .iter()
        .filter_map(|edge| {
            let (Some(from), Some(to)) = (
                by_id.get(edge.from_node_id.as_str()),
                by_id.get(edge.to_node_id.as_str()),
            ) else {
                log::trace!("skipping edge {} with a missing endpoint", edge.id);
                return None;
            };
            let anchors = resolve_edge(from.rect(), to.rect(), edge.from_side, edge.to_side);
            let curve = CubicBezier::between(
                anchors.start,
                anchors.end,
                anchors.start_side,
                anchors.end_side,
                config.bezier_curvature,
                config.bezier_min_offset,
            );
            Some(EdgeShape { id: edge.id.clone(), anchors, curve })
        })
        .collect()
}
