//! Edge path management for rendering.
//!
//! [`EdgePathManager`] turns the host's edges into SVG path descriptors and
//! label positions. Paths are computed from the engine's display positions,
//! so curves follow nodes while they are being dragged.
//!
//! # Example
//!
//! ```ignore
//! let mut edge_paths = EdgePathManager::new();
//!
//! // Bind once - auto-syncs on every update_paths call
//! let model = Rc::new(VecModel::<EdgePathData>::default());
//! edge_paths.bind_model(model.clone(), |id, path, label_x, label_y| EdgePathData {
//!     id, path, label_x, label_y,
//! });
//! window.set_edge_paths(ModelRc::from(model));
//!
//! // After every pointer event or model change
//! edge_paths.update_paths(&engine, &graph);
//! ```

use crate::engine::InteractionEngine;
use crate::geometry::Point;
use crate::host::{edge_shapes, GraphHost};
use slint::{Model, SharedString, VecModel};
use std::rc::Rc;

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, paths: &[EdgePath]);
}

/// Concrete implementation of ModelSyncer for a specific path type.
struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(SharedString, SharedString, f32, f32) -> P,
{
    fn sync(&self, paths: &[EdgePath]) {
        // Update existing rows or add new ones
        for (i, path) in paths.iter().enumerate() {
            let item = (self.constructor)(
                SharedString::from(path.id.as_str()),
                SharedString::from(path.commands.as_str()),
                path.label.x,
                path.label.y,
            );
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > paths.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

/// The rendered form of one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub id: String,
    /// SVG path descriptor, `M x y C ...`
    pub commands: String,
    /// Curve midpoint, where an edge label sits
    pub label: Point,
}

/// Computes edge paths and optionally mirrors them into a Slint model.
#[derive(Default)]
pub struct EdgePathManager {
    paths: Vec<EdgePath>,
    syncer: Option<Box<dyn ModelSyncer>>,
}

impl EdgePathManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a Slint model for automatic synchronization.
    ///
    /// `constructor` builds a row from (id, path_commands, label_x, label_y).
    pub fn bind_model<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(SharedString, SharedString, f32, f32) -> P + 'static,
    {
        self.syncer = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Recompute all paths from the host's edges.
    ///
    /// Call this after pointer moves during a drag and after the host's
    /// graph changes. Edges with a missing endpoint produce no path.
    pub fn update_paths<H: GraphHost + ?Sized>(&mut self, engine: &InteractionEngine, host: &H) {
        let nodes = engine.display_nodes(host);
        self.paths = edge_shapes(&nodes, &host.edges(), engine.config())
            .into_iter()
            .map(|shape| EdgePath {
                commands: shape.curve.to_svg_path(),
                label: shape.curve.midpoint(),
                id: shape.id,
            })
            .collect();

        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.paths);
        }
    }

    pub fn paths(&self) -> &[EdgePath] {
        &self.paths
    }

    pub fn find(&self, id: &str) -> Option<&EdgePath> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{GraphEdge, GraphNode};
    use crate::session::{Modifiers, PointerButton, PointerTarget};

    struct Host {
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
    }

    impl GraphHost for Host {
        fn nodes(&self) -> Vec<GraphNode> {
            self.nodes.clone()
        }
        fn edges(&self) -> Vec<GraphEdge> {
            self.edges.clone()
        }
    }

    fn host() -> Host {
        Host {
            nodes: vec![
                GraphNode::new("a", 0.0, 0.0, 140.0, 80.0),
                GraphNode::new("b", 300.0, 0.0, 140.0, 80.0),
            ],
            edges: vec![GraphEdge::new("e1", "a", "b"), GraphEdge::new("e2", "a", "gone")],
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: SharedString,
        path: SharedString,
        label_x: f32,
        label_y: f32,
    }

    #[test]
    fn test_new_manager_is_empty() {
        let manager = EdgePathManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn test_update_paths_skips_missing_endpoints() {
        let host = host();
        let engine = InteractionEngine::default();
        let mut manager = EdgePathManager::new();
        manager.update_paths(&engine, &host);

        assert_eq!(manager.len(), 1);
        let path = manager.find("e1").unwrap();
        assert!(path.commands.starts_with("M 140 40 C "));
        assert_eq!(path.label, Point::new(220.0, 40.0));
        assert!(manager.find("e2").is_none());
    }

    #[test]
    fn test_paths_follow_dragged_node() {
        let host = host();
        let mut engine = InteractionEngine::default();
        let mut manager = EdgePathManager::new();

        engine.pointer_down(&host, Point::new(310.0, 10.0), PointerTarget::Node("b".into()),
            PointerButton::Primary, Modifiers::NONE);
        engine.pointer_move(&host, Point::new(310.0, 110.0));
        manager.update_paths(&engine, &host);

        // b displayed 100 lower; the edge now leaves a's right side towards it
        let curve_end = manager.find("e1").unwrap().commands.rsplit(' ').take(2).collect::<Vec<_>>();
        assert_eq!(curve_end, vec!["140", "300"]);
    }

    #[test]
    fn test_bound_model_synced() {
        let host = host();
        let engine = InteractionEngine::default();
        let model = Rc::new(VecModel::from(vec![
            Row { id: "old".into(), path: "".into(), label_x: 0.0, label_y: 0.0 },
            Row { id: "older".into(), path: "".into(), label_x: 0.0, label_y: 0.0 },
        ]));

        let mut manager = EdgePathManager::new();
        manager.bind_model(model.clone(), |id, path, label_x, label_y| Row { id, path, label_x, label_y });
        manager.update_paths(&engine, &host);

        assert_eq!(model.row_count(), 1);
        let row = model.row_data(0).unwrap();
        assert_eq!(row.id.as_str(), "e1");
        assert_eq!(row.label_x, 220.0);
    }
}
