//! The pointer-gesture state machine.
//!
//! [`InteractionEngine`] turns forwarded pointer events into at most one
//! batch of [`Intent`]s per gesture. While a gesture is live nothing in the
//! host is mutated; dragged nodes are displayed through
//! [`InteractionEngine::display_position`] and committed on release.
//!
//! ```
//! use graph_gesture_core::{
//!     GraphEdge, GraphHost, GraphNode, Intent, InteractionEngine, Modifiers, Point,
//!     PointerButton, PointerTarget,
//! };
//!
//! struct Canvas(Vec<GraphNode>);
//!
//! impl GraphHost for Canvas {
//!     fn nodes(&self) -> Vec<GraphNode> { self.0.clone() }
//!     fn edges(&self) -> Vec<GraphEdge> { Vec::new() }
//! }
//!
//! let host = Canvas(vec![GraphNode::new("a", 0.0, 0.0, 140.0, 80.0)]);
//! let mut engine = InteractionEngine::default();
//!
//! engine.pointer_down(&host, Point::new(10.0, 10.0), PointerTarget::Node("a".into()),
//!     PointerButton::Primary, Modifiers::NONE);
//! engine.pointer_move(&host, Point::new(40.0, 30.0));
//! let intents = engine.pointer_up(&host, Point::new(60.0, 50.0));
//!
//! assert_eq!(intents, vec![Intent::NodeMove { node_id: "a".into(), position: Point::new(50.0, 40.0) }]);
//! assert!(engine.is_idle());
//! ```

use crate::config::EditorConfig;
use crate::cutting::CuttingSession;
use crate::geometry::{anchor_point, closest_side, natural_entering_side, Point, Rect, Side};
use crate::hit_test::{find_edge_at, find_edge_handle_at, find_node_at, nodes_in_selection_box};
use crate::host::{edge_shapes, GraphEdge, GraphHost, GraphNode, Intent, LinkSides};
use crate::listeners::{GestureListeners, ListenerGuard};
use crate::path::CubicBezier;
use crate::selection::SelectionManager;
use crate::session::{
    Handle, InteractionSession, Modifiers, PointerButton, PointerTarget, SessionKind,
};
use crate::snap::{SnapCache, SnapPoint};
use std::collections::HashSet;
use std::rc::Rc;

/// Owns all transient interaction state for one graph view.
pub struct InteractionEngine {
    config: EditorConfig,
    session: Option<InteractionSession>,
    pointer: Point,
    snap_cache: SnapCache,
    active_snap: Option<SnapPoint>,
    selection: SelectionManager,
    listeners: Option<Rc<dyn GestureListeners>>,
    listener_guard: Option<ListenerGuard>,
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for InteractionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionEngine")
            .field("session", &self.session)
            .field("pointer", &self.pointer)
            .field("active_snap", &self.active_snap)
            .finish_non_exhaustive()
    }
}

impl InteractionEngine {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            session: None,
            pointer: Point::default(),
            snap_cache: SnapCache::new(),
            active_snap: None,
            selection: SelectionManager::new(),
            listeners: None,
            listener_guard: None,
        }
    }

    /// Install `listeners` for the duration of every future session.
    pub fn with_listeners(mut self, listeners: Rc<dyn GestureListeners>) -> Self {
        self.listeners = Some(listeners);
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    // === Session inspection ===

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn kind(&self) -> SessionKind {
        self.session.as_ref().map_or(SessionKind::Idle, InteractionSession::kind)
    }

    /// Last pointer position, in canvas coordinates.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Snap point the link currently attaches to, if any.
    pub fn active_snap(&self) -> Option<&SnapPoint> {
        self.active_snap.as_ref()
    }

    /// Snap points cached for the current gesture (empty when idle).
    pub fn snap_points(&self) -> &[SnapPoint] {
        self.snap_cache.points()
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionManager {
        &mut self.selection
    }

    /// Normalized rubber-band rectangle while box-selecting.
    pub fn selection_rect(&self) -> Option<Rect> {
        match &self.session {
            Some(InteractionSession::BoxSelecting { start, current }) => {
                Some(Rect::from_corners(*start, *current))
            }
            _ => None,
        }
    }

    /// Cutting line drawn so far.
    pub fn cut_path(&self) -> Option<&CuttingSession> {
        match &self.session {
            Some(InteractionSession::Cutting(cut)) => Some(cut),
            _ => None,
        }
    }

    // === Pointer events ===

    /// Resolve what lies under a pointer position: an edge handle, then the
    /// topmost node, then an edge curve, then the canvas.
    pub fn target_at<H: GraphHost + ?Sized>(&self, host: &H, raw: Point) -> PointerTarget {
        let local = host.content_offset(raw);
        let shapes = edge_shapes(&self.node_boxes(host), &host.edges(), &self.config);
        if let Some((edge_id, handle)) = find_edge_handle_at(local, &shapes, self.config.handle_radius) {
            return PointerTarget::EdgeHandle { edge_id, handle };
        }
        if let Some(node_id) = self.node_under(host, local) {
            return PointerTarget::Node(node_id);
        }
        match find_edge_at(local, &shapes, self.config.edge_hit_distance, self.config.cut_samples) {
            Some(edge_id) => PointerTarget::Edge(edge_id),
            None => PointerTarget::Canvas,
        }
    }

    /// Start a gesture. Returns `false` if nothing started: a non-primary
    /// button, a session already live, a target that no longer exists, or a
    /// plain press on an edge curve (edge clicks belong to the host).
    pub fn pointer_down<H: GraphHost + ?Sized>(
        &mut self,
        host: &H,
        raw: Point,
        target: PointerTarget,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        if !self.is_idle() {
            log::debug!("pointer-down ignored while {} is active", self.kind());
            return false;
        }

        let local = host.content_offset(raw);
        let session = match target {
            PointerTarget::Node(node_id) => {
                let Some(node) = find_node(host, &node_id) else {
                    log::warn!("pointer-down on unknown node {}", node_id);
                    return false;
                };
                if modifiers.link() {
                    self.snap_cache.rebuild(self.node_boxes(host));
                    InteractionSession::Linking { source_id: node_id }
                } else if let Some(node_ids) = self.drag_group(host, &node_id) {
                    InteractionSession::DraggingMultiple { node_ids, drag_start: local }
                } else {
                    InteractionSession::DraggingSingle {
                        node_id,
                        pointer_offset: local - node.position,
                    }
                }
            }
            PointerTarget::EdgeHandle { edge_id, handle } => {
                if find_edge(host, &edge_id).is_none() {
                    log::warn!("pointer-down on handle of unknown edge {}", edge_id);
                    return false;
                }
                self.snap_cache.rebuild(self.node_boxes(host));
                InteractionSession::ModifyingEdge { edge_id, handle }
            }
            PointerTarget::Edge(edge_id) => {
                if !modifiers.cut() {
                    log::debug!("press on edge {} starts no gesture", edge_id);
                    return false;
                }
                InteractionSession::Cutting(CuttingSession::new(local))
            }
            PointerTarget::Canvas => {
                if modifiers.cut() {
                    InteractionSession::Cutting(CuttingSession::new(local))
                } else {
                    InteractionSession::BoxSelecting { start: local, current: local }
                }
            }
        };

        self.pointer = local;
        self.begin(session);
        true
    }

    /// Start drawing a link from `source_id` without a modifier, e.g. from a
    /// context menu. `raw` is where the pointer currently is.
    pub fn start_link<H: GraphHost + ?Sized>(&mut self, host: &H, source_id: &str, raw: Point) -> bool {
        if !self.is_idle() {
            log::debug!("link start ignored while {} is active", self.kind());
            return false;
        }
        if find_node(host, source_id).is_none() {
            log::warn!("link start from unknown node {}", source_id);
            return false;
        }
        self.pointer = host.content_offset(raw);
        self.snap_cache.rebuild(self.node_boxes(host));
        self.begin(InteractionSession::Linking { source_id: source_id.to_string() });
        self.update_snap(self.pointer);
        true
    }

    pub fn pointer_move<H: GraphHost + ?Sized>(&mut self, host: &H, raw: Point) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let local = host.content_offset(raw);

        if let Some(reason) = stale_reference(host, session) {
            self.abort(&reason);
            return;
        }

        let shapes = if matches!(session, InteractionSession::Cutting(_)) {
            edge_shapes(&self.node_boxes(host), &host.edges(), &self.config)
        } else {
            Vec::new()
        };

        self.pointer = local;
        match self.session.as_mut() {
            Some(InteractionSession::BoxSelecting { current, .. }) => *current = local,
            Some(InteractionSession::Cutting(cut)) => {
                cut.extend(local, &shapes, self.config.cut_samples);
            }
            Some(InteractionSession::Linking { .. }) | Some(InteractionSession::ModifyingEdge { .. }) => {
                self.update_snap(local);
            }
            _ => {}
        }
    }

    /// End the gesture and return the intents it produced.
    pub fn pointer_up<H: GraphHost + ?Sized>(&mut self, host: &H, raw: Point) -> Vec<Intent> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let local = host.content_offset(raw);

        if let Some(reason) = stale_reference(host, session) {
            self.abort(&reason);
            return Vec::new();
        }
        if session.uses_snapping() {
            self.update_snap(local);
        }
        self.pointer = local;

        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        let snap = self.active_snap.take();

        let intents = match session {
            InteractionSession::DraggingSingle { node_id, pointer_offset } => {
                vec![Intent::NodeMove { node_id, position: local - pointer_offset }]
            }
            InteractionSession::DraggingMultiple { node_ids, drag_start } => {
                vec![Intent::MultiNodeMove { node_ids, delta: local - drag_start }]
            }
            InteractionSession::Linking { source_id } => {
                match self.drop_target(host, local, snap) {
                    Some((target_id, target_side)) => vec![Intent::LinkComplete {
                        source_id,
                        target_id,
                        sides: LinkSides { source_side: None, target_side },
                    }],
                    None => {
                        log::debug!("link from {} released over empty canvas", source_id);
                        Vec::new()
                    }
                }
            }
            InteractionSession::ModifyingEdge { edge_id, handle } => {
                match self.drop_target(host, local, snap) {
                    Some((target_id, side)) => {
                        vec![Intent::LinkUpdate { edge_id, handle, target_id, side }]
                    }
                    None => vec![Intent::LinkDelete { edge_id }],
                }
            }
            InteractionSession::BoxSelecting { start, .. } => {
                let node_ids = nodes_in_selection_box(start, local, self.node_boxes(host));
                self.selection.replace_selection(node_ids.iter().cloned());
                vec![Intent::BoxSelectEnd { node_ids }]
            }
            InteractionSession::Cutting(mut cut) => {
                let edges = host.edges();
                let shapes = edge_shapes(&self.node_boxes(host), &edges, &self.config);
                cut.extend(local, &shapes, self.config.cut_samples);
                let live: HashSet<&str> = edges.iter().map(|e| e.id.as_str()).collect();
                cut.into_hits()
                    .into_iter()
                    .filter(|id| live.contains(id.as_str()))
                    .map(|edge_id| Intent::LinkDelete { edge_id })
                    .collect()
            }
        };

        self.finish();
        intents
    }

    /// Drop the current gesture without emitting anything.
    pub fn cancel(&mut self) {
        if let Some(session) = &self.session {
            log::debug!("{} cancelled", session.kind());
            self.finish();
        }
    }

    // === Display overrides ===

    /// Where a node should be drawn right now: pointer-relative while it is
    /// being dragged, `stored` otherwise.
    pub fn display_position(&self, node_id: &str, stored: Point) -> Point {
        match &self.session {
            Some(InteractionSession::DraggingSingle { node_id: dragged, pointer_offset })
                if dragged == node_id =>
            {
                self.pointer - *pointer_offset
            }
            Some(InteractionSession::DraggingMultiple { node_ids, drag_start })
                if node_ids.iter().any(|id| id == node_id) =>
            {
                stored + (self.pointer - *drag_start)
            }
            _ => stored,
        }
    }

    /// Host nodes with size overrides and drag display positions applied.
    pub fn display_nodes<H: GraphHost + ?Sized>(&self, host: &H) -> Vec<GraphNode> {
        let mut nodes = self.node_boxes(host);
        for node in &mut nodes {
            node.position = self.display_position(&node.id, node.position);
        }
        nodes
    }

    /// Temporary curve drawn while linking or moving an edge endpoint.
    ///
    /// The free end attaches to the active snap point, or else follows the
    /// raw pointer entering from its natural side.
    pub fn link_preview<H: GraphHost + ?Sized>(&self, host: &H) -> Option<CubicBezier> {
        let (free_end, free_side) = match &self.active_snap {
            Some(snap) => (snap.position(), Some(snap.side)),
            None => (self.pointer, None),
        };

        match self.session.as_ref()? {
            InteractionSession::Linking { source_id } => {
                let source = find_node_in(&self.node_boxes(host), source_id)?;
                let (start, start_side) = anchor_toward(&source, None, free_end);
                let end_side = free_side.unwrap_or_else(|| natural_entering_side(start, free_end));
                Some(self.curve(start, free_end, start_side, end_side))
            }
            InteractionSession::ModifyingEdge { edge_id, handle } => {
                let edge = find_edge(host, edge_id)?;
                let nodes = self.node_boxes(host);
                match handle {
                    Handle::Target => {
                        let fixed = find_node_in(&nodes, &edge.from_node_id)?;
                        let (start, start_side) = anchor_toward(&fixed, edge.from_side, free_end);
                        let end_side =
                            free_side.unwrap_or_else(|| natural_entering_side(start, free_end));
                        Some(self.curve(start, free_end, start_side, end_side))
                    }
                    Handle::Source => {
                        let fixed = find_node_in(&nodes, &edge.to_node_id)?;
                        let (end, end_side) = anchor_toward(&fixed, edge.to_side, free_end);
                        let start_side =
                            free_side.unwrap_or_else(|| natural_entering_side(end, free_end));
                        Some(self.curve(free_end, end, start_side, end_side))
                    }
                }
            }
            _ => None,
        }
    }

    // === Internals ===

    fn begin(&mut self, session: InteractionSession) {
        log::debug!("{} started", session.kind());
        self.active_snap = None;
        self.listener_guard = self.listeners.clone().map(ListenerGuard::acquire);
        self.session = Some(session);
    }

    /// Return to idle. Dropping the guard removes the listeners.
    fn finish(&mut self) {
        self.session = None;
        self.active_snap = None;
        self.snap_cache.clear();
        self.listener_guard = None;
    }

    fn abort(&mut self, reason: &str) {
        log::warn!("{} aborted: {}", self.kind(), reason);
        self.finish();
    }

    fn update_snap(&mut self, local: Point) {
        let snap = self.snap_cache.nearest(local, self.config.snap_distance).cloned();
        if snap != self.active_snap {
            match &snap {
                Some(s) => log::trace!("snapped to {} {}", s.node_id, s.side),
                None => log::trace!("snap released"),
            }
        }
        self.active_snap = snap;
    }

    /// Selected ids to drag together when `node_id` is pressed, or `None`
    /// for a single drag.
    ///
    /// A host-owned selection replaces the engine's own first, and ids whose
    /// nodes no longer exist are dropped from it.
    fn drag_group<H: GraphHost + ?Sized>(&mut self, host: &H, node_id: &str) -> Option<Vec<String>> {
        if let Some(ids) = host.selected_ids() {
            self.selection.replace_selection(ids);
        }
        let nodes = host.nodes();
        let live: Vec<String> = self
            .selection
            .sorted_ids()
            .into_iter()
            .filter(|id| nodes.iter().any(|n| &n.id == id))
            .collect();
        if live.len() != self.selection.len() {
            log::debug!("pruned {} removed nodes from the selection", self.selection.len() - live.len());
            self.selection.replace_selection(live.iter().cloned());
        }

        (live.len() > 1 && live.iter().any(|id| id == node_id)).then_some(live)
    }

    /// Where a link or edge endpoint lands: the snap point if its node still
    /// exists, else the node under the pointer with no pinned side.
    fn drop_target<H: GraphHost + ?Sized>(
        &self,
        host: &H,
        local: Point,
        snap: Option<SnapPoint>,
    ) -> Option<(String, Option<Side>)> {
        if let Some(snap) = snap {
            if find_node(host, &snap.node_id).is_some() {
                return Some((snap.node_id, Some(snap.side)));
            }
            log::warn!("snapped node {} disappeared before release", snap.node_id);
        }
        self.node_under(host, local).map(|node_id| (node_id, None))
    }

    /// Topmost node at `local`. The host answers unless node sizes are
    /// overridden, in which case the overridden boxes are tested.
    fn node_under<H: GraphHost + ?Sized>(&self, host: &H, local: Point) -> Option<String> {
        if self.config.node_size.is_some() {
            find_node_at(local, self.node_boxes(host))
        } else {
            host.node_at(local)
        }
    }

    fn node_boxes<H: GraphHost + ?Sized>(&self, host: &H) -> Vec<GraphNode> {
        let mut nodes = host.nodes();
        if let Some(size) = self.config.node_size {
            for node in &mut nodes {
                node.dimensions = size;
            }
        }
        nodes
    }

    fn curve(&self, start: Point, end: Point, start_side: Side, end_side: Side) -> CubicBezier {
        CubicBezier::between(
            start,
            end,
            start_side,
            end_side,
            self.config.bezier_curvature,
            self.config.bezier_min_offset,
        )
    }
}

fn find_node<H: GraphHost + ?Sized>(host: &H, id: &str) -> Option<GraphNode> {
    host.nodes().into_iter().find(|n| n.id == id)
}

fn find_node_in(nodes: &[GraphNode], id: &str) -> Option<GraphNode> {
    nodes.iter().find(|n| n.id == id).cloned()
}

fn find_edge<H: GraphHost + ?Sized>(host: &H, id: &str) -> Option<GraphEdge> {
    host.edges().into_iter().find(|e| e.id == id)
}

/// Anchor on `node` at its pinned side, or the side facing `toward`.
fn anchor_toward(node: &GraphNode, pinned: Option<Side>, toward: Point) -> (Point, Side) {
    let (w, h) = (node.dimensions.width, node.dimensions.height);
    let side = pinned.unwrap_or_else(|| closest_side(node.position, w, h, toward));
    (anchor_point(node.position, w, h, side), side)
}

/// Describe the first reference held by `session` that the host no longer has.
fn stale_reference<H: GraphHost + ?Sized>(host: &H, session: &InteractionSession) -> Option<String> {
    match session {
        InteractionSession::DraggingSingle { node_id, .. }
        | InteractionSession::Linking { source_id: node_id } => {
            find_node(host, node_id).is_none().then(|| format!("node {} disappeared", node_id))
        }
        InteractionSession::DraggingMultiple { node_ids, .. } => {
            let nodes = host.nodes();
            node_ids
                .iter()
                .find(|id| !nodes.iter().any(|n| &n.id == *id))
                .map(|id| format!("node {} disappeared", id))
        }
        InteractionSession::ModifyingEdge { edge_id, .. } => {
            find_edge(host, edge_id).is_none().then(|| format!("edge {} disappeared", edge_id))
        }
        InteractionSession::BoxSelecting { .. } | InteractionSession::Cutting(_) => None,
    }
}
