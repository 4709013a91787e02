//! Reference graph model and the link validation framework.
//!
//! [`GraphModel`] stores nodes and edges in slint `VecModel`s so a UI can bind
//! to them directly, and applies the engine's intents through [`IntentSink`].
//! Whether a link is allowed is decided by a [`LinkValidator`] chain.

use crate::error::EditorError;
use crate::geometry::{Point, Side, Size};
use crate::host::{GraphEdge, GraphHost, GraphNode, IntentSink, LinkSides};
use crate::selection::SelectionManager;
use crate::session::Handle;
use slint::{Model, SharedString, VecModel};
use std::fmt;
use std::rc::Rc;

/// Trait for nodes that can be moved (dragged) in the editor.
/// This allows generic logic to update node positions.
pub trait MovableNode: Clone + 'static {
    fn node_id(&self) -> &str;
    fn position(&self) -> Point;
    fn set_position(&mut self, position: Point);
    fn dimensions(&self) -> Size;

    /// The id and bounding box the interaction core works with
    fn to_graph_node(&self) -> GraphNode {
        GraphNode {
            id: self.node_id().to_string(),
            position: self.position(),
            dimensions: self.dimensions(),
        }
    }
}

impl MovableNode for GraphNode {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn dimensions(&self) -> Size {
        self.dimensions
    }

    fn to_graph_node(&self) -> GraphNode {
        self.clone()
    }
}

// ============================================================================
// Link Validation Framework
// ============================================================================

/// Result of link validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Link is valid
    Valid,
    /// Link is invalid with a reason
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Check if the result is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(err) => Err(err),
        }
    }
}

/// Reasons why a link validation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Endpoint does not exist in the graph
    NodeNotFound(String),
    /// Source and target are the same node
    SelfLink,
    /// An edge with the same source and target already exists
    DuplicateLink,
    /// Custom validation failure
    Custom(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "Node {} not found", id),
            Self::SelfLink => write!(f, "Cannot link a node to itself"),
            Self::DuplicateLink => write!(f, "Link already exists"),
            Self::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trait for custom link validation logic.
///
/// `edges` holds the existing edges; when an edge endpoint is being moved it
/// excludes the edge itself.
///
/// # Example
///
/// ```
/// use graph_gesture_core::{GraphEdge, GraphNode, LinkValidator, ValidationError, ValidationResult};
///
/// /// At most one outgoing edge per node
/// struct SingleOutput;
///
/// impl LinkValidator for SingleOutput {
///     fn validate(&self, source_id: &str, _: &str, _: &[GraphNode], edges: &[GraphEdge]) -> ValidationResult {
///         if edges.iter().any(|e| e.from_node_id == source_id) {
///             ValidationResult::Invalid(ValidationError::Custom("output already used".into()))
///         } else {
///             ValidationResult::Valid
///         }
///     }
/// }
/// ```
pub trait LinkValidator {
    fn validate(
        &self,
        source_id: &str,
        target_id: &str,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
    ) -> ValidationResult;
}

/// Both endpoints must exist.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeExistsValidator;

impl LinkValidator for NodeExistsValidator {
    fn validate(&self, source_id: &str, target_id: &str, nodes: &[GraphNode], _: &[GraphEdge]) -> ValidationResult {
        for id in [source_id, target_id] {
            if !nodes.iter().any(|n| n.id == id) {
                return ValidationResult::Invalid(ValidationError::NodeNotFound(id.to_string()));
            }
        }
        ValidationResult::Valid
    }
}

/// Validator that prevents a node linking to itself
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSelfLinksValidator;

impl LinkValidator for NoSelfLinksValidator {
    fn validate(&self, source_id: &str, target_id: &str, _: &[GraphNode], _: &[GraphEdge]) -> ValidationResult {
        if source_id == target_id {
            ValidationResult::Invalid(ValidationError::SelfLink)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Validator that prevents duplicate links
///
/// Direction matters: `a -> b` does not block `b -> a`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDuplicatesValidator;

impl LinkValidator for NoDuplicatesValidator {
    fn validate(&self, source_id: &str, target_id: &str, _: &[GraphNode], edges: &[GraphEdge]) -> ValidationResult {
        if duplicate_link_exists(source_id, target_id, edges) {
            ValidationResult::Invalid(ValidationError::DuplicateLink)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Check if an edge with the given direction already exists
pub fn duplicate_link_exists(source_id: &str, target_id: &str, edges: &[GraphEdge]) -> bool {
    edges
        .iter()
        .any(|e| e.from_node_id == source_id && e.to_node_id == target_id)
}

/// Composite validator that combines multiple validators
///
/// All validators must return Valid for the link to be valid (AND logic).
/// Returns the first error encountered (short-circuits on failure).
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn LinkValidator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to the composite
    ///
    /// Validators are checked in the order they were added.
    pub fn add<V: LinkValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Endpoint existence, no self-links, no duplicates
    pub fn standard() -> Self {
        Self::new()
            .add(NodeExistsValidator)
            .add(NoSelfLinksValidator)
            .add(NoDuplicatesValidator)
    }
}

impl LinkValidator for CompositeValidator {
    fn validate(&self, source_id: &str, target_id: &str, nodes: &[GraphNode], edges: &[GraphEdge]) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(source_id, target_id, nodes, edges);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

/// Convenience function to validate a link with any validator
pub fn validate_link<V: LinkValidator + ?Sized>(
    source_id: &str,
    target_id: &str,
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    validator: &V,
) -> ValidationResult {
    validator.validate(source_id, target_id, nodes, edges)
}

// ============================================================================
// GraphModel
// ============================================================================

/// A graph stored in slint models, usable directly as the engine's host.
///
/// Edge ids are generated as `e1`, `e2`, ... skipping ids already taken.
/// Every accepted mutation bumps [`revision`](Self::revision).
pub struct GraphModel<N: MovableNode = GraphNode> {
    nodes: Rc<VecModel<N>>,
    edges: Rc<VecModel<GraphEdge>>,
    selection: SelectionManager,
    selection_model: Option<Rc<VecModel<SharedString>>>,
    validator: Box<dyn LinkValidator>,
    revision: u64,
}

impl<N: MovableNode> Default for GraphModel<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: MovableNode> GraphModel<N> {
    /// Empty graph with the standard validator chain.
    pub fn new() -> Self {
        Self {
            nodes: Rc::new(VecModel::default()),
            edges: Rc::new(VecModel::default()),
            selection: SelectionManager::new(),
            selection_model: None,
            validator: Box::new(CompositeValidator::standard()),
            revision: 0,
        }
    }

    /// Replace the validator chain.
    pub fn with_validator<V: LinkValidator + 'static>(mut self, validator: V) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn nodes_model(&self) -> Rc<VecModel<N>> {
        self.nodes.clone()
    }

    pub fn edges_model(&self) -> Rc<VecModel<GraphEdge>> {
        self.edges.clone()
    }

    /// Keep `model` in sync with the selection from now on.
    pub fn bind_selection_model(&mut self, model: Rc<VecModel<SharedString>>) {
        self.selection.sync_to_model(&model);
        self.selection_model = Some(model);
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn node_count(&self) -> usize {
        self.nodes.row_count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.row_count()
    }

    pub fn node(&self, id: &str) -> Option<N> {
        self.node_index(id).and_then(|i| self.nodes.row_data(i))
    }

    pub fn edge(&self, id: &str) -> Option<GraphEdge> {
        self.edge_index(id).and_then(|i| self.edges.row_data(i))
    }

    /// Append a node, drawn above every existing node.
    pub fn add_node(&mut self, node: N) -> Result<(), EditorError> {
        if self.node_index(node.node_id()).is_some() {
            return Err(EditorError::Rejected(ValidationError::Custom(format!(
                "Node {} already exists",
                node.node_id()
            ))));
        }
        self.nodes.push(node);
        self.bump();
        Ok(())
    }

    /// Remove a node together with every edge touching it.
    ///
    /// Returns the ids of the removed edges.
    pub fn remove_node(&mut self, id: &str) -> Result<Vec<String>, EditorError> {
        let index = self
            .node_index(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.to_string()))?;
        self.nodes.remove(index);

        let connected = self.edges_connected_to(id);
        for edge_id in &connected {
            if let Some(i) = self.edge_index(edge_id) {
                self.edges.remove(i);
            }
        }

        if self.selection.contains(id) {
            let remaining: Vec<String> = self.selection.iter().filter(|s| *s != id).cloned().collect();
            self.set_selection(remaining);
        }
        self.bump();
        Ok(connected)
    }

    /// Ids of all edges starting or ending at `node_id`.
    pub fn edges_connected_to(&self, node_id: &str) -> Vec<String> {
        self.edges
            .iter()
            .filter(|e| e.from_node_id == node_id || e.to_node_id == node_id)
            .map(|e| e.id)
            .collect()
    }

    /// Validate and insert an edge. Returns the new edge id.
    pub fn add_edge(&mut self, source_id: &str, target_id: &str, sides: LinkSides) -> Result<String, EditorError> {
        let nodes = self.nodes();
        let edges = self.edges();
        self.validator
            .validate(source_id, target_id, &nodes, &edges)
            .into_result()?;

        let id = self.next_edge_id();
        self.edges.push(
            GraphEdge::new(id.clone(), source_id, target_id)
                .with_sides(sides.source_side, sides.target_side),
        );
        self.bump();
        Ok(id)
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<GraphEdge, EditorError> {
        let index = self
            .edge_index(id)
            .ok_or_else(|| EditorError::EdgeNotFound(id.to_string()))?;
        let edge = self.edges.remove(index);
        self.bump();
        Ok(edge)
    }

    /// First free id of the form `eN`.
    pub fn next_edge_id(&self) -> String {
        (1..)
            .map(|n| format!("e{}", n))
            .find(|id| self.edge_index(id).is_none())
            .unwrap_or_default()
    }

    /// Click selection: a plain click selects only `id`, an extending click
    /// (shift) toggles it.
    pub fn select_node(&mut self, id: &str, extend: bool) {
        if self.node_index(id).is_none() {
            return;
        }
        self.selection.handle_interaction(id, extend);
        if let Some(model) = &self.selection_model {
            self.selection.sync_to_model(model);
        }
    }

    /// Adopt the bound selection model's contents, after the UI edited it.
    ///
    /// Ids of nodes that do not exist are dropped.
    pub fn pull_selection(&mut self) {
        let Some(model) = self.selection_model.clone() else {
            return;
        };
        self.selection.sync_from_model(&*model);
        let live: Vec<String> = self
            .selection
            .sorted_ids()
            .into_iter()
            .filter(|id| self.node_index(id).is_some())
            .collect();
        if live.len() != self.selection.len() {
            self.set_selection(live);
        }
    }

    /// Replace the selection and push it to the bound model.
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.replace_selection(ids);
        if let Some(model) = &self.selection_model {
            self.selection.sync_to_model(model);
        }
    }

    fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.node_id() == id)
    }

    fn edge_index(&self, id: &str) -> Option<usize> {
        self.edges.iter().position(|e| e.id == id)
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

impl<N: MovableNode> GraphHost for GraphModel<N> {
    fn nodes(&self) -> Vec<GraphNode> {
        self.nodes.iter().map(|n| n.to_graph_node()).collect()
    }

    fn edges(&self) -> Vec<GraphEdge> {
        self.edges.iter().collect()
    }

    fn selected_ids(&self) -> Option<Vec<String>> {
        Some(self.selection.sorted_ids())
    }
}

impl<N: MovableNode> IntentSink for GraphModel<N> {
    fn on_node_move(&mut self, node_id: &str, position: Point) -> Result<(), EditorError> {
        let index = self
            .node_index(node_id)
            .ok_or_else(|| EditorError::NodeNotFound(node_id.to_string()))?;
        if let Some(mut node) = self.nodes.row_data(index) {
            node.set_position(position);
            self.nodes.set_row_data(index, node);
        }
        self.bump();
        Ok(())
    }

    /// Moves every node or none.
    fn on_multi_node_move(&mut self, node_ids: &[String], delta: Point) -> Result<(), EditorError> {
        if let Some(missing) = node_ids.iter().find(|id| self.node_index(id).is_none()) {
            return Err(EditorError::NodeNotFound(missing.clone()));
        }
        for i in 0..self.nodes.row_count() {
            if let Some(mut node) = self.nodes.row_data(i) {
                if node_ids.iter().any(|id| id == node.node_id()) {
                    node.set_position(node.position() + delta);
                    self.nodes.set_row_data(i, node);
                }
            }
        }
        self.bump();
        Ok(())
    }

    fn on_link_complete(&mut self, source_id: &str, target_id: &str, sides: LinkSides) -> Result<(), EditorError> {
        let id = self.add_edge(source_id, target_id, sides)?;
        log::debug!("created edge {} from {} to {}", id, source_id, target_id);
        Ok(())
    }

    /// Reconnect one end of an edge, validated against the other edges.
    fn on_link_update(
        &mut self,
        edge_id: &str,
        handle: Handle,
        target_id: &str,
        side: Option<Side>,
    ) -> Result<(), EditorError> {
        let index = self
            .edge_index(edge_id)
            .ok_or_else(|| EditorError::EdgeNotFound(edge_id.to_string()))?;
        let Some(mut edge) = self.edges.row_data(index) else {
            return Err(EditorError::EdgeNotFound(edge_id.to_string()));
        };

        match handle {
            Handle::Source => {
                edge.from_node_id = target_id.to_string();
                edge.from_side = side;
            }
            Handle::Target => {
                edge.to_node_id = target_id.to_string();
                edge.to_side = side;
            }
        }

        let nodes = self.nodes();
        let others: Vec<GraphEdge> = self.edges.iter().filter(|e| e.id != edge_id).collect();
        self.validator
            .validate(&edge.from_node_id, &edge.to_node_id, &nodes, &others)
            .into_result()?;

        self.edges.set_row_data(index, edge);
        self.bump();
        Ok(())
    }

    fn on_link_delete(&mut self, edge_id: &str) -> Result<(), EditorError> {
        self.remove_edge(edge_id).map(|_| ())
    }

    fn on_box_select_end(&mut self, node_ids: &[String]) -> Result<(), EditorError> {
        self.set_selection(node_ids.iter().cloned());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
