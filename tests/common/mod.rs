//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use graph_gesture_core::{
    EditorError, GraphEdge, GraphHost, GraphNode, Handle, IntentSink, LinkSides, Point, Side,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Tracks callback invocations for testing.
///
/// Each field records calls to the corresponding intent callback with their
/// arguments.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// (node_id, position)
    pub node_moved: Rc<RefCell<Vec<(String, Point)>>>,
    /// (node_ids, delta)
    pub multi_node_moved: Rc<RefCell<Vec<(Vec<String>, Point)>>>,
    /// (source_id, target_id, sides)
    pub link_completed: Rc<RefCell<Vec<(String, String, LinkSides)>>>,
    /// (edge_id, handle, target_id, side)
    pub link_updated: Rc<RefCell<Vec<(String, Handle, String, Option<Side>)>>>,
    /// edge_id
    pub link_deleted: Rc<RefCell<Vec<String>>>,
    /// selected node ids
    pub box_selected: Rc<RefCell<Vec<Vec<String>>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded callbacks.
    pub fn clear(&self) {
        self.node_moved.borrow_mut().clear();
        self.multi_node_moved.borrow_mut().clear();
        self.link_completed.borrow_mut().clear();
        self.link_updated.borrow_mut().clear();
        self.link_deleted.borrow_mut().clear();
        self.box_selected.borrow_mut().clear();
    }

    /// Number of callbacks recorded across all kinds.
    pub fn total(&self) -> usize {
        self.node_moved.borrow().len()
            + self.multi_node_moved.borrow().len()
            + self.link_completed.borrow().len()
            + self.link_updated.borrow().len()
            + self.link_deleted.borrow().len()
            + self.box_selected.borrow().len()
    }
}

/// A host that serves a fixed graph and records every intent without
/// applying it.
#[derive(Default, Clone)]
pub struct RecordingHost {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Subtracted from raw pointer positions
    pub pan: Point,
    pub tracker: CallbackTracker,
}

impl RecordingHost {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges, ..Self::default() }
    }

    pub fn remove_node(&mut self, id: &str) {
        self.nodes.retain(|n| n.id != id);
    }

    pub fn remove_edge(&mut self, id: &str) {
        self.edges.retain(|e| e.id != id);
    }
}

impl GraphHost for RecordingHost {
    fn nodes(&self) -> Vec<GraphNode> {
        self.nodes.clone()
    }

    fn edges(&self) -> Vec<GraphEdge> {
        self.edges.clone()
    }

    fn content_offset(&self, pointer: Point) -> Point {
        pointer - self.pan
    }
}

impl IntentSink for RecordingHost {
    fn on_node_move(&mut self, node_id: &str, position: Point) -> Result<(), EditorError> {
        self.tracker.node_moved.borrow_mut().push((node_id.to_string(), position));
        Ok(())
    }

    fn on_multi_node_move(&mut self, node_ids: &[String], delta: Point) -> Result<(), EditorError> {
        self.tracker.multi_node_moved.borrow_mut().push((node_ids.to_vec(), delta));
        Ok(())
    }

    fn on_link_complete(&mut self, source_id: &str, target_id: &str, sides: LinkSides) -> Result<(), EditorError> {
        self.tracker
            .link_completed
            .borrow_mut()
            .push((source_id.to_string(), target_id.to_string(), sides));
        Ok(())
    }

    fn on_link_update(
        &mut self,
        edge_id: &str,
        handle: Handle,
        target_id: &str,
        side: Option<Side>,
    ) -> Result<(), EditorError> {
        self.tracker
            .link_updated
            .borrow_mut()
            .push((edge_id.to_string(), handle, target_id.to_string(), side));
        Ok(())
    }

    fn on_link_delete(&mut self, edge_id: &str) -> Result<(), EditorError> {
        self.tracker.link_deleted.borrow_mut().push(edge_id.to_string());
        Ok(())
    }

    fn on_box_select_end(&mut self, node_ids: &[String]) -> Result<(), EditorError> {
        self.tracker.box_selected.borrow_mut().push(node_ids.to_vec());
        Ok(())
    }
}
