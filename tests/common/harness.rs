//! Test harness around the interaction engine.
//!
//! Provides a small graph with callback tracking and helper methods for
//! simulating pointer gestures the way a UI would forward them.

#![allow(dead_code)]

use super::{CallbackTracker, RecordingHost};
use graph_gesture_core::{
    EditorConfig, GraphEdge, GraphNode, Intent, InteractionEngine, ListenerFlag, Modifiers, Point,
    PointerButton, PointerTarget,
};
use std::rc::Rc;

/// Engine + recording host with listener tracking.
pub struct EngineHarness {
    pub engine: InteractionEngine,
    pub host: RecordingHost,
    pub listeners: Rc<ListenerFlag>,
}

impl EngineHarness {
    /// Three 140x80 nodes: A at (0, 0), B at (300, 0), C at (0, 200), and an
    /// edge A -> B.
    pub fn new() -> Self {
        Self::with_graph(
            vec![
                GraphNode::new("A", 0.0, 0.0, 140.0, 80.0),
                GraphNode::new("B", 300.0, 0.0, 140.0, 80.0),
                GraphNode::new("C", 0.0, 200.0, 140.0, 80.0),
            ],
            vec![GraphEdge::new("e1", "A", "B")],
        )
    }

    pub fn with_graph(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self::with_config(nodes, edges, EditorConfig::default())
    }

    pub fn with_config(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>, config: EditorConfig) -> Self {
        let listeners = Rc::new(ListenerFlag::new());
        Self {
            engine: InteractionEngine::new(config).with_listeners(listeners.clone()),
            host: RecordingHost::new(nodes, edges),
            listeners,
        }
    }

    pub fn tracker(&self) -> &CallbackTracker {
        &self.host.tracker
    }

    /// Press at a position, letting the engine resolve the target.
    pub fn press(&mut self, x: f32, y: f32, modifiers: Modifiers) -> bool {
        let target = self.engine.target_at(&self.host, Point::new(x, y));
        self.press_on(target, x, y, modifiers)
    }

    pub fn press_on(&mut self, target: PointerTarget, x: f32, y: f32, modifiers: Modifiers) -> bool {
        self.engine
            .pointer_down(&self.host, Point::new(x, y), target, PointerButton::Primary, modifiers)
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.engine.pointer_move(&self.host, Point::new(x, y));
    }

    /// Release and dispatch the emitted intents to the recording host.
    pub fn release(&mut self, x: f32, y: f32) -> Vec<Intent> {
        let intents = self.engine.pointer_up(&self.host, Point::new(x, y));
        for intent in intents.iter().cloned() {
            intent
                .dispatch(&mut self.host)
                .expect("recording host accepts everything");
        }
        intents
    }

    /// Press, move through `path`, and release at its last point.
    pub fn gesture(&mut self, from: (f32, f32), path: &[(f32, f32)], modifiers: Modifiers) -> Vec<Intent> {
        self.press(from.0, from.1, modifiers);
        for &(x, y) in path {
            self.move_to(x, y);
        }
        let (x, y) = path.last().copied().unwrap_or(from);
        self.release(x, y)
    }
}
