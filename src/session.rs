//! Transient gesture state.
//!
//! [`InteractionSession`] is a single tagged value: at most one gesture is in
//! progress, and the engine holds it as `Option<InteractionSession>` where
//! `None` is idle.

use crate::cutting::CuttingSession;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which endpoint of an edge is being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Source,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys forwarded by the host with each pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, meta: false, alt: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, meta: false, alt: false };
    pub const CTRL: Modifiers = Modifiers { shift: false, ctrl: true, meta: false, alt: false };

    /// Held modifier starts a link from a node
    pub fn link(&self) -> bool {
        self.shift
    }

    /// Held modifier turns a canvas drag into a cutting line
    pub fn cut(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the pointer went down on, as resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Node(String),
    EdgeHandle { edge_id: String, handle: Handle },
    /// The body of an edge's curve, away from its handles
    Edge(String),
    Canvas,
}

/// The gesture currently in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionSession {
    /// One node follows the pointer from the point where it was grabbed.
    DraggingSingle { node_id: String, pointer_offset: Point },
    /// Every selected node moves by the net pointer displacement.
    DraggingMultiple { node_ids: Vec<String>, drag_start: Point },
    /// A new edge is being drawn out of `source_id`.
    Linking { source_id: String },
    /// One endpoint of an existing edge is being re-attached.
    ModifyingEdge { edge_id: String, handle: Handle },
    /// Rubber-band selection; corners in any order.
    BoxSelecting { start: Point, current: Point },
    Cutting(CuttingSession),
}

impl InteractionSession {
    pub fn kind(&self) -> SessionKind {
        match self {
            Self::DraggingSingle { .. } => SessionKind::DraggingSingle,
            Self::DraggingMultiple { .. } => SessionKind::DraggingMultiple,
            Self::Linking { .. } => SessionKind::Linking,
            Self::ModifyingEdge { .. } => SessionKind::ModifyingEdge,
            Self::BoxSelecting { .. } => SessionKind::BoxSelecting,
            Self::Cutting(_) => SessionKind::Cutting,
        }
    }

    /// Whether pointer moves look for snap points
    pub fn uses_snapping(&self) -> bool {
        matches!(self, Self::Linking { .. } | Self::ModifyingEdge { .. })
    }
}

/// Fieldless mirror of the session variants, `Idle` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionKind {
    #[default]
    Idle,
    DraggingSingle,
    DraggingMultiple,
    Linking,
    ModifyingEdge,
    BoxSelecting,
    Cutting,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::DraggingSingle => "dragging-single",
            Self::DraggingMultiple => "dragging-multiple",
            Self::Linking => "linking",
            Self::ModifyingEdge => "modifying-edge",
            Self::BoxSelecting => "box-selecting",
            Self::Cutting => "cutting",
        };
        f.write_str(name)
    }
}
