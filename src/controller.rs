//! High-level controller wiring the interaction engine to a host.
//!
//! The [`EditorController`] owns the engine, the host, and the edge path
//! manager behind shared handles, and hands out callbacks for the UI's
//! pointer events. Intents produced on release are dispatched to the host
//! immediately; rejected intents are logged.
//!
//! # Example
//!
//! ```ignore
//! use graph_gesture_core::{EditorConfig, EditorController, GraphModel};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = EditorController::new(GraphModel::default(), EditorConfig::default());
//!
//!     window.set_nodes(ModelRc::from(ctrl.host().borrow().nodes_model()));
//!     window.on_pointer_down(ctrl.pointer_down_callback());
//!     window.on_pointer_move(ctrl.pointer_move_callback());
//!     window.on_pointer_up(ctrl.pointer_up_callback());
//!
//!     window.on_compute_link_preview({
//!         let ctrl = ctrl.clone();
//!         move || ctrl.compute_link_preview_path()
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::config::EditorConfig;
use crate::edges::EdgePathManager;
use crate::engine::InteractionEngine;
use crate::geometry::Point;
use crate::hit_test::find_edge_at;
use crate::host::{edge_shapes, GraphHost, Intent, IntentSink};
use crate::listeners::ListenerFlag;
use crate::session::{Modifiers, PointerButton, PointerTarget};
use slint::SharedString;
use std::cell::RefCell;
use std::rc::Rc;

/// Controller that shares one engine and one host across UI callbacks.
///
/// Clone this controller to share it across callbacks.
pub struct EditorController<H> {
    engine: Rc<RefCell<InteractionEngine>>,
    host: Rc<RefCell<H>>,
    listening: Rc<ListenerFlag>,
    edge_paths: Rc<RefCell<EdgePathManager>>,
}

impl<H> Clone for EditorController<H> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            host: self.host.clone(),
            listening: self.listening.clone(),
            edge_paths: self.edge_paths.clone(),
        }
    }
}

impl<H: GraphHost + IntentSink + 'static> EditorController<H> {
    pub fn new(host: H, config: EditorConfig) -> Self {
        Self::from_shared(Rc::new(RefCell::new(host)), config)
    }

    /// Use a host that is already shared with other parts of the app.
    pub fn from_shared(host: Rc<RefCell<H>>, config: EditorConfig) -> Self {
        let listening = Rc::new(ListenerFlag::new());
        let engine = InteractionEngine::new(config).with_listeners(listening.clone());
        let ctrl = Self {
            engine: Rc::new(RefCell::new(engine)),
            host,
            listening,
            edge_paths: Rc::new(RefCell::new(EdgePathManager::new())),
        };
        ctrl.refresh_edge_paths();
        ctrl
    }

    pub fn engine(&self) -> Rc<RefCell<InteractionEngine>> {
        self.engine.clone()
    }

    pub fn host(&self) -> Rc<RefCell<H>> {
        self.host.clone()
    }

    pub fn edge_paths(&self) -> Rc<RefCell<EdgePathManager>> {
        self.edge_paths.clone()
    }

    /// Whether move/up events are currently routed to the engine.
    pub fn is_listening(&self) -> bool {
        self.listening.is_installed()
    }

    /// Recompute edge paths, e.g. after the host's graph changed outside a
    /// gesture.
    pub fn refresh_edge_paths(&self) {
        let engine = self.engine.borrow();
        let host = self.host.borrow();
        self.edge_paths.borrow_mut().update_paths(&engine, &*host);
    }

    // === Callback factories ===

    /// Returns a callback for `pointer-down(x, y, shift, ctrl)`.
    ///
    /// The target is resolved by hit-testing. Returns whether a gesture started.
    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32, bool, bool) -> bool {
        let ctrl = self.clone();
        move |x, y, shift, ctrl_key| {
            let modifiers = Modifiers { shift, ctrl: ctrl_key, ..Modifiers::NONE };
            ctrl.handle_pointer_down(x, y, PointerButton::Primary, modifiers)
        }
    }

    /// Returns a callback for `pointer-move(x, y)`.
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.handle_pointer_move(x, y)
    }

    /// Returns a callback for `pointer-up(x, y)`.
    pub fn pointer_up_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| {
            ctrl.handle_pointer_up(x, y);
        }
    }

    // === Direct handlers ===

    /// Hit-test the pointer position and start a gesture on whatever is there.
    pub fn handle_pointer_down(&self, x: f32, y: f32, button: PointerButton, modifiers: Modifiers) -> bool {
        let target = self.engine.borrow().target_at(&*self.host.borrow(), Point::new(x, y));
        self.handle_pointer_down_on(x, y, target, button, modifiers)
    }

    /// Start a gesture on a target the UI already resolved.
    pub fn handle_pointer_down_on(
        &self,
        x: f32,
        y: f32,
        target: PointerTarget,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> bool {
        let host = self.host.borrow();
        self.engine
            .borrow_mut()
            .pointer_down(&*host, Point::new(x, y), target, button, modifiers)
    }

    pub fn handle_pointer_move(&self, x: f32, y: f32) {
        if !self.is_listening() {
            return;
        }
        {
            let host = self.host.borrow();
            self.engine.borrow_mut().pointer_move(&*host, Point::new(x, y));
        }
        self.refresh_edge_paths();
    }

    /// Finish the gesture and apply its intents to the host.
    ///
    /// Returns the intents that were emitted, whether or not the host
    /// accepted them.
    pub fn handle_pointer_up(&self, x: f32, y: f32) -> Vec<Intent> {
        if !self.is_listening() {
            return Vec::new();
        }
        let intents = {
            let host = self.host.borrow();
            self.engine.borrow_mut().pointer_up(&*host, Point::new(x, y))
        };

        {
            let mut host = self.host.borrow_mut();
            for intent in intents.iter().cloned() {
                if let Err(err) = intent.dispatch(&mut *host) {
                    log::warn!("host rejected intent: {}", err);
                }
            }
        }
        self.refresh_edge_paths();
        intents
    }

    /// Abandon the gesture in progress (focus loss, escape).
    pub fn cancel(&self) {
        self.engine.borrow_mut().cancel();
        self.refresh_edge_paths();
    }

    // === Rendering helpers ===

    /// SVG path of the link being drawn, empty when there is none.
    pub fn compute_link_preview_path(&self) -> SharedString {
        let host = self.host.borrow();
        self.engine
            .borrow()
            .link_preview(&*host)
            .map(|curve| curve.to_svg_path())
            .unwrap_or_default()
            .into()
    }

    /// SVG polyline of the cutting line, empty when not cutting.
    pub fn compute_cut_path(&self) -> SharedString {
        self.engine
            .borrow()
            .cut_path()
            .map(|cut| cut.to_svg_path())
            .unwrap_or_default()
            .into()
    }

    /// Edge under the pointer for hover highlighting, empty when none is
    /// within `hover_distance`.
    pub fn find_edge_at_pointer(&self, x: f32, y: f32, hover_distance: f32) -> SharedString {
        let engine = self.engine.borrow();
        let host = self.host.borrow();
        let local = host.content_offset(Point::new(x, y));
        let shapes = edge_shapes(&engine.display_nodes(&*host), &host.edges(), engine.config());
        find_edge_at(local, &shapes, hover_distance, engine.config().cut_samples)
            .unwrap_or_default()
            .into()
    }
}
