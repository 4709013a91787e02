//! Scoped installation of global pointer listeners.
//!
//! Hosts route move/up events to the engine only while a gesture is live.
//! [`ListenerGuard`] installs on acquisition and removes on drop, so every way
//! out of a session (release, cancel, stale-reference abort) uninstalls.

use std::cell::Cell;
use std::rc::Rc;

/// Host hook that installs and removes the global move/up listeners.
pub trait GestureListeners {
    fn install(&self);
    fn remove(&self);
}

/// Holds the listeners installed for the lifetime of one session.
pub struct ListenerGuard {
    listeners: Rc<dyn GestureListeners>,
}

impl ListenerGuard {
    pub fn acquire(listeners: Rc<dyn GestureListeners>) -> Self {
        listeners.install();
        Self { listeners }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.listeners.remove();
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").finish_non_exhaustive()
    }
}

/// A [`GestureListeners`] that records whether listeners are installed.
///
/// Suitable for toolkits where the host filters move/up events itself.
#[derive(Debug, Default)]
pub struct ListenerFlag {
    installed: Cell<bool>,
    installs: Cell<usize>,
}

impl ListenerFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.installed.get()
    }

    /// Number of times listeners were installed.
    pub fn install_count(&self) -> usize {
        self.installs.get()
    }
}

impl GestureListeners for ListenerFlag {
    fn install(&self) {
        self.installed.set(true);
        self.installs.set(self.installs.get() + 1);
    }

    fn remove(&self) {
        self.installed.set(false);
    }
}
