//! The program-facing side of the runtime.
//!
//! A [`Session`] lives on the program thread and owns the window tree.
//! Every change it makes is mirrored to the UI thread by posting work to
//! the display's task channel; answers come back through `send_task` or
//! the event queue. Nothing else crosses between the two threads.

mod events;
mod input;
mod windows;

pub use input::LineOptions;

use std::collections::HashMap;
use std::sync::Arc;

use casement_common::{EventQueue, TaskChannel};
use casement_config::RuntimeConfig;
use casement_tiling::{WindowId, WindowTree};
use tracing::warn;

use crate::controller::{Controller, PairLayout};
use crate::display::Display;
use crate::timer::TimerSource;

pub struct Session {
    tree: WindowTree<Arc<Controller>>,
    display: Arc<Display>,
    channel: TaskChannel,
    events: Arc<EventQueue>,
    runtime: RuntimeConfig,
    line_options: HashMap<WindowId, LineOptions>,
    timer: Option<TimerSource>,
}

impl Session {
    pub fn new(display: Arc<Display>, runtime: RuntimeConfig) -> Self {
        let channel = display.surface().channel().clone();
        let events = Arc::clone(display.surface().events());
        Self {
            tree: WindowTree::new(),
            display,
            channel,
            events,
            runtime,
            line_options: HashMap::new(),
            timer: None,
        }
    }

    pub fn display(&self) -> &Arc<Display> {
        &self.display
    }

    pub fn tree(&self) -> &WindowTree<Arc<Controller>> {
        &self.tree
    }

    // =========================================================================
    // UI THREAD HAND-OFF
    // =========================================================================

    /// Run `work` on the UI thread without waiting for it.
    fn post(&self, what: &str, work: impl FnOnce() + Send + 'static) -> bool {
        match self.channel.post_task(work) {
            Ok(()) => true,
            Err(e) => {
                warn!("{what} not delivered to the display: {e}");
                false
            }
        }
    }

    /// Run `work` on the UI thread and wait for its answer.
    fn send<R: Send + 'static>(
        &self,
        what: &str,
        work: impl FnOnce() -> R + Send + 'static,
    ) -> Option<R> {
        match self.channel.send_task(work) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{what} failed on the display: {e}");
                None
            }
        }
    }

    fn controller(&self, window: WindowId) -> Option<Arc<Controller>> {
        self.tree.controller(window).cloned()
    }

    /// Mirror a pair's current children, key and arrangement to its
    /// controller.
    fn refresh_layout(&self, pair: WindowId) {
        let Some(data) = self.tree.pair(pair) else {
            return;
        };
        let (Some(controller), Some(first), Some(second)) = (
            self.controller(pair),
            self.controller(data.first),
            self.controller(data.second),
        ) else {
            return;
        };
        let layout = PairLayout {
            arrangement: data.arrangement,
            key_kind: data.key.and_then(|key| self.tree.kind(key)),
            first,
            second,
        };
        self.post("layout", move || controller.set_layout(layout));
    }

    /// Re-lay out whatever now holds `window`: its parent pair, or the
    /// viewport if it is the root.
    fn refresh_holder(&self, window: WindowId) {
        match self.tree.parent(window) {
            Some(parent) => self.refresh_layout(parent),
            None => self.publish_root(),
        }
    }

    fn publish_root(&self) {
        let root = self.tree.root().and_then(|root| self.controller(root));
        let display = Arc::clone(&self.display);
        self.post("root", move || display.set_root(root));
    }

    fn adopt(&self, windows: &[WindowId]) {
        let controllers: Vec<_> = windows.iter().filter_map(|&w| self.controller(w)).collect();
        let display = Arc::clone(&self.display);
        self.post("adopt", move || display.adopt(&controllers));
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }
}

#[cfg(test)]
mod tests;
