//! Window tree operations.

use std::sync::Arc;

use casement_common::{TreeError, WindowKind};
use casement_tiling::{Arrangement, KeyChoice, Split, Window, WindowId};
use tracing::{debug, warn};

use super::Session;
use crate::controller::Controller;

impl Session {
    /// Open a window of kind `kind`.
    ///
    /// With `split` unset this opens the root, which fails if one exists.
    /// Otherwise `split` is divided by `method`/`size` and the new window
    /// becomes the key of the new pair. Failures are logged and yield
    /// `None`.
    pub fn open_window(
        &mut self,
        split: Option<WindowId>,
        method: u32,
        size: u32,
        kind: u32,
        rock: u32,
    ) -> Option<WindowId> {
        match self.try_open(split, method, size, kind, rock) {
            Ok(window) => Some(window),
            Err(e) => {
                warn!("open_window failed: {e}");
                None
            }
        }
    }

    fn try_open(
        &mut self,
        split: Option<WindowId>,
        method: u32,
        size: u32,
        kind: u32,
        rock: u32,
    ) -> Result<WindowId, TreeError> {
        let kind = WindowKind::from_raw(kind).ok_or(TreeError::UnknownKind(kind))?;
        let surface = Arc::clone(self.display.surface());
        let make = move |id, kind| Controller::new(id, kind, Arc::clone(&surface));

        let Some(target) = split else {
            let window = self.tree.open_root(kind, rock, make)?;
            self.adopt(&[window]);
            self.publish_root();
            return Ok(window);
        };

        let arrangement = Arrangement::from_method(method, size)?;
        let Split { window, pair } =
            self.tree
                .split(target, kind, rock, arrangement, KeyChoice::New, make)?;
        self.adopt(&[window, pair]);
        self.refresh_layout(pair);
        self.refresh_holder(pair);
        Ok(window)
    }

    /// Close `window` and everything under it. Its sibling takes the
    /// place of the collapsed pair.
    pub fn close_window(&mut self, window: WindowId) -> bool {
        let detached = match self.tree.detach(window) {
            Ok(detached) => detached,
            Err(e) => {
                warn!("close_window failed: {e}");
                return false;
            }
        };

        // The display sees the restructured tree before anything is torn
        // down.
        match detached.sibling {
            Some(sibling) => self.refresh_holder(sibling),
            None => self.publish_root(),
        }
        for &pair in &detached.reset_keys {
            if self.tree.get(pair).is_some_and(Window::is_open) {
                self.refresh_layout(pair);
            }
        }

        let closed: Vec<_> = self
            .tree
            .reap(detached)
            .into_iter()
            .map(|window| {
                self.line_options.remove(&window.id());
                window.into_controller()
            })
            .collect();
        debug!(window = %window, released = closed.len(), "closed window");
        self.post("close", move || {
            for controller in closed {
                controller.close();
            }
        })
    }

    /// Replace a pair's arrangement and key window.
    pub fn set_arrangement(
        &mut self,
        pair: WindowId,
        method: u32,
        size: u32,
        key: Option<WindowId>,
    ) -> bool {
        let result = Arrangement::from_method(method, size)
            .and_then(|arrangement| self.tree.rearrange(pair, key, arrangement));
        match result {
            Ok(_) => {
                self.refresh_layout(pair);
                true
            }
            Err(e) => {
                warn!("set_arrangement failed: {e}");
                false
            }
        }
    }

    /// `(method, size, key)` of a pair window.
    pub fn get_arrangement(&self, pair: WindowId) -> Option<(u32, u32, Option<WindowId>)> {
        let data = self.tree.pair(pair)?;
        Some((data.arrangement.method(), data.arrangement.magnitude(), data.key))
    }

    pub fn get_root(&self) -> Option<WindowId> {
        self.tree.root()
    }

    pub fn get_parent(&self, window: WindowId) -> Option<WindowId> {
        self.tree.parent(window)
    }

    pub fn get_sibling(&self, window: WindowId) -> Option<WindowId> {
        self.tree.sibling(window)
    }

    pub fn get_rock(&self, window: WindowId) -> Option<u32> {
        self.tree.rock(window)
    }

    pub fn get_type(&self, window: WindowId) -> Option<WindowKind> {
        self.tree.kind(window)
    }

    /// The window after `after` in handle order, with its rock. `None`
    /// starts from the beginning.
    pub fn iterate_windows(&self, after: Option<WindowId>) -> Option<(WindowId, u32)> {
        let next = self.tree.iter_after(after)?;
        Some((next, self.tree.rock(next)?))
    }

    /// Size of `window` in its own units once every pending layout change
    /// has been applied.
    pub fn get_size(&self, window: WindowId) -> Option<(u32, u32)> {
        let controller = self.controller(window)?;
        let display = Arc::clone(&self.display);
        self.send("get_size", move || {
            display.settle();
            controller.size_in_units()
        })
        .flatten()
    }

    pub fn put_text(&self, window: WindowId, text: &str) -> bool {
        let Some(controller) = self.controller(window) else {
            warn!(window = %window, "put_text to unknown window");
            return false;
        };
        let text = text.to_string();
        self.post("put_text", move || controller.print(&text))
    }
}
