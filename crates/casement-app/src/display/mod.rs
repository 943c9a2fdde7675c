//! UI-thread state: the renderer, the controllers it serves, and the
//! viewport the root window fills.

mod headless;
mod renderer;
mod terminal;

pub use headless::{HeadlessRenderer, RenderLog, RenderOp};
pub use renderer::Renderer;
pub use terminal::TerminalRenderer;

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use casement_common::{keycode, Event, EventQueue, Rect, TaskChannel};
use casement_tiling::{LayoutEngine, WindowId};
use tracing::{debug, info};

use crate::controller::{Controller, Input, InputWatch};

// =============================================================================
// SURFACE
// =============================================================================

#[derive(Debug, Default)]
struct Typeahead {
    lines: VecDeque<String>,
    closed: bool,
}

/// What every controller shares: the renderer, the queues to the program
/// thread, and the set of windows waiting for input.
///
/// Everything here is touched from the UI thread only, except `channel`
/// and `events`, which are the two ways across.
pub struct Surface {
    renderer: Mutex<Box<dyn Renderer>>,
    events: Arc<EventQueue>,
    channel: TaskChannel,
    layout: LayoutEngine,
    controllers: Mutex<HashMap<WindowId, Weak<Controller>>>,
    watches: Mutex<BTreeMap<WindowId, InputWatch>>,
    typeahead: Mutex<Typeahead>,
}

impl Surface {
    pub fn new(
        renderer: Box<dyn Renderer>,
        events: Arc<EventQueue>,
        channel: TaskChannel,
        layout: LayoutEngine,
    ) -> Arc<Self> {
        Arc::new(Self {
            renderer: Mutex::new(renderer),
            events,
            channel,
            layout,
            controllers: Mutex::new(HashMap::new()),
            watches: Mutex::new(BTreeMap::new()),
            typeahead: Mutex::new(Typeahead::default()),
        })
    }

    pub fn events(&self) -> &Arc<EventQueue> {
        &self.events
    }

    pub fn channel(&self) -> &TaskChannel {
        &self.channel
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub(crate) fn renderer(&self) -> MutexGuard<'_, Box<dyn Renderer>> {
        self.renderer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn register(&self, controller: &Arc<Controller>) {
        lock(&self.controllers).insert(controller.window(), Arc::downgrade(controller));
    }

    pub(crate) fn unregister(&self, window: WindowId) {
        lock(&self.controllers).remove(&window);
    }

    /// The live controller for `window`, if it has been adopted and not
    /// yet closed.
    pub fn controller(&self, window: WindowId) -> Option<Arc<Controller>> {
        lock(&self.controllers).get(&window).and_then(Weak::upgrade)
    }

    pub(crate) fn watch(self: &Arc<Self>, window: WindowId, watch: InputWatch) {
        self.renderer().watch(window, watch.clone());
        let text_input = !matches!(watch, InputWatch::Mouse);
        lock(&self.watches).insert(window, watch);
        let held = {
            let typeahead = lock(&self.typeahead);
            typeahead.closed || !typeahead.lines.is_empty()
        };
        if text_input && held {
            let this = Arc::clone(self);
            if let Err(e) = self.channel.defer(move || this.drain_typeahead()) {
                debug!("typeahead not scheduled: {e}");
            }
        }
    }

    pub(crate) fn unwatch(&self, window: WindowId) {
        if lock(&self.watches).remove(&window).is_some() {
            self.renderer().unwatch(window);
        }
    }

    /// Windows that can take typed text, best first: those waiting for a
    /// line, then those waiting for a key. A watch whose request has
    /// already ended is skipped even before its sync pass drops it.
    pub fn text_targets(&self) -> Vec<(Arc<Controller>, InputWatch)> {
        let (lines, keys): (Vec<_>, Vec<_>) = lock(&self.watches)
            .iter()
            .filter(|(_, w)| !matches!(w, InputWatch::Mouse))
            .map(|(id, w)| (*id, w.clone()))
            .partition(|(_, w)| matches!(w, InputWatch::Line { .. }));
        lines
            .into_iter()
            .chain(keys)
            .filter_map(|(id, watch)| {
                let controller = self.controller(id)?;
                let waiting = controller
                    .pending_request()
                    .is_some_and(|request| request.is_pending());
                waiting.then_some((controller, watch))
            })
            .collect()
    }

    /// The window the next line of typed text would go to.
    pub fn text_target(&self) -> Option<(WindowId, InputWatch)> {
        self.text_targets()
            .into_iter()
            .next()
            .map(|(controller, watch)| (controller.window(), watch))
    }

    /// Route one line of typed text. Returns `false` when nobody can take
    /// it yet; the text is then held until a window starts watching.
    pub fn deliver_text(&self, text: &str) -> bool {
        if self.route_text(text) {
            return true;
        }
        debug!("holding typeahead until a window waits for text");
        lock(&self.typeahead).lines.push_back(text.to_string());
        false
    }

    /// End of typed input. Shuts the display down once held text has been
    /// consumed.
    pub fn end_of_input(&self) {
        let idle = {
            let mut typeahead = lock(&self.typeahead);
            typeahead.closed = true;
            typeahead.lines.is_empty()
        };
        if idle {
            self.shutdown();
        }
    }

    /// Stop the program thread: flag the queue and wake a blocked pop.
    pub fn shutdown(&self) {
        info!("display shutting down");
        self.events.interrupt();
        self.events.push(Event::none());
    }

    fn route_text(&self, text: &str) -> bool {
        self.text_targets().into_iter().any(|(controller, watch)| {
            let input = match watch {
                InputWatch::Line { .. } => Input::Line {
                    text: text.to_string(),
                    terminator: keycode::RETURN,
                },
                _ => Input::Char(text.chars().next().map_or(keycode::RETURN, u32::from)),
            };
            controller.deliver(input)
        })
    }

    /// Runs when a window starts waiting for text: hands it the oldest held
    /// line, or shuts down if input has ended and nothing is held.
    fn drain_typeahead(&self) {
        let next = {
            let mut typeahead = lock(&self.typeahead);
            match typeahead.lines.pop_front() {
                Some(line) => Some(line),
                None if typeahead.closed => None,
                None => return,
            }
        };
        match next {
            Some(line) => {
                if !self.route_text(&line) {
                    lock(&self.typeahead).lines.push_front(line);
                }
            }
            None => self.shutdown(),
        }
    }
}

// =============================================================================
// DISPLAY
// =============================================================================

/// The root of the UI-thread side: which controller fills the viewport and
/// how big the viewport is.
pub struct Display {
    surface: Arc<Surface>,
    root: Mutex<Option<Arc<Controller>>>,
    viewport: Mutex<Rect>,
}

impl Display {
    pub fn new(surface: Arc<Surface>, width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            surface,
            root: Mutex::new(None),
            viewport: Mutex::new(Rect::new(0.0, 0.0, f64::from(width), f64::from(height))),
        })
    }

    pub fn surface(&self) -> &Arc<Surface> {
        &self.surface
    }

    /// Make freshly opened controllers reachable for input delivery.
    pub fn adopt(&self, controllers: &[Arc<Controller>]) {
        for controller in controllers {
            self.surface.register(controller);
        }
    }

    pub fn root(&self) -> Option<Arc<Controller>> {
        lock(&self.root).clone()
    }

    pub fn set_root(&self, root: Option<Arc<Controller>>) {
        *lock(&self.root) = root.clone();
        if let Some(root) = root {
            debug!(window = %root.window(), "new root");
            root.place(self.viewport());
        }
    }

    pub fn viewport(&self) -> Rect {
        *lock(&self.viewport)
    }

    /// Change the viewport, lay the tree out again and tell the program.
    pub fn resize(&self, width: u32, height: u32) {
        let viewport = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        *lock(&self.viewport) = viewport;
        if let Some(root) = self.root() {
            root.place(viewport);
        }
        self.surface.events.push(Event::arrange(None));
    }

    /// Hand renderer input to `window`'s pending request.
    pub fn deliver(&self, window: WindowId, input: Input) -> bool {
        self.surface
            .controller(window)
            .is_some_and(|controller| controller.deliver(input))
    }

    pub fn deliver_text(&self, text: &str) -> bool {
        self.surface.deliver_text(text)
    }

    /// Cancel whatever `window` is waiting for, from the UI side.
    pub fn cancel(&self, window: WindowId) -> bool {
        self.surface
            .controller(window)
            .is_some_and(|controller| controller.cancel_request(|_| true))
    }

    /// Run every outstanding synchronization, parents before children.
    pub fn settle(&self) {
        if let Some(root) = self.root() {
            root.settle();
        }
    }

    pub fn end_of_input(&self) {
        self.surface.end_of_input();
    }

    pub fn shutdown(&self) {
        self.surface.shutdown();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests;
