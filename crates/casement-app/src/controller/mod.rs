//! Per-window orchestration on the UI thread.
//!
//! A controller owns its window's pending input request and its last known
//! box. Anything that changes either marks the controller dirty with
//! [`Controller::request_sync`]; the actual work happens in one deferred
//! [`Controller::synchronize`] pass, which is also the only place events
//! for the window are pushed.

mod input;

pub use input::{
    Input, InputRequest, InputWatch, LineBuffer, LineRequest, RequestKind, RequestStatus,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use casement_common::{Rect, UnitSize, WindowKind};
use casement_tiling::{Arrangement, WindowId};
use tracing::{debug, trace, warn};

use crate::display::Surface;

/// What a pair controller needs to lay out its children.
#[derive(Clone)]
pub struct PairLayout {
    pub arrangement: Arrangement,
    /// Kind of the key window, `None` when the pair has no key.
    pub key_kind: Option<WindowKind>,
    pub first: Arc<Controller>,
    pub second: Arc<Controller>,
}

#[derive(Default)]
struct ControllerState {
    request: Option<Arc<InputRequest>>,
    /// The renderer has been told to watch for `request`.
    watching: bool,
    layout: Option<PairLayout>,
    bounds: Option<Rect>,
    /// Bounds or layout changed since the last pass.
    dirty: bool,
    closed: bool,
}

pub struct Controller {
    window: WindowId,
    kind: WindowKind,
    surface: Arc<Surface>,
    needs_sync: AtomicBool,
    state: Mutex<ControllerState>,
}

impl Controller {
    pub fn new(window: WindowId, kind: WindowKind, surface: Arc<Surface>) -> Arc<Self> {
        Arc::new(Self {
            window,
            kind,
            surface,
            needs_sync: AtomicBool::new(false),
            state: Mutex::new(ControllerState::default()),
        })
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn needs_sync(&self) -> bool {
        self.needs_sync.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.lock().bounds
    }

    pub fn pending_request(&self) -> Option<Arc<InputRequest>> {
        self.lock().request.clone()
    }

    // =========================================================================
    // SYNCHRONIZATION
    // =========================================================================

    /// Mark the controller dirty and schedule one [`synchronize`] on the UI
    /// loop. Requests made before that pass runs collapse into it.
    ///
    /// [`synchronize`]: Self::synchronize
    pub fn request_sync(self: &Arc<Self>) {
        if self.needs_sync.swap(true, Ordering::AcqRel) {
            return;
        }
        let this = Arc::clone(self);
        if let Err(e) = self.surface.channel().defer(move || this.synchronize()) {
            warn!(window = %self.window, "sync not scheduled: {e}");
            self.needs_sync.store(false, Ordering::Release);
        }
    }

    /// Reconcile request state and layout with the renderer. UI thread only.
    pub fn synchronize(&self) {
        // Cleared first so a request_sync from inside this pass, or racing
        // with it, schedules another one.
        self.needs_sync.store(false, Ordering::Release);

        let placements = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            self.sync_request(&mut state);
            self.sync_layout(&mut state)
        };
        trace!(window = %self.window, children = placements.len(), "synchronized");
        for (child, bounds) in placements {
            child.place(bounds);
        }
    }

    fn sync_request(&self, state: &mut ControllerState) {
        let Some(request) = state.request.clone() else {
            return;
        };
        if request.is_pending() {
            if !state.watching {
                self.surface.watch(self.window, request.watch());
                state.watching = true;
            }
            return;
        }
        state.request = None;
        if std::mem::take(&mut state.watching) {
            self.surface.unwatch(self.window);
        }
        if let Some(event) = request.take_event(self.window) {
            debug!(window = %self.window, kind = ?event.kind, "input reported");
            self.surface.events().push(event);
        }
    }

    fn sync_layout(&self, state: &mut ControllerState) -> Vec<(Arc<Controller>, Rect)> {
        if !state.dirty {
            return Vec::new();
        }
        // Not placed yet; stays dirty until it is.
        let Some(bounds) = state.bounds else {
            return Vec::new();
        };
        state.dirty = false;

        match &state.layout {
            Some(layout) => {
                let mut renderer = self.surface.renderer();
                let key_unit = layout.key_kind.map(|kind| match kind {
                    WindowKind::Pair => UnitSize::PIXEL,
                    kind => renderer.unit_size(kind),
                });
                let boxes = self
                    .surface
                    .layout()
                    .compute(&layout.arrangement, key_unit, bounds);
                if let Some(strip) = boxes.border {
                    renderer.draw_border(self.window, strip);
                }
                vec![
                    (Arc::clone(&layout.first), boxes.first),
                    (Arc::clone(&layout.second), boxes.second),
                ]
            }
            None if self.kind != WindowKind::Pair => {
                self.surface.renderer().place(self.window, self.kind, bounds);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Synchronize this controller and then everything below it, so the
    /// whole subtree reflects every change made so far.
    pub fn settle(&self) {
        self.synchronize();
        let children = self
            .lock()
            .layout
            .as_ref()
            .map(|layout| [Arc::clone(&layout.first), Arc::clone(&layout.second)]);
        for child in children.into_iter().flatten() {
            child.settle();
        }
    }

    // =========================================================================
    // LAYOUT
    // =========================================================================

    /// Assign the box this window occupies.
    pub fn place(self: &Arc<Self>, bounds: Rect) {
        {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.bounds = Some(bounds);
            state.dirty = true;
        }
        self.request_sync();
    }

    /// Replace a pair's children or arrangement.
    pub fn set_layout(self: &Arc<Self>, layout: PairLayout) {
        {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.layout = Some(layout);
            state.dirty = true;
        }
        self.request_sync();
    }

    /// Current size in the window's own units: character cells for text
    /// windows, pixels otherwise. `None` before the first placement.
    pub fn size_in_units(&self) -> Option<(u32, u32)> {
        let bounds = self.bounds()?;
        let unit = match self.kind {
            WindowKind::Pair => UnitSize::PIXEL,
            kind => self.surface.renderer().unit_size(kind),
        };
        Some((units(bounds.width, unit.width), units(bounds.height, unit.height)))
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Install a new pending request. Refused while another request is
    /// still outstanding or after the window closed.
    pub fn begin_request(self: &Arc<Self>, request: Arc<InputRequest>) -> bool {
        {
            let mut state = self.lock();
            if state.closed || state.request.is_some() {
                return false;
            }
            debug!(window = %self.window, kind = request.kind().name(), "input requested");
            state.request = Some(request);
        }
        self.request_sync();
        true
    }

    /// Cancel the pending request if `matches` accepts its kind. A line
    /// request keeps whatever the renderer had collected so far.
    pub fn cancel_request(self: &Arc<Self>, matches: impl Fn(&RequestKind) -> bool) -> bool {
        let cancelled = {
            let state = self.lock();
            let Some(request) = state.request.as_ref().filter(|r| matches(r.kind())) else {
                return false;
            };
            let partial = match request.kind() {
                RequestKind::Line(_) => self.surface.renderer().take_partial_input(self.window),
                _ => String::new(),
            };
            request.cancel(partial)
        };
        if cancelled {
            debug!(window = %self.window, "input request cancelled");
            self.request_sync();
        }
        cancelled
    }

    /// Renderer callback: complete the pending request with `input`.
    pub fn deliver(self: &Arc<Self>, input: Input) -> bool {
        let Some(request) = self.pending_request() else {
            return false;
        };
        let fulfilled = request.fulfill(input);
        if fulfilled {
            self.request_sync();
        }
        fulfilled
    }

    // =========================================================================
    // OUTPUT AND TEARDOWN
    // =========================================================================

    pub fn print(&self, text: &str) {
        if !self.lock().closed {
            self.surface.renderer().print(self.window, text);
        }
    }

    /// Tear the window down on the renderer side. A pending request is
    /// cancelled without reporting an event.
    pub fn close(&self) {
        let mut state = self.lock();
        if std::mem::replace(&mut state.closed, true) {
            return;
        }
        if let Some(request) = state.request.take() {
            request.cancel(String::new());
        }
        if std::mem::take(&mut state.watching) {
            self.surface.unwatch(self.window);
        }
        state.layout = None;
        if self.kind != WindowKind::Pair {
            self.surface.renderer().remove(self.window);
        }
        drop(state);
        self.surface.unregister(self.window);
        debug!(window = %self.window, "controller closed");
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("window", &self.window)
            .field("kind", &self.kind)
            .field("needs_sync", &self.needs_sync())
            .finish_non_exhaustive()
    }
}

fn units(extent: f64, unit: f64) -> u32 {
    if unit <= 0.0 {
        return 0;
    }
    // Float-to-int casts saturate.
    (extent / unit).floor() as u32
}
