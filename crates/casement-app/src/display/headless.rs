//! Renderer that draws nothing and records what it was asked to do.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use casement_common::{Rect, UnitSize, WindowKind};
use casement_config::MetricsConfig;
use casement_tiling::WindowId;

use super::Renderer;
use crate::controller::InputWatch;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Place(WindowId, Rect),
    Remove(WindowId),
    Border(WindowId, Rect),
    Watch(WindowId, InputWatch),
    Unwatch(WindowId),
    Print(WindowId, String),
}

#[derive(Debug, Default)]
struct Recording {
    ops: Vec<RenderOp>,
    partial: HashMap<WindowId, String>,
}

/// Shared view of a [`HeadlessRenderer`]'s recording, usable after the
/// renderer has been handed to a display.
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    inner: Arc<Mutex<Recording>>,
}

impl RenderLog {
    pub fn ops(&self) -> Vec<RenderOp> {
        self.lock().ops.clone()
    }

    pub fn clear(&self) {
        self.lock().ops.clear();
    }

    /// Most recent placement of `window`.
    pub fn placement(&self, window: WindowId) -> Option<Rect> {
        self.lock().ops.iter().rev().find_map(|op| match op {
            RenderOp::Place(w, rect) if *w == window => Some(*rect),
            _ => None,
        })
    }

    /// Whether `window` currently has an input watch.
    pub fn is_watching(&self, window: WindowId) -> bool {
        self.lock()
            .ops
            .iter()
            .rev()
            .find_map(|op| match op {
                RenderOp::Watch(w, _) if *w == window => Some(true),
                RenderOp::Unwatch(w) if *w == window => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn count(&self, pred: impl Fn(&RenderOp) -> bool) -> usize {
        self.lock().ops.iter().filter(|op| pred(op)).count()
    }

    pub fn printed(&self, window: WindowId) -> String {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::Print(w, text) if *w == window => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Pretend the user has typed `text` into `window` without finishing.
    pub fn set_partial(&self, window: WindowId, text: &str) {
        self.lock().partial.insert(window, text.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct HeadlessRenderer {
    metrics: MetricsConfig,
    log: RenderLog,
}

impl HeadlessRenderer {
    pub fn new(metrics: MetricsConfig) -> (Self, RenderLog) {
        let log = RenderLog::default();
        (
            Self {
                metrics,
                log: log.clone(),
            },
            log,
        )
    }

    fn record(&self, op: RenderOp) {
        self.log.lock().ops.push(op);
    }
}

impl Renderer for HeadlessRenderer {
    fn unit_size(&self, kind: WindowKind) -> UnitSize {
        match kind {
            WindowKind::TextGrid => self.metrics.grid.into(),
            WindowKind::TextBuffer => self.metrics.buffer.into(),
            _ => UnitSize::PIXEL,
        }
    }

    fn place(&mut self, window: WindowId, _kind: WindowKind, bounds: Rect) {
        self.record(RenderOp::Place(window, bounds));
    }

    fn remove(&mut self, window: WindowId) {
        self.record(RenderOp::Remove(window));
    }

    fn draw_border(&mut self, pair: WindowId, strip: Rect) {
        self.record(RenderOp::Border(pair, strip));
    }

    fn watch(&mut self, window: WindowId, watch: InputWatch) {
        self.record(RenderOp::Watch(window, watch));
    }

    fn unwatch(&mut self, window: WindowId) {
        self.record(RenderOp::Unwatch(window));
    }

    fn print(&mut self, window: WindowId, text: &str) {
        self.record(RenderOp::Print(window, text.to_string()));
    }

    fn take_partial_input(&mut self, window: WindowId) -> String {
        self.log.lock().partial.remove(&window).unwrap_or_default()
    }
}
