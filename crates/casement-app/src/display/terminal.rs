//! Line-oriented renderer on the process's stdout.
//!
//! Text buffers print as-is; text grids print each line behind a bar so
//! status output stands apart. Input comes from the line-buffered
//! terminal, so echo and partial input are left to the terminal.

use std::collections::HashMap;
use std::io::{self, Write};

use casement_common::{Rect, UnitSize, WindowKind};
use casement_config::MetricsConfig;
use casement_tiling::WindowId;

use super::Renderer;
use crate::controller::InputWatch;

pub struct TerminalRenderer<W: Write + Send = io::Stdout> {
    out: W,
    metrics: MetricsConfig,
    kinds: HashMap<WindowId, WindowKind>,
}

impl TerminalRenderer {
    pub fn stdout(metrics: MetricsConfig) -> Self {
        Self::new(io::stdout(), metrics)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, metrics: MetricsConfig) -> Self {
        Self {
            out,
            metrics,
            kinds: HashMap::new(),
        }
    }

    fn write(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!("terminal write failed: {e}");
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn unit_size(&self, kind: WindowKind) -> UnitSize {
        match kind {
            WindowKind::TextGrid => self.metrics.grid.into(),
            WindowKind::TextBuffer => self.metrics.buffer.into(),
            _ => UnitSize::PIXEL,
        }
    }

    fn place(&mut self, window: WindowId, kind: WindowKind, bounds: Rect) {
        tracing::trace!(window = %window, ?bounds, "place");
        self.kinds.insert(window, kind);
    }

    fn remove(&mut self, window: WindowId) {
        self.kinds.remove(&window);
    }

    fn draw_border(&mut self, pair: WindowId, strip: Rect) {
        tracing::trace!(pair = %pair, ?strip, "border");
    }

    fn watch(&mut self, window: WindowId, watch: InputWatch) {
        if let InputWatch::Line { initial, .. } = watch {
            if !initial.is_empty() {
                self.write(&initial);
            }
        }
        tracing::trace!(window = %window, "watching for input");
    }

    fn unwatch(&mut self, window: WindowId) {
        tracing::trace!(window = %window, "stopped watching for input");
    }

    fn print(&mut self, window: WindowId, text: &str) {
        match self.kinds.get(&window) {
            Some(WindowKind::TextGrid) => {
                let framed: String = text
                    .lines()
                    .map(|line| format!("| {line}\n"))
                    .collect();
                self.write(&framed);
            }
            Some(WindowKind::TextBuffer) | None => self.write(text),
            Some(_) => {}
        }
    }

    fn take_partial_input(&mut self, _window: WindowId) -> String {
        String::new()
    }
}
