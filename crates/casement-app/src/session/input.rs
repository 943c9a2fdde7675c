//! Input requests on behalf of the program.

use casement_common::{keycode, WindowKind};
use casement_tiling::WindowId;
use tracing::warn;

use super::Session;
use crate::controller::{InputRequest, LineBuffer, LineRequest, RequestKind};

/// Per-window settings applied to the next line request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOptions {
    pub echo: bool,
    pub terminators: Vec<u32>,
}

impl Session {
    pub fn request_char_event(&self, window: WindowId) -> bool {
        self.request_input(window, RequestKind::Char)
    }

    /// Ask for a line of input into `buffer`, at most `max_len`
    /// characters. Text already in `buffer` is offered as the start of
    /// the line.
    pub fn request_line_event(&self, window: WindowId, buffer: LineBuffer, max_len: usize) -> bool {
        let options = self.line_options(window);
        self.request_input(
            window,
            RequestKind::Line(LineRequest {
                buffer,
                max_len,
                echo: options.echo,
                terminators: options.terminators,
            }),
        )
    }

    pub fn request_mouse_event(&self, window: WindowId) -> bool {
        self.request_input(window, RequestKind::Mouse)
    }

    pub fn cancel_char_event(&self, window: WindowId) -> bool {
        self.cancel_input(window, |kind| matches!(kind, RequestKind::Char))
    }

    /// Cancel a line request. The text typed so far lands in the request's
    /// buffer and is reported with a line event.
    pub fn cancel_line_event(&self, window: WindowId) -> bool {
        self.cancel_input(window, |kind| matches!(kind, RequestKind::Line(_)))
    }

    pub fn cancel_mouse_event(&self, window: WindowId) -> bool {
        self.cancel_input(window, |kind| matches!(kind, RequestKind::Mouse))
    }

    /// Extra keys that finish line input in `window`, besides Return.
    /// Keys that cannot terminate a line are dropped with a warning.
    pub fn set_terminators(&mut self, window: WindowId, keys: &[u32]) -> bool {
        if !self.tree.contains(window) {
            return false;
        }
        let (valid, invalid): (Vec<u32>, Vec<u32>) = keys
            .iter()
            .copied()
            .partition(|&key| keycode::is_valid_terminator(key));
        if !invalid.is_empty() {
            warn!(window = %window, ?invalid, "ignoring keys that cannot end a line");
        }
        self.line_options_mut(window).terminators = valid;
        true
    }

    pub fn set_echo_line_event(&mut self, window: WindowId, echo: bool) -> bool {
        if !self.tree.contains(window) {
            return false;
        }
        self.line_options_mut(window).echo = echo;
        true
    }

    pub fn line_options(&self, window: WindowId) -> LineOptions {
        self.line_options
            .get(&window)
            .cloned()
            .unwrap_or_else(|| self.default_line_options())
    }

    fn line_options_mut(&mut self, window: WindowId) -> &mut LineOptions {
        let defaults = self.default_line_options();
        self.line_options.entry(window).or_insert(defaults)
    }

    fn default_line_options(&self) -> LineOptions {
        LineOptions {
            echo: self.runtime.echo_line_input,
            terminators: Vec::new(),
        }
    }

    fn request_input(&self, window: WindowId, kind: RequestKind) -> bool {
        let Some(window_kind) = self.tree.kind(window) else {
            warn!(window = %window, "input requested on unknown window");
            return false;
        };
        let supported = match kind {
            RequestKind::Char | RequestKind::Line(_) => window_kind.accepts_text_input(),
            RequestKind::Mouse => {
                matches!(window_kind, WindowKind::TextGrid | WindowKind::Graphics)
            }
        };
        if !supported {
            warn!(window = %window, kind = kind.name(), %window_kind, "window cannot take this input");
            return false;
        }
        let Some(controller) = self.controller(window) else {
            return false;
        };
        let request = InputRequest::new(kind);
        let accepted = self
            .send("input request", move || controller.begin_request(request))
            .unwrap_or(false);
        if !accepted {
            warn!(window = %window, "window already has an input request");
        }
        accepted
    }

    fn cancel_input(
        &self,
        window: WindowId,
        matches: impl Fn(&RequestKind) -> bool + Send + 'static,
    ) -> bool {
        let Some(controller) = self.controller(window) else {
            return false;
        };
        self.send("cancel", move || controller.cancel_request(matches))
            .unwrap_or(false)
    }
}
