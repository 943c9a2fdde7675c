//! The boundary to whatever actually paints windows and captures input.

use casement_common::{Rect, UnitSize, WindowKind};
use casement_tiling::WindowId;

use crate::controller::InputWatch;

/// Painting and input capture for the display. Only ever called on the
/// UI thread.
pub trait Renderer: Send {
    /// Pixels per native unit for windows of `kind`.
    fn unit_size(&self, kind: WindowKind) -> UnitSize;

    /// Show a leaf window at `bounds`.
    fn place(&mut self, window: WindowId, kind: WindowKind, bounds: Rect);

    fn remove(&mut self, window: WindowId);

    /// Draw the strip separating the children of `pair`.
    fn draw_border(&mut self, pair: WindowId, strip: Rect);

    /// Start collecting input for `window`. Idempotent per window.
    fn watch(&mut self, window: WindowId, watch: InputWatch);

    fn unwatch(&mut self, window: WindowId);

    fn print(&mut self, window: WindowId, text: &str);

    /// Line text typed so far in `window`, consumed by the call.
    fn take_partial_input(&mut self, window: WindowId) -> String;
}
