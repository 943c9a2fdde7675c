//! Layout engine types and configuration.

use casement_common::Rect;

use crate::window::WindowId;

/// Configuration for the layout engine that divides pair windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    /// Pixels reserved between the children of a bordered pair.
    pub border_width: u32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self { border_width: 1 }
    }
}

/// The boxes assigned to one pair's children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairBoxes {
    pub first: Rect,
    pub second: Rect,
    /// Space between the two boxes, present for bordered pairs only.
    pub border: Option<Rect>,
}

/// Result of laying out a whole tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeLayout {
    /// Every reachable window with its box, parents before children.
    pub windows: Vec<(WindowId, Rect)>,
    pub borders: Vec<Rect>,
}

impl TreeLayout {
    pub fn rect_of(&self, id: WindowId) -> Option<Rect> {
        self.windows
            .iter()
            .find(|(window, _)| *window == id)
            .map(|(_, rect)| *rect)
    }
}
