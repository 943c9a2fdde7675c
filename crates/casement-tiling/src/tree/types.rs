//! Core types for the window tree: WindowTree and operation results.

use casement_common::HandleRegistry;

use crate::window::{Window, WindowId};

/// Binary split tree of windows.
///
/// Windows live by value in a handle registry; pairs refer to their
/// children by id and children refer back to their pair by id, so there
/// are no reference cycles. The tree is not synchronized: a single thread
/// owns and mutates it.
#[derive(Debug)]
pub struct WindowTree<C> {
    pub(super) windows: HandleRegistry<Window<C>>,
    pub(super) root: Option<WindowId>,
}

impl<C> WindowTree<C> {
    pub fn new() -> Self {
        Self {
            windows: HandleRegistry::new(),
            root: None,
        }
    }
}

impl<C> Default for WindowTree<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which of the two windows in a split becomes the pair's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChoice {
    /// The newly opened window. It becomes `first`.
    New,
    /// The window being split. It stays `first`.
    Existing,
}

/// Result of a successful split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub window: WindowId,
    pub pair: WindowId,
}

/// A window cut out of the tree but not yet released.
///
/// Produced by [`WindowTree::detach`] and consumed by
/// [`WindowTree::reap`]. While it exists, the detached subtree and its
/// collapsed pair are still registered and marked closing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a detached window must be reaped"]
pub struct Detached {
    pub window: WindowId,
    /// The pair that held `window`; elided from the tree.
    pub pair: Option<WindowId>,
    /// The pair's other child, now attached where the pair was.
    pub sibling: Option<WindowId>,
    /// The pair that now holds `sibling`, or `None` if it became the root.
    pub new_parent: Option<WindowId>,
    /// Ancestors whose key was cleared.
    pub reset_keys: Vec<WindowId>,
}
