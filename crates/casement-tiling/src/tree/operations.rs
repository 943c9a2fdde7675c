//! Mutating operations on the window tree: open, split, close, rearrange.

use casement_common::{TreeError, WindowKind};

use super::{Detached, KeyChoice, Split, WindowTree};
use crate::arrangement::Arrangement;
use crate::window::{Lifecycle, PairData, Window, WindowData, WindowId};

impl<C> WindowTree<C> {
    /// Open the root window of an empty tree.
    ///
    /// `make` builds the attachment for the new window once its handle is
    /// known.
    pub fn open_root(
        &mut self,
        kind: WindowKind,
        rock: u32,
        make: impl FnOnce(WindowId, WindowKind) -> C,
    ) -> Result<WindowId, TreeError> {
        if self.root.is_some() {
            return Err(TreeError::DuplicateRoot);
        }
        let data = WindowData::for_kind(kind).ok_or(TreeError::PairNotAllowed)?;
        let id = self
            .windows
            .add_with(|id| Window::new(id, data, rock, None, make(id, kind)));
        self.root = Some(id);
        tracing::debug!(window = %id, %kind, "opened root window");
        Ok(id)
    }

    /// Split `target` by opening a new window beside it.
    ///
    /// A new pair takes `target`'s place in the tree and holds both
    /// windows. The key window is always placed `first`.
    pub fn split(
        &mut self,
        target: WindowId,
        kind: WindowKind,
        rock: u32,
        arrangement: Arrangement,
        key: KeyChoice,
        mut make: impl FnMut(WindowId, WindowKind) -> C,
    ) -> Result<Split, TreeError> {
        let data = WindowData::for_kind(kind).ok_or(TreeError::PairNotAllowed)?;
        let old_parent = self.open_window(target)?.parent;

        let window = self
            .windows
            .add_with(|id| Window::new(id, data, rock, None, make(id, kind)));
        let (first, second) = match key {
            KeyChoice::New => (window, target),
            KeyChoice::Existing => (target, window),
        };
        let pair_data = WindowData::Pair(PairData {
            first,
            second,
            key: Some(first),
            arrangement,
        });
        let pair = self.windows.add_with(|id| {
            Window::new(id, pair_data, 0, old_parent, make(id, WindowKind::Pair))
        });

        self.window_mut(window).parent = Some(pair);
        self.window_mut(target).parent = Some(pair);
        match old_parent {
            Some(parent) => self.pair_data_mut(parent).replace_child(target, pair),
            None => self.root = Some(pair),
        }

        tracing::debug!(window = %window, pair = %pair, target = %target, "split window");
        Ok(Split { window, pair })
    }

    /// Cut `id` and its subtree out of the tree without releasing them.
    ///
    /// The pair holding `id` is elided and its other child takes the
    /// pair's place. Every ancestor whose key disappears with the cut has
    /// its key cleared. Everything cut out is marked closing and stays
    /// registered until [`reap`](Self::reap).
    pub fn detach(&mut self, id: WindowId) -> Result<Detached, TreeError> {
        let parent = self.open_window(id)?.parent;

        let Some(pair) = parent else {
            self.root = None;
            self.mark_closing(id);
            tracing::debug!(window = %id, "detached root window");
            return Ok(Detached {
                window: id,
                pair: None,
                sibling: None,
                new_parent: None,
                reset_keys: Vec::new(),
            });
        };

        let sibling = self
            .pair_data(pair)
            .other_child(id)
            .unwrap_or_else(|| panic!("{id} is not a child of its parent {pair}"));

        let mut reset_keys = Vec::new();
        for ancestor in self.ancestors(id) {
            let key = self.pair_data(ancestor).key;
            let doomed = key.is_some_and(|k| k == pair || self.is_in_subtree(k, id));
            if doomed {
                self.pair_data_mut(ancestor).key = None;
                reset_keys.push(ancestor);
            }
        }

        let grandparent = self.window(pair).parent;
        self.window_mut(sibling).parent = grandparent;
        match grandparent {
            Some(gp) => self.pair_data_mut(gp).replace_child(pair, sibling),
            None => self.root = Some(sibling),
        }

        self.mark_closing(id);
        self.window_mut(pair).lifecycle = Lifecycle::Closing;

        tracing::debug!(
            window = %id,
            pair = %pair,
            sibling = %sibling,
            keys_reset = reset_keys.len(),
            "detached window"
        );
        Ok(Detached {
            window: id,
            pair: Some(pair),
            sibling: Some(sibling),
            new_parent: grandparent,
            reset_keys,
        })
    }

    /// Release everything cut out by `detached`, children before parents
    /// and the elided pair last. Returns the windows in release order.
    pub fn reap(&mut self, detached: Detached) -> Vec<Window<C>> {
        let mut order = self.subtree_post_order(detached.window);
        order.extend(detached.pair);
        order
            .into_iter()
            .map(|id| {
                let window = self.windows.remove(id);
                assert_eq!(
                    window.lifecycle,
                    Lifecycle::Closing,
                    "reaped {id} without detaching it"
                );
                window
            })
            .collect()
    }

    /// Detach and reap in one step.
    pub fn close(&mut self, id: WindowId) -> Result<Vec<Window<C>>, TreeError> {
        let detached = self.detach(id)?;
        Ok(self.reap(detached))
    }

    /// Replace a pair's arrangement and key.
    ///
    /// A key inside the second child's subtree swaps the children so the
    /// key always descends through `first`. Returns whether a swap happened.
    pub fn rearrange(
        &mut self,
        pair: WindowId,
        key: Option<WindowId>,
        arrangement: Arrangement,
    ) -> Result<bool, TreeError> {
        let window = self.open_window(pair)?;
        let data = window.pair().ok_or(TreeError::NotPair(pair))?;
        let (first, second) = (data.first, data.second);

        let swap = match key {
            None => false,
            Some(k) if self.is_in_subtree(k, first) => false,
            Some(k) if self.is_in_subtree(k, second) => true,
            Some(k) => return Err(TreeError::KeyNotInPair { pair, key: k }),
        };

        let data = self.pair_data_mut(pair);
        if swap {
            std::mem::swap(&mut data.first, &mut data.second);
        }
        data.key = key;
        data.arrangement = arrangement;
        tracing::debug!(pair = %pair, swapped = swap, "rearranged pair");
        Ok(swap)
    }

    /// The window `id` if it exists and is not closing.
    fn open_window(&self, id: WindowId) -> Result<&Window<C>, TreeError> {
        let window = self.windows.get(id).ok_or(TreeError::UnknownWindow(id))?;
        if !window.is_open() {
            return Err(TreeError::AlreadyClosed(id));
        }
        Ok(window)
    }

    fn mark_closing(&mut self, id: WindowId) {
        for member in self.subtree_post_order(id) {
            self.window_mut(member).lifecycle = Lifecycle::Closing;
        }
    }

    pub(super) fn window(&self, id: WindowId) -> &Window<C> {
        self.windows
            .get(id)
            .unwrap_or_else(|| panic!("dangling window reference {id}"))
    }

    fn window_mut(&mut self, id: WindowId) -> &mut Window<C> {
        self.windows
            .get_mut(id)
            .unwrap_or_else(|| panic!("dangling window reference {id}"))
    }

    pub(super) fn pair_data(&self, id: WindowId) -> &PairData {
        self.window(id)
            .pair()
            .unwrap_or_else(|| panic!("{id} is used as a pair but is not one"))
    }

    fn pair_data_mut(&mut self, id: WindowId) -> &mut PairData {
        self.window_mut(id)
            .pair_mut()
            .unwrap_or_else(|| panic!("{id} is used as a pair but is not one"))
    }
}
