//! Read-only queries and walks over the window tree.

use casement_common::{RegistryCursor, WindowKind};

use super::WindowTree;
use crate::window::{PairData, Window, WindowId};

impl<C> WindowTree<C> {
    pub fn root(&self) -> Option<WindowId> {
        self.root
    }

    pub fn get(&self, id: WindowId) -> Option<&Window<C>> {
        self.windows.get(id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains(id)
    }

    /// Registered windows, including any detached but not yet reaped.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn parent(&self, id: WindowId) -> Option<WindowId> {
        self.windows.get(id)?.parent
    }

    pub fn sibling(&self, id: WindowId) -> Option<WindowId> {
        let parent = self.parent(id)?;
        self.pair(parent)?.other_child(id)
    }

    pub fn kind(&self, id: WindowId) -> Option<WindowKind> {
        self.windows.get(id).map(Window::kind)
    }

    pub fn rock(&self, id: WindowId) -> Option<u32> {
        self.windows.get(id).map(Window::rock)
    }

    pub fn pair(&self, id: WindowId) -> Option<&PairData> {
        self.windows.get(id)?.pair()
    }

    pub fn controller(&self, id: WindowId) -> Option<&C> {
        self.windows.get(id).map(Window::controller)
    }

    /// Next window in registry order after `after`, or the first one.
    pub fn iter_after(&self, after: Option<WindowId>) -> Option<WindowId> {
        self.windows.next(after)
    }

    pub fn cursor(&self) -> RegistryCursor {
        self.windows.cursor()
    }

    /// Advance `cursor` to the next window of this tree.
    pub fn advance(&self, cursor: &mut RegistryCursor) -> Option<WindowId> {
        cursor.advance(&self.windows)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WindowId, &Window<C>)> + '_ {
        self.windows.iter()
    }

    /// Pairs above `id`, nearest first.
    pub fn ancestors(&self, id: WindowId) -> Vec<WindowId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(pair) = current {
            out.push(pair);
            current = self.parent(pair);
        }
        out
    }

    /// True if `node` is `top` or lies below it.
    pub fn is_in_subtree(&self, node: WindowId, top: WindowId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == top {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// `top` and everything below it, children before their pair.
    pub fn subtree_post_order(&self, top: WindowId) -> Vec<WindowId> {
        let mut out = Vec::new();
        self.collect_post_order(top, &mut out);
        out
    }

    fn collect_post_order(&self, id: WindowId, out: &mut Vec<WindowId>) {
        if let Some(pair) = self.pair(id) {
            let (first, second) = (pair.first, pair.second);
            self.collect_post_order(first, out);
            self.collect_post_order(second, out);
        }
        out.push(id);
    }

    /// Leaf windows reachable from the root, first child before second.
    pub fn leaves(&self) -> Vec<WindowId> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        self.subtree_post_order(root)
            .into_iter()
            .filter(|&id| self.pair(id).is_none())
            .collect()
    }

    /// Verify the structural invariants of the tree. Returns a description
    /// of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        if !self.windows.slots_consistent() {
            return Err("registry slot cache out of step".into());
        }
        let open = self.windows.iter().filter(|(_, w)| w.is_open()).count();

        let Some(root) = self.root else {
            return match open {
                0 => Ok(()),
                n => Err(format!("empty tree but {n} open windows")),
            };
        };
        let root_window = self.get(root).ok_or("root is not registered")?;
        if root_window.parent.is_some() {
            return Err(format!("root {root} has a parent"));
        }

        let reachable = self.subtree_post_order(root);
        if reachable.len() != open {
            return Err(format!(
                "{} windows reachable from root but {open} open",
                reachable.len()
            ));
        }
        for id in reachable {
            let window = self.get(id).ok_or(format!("dangling child {id}"))?;
            if !window.is_open() {
                return Err(format!("closing window {id} still attached"));
            }
            let Some(pair) = window.pair() else {
                continue;
            };
            if pair.first == pair.second {
                return Err(format!("pair {id} holds the same child twice"));
            }
            for child in [pair.first, pair.second] {
                if self.parent(child) != Some(id) {
                    return Err(format!("child {child} does not point back to {id}"));
                }
            }
            if let Some(key) = pair.key {
                if !self.is_in_subtree(key, pair.first) {
                    return Err(format!("key {key} of pair {id} is not under first"));
                }
            }
        }
        Ok(())
    }
}
