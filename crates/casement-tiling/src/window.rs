use casement_common::{Handle, Registered, WindowKind};

use crate::arrangement::Arrangement;

pub type WindowId = Handle;

/// Where a window is in its close sequence. A closed window no longer
/// exists in the tree at all, so there is no `Closed` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Open,
    Closing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairData {
    pub first: WindowId,
    pub second: WindowId,
    /// `None` once the key window has gone; the pair then splits evenly.
    pub key: Option<WindowId>,
    pub arrangement: Arrangement,
}

impl PairData {
    pub fn other_child(&self, child: WindowId) -> Option<WindowId> {
        if child == self.first {
            Some(self.second)
        } else if child == self.second {
            Some(self.first)
        } else {
            None
        }
    }

    pub fn has_child(&self, child: WindowId) -> bool {
        self.first == child || self.second == child
    }

    /// Point the slot holding `old` at `new`.
    ///
    /// # Panics
    ///
    /// If `old` is not one of this pair's children.
    pub(crate) fn replace_child(&mut self, old: WindowId, new: WindowId) {
        if self.first == old {
            self.first = new;
        } else if self.second == old {
            self.second = new;
        } else {
            panic!("replace_child: {old} is not a child of this pair");
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WindowData {
    Blank,
    Graphics,
    TextBuffer,
    TextGrid,
    Pair(PairData),
}

impl WindowData {
    /// Empty content for an openable kind. Pairs are only made by `split`.
    pub fn for_kind(kind: WindowKind) -> Option<Self> {
        match kind {
            WindowKind::Blank => Some(Self::Blank),
            WindowKind::Graphics => Some(Self::Graphics),
            WindowKind::TextBuffer => Some(Self::TextBuffer),
            WindowKind::TextGrid => Some(Self::TextGrid),
            WindowKind::Pair => None,
        }
    }

    pub fn kind(&self) -> WindowKind {
        match self {
            Self::Blank => WindowKind::Blank,
            Self::Graphics => WindowKind::Graphics,
            Self::TextBuffer => WindowKind::TextBuffer,
            Self::TextGrid => WindowKind::TextGrid,
            Self::Pair(_) => WindowKind::Pair,
        }
    }
}

/// One node of the window tree, stored by value in the tree's registry.
///
/// `C` is whatever the owner attaches to each window; the app crate hangs
/// its UI-side controller here.
#[derive(Debug)]
pub struct Window<C> {
    pub(crate) id: WindowId,
    slot: Option<WindowId>,
    pub(crate) parent: Option<WindowId>,
    pub(crate) rock: u32,
    pub(crate) data: WindowData,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) controller: C,
}

impl<C> Window<C> {
    pub(crate) fn new(
        id: WindowId,
        data: WindowData,
        rock: u32,
        parent: Option<WindowId>,
        controller: C,
    ) -> Self {
        Self {
            id,
            slot: None,
            parent,
            rock,
            data,
            lifecycle: Lifecycle::Open,
            controller,
        }
    }

    /// The handle this window was registered under. Stays readable after
    /// the window has been reaped.
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// False once the window has been released from the tree.
    pub fn is_registered(&self) -> bool {
        self.slot.is_some()
    }

    pub fn kind(&self) -> WindowKind {
        self.data.kind()
    }

    pub fn rock(&self) -> u32 {
        self.rock
    }

    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn data(&self) -> &WindowData {
        &self.data
    }

    pub fn pair(&self) -> Option<&PairData> {
        match &self.data {
            WindowData::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    pub(crate) fn pair_mut(&mut self) -> Option<&mut PairData> {
        match &mut self.data {
            WindowData::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn into_controller(self) -> C {
        self.controller
    }
}

impl<C> Registered for Window<C> {
    fn slot(&self) -> Option<Handle> {
        self.slot
    }

    fn bind_slot(&mut self, slot: Option<Handle>) {
        self.slot = slot;
    }
}
