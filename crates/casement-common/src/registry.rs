//! Per-kind arena that hands out stable integer handles.
//!
//! Freed slots are tombstoned and recycled through a free list, so a
//! handle value may be reused after its owner is removed. Every live
//! owner caches the handle of its own slot (see [`Registered`]), which
//! keeps removal O(1).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque 1-based handle. The wire value `0` means "no object".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(u32);

impl Handle {
    /// Rebuild a handle from its wire value. `0` yields `None`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    fn from_slot(slot: usize) -> Self {
        Self(slot as u32 + 1)
    }

    fn slot(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle-{}", self.0)
    }
}

/// Implemented by values stored in a [`HandleRegistry`].
pub trait Registered {
    /// The handle of the slot currently holding this value.
    fn slot(&self) -> Option<Handle>;
    fn bind_slot(&mut self, slot: Option<Handle>);
}

#[derive(Debug)]
struct Entry<T> {
    owner: Option<T>,
}

impl<T> Entry<T> {
    fn is_deleted(&self) -> bool {
        self.owner.is_none()
    }
}

#[derive(Debug)]
pub struct HandleRegistry<T> {
    entries: Vec<Entry<T>>,
    free: Vec<usize>,
    live: usize,
}

impl<T: Registered> HandleRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Register `owner`, reusing a free slot when one exists.
    pub fn add(&mut self, owner: T) -> Handle {
        self.add_with(|_| owner)
    }

    /// Register the value built by `build`, which receives the handle the
    /// value will live under.
    pub fn add_with(&mut self, build: impl FnOnce(Handle) -> T) -> Handle {
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.entries.push(Entry { owner: None });
                self.entries.len() - 1
            }
        };
        let handle = Handle::from_slot(slot);
        let mut owner = build(handle);
        owner.bind_slot(Some(handle));
        self.entries[slot].owner = Some(owner);
        self.live += 1;
        handle
    }

    /// Tombstone the slot of `handle` and return its owner.
    ///
    /// # Panics
    ///
    /// Removing a handle that is not currently registered is an internal
    /// invariant violation and aborts.
    pub fn remove(&mut self, handle: Handle) -> T {
        let slot = handle.slot();
        let mut owner = self
            .entries
            .get_mut(slot)
            .and_then(|entry| entry.owner.take())
            .unwrap_or_else(|| panic!("remove of unregistered {handle}"));
        assert_eq!(
            owner.slot(),
            Some(handle),
            "registry owner cached a stale slot"
        );
        owner.bind_slot(None);
        self.free.push(slot);
        self.live -= 1;
        owner
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.entries.get(handle.slot())?.owner.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.entries.get_mut(handle.slot())?.owner.as_mut()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// First live handle strictly after `after`, or the first live handle
    /// overall when `after` is `None`.
    pub fn next(&self, after: Option<Handle>) -> Option<Handle> {
        let start = after.map_or(0, |h| h.slot().wrapping_add(1));
        self.entries
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, entry)| !entry.is_deleted())
            .map(|(slot, _)| Handle::from_slot(slot))
    }

    pub fn cursor(&self) -> RegistryCursor {
        RegistryCursor { next_slot: 0 }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.owner.as_ref().map(|o| (Handle::from_slot(slot), o)))
    }

    /// True when every live owner's cached slot equals its position.
    pub fn slots_consistent(&self) -> bool {
        self.iter().all(|(handle, owner)| owner.slot() == Some(handle))
    }
}

impl<T: Registered> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Restartable forward cursor over a registry.
///
/// Holds only the next slot index to visit, so the registry may be
/// mutated between calls to [`advance`](Self::advance); removed owners
/// are never yielded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryCursor {
    next_slot: usize,
}

impl RegistryCursor {
    pub fn advance<T: Registered>(&mut self, registry: &HandleRegistry<T>) -> Option<Handle> {
        let after = self.next_slot.checked_sub(1).map(Handle::from_slot);
        let found = registry.next(after)?;
        self.next_slot = found.slot() + 1;
        Some(found)
    }

    pub fn reset(&mut self) {
        self.next_slot = 0;
    }
}
