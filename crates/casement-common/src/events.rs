//! Notifications flowing from the UI thread to the program thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::registry::Handle;
use crate::sync::Semaphore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum EventKind {
    None = 0,
    Timer = 1,
    CharInput = 2,
    LineInput = 3,
    MouseInput = 4,
    Arrange = 5,
    Redraw = 6,
    SoundNotify = 7,
    Hyperlink = 8,
    VolumeNotify = 9,
}

impl EventKind {
    /// Kinds that `EventQueue::poll` may hand out without the program
    /// asking for input.
    pub const LOW_PRIORITY: [EventKind; 3] =
        [EventKind::Timer, EventKind::Arrange, EventKind::SoundNotify];

    pub fn is_low_priority(self) -> bool {
        Self::LOW_PRIORITY.contains(&self)
    }

    pub fn raw(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub source: Option<Handle>,
    pub val1: u32,
    pub val2: u32,
}

impl Event {
    pub fn new(kind: EventKind, source: Option<Handle>, val1: u32, val2: u32) -> Self {
        Self {
            kind,
            source,
            val1,
            val2,
        }
    }

    /// The empty event, also used as the wake-up sentinel after an interrupt.
    pub fn none() -> Self {
        Self::new(EventKind::None, None, 0, 0)
    }

    pub fn timer() -> Self {
        Self::new(EventKind::Timer, None, 0, 0)
    }

    pub fn arrange(source: Option<Handle>) -> Self {
        Self::new(EventKind::Arrange, source, 0, 0)
    }

    pub fn char_input(source: Handle, key: u32) -> Self {
        Self::new(EventKind::CharInput, Some(source), key, 0)
    }

    pub fn line_input(source: Handle, len: u32, terminator: u32) -> Self {
        Self::new(EventKind::LineInput, Some(source), len, terminator)
    }

    pub fn mouse_input(source: Handle, x: u32, y: u32) -> Self {
        Self::new(EventKind::MouseInput, Some(source), x, y)
    }

    pub fn sound_notify(resource: u32, notify: u32) -> Self {
        Self::new(EventKind::SoundNotify, None, resource, notify)
    }

    /// `(kind, source handle, val1, val2)` with `0` standing for "no source".
    pub fn to_wire(&self) -> (u32, u32, u32, u32) {
        (
            self.kind.raw(),
            self.source.map_or(0, Handle::raw),
            self.val1,
            self.val2,
        )
    }
}

/// Thread-safe FIFO of events.
///
/// The semaphore count tracks the number of queued events. There is a
/// single consumer (the program thread); any number of producers.
#[derive(Debug, Default)]
pub struct EventQueue {
    items: Mutex<VecDeque<Event>>,
    available: Semaphore,
    interrupted: AtomicBool,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and wake one waiting consumer. Never blocks on
    /// consumers.
    pub fn push(&self, event: Event) {
        self.lock().push_back(event);
        self.available.release();
        tracing::trace!(kind = ?event.kind, "event queued");
    }

    /// Block until an event is available and return the oldest one.
    pub fn pop(&self) -> Event {
        loop {
            self.available.acquire();
            if let Some(event) = self.lock().pop_front() {
                return event;
            }
        }
    }

    /// Like [`pop`](Self::pop) but gives up after `timeout`.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<Event> {
        if !self.available.acquire_timeout(timeout) {
            return None;
        }
        self.lock().pop_front()
    }

    /// Remove and return the oldest low-priority event, leaving all other
    /// events in place. Never blocks.
    pub fn poll(&self) -> Option<Event> {
        let event = {
            let mut items = self.lock();
            let index = items.iter().position(|e| e.kind.is_low_priority())?;
            items.remove(index)?
        };
        // A concurrent pop may already hold this unit, in which case it
        // re-checks the queue and waits for the next push.
        self.available.try_acquire();
        Some(event)
    }

    /// Flag the consumer to stop. Does not wake a blocked `pop`; pair it
    /// with a sentinel push.
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Release);
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Event>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
