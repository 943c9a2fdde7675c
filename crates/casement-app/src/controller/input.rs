//! Input requests and their one-way state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use casement_common::{keycode, Event};
use casement_tiling::WindowId;

/// Input delivered by the renderer for a watched window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Char(u32),
    Line { text: String, terminator: u32 },
    Mouse { x: u32, y: u32 },
}

/// What the renderer should watch for on behalf of a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputWatch {
    Char,
    Line {
        initial: String,
        max_len: usize,
        echo: bool,
    },
    Mouse,
}

/// Caller-owned buffer a line request writes into.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    text: Arc<Mutex<String>>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: Arc::new(Mutex::new(text.to_string())),
        }
    }

    pub fn contents(&self) -> String {
        self.lock().clone()
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.lock().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn store(&self, text: String) {
        *self.lock() = text;
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.text.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
pub struct LineRequest {
    pub buffer: LineBuffer,
    pub max_len: usize,
    pub echo: bool,
    /// Keys besides Return that end input.
    pub terminators: Vec<u32>,
}

impl LineRequest {
    fn accepts_terminator(&self, key: u32) -> bool {
        key == keycode::RETURN || self.terminators.contains(&key)
    }
}

#[derive(Debug, Clone)]
pub enum RequestKind {
    Char,
    Line(LineRequest),
    Mouse,
}

impl RequestKind {
    pub fn name(&self) -> &'static str {
        match self {
            RequestKind::Char => "char",
            RequestKind::Line(_) => "line",
            RequestKind::Mouse => "mouse",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RequestState {
    Pending,
    Fulfilled(Input),
    /// Carries the text typed so far for line requests.
    Cancelled(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

/// A pending request for one kind of input on one window.
///
/// Moves from `Pending` to exactly one terminal state; whichever of
/// [`fulfill`](Self::fulfill) and [`cancel`](Self::cancel) gets there first
/// wins and the other becomes a no-op.
#[derive(Debug)]
pub struct InputRequest {
    kind: RequestKind,
    state: Mutex<RequestState>,
    reported: AtomicBool,
}

impl InputRequest {
    pub fn new(kind: RequestKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            state: Mutex::new(RequestState::Pending),
            reported: AtomicBool::new(false),
        })
    }

    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    pub fn status(&self) -> RequestStatus {
        match *self.lock() {
            RequestState::Pending => RequestStatus::Pending,
            RequestState::Fulfilled(_) => RequestStatus::Fulfilled,
            RequestState::Cancelled(_) => RequestStatus::Cancelled,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status() == RequestStatus::Pending
    }

    pub fn watch(&self) -> InputWatch {
        match &self.kind {
            RequestKind::Char => InputWatch::Char,
            RequestKind::Line(line) => InputWatch::Line {
                initial: line.buffer.contents(),
                max_len: line.max_len,
                echo: line.echo,
            },
            RequestKind::Mouse => InputWatch::Mouse,
        }
    }

    /// Complete the request with `input`. Returns `false` if the request
    /// already left `Pending` or `input` does not answer this kind of
    /// request.
    pub fn fulfill(&self, input: Input) -> bool {
        let mut state = self.lock();
        if *state != RequestState::Pending {
            return false;
        }
        let input = match (&self.kind, input) {
            (RequestKind::Char, input @ Input::Char(_)) => input,
            (RequestKind::Mouse, input @ Input::Mouse { .. }) => input,
            (RequestKind::Line(line), Input::Line { text, terminator }) => {
                if !line.accepts_terminator(terminator) {
                    return false;
                }
                let text = truncate_chars(&text, line.max_len);
                line.buffer.store(text.clone());
                Input::Line { text, terminator }
            }
            _ => return false,
        };
        *state = RequestState::Fulfilled(input);
        true
    }

    /// Abandon the request. `partial` is whatever line text the renderer
    /// had collected; it is ignored for char and mouse requests.
    pub fn cancel(&self, partial: String) -> bool {
        let mut state = self.lock();
        if *state != RequestState::Pending {
            return false;
        }
        let partial = match &self.kind {
            RequestKind::Line(line) => {
                let partial = truncate_chars(&partial, line.max_len);
                line.buffer.store(partial.clone());
                partial
            }
            _ => String::new(),
        };
        *state = RequestState::Cancelled(partial);
        true
    }

    /// The event reporting this request's outcome, handed out at most
    /// once. `None` while pending and for cancelled char or mouse input.
    pub fn take_event(&self, window: WindowId) -> Option<Event> {
        let event = match &*self.lock() {
            RequestState::Pending => return None,
            RequestState::Fulfilled(Input::Char(key)) => Event::char_input(window, *key),
            RequestState::Fulfilled(Input::Line { text, terminator }) => {
                Event::line_input(window, char_len(text), *terminator)
            }
            RequestState::Fulfilled(Input::Mouse { x, y }) => Event::mouse_input(window, *x, *y),
            RequestState::Cancelled(partial) => match self.kind {
                RequestKind::Line(_) => Event::line_input(window, char_len(partial), 0),
                _ => return None,
            },
        };
        if self.reported.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(event)
    }

    fn lock(&self) -> MutexGuard<'_, RequestState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn char_len(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}
