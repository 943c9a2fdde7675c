//! Demo program: a status line over a window that repeats what you type.

use casement_common::{CasementError, Event, EventKind, Result, WindowKind};
use casement_tiling::arrangement::method;
use casement_tiling::WindowId;
use tracing::debug;

use super::{Flow, Program};
use crate::controller::LineBuffer;
use crate::session::Session;

const MAX_LINE: usize = 256;
const MAIN_ROCK: u32 = 1;
const STATUS_ROCK: u32 = 2;

pub struct Echo {
    root_kind: WindowKind,
    main: Option<WindowId>,
    status: Option<WindowId>,
    input: LineBuffer,
    turns: u32,
}

impl Echo {
    pub fn new(root_kind: WindowKind) -> Self {
        Self {
            root_kind,
            main: None,
            status: None,
            input: LineBuffer::new(),
            turns: 0,
        }
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    fn main(&self) -> Result<WindowId> {
        self.main
            .ok_or_else(|| CasementError::Other("echo started without a main window".into()))
    }

    fn listen(&mut self, session: &Session) -> Result<()> {
        let main = self.main()?;
        let listening = match self.root_kind {
            kind if kind.accepts_text_input() => {
                self.input = LineBuffer::new();
                session.request_line_event(main, self.input.clone(), MAX_LINE)
            }
            WindowKind::Graphics => session.request_mouse_event(main),
            _ => true,
        };
        if listening {
            Ok(())
        } else {
            Err(CasementError::Other(format!("window {main} refused input")))
        }
    }

    fn draw_status(&self, session: &Session, note: &str) {
        if let Some(status) = self.status {
            session.put_text(status, &format!("Turns: {}  {note}\n", self.turns));
        }
    }

    fn on_line(&mut self, session: &Session, event: Event) -> Result<Flow> {
        let main = self.main()?;
        let text = self.input.contents();
        debug!(len = event.val1, "line received");
        if text.trim().eq_ignore_ascii_case("quit") {
            session.put_text(main, "Goodbye.\n");
            return Ok(Flow::Exit);
        }
        self.turns += 1;
        session.put_text(main, &format!("You said: {text}\n"));
        self.draw_status(session, "");
        self.listen(session)?;
        Ok(Flow::Continue)
    }
}

impl Program for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn start(&mut self, session: &mut Session) -> Result<()> {
        let main = session
            .open_window(None, 0, 0, self.root_kind.raw(), MAIN_ROCK)
            .ok_or_else(|| CasementError::Other("could not open the main window".into()))?;
        self.main = Some(main);
        self.status = session.open_window(
            Some(main),
            method::ABOVE | method::FIXED,
            1,
            WindowKind::TextGrid.raw(),
            STATUS_ROCK,
        );

        if self.root_kind.accepts_text_input() {
            session.put_text(main, "Type something. `quit` exits.\n");
        }
        self.draw_status(session, "");
        self.listen(session)
    }

    fn step(&mut self, session: &mut Session) -> Result<Flow> {
        let event = session.select()?;
        match event.kind {
            EventKind::LineInput if event.source == self.main => self.on_line(session, event),
            EventKind::MouseInput if event.source == self.main => {
                self.turns += 1;
                self.draw_status(session, &format!("click at {},{}", event.val1, event.val2));
                self.listen(session)?;
                Ok(Flow::Continue)
            }
            EventKind::Arrange => {
                self.draw_status(session, "");
                Ok(Flow::Continue)
            }
            _ => Ok(Flow::Continue),
        }
    }
}
