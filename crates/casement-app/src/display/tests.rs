use super::*;

use casement_common::{EventKind, Handle, TaskLoop, WindowKind};
use casement_config::MetricsConfig;

use crate::controller::{InputRequest, LineBuffer, LineRequest, RequestKind};

struct Rig {
    display: Arc<Display>,
    events: Arc<EventQueue>,
    channel: TaskChannel,
    task_loop: TaskLoop,
    log: RenderLog,
}

impl Rig {
    fn new() -> Self {
        let (renderer, log) = HeadlessRenderer::new(MetricsConfig::default());
        let (channel, task_loop) = TaskChannel::new();
        let events = Arc::new(EventQueue::new());
        let surface = Surface::new(
            Box::new(renderer),
            Arc::clone(&events),
            channel.clone(),
            LayoutEngine::default(),
        );
        Self {
            display: Display::new(surface, 640, 480),
            events,
            channel,
            task_loop,
            log,
        }
    }

    fn window(&self, raw: u32, kind: WindowKind) -> Arc<Controller> {
        let id = Handle::from_raw(raw).unwrap();
        let controller = Controller::new(id, kind, Arc::clone(self.display.surface()));
        self.display.adopt(std::slice::from_ref(&controller));
        controller
    }

    fn run_ui(&self) {
        while self.channel.queued() > 0 {
            self.task_loop.run_pending();
        }
    }
}

fn line(buffer: &LineBuffer) -> Arc<InputRequest> {
    InputRequest::new(RequestKind::Line(LineRequest {
        buffer: buffer.clone(),
        max_len: 80,
        echo: true,
        terminators: Vec::new(),
    }))
}

#[test]
fn root_fills_viewport() {
    let rig = Rig::new();
    let root = rig.window(1, WindowKind::TextBuffer);
    rig.display.set_root(Some(Arc::clone(&root)));
    rig.run_ui();
    assert_eq!(
        rig.log.placement(root.window()),
        Some(Rect::new(0.0, 0.0, 640.0, 480.0))
    );
}

#[test]
fn resize_relays_out_and_notifies() {
    let rig = Rig::new();
    let root = rig.window(1, WindowKind::TextGrid);
    rig.display.set_root(Some(Arc::clone(&root)));
    rig.run_ui();

    rig.display.resize(320, 200);
    rig.run_ui();
    assert_eq!(root.bounds(), Some(Rect::new(0.0, 0.0, 320.0, 200.0)));
    assert_eq!(rig.events.poll().map(|e| e.kind), Some(EventKind::Arrange));
}

#[test]
fn deliver_reaches_adopted_window_only() {
    let rig = Rig::new();
    let window = rig.window(1, WindowKind::TextGrid);
    window.begin_request(InputRequest::new(RequestKind::Mouse));
    assert!(rig.display.deliver(window.window(), Input::Mouse { x: 2, y: 3 }));
    assert!(!rig.display.deliver(Handle::from_raw(9).unwrap(), Input::Mouse { x: 0, y: 0 }));
    rig.run_ui();
    assert_eq!(rig.events.pop(), Event::mouse_input(window.window(), 2, 3));
}

#[test]
fn typed_text_prefers_line_input() {
    let rig = Rig::new();
    let keys = rig.window(1, WindowKind::TextGrid);
    let prose = rig.window(2, WindowKind::TextBuffer);
    let buffer = LineBuffer::new();
    keys.begin_request(InputRequest::new(RequestKind::Char));
    prose.begin_request(line(&buffer));
    rig.run_ui();

    assert_eq!(rig.display.surface().text_target().map(|(id, _)| id), Some(prose.window()));
    assert!(rig.display.deliver_text("take lamp"));
    rig.run_ui();
    assert_eq!(buffer.contents(), "take lamp");
    assert_eq!(rig.events.pop(), Event::line_input(prose.window(), 9, keycode::RETURN));

    assert!(rig.display.deliver_text("y"));
    rig.run_ui();
    assert_eq!(rig.events.pop(), Event::char_input(keys.window(), 'y' as u32));
}

#[test]
fn typed_text_skips_a_window_whose_line_already_ended() {
    let rig = Rig::new();
    let upper = rig.window(1, WindowKind::TextBuffer);
    let lower = rig.window(2, WindowKind::TextBuffer);
    let upper_buffer = LineBuffer::new();
    let lower_buffer = LineBuffer::new();
    upper.begin_request(line(&upper_buffer));
    lower.begin_request(line(&lower_buffer));
    rig.run_ui();

    // Both land before the upper window's sync drops its watch.
    assert!(rig.display.deliver_text("one"));
    assert_eq!(rig.display.surface().text_target().map(|(id, _)| id), Some(lower.window()));
    assert!(rig.display.deliver_text("two"));
    rig.run_ui();

    assert_eq!(upper_buffer.contents(), "one");
    assert_eq!(lower_buffer.contents(), "two");
    assert!(lower.pending_request().is_none());
    assert_eq!(rig.events.len(), 2);
}

#[test]
fn empty_line_to_char_request_is_return() {
    let rig = Rig::new();
    let keys = rig.window(1, WindowKind::TextBuffer);
    keys.begin_request(InputRequest::new(RequestKind::Char));
    rig.run_ui();
    assert!(rig.display.deliver_text(""));
    rig.run_ui();
    assert_eq!(rig.events.pop(), Event::char_input(keys.window(), keycode::RETURN));
}

#[test]
fn typeahead_waits_for_a_request() {
    let rig = Rig::new();
    let prose = rig.window(1, WindowKind::TextBuffer);
    assert!(!rig.display.deliver_text("north"));
    assert!(!rig.display.deliver_text("south"));

    let first = LineBuffer::new();
    prose.begin_request(line(&first));
    rig.run_ui();
    assert_eq!(first.contents(), "north");
    rig.events.pop();

    let second = LineBuffer::new();
    prose.begin_request(line(&second));
    rig.run_ui();
    assert_eq!(second.contents(), "south");
}

#[test]
fn end_of_input_waits_for_held_text() {
    let rig = Rig::new();
    let prose = rig.window(1, WindowKind::TextBuffer);
    rig.display.deliver_text("quit");
    rig.display.end_of_input();
    assert!(!rig.events.is_interrupted());

    let buffer = LineBuffer::new();
    prose.begin_request(line(&buffer));
    rig.run_ui();
    assert_eq!(buffer.contents(), "quit");
    assert!(!rig.events.is_interrupted());

    // Asking again finds nothing left.
    rig.events.pop();
    prose.begin_request(line(&LineBuffer::new()));
    rig.run_ui();
    assert!(rig.events.is_interrupted());
}

#[test]
fn shutdown_wakes_a_blocked_consumer() {
    let rig = Rig::new();
    let events = Arc::clone(&rig.events);
    let consumer = std::thread::spawn(move || events.pop());
    rig.display.shutdown();
    assert_eq!(consumer.join().unwrap().kind, EventKind::None);
    assert!(rig.events.is_interrupted());
}

#[test]
fn ui_side_cancel() {
    let rig = Rig::new();
    let prose = rig.window(1, WindowKind::TextBuffer);
    let buffer = LineBuffer::new();
    prose.begin_request(line(&buffer));
    rig.run_ui();
    rig.log.set_partial(prose.window(), "hal");
    assert!(rig.display.cancel(prose.window()));
    assert!(!rig.display.cancel(prose.window()));
    rig.run_ui();
    assert_eq!(rig.events.pop(), Event::line_input(prose.window(), 3, 0));
}
