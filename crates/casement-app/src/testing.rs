//! Shared fixtures for tests that need a live display.

use std::sync::Arc;
use std::thread::JoinHandle;

use casement_common::{EventQueue, TaskChannel};
use casement_config::{MetricsConfig, RuntimeConfig};
use casement_tiling::LayoutEngine;

use crate::display::{Display, HeadlessRenderer, RenderLog, Surface};
use crate::session::Session;

/// A session talking to a headless 800x600 display whose UI loop runs on
/// its own thread.
pub struct Rig {
    pub session: Session,
    pub ui: TaskChannel,
    pub log: RenderLog,
    ui_thread: Option<JoinHandle<()>>,
}

impl Rig {
    pub fn new() -> Self {
        let (renderer, log) = HeadlessRenderer::new(MetricsConfig::default());
        let (channel, task_loop) = TaskChannel::new();
        let surface = Surface::new(
            Box::new(renderer),
            Arc::new(EventQueue::new()),
            channel.clone(),
            LayoutEngine::default(),
        );
        let display = Display::new(surface, 800, 600);
        let ui_thread = task_loop.spawn("ui").unwrap();
        Self {
            session: Session::new(display, RuntimeConfig::default()),
            ui: channel,
            log,
            ui_thread: Some(ui_thread),
        }
    }

    /// Act as the user: run `work` against the display on the UI thread.
    pub fn user(&self, work: impl FnOnce(&Display) + Send + 'static) {
        let display = Arc::clone(self.session.display());
        self.ui.send_task(move || work(&display)).unwrap();
    }

    /// Type `lines` ahead and then close the input.
    pub fn type_ahead(&self, lines: &[&str]) {
        let lines: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        self.user(move |display| {
            for line in &lines {
                display.deliver_text(line);
            }
            display.end_of_input();
        });
    }
}

impl Drop for Rig {
    fn drop(&mut self) {
        self.ui.quit();
        if let Some(thread) = self.ui_thread.take() {
            let _ = thread.join();
        }
    }
}
