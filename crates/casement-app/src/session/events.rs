//! Event selection, timers and session lifetime.

use std::sync::Arc;
use std::time::Duration;

use casement_common::{CasementError, Event, Result, CAPABILITY_VERSION};
use tracing::{info, warn};

use super::Session;
use crate::timer::TimerSource;

/// How often a blocked `select` rechecks the interrupt flag.
const SELECT_TICK: Duration = Duration::from_millis(50);

impl Session {
    /// Block until the next event. Returns [`CasementError::Interrupted`]
    /// once the display has asked the program to stop, even when no
    /// sentinel event follows the interrupt.
    pub fn select(&self) -> Result<Event> {
        loop {
            if self.events.is_interrupted() {
                return Err(CasementError::Interrupted);
            }
            if let Some(event) = self.events.pop_timeout(SELECT_TICK) {
                if self.events.is_interrupted() {
                    return Err(CasementError::Interrupted);
                }
                return Ok(event);
            }
        }
    }

    /// Take a pending timer, arrange or sound event without blocking.
    pub fn select_poll(&self) -> Option<Event> {
        self.events.poll()
    }

    /// Push a timer event every `millis` milliseconds; 0 stops. Intervals
    /// below the configured minimum are raised to it.
    pub fn request_timer_events(&mut self, millis: u32) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
        if millis == 0 {
            return;
        }
        let millis = millis.max(self.runtime.timer_min_interval_ms);
        match TimerSource::start(Arc::clone(&self.events), Duration::from_millis(millis.into())) {
            Ok(timer) => self.timer = Some(timer),
            Err(e) => warn!("timer thread failed to start: {e}"),
        }
    }

    pub fn timer_interval(&self) -> Option<Duration> {
        self.timer.as_ref().map(TimerSource::interval)
    }

    pub fn version(&self) -> u32 {
        CAPABILITY_VERSION
    }

    /// Wait until the display has applied everything posted so far.
    pub fn flush(&self) -> Result<()> {
        let display = Arc::clone(&self.display);
        self.channel.send_task(move || display.settle())?;
        Ok(())
    }

    /// Close every window and stop the timer.
    pub fn finish(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
        if let Some(root) = self.tree.root() {
            self.close_window(root);
        }
        if let Err(e) = self.flush() {
            warn!("final flush failed: {e}");
        }
        info!("session finished");
    }
}
