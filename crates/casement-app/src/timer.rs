//! Background source of timer events.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use casement_common::{Event, EventQueue};
use tracing::{debug, warn};

/// Shared flag a timer thread sleeps on.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: Arc::clone(&inner),
        };
        (signal, StopTrigger { inner })
    }

    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `duration` or until stopped. Returns `true` if stopped.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now() + duration;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if *stopped {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            stopped = cvar
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

pub struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }
}

/// A thread pushing [`Event::timer`] every `interval` until stopped.
pub struct TimerSource {
    interval: Duration,
    trigger: StopTrigger,
    thread: Option<JoinHandle<()>>,
}

impl TimerSource {
    pub fn start(events: Arc<EventQueue>, interval: Duration) -> std::io::Result<Self> {
        let (signal, trigger) = StopSignal::new();
        let thread = thread::Builder::new()
            .name("casement-timer".into())
            .spawn(move || {
                let mut ticks: u64 = 0;
                while !signal.wait_timeout(interval) {
                    if events.is_interrupted() {
                        break;
                    }
                    events.push(Event::timer());
                    ticks += 1;
                }
                debug!(ticks, "timer stopped");
            })?;
        debug!(?interval, "timer started");
        Ok(Self {
            interval,
            trigger,
            thread: Some(thread),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("timer thread panicked");
            }
        }
    }
}

impl Drop for TimerSource {
    fn drop(&mut self) {
        self.trigger.stop();
    }
}
