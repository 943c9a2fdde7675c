//! Cross-thread task dispatch.
//!
//! A [`TaskLoop`] runs on one thread and executes work handed to it
//! through any number of cloned [`TaskChannel`]s. Callers already on the
//! loop's thread run their work inline; blocking on their own loop would
//! never return.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

use crate::errors::TaskError;
use crate::sync::Semaphore;

type Task = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Task),
    Quit,
}

#[derive(Clone)]
pub struct TaskChannel {
    sender: Sender<Message>,
    target: Arc<OnceLock<ThreadId>>,
    queued: Arc<AtomicUsize>,
}

pub struct TaskLoop {
    receiver: Receiver<Message>,
    target: Arc<OnceLock<ThreadId>>,
    queued: Arc<AtomicUsize>,
}

impl TaskChannel {
    /// Create a channel and the loop that will service it. The loop binds
    /// to whichever thread first runs it.
    pub fn new() -> (TaskChannel, TaskLoop) {
        let (sender, receiver) = mpsc::channel();
        let target = Arc::new(OnceLock::new());
        let queued = Arc::new(AtomicUsize::new(0));
        (
            TaskChannel {
                sender,
                target: Arc::clone(&target),
                queued: Arc::clone(&queued),
            },
            TaskLoop {
                receiver,
                target,
                queued,
            },
        )
    }

    pub fn is_target_thread(&self) -> bool {
        self.target.get() == Some(&thread::current().id())
    }

    /// Tasks enqueued and not yet started.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Acquire)
    }

    /// Fire-and-forget. Runs inline when called on the target thread.
    pub fn post_task<F>(&self, work: F) -> Result<(), TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_target_thread() {
            work();
            return Ok(());
        }
        self.enqueue(Box::new(work))
    }

    /// Queue `work` for the loop's next turn, even from the target thread.
    pub fn defer<F>(&self, work: F) -> Result<(), TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(Box::new(work))
    }

    /// Run `work` on the target thread and block until it has finished.
    ///
    /// A panic inside `work` is caught on the target thread and returned
    /// as [`TaskError::Panicked`]; the loop keeps running.
    pub fn send_task<F, R>(&self, work: F) -> Result<R, TaskError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_target_thread() {
            return panic::catch_unwind(AssertUnwindSafe(work))
                .map_err(|payload| TaskError::Panicked(panic_message(payload)));
        }

        let done = Arc::new(Semaphore::new(0));
        let slot: Arc<Mutex<Option<Result<R, TaskError>>>> = Arc::new(Mutex::new(None));
        let completion = Completion {
            done: Arc::clone(&done),
        };
        let result_slot = Arc::clone(&slot);
        self.enqueue(Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(work))
                .map_err(|payload| TaskError::Panicked(panic_message(payload)));
            *result_slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(result);
            drop(completion);
        }))?;

        done.acquire();
        let result = slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or(Err(TaskError::Dropped));
        result
    }

    /// Ask the loop to stop after the tasks already queued.
    pub fn quit(&self) {
        let _ = self.sender.send(Message::Quit);
    }

    fn enqueue(&self, task: Task) -> Result<(), TaskError> {
        self.queued.fetch_add(1, Ordering::AcqRel);
        self.sender.send(Message::Run(task)).map_err(|_| {
            self.queued.fetch_sub(1, Ordering::AcqRel);
            TaskError::Disconnected
        })
    }
}

impl TaskLoop {
    /// Execute tasks until [`TaskChannel::quit`] is called or every
    /// channel has been dropped.
    pub fn run(self) {
        self.bind();
        tracing::debug!("task loop running");
        while let Ok(message) = self.receiver.recv() {
            match message {
                Message::Run(task) => self.execute(task),
                Message::Quit => break,
            }
        }
        tracing::debug!("task loop stopped");
    }

    /// Execute every task queued right now without blocking. Returns
    /// `false` once the loop has been asked to quit or lost its channels.
    pub fn run_pending(&self) -> bool {
        self.bind();
        loop {
            match self.receiver.try_recv() {
                Ok(Message::Run(task)) => self.execute(task),
                Ok(Message::Quit) | Err(TryRecvError::Disconnected) => return false,
                Err(TryRecvError::Empty) => return true,
            }
        }
    }

    /// Move the loop onto a new named thread.
    pub fn spawn(self, name: &str) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || self.run())
    }

    fn execute(&self, task: Task) {
        self.queued.fetch_sub(1, Ordering::AcqRel);
        task();
    }

    fn bind(&self) {
        let current = thread::current().id();
        let bound = *self.target.get_or_init(|| current);
        assert_eq!(bound, current, "task loop moved between threads");
    }
}

/// Releases the caller of `send_task` whether or not the work ran.
struct Completion {
    done: Arc<Semaphore>,
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.done.release();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn send_task_runs_on_loop_thread() {
        let (channel, task_loop) = TaskChannel::new();
        let handle = task_loop.spawn("ui").unwrap();

        let name = channel
            .send_task(|| thread::current().name().map(str::to_string))
            .unwrap();
        assert_eq!(name.as_deref(), Some("ui"));

        channel.quit();
        handle.join().unwrap();
    }

    #[test]
    fn send_task_effects_visible_on_return() {
        let (channel, task_loop) = TaskChannel::new();
        let handle = task_loop.spawn("ui").unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            channel
                .send_task(move || {
                    counter.fetch_add(1, Ordering::Relaxed);
                })
                .unwrap();
        }
        assert_eq!(counter.load(Ordering::Relaxed), 10);

        channel.quit();
        handle.join().unwrap();
    }

    #[test]
    fn send_task_from_target_thread_runs_inline_once() {
        let (channel, task_loop) = TaskChannel::new();
        let handle = task_loop.spawn("ui").unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let inner_channel = channel.clone();
        let inner_runs = Arc::clone(&runs);
        let nested = channel
            .send_task(move || {
                // Already on the loop thread: must not block on itself.
                inner_channel.send_task(move || {
                    inner_runs.fetch_add(1, Ordering::SeqCst);
                    7
                })
            })
            .unwrap();

        assert_eq!(nested, Ok(7));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        channel.quit();
        handle.join().unwrap();
    }

    #[test]
    fn ui_thread_can_call_into_a_program_loop() {
        let (ui, ui_loop) = TaskChannel::new();
        let (program, program_loop) = TaskChannel::new();
        let ui_handle = ui_loop.spawn("ui").unwrap();

        let answer = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&answer);
        let to_program = program.clone();
        ui.post_task(move || {
            let reply = to_program.send_task(|| thread::current().name().map(str::to_string));
            *seen.lock().unwrap() = Some(reply);
            to_program.quit();
        })
        .unwrap();

        // This thread plays the program side until the UI task quits it.
        program_loop.run();

        let here = thread::current().name().map(str::to_string);
        assert_eq!(*answer.lock().unwrap(), Some(Ok(here)));
        assert!(program.is_target_thread());

        ui.quit();
        ui_handle.join().unwrap();
    }

    #[test]
    fn post_task_inline_on_target_thread() {
        let (channel, task_loop) = TaskChannel::new();
        let handle = task_loop.spawn("ui").unwrap();

        let inner = channel.clone();
        let order = channel
            .send_task(move || {
                let log = Arc::new(Mutex::new(Vec::new()));
                let posted = Arc::clone(&log);
                inner.post_task(move || posted.lock().unwrap().push("posted")).unwrap();
                log.lock().unwrap().push("after");
                let result = log.lock().unwrap().clone();
                result
            })
            .unwrap();
        assert_eq!(order, vec!["posted", "after"]);

        channel.quit();
        handle.join().unwrap();
    }

    #[test]
    fn defer_from_target_thread_runs_later() {
        let (channel, task_loop) = TaskChannel::new();
        let handle = task_loop.spawn("ui").unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner = channel.clone();
        let task_log = Arc::clone(&log);
        channel
            .send_task(move || {
                let deferred = Arc::clone(&task_log);
                inner
                    .defer(move || deferred.lock().unwrap().push("deferred"))
                    .unwrap();
                task_log.lock().unwrap().push("task");
            })
            .unwrap();
        // Barrier: the deferred task was queued before this one.
        channel.send_task(|| ()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["task", "deferred"]);

        channel.quit();
        handle.join().unwrap();
    }

    #[test]
    fn panicking_task_becomes_error_value() {
        let (channel, task_loop) = TaskChannel::new();
        let handle = task_loop.spawn("ui").unwrap();

        let result: Result<(), _> = channel.send_task(|| panic!("exploded"));
        assert_eq!(result, Err(TaskError::Panicked("exploded".into())));
        // The loop survives.
        assert_eq!(channel.send_task(|| 1 + 1), Ok(2));

        channel.quit();
        handle.join().unwrap();
    }

    #[test]
    fn send_after_loop_gone_is_disconnected() {
        let (channel, task_loop) = TaskChannel::new();
        drop(task_loop);
        assert_eq!(channel.send_task(|| ()), Err(TaskError::Disconnected));
        assert_eq!(channel.post_task(|| ()), Err(TaskError::Disconnected));
    }

    #[test]
    fn queued_task_dropped_by_quit_releases_caller() {
        let (channel, task_loop) = TaskChannel::new();
        channel.quit();
        let sender = channel.clone();
        let caller = thread::spawn(move || sender.send_task(|| 5));
        thread::sleep(Duration::from_millis(50));
        // The loop stops at Quit and drops the pending task unexecuted.
        task_loop.run();
        assert_eq!(caller.join().unwrap(), Err(TaskError::Dropped));
    }

    #[test]
    fn run_pending_drains_without_blocking() {
        let (channel, task_loop) = TaskChannel::new();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let counter = Arc::clone(&counter);
            channel
                .post_task(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        assert_eq!(channel.queued(), 3);
        assert!(task_loop.run_pending());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(channel.queued(), 0);
        assert!(channel.is_target_thread());

        channel.quit();
        assert!(!task_loop.run_pending());
    }
}
