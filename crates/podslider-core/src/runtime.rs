use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use rustc_hash::FxHashSet;

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::FrameCallbackId;

type LocalTask = Box<dyn FnOnce() + 'static>;
type FrameCallback = Box<dyn FnOnce(u64) + 'static>;

struct TaskEntry {
    id: u64,
    future: Pin<Box<dyn Future<Output = ()> + 'static>>,
}

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<FrameCallback>,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    frame_time_nanos: Cell<u64>,
    local_tasks: RefCell<VecDeque<LocalTask>>,
    tasks: RefCell<Vec<TaskEntry>>,
    next_task_id: Cell<u64>,
    // Ids cancelled while their entry was checked out for polling.
    cancelled_tasks: RefCell<FxHashSet<u64>>,
    checked_out: RefCell<FxHashSet<u64>>,
    polling: Cell<bool>,
    poll_requested: Arc<AtomicBool>,
    task_waker: RefCell<Option<Waker>>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            frame_time_nanos: Cell::new(0),
            local_tasks: RefCell::new(VecDeque::new()),
            tasks: RefCell::new(Vec::new()),
            next_task_id: Cell::new(1),
            cancelled_tasks: RefCell::new(FxHashSet::default()),
            checked_out: RefCell::new(FxHashSet::default()),
            polling: Cell::new(false),
            poll_requested: Arc::new(AtomicBool::new(false)),
            task_waker: RefCell::new(None),
        }
    }

    fn init_task_waker(&self) {
        let waker = RuntimeTaskWaker {
            scheduler: Arc::clone(&self.scheduler),
            poll_requested: Arc::clone(&self.poll_requested),
        }
        .into_waker();
        *self.task_waker.borrow_mut() = Some(waker);
    }

    fn request_poll(&self) {
        self.poll_requested.store(true, Ordering::SeqCst);
        self.scheduler.schedule_frame();
    }

    fn enqueue_ui_task(&self, task: LocalTask) {
        self.local_tasks.borrow_mut().push_back(task);
        self.scheduler.schedule_frame();
    }

    fn spawn_ui_task(&self, future: Pin<Box<dyn Future<Output = ()> + 'static>>) -> u64 {
        let id = self.next_task_id.get();
        self.next_task_id.set(id + 1);
        self.tasks.borrow_mut().push(TaskEntry { id, future });
        self.request_poll();
        id
    }

    fn cancel_task(&self, id: u64) {
        let removed: Vec<TaskEntry> = {
            let mut tasks = self.tasks.borrow_mut();
            let (removed, kept) = std::mem::take(&mut *tasks)
                .into_iter()
                .partition(|entry| entry.id == id);
            *tasks = kept;
            removed
        };
        if removed.is_empty() && self.polling.get() {
            self.cancelled_tasks.borrow_mut().insert(id);
        }
        if !removed.is_empty() {
            log::trace!("cancelled task {id}");
        }
        drop(removed);
    }

    fn has_task(&self, id: u64) -> bool {
        if self.cancelled_tasks.borrow().contains(&id) {
            return false;
        }
        self.checked_out.borrow().contains(&id)
            || self.tasks.borrow().iter().any(|entry| entry.id == id)
    }

    fn poll_async_tasks(&self) -> bool {
        if !self.poll_requested.swap(false, Ordering::SeqCst) {
            return false;
        }
        let waker = match self.task_waker.borrow().as_ref() {
            Some(waker) => waker.clone(),
            None => return false,
        };
        let mut cx = Context::from_waker(&waker);

        let checked_out = std::mem::take(&mut *self.tasks.borrow_mut());
        self.checked_out
            .borrow_mut()
            .extend(checked_out.iter().map(|entry| entry.id));
        self.polling.set(true);
        let mut pending = Vec::with_capacity(checked_out.len());
        for mut entry in checked_out {
            if self.cancelled_tasks.borrow().contains(&entry.id) {
                continue;
            }
            let poll = entry.future.as_mut().poll(&mut cx);
            self.checked_out.borrow_mut().remove(&entry.id);
            match poll {
                Poll::Ready(()) => {
                    log::trace!("task {} completed", entry.id);
                }
                Poll::Pending => pending.push(entry),
            }
        }
        self.checked_out.borrow_mut().clear();
        self.polling.set(false);

        let (cancelled, pending): (Vec<TaskEntry>, Vec<TaskEntry>) = {
            let cancelled_ids = self.cancelled_tasks.borrow();
            pending
                .into_iter()
                .partition(|entry| cancelled_ids.contains(&entry.id))
        };
        self.cancelled_tasks.borrow_mut().clear();
        drop(cancelled);

        let mut tasks = self.tasks.borrow_mut();
        let spawned = std::mem::take(&mut *tasks);
        tasks.extend(pending);
        tasks.extend(spawned);
        true
    }

    fn drain_ui(&self) {
        loop {
            let mut executed = false;

            loop {
                let task = self.local_tasks.borrow_mut().pop_front();
                match task {
                    Some(task) => {
                        executed = true;
                        task();
                    }
                    None => break,
                }
            }

            if self.poll_async_tasks() {
                executed = true;
            }

            if !executed {
                break;
            }
        }
    }

    fn has_pending_ui(&self) -> bool {
        let local_pending = self
            .local_tasks
            .try_borrow()
            .map(|tasks| !tasks.is_empty())
            .unwrap_or(true);
        local_pending || self.poll_requested.load(Ordering::SeqCst)
    }

    fn register_frame_callback(&self, callback: FrameCallback) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.scheduler.schedule_frame();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let previous = self.frame_time_nanos.get();
        if frame_time_nanos < previous {
            log::warn!("frame time went backwards: {frame_time_nanos} < {previous}");
        }
        self.frame_time_nanos.set(frame_time_nanos.max(previous));

        let pending: Vec<FrameCallback> = {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            callbacks
                .drain(..)
                .filter_map(|mut entry| entry.callback.take())
                .collect()
        };
        for callback in pending {
            callback(self.frame_time_nanos.get());
        }
    }
}

/// Owner of the UI runtime. Dropping it invalidates every handle.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        let inner = Rc::new(RuntimeInner::new(scheduler));
        inner.init_task_waker();
        Self { inner }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.has_frame_callbacks() || self.inner.has_pending_ui()
    }
}

#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

/// Handle to a spawned task.
///
/// Dropping the handle leaves the task running; only [`TaskHandle::cancel`]
/// removes it.
pub struct TaskHandle {
    id: u64,
    runtime: RuntimeHandle,
}

impl RuntimeHandle {
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Schedules a closure on the runtime's local queue.
    ///
    /// The closure runs on the next [`RuntimeHandle::drain_ui`] in FIFO order,
    /// so it may capture `Rc`/`RefCell` values. When the runtime is gone the
    /// closure runs immediately.
    pub fn enqueue_ui_task(&self, task: Box<dyn FnOnce() + 'static>) {
        if let Some(inner) = self.inner.upgrade() {
            inner.enqueue_ui_task(task);
        } else {
            task();
        }
    }

    pub fn spawn_ui<F>(&self, fut: F) -> Option<TaskHandle>
    where
        F: Future<Output = ()> + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let id = inner.spawn_ui_task(Box::pin(fut));
            TaskHandle {
                id,
                runtime: self.clone(),
            }
        })
    }

    pub fn cancel_task(&self, id: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_task(id);
        }
    }

    pub fn has_task(&self, id: u64) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_task(id))
            .unwrap_or(false)
    }

    /// Runs local tasks and polls woken tasks until nothing is left to do.
    pub fn drain_ui(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_ui();
        }
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_pending_ui())
            .unwrap_or(false)
    }

    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    /// Delivers one frame: fires frame callbacks, then drains the UI queue so
    /// tasks woken by the frame make progress.
    pub fn run_frame(&self, frame_time_nanos: u64) {
        self.drain_frame_callbacks(frame_time_nanos);
        self.drain_ui();
    }

    /// Time of the most recent frame, in nanoseconds.
    pub fn frame_time_nanos(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| inner.frame_time_nanos.get())
            .unwrap_or(0)
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn needs_frame(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks() || inner.has_pending_ui())
            .unwrap_or(false)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.runtime.has_task(self.id)
    }

    pub fn cancel(self) {
        self.runtime.cancel_task(self.id);
    }
}

struct RuntimeTaskWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
    poll_requested: Arc<AtomicBool>,
}

impl RuntimeTaskWaker {
    fn into_waker(self) -> Waker {
        futures_task::waker(Arc::new(self))
    }
}

impl futures_task::ArcWake for RuntimeTaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.poll_requested.store(true, Ordering::SeqCst);
        arc_self.scheduler.schedule_frame();
    }
}
