use crate::runtime::RuntimeHandle;
use crate::{FrameCallbackId, NANOS_PER_MILLI};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Frame-synchronized time source backed by the runtime's frame callbacks.
///
/// All time observed through the clock is frame time: the value the host
/// passed to [`RuntimeHandle::drain_frame_callbacks`]. Nothing here reads a
/// wall clock.
#[derive(Clone)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    /// Registers a one-shot callback for the next frame.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let runtime = self.runtime.clone();
        match runtime.register_frame_callback(callback) {
            Some(id) => FrameCallbackRegistration::new(runtime, id),
            None => FrameCallbackRegistration::inactive(runtime),
        }
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| callback(nanos / NANOS_PER_MILLI))
    }

    /// Resolves with the time of the next frame.
    pub fn next_frame(&self) -> NextFrame {
        NextFrame::new(self.clone())
    }

    /// Suspends until at least `millis` of frame time have passed.
    ///
    /// The countdown starts at the most recent frame time when the future is
    /// first polled and completes on the first frame at or past the deadline.
    pub async fn delay_millis(&self, millis: u64) {
        let duration_nanos = millis.saturating_mul(NANOS_PER_MILLI);
        let start = self.runtime.frame_time_nanos();
        loop {
            let now = self.next_frame().await;
            if now.saturating_sub(start) >= duration_nanos {
                break;
            }
        }
    }
}

/// Keeps a frame callback alive. Dropping or cancelling it unregisters the
/// callback.
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(runtime: RuntimeHandle, id: FrameCallbackId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Default)]
struct NextFrameSlot {
    registration: Option<FrameCallbackRegistration>,
    time: Option<u64>,
    waker: Option<Waker>,
}

/// Future returned by [`FrameClock::next_frame`].
pub struct NextFrame {
    clock: FrameClock,
    slot: Rc<RefCell<NextFrameSlot>>,
}

impl NextFrame {
    fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            slot: Rc::new(RefCell::new(NextFrameSlot::default())),
        }
    }

    fn register(&self) -> FrameCallbackRegistration {
        let slot = Rc::downgrade(&self.slot);
        self.clock.with_frame_nanos(move |time| {
            let Some(slot) = slot.upgrade() else {
                return;
            };
            let waker = {
                let mut slot = slot.borrow_mut();
                slot.time = Some(time);
                // The callback already fired; dropping the registration is a no-op.
                slot.registration.take();
                slot.waker.take()
            };
            if let Some(waker) = waker {
                waker.wake();
            }
        })
    }
}

impl Future for NextFrame {
    type Output = u64;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let needs_registration = {
            let mut slot = self.slot.borrow_mut();
            if let Some(time) = slot.time {
                return Poll::Ready(time);
            }
            slot.waker = Some(cx.waker().clone());
            slot.registration.is_none()
        };

        if needs_registration {
            let registration = self.register();
            self.slot.borrow_mut().registration = Some(registration);
        }
        Poll::Pending
    }
}
