use super::event::{PointerEvent, PointerEventKind, PointerId, PointerInputChange};
use crate::geometry::{Point, Size};
use log::trace;
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Clone, Copy)]
struct PointerSnapshot {
    position: Point,
    uptime_millis: i64,
    pressed: bool,
}

struct PointerInputScopeState {
    events: RefCell<VecDeque<PointerInputChange>>,
    waiting: RefCell<Option<Waker>>,
    pointers: RefCell<FxHashMap<PointerId, PointerSnapshot>>,
    size: Cell<Size>,
    density: Cell<f32>,
}

impl PointerInputScopeState {
    fn new() -> Self {
        Self {
            events: RefCell::new(VecDeque::new()),
            waiting: RefCell::new(None),
            pointers: RefCell::new(FxHashMap::default()),
            size: Cell::new(Size::ZERO),
            density: Cell::new(1.0),
        }
    }

    fn to_change(&self, event: PointerEvent) -> PointerInputChange {
        let mut pointers = self.pointers.borrow_mut();
        let pressed = matches!(event.kind, PointerEventKind::Down | PointerEventKind::Move);
        let previous = match event.kind {
            PointerEventKind::Down => None,
            _ => pointers.get(&event.id).copied(),
        };
        let previous = previous.unwrap_or(PointerSnapshot {
            position: event.position,
            uptime_millis: event.uptime_millis,
            pressed: false,
        });

        if pressed {
            pointers.insert(
                event.id,
                PointerSnapshot {
                    position: event.position,
                    uptime_millis: event.uptime_millis,
                    pressed,
                },
            );
        } else {
            pointers.remove(&event.id);
        }

        PointerInputChange {
            id: event.id,
            kind: event.kind,
            position: event.position,
            uptime_millis: event.uptime_millis,
            previous_position: previous.position,
            previous_uptime_millis: previous.uptime_millis,
            pressed,
            // Moves without a prior down still count as pressed before.
            previous_pressed: previous.pressed || event.kind == PointerEventKind::Move,
        }
    }

    fn push_event(&self, event: PointerEvent) {
        let change = self.to_change(event);
        trace!("pointer {:?} {} at {:?}", change.kind, change.id, change.position);
        self.events.borrow_mut().push_back(change);
        let waker = self.waiting.borrow_mut().take();
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    fn poll_event(&self, cx: &mut Context<'_>) -> Poll<PointerInputChange> {
        if let Some(change) = self.events.borrow_mut().pop_front() {
            Poll::Ready(change)
        } else {
            self.waiting.replace(Some(cx.waker().clone()));
            Poll::Pending
        }
    }
}

/// Receiving end of a pointer input stream for one widget.
///
/// The host measures the widget, keeps [`size`](Self::size) current, and
/// forwards raw events through [`dispatch`](Self::dispatch). A gesture loop
/// reads them inside [`await_pointer_event_scope`](Self::await_pointer_event_scope).
#[derive(Clone)]
pub struct PointerInputScope {
    state: Rc<PointerInputScopeState>,
}

impl PointerInputScope {
    pub fn new() -> Self {
        Self {
            state: Rc::new(PointerInputScopeState::new()),
        }
    }

    pub fn size(&self) -> Size {
        self.state.size.get()
    }

    pub fn set_size(&self, size: Size) {
        self.state.size.set(size);
    }

    pub fn density(&self) -> f32 {
        self.state.density.get()
    }

    pub fn set_density(&self, density: f32) {
        self.state.density.set(density);
    }

    /// Queues an event and wakes the gesture loop waiting on it.
    pub fn dispatch(&self, event: PointerEvent) {
        self.state.push_event(event);
    }

    pub fn has_pending_events(&self) -> bool {
        !self.state.events.borrow().is_empty()
    }

    pub async fn await_pointer_event_scope<R, F, Fut>(&self, block: F) -> R
    where
        F: FnOnce(AwaitPointerEventScope) -> Fut,
        Fut: Future<Output = R>,
    {
        let scope = AwaitPointerEventScope {
            state: self.state.clone(),
        };
        block(scope).await
    }
}

impl Default for PointerInputScope {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct AwaitPointerEventScope {
    state: Rc<PointerInputScopeState>,
}

impl AwaitPointerEventScope {
    pub fn size(&self) -> Size {
        self.state.size.get()
    }

    pub fn density(&self) -> f32 {
        self.state.density.get()
    }

    /// Suspends until the next pointer change arrives.
    pub async fn await_pointer_event(&self) -> PointerInputChange {
        NextPointerEvent {
            state: self.state.clone(),
        }
        .await
    }
}

struct NextPointerEvent {
    state: Rc<PointerInputScopeState>,
}

impl Future for NextPointerEvent {
    type Output = PointerInputChange;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.state.poll_event(cx)
    }
}
