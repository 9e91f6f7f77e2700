use super::*;
use crate::geometry::Point;
use crate::pointer::{PointerEvent, PointerInputScope};

use podslider_core::{DefaultScheduler, Runtime, RuntimeHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

struct DragRecorder {
    down_id: Cell<Option<PointerId>>,
    deltas: RefCell<Vec<f32>>,
    released: Cell<Option<bool>>,
}

fn spawn_drag_recorder(handle: &RuntimeHandle, scope: &PointerInputScope) -> Rc<DragRecorder> {
    let recorder = Rc::new(DragRecorder {
        down_id: Cell::new(None),
        deltas: RefCell::new(Vec::new()),
        released: Cell::new(None),
    });
    let task_recorder = Rc::clone(&recorder);
    let scope = scope.clone();
    handle.spawn_ui(async move {
        scope
            .await_pointer_event_scope(|events| async move {
                let down = await_first_down(&events).await;
                task_recorder.down_id.set(Some(down.id));
                let released = horizontal_drag(&events, down.id, |change| {
                    task_recorder
                        .deltas
                        .borrow_mut()
                        .push(change.position_change().x);
                })
                .await;
                task_recorder.released.set(Some(released));
            })
            .await;
    });
    handle.drain_ui();
    recorder
}

#[test]
fn drag_reports_horizontal_deltas_until_release() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    let scope = PointerInputScope::new();
    let recorder = spawn_drag_recorder(&handle, &scope);

    scope.dispatch(PointerEvent::down(7, Point::new(300.0, 10.0), 0));
    scope.dispatch(PointerEvent::moved(7, Point::new(280.0, 10.0), 16));
    scope.dispatch(PointerEvent::moved(7, Point::new(280.0, 30.0), 32));
    scope.dispatch(PointerEvent::moved(7, Point::new(310.0, 30.0), 48));
    scope.dispatch(PointerEvent::up(7, Point::new(310.0, 30.0), 64));
    handle.drain_ui();

    assert_eq!(recorder.down_id.get(), Some(7));
    // The purely vertical move is not a horizontal drag.
    assert_eq!(*recorder.deltas.borrow(), vec![-20.0, 30.0]);
    assert_eq!(recorder.released.get(), Some(true));
}

#[test]
fn moves_before_a_down_are_skipped() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    let scope = PointerInputScope::new();
    let recorder = spawn_drag_recorder(&handle, &scope);

    scope.dispatch(PointerEvent::moved(2, Point::new(50.0, 0.0), 0));
    scope.dispatch(PointerEvent::up(2, Point::new(50.0, 0.0), 10));
    handle.drain_ui();
    assert_eq!(recorder.down_id.get(), None);

    scope.dispatch(PointerEvent::down(4, Point::new(60.0, 0.0), 20));
    handle.drain_ui();
    assert_eq!(recorder.down_id.get(), Some(4));
}

#[test]
fn other_pointers_do_not_steer_the_drag() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    let scope = PointerInputScope::new();
    let recorder = spawn_drag_recorder(&handle, &scope);

    scope.dispatch(PointerEvent::down(1, Point::new(100.0, 0.0), 0));
    scope.dispatch(PointerEvent::down(2, Point::new(400.0, 0.0), 5));
    scope.dispatch(PointerEvent::moved(2, Point::new(450.0, 0.0), 10));
    scope.dispatch(PointerEvent::up(2, Point::new(450.0, 0.0), 15));
    scope.dispatch(PointerEvent::moved(1, Point::new(90.0, 0.0), 20));
    handle.drain_ui();

    assert_eq!(*recorder.deltas.borrow(), vec![-10.0]);
    assert_eq!(recorder.released.get(), None);
}

#[test]
fn cancel_ends_the_drag_without_release() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    let scope = PointerInputScope::new();
    let recorder = spawn_drag_recorder(&handle, &scope);

    scope.dispatch(PointerEvent::down(1, Point::new(100.0, 0.0), 0));
    scope.dispatch(PointerEvent::cancel(1, Point::new(100.0, 0.0), 16));
    handle.drain_ui();

    assert_eq!(recorder.released.get(), Some(false));
}
