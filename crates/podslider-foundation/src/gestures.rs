//! Suspending gesture helpers built on [`AwaitPointerEventScope`].

use crate::pointer::{AwaitPointerEventScope, PointerEventKind, PointerId, PointerInputChange};

/// Waits for the next pointer to go down, skipping anything else.
pub async fn await_first_down(scope: &AwaitPointerEventScope) -> PointerInputChange {
    loop {
        let change = scope.await_pointer_event().await;
        if change.changed_to_down() {
            return change;
        }
    }
}

/// Follows `pointer_id` horizontally until it is released or cancelled.
///
/// `on_drag` sees every change of that pointer that moved along x. Events
/// from other pointers are ignored. Returns `true` when the pointer was
/// lifted and `false` when the stream was cancelled.
pub async fn horizontal_drag<F>(
    scope: &AwaitPointerEventScope,
    pointer_id: PointerId,
    mut on_drag: F,
) -> bool
where
    F: FnMut(&PointerInputChange),
{
    loop {
        let change = scope.await_pointer_event().await;
        if change.id != pointer_id {
            continue;
        }
        match change.kind {
            PointerEventKind::Up => return true,
            PointerEventKind::Cancel => return false,
            PointerEventKind::Down => continue,
            PointerEventKind::Move => {
                if change.position_change().x != 0.0 {
                    on_drag(&change);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/gestures_tests.rs"]
mod tests;
