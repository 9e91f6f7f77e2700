mod event;
mod scope;

pub use event::{PointerEvent, PointerEventKind, PointerId, PointerInputChange};
pub use scope::{AwaitPointerEventScope, PointerInputScope};

#[cfg(test)]
#[path = "../tests/pointer_scope_tests.rs"]
mod tests;
