use std::cell::Cell;
use std::rc::Rc;

/// Cooperative cancellation token for work running on the UI runtime.
///
/// Clones share the same flag. Work that owns a token checks
/// [`CancelToken::is_cancelled`] after every suspension point and stops
/// writing shared state once it flips.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    pub fn is_active(&self) -> bool {
        !self.cancelled.get()
    }

    /// Returns `true` when both tokens were cloned from the same original.
    pub fn same_token(&self, other: &CancelToken) -> bool {
        Rc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}
