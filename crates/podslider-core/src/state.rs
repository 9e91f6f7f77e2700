use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

struct StateCell<T> {
    value: Cell<T>,
    version: Cell<u64>,
}

/// Observable scalar cell.
///
/// Readers poll [`MutableState::get`] (typically once per frame) and may use
/// [`MutableState::version`] to skip work when nothing changed. Writes that
/// store an equal value do not bump the version.
pub struct MutableState<T: Copy + PartialEq + 'static> {
    inner: Rc<StateCell<T>>,
}

impl<T: Copy + PartialEq + 'static> MutableState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(StateCell {
                value: Cell::new(value),
                version: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.get()
    }

    pub fn set(&self, value: T) {
        if self.inner.value.get() != value {
            self.inner.value.set(value);
            self.inner.version.set(self.inner.version.get().wrapping_add(1));
        }
    }

    pub fn update(&self, f: impl FnOnce(T) -> T) {
        self.set(f(self.get()));
    }

    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Read-only view sharing the same cell.
    pub fn as_state(&self) -> State<T> {
        State {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Copy + PartialEq + 'static> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Copy + PartialEq + fmt::Debug + 'static> fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableState")
            .field("value", &self.get())
            .field("version", &self.version())
            .finish()
    }
}

/// Read-only handle to a [`MutableState`].
pub struct State<T: Copy + PartialEq + 'static> {
    inner: Rc<StateCell<T>>,
}

impl<T: Copy + PartialEq + 'static> State<T> {
    pub fn get(&self) -> T {
        self.inner.value.get()
    }

    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }
}

impl<T: Copy + PartialEq + 'static> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}
