#![doc = r"Core runtime pieces for the Podslider motion stack."]

mod cancel;
pub mod frame_clock;
pub mod platform;
pub mod runtime;
mod state;

pub use cancel::CancelToken;
pub use frame_clock::{FrameCallbackRegistration, FrameClock, NextFrame};
pub use platform::RuntimeScheduler;
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle, TaskHandle};
pub use state::{MutableState, State};

pub type FrameCallbackId = u64;

/// Nanoseconds in one millisecond of frame time.
pub const NANOS_PER_MILLI: u64 = 1_000_000;

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod runtime_tests;

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod state_tests;
