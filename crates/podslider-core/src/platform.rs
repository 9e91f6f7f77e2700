//! Platform abstraction for runtime services.
//!
//! The host decides when frames happen. The runtime only asks for one.

/// Schedules work for the runtime.
///
/// Implementations forward frame requests to the host event loop. They must
/// be safe to call from any thread because task wakers hold onto them.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}
