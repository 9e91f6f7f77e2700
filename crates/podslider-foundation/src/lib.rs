//! Foundation layer for Podslider
//!
//! Pointer events flow from the host into a [`PointerInputScope`], where a
//! suspended gesture loop picks them up. The gesture helpers and velocity
//! tracker here are the building blocks the slider's drag loop is written
//! with.

pub mod gesture_constants;
mod geometry;
pub mod gestures;
mod pointer;
mod velocity_tracker;

pub use geometry::{Point, Size};
pub use gestures::{await_first_down, horizontal_drag};
pub use pointer::{
    AwaitPointerEventScope, PointerEvent, PointerEventKind, PointerId, PointerInputChange,
    PointerInputScope,
};
pub use velocity_tracker::{
    Velocity, VelocityTracker, VelocityTracker1D, VelocityTrackerStrategy, ASSUME_STOPPED_MS,
};
