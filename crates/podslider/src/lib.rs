//! Podslider: a horizontally dragged tick ruler
//!
//! [`SliderState`] holds the value and the motion driving it: drag snaps,
//! the spring settle toward a tick, or nothing. [`slider_drag`] is the
//! gesture loop that feeds it from a pointer stream, and
//! [`SliderGestureController`] runs that loop on a runtime. The [`layout`]
//! module is the read side for whatever draws the ruler.

mod config;
mod error;
mod gesture;
pub mod layout;
mod range;
mod state;

pub use config::{
    DecayModel, SettlePolicy, SliderConfig, DEFAULT_SEGMENTS, DEFAULT_SETTLE_DELAY_MILLIS,
    DEFAULT_VALUE,
};
pub use error::SliderError;
pub use gesture::{slider_drag, SliderGestureController};
pub use layout::{format_speed, visible_ticks, TickPlacement, VisibleTicks};
pub use range::TickRange;
pub use state::{MotionPhase, SavedSliderState, SliderState};

pub use podslider_animation::{AnimationEndReason, AnimationResult, SpringSpec};
pub use podslider_foundation::gesture_constants::MAX_FLING_VELOCITY;
pub use podslider_foundation::{
    Point, PointerEvent, PointerEventKind, PointerId, Size, VelocityTrackerStrategy,
};
