//! Testing utilities and harness for Podslider

pub mod assertions;
mod rule;

pub use assertions::assert_approx_eq;
pub use rule::{SliderTestRule, FRAME_MILLIS};
