//! Animation primitives for Podslider
//!
//! Spring physics for settling, an [`Animatable`] value holder with implicit
//! cancellation, and fling decay models used to project where an inertial
//! motion would come to rest.

mod animatable;
mod decay;
mod spring;

pub use animatable::{Animatable, AnimationEndReason, AnimationResult};
pub use decay::{DecaySpec, ExponentialDecaySpec, FloatDecayAnimationSpec, SplineBasedDecaySpec};
pub use spring::{
    DampingRatio, SpringMotion, SpringSpec, Stiffness, DEFAULT_VISIBILITY_THRESHOLD,
};
