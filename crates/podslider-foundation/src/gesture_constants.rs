//! Shared gesture constants.
//!
//! Values are in logical pixels at baseline density.

/// Maximum fling velocity in logical pixels per second, matching the
/// platform default on a baseline density.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;
