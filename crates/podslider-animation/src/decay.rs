//! Fling decay models.
//!
//! A decay has no target of its own: it starts with a velocity and
//! decelerates to zero. The slider only needs the projected resting point
//! and the time it takes to get there, so the models expose those directly.

use log::warn;
use podslider_core::NANOS_PER_MILLI;
use std::sync::LazyLock;

/// Projection of an inertial motion.
pub trait FloatDecayAnimationSpec {
    /// Where a motion starting at `initial_value` with `initial_velocity`
    /// (units per second) comes to rest.
    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32;

    /// How long the motion takes to come to rest.
    fn duration_nanos(&self, initial_velocity: f32) -> u64;

    /// Position `play_time_nanos` into the motion.
    fn value_from_nanos(&self, play_time_nanos: u64, initial_value: f32, initial_velocity: f32)
        -> f32;
}

fn is_moving(velocity: f32) -> bool {
    velocity.is_finite() && velocity != 0.0
}

// Android scroller spline. Positions are sampled once and interpolated.

const INFLECTION: f64 = 0.35;
const START_TENSION: f64 = 0.5;
const END_TENSION: f64 = 1.0;
const P1: f64 = START_TENSION * INFLECTION;
const P2: f64 = 1.0 - END_TENSION * (1.0 - INFLECTION);
const SPLINE_SAMPLES: usize = 100;

const GRAVITY_EARTH: f64 = 9.80665;
const INCHES_PER_METER: f64 = 39.37;
/// `ln(0.78) / ln(0.9)`
const DECELERATION_RATE: f64 = 2.358_201_6;
const PHYSICAL_FRICTION: f64 = 0.84;

static SPLINE_POSITIONS: LazyLock<[f64; SPLINE_SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0; SPLINE_SAMPLES + 1];
    let mut lower = 0.0;
    for (i, slot) in positions.iter_mut().enumerate().take(SPLINE_SAMPLES) {
        let alpha = i as f64 / SPLINE_SAMPLES as f64;
        let mut upper = 1.0;
        // Bisect for the curve parameter whose time component equals alpha.
        let (x, coefficient) = loop {
            let mid = lower + (upper - lower) / 2.0;
            let coefficient = 3.0 * mid * (1.0 - mid);
            let time = coefficient * ((1.0 - mid) * P1 + mid * P2) + mid * mid * mid;
            if (time - alpha).abs() < 1e-5 {
                break (mid, coefficient);
            }
            if time > alpha {
                upper = mid;
            } else {
                lower = mid;
            }
        };
        *slot = coefficient * ((1.0 - x) * START_TENSION + x) + x * x * x;
    }
    positions[SPLINE_SAMPLES] = 1.0;
    positions
});

/// Fraction of the total fling distance covered at `progress` in `[0, 1]`.
fn spline_distance(progress: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    let index = (SPLINE_SAMPLES as f64 * progress) as usize;
    if index >= SPLINE_SAMPLES {
        return 1.0;
    }
    let t_low = index as f64 / SPLINE_SAMPLES as f64;
    let t_high = (index + 1) as f64 / SPLINE_SAMPLES as f64;
    let d_low = SPLINE_POSITIONS[index];
    let d_high = SPLINE_POSITIONS[index + 1];
    d_low + (progress - t_low) * (d_high - d_low) / (t_high - t_low)
}

/// Android-feel fling projection.
///
/// Velocity and distance share one unit; the density scales the physical
/// deceleration the way the platform scroller does for pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineBasedDecaySpec {
    friction: f32,
    density: f32,
}

impl SplineBasedDecaySpec {
    pub const DEFAULT_FRICTION: f32 = 0.015;

    pub fn new(density: f32) -> Self {
        Self::with_friction(Self::DEFAULT_FRICTION, density)
    }

    pub fn with_friction(friction: f32, density: f32) -> Self {
        let density = if density.is_finite() && density > 0.0 {
            density
        } else {
            warn!("invalid density {density}, using 1.0");
            1.0
        };
        Self { friction, density }
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    fn deceleration_friction(&self) -> f64 {
        let physical =
            GRAVITY_EARTH * INCHES_PER_METER * self.density as f64 * 160.0 * PHYSICAL_FRICTION;
        self.friction as f64 * physical
    }

    fn log_deceleration(&self, velocity: f32) -> f64 {
        (INFLECTION * velocity.abs() as f64 / self.deceleration_friction()).ln()
    }

    /// Total distance covered by a fling, always non-negative.
    pub fn fling_distance(&self, velocity: f32) -> f32 {
        if !is_moving(velocity) {
            return 0.0;
        }
        let l = self.log_deceleration(velocity);
        let exponent = DECELERATION_RATE / (DECELERATION_RATE - 1.0) * l;
        (self.deceleration_friction() * exponent.exp()) as f32
    }

    fn duration_millis(&self, velocity: f32) -> f64 {
        if !is_moving(velocity) {
            return 0.0;
        }
        let l = self.log_deceleration(velocity);
        1000.0 * (l / (DECELERATION_RATE - 1.0)).exp()
    }
}

impl Default for SplineBasedDecaySpec {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl FloatDecayAnimationSpec for SplineBasedDecaySpec {
    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        if !is_moving(initial_velocity) {
            return initial_value;
        }
        initial_value + self.fling_distance(initial_velocity) * initial_velocity.signum()
    }

    fn duration_nanos(&self, initial_velocity: f32) -> u64 {
        (self.duration_millis(initial_velocity) * NANOS_PER_MILLI as f64) as u64
    }

    fn value_from_nanos(
        &self,
        play_time_nanos: u64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let duration = self.duration_nanos(initial_velocity);
        if duration == 0 {
            return self.target_value(initial_value, initial_velocity);
        }
        let progress = play_time_nanos as f64 / duration as f64;
        let covered = self.fling_distance(initial_velocity) as f64 * spline_distance(progress);
        initial_value + (covered as f32) * initial_velocity.signum()
    }
}

/// Exponential friction decay: velocity falls off as `e^(friction * t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecaySpec {
    friction: f32,
    abs_velocity_threshold: f32,
}

impl ExponentialDecaySpec {
    const FRICTION_BASE: f32 = -4.2;

    pub fn new(friction_multiplier: f32, abs_velocity_threshold: f32) -> Self {
        Self {
            friction: Self::FRICTION_BASE * friction_multiplier.max(0.0001),
            abs_velocity_threshold: abs_velocity_threshold.abs().max(0.0001),
        }
    }
}

impl Default for ExponentialDecaySpec {
    fn default() -> Self {
        Self::new(1.0, 0.1)
    }
}

impl FloatDecayAnimationSpec for ExponentialDecaySpec {
    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        if !is_moving(initial_velocity) {
            return initial_value;
        }
        initial_value - initial_velocity / self.friction
    }

    fn duration_nanos(&self, initial_velocity: f32) -> u64 {
        if !is_moving(initial_velocity) || initial_velocity.abs() <= self.abs_velocity_threshold {
            return 0;
        }
        let secs = (self.abs_velocity_threshold / initial_velocity.abs()).ln() / self.friction;
        (secs as f64 * 1_000.0 * NANOS_PER_MILLI as f64) as u64
    }

    fn value_from_nanos(
        &self,
        play_time_nanos: u64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        if !is_moving(initial_velocity) {
            return initial_value;
        }
        let secs = play_time_nanos as f64 / 1e9;
        let travelled = initial_velocity as f64 / self.friction as f64
            * ((self.friction as f64 * secs).exp() - 1.0);
        initial_value + travelled as f32
    }
}

/// Decay model selectable at configuration time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecaySpec {
    Spline(SplineBasedDecaySpec),
    Exponential(ExponentialDecaySpec),
}

impl Default for DecaySpec {
    fn default() -> Self {
        DecaySpec::Spline(SplineBasedDecaySpec::default())
    }
}

impl FloatDecayAnimationSpec for DecaySpec {
    fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        match self {
            DecaySpec::Spline(spec) => spec.target_value(initial_value, initial_velocity),
            DecaySpec::Exponential(spec) => spec.target_value(initial_value, initial_velocity),
        }
    }

    fn duration_nanos(&self, initial_velocity: f32) -> u64 {
        match self {
            DecaySpec::Spline(spec) => spec.duration_nanos(initial_velocity),
            DecaySpec::Exponential(spec) => spec.duration_nanos(initial_velocity),
        }
    }

    fn value_from_nanos(
        &self,
        play_time_nanos: u64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        match self {
            DecaySpec::Spline(spec) => {
                spec.value_from_nanos(play_time_nanos, initial_value, initial_velocity)
            }
            DecaySpec::Exponential(spec) => {
                spec.value_from_nanos(play_time_nanos, initial_value, initial_velocity)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/decay_tests.rs"]
mod tests;
