//! Pointer velocity estimation.
//!
//! Samples are kept in a small ring buffer. Only the most recent run of
//! samples is used: the window ends at the first sample older than the
//! horizon or at the first gap long enough to mean the pointer had stopped.

use crate::geometry::Point;

const HISTORY_SIZE: usize = 20;
const HORIZON_MS: i64 = 100;

/// A gap between consecutive samples longer than this means the pointer
/// had stopped, and older samples no longer describe the current motion.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VelocityTrackerStrategy {
    /// Kinetic-energy based estimate. Robust to jittery sampling.
    #[default]
    Impulse,
    /// Slope of a least squares polynomial fit (degree two when enough
    /// samples are available).
    LeastSquares,
}

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: i64,
    value: f32,
}

/// One-axis velocity tracker over absolute positions.
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
    strategy: VelocityTrackerStrategy,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self::with_strategy(VelocityTrackerStrategy::default())
    }

    pub fn with_strategy(strategy: VelocityTrackerStrategy) -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
            strategy,
        }
    }

    pub fn strategy(&self) -> VelocityTrackerStrategy {
        self.strategy
    }

    pub fn add_data_point(&mut self, time_ms: i64, value: f32) {
        if !value.is_finite() {
            return;
        }
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, value });
    }

    /// Velocity in units per second. Zero with fewer than two usable samples.
    pub fn calculate_velocity(&self) -> f32 {
        let mut values = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let count = self.collect_window(&mut values, &mut times);
        if count < 2 {
            return 0.0;
        }

        let per_ms = match self.strategy {
            VelocityTrackerStrategy::Impulse => impulse_velocity(&values[..count], &times[..count]),
            VelocityTrackerStrategy::LeastSquares => {
                least_squares_velocity(&values[..count], &times[..count])
            }
        };
        let velocity = per_ms * 1000.0;
        if velocity.is_finite() {
            velocity
        } else {
            0.0
        }
    }

    /// Like [`calculate_velocity`](Self::calculate_velocity), capped to
    /// `±max_velocity`. A non-positive cap yields zero.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        self.calculate_velocity().clamp(-max_velocity, max_velocity)
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }

    /// Fills `values`/`times` newest first with times relative to the
    /// newest sample (so all times are `<= 0`). Returns the sample count.
    fn collect_window(
        &self,
        values: &mut [f32; HISTORY_SIZE],
        times: &mut [f32; HISTORY_SIZE],
    ) -> usize {
        let Some(newest) = self.samples[self.index] else {
            return 0;
        };

        let mut count = 0;
        let mut cursor = self.index;
        let mut previous = newest;
        while let Some(sample) = self.samples[cursor] {
            let age = newest.time_ms - sample.time_ms;
            let gap = (previous.time_ms - sample.time_ms).abs();
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            values[count] = sample.value;
            times[count] = -(age as f32);
            previous = sample;
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            cursor = if cursor == 0 {
                HISTORY_SIZE - 1
            } else {
                cursor - 1
            };
        }
        count
    }
}

/// Impulse strategy: accumulates the kinetic energy each segment imparts and
/// converts the total back to a velocity. Input is newest first.
fn impulse_velocity(values: &[f32], times: &[f32]) -> f32 {
    let oldest = values.len() - 1;
    let mut work = 0.0f32;
    for i in (1..=oldest).rev() {
        let dt = times[i] - times[i - 1];
        if dt == 0.0 {
            continue;
        }
        let v_curr = (values[i] - values[i - 1]) / dt;
        let v_prev = energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == oldest {
            work *= 0.5;
        }
    }
    energy_to_velocity(work)
}

fn energy_to_velocity(energy: f32) -> f32 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

/// Slope at `t = 0` of a least squares polynomial fit.
fn least_squares_velocity(values: &[f32], times: &[f32]) -> f32 {
    let mut s = [0.0f64; 5];
    let mut r = [0.0f64; 3];
    for (&value, &time) in values.iter().zip(times) {
        let t = time as f64;
        let y = value as f64;
        let mut power = 1.0;
        for (k, slot) in s.iter_mut().enumerate() {
            *slot += power;
            if k < 3 {
                r[k] += power * y;
            }
            power *= t;
        }
    }

    if values.len() >= 3 {
        if let Some(slope) = quadratic_slope(&s, &r) {
            return slope as f32;
        }
    }
    linear_slope(&s, &r).unwrap_or(0.0) as f32
}

fn linear_slope(s: &[f64; 5], r: &[f64; 3]) -> Option<f64> {
    let det = s[0] * s[2] - s[1] * s[1];
    if det.abs() < 1e-9 {
        return None;
    }
    Some((s[0] * r[1] - s[1] * r[0]) / det)
}

fn quadratic_slope(s: &[f64; 5], r: &[f64; 3]) -> Option<f64> {
    // Normal equations for y = b0 + b1 t + b2 t²; b1 by Cramer's rule.
    let m = [[s[0], s[1], s[2]], [s[1], s[2], s[3]], [s[2], s[3], s[4]]];
    let det = det3(&m);
    if det.abs() < 1e-9 {
        return None;
    }
    let mut m1 = m;
    for (row, value) in m1.iter_mut().zip(r) {
        row[1] = *value;
    }
    Some(det3(&m1) / det)
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Two-axis tracker over pointer positions.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: VelocityTrackerStrategy) -> Self {
        Self {
            x: VelocityTracker1D::with_strategy(strategy),
            y: VelocityTracker1D::with_strategy(strategy),
        }
    }

    pub fn add_position(&mut self, time_ms: i64, position: Point) {
        self.x.add_data_point(time_ms, position.x);
        self.y.add_data_point(time_ms, position.y);
    }

    pub fn calculate_velocity(&self) -> Velocity {
        Velocity {
            x: self.x.calculate_velocity(),
            y: self.y.calculate_velocity(),
        }
    }

    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> Velocity {
        Velocity {
            x: self.x.calculate_velocity_with_max(max_velocity),
            y: self.y.calculate_velocity_with_max(max_velocity),
        }
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
#[path = "tests/velocity_tracker_tests.rs"]
mod tests;
