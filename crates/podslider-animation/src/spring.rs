//! Damped harmonic spring.
//!
//! The spring is advanced with the closed-form solution of the damped
//! oscillator, so the result of a step does not depend on frame rate.

/// Damping ratio presets matching Jetpack Compose's `Spring` constants.
pub struct DampingRatio;

impl DampingRatio {
    pub const HIGH_BOUNCY: f32 = 0.2;
    pub const MEDIUM_BOUNCY: f32 = 0.5;
    pub const LOW_BOUNCY: f32 = 0.75;
    pub const NO_BOUNCY: f32 = 1.0;
}

/// Stiffness presets matching Jetpack Compose's `Spring` constants.
pub struct Stiffness;

impl Stiffness {
    pub const HIGH: f32 = 10_000.0;
    pub const MEDIUM: f32 = 1_500.0;
    pub const MEDIUM_LOW: f32 = 400.0;
    pub const LOW: f32 = 200.0;
    pub const VERY_LOW: f32 = 50.0;
}

/// Default distance under which a spring is considered visually settled.
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.01;

/// Rest velocity is the threshold distance covered in one 60 Hz frame.
const REST_VELOCITY_PER_THRESHOLD: f32 = 60.0;

/// Spring animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 = under-damped (bouncy), > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Stiffness constant. Higher values settle faster.
    pub stiffness: f32,
    /// Distance from the target under which the spring may come to rest.
    pub visibility_threshold: f32,
}

/// Displacement from the target and velocity after a spring step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringMotion {
    pub displacement: f32,
    pub velocity: f32,
}

impl SpringSpec {
    pub fn new(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            damping_ratio,
            stiffness,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }

    /// Gentle overshoot-and-settle: low bouncy damping, low stiffness.
    pub fn low_bouncy() -> Self {
        Self::new(DampingRatio::LOW_BOUNCY, Stiffness::LOW)
    }

    pub fn with_visibility_threshold(mut self, threshold: f32) -> Self {
        self.visibility_threshold = threshold;
        self
    }

    fn rest_velocity(&self) -> f32 {
        self.visibility_threshold * REST_VELOCITY_PER_THRESHOLD
    }

    /// Returns `true` when both displacement and velocity are small enough
    /// for the spring to stop.
    pub fn is_at_rest(&self, displacement: f32, velocity: f32) -> bool {
        displacement.abs() < self.visibility_threshold && velocity.abs() < self.rest_velocity()
    }

    /// Advances the spring by `dt_secs` from the given displacement and
    /// velocity.
    pub fn step(&self, displacement: f32, velocity: f32, dt_secs: f32) -> SpringMotion {
        let pulls = self.stiffness.is_finite() && self.stiffness > 0.0;
        if !pulls || !self.damping_ratio.is_finite() {
            // A spring without stiffness cannot pull; treat it as a snap.
            return SpringMotion {
                displacement: 0.0,
                velocity: 0.0,
            };
        }
        if dt_secs <= 0.0 {
            return SpringMotion {
                displacement,
                velocity,
            };
        }

        let x0 = displacement as f64;
        let v0 = velocity as f64;
        let t = dt_secs as f64;
        let omega = (self.stiffness as f64).sqrt();
        let zeta = self.damping_ratio.max(0.0) as f64;

        let (x, v) = if zeta > 1.0 + 1e-6 {
            let root = (zeta * zeta - 1.0).sqrt();
            let gamma_plus = -zeta * omega + omega * root;
            let gamma_minus = -zeta * omega - omega * root;
            let coeff_b = (gamma_minus * x0 - v0) / (gamma_minus - gamma_plus);
            let coeff_a = x0 - coeff_b;
            let e_minus = (gamma_minus * t).exp();
            let e_plus = (gamma_plus * t).exp();
            (
                coeff_a * e_minus + coeff_b * e_plus,
                coeff_a * gamma_minus * e_minus + coeff_b * gamma_plus * e_plus,
            )
        } else if zeta >= 1.0 - 1e-6 {
            let coeff_a = x0;
            let coeff_b = v0 + omega * x0;
            let decay = (-omega * t).exp();
            let x = (coeff_a + coeff_b * t) * decay;
            (x, x * -omega + coeff_b * decay)
        } else {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let cos_coeff = x0;
            let sin_coeff = (zeta * omega * x0 + v0) / damped;
            let envelope = (-zeta * omega * t).exp();
            let (sin, cos) = (damped * t).sin_cos();
            let x = envelope * (cos_coeff * cos + sin_coeff * sin);
            let v = x * -omega * zeta
                + envelope * (-damped * cos_coeff * sin + damped * sin_coeff * cos);
            (x, v)
        };

        SpringMotion {
            displacement: x as f32,
            velocity: v as f32,
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::new(DampingRatio::NO_BOUNCY, Stiffness::MEDIUM)
    }
}
