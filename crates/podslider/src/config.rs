use crate::range::TickRange;
use podslider_animation::{DecaySpec, ExponentialDecaySpec, SplineBasedDecaySpec, SpringSpec};
use podslider_foundation::VelocityTrackerStrategy;

pub const DEFAULT_VALUE: f32 = 10.0;
pub const DEFAULT_SEGMENTS: u32 = 12;
pub const DEFAULT_SETTLE_DELAY_MILLIS: u64 = 3_000;

/// What a new pointer-down does to a settle still waiting on its delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettlePolicy {
    /// The waiting settle is left alone and fires on schedule, even in the
    /// middle of a later gesture.
    #[default]
    Literal,
    /// A new pointer-down cancels every waiting settle before stopping the
    /// motion.
    CancelOnNewGesture,
}

/// Fling model used to project where a released drag would come to rest.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DecayModel {
    /// Platform scroller spline, scaled by the pointer scope's density.
    #[default]
    Spline,
    /// Exponential friction with the given multiplier.
    Exponential { friction_multiplier: f32 },
}

impl DecayModel {
    pub fn spec(&self, density: f32) -> DecaySpec {
        match *self {
            DecayModel::Spline => DecaySpec::Spline(SplineBasedDecaySpec::new(density)),
            DecayModel::Exponential {
                friction_multiplier,
            } => DecaySpec::Exponential(ExponentialDecaySpec::new(friction_multiplier, 0.1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub initial_value: f32,
    pub range: TickRange,
    /// Number of segments the widget width is divided into.
    pub segments: u32,
    pub settle_delay_millis: u64,
    pub settle_policy: SettlePolicy,
    pub spring: SpringSpec,
    pub decay: DecayModel,
    pub velocity_strategy: VelocityTrackerStrategy,
    /// Cap on the tracked pointer velocity in px/s. `None` leaves it uncapped.
    pub max_fling_velocity: Option<f32>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            initial_value: DEFAULT_VALUE,
            range: TickRange::DEFAULT,
            segments: DEFAULT_SEGMENTS,
            settle_delay_millis: DEFAULT_SETTLE_DELAY_MILLIS,
            settle_policy: SettlePolicy::default(),
            spring: SpringSpec::low_bouncy(),
            decay: DecayModel::default(),
            velocity_strategy: VelocityTrackerStrategy::default(),
            max_fling_velocity: None,
        }
    }
}

impl SliderConfig {
    pub fn with_initial_value(mut self, value: f32) -> Self {
        self.initial_value = value;
        self
    }

    pub fn with_range(mut self, range: TickRange) -> Self {
        self.range = range;
        self
    }

    /// Zero is raised to one segment.
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments.max(1);
        self
    }

    pub fn with_settle_delay_millis(mut self, millis: u64) -> Self {
        self.settle_delay_millis = millis;
        self
    }

    pub fn with_settle_policy(mut self, policy: SettlePolicy) -> Self {
        self.settle_policy = policy;
        self
    }

    pub fn with_spring(mut self, spring: SpringSpec) -> Self {
        self.spring = spring;
        self
    }

    pub fn with_decay(mut self, decay: DecayModel) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_velocity_strategy(mut self, strategy: VelocityTrackerStrategy) -> Self {
        self.velocity_strategy = strategy;
        self
    }

    pub fn with_max_fling_velocity(mut self, max: Option<f32>) -> Self {
        self.max_fling_velocity = max;
        self
    }

    pub(crate) fn segment_count(&self) -> u32 {
        self.segments.max(1)
    }
}
