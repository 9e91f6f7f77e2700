use crate::error::SliderError;
use std::ops::RangeInclusive;

/// Closed integer interval of valid ticks. Never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickRange {
    low: i32,
    high: i32,
}

impl TickRange {
    pub const DEFAULT: TickRange = TickRange { low: 5, high: 30 };

    pub fn new(low: i32, high: i32) -> Result<Self, SliderError> {
        if low > high {
            return Err(SliderError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> i32 {
        self.low
    }

    pub fn high(&self) -> i32 {
        self.high
    }

    /// Number of ticks in the range, saturating at `u32::MAX`.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u32 {
        self.high.abs_diff(self.low).saturating_add(1)
    }

    pub fn is_pinned(&self) -> bool {
        self.low == self.high
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.low as f32 && value <= self.high as f32
    }

    /// Clamps into the float-widened range. NaN maps to the low end.
    pub fn clamp_value(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.low as f32;
        }
        value.clamp(self.low as f32, self.high as f32)
    }

    pub fn clamp_tick(&self, tick: i32) -> i32 {
        tick.clamp(self.low, self.high)
    }

    pub fn as_range(&self) -> RangeInclusive<i32> {
        self.low..=self.high
    }
}

impl Default for TickRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<RangeInclusive<i32>> for TickRange {
    type Error = SliderError;

    fn try_from(range: RangeInclusive<i32>) -> Result<Self, Self::Error> {
        TickRange::new(*range.start(), *range.end())
    }
}

impl From<TickRange> for RangeInclusive<i32> {
    fn from(range: TickRange) -> Self {
        range.as_range()
    }
}
