//! Read model for drawing the ruler.
//!
//! Everything here is a pure function of the value, the range and the
//! measured width, so a presentation layer can call it every frame.

use crate::range::TickRange;
use smallvec::SmallVec;

/// Ticks divisible by this carry a label under their bar.
pub const MAJOR_TICK_INTERVAL: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlacement {
    pub tick: i32,
    /// Horizontal offset from the center indicator. Negative is left.
    pub offset_px: f32,
}

impl TickPlacement {
    pub fn is_major(&self) -> bool {
        self.tick % MAJOR_TICK_INTERVAL == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleTicks {
    /// First visible tick, inclusive.
    pub start: i32,
    /// Last visible tick, inclusive.
    pub end: i32,
    pub segment_width_px: f32,
    pub ticks: SmallVec<[TickPlacement; 16]>,
}

/// Ticks within half a ruler width of `value`, clipped to `range`.
pub fn visible_ticks(value: f32, range: TickRange, segments: u32, width_px: f32) -> VisibleTicks {
    let segments = segments.max(1);
    let value = range.clamp_value(value);
    let segment_width_px = if width_px.is_finite() && width_px > 0.0 {
        width_px / segments as f32
    } else {
        0.0
    };

    let half = segments.div_ceil(2) as f32;
    let start = range.clamp_tick((value - half).round() as i32);
    let end = range.clamp_tick((value + half).round() as i32);

    let ticks = (start..=end)
        .map(|tick| TickPlacement {
            tick,
            offset_px: (tick as f32 - value) * segment_width_px,
        })
        .collect();

    VisibleTicks {
        start,
        end,
        segment_width_px,
        ticks,
    }
}

/// Speed indicator text for a tick in tenths: 10 reads "1.0x".
pub fn format_speed(tick: i32) -> String {
    let sign = if tick < 0 { "-" } else { "" };
    let tenths = tick.unsigned_abs();
    format!("{sign}{}.{}x", tenths / 10, tenths % 10)
}

/// Label drawn under a major tick, `None` for minor ones.
pub fn major_tick_label(tick: i32) -> Option<String> {
    if tick % MAJOR_TICK_INTERVAL != 0 {
        return None;
    }
    let sign = if tick < 0 { "-" } else { "" };
    let tenths = tick.unsigned_abs();
    Some(format!("{sign}{}.{}", tenths / 10, tenths % 10))
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
