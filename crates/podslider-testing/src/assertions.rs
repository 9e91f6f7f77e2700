//! Assertion helpers for slider tests.

use podslider::SliderState;

/// Assert that a value is within `tolerance` of `expected`.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that the slider value lies inside its range.
pub fn assert_in_range(state: &SliderState, msg: &str) {
    let range = state.range();
    let value = state.current_value();
    assert!(
        range.contains(value),
        "{}: value {} outside {}..={}",
        msg,
        value,
        range.low(),
        range.high()
    );
}
