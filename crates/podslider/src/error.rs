/// Failures when building or restoring a slider.
///
/// Motion operations never fail; out-of-range input is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderError {
    InvalidRange { low: i32, high: i32 },
    NonFiniteValue { value: f32 },
    ValueOutOfRange { value: f32, low: i32, high: i32 },
    RuntimeUnavailable,
}

impl std::fmt::Display for SliderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SliderError::InvalidRange { low, high } => {
                write!(f, "invalid tick range {low}..={high}; low must not exceed high")
            }
            SliderError::NonFiniteValue { value } => write!(f, "slider value {value} is not finite"),
            SliderError::ValueOutOfRange { value, low, high } => {
                write!(f, "slider value {value} outside {low}..={high}")
            }
            SliderError::RuntimeUnavailable => write!(f, "runtime has been dropped"),
        }
    }
}

impl std::error::Error for SliderError {}
