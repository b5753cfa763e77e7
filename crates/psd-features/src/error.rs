//! Feature Extraction Error Types

use pulse_timing::TimingError;
use thiserror::Error;

/// Errors that fail a whole feature extraction call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Integration window is inverted, NaN, or outside the waveform
    #[error("integration window [{start}, {end}] is invalid for a waveform of {samples} samples")]
    MalformedWindow { start: f64, end: f64, samples: usize },

    /// A configuration value is out of its allowed range
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Feature arrays that must be parallel differ in length
    #[error("light output has {light} values but shape has {shape}")]
    LengthMismatch { light: usize, shape: usize },

    /// Finite values spread wider than an `f64` can represent
    #[error("{axis} range [{min}, {max}] is too wide to bin")]
    RangeOverflow { axis: &'static str, min: f64, max: f64 },

    /// CFD rejected its parameters
    #[error(transparent)]
    Timing(#[from] TimingError),
}
