//! Selection Error Types

use thiserror::Error;

/// Errors during event selection
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// Feature arrays are not parallel
    #[error("feature arrays differ in length: x has {x} values, y has {y}")]
    LengthMismatch { x: usize, y: usize },

    /// Lower bound above upper bound, or a bound is NaN
    #[error("{axis} bounds ({min}, {max}) are inverted or NaN")]
    InvertedBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },
}
