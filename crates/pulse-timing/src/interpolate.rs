//! Two-point linear interpolation

use serde::Serialize;
use tracing::warn;

/// Result of a linear interpolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interpolation {
    /// Interpolated ordinate
    pub value: f64,
    /// Set when both abscissae coincide and `value` fell back to `y1`
    pub degenerate: bool,
}

/// Interpolate the value at `x0` on the line through `(x1, y1)` and `(x2, y2)`.
///
/// When `x1 == x2` there is no line to follow; `y1` is returned and the
/// result is flagged as degenerate. Never logs.
pub fn interpolate(x1: f64, y1: f64, x2: f64, y2: f64, x0: f64) -> Interpolation {
    if x1 == x2 {
        return Interpolation {
            value: y1,
            degenerate: true,
        };
    }

    let value = if x0 == x2 {
        y2
    } else {
        y1 + (y2 - y1) * (x0 - x1) / (x2 - x1)
    };

    Interpolation {
        value,
        degenerate: false,
    }
}

/// Interpolate the value at `x0`, warning when the inputs are degenerate.
pub fn linear_interp(x1: f64, y1: f64, x2: f64, y2: f64, x0: f64) -> f64 {
    let result = interpolate(x1, y1, x2, y2, x0);
    if result.degenerate {
        warn!(x1, x2, "Degenerate linear interpolation (x1 == x2), using y1");
    }
    result.value
}
