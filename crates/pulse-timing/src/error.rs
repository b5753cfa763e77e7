//! Timing Error Types

use serde::Serialize;
use thiserror::Error;

/// Why a single waveform could not produce a valid result.
///
/// These never abort a batch; the offending row is marked and the rest of
/// the batch is still processed.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum RowError {
    /// No sample rises above the fraction, or the first sample already does
    #[error("pulse never crosses fraction {frac} after its first sample")]
    ThresholdNotCrossed { frac: f64 },

    /// Maximum amplitude is zero, so the row cannot be normalized
    #[error("maximum amplitude is zero")]
    ZeroMaxAmplitude,

    /// The row contains NaN or infinite samples
    #[error("waveform contains non-finite samples")]
    NonFiniteAmplitude,

    /// The row has no samples
    #[error("waveform has no samples")]
    EmptyWaveform,

    /// The integration window enclosed zero total area
    #[error("total integrated area is zero")]
    ZeroTotalArea,
}

/// Errors from misusing the timing API; these fail the whole call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimingError {
    /// CFD fraction outside the open interval (0, 1)
    #[error("CFD fraction {0} is outside (0, 1)")]
    InvalidFraction(f64),
}
