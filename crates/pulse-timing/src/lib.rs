//! Pulse Timing
//!
//! Sub-sample timing for digitized scintillator pulses: two-point linear
//! interpolation and a constant fraction discriminator (CFD) operating on
//! batches of waveforms.

mod cfd;
mod error;
mod interpolate;

pub use cfd::{cfd, cfd_row, validate_fraction};
pub use error::{RowError, TimingError};
pub use interpolate::{interpolate, linear_interp, Interpolation};

use ndarray::Array1;
use serde::Serialize;

/// A row of a batch that could not produce a valid value, and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    /// Row index within the batch
    pub row: usize,
    /// Reason the row failed
    pub error: RowError,
}

/// One scalar per waveform, plus the rows that did not yield a valid value.
///
/// Failed rows keep their slot in `values` (usually `NaN`) so the column
/// stays aligned with the input batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchColumn {
    /// Per-row values, one per input waveform
    pub values: Array1<f64>,
    /// Rows flagged during computation, ascending by row
    pub failures: Vec<RowFailure>,
}

impl BatchColumn {
    /// Create a column from values and already collected failures
    pub fn new(values: Array1<f64>, failures: Vec<RowFailure>) -> Self {
        Self { values, failures }
    }

    /// Build a column from per-row results, marking failed rows with `NaN`
    pub fn from_rows(rows: Vec<Result<f64, RowError>>) -> Self {
        let mut failures = Vec::new();
        let values = rows
            .into_iter()
            .enumerate()
            .map(|(row, result)| match result {
                Ok(value) => value,
                Err(error) => {
                    failures.push(RowFailure { row, error });
                    f64::NAN
                }
            })
            .collect();

        Self { values, failures }
    }

    /// Number of rows in the column
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every row produced a value without being flagged
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Indices of the flagged rows
    pub fn failed_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.failures.iter().map(|f| f.row)
    }

    /// Look up the failure recorded for a row, if any
    pub fn failure(&self, row: usize) -> Option<&RowError> {
        self.failures
            .binary_search_by_key(&row, |f| f.row)
            .ok()
            .map(|i| &self.failures[i].error)
    }
}
