//! Baseline subtraction

use crate::error::FeatureError;
use ndarray::{s, Array2, ArrayView2, Axis};
use tracing::debug;

/// Remove each waveform's DC offset, estimated as the mean of its first
/// `baseline_samples` samples.
///
/// The result is the baseline-subtracted ("tot") signal expected by the
/// integration windows.
pub fn subtract_baseline(
    raw: ArrayView2<f64>,
    baseline_samples: usize,
) -> Result<Array2<f64>, FeatureError> {
    if baseline_samples == 0 || baseline_samples > raw.ncols() {
        return Err(FeatureError::InvalidParameter {
            name: "baseline_samples",
            value: baseline_samples as f64,
        });
    }

    let baseline = raw
        .slice(s![.., ..baseline_samples])
        .mean_axis(Axis(1))
        .ok_or(FeatureError::InvalidParameter {
            name: "baseline_samples",
            value: baseline_samples as f64,
        })?;

    debug!(
        "Subtracting baseline from {} waveforms using {} leading samples",
        raw.nrows(),
        baseline_samples
    );

    Ok(&raw - &baseline.insert_axis(Axis(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_removes_per_row_offset() {
        let raw = array![
            [100.0, 102.0, 101.0, 150.0, 120.0],
            [-5.0, -5.0, -5.0, 20.0, 0.0],
        ];
        let tot = subtract_baseline(raw.view(), 3).unwrap();
        assert_eq!(tot.row(0).to_vec(), vec![-1.0, 1.0, 0.0, 49.0, 19.0]);
        assert_eq!(tot.row(1).to_vec(), vec![0.0, 0.0, 0.0, 25.0, 5.0]);
    }

    #[test]
    fn test_invalid_baseline_length() {
        let raw = array![[1.0, 2.0, 3.0]];
        assert!(subtract_baseline(raw.view(), 0).is_err());
        assert!(subtract_baseline(raw.view(), 4).is_err());
        assert!(subtract_baseline(raw.view(), 3).is_ok());
    }
}
