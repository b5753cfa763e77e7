//! Constant Fraction Discriminator

use crate::error::{RowError, TimingError};
use crate::interpolate::interpolate;
use crate::BatchColumn;
use ndarray::{ArrayView1, ArrayView2};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Check that a CFD fraction lies in the open interval (0, 1)
pub fn validate_fraction(frac: f64) -> Result<(), TimingError> {
    if frac > 0.0 && frac < 1.0 {
        Ok(())
    } else {
        Err(TimingError::InvalidFraction(frac))
    }
}

/// Sub-sample index at which a single pulse first rises above `frac` of its
/// maximum.
///
/// The row is normalized by its own maximum, the first sample strictly above
/// `frac` is located, and the sample index is interpolated as a function of
/// amplitude between that sample and the one before it. `frac` is not
/// range-checked here; see [`validate_fraction`].
pub fn cfd_row(row: ArrayView1<f64>, frac: f64) -> Result<f64, RowError> {
    if row.is_empty() {
        return Err(RowError::EmptyWaveform);
    }
    if row.iter().any(|v| !v.is_finite()) {
        return Err(RowError::NonFiniteAmplitude);
    }

    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == 0.0 {
        return Err(RowError::ZeroMaxAmplitude);
    }

    let b2 = row
        .iter()
        .position(|&v| v / max > frac)
        .ok_or(RowError::ThresholdNotCrossed { frac })?;
    if b2 == 0 {
        return Err(RowError::ThresholdNotCrossed { frac });
    }
    let b1 = b2 - 1;

    let a1 = row[b1] / max;
    let a2 = row[b2] / max;

    // a1 <= frac < a2, so the swapped interpolation is never degenerate
    Ok(interpolate(a1, b1 as f64, a2, b2 as f64, frac).value)
}

/// Crossing time of every pulse in a batch.
///
/// Rows are independent and timed in parallel. A row that cannot be timed
/// is `NaN` in the result and listed in its failures; the other rows are
/// unaffected.
pub fn cfd(waveforms: ArrayView2<f64>, frac: f64) -> Result<BatchColumn, TimingError> {
    validate_fraction(frac)?;

    let rows: Vec<Result<f64, RowError>> = (0..waveforms.nrows())
        .into_par_iter()
        .map(|n| cfd_row(waveforms.row(n), frac))
        .collect();

    let column = BatchColumn::from_rows(rows);

    debug!(
        "CFD timed {} pulses of {} samples at fraction {}",
        column.len(),
        waveforms.ncols(),
        frac
    );
    if !column.is_complete() {
        warn!(
            "CFD could not time {} of {} pulses",
            column.failures.len(),
            column.len()
        );
    }

    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1, Array2};
    use proptest::prelude::*;

    #[test]
    fn test_reference_pulse() {
        let row = array![0.0, 1.0, 4.0, 10.0, 4.0, 1.0, 0.0];
        let crossing = cfd_row(row.view(), 0.5).unwrap();
        assert!((crossing - 2.1666667).abs() < 1e-6);
    }

    #[test]
    fn test_crossing_on_leading_edge() {
        // normalized: 0, .25, .75, 1 -> crosses between samples 1 and 2
        let row = array![0.0, 1.0, 3.0, 4.0, 2.0];
        let crossing = cfd_row(row.view(), 0.5).unwrap();
        assert!((crossing - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_at_first_sample() {
        let row = array![10.0, 5.0, 1.0];
        assert_eq!(
            cfd_row(row.view(), 0.5),
            Err(RowError::ThresholdNotCrossed { frac: 0.5 })
        );
    }

    #[test]
    fn test_threshold_never_crossed() {
        // fraction at or above the normalized peak can never be exceeded
        let row = array![0.0, 2.0, 4.0, 1.0];
        assert_eq!(
            cfd_row(row.view(), 1.0),
            Err(RowError::ThresholdNotCrossed { frac: 1.0 })
        );
    }

    #[test]
    fn test_zero_max_amplitude() {
        let row = array![0.0, 0.0, 0.0];
        assert_eq!(cfd_row(row.view(), 0.5), Err(RowError::ZeroMaxAmplitude));

        let row = array![-3.0, -1.0, 0.0, -2.0];
        assert_eq!(cfd_row(row.view(), 0.5), Err(RowError::ZeroMaxAmplitude));
    }

    #[test]
    fn test_non_finite_and_empty_rows() {
        let row = array![0.0, f64::NAN, 3.0];
        assert_eq!(cfd_row(row.view(), 0.5), Err(RowError::NonFiniteAmplitude));

        let row: Array1<f64> = Array1::zeros(0);
        assert_eq!(cfd_row(row.view(), 0.5), Err(RowError::EmptyWaveform));
    }

    #[test]
    fn test_batch_isolates_failed_rows() {
        let batch = array![
            [0.0, 1.0, 4.0, 10.0, 4.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 8.0, 20.0, 6.0, 1.0],
        ];
        let column = cfd(batch.view(), 0.5).unwrap();

        assert_eq!(column.len(), 3);
        assert!((column.values[0] - 2.1666667).abs() < 1e-6);
        assert!(column.values[1].is_nan());
        // normalized: .4 at 3, 1.0 at 4 -> 3 + .1/.6
        assert!((column.values[2] - (3.0 + 0.1 / 0.6)).abs() < 1e-12);
        assert_eq!(column.failure(1), Some(&RowError::ZeroMaxAmplitude));
        assert_eq!(column.failures.len(), 1);
    }

    #[test]
    fn test_invalid_fraction() {
        let batch = Array2::<f64>::zeros((2, 4));
        assert_eq!(cfd(batch.view(), 0.0), Err(TimingError::InvalidFraction(0.0)));
        assert_eq!(cfd(batch.view(), 1.0), Err(TimingError::InvalidFraction(1.0)));
        assert!(cfd(batch.view(), f64::NAN).is_err());
    }

    #[test]
    fn test_empty_batch() {
        let batch = Array2::<f64>::zeros((0, 16));
        let column = cfd(batch.view(), 0.5).unwrap();
        assert!(column.is_empty());
    }

    proptest! {
        #[test]
        fn scaling_leaves_crossing_unchanged(
            samples in prop::collection::vec(0.0f64..100.0, 4..64),
            scale in 1e-3f64..1e3,
            frac in 0.05f64..0.95,
        ) {
            let row = Array1::from(samples);
            let scaled = &row * scale;
            match (cfd_row(row.view(), frac), cfd_row(scaled.view(), frac)) {
                (Ok(a), Ok(b)) => prop_assert!((a - b).abs() < 1e-6),
                (Err(a), Err(b)) => prop_assert_eq!(a, b),
                (a, b) => prop_assert!(false, "mismatched outcomes {:?} vs {:?}", a, b),
            }
        }

        #[test]
        fn crossing_lies_within_row(
            samples in prop::collection::vec(-10.0f64..100.0, 2..64),
            frac in 0.05f64..0.95,
        ) {
            let row = Array1::from(samples);
            if let Ok(crossing) = cfd_row(row.view(), frac) {
                prop_assert!(crossing >= 0.0);
                prop_assert!(crossing <= (row.len() - 1) as f64);
            }
        }
    }
}
