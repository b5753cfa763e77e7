//! Trapezoidal area of a waveform between sub-sample positions

use crate::error::FeatureError;
use ndarray::{s, ArrayView1};
use pulse_timing::linear_interp;

/// Area of `row` over the closed interval `[i_start, i_end]`, in sample units.
///
/// The area is assembled from three parts:
/// - head: trapezoid from `i_start` up to `ceil(i_start)` (zero when integral)
/// - middle: plain sum of the samples in `[ceil(i_start), floor(i_end))`
/// - tail: trapezoid from `floor(i_end)` up to `i_end` (zero when integral)
///
/// Amplitudes at fractional positions are linearly interpolated between the
/// neighbouring samples. When both boundaries fall inside the same sample
/// interval the area is the single trapezoid between them.
pub fn sum_region(row: ArrayView1<f64>, i_start: f64, i_end: f64) -> Result<f64, FeatureError> {
    let samples = row.len();
    let last = samples as f64 - 1.0;

    // Also rejects NaN boundaries and empty rows
    if !(i_start >= 0.0 && i_start <= i_end && i_end <= last) {
        return Err(FeatureError::MalformedWindow {
            start: i_start,
            end: i_end,
            samples,
        });
    }

    let first_whole = i_start.ceil() as usize;
    let last_whole = i_end.floor() as usize;

    if first_whole > last_whole {
        return Ok(trapezoid(
            i_start,
            amplitude_at(row, i_start),
            i_end,
            amplitude_at(row, i_end),
        ));
    }

    let head = if i_start == first_whole as f64 {
        0.0
    } else {
        trapezoid(
            i_start,
            amplitude_at(row, i_start),
            first_whole as f64,
            row[first_whole],
        )
    };

    let middle = row.slice(s![first_whole..last_whole]).sum();

    let tail = if i_end == last_whole as f64 {
        0.0
    } else {
        trapezoid(
            last_whole as f64,
            row[last_whole],
            i_end,
            amplitude_at(row, i_end),
        )
    };

    Ok(head + middle + tail)
}

/// Interpolated amplitude at a fractional, in-bounds position
fn amplitude_at(row: ArrayView1<f64>, position: f64) -> f64 {
    let lo = position.floor();
    let hi = position.ceil();
    linear_interp(lo, row[lo as usize], hi, row[hi as usize], position)
}

fn trapezoid(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    (x1 - x0) * (y0 + y1) / 2.0
}
