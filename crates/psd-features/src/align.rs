//! CFD-aligned sample axes

use ndarray::{Array2, ArrayView1};

/// Sample axis of every pulse shifted by its crossing time.
///
/// Row `n` holds `k - crossing[n]` for `k` in `0..samples`, so pulses drawn
/// against their own row share a common rise point at zero. Untimed pulses
/// (`NaN` crossing) get a `NaN` axis.
pub fn aligned_axes(crossing: ArrayView1<f64>, samples: usize) -> Array2<f64> {
    Array2::from_shape_fn((crossing.len(), samples), |(n, k)| k as f64 - crossing[n])
}
