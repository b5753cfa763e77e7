//! Two-dimensional L vs. S histogram (the data behind a PSD plot)

use crate::error::FeatureError;
use ndarray::{Array2, ArrayView1};
use serde::Serialize;
use tracing::debug;

/// Event counts binned over light output and shape parameter
#[derive(Debug, Clone, Serialize)]
pub struct PsdHistogram {
    /// `nbins + 1` ascending bin edges along light output
    pub light_edges: Vec<f64>,
    /// `nbins + 1` ascending bin edges along the shape parameter
    pub shape_edges: Vec<f64>,
    /// Counts indexed by `[light_bin, shape_bin]`
    pub counts: Array2<u64>,
    /// Events dropped because L or S was not finite
    pub skipped: usize,
}

impl PsdHistogram {
    /// Bin every event with finite L and S into an `nbins × nbins` grid.
    ///
    /// Each axis spans the finite data range; the maximum lands in the last
    /// bin. A degenerate range is widened by half a unit on each side.
    pub fn compute(
        light: ArrayView1<f64>,
        shape: ArrayView1<f64>,
        nbins: usize,
    ) -> Result<Self, FeatureError> {
        if nbins == 0 {
            return Err(FeatureError::InvalidParameter {
                name: "nbins",
                value: 0.0,
            });
        }
        if light.len() != shape.len() {
            return Err(FeatureError::LengthMismatch {
                light: light.len(),
                shape: shape.len(),
            });
        }

        let points: Vec<(f64, f64)> = light
            .iter()
            .zip(shape.iter())
            .filter(|(l, s)| l.is_finite() && s.is_finite())
            .map(|(&l, &s)| (l, s))
            .collect();
        let skipped = light.len() - points.len();

        let light_range = axis_range("light", points.iter().map(|p| p.0))?;
        let shape_range = axis_range("shape", points.iter().map(|p| p.1))?;

        let mut counts = Array2::zeros((nbins, nbins));
        for &(l, s) in &points {
            let i = bin_index(l, light_range, nbins);
            let j = bin_index(s, shape_range, nbins);
            counts[[i, j]] += 1;
        }

        debug!(
            "Binned {} events into {}x{} PSD histogram ({} skipped)",
            points.len(),
            nbins,
            nbins,
            skipped
        );

        Ok(Self {
            light_edges: edges(light_range, nbins),
            shape_edges: edges(shape_range, nbins),
            counts,
            skipped,
        })
    }

    /// Total number of binned events
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }
}

fn axis_range(
    axis: &'static str,
    values: impl Iterator<Item = f64>,
) -> Result<(f64, f64), FeatureError> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let range = if min > max {
        (0.0, 1.0)
    } else if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    // finite bounds can still overflow their width
    if (range.1 - range.0).is_finite() {
        Ok(range)
    } else {
        Err(FeatureError::RangeOverflow {
            axis,
            min: range.0,
            max: range.1,
        })
    }
}

fn bin_index(value: f64, (min, max): (f64, f64), nbins: usize) -> usize {
    let scaled = (value - min) / (max - min) * nbins as f64;
    (scaled as usize).min(nbins - 1)
}

fn edges((min, max): (f64, f64), nbins: usize) -> Vec<f64> {
    let width = (max - min) / nbins as f64;
    (0..=nbins).map(|i| min + i as f64 * width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_counts_and_edges() {
        let light = array![0.0, 10.0, 5.0, 9.9, f64::NAN];
        let shape = array![0.1, 0.3, 0.2, 0.29, 0.2];
        let hist = PsdHistogram::compute(light.view(), shape.view(), 2).unwrap();

        assert_eq!(hist.light_edges, vec![0.0, 5.0, 10.0]);
        assert_eq!(hist.skipped, 1);
        assert_eq!(hist.total(), 4);
        // (0, .1) -> [0,0]; (10, .3) and (9.9, .29) -> [1,1]; (5, .2) -> [1,1]
        assert_eq!(hist.counts[[0, 0]], 1);
        assert_eq!(hist.counts[[1, 1]], 3);
    }

    #[test]
    fn test_degenerate_range() {
        let light = array![3.0, 3.0];
        let shape = array![0.5, 0.5];
        let hist = PsdHistogram::compute(light.view(), shape.view(), 4).unwrap();
        assert_eq!(hist.light_edges.first(), Some(&2.5));
        assert_eq!(hist.light_edges.last(), Some(&3.5));
        assert_eq!(hist.counts[[2, 2]], 2);
    }

    #[test]
    fn test_invalid_inputs() {
        let light = array![1.0, 2.0];
        let shape = array![0.5];
        assert!(matches!(
            PsdHistogram::compute(light.view(), shape.view(), 4),
            Err(FeatureError::LengthMismatch { light: 2, shape: 1 })
        ));
        assert!(PsdHistogram::compute(light.view(), light.view(), 0).is_err());
    }

    #[test]
    fn test_range_wider_than_f64_rejected() {
        let light = array![-f64::MAX, f64::MAX];
        let shape = array![0.2, 0.4];
        assert!(matches!(
            PsdHistogram::compute(light.view(), shape.view(), 4),
            Err(FeatureError::RangeOverflow { axis: "light", .. })
        ));

        let light = array![-1e307, 1e307];
        let hist = PsdHistogram::compute(light.view(), shape.view(), 4).unwrap();
        assert_eq!(hist.counts[[0, 0]], 1);
        assert_eq!(hist.counts[[3, 3]], 1);
        assert!(hist.light_edges.iter().all(|e| e.is_finite()));
    }

    #[test]
    fn test_no_finite_events() {
        let light = array![f64::NAN];
        let shape = array![f64::INFINITY];
        let hist = PsdHistogram::compute(light.view(), shape.view(), 3).unwrap();
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.skipped, 1);
    }
}
