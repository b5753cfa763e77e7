//! Rectangular region selector

use crate::error::SelectionError;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Indices `i` with `x_min < x[i] < x_max` and `y_min < y[i] < y_max`.
///
/// Both bounds are strict and both must hold. The result is ascending and
/// free of duplicates. NaN never satisfies a bound.
pub fn find_in_range(
    x: ArrayView1<f64>,
    x_min: f64,
    x_max: f64,
    y: ArrayView1<f64>,
    y_min: f64,
    y_max: f64,
) -> Result<Vec<usize>, SelectionError> {
    if x.len() != y.len() {
        return Err(SelectionError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }

    let indices: Vec<usize> = x
        .iter()
        .zip(y.iter())
        .enumerate()
        .filter(|&(_, (&xi, &yi))| x_min < xi && xi < x_max && y_min < yi && yi < y_max)
        .map(|(i, _)| i)
        .collect();

    debug!("Selected {} of {} events", indices.len(), x.len());
    Ok(indices)
}

/// Open rectangle in (x, y) feature space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionBox {
    /// Exclusive bounds on the first feature (light output)
    pub x: (f64, f64),
    /// Exclusive bounds on the second feature (shape parameter)
    pub y: (f64, f64),
}

impl Default for SelectionBox {
    fn default() -> Self {
        Self {
            x: (0.0, f64::MAX),
            y: (0.0, 1.0),
        }
    }
}

impl SelectionBox {
    /// Check both axes for inverted or NaN bounds
    pub fn validate(&self) -> Result<(), SelectionError> {
        Self::validate_axis("x", self.x)?;
        Self::validate_axis("y", self.y)
    }

    fn validate_axis(axis: &'static str, (min, max): (f64, f64)) -> Result<(), SelectionError> {
        if min <= max {
            Ok(())
        } else {
            Err(SelectionError::InvertedBounds { axis, min, max })
        }
    }

    /// Whether a single point lies strictly inside the box
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x.0 < x && x < self.x.1 && self.y.0 < y && y < self.y.1
    }
}

/// Reusable selector over a validated box
#[derive(Debug, Clone)]
pub struct RegionSelector {
    region: SelectionBox,
}

impl RegionSelector {
    /// Create a selector, rejecting inverted bounds
    pub fn new(region: SelectionBox) -> Result<Self, SelectionError> {
        region.validate()?;
        Ok(Self { region })
    }

    /// The box this selector applies
    pub fn region(&self) -> &SelectionBox {
        &self.region
    }

    /// Select events from two parallel feature arrays
    pub fn select(
        &self,
        x: ArrayView1<f64>,
        y: ArrayView1<f64>,
    ) -> Result<Vec<usize>, SelectionError> {
        find_in_range(
            x,
            self.region.x.0,
            self.region.x.1,
            y,
            self.region.y.0,
            self.region.y.1,
        )
    }
}
