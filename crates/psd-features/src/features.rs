//! Light output and shape parameter extraction

use crate::config::{LightOutputMode, WindowConfig};
use crate::error::FeatureError;
use crate::integrate::sum_region;
use ndarray::{ArrayView1, ArrayView2};
use pulse_timing::{cfd, cfd_row, BatchColumn, RowError, RowFailure};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Per-pulse features for a batch of waveforms
#[derive(Debug, Clone, Serialize)]
pub struct PsdFeatures {
    /// CFD crossing time of each pulse (sub-sample index)
    pub crossing: BatchColumn,
    /// Light output L in integrated digitizer channel units
    pub light: BatchColumn,
    /// Tail-to-total shape parameter S
    pub shape: BatchColumn,
}

impl PsdFeatures {
    /// Number of pulses
    pub fn len(&self) -> usize {
        self.crossing.len()
    }

    /// Check if the batch was empty
    pub fn is_empty(&self) -> bool {
        self.crossing.is_empty()
    }
}

/// Outcome of processing one waveform
struct RowFeatures {
    crossing: Result<f64, RowError>,
    light: (f64, Option<RowError>),
    shape: (f64, Option<RowError>),
}

/// Feature extractor over batches of baseline-subtracted waveforms
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    /// Window offsets and CFD fraction
    config: WindowConfig,
    /// Light output integration mode
    mode: LightOutputMode,
}

impl FeatureExtractor {
    /// Create a new extractor, validating the window configuration
    pub fn new(config: WindowConfig, mode: LightOutputMode) -> Result<Self, FeatureError> {
        config.validate()?;
        Ok(Self { config, mode })
    }

    /// Window configuration in use
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Light output mode in use
    pub fn mode(&self) -> LightOutputMode {
        self.mode
    }

    /// CFD crossing time of every pulse
    pub fn crossing_times(&self, waveforms: ArrayView2<f64>) -> Result<BatchColumn, FeatureError> {
        Ok(cfd(waveforms, self.config.cfd_fraction)?)
    }

    /// Light output L of every pulse
    pub fn light_output(&self, waveforms: ArrayView2<f64>) -> Result<BatchColumn, FeatureError> {
        match self.mode {
            LightOutputMode::FullSum => Ok(full_sum_column(waveforms)),
            LightOutputMode::CfdWindow => windowed_light_column(waveforms, &self.config),
        }
    }

    /// Tail-to-total shape parameter S of every pulse
    pub fn shape(&self, waveforms: ArrayView2<f64>) -> Result<BatchColumn, FeatureError> {
        Ok(self.extract(waveforms)?.shape)
    }

    /// Crossing time, light output and shape parameter of every pulse.
    ///
    /// Each pulse is timed once and both windows are integrated from that
    /// timing. Pulses are processed in parallel; a pulse that cannot be timed
    /// is marked in every column that depends on its timing without
    /// affecting the others.
    pub fn extract(&self, waveforms: ArrayView2<f64>) -> Result<PsdFeatures, FeatureError> {
        let rows: Vec<RowFeatures> = (0..waveforms.nrows())
            .into_par_iter()
            .map(|n| self.process_row(waveforms.row(n)))
            .collect::<Result<_, _>>()?;

        let mut crossing = Vec::with_capacity(rows.len());
        let mut light = Vec::with_capacity(rows.len());
        let mut shape = Vec::with_capacity(rows.len());
        for row in rows {
            crossing.push(row.crossing);
            light.push(row.light);
            shape.push(row.shape);
        }

        let features = PsdFeatures {
            crossing: BatchColumn::from_rows(crossing),
            light: assemble(light),
            shape: assemble(shape),
        };

        debug!(
            "Extracted features for {} pulses of {} samples ({:?})",
            features.len(),
            waveforms.ncols(),
            self.mode
        );
        if !features.crossing.is_complete() {
            warn!(
                "{} of {} pulses could not be timed",
                features.crossing.failures.len(),
                features.len()
            );
        }

        Ok(features)
    }

    fn process_row(&self, row: ArrayView1<f64>) -> Result<RowFeatures, FeatureError> {
        let crossing = match cfd_row(row, self.config.cfd_fraction) {
            Ok(crossing) => crossing,
            Err(error) => {
                let light = match self.mode {
                    LightOutputMode::FullSum => full_sum(row),
                    LightOutputMode::CfdWindow => (f64::NAN, Some(error.clone())),
                };
                return Ok(RowFeatures {
                    crossing: Err(error.clone()),
                    light,
                    shape: (f64::NAN, Some(error)),
                });
            }
        };

        let bounds = self.config.bounds(crossing, row.len());
        let total = sum_region(row, bounds.start, bounds.end)?;
        let tail = sum_region(row, bounds.tail, bounds.end)?;

        let light = match self.mode {
            LightOutputMode::FullSum => full_sum(row),
            LightOutputMode::CfdWindow => (total, None),
        };

        // total == 0 leaves a non-finite S in place
        let shape = if total == 0.0 {
            (tail / total, Some(RowError::ZeroTotalArea))
        } else {
            (tail / total, None)
        };

        Ok(RowFeatures {
            crossing: Ok(crossing),
            light,
            shape,
        })
    }
}

/// Plain sum of every sample
fn full_sum(row: ArrayView1<f64>) -> (f64, Option<RowError>) {
    let sum = row.sum();
    if sum.is_finite() {
        (sum, None)
    } else {
        (sum, Some(RowError::NonFiniteAmplitude))
    }
}

fn full_sum_column(waveforms: ArrayView2<f64>) -> BatchColumn {
    let rows: Vec<(f64, Option<RowError>)> = (0..waveforms.nrows())
        .into_par_iter()
        .map(|n| full_sum(waveforms.row(n)))
        .collect();
    assemble(rows)
}

/// Total-window integral of every pulse; only the total window is read
fn windowed_light_column(
    waveforms: ArrayView2<f64>,
    config: &WindowConfig,
) -> Result<BatchColumn, FeatureError> {
    let rows: Vec<(f64, Option<RowError>)> = (0..waveforms.nrows())
        .into_par_iter()
        .map(|n| -> Result<(f64, Option<RowError>), FeatureError> {
            let row = waveforms.row(n);
            match cfd_row(row, config.cfd_fraction) {
                Ok(crossing) => {
                    let bounds = config.bounds(crossing, row.len());
                    Ok((sum_region(row, bounds.start, bounds.end)?, None))
                }
                Err(error) => Ok((f64::NAN, Some(error))),
            }
        })
        .collect::<Result<_, _>>()?;
    Ok(assemble(rows))
}

fn assemble(rows: Vec<(f64, Option<RowError>)>) -> BatchColumn {
    let mut failures = Vec::new();
    let values = rows
        .into_iter()
        .enumerate()
        .map(|(row, (value, error))| {
            if let Some(error) = error {
                failures.push(RowFailure { row, error });
            }
            value
        })
        .collect();
    BatchColumn::new(values, failures)
}

/// Light output of every pulse with the given windows and mode.
///
/// `FullSum` reads no part of `config`. `CfdWindow` reads only
/// `pre_trigger`, `window_end` and `cfd_fraction`.
pub fn calc_light_output(
    waveforms: ArrayView2<f64>,
    config: &WindowConfig,
    mode: LightOutputMode,
) -> Result<BatchColumn, FeatureError> {
    match mode {
        LightOutputMode::FullSum => Ok(full_sum_column(waveforms)),
        LightOutputMode::CfdWindow => {
            config.validate_total_window()?;
            windowed_light_column(waveforms, config)
        }
    }
}

/// Shape parameter of every pulse with the given windows
pub fn calc_shape(
    waveforms: ArrayView2<f64>,
    config: &WindowConfig,
) -> Result<BatchColumn, FeatureError> {
    FeatureExtractor::new(*config, LightOutputMode::CfdWindow)?.shape(waveforms)
}
