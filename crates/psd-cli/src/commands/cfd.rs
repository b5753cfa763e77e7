//! `cfd` command

use crate::commands::prepare;
use crate::settings::Settings;
use anyhow::{Context, Result};
use ndarray::Array2;
use psd_features::aligned_axes;
use pulse_timing::{cfd, BatchColumn};
use serde::Serialize;
use std::path::Path;

/// Crossing times of every pulse in a file
#[derive(Debug, Serialize)]
pub struct CfdReport {
    pub pulses: usize,
    pub samples: usize,
    pub fraction: f64,
    pub crossing: BatchColumn,
    /// Per-pulse sample axes shifted by the crossing time, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aligned_axes: Option<Array2<f64>>,
}

/// Time every pulse in `input`
pub fn run(input: &Path, settings: &Settings, with_axes: bool) -> Result<CfdReport> {
    let waveforms = prepare(input, settings)?;
    let fraction = settings.window.cfd_fraction;
    let crossing = cfd(waveforms.view(), fraction).context("running CFD")?;

    let aligned_axes = with_axes.then(|| aligned_axes(crossing.values.view(), waveforms.ncols()));

    Ok(CfdReport {
        pulses: waveforms.nrows(),
        samples: waveforms.ncols(),
        fraction,
        crossing,
        aligned_axes,
    })
}
