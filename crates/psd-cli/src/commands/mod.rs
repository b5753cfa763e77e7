//! Command implementations; each returns a serializable report

pub mod cfd;
pub mod features;
pub mod histogram;
pub mod select;

use crate::settings::Settings;
use crate::source::load_waveforms;
use anyhow::{Context, Result};
use ndarray::Array2;
use psd_features::subtract_baseline;
use std::path::Path;

/// Load a batch and subtract its baseline when configured
pub(crate) fn prepare(input: &Path, settings: &Settings) -> Result<Array2<f64>> {
    let raw = load_waveforms(input)?;
    match settings.baseline_samples {
        Some(samples) => subtract_baseline(raw.view(), samples).context("subtracting baseline"),
        None => Ok(raw),
    }
}
