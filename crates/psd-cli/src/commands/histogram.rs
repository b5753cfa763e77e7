//! `histogram` command

use crate::commands::features::extract;
use crate::commands::prepare;
use crate::settings::Settings;
use anyhow::{Context, Result};
use psd_features::PsdHistogram;
use serde::Serialize;
use std::path::Path;

/// Binned L vs. S counts for a PSD plot
#[derive(Debug, Serialize)]
pub struct HistogramReport {
    pub pulses: usize,
    pub histogram: PsdHistogram,
}

/// Extract features from `input` and bin them
pub fn run(input: &Path, settings: &Settings) -> Result<HistogramReport> {
    let waveforms = prepare(input, settings)?;
    let features = extract(waveforms.view(), settings)?;

    let histogram = PsdHistogram::compute(
        features.light.values.view(),
        features.shape.values.view(),
        settings.histogram_bins,
    )
    .context("binning features")?;

    Ok(HistogramReport {
        pulses: features.len(),
        histogram,
    })
}
