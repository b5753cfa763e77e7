//! `features` command

use crate::commands::prepare;
use crate::settings::Settings;
use anyhow::{Context, Result};
use ndarray::ArrayView2;
use psd_features::{FeatureExtractor, LightOutputMode, PsdFeatures, WindowConfig};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// L and S of every pulse in a file
#[derive(Debug, Serialize)]
pub struct FeaturesReport {
    pub pulses: usize,
    pub samples: usize,
    pub window: WindowConfig,
    pub light_mode: LightOutputMode,
    pub features: PsdFeatures,
}

/// Extract features from an in-memory batch with the configured windows
pub(crate) fn extract(waveforms: ArrayView2<f64>, settings: &Settings) -> Result<PsdFeatures> {
    let extractor = FeatureExtractor::new(settings.window, settings.light_mode)
        .context("configuring feature extractor")?;
    let features = extractor
        .extract(waveforms)
        .context("extracting features")?;

    info!(
        "Extracted L and S for {} pulses ({} untimed)",
        features.len(),
        features.crossing.failures.len()
    );
    Ok(features)
}

/// Compute L and S for every pulse in `input`
pub fn run(input: &Path, settings: &Settings) -> Result<FeaturesReport> {
    let waveforms = prepare(input, settings)?;
    let features = extract(waveforms.view(), settings)?;

    Ok(FeaturesReport {
        pulses: waveforms.nrows(),
        samples: waveforms.ncols(),
        window: settings.window,
        light_mode: settings.light_mode,
        features,
    })
}
