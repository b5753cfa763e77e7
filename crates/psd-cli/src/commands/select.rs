//! `select` command

use crate::commands::features::extract;
use crate::commands::prepare;
use crate::settings::Settings;
use anyhow::{Context, Result};
use event_selector::{RegionSelector, SelectionBox};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Pulses whose (L, S) fall inside the configured region
#[derive(Debug, Serialize)]
pub struct SelectReport {
    pub pulses: usize,
    pub region: SelectionBox,
    pub selected: Vec<usize>,
}

/// Extract features from `input` and select pulses inside the region
pub fn run(input: &Path, settings: &Settings) -> Result<SelectReport> {
    let selector = RegionSelector::new(settings.selection).context("configuring selection")?;
    let waveforms = prepare(input, settings)?;
    let features = extract(waveforms.view(), settings)?;

    let selected = selector
        .select(features.light.values.view(), features.shape.values.view())
        .context("selecting events")?;

    info!("Selected {} of {} pulses", selected.len(), features.len());
    Ok(SelectReport {
        pulses: features.len(),
        region: *selector.region(),
        selected,
    })
}
