//! Integration window configuration

use crate::error::FeatureError;
use pulse_timing::validate_fraction;
use serde::{Deserialize, Serialize};

/// Offsets of the integration windows relative to the CFD crossing time, in samples.
///
/// Offsets are relative to the rise of each pulse rather than absolute
/// indices, so one configuration lines up across pulses with different
/// arrival times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Samples before the crossing where both windows start (delta0)
    pub pre_trigger: f64,

    /// Samples after the crossing where the tail window starts (delta1)
    pub tail_start: f64,

    /// Samples after the crossing where both windows end (delta2)
    pub window_end: f64,

    /// Fraction of the pulse maximum used for CFD timing
    pub cfd_fraction: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            pre_trigger: 10.0,
            tail_start: 20.0,
            window_end: 100.0,
            cfd_fraction: 0.5,
        }
    }
}

impl WindowConfig {
    /// Tail and window end offsets with the default pre-trigger and fraction
    pub fn new(tail_start: f64, window_end: f64) -> Self {
        Self {
            tail_start,
            window_end,
            ..Default::default()
        }
    }

    /// Override the pre-trigger offset
    pub fn with_pre_trigger(mut self, pre_trigger: f64) -> Self {
        self.pre_trigger = pre_trigger;
        self
    }

    /// Override the CFD fraction
    pub fn with_cfd_fraction(mut self, cfd_fraction: f64) -> Self {
        self.cfd_fraction = cfd_fraction;
        self
    }

    /// Reject negative or non-finite offsets, a tail starting after the
    /// window end, and fractions outside (0, 1)
    pub fn validate(&self) -> Result<(), FeatureError> {
        self.validate_total_window()?;
        validate_offset("tail_start", self.tail_start)?;

        if self.tail_start > self.window_end {
            return Err(FeatureError::InvalidParameter {
                name: "tail_start",
                value: self.tail_start,
            });
        }
        Ok(())
    }

    /// Check only what the CFD-anchored total window reads: `pre_trigger`,
    /// `window_end` and `cfd_fraction`. `tail_start` is ignored.
    pub fn validate_total_window(&self) -> Result<(), FeatureError> {
        validate_offset("pre_trigger", self.pre_trigger)?;
        validate_offset("window_end", self.window_end)?;
        validate_fraction(self.cfd_fraction)?;
        Ok(())
    }

    /// Window boundaries for a pulse crossing at `crossing` in a row of `samples` samples
    pub fn bounds(&self, crossing: f64, samples: usize) -> WindowBounds {
        let last = samples.saturating_sub(1) as f64;
        WindowBounds {
            start: (crossing - self.pre_trigger).max(0.0),
            tail: (crossing + self.tail_start).min(last),
            end: (crossing + self.window_end).min(last),
        }
    }
}

fn validate_offset(name: &'static str, value: f64) -> Result<(), FeatureError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FeatureError::InvalidParameter { name, value })
    }
}

/// Sample positions (i0, i1, i2) bounding the total and tail windows of one pulse
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowBounds {
    /// Start of the total window (i0)
    pub start: f64,
    /// Start of the tail window (i1)
    pub tail: f64,
    /// End of both windows (i2)
    pub end: f64,
}

/// How light output is integrated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightOutputMode {
    /// Sum every sample of the waveform; window offsets are unused
    #[default]
    FullSum,
    /// Integrate the CFD-anchored total window
    CfdWindow,
}
