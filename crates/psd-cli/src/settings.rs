//! Layered settings: defaults, optional file, environment

use event_selector::SelectionBox;
use psd_features::{LightOutputMode, WindowConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix, e.g. `SCINT_PSD_WINDOW__CFD_FRACTION=0.3`
pub const ENV_PREFIX: &str = "SCINT_PSD";

/// Errors while assembling settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or merged
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged settings are inconsistent
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Effective settings for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Integration windows and CFD fraction
    pub window: WindowConfig,

    /// How light output is integrated
    pub light_mode: LightOutputMode,

    /// Leading samples averaged for baseline subtraction; `None` when the
    /// input is already baseline-subtracted
    pub baseline_samples: Option<usize>,

    /// Region used by the `select` command
    pub selection: SelectionBox,

    /// Bins per axis for the `histogram` command
    pub histogram_bins: usize,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            light_mode: LightOutputMode::default(),
            baseline_samples: None,
            selection: SelectionBox::default(),
            histogram_bins: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Merge defaults, an optional settings file and `SCINT_PSD_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Apply command line overrides on top of the loaded values, then revalidate
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), SettingsError> {
        if let Some(fraction) = overrides.cfd_fraction {
            self.window.cfd_fraction = fraction;
        }
        if let Some(pre_trigger) = overrides.pre_trigger {
            self.window.pre_trigger = pre_trigger;
        }
        if let Some(tail_start) = overrides.tail_start {
            self.window.tail_start = tail_start;
        }
        if let Some(window_end) = overrides.window_end {
            self.window.window_end = window_end;
        }
        if let Some(mode) = overrides.light_mode {
            self.light_mode = mode;
        }
        if overrides.baseline_samples.is_some() {
            self.baseline_samples = overrides.baseline_samples;
        }
        if let Some(bins) = overrides.histogram_bins {
            self.histogram_bins = bins;
        }
        if let Some(level) = &overrides.log_level {
            self.log_level = level.clone();
        }
        self.validate()
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.window
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;
        self.selection
            .validate()
            .map_err(|e| SettingsError::Invalid(e.to_string()))?;
        if self.histogram_bins == 0 {
            return Err(SettingsError::Invalid(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.baseline_samples == Some(0) {
            return Err(SettingsError::Invalid(
                "baseline_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Values given on the command line; `None` keeps the loaded setting
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub cfd_fraction: Option<f64>,
    pub pre_trigger: Option<f64>,
    pub tail_start: Option<f64>,
    pub window_end: Option<f64>,
    pub light_mode: Option<LightOutputMode>,
    pub baseline_samples: Option<usize>,
    pub histogram_bins: Option<usize>,
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.light_mode, LightOutputMode::FullSum);
        assert_eq!(settings.window.cfd_fraction, 0.5);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir()
            .join(format!("scint-psd-settings-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "window": {{ "tail_start": 12.0, "window_end": 80.0 }},
                "light_mode": "cfd_window",
                "baseline_samples": 16,
                "histogram_bins": 64
            }}"#
        )
        .unwrap();
        drop(file);

        let settings = Settings::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.window.tail_start, 12.0);
        assert_eq!(settings.window.window_end, 80.0);
        assert_eq!(settings.window.pre_trigger, 10.0);
        assert_eq!(settings.light_mode, LightOutputMode::CfdWindow);
        assert_eq!(settings.baseline_samples, Some(16));
        assert_eq!(settings.histogram_bins, 64);
    }

    #[test]
    fn test_overrides_apply_and_revalidate() {
        let mut settings = Settings::default();
        let overrides = Overrides {
            cfd_fraction: Some(0.25),
            window_end: Some(60.0),
            light_mode: Some(LightOutputMode::CfdWindow),
            ..Default::default()
        };
        settings.apply(&overrides).unwrap();
        assert_eq!(settings.window.cfd_fraction, 0.25);
        assert_eq!(settings.window.window_end, 60.0);
        assert_eq!(settings.window.tail_start, 20.0);
        assert_eq!(settings.light_mode, LightOutputMode::CfdWindow);

        let overrides = Overrides {
            tail_start: Some(75.0),
            ..Default::default()
        };
        assert!(settings.apply(&overrides).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let settings = Settings {
            histogram_bins: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));

        let settings = Settings {
            window: WindowConfig::new(90.0, 10.0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
