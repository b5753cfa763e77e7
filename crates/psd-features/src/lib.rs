//! PSD Feature Engine
//!
//! Light output (L) and tail-to-total shape parameter (S) extraction from
//! baseline-subtracted scintillator waveforms, with the supporting
//! trapezoidal integrator, baseline subtraction, CFD-aligned axes and the
//! L vs. S histogram used for PSD plots.

mod align;
mod baseline;
mod config;
mod error;
mod features;
mod histogram;
mod integrate;

pub use align::aligned_axes;
pub use baseline::subtract_baseline;
pub use config::{LightOutputMode, WindowBounds, WindowConfig};
pub use error::FeatureError;
pub use features::{calc_light_output, calc_shape, FeatureExtractor, PsdFeatures};
pub use histogram::PsdHistogram;
pub use integrate::sum_region;

pub use pulse_timing::{BatchColumn, RowError, RowFailure};
