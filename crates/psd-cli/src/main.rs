//! Scintillator PSD CLI entry point

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use psd_cli::commands;
use psd_cli::settings::{Overrides, Settings};
use psd_cli::{init_logging, write_report};
use psd_features::LightOutputMode;
use std::io;
use std::path::PathBuf;
use tracing::info;

/// Pulse shape discrimination features for digitized scintillator pulses
#[derive(Parser, Debug)]
#[command(name = "scint-psd", version, about)]
struct Cli {
    /// Settings file (JSON, TOML or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(flatten)]
    window: WindowArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Constant-fraction crossing time of every pulse
    Cfd {
        /// Waveform batch (JSON array of equal-length sample arrays)
        input: PathBuf,

        /// Also emit each pulse's sample axis shifted by its crossing time
        #[arg(long)]
        aligned_axes: bool,
    },

    /// Light output and tail fraction of every pulse
    Features {
        /// Waveform batch
        input: PathBuf,
    },

    /// Indices of pulses inside an (L, S) region
    Select {
        /// Waveform batch
        input: PathBuf,

        #[command(flatten)]
        region: RegionArgs,
    },

    /// 2-D histogram of light output vs. tail fraction
    Histogram {
        /// Waveform batch
        input: PathBuf,

        /// Bins per axis
        #[arg(long)]
        bins: Option<usize>,
    },

    /// Print the effective settings
    Config,
}

/// Integration window overrides
#[derive(Args, Debug)]
struct WindowArgs {
    /// CFD fraction in (0, 1)
    #[arg(long, global = true)]
    fraction: Option<f64>,

    /// Samples before the crossing where the total window opens
    #[arg(long, global = true)]
    pre_trigger: Option<f64>,

    /// Samples after the crossing where the tail window opens
    #[arg(long, global = true)]
    tail_start: Option<f64>,

    /// Samples after the crossing where both windows close
    #[arg(long, global = true)]
    window_end: Option<f64>,

    /// Light output integration
    #[arg(long, global = true, value_enum)]
    light_mode: Option<LightMode>,

    /// Leading samples averaged and subtracted as baseline
    #[arg(long, global = true)]
    baseline_samples: Option<usize>,
}

#[derive(Args, Debug)]
struct RegionArgs {
    #[arg(long)]
    l_min: Option<f64>,
    #[arg(long)]
    l_max: Option<f64>,
    #[arg(long)]
    s_min: Option<f64>,
    #[arg(long)]
    s_max: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LightMode {
    /// Plain sum of every sample
    FullSum,
    /// Integral over the total window around the crossing
    CfdWindow,
}

impl From<LightMode> for LightOutputMode {
    fn from(mode: LightMode) -> Self {
        match mode {
            LightMode::FullSum => LightOutputMode::FullSum,
            LightMode::CfdWindow => LightOutputMode::CfdWindow,
        }
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let histogram_bins = match &self.command {
            Command::Histogram { bins, .. } => *bins,
            _ => None,
        };
        Overrides {
            cfd_fraction: self.window.fraction,
            pre_trigger: self.window.pre_trigger,
            tail_start: self.window.tail_start,
            window_end: self.window.window_end,
            light_mode: self.window.light_mode.map(Into::into),
            baseline_samples: self.window.baseline_samples,
            histogram_bins,
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply(&cli.overrides())?;

    init_logging(&settings.log_level)?;
    info!("scint-psd v{}", env!("CARGO_PKG_VERSION"));

    let stdout = io::stdout().lock();
    match cli.command {
        Command::Cfd {
            input,
            aligned_axes,
        } => write_report(stdout, &commands::cfd::run(&input, &settings, aligned_axes)?),
        Command::Features { input } => {
            write_report(stdout, &commands::features::run(&input, &settings)?)
        }
        Command::Select { input, region } => {
            let bounds = &mut settings.selection;
            if let Some(v) = region.l_min {
                bounds.x.0 = v;
            }
            if let Some(v) = region.l_max {
                bounds.x.1 = v;
            }
            if let Some(v) = region.s_min {
                bounds.y.0 = v;
            }
            if let Some(v) = region.s_max {
                bounds.y.1 = v;
            }
            write_report(stdout, &commands::select::run(&input, &settings)?)
        }
        Command::Histogram { input, .. } => {
            write_report(stdout, &commands::histogram::run(&input, &settings)?)
        }
        Command::Config => write_report(stdout, &settings),
    }
}
