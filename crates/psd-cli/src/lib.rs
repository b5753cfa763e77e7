//! Scintillator PSD command line tool
//!
//! Loads waveform batches, runs CFD timing and L/S feature extraction, and
//! reports the results as JSON.

pub mod commands;
pub mod settings;
pub mod source;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::io::Write;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging to stderr at `level`
pub fn init_logging(level: &str) -> Result<()> {
    let level: Level = level
        .parse()
        .map_err(|_| anyhow!("Unknown log level: {level}"))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

/// Write a report as pretty JSON followed by a newline
pub fn write_report<W: Write, T: Serialize>(mut out: W, report: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, report).context("serializing report")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_report_is_json() {
        let settings = settings::Settings::default();
        let mut buf = Vec::new();
        write_report(&mut buf, &settings).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["window"]["cfd_fraction"], 0.5);
        assert_eq!(parsed["light_mode"], "full_sum");
        assert!(buf.ends_with(b"\n"));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(init_logging("loud").is_err());
    }
}
