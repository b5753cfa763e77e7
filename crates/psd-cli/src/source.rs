//! Waveform source: JSON array of equally long sample rows

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use std::path::Path;
use tracing::info;

/// Load a waveform batch from a JSON file shaped `[[f64, ...], ...]`.
///
/// Each inner array is one pulse; all pulses must have the same number of
/// samples.
pub fn load_waveforms(path: &Path) -> Result<Array2<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading waveform file {}", path.display()))?;
    let batch = parse_waveforms(&text)
        .with_context(|| format!("parsing waveform file {}", path.display()))?;

    info!(
        "Loaded {} waveforms of {} samples from {}",
        batch.nrows(),
        batch.ncols(),
        path.display()
    );
    Ok(batch)
}

/// Parse a JSON waveform batch already held in memory
pub fn parse_waveforms(text: &str) -> Result<Array2<f64>> {
    let rows: Vec<Vec<f64>> =
        serde_json::from_str(text).context("expected an array of sample arrays")?;

    let samples = rows.first().map_or(0, Vec::len);
    for (i, row) in rows.iter().enumerate() {
        if row.len() != samples {
            bail!("Row {i}: has {} samples but row 0 has {samples}", row.len());
        }
    }

    let pulses = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((pulses, samples), flat).context("assembling waveform batch")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch() {
        let batch = parse_waveforms("[[0, 1, 4, 10], [0.5, 2.5, 3, 1]]").unwrap();
        assert_eq!(batch.dim(), (2, 4));
        assert_eq!(batch[[0, 3]], 10.0);
        assert_eq!(batch[[1, 0]], 0.5);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = parse_waveforms("[[0, 1, 2], [0, 1]]").unwrap_err();
        assert!(err.to_string().contains("Row 1"));
    }

    #[test]
    fn test_not_numeric_rejected() {
        assert!(parse_waveforms(r#"[["a", "b"]]"#).is_err());
        assert!(parse_waveforms("{}").is_err());
    }

    #[test]
    fn test_empty_batch() {
        let batch = parse_waveforms("[]").unwrap();
        assert_eq!(batch.dim(), (0, 0));
    }

    #[test]
    fn test_missing_file() {
        let err = load_waveforms(Path::new("/nonexistent/waveforms.json")).unwrap_err();
        assert!(err.to_string().contains("reading waveform file"));
    }
}
