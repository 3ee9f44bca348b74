use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "DATA_LENS_CONFIG";

/// Viewer settings. Every field has a default, so a settings file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rows shown in the dataset preview.
    pub preview_rows: usize,
    /// Equal-width bins drawn for histograms.
    pub histogram_bins: usize,
    /// Suggested file name for the filtered-data export.
    pub export_file_name: String,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            histogram_bins: 20,
            export_file_name: "filtered_data.csv".to_string(),
            window_size: [1200.0, 800.0],
        }
    }
}

impl Settings {
    /// Read settings from the file named by `DATA_LENS_CONFIG`, or defaults
    /// when the variable is unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text).context("parsing settings JSON")?;
        Ok(settings.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.histogram_bins = self.histogram_bins.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"preview_rows": 10}}"#).unwrap();
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.preview_rows, 10);
        assert_eq!(settings.histogram_bins, 20);
        assert_eq!(settings.export_file_name, "filtered_data.csv");
    }

    #[test]
    fn test_zero_bins_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"histogram_bins": 0}}"#).unwrap();
        assert_eq!(Settings::from_file(file.path()).unwrap().histogram_bins, 1);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing settings JSON"));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Settings::from_file(Path::new("/definitely/not/here.json")).is_err());
    }
}
