use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Figure size in inches. The aspect ratio is fixed; only the DPI varies.
pub const FIGURE_INCHES: (f64, f64) = (10.0, 6.0);

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderOptions,
    #[serde(default)]
    pub load: LoadOptions,
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid configuration JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_dpi() -> u32 { 300 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self { dpi: default_dpi() }
    }
}

impl RenderOptions {
    /// Pixel dimensions of the canvas at the configured DPI.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi.max(1));
        (
            (FIGURE_INCHES.0 * dpi).round() as u32,
            (FIGURE_INCHES.1 * dpi).round() as u32,
        )
    }

    /// Font and stroke multiplier relative to 100 DPI.
    pub fn scale(&self) -> f64 {
        f64::from(self.dpi.max(1)) / 100.0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadOptions {
    /// Encoding labels tried in order when decoding delimited text.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
}

fn default_encodings() -> Vec<String> {
    vec!["utf-8".to_string(), "euc-kr".to_string()]
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            encodings: default_encodings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config.render.dpi, 300);
        assert_eq!(config.render.pixel_size(), (3000, 1800));
        assert_eq!(config.load.encodings, vec!["utf-8", "euc-kr"]);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json_str(r#"{"render": {"dpi": 150}}"#).unwrap();
        assert_eq!(config.render.dpi, 150);
        assert_eq!(config.render.pixel_size(), (1500, 900));
        assert_eq!(config.load.encodings.len(), 2);
    }

    #[test]
    fn test_encoding_list_override() {
        let config =
            Config::from_json_str(r#"{"load": {"encodings": ["windows-1252"]}}"#).unwrap();
        assert_eq!(config.load.encodings, vec!["windows-1252"]);
    }

    #[test]
    fn test_invalid_json() {
        let result = Config::from_json_str("{render:");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_pixel_size_keeps_aspect() {
        let options = RenderOptions { dpi: 100 };
        assert_eq!(options.pixel_size(), (1000, 600));
        assert_eq!(options.scale(), 1.0);
    }
}
