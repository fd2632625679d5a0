//! Error types for loading datasets and rendering charts.

use crate::recommend::ChartType;
use thiserror::Error;

/// Failures raised while turning a file into a [`Dataset`](crate::data::Dataset).
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file extension is not one we know how to read.
    #[error("unsupported file type '{extension}' (expected .csv, .tsv, .json or a spreadsheet)")]
    UnsupportedExtension { extension: String },

    /// Every configured text encoding failed to decode the file.
    #[error("could not decode file text with any of: {}", .tried.join(", "))]
    Decode { tried: Vec<String> },

    /// An encoding label in the configuration is not recognised.
    #[error("unknown text encoding '{0}'")]
    UnknownEncoding(String),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Structurally valid text that does not describe a table.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised while rendering a chart.
///
/// All variants except [`RenderError::Unexpected`] mean the requested chart
/// does not fit the chosen columns; picking other axes or another chart type
/// may succeed.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("insufficient categorical/numeric data to draw a pie chart")]
    InsufficientPieData,

    #[error("no numeric column available for a {0} chart")]
    NoNumericColumn(ChartType),

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("no drawable values in column '{0}'")]
    NothingToDraw(String),

    #[error("pie chart needs positive totals: {0}")]
    InvalidPieValues(String),

    /// Anything else that went wrong while drawing or encoding.
    #[error("unexpected error while drawing chart: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl RenderError {
    pub fn is_unexpected(&self) -> bool {
        matches!(self, RenderError::Unexpected(_))
    }
}
