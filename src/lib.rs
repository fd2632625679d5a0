// Library exports for autochart

pub mod data;
pub mod error;
pub mod loader;
pub mod config;

// Inference
pub mod classify;
pub mod recommend;
pub mod axes;

// Rendering
pub mod palette;
pub mod scale;
pub mod ir;
pub mod transform;
pub mod graph;
pub mod runtime;
pub mod pipeline;

pub use axes::{select_axes, AxisBinding};
pub use classify::{classify, ColumnClasses, ColumnKind};
pub use config::{Config, LoadOptions, RenderOptions};
pub use data::Dataset;
pub use error::{LoadError, RenderError};
pub use ir::RenderedChart;
pub use pipeline::{download_file_name, run, Outcome, Overrides, Report};
pub use recommend::{recommend_chart_type, ChartType};
pub use runtime::{render, render_with};
