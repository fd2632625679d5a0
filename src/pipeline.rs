//! One upload's worth of work: classify, recommend, bind axes, render.

use crate::axes::{bind_axes, AxisBinding};
use crate::classify::{classify, ColumnClasses, ColumnKind};
use crate::config::RenderOptions;
use crate::data::Dataset;
use crate::error::RenderError;
use crate::ir::RenderedChart;
use crate::recommend::{recommend, ChartType, DataShape};
use crate::runtime::render_with;

/// Caller choices that replace the automatic ones.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub chart_type: Option<ChartType>,
    pub x: Option<String>,
    pub y: Option<String>,
}

#[derive(Debug)]
pub enum Outcome {
    /// The dataset has no rows; nothing was rendered.
    Empty,
    Charted(Report),
}

#[derive(Debug)]
pub struct Report {
    pub classes: ColumnClasses,
    pub recommended: ChartType,
    pub chart_type: ChartType,
    pub binding: AxisBinding,
    /// Hints about questionable axis choices. Rendering still runs.
    pub advisories: Vec<String>,
    pub result: Result<RenderedChart, RenderError>,
}

/// Run the whole pipeline for one dataset.
pub fn run(data: &Dataset, overrides: &Overrides, options: &RenderOptions) -> Outcome {
    if data.is_empty() {
        log::warn!("dataset has no rows, nothing to chart");
        return Outcome::Empty;
    }

    let classes = classify(data);
    let recommended = recommend(&DataShape::of(data, &classes));
    let chart_type = overrides.chart_type.unwrap_or(recommended);
    if chart_type != recommended {
        log::info!("chart type {} overrides recommended {}", chart_type, recommended);
    }

    let defaults = bind_axes(&classes, chart_type);
    let binding = AxisBinding {
        x: overrides.x.clone().or(defaults.x),
        y: overrides.y.clone().or(defaults.y),
    };

    let advisories = advise(&classes, chart_type, &binding);
    for advisory in &advisories {
        log::warn!("{}", advisory);
    }

    let result = render_with(data, chart_type, &binding, options);
    if let Err(err) = &result {
        if err.is_unexpected() {
            log::error!("{}", err);
        } else {
            log::warn!("{}", err);
        }
    }

    Outcome::Charted(Report {
        classes,
        recommended,
        chart_type,
        binding,
        advisories,
        result,
    })
}

/// Point out bindings that are likely to give a poor chart.
pub fn advise(classes: &ColumnClasses, chart_type: ChartType, binding: &AxisBinding) -> Vec<String> {
    let mut advisories = Vec::new();

    if matches!(chart_type, ChartType::Bar | ChartType::Pie) {
        if let Some(x) = &binding.x {
            if classes.kind_of(x) != Some(ColumnKind::Categorical) {
                advisories.push(format!(
                    "x axis '{}' is not categorical; {} charts usually group by a text column",
                    x, chart_type
                ));
            }
        }
    }

    if let Some(y) = &binding.y {
        if classes.kind_of(y) != Some(ColumnKind::Numeric) {
            advisories.push(format!("y axis '{}' is not a numeric column", y));
        }
    }

    advisories
}

/// File name offered for download: `Chart_{stem}_{Type}.png`.
///
/// The stem is the source name up to its first `.`.
pub fn download_file_name(source: &str, chart_type: ChartType) -> String {
    let base = source.rsplit(['/', '\\']).next().unwrap_or(source);
    let stem = base.split('.').next().unwrap_or(base);
    format!("Chart_{}_{}.png", stem, chart_type)
}
