// Render executor: plan, draw, encode

use crate::axes::AxisBinding;
use crate::config::RenderOptions;
use crate::data::Dataset;
use crate::error::RenderError;
use crate::graph::Canvas;
use crate::ir::{ChartPlan, RenderedChart};
use crate::recommend::ChartType;
use crate::transform::plan_chart;
use anyhow::Result;

/// Render a chart with the default options.
pub fn render(
    data: &Dataset,
    chart_type: ChartType,
    binding: &AxisBinding,
) -> Result<RenderedChart, RenderError> {
    render_with(data, chart_type, binding, &RenderOptions::default())
}

/// Render a chart to PNG bytes.
///
/// Every call draws on its own canvas; on failure the canvas is dropped and
/// no image is returned.
pub fn render_with(
    data: &Dataset,
    chart_type: ChartType,
    binding: &AxisBinding,
    options: &RenderOptions,
) -> Result<RenderedChart, RenderError> {
    let plan = plan_chart(data, chart_type, binding)?;
    let png = draw_plan(&plan, options)?;
    log::info!(
        "rendered {} chart '{}' ({} bytes)",
        plan.chart_type,
        plan.title,
        png.len()
    );

    Ok(RenderedChart {
        chart_type: plan.chart_type,
        title: plan.title,
        png,
        warnings: plan.warnings,
    })
}

/// Draw an already planned chart and encode it.
pub fn draw_plan(plan: &ChartPlan, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(options)?;
    canvas.draw(plan)?;
    canvas.into_png()
}
