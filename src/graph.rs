use crate::config::RenderOptions;
use crate::ir::{ChartPlan, Geometry, Wedge};
use crate::palette::{wedge_color, BAR_COLOR, GRID_ALPHA, GRID_COLOR, LINE_COLOR};
use crate::scale;
use anyhow::{Context, Result};
use image::RgbImage;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

const FONT: &str = "sans-serif";
/// Upper bound on grid lines and tick labels per continuous axis.
const GRID_TICKS: usize = 10;
/// Category axes with more entries than this get thinned labels.
const MAX_CATEGORY_LABELS: usize = 30;
const BAR_WIDTH: f64 = 0.8;
/// Pie coordinates span `-PIE_EXTENT..PIE_EXTENT` around a unit circle.
const PIE_EXTENT: f64 = 1.35;
const PIE_LABEL_RADIUS: f64 = 1.15;
const PIE_PERCENT_RADIUS: f64 = 0.6;

type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type XYChart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Owned drawing surface for a single chart.
///
/// The pixel buffer lives only as long as the canvas; dropping it on an
/// error path releases everything drawn so far.
pub struct Canvas {
    surface: RgbImage,
    dpi: u32,
    scale: f64,
}

impl Canvas {
    pub fn new(options: &RenderOptions) -> Result<Self> {
        let (width, height) = options.pixel_size();
        if width == 0 || height == 0 {
            anyhow::bail!("Cannot create a {}x{} canvas", width, height);
        }

        Ok(Canvas {
            surface: RgbImage::new(width, height),
            dpi: options.dpi.max(1),
            scale: options.scale(),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    /// Draw a chart plan onto the canvas.
    pub fn draw(&mut self, plan: &ChartPlan) -> Result<()> {
        let (width, height) = self.surface.dimensions();
        let scale = self.scale;
        let root = BitMapBackend::with_buffer(&mut self.surface, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        match &plan.geometry {
            Geometry::Bars { labels, values } => draw_bars(&root, plan, labels, values, scale)?,
            Geometry::Line {
                points,
                x_categories,
            } => draw_line(&root, plan, points, x_categories.as_deref(), scale)?,
            Geometry::Pie { wedges } => draw_pie(&root, &plan.title, wedges, scale)?,
        }

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Finalize and encode the canvas as PNG, recording the DPI.
    pub fn into_png(self) -> Result<Vec<u8>> {
        let (width, height) = self.surface.dimensions();
        let pixels_per_meter = (f64::from(self.dpi) / 0.0254).round() as u32;

        let mut png_bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_bytes, width, height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: pixels_per_meter,
                yppu: pixels_per_meter,
                unit: png::Unit::Meter,
            }));
            let mut writer = encoder.write_header().context("Failed to write PNG header")?;
            writer
                .write_image_data(self.surface.as_raw())
                .context("Failed to encode PNG")?;
            writer.finish().context("Failed to finish PNG")?;
        }

        Ok(png_bytes)
    }
}

fn px(base: f64, scale: f64) -> u32 {
    (base * scale).round().max(1.0) as u32
}

fn font_size(base: f64, scale: f64) -> f64 {
    base * scale
}

/// Label for an integer category position; blank between positions.
fn category_label(categories: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories.get(rounded as usize).cloned().unwrap_or_default()
}

/// Integer positions for category grid lines, thinned for long axes.
fn category_ticks(count: usize) -> Vec<f64> {
    let step = count.div_ceil(MAX_CATEGORY_LABELS).max(1);
    (0..count).step_by(step).map(|i| i as f64).collect()
}

fn value_ticks(range: &Range<f64>) -> Vec<f64> {
    RangedCoordf64::from(range.clone()).key_points(GRID_TICKS)
}

/// Split `start..end` into dash intervals.
fn dash_segments(start: f64, end: f64, dash: f64, gap: f64) -> Vec<(f64, f64)> {
    let mut segments = Vec::new();
    if dash <= 0.0 || !(start < end) {
        return segments;
    }
    let mut pos = start;
    while pos < end {
        segments.push((pos, (pos + dash).min(end)));
        pos += dash + gap;
    }
    segments
}

/// Dashed grid lines at partial opacity.
fn draw_grid(
    chart: &mut XYChart<'_, '_>,
    x_range: &Range<f64>,
    y_range: &Range<f64>,
    x_ticks: &[f64],
    y_ticks: &[f64],
    scale: f64,
) -> Result<()> {
    let style = GRID_COLOR.mix(GRID_ALPHA).stroke_width(px(1.0, scale));
    let (width, height) = chart.plotting_area().dim_in_pixel();
    let dash = f64::from(px(6.0, scale));
    let gap = f64::from(px(4.0, scale));

    // Dash lengths are fixed in pixels, so convert per axis.
    let x_per_px = (x_range.end - x_range.start) / f64::from(width.max(1));
    let y_per_px = (y_range.end - y_range.start) / f64::from(height.max(1));

    let vertical = dash_segments(y_range.start, y_range.end, dash * y_per_px, gap * y_per_px);
    for &x in x_ticks {
        chart
            .draw_series(
                vertical
                    .iter()
                    .map(|&(a, b)| PathElement::new(vec![(x, a), (x, b)], style)),
            )
            .context("Failed to draw grid")?;
    }

    let horizontal = dash_segments(x_range.start, x_range.end, dash * x_per_px, gap * x_per_px);
    for &y in y_ticks {
        chart
            .draw_series(
                horizontal
                    .iter()
                    .map(|&(a, b)| PathElement::new(vec![(a, y), (b, y)], style)),
            )
            .context("Failed to draw grid")?;
    }
    Ok(())
}

fn build_xy_chart<'a, 'b>(
    root: &'a Root<'b>,
    title: &str,
    x_range: Range<f64>,
    y_range: Range<f64>,
    scale: f64,
) -> Result<XYChart<'a, 'b>> {
    ChartBuilder::on(root)
        .margin(px(10.0, scale))
        .caption(title, (FONT, font_size(20.0, scale)))
        .x_label_area_size(px(45.0, scale))
        .y_label_area_size(px(65.0, scale))
        .build_cartesian_2d(x_range, y_range)
        .context("Failed to build chart")
}

fn draw_bars(
    root: &Root<'_>,
    plan: &ChartPlan,
    labels: &[String],
    values: &[f64],
    scale: f64,
) -> Result<()> {
    if labels.is_empty() || labels.len() != values.len() {
        anyhow::bail!(
            "Bar chart needs one value per label (labels: {}, values: {})",
            labels.len(),
            values.len()
        );
    }

    let x_range = scale::category_range(labels.len());
    let y_range = scale::bar_range(values.iter().copied());
    let mut chart = build_xy_chart(root, &plan.title, x_range.clone(), y_range.clone(), scale)?;

    let x_ticks = category_ticks(labels.len());
    let formatter = |x: &f64| category_label(labels, *x);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(x_ticks.len())
        .x_label_formatter(&formatter)
        .y_labels(GRID_TICKS)
        .x_desc(plan.x_label.as_str())
        .y_desc(plan.y_label.as_str())
        .label_style((FONT, font_size(12.0, scale)))
        .axis_desc_style((FONT, font_size(14.0, scale)))
        .draw()
        .context("Failed to draw axes")?;

    draw_grid(&mut chart, &x_range, &y_range, &x_ticks, &value_ticks(&y_range), scale)?;

    let half = BAR_WIDTH / 2.0;
    chart
        .draw_series(values.iter().enumerate().map(|(idx, &value)| {
            let x = idx as f64;
            Rectangle::new([(x - half, 0.0), (x + half, value)], BAR_COLOR.filled())
        }))
        .context("Failed to draw bars")?;

    Ok(())
}

fn draw_line(
    root: &Root<'_>,
    plan: &ChartPlan,
    points: &[(f64, f64)],
    x_categories: Option<&[String]>,
    scale: f64,
) -> Result<()> {
    if points.is_empty() {
        anyhow::bail!("Cannot draw a line chart with no data points");
    }

    let x_range = match x_categories {
        Some(categories) => scale::category_range(categories.len()),
        None => scale::continuous_range(points.iter().map(|p| p.0)),
    };
    let y_range = scale::continuous_range(points.iter().map(|p| p.1));
    let x_ticks = match x_categories {
        Some(categories) => category_ticks(categories.len()),
        None => value_ticks(&x_range),
    };

    let mut chart = build_xy_chart(root, &plan.title, x_range.clone(), y_range.clone(), scale)?;

    let formatter = |x: &f64| category_label(x_categories.unwrap_or(&[]), *x);
    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .y_labels(GRID_TICKS)
            .x_desc(plan.x_label.as_str())
            .y_desc(plan.y_label.as_str())
            .label_style((FONT, font_size(12.0, scale)))
            .axis_desc_style((FONT, font_size(14.0, scale)));
        if x_categories.is_some() {
            mesh.x_labels(x_ticks.len()).x_label_formatter(&formatter);
        } else {
            mesh.x_labels(GRID_TICKS);
        }
        mesh.draw().context("Failed to draw axes")?;
    }

    draw_grid(&mut chart, &x_range, &y_range, &x_ticks, &value_ticks(&y_range), scale)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            LINE_COLOR.stroke_width(px(2.0, scale)),
        ))
        .context("Failed to draw line series")?;

    let marker = px(4.0, scale) as i32;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), marker, LINE_COLOR.filled())),
        )
        .context("Failed to draw markers")?;

    Ok(())
}

/// Polygon for a wedge of the unit circle, angles in degrees.
fn wedge_points(start_deg: f64, sweep_deg: f64) -> Vec<(f64, f64)> {
    let steps = (sweep_deg / 2.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push((0.0, 0.0));
    for step in 0..=steps {
        let angle = (start_deg + sweep_deg * step as f64 / steps as f64).to_radians();
        points.push((angle.cos(), angle.sin()));
    }
    points
}

fn polar(radius: f64, angle_deg: f64) -> (f64, f64) {
    let angle = angle_deg.to_radians();
    (radius * angle.cos(), radius * angle.sin())
}

fn draw_pie(root: &Root<'_>, title: &str, wedges: &[Wedge], scale: f64) -> Result<()> {
    if wedges.is_empty() {
        anyhow::bail!("Cannot draw a pie chart with no wedges");
    }

    let area = root
        .titled(title, (FONT, font_size(20.0, scale)))
        .context("Failed to draw title")?;
    let (width, height) = area.dim_in_pixel();
    let side = width.min(height);
    let inset = (width - side) / 2;
    let square = area.margin(0, 0, inset, inset);

    let extent = -PIE_EXTENT..PIE_EXTENT;
    let mut chart = ChartBuilder::on(&square)
        .margin(px(10.0, scale))
        .build_cartesian_2d(extent.clone(), extent.clone())
        .context("Failed to build chart")?;

    let ticks = value_ticks(&extent);
    draw_grid(&mut chart, &extent, &extent, &ticks, &ticks, scale)?;

    let text_style = TextStyle::from((FONT, font_size(14.0, scale)))
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    // Counter-clockwise from twelve o'clock.
    let mut start = 90.0;
    for (idx, wedge) in wedges.iter().enumerate() {
        let sweep = wedge.fraction * 360.0;
        if sweep <= 0.0 {
            continue;
        }

        let points = wedge_points(start, sweep);
        chart
            .draw_series(std::iter::once(Polygon::new(
                points.clone(),
                wedge_color(idx).filled(),
            )))
            .context("Failed to draw wedge")?;

        let mut outline = points;
        outline.push((0.0, 0.0));
        chart
            .draw_series(std::iter::once(PathElement::new(
                outline,
                WHITE.stroke_width(px(1.0, scale)),
            )))
            .context("Failed to draw wedge outline")?;

        let middle = start + sweep / 2.0;
        chart
            .draw_series([
                Text::new(wedge.label.clone(), polar(PIE_LABEL_RADIUS, middle), text_style.clone()),
                Text::new(wedge.percent_label(), polar(PIE_PERCENT_RADIUS, middle), text_style.clone()),
            ])
            .context("Failed to draw wedge labels")?;

        start += sweep;
    }

    Ok(())
}
