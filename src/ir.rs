//! Intermediate representation between data aggregation and drawing.
//!
//! `transform` turns a dataset plus axis binding into a [`ChartPlan`];
//! `graph` draws a plan without looking at the dataset again.

use crate::recommend::ChartType;

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub chart_type: ChartType,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub geometry: Geometry,
    /// Fallbacks taken while planning, in the order they happened.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// One bar per label, drawn left to right in this order.
    Bars { labels: Vec<String>, values: Vec<f64> },
    /// A polyline with circle markers, in row order.
    Line {
        points: Vec<(f64, f64)>,
        /// Labels for integer x positions when the x column is categorical.
        x_categories: Option<Vec<String>>,
    },
    /// Wedges drawn counter-clockwise from twelve o'clock.
    Pie { wedges: Vec<Wedge> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub value: f64,
    /// Share of the total, in `0.0..=1.0`.
    pub fraction: f64,
}

impl Wedge {
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

/// A rendered chart handed back to the caller.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub chart_type: ChartType,
    pub title: String,
    /// PNG-encoded image.
    pub png: Vec<u8>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_label_rounds_to_one_decimal() {
        let wedge = Wedge {
            label: "A".to_string(),
            value: 15.0,
            fraction: 15.0 / 45.0,
        };
        assert_eq!(wedge.percent_label(), "33.3%");

        let wedge = Wedge {
            label: "B".to_string(),
            value: 30.0,
            fraction: 30.0 / 45.0,
        };
        assert_eq!(wedge.percent_label(), "66.7%");
    }
}
