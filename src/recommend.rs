//! Chart type recommendation from the shape of a dataset.
//!
//! The rules below are evaluated top-down and the first match wins:
//!
//! ```text
//! trend       rows > 5, >= 1 numeric, >= 1 categorical      -> Line
//! proportion  >= 1 numeric, >= 1 categorical, 1 < u <= 5    -> Pie
//! comparison  >= 1 numeric, >= 1 categorical                -> Bar
//! series      >= 1 numeric                                  -> Line
//! (fallback)                                                -> Bar
//! ```
//!
//! `u` is the number of distinct values in the first categorical column.

use crate::classify::{classify, ColumnClasses};
use crate::data::Dataset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rows above this count make mixed data a trend.
pub const TREND_MIN_ROWS: usize = 5;
/// Most categories a pie chart is suggested for.
pub const PIE_MAX_CATEGORIES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

impl ChartType {
    pub const ALL: [ChartType; 3] = [ChartType::Bar, ChartType::Line, ChartType::Pie];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
            ChartType::Pie => "Pie",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "pie" => Ok(ChartType::Pie),
            other => Err(format!("unknown chart type '{}' (expected bar, line or pie)", other)),
        }
    }
}

/// The inputs the recommender looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataShape {
    pub rows: usize,
    pub numeric: usize,
    pub categorical: usize,
    /// Distinct values in the first categorical column (0 when there is none).
    pub first_category_distinct: usize,
}

impl DataShape {
    pub fn of(data: &Dataset, classes: &ColumnClasses) -> Self {
        Self {
            rows: data.row_count(),
            numeric: classes.numeric.len(),
            categorical: classes.categorical.len(),
            first_category_distinct: classes
                .first_categorical()
                .map(|name| data.distinct_count(name))
                .unwrap_or(0),
        }
    }

    fn is_mixed(&self) -> bool {
        self.numeric >= 1 && self.categorical >= 1
    }
}

struct Rule {
    name: &'static str,
    when: fn(&DataShape) -> bool,
    chart: ChartType,
}

const RULES: &[Rule] = &[
    Rule {
        name: "trend",
        when: |s| s.rows > TREND_MIN_ROWS && s.is_mixed(),
        chart: ChartType::Line,
    },
    Rule {
        name: "proportion",
        when: |s| {
            s.is_mixed()
                && s.first_category_distinct > 1
                && s.first_category_distinct <= PIE_MAX_CATEGORIES
        },
        chart: ChartType::Pie,
    },
    Rule {
        name: "comparison",
        when: |s| s.is_mixed(),
        chart: ChartType::Bar,
    },
    Rule {
        name: "series",
        when: |s| s.numeric >= 1,
        chart: ChartType::Line,
    },
];

/// Pick a chart type for a data shape.
pub fn recommend(shape: &DataShape) -> ChartType {
    match RULES.iter().find(|rule| (rule.when)(shape)) {
        Some(rule) => {
            log::debug!("recommender rule '{}' matched {:?}", rule.name, shape);
            rule.chart
        }
        None => {
            log::debug!("no recommender rule matched {:?}, defaulting to Bar", shape);
            ChartType::Bar
        }
    }
}

/// Classify the dataset and pick a chart type for it.
pub fn recommend_chart_type(data: &Dataset) -> ChartType {
    let classes = classify(data);
    recommend(&DataShape::of(data, &classes))
}
