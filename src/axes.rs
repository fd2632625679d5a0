//! Default x/y column bindings per chart type.

use crate::classify::{classify, ColumnClasses};
use crate::data::Dataset;
use crate::recommend::ChartType;
use serde::{Deserialize, Serialize};

/// The columns driving a chart. Either side may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl AxisBinding {
    pub fn new(x: Option<&str>, y: Option<&str>) -> Self {
        Self {
            x: x.map(str::to_string),
            y: y.map(str::to_string),
        }
    }

    pub fn unset() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    pub fn is_unset(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

/// Propose axes for a chart type from an existing classification.
pub fn bind_axes(classes: &ColumnClasses, chart_type: ChartType) -> AxisBinding {
    let numeric = &classes.numeric;
    let first_categorical = classes.first_categorical();

    match chart_type {
        ChartType::Bar | ChartType::Pie => match (first_categorical, classes.first_numeric()) {
            (Some(x), Some(y)) => AxisBinding::new(Some(x), Some(y)),
            _ => AxisBinding::unset(),
        },
        ChartType::Line => match numeric.as_slice() {
            [] => AxisBinding::unset(),
            [only] => AxisBinding::new(first_categorical, Some(only.as_str())),
            [first, second, ..] => AxisBinding::new(Some(first.as_str()), Some(second.as_str())),
        },
    }
}

/// Classify the dataset and propose axes for a chart type.
pub fn select_axes(data: &Dataset, chart_type: ChartType) -> AxisBinding {
    bind_axes(&classify(data), chart_type)
}
