use crate::axes::AxisBinding;
use crate::classify::{classify, classify_column, ColumnKind};
use crate::data::{is_missing, parse_number, Dataset};
use crate::error::RenderError;
use crate::ir::{ChartPlan, Geometry, Wedge};
use crate::recommend::ChartType;
use anyhow::anyhow;
use std::cmp::Ordering;
use std::collections::HashMap;

const INDEX_LABEL: &str = "Index";

/// Main entry point: turn a dataset and axis binding into a drawable plan.
pub fn plan_chart(
    data: &Dataset,
    chart_type: ChartType,
    binding: &AxisBinding,
) -> Result<ChartPlan, RenderError> {
    match chart_type {
        ChartType::Bar => plan_bar(data, binding),
        ChartType::Line => plan_line(data, binding),
        ChartType::Pie => plan_pie(data, binding),
    }
}

fn plan_bar(data: &Dataset, binding: &AxisBinding) -> Result<ChartPlan, RenderError> {
    let mut warnings = Vec::new();

    let column = match (&binding.x, &binding.y) {
        (Some(x), Some(y)) => {
            let mut groups = grouped_sums(data, x, y)?;
            if !groups.is_empty() {
                // Stable, so equal sums keep key order.
                groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
                let (labels, values) = groups.into_iter().unzip();

                return Ok(ChartPlan {
                    chart_type: ChartType::Bar,
                    title: format!("{} grouped sum of {}", x, y),
                    x_label: x.clone(),
                    y_label: y.clone(),
                    geometry: Geometry::Bars { labels, values },
                    warnings,
                });
            }
            record(
                &mut warnings,
                format!("every '{}' key is missing; plotting '{}' against row index", x, y),
            );
            y.clone()
        }
        _ => fallback_column(data, ChartType::Bar, &mut warnings)?,
    };

    let series = index_series(data, &column)?;
    if series.is_empty() {
        return Err(RenderError::NothingToDraw(column));
    }

    let (labels, values) = series
        .into_iter()
        .map(|(row, value)| (row.to_string(), value))
        .unzip();

    Ok(ChartPlan {
        chart_type: ChartType::Bar,
        title: format!("{} by row", column),
        x_label: INDEX_LABEL.to_string(),
        y_label: column,
        geometry: Geometry::Bars { labels, values },
        warnings,
    })
}

fn plan_line(data: &Dataset, binding: &AxisBinding) -> Result<ChartPlan, RenderError> {
    match (&binding.x, &binding.y) {
        (Some(x), Some(y)) => plan_xy_line(data, x, y),
        (None, Some(y)) => plan_index_line(data, y.clone(), Vec::new()),
        (_, None) => {
            let mut warnings = Vec::new();
            let column = fallback_column(data, ChartType::Line, &mut warnings)?;
            plan_index_line(data, column, warnings)
        }
    }
}

fn plan_xy_line(data: &Dataset, x: &str, y: &str) -> Result<ChartPlan, RenderError> {
    let x_idx = find_column(data, x)?;
    let y_values = numeric_column(data, y)?;

    let (points, x_categories) = match classify_column(data.column(x_idx)) {
        ColumnKind::Numeric => {
            let points = data
                .column(x_idx)
                .zip(&y_values)
                .filter_map(|(x_cell, y_val)| Some((parse_number(x_cell)?, (*y_val)?)))
                .collect::<Vec<_>>();
            (points, None)
        }
        ColumnKind::Categorical => {
            let mut positions: HashMap<String, usize> = HashMap::new();
            let mut categories: Vec<String> = Vec::new();
            let mut points = Vec::new();
            for (x_cell, y_val) in data.column(x_idx).zip(&y_values) {
                if is_missing(x_cell) {
                    continue;
                }
                let key = x_cell.trim().to_string();
                let position = *positions.entry(key.clone()).or_insert_with(|| {
                    categories.push(key);
                    categories.len() - 1
                });
                if let Some(y_val) = y_val {
                    points.push((position as f64, *y_val));
                }
            }
            (points, Some(categories))
        }
    };

    if points.is_empty() {
        let mut warnings = Vec::new();
        record(
            &mut warnings,
            format!(
                "'{}' and '{}' have no row with both values; plotting '{}' against row index",
                x, y, y
            ),
        );
        return plan_index_line(data, y.to_string(), warnings);
    }

    Ok(ChartPlan {
        chart_type: ChartType::Line,
        title: format!("{} vs {} trend", x, y),
        x_label: x.to_string(),
        y_label: y.to_string(),
        geometry: Geometry::Line {
            points,
            x_categories,
        },
        warnings: Vec::new(),
    })
}

fn plan_index_line(
    data: &Dataset,
    column: String,
    warnings: Vec<String>,
) -> Result<ChartPlan, RenderError> {
    let points: Vec<(f64, f64)> = index_series(data, &column)?
        .into_iter()
        .map(|(row, value)| (row as f64, value))
        .collect();
    if points.is_empty() {
        return Err(RenderError::NothingToDraw(column));
    }

    Ok(ChartPlan {
        chart_type: ChartType::Line,
        title: format!("{} trend", column),
        x_label: INDEX_LABEL.to_string(),
        y_label: column,
        geometry: Geometry::Line {
            points,
            x_categories: None,
        },
        warnings,
    })
}

fn plan_pie(data: &Dataset, binding: &AxisBinding) -> Result<ChartPlan, RenderError> {
    let (Some(x), Some(y)) = (&binding.x, &binding.y) else {
        return Err(RenderError::InsufficientPieData);
    };

    let groups = grouped_sums(data, x, y)?;
    if groups.is_empty() {
        return Err(RenderError::NothingToDraw(x.clone()));
    }
    if let Some((key, value)) = groups.iter().find(|(_, v)| *v < 0.0) {
        return Err(RenderError::InvalidPieValues(format!(
            "group '{}' sums to {}",
            key, value
        )));
    }
    let total: f64 = groups.iter().map(|(_, v)| v).sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(RenderError::InvalidPieValues(format!(
            "'{}' totals {}",
            y, total
        )));
    }

    let wedges = groups
        .into_iter()
        .map(|(label, value)| Wedge {
            label,
            value,
            fraction: value / total,
        })
        .collect();

    Ok(ChartPlan {
        chart_type: ChartType::Pie,
        title: format!("{} share of {}", x, y),
        x_label: x.clone(),
        y_label: y.clone(),
        geometry: Geometry::Pie { wedges },
        warnings: Vec::new(),
    })
}

fn record(warnings: &mut Vec<String>, warning: String) {
    log::warn!("{}", warning);
    warnings.push(warning);
}

/// First numeric column of the dataset, recording the fallback.
fn fallback_column(
    data: &Dataset,
    chart_type: ChartType,
    warnings: &mut Vec<String>,
) -> Result<String, RenderError> {
    let classes = classify(data);
    let column = classes
        .first_numeric()
        .ok_or(RenderError::NoNumericColumn(chart_type))?
        .to_string();

    record(
        warnings,
        format!(
            "no complete axis binding for {} chart; plotting '{}' against row index",
            chart_type, column
        ),
    );
    Ok(column)
}

fn find_column(data: &Dataset, name: &str) -> Result<usize, RenderError> {
    data.column_index(name)
        .ok_or_else(|| RenderError::ColumnNotFound(name.to_string()))
}

/// Parse every cell of a column; missing cells become `None`.
fn numeric_column(data: &Dataset, name: &str) -> Result<Vec<Option<f64>>, RenderError> {
    let idx = find_column(data, name)?;
    data.column(idx)
        .enumerate()
        .map(|(row_idx, cell)| {
            if is_missing(cell) {
                return Ok(None);
            }
            parse_number(cell).map(Some).ok_or_else(|| {
                RenderError::Unexpected(anyhow!(
                    "Failed to parse '{}' as number in column '{}' at row {}",
                    cell,
                    name,
                    row_idx + 1
                ))
            })
        })
        .collect()
}

/// Present values of a column paired with their row index.
fn index_series(data: &Dataset, name: &str) -> Result<Vec<(usize, f64)>, RenderError> {
    Ok(numeric_column(data, name)?
        .into_iter()
        .enumerate()
        .filter_map(|(row, value)| value.map(|v| (row, v)))
        .collect())
}

/// Sum `y` per distinct value of `x`, in key order.
///
/// Rows with a missing `x` belong to no group.
fn grouped_sums(data: &Dataset, x: &str, y: &str) -> Result<Vec<(String, f64)>, RenderError> {
    let x_idx = find_column(data, x)?;
    let y_values = numeric_column(data, y)?;

    let mut sums: HashMap<String, f64> = HashMap::new();
    for (x_cell, y_val) in data.column(x_idx).zip(y_values) {
        if is_missing(x_cell) {
            continue;
        }
        *sums.entry(x_cell.trim().to_string()).or_insert(0.0) += y_val.unwrap_or(0.0);
    }

    let mut keys: Vec<String> = sums.keys().cloned().collect();
    order_keys(&mut keys);

    Ok(keys
        .into_iter()
        .map(|key| {
            let value = sums[&key];
            (key, value)
        })
        .collect())
}

/// Numeric order when every key is a number, lexicographic otherwise.
fn order_keys(keys: &mut [String]) {
    let numeric: Option<Vec<f64>> = keys.iter().map(|k| k.parse::<f64>().ok()).collect();

    if numeric.is_some() {
        keys.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(fa), Ok(fb)) => fa.partial_cmp(&fb).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        });
    } else {
        keys.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create test Dataset
    fn make_dataset(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> Dataset {
        Dataset::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn scenario() -> Dataset {
        make_dataset(
            vec!["Name", "Value"],
            vec![vec!["A", "10"], vec!["B", "30"], vec!["A", "5"]],
        )
    }

    #[test]
    fn test_bar_groups_sorted_descending() {
        let data = make_dataset(
            vec!["cat", "val"],
            vec![
                vec!["x", "4"],
                vec!["y", "20"],
                vec!["z", "30"],
                vec!["x", "6"],
                vec!["y", "30"],
            ],
        );
        let plan = plan_chart(&data, ChartType::Bar, &AxisBinding::new(Some("cat"), Some("val"))).unwrap();
        assert_eq!(plan.title, "cat grouped sum of val");
        match plan.geometry {
            Geometry::Bars { labels, values } => {
                assert_eq!(values, vec![50.0, 30.0, 10.0]);
                assert_eq!(labels, vec!["y", "z", "x"]);
            }
            other => panic!("expected bars, got {:?}", other),
        }
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_bar_ties_keep_key_order() {
        let data = make_dataset(vec!["k", "v"], vec![vec!["b", "1"], vec!["a", "1"]]);
        let plan = plan_chart(&data, ChartType::Bar, &AxisBinding::new(Some("k"), Some("v"))).unwrap();
        match plan.geometry {
            Geometry::Bars { labels, .. } => assert_eq!(labels, vec!["a", "b"]),
            other => panic!("expected bars, got {:?}", other),
        }
    }

    #[test]
    fn test_bar_fallback_uses_first_numeric_against_index() {
        let data = make_dataset(
            vec!["label", "first", "second"],
            vec![vec!["a", "3", "9"], vec!["b", "", "8"], vec!["c", "1", "7"]],
        );
        let plan = plan_chart(&data, ChartType::Bar, &AxisBinding::new(None, Some("second"))).unwrap();
        assert_eq!(plan.y_label, "first");
        assert_eq!(plan.x_label, "Index");
        assert_eq!(plan.warnings.len(), 1);
        match plan.geometry {
            Geometry::Bars { labels, values } => {
                assert_eq!(labels, vec!["0", "2"]);
                assert_eq!(values, vec![3.0, 1.0]);
            }
            other => panic!("expected bars, got {:?}", other),
        }
    }

    #[test]
    fn test_bar_fallback_without_numeric_fails() {
        let data = make_dataset(vec!["a"], vec![vec!["x"]]);
        let result = plan_chart(&data, ChartType::Bar, &AxisBinding::unset());
        assert!(matches!(result, Err(RenderError::NoNumericColumn(ChartType::Bar))));
    }

    #[test]
    fn test_line_xy_keeps_row_order() {
        let data = make_dataset(
            vec!["t", "v"],
            vec![vec!["3", "30"], vec!["1", "10"], vec!["2", "20"]],
        );
        let plan = plan_chart(&data, ChartType::Line, &AxisBinding::new(Some("t"), Some("v"))).unwrap();
        assert_eq!(plan.title, "t vs v trend");
        match plan.geometry {
            Geometry::Line { points, x_categories } => {
                assert_eq!(points, vec![(3.0, 30.0), (1.0, 10.0), (2.0, 20.0)]);
                assert!(x_categories.is_none());
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_line_categorical_x_uses_first_appearance() {
        let data = make_dataset(
            vec!["month", "sales"],
            vec![
                vec!["Jan", "1"],
                vec!["Feb", "2"],
                vec!["Jan", "3"],
                vec!["Mar", ""],
            ],
        );
        let plan = plan_chart(&data, ChartType::Line, &AxisBinding::new(Some("month"), Some("sales"))).unwrap();
        match plan.geometry {
            Geometry::Line { points, x_categories } => {
                assert_eq!(points, vec![(0.0, 1.0), (1.0, 2.0), (0.0, 3.0)]);
                assert_eq!(x_categories.unwrap(), vec!["Jan", "Feb", "Mar"]);
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_line_y_only_uses_index() {
        let data = make_dataset(vec!["v"], vec![vec!["5"], vec!["7"]]);
        let plan = plan_chart(&data, ChartType::Line, &AxisBinding::new(None, Some("v"))).unwrap();
        assert_eq!(plan.title, "v trend");
        assert!(plan.warnings.is_empty());
        match plan.geometry {
            Geometry::Line { points, .. } => assert_eq!(points, vec![(0.0, 5.0), (1.0, 7.0)]),
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_line_without_y_falls_back() {
        let data = make_dataset(vec!["name", "v"], vec![vec!["a", "5"]]);
        let plan = plan_chart(&data, ChartType::Line, &AxisBinding::new(Some("name"), None)).unwrap();
        assert_eq!(plan.y_label, "v");
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_line_without_numeric_fails() {
        let data = make_dataset(vec!["name"], vec![vec!["a"]]);
        let result = plan_chart(&data, ChartType::Line, &AxisBinding::unset());
        assert!(matches!(result, Err(RenderError::NoNumericColumn(ChartType::Line))));
    }

    #[test]
    fn test_pie_scenario() {
        let plan = plan_chart(&scenario(), ChartType::Pie, &AxisBinding::new(Some("Name"), Some("Value"))).unwrap();
        match plan.geometry {
            Geometry::Pie { wedges } => {
                assert_eq!(wedges.len(), 2);
                assert_eq!(wedges[0].label, "A");
                assert_eq!(wedges[0].value, 15.0);
                assert_eq!(wedges[0].percent_label(), "33.3%");
                assert_eq!(wedges[1].label, "B");
                assert_eq!(wedges[1].value, 30.0);
                assert_eq!(wedges[1].percent_label(), "66.7%");
            }
            other => panic!("expected pie, got {:?}", other),
        }
    }

    #[test]
    fn test_pie_requires_both_axes() {
        for binding in [
            AxisBinding::unset(),
            AxisBinding::new(Some("Name"), None),
            AxisBinding::new(None, Some("Value")),
        ] {
            let result = plan_chart(&scenario(), ChartType::Pie, &binding);
            assert!(matches!(result, Err(RenderError::InsufficientPieData)));
        }
    }

    #[test]
    fn test_pie_rejects_negative_groups() {
        let data = make_dataset(vec!["k", "v"], vec![vec!["a", "5"], vec!["b", "-2"]]);
        let result = plan_chart(&data, ChartType::Pie, &AxisBinding::new(Some("k"), Some("v")));
        assert!(matches!(result, Err(RenderError::InvalidPieValues(_))));
    }

    #[test]
    fn test_pie_rejects_zero_total() {
        let data = make_dataset(vec!["k", "v"], vec![vec!["a", "0"], vec!["b", ""]]);
        let result = plan_chart(&data, ChartType::Pie, &AxisBinding::new(Some("k"), Some("v")));
        assert!(matches!(result, Err(RenderError::InvalidPieValues(_))));
    }

    #[test]
    fn test_non_numeric_y_is_unexpected() {
        let data = make_dataset(vec!["k", "v"], vec![vec!["a", "ten"]]);
        let result = plan_chart(&data, ChartType::Bar, &AxisBinding::new(Some("k"), Some("v")));
        let err = result.unwrap_err();
        assert!(err.is_unexpected());
        assert!(err.to_string().contains("Failed to parse 'ten'"));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let result = plan_chart(&scenario(), ChartType::Bar, &AxisBinding::new(Some("Nope"), Some("Value")));
        assert!(matches!(result, Err(RenderError::ColumnNotFound(name)) if name == "Nope"));
    }

    #[test]
    fn test_missing_keys_are_dropped_from_groups() {
        let data = make_dataset(
            vec!["k", "v"],
            vec![vec!["", "2"], vec!["a", "1"], vec!["NA", "3"], vec!["(blank)", "4"]],
        );
        let groups = grouped_sums(&data, "k", "v").unwrap();
        assert_eq!(groups, vec![("(blank)".to_string(), 4.0), ("a".to_string(), 1.0)]);
    }

    #[test]
    fn test_pie_with_every_key_missing_has_nothing_to_draw() {
        let data = make_dataset(vec!["k", "v"], vec![vec!["", "2"], vec!["NA", "3"]]);
        let result = plan_chart(&data, ChartType::Pie, &AxisBinding::new(Some("k"), Some("v")));
        assert!(matches!(result, Err(RenderError::NothingToDraw(name)) if name == "k"));
    }

    #[test]
    fn test_bar_with_every_key_missing_uses_index() {
        let data = make_dataset(vec!["k", "v"], vec![vec!["", "2"], vec!["NA", "3"]]);
        let plan = plan_chart(&data, ChartType::Bar, &AxisBinding::new(Some("k"), Some("v"))).unwrap();
        assert_eq!(plan.x_label, "Index");
        assert_eq!(plan.warnings.len(), 1);
        match plan.geometry {
            Geometry::Bars { labels, values } => {
                assert_eq!(labels, vec!["0", "1"]);
                assert_eq!(values, vec![2.0, 3.0]);
            }
            other => panic!("expected bars, got {:?}", other),
        }
    }

    #[test]
    fn test_line_without_shared_rows_uses_index() {
        let data = make_dataset(vec!["a", "b"], vec![vec!["1", ""], vec!["", "2"]]);
        let plan = plan_chart(&data, ChartType::Line, &AxisBinding::new(Some("a"), Some("b"))).unwrap();
        assert_eq!(plan.title, "b trend");
        assert_eq!(plan.x_label, "Index");
        assert_eq!(plan.warnings.len(), 1);
        match plan.geometry {
            Geometry::Line { points, x_categories } => {
                assert_eq!(points, vec![(1.0, 2.0)]);
                assert!(x_categories.is_none());
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_line_categorical_x_skips_missing_keys() {
        let data = make_dataset(
            vec!["day", "v"],
            vec![vec!["", "1"], vec!["mon", "2"], vec!["NA", "3"]],
        );
        let plan = plan_chart(&data, ChartType::Line, &AxisBinding::new(Some("day"), Some("v"))).unwrap();
        match plan.geometry {
            Geometry::Line { points, x_categories } => {
                assert_eq!(points, vec![(0.0, 2.0)]);
                assert_eq!(x_categories.unwrap(), vec!["mon"]);
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_keys_sort_numerically() {
        let mut keys = vec!["10".to_string(), "9".to_string(), "100".to_string()];
        order_keys(&mut keys);
        assert_eq!(keys, vec!["9", "10", "100"]);

        let mut keys = vec!["b".to_string(), "10".to_string(), "9".to_string()];
        order_keys(&mut keys);
        assert_eq!(keys, vec!["10", "9", "b"]);
    }
}
