//! Column classification: numeric versus categorical.

use crate::data::{is_missing, parse_number, Dataset};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Column names split by kind, each group in original column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnClasses {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClasses {
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        if self.numeric.iter().any(|c| c == name) {
            Some(ColumnKind::Numeric)
        } else if self.categorical.iter().any(|c| c == name) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    pub fn first_numeric(&self) -> Option<&str> {
        self.numeric.first().map(String::as_str)
    }

    pub fn first_categorical(&self) -> Option<&str> {
        self.categorical.first().map(String::as_str)
    }
}

/// Decide the kind of a column from its cells.
///
/// A column is numeric when it has at least one present value and every
/// present value parses as a number. Empty and all-missing columns are
/// categorical.
pub fn classify_column<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnKind {
    let mut seen_value = false;
    for cell in cells {
        if is_missing(cell) {
            continue;
        }
        if parse_number(cell).is_none() {
            return ColumnKind::Categorical;
        }
        seen_value = true;
    }

    if seen_value {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// Partition the dataset's columns into numeric and categorical names.
pub fn classify(data: &Dataset) -> ColumnClasses {
    let mut classes = ColumnClasses::default();
    for (idx, name) in data.headers.iter().enumerate() {
        match classify_column(data.column(idx)) {
            ColumnKind::Numeric => classes.numeric.push(name.clone()),
            ColumnKind::Categorical => classes.categorical.push(name.clone()),
        }
    }
    log::debug!(
        "classified {} numeric and {} categorical columns",
        classes.numeric.len(),
        classes.categorical.len()
    );
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> Dataset {
        Dataset::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_classify_mixed_columns_keep_order() {
        let data = make_dataset(
            vec!["region", "q1", "product", "q2"],
            vec![
                vec!["North", "10", "pen", "1.5"],
                vec!["South", "20", "ink", "-2"],
            ],
        );
        let classes = classify(&data);
        assert_eq!(classes.numeric, vec!["q1", "q2"]);
        assert_eq!(classes.categorical, vec!["region", "product"]);
    }

    #[test]
    fn test_missing_values_do_not_block_numeric() {
        assert_eq!(classify_column(["1", "", "NA", "3.5"]), ColumnKind::Numeric);
    }

    #[test]
    fn test_single_text_value_makes_column_categorical() {
        assert_eq!(classify_column(["1", "2", "three"]), ColumnKind::Categorical);
    }

    #[test]
    fn test_empty_and_all_missing_columns_are_categorical() {
        assert_eq!(classify_column(Vec::<&str>::new()), ColumnKind::Categorical);
        assert_eq!(classify_column(["", "NA"]), ColumnKind::Categorical);
    }

    #[test]
    fn test_empty_dataset() {
        let classes = classify(&Dataset::default());
        assert!(classes.numeric.is_empty());
        assert!(classes.categorical.is_empty());
    }

    #[test]
    fn test_headers_without_rows_are_categorical() {
        let data = make_dataset(vec!["a", "b"], vec![]);
        let classes = classify(&data);
        assert!(classes.numeric.is_empty());
        assert_eq!(classes.categorical, vec!["a", "b"]);
    }

    #[test]
    fn test_kind_of() {
        let classes = ColumnClasses {
            numeric: vec!["Value".to_string()],
            categorical: vec!["Name".to_string()],
        };
        assert_eq!(classes.kind_of("Value"), Some(ColumnKind::Numeric));
        assert_eq!(classes.kind_of("Name"), Some(ColumnKind::Categorical));
        assert_eq!(classes.kind_of("Other"), None);
    }
}
