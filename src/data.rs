use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::HashSet;

/// Cell texts treated as absent values.
const MISSING_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A", "-"];

/// Returns true when a cell carries no value.
pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// Parse a present cell as a number. Missing cells yield `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    cell.trim().parse::<f64>().ok()
}

/// An in-memory table: named columns over rows of text cells.
///
/// The dataset is never mutated after loading. Cells keep their original text;
/// the column classifier decides which columns are numeric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Create a Dataset from a JSON Array of Objects
    ///
    /// Columns follow the order in which keys first appear across all objects;
    /// a key absent from an object reads as a missing cell.
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let objects = array
            .iter()
            .map(|item| {
                item.as_object()
                    .ok_or_else(|| anyhow!("Items in array must be objects"))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let mut headers: Vec<String> = Vec::new();
        for key in objects.iter().flat_map(|obj| obj.keys()) {
            if seen.insert(key.as_str()) {
                headers.push(key.clone());
            }
        }

        let mut rows = Vec::with_capacity(objects.len());
        for obj in objects {
            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let val_str = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of one column in row order. Short rows read as missing.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }

    /// Cells of a named column, if present.
    pub fn column_by_name(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        self.column_index(name).map(|idx| self.column(idx))
    }

    /// Number of distinct present values in a column.
    pub fn distinct_count(&self, name: &str) -> usize {
        match self.column_by_name(name) {
            Some(cells) => cells
                .filter(|c| !is_missing(c))
                .map(str::trim)
                .collect::<HashSet<_>>()
                .len(),
            None => 0,
        }
    }

    /// The first `n` rows, for previews.
    pub fn head(&self, n: usize) -> Dataset {
        Dataset {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Render the first `n` rows as an aligned text table.
    pub fn preview(&self, n: usize) -> String {
        let head = self.head(n);
        let mut widths: Vec<usize> = head.headers.iter().map(|h| h.chars().count()).collect();
        for row in &head.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let format_line = |cells: &mut dyn Iterator<Item = &str>| {
            cells
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = format_line(&mut head.headers.iter().map(String::as_str));
        for row in &head.rows {
            out.push('\n');
            let mut cells = (0..widths.len()).map(|i| row.get(i).map(String::as_str).unwrap_or(""));
            out.push_str(&format_line(&mut cells));
        }
        out
    }
}
