//! File loading: extension detection, text decoding, CSV and spreadsheet parsing.

use crate::config::LoadOptions;
use crate::data::Dataset;
use crate::error::LoadError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use encoding_rs::Encoding;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Delimited(u8),
    Json,
    /// Excel or OpenDocument workbook; only the first sheet is read.
    Spreadsheet,
}

fn detect_format(file_name: &str) -> Result<SourceFormat, LoadError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "csv" => Ok(SourceFormat::Delimited(b',')),
        "tsv" => Ok(SourceFormat::Delimited(b'\t')),
        "json" => Ok(SourceFormat::Json),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Spreadsheet),
        _ => Err(LoadError::UnsupportedExtension { extension }),
    }
}

/// Load a dataset from a file on disk.
pub fn load_path(path: &Path, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    // Reject unknown extensions before touching the file.
    detect_format(file_name)?;
    let bytes = std::fs::read(path)?;
    load_bytes(file_name, &bytes, options)
}

/// Load a dataset from raw file contents; `file_name` selects the format.
pub fn load_bytes(file_name: &str, bytes: &[u8], options: &LoadOptions) -> Result<Dataset, LoadError> {
    let format = detect_format(file_name)?;

    let data = match format {
        SourceFormat::Delimited(delimiter) => {
            let text = decode_text(bytes, &options.encodings)?;
            parse_delimited(&text, delimiter)?
        }
        SourceFormat::Json => {
            let text = decode_text(bytes, &options.encodings)?;
            let value: serde_json::Value = serde_json::from_str(&text)?;
            Dataset::from_json(&value).map_err(|e| LoadError::Parse(e.to_string()))?
        }
        SourceFormat::Spreadsheet => parse_spreadsheet(bytes)?,
    };

    let data = normalize_headers(data);
    log::info!(
        "loaded '{}': {} rows x {} columns",
        file_name,
        data.row_count(),
        data.column_count()
    );
    Ok(data)
}

/// Decode with the first encoding that accepts the bytes without replacement.
pub fn decode_text<'a>(bytes: &'a [u8], labels: &[String]) -> Result<Cow<'a, str>, LoadError> {
    for label in labels {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| LoadError::UnknownEncoding(label.clone()))?;

        let input = if encoding == encoding_rs::UTF_8 {
            bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
        } else {
            bytes
        };

        match encoding.decode_without_bom_handling_and_without_replacement(input) {
            Some(text) => {
                log::debug!("decoded input as {}", encoding.name());
                return Ok(text);
            }
            None => log::warn!("input is not valid {}, trying next encoding", encoding.name()),
        }
    }

    Err(LoadError::Decode {
        tried: labels.to_vec(),
    })
}

fn parse_delimited(text: &str, delimiter: u8) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    if headers.is_empty() {
        return Err(LoadError::Parse("no header row found".to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Dataset::new(headers, rows))
}

/// Read the first sheet of a workbook; its first row holds the headers.
fn parse_spreadsheet(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Parse("workbook has no sheets".to_string()))??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let Some(headers) = rows.next() else {
        return Ok(Dataset::default());
    };
    Ok(Dataset::new(headers, rows.collect()))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Trim header whitespace and make duplicate names unique with `.N` suffixes.
fn normalize_headers(mut data: Dataset) -> Dataset {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut taken: Vec<String> = Vec::with_capacity(data.headers.len());

    for header in &data.headers {
        let base = header.trim().to_string();
        let count = seen.entry(base.clone()).or_insert(0);
        let mut name = if *count == 0 {
            base.clone()
        } else {
            format!("{}.{}", base, count)
        };
        while taken.contains(&name) {
            *count += 1;
            name = format!("{}.{}", base, count);
        }
        *count += 1;
        taken.push(name);
    }

    data.headers = taken;
    data
}
