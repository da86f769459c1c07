use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::layout::{is_na_marker, ExportLayout};
use super::model::{CellValue, Column, MeasurementTable, SampleIdentity, Table};
use crate::error::{PamError, Result};

// ---------------------------------------------------------------------------
// Sample identity (first line)
// ---------------------------------------------------------------------------

/// Read the sample labels from the first line of an export.
///
/// Only the first line is read. Labels are trimmed and empty labels dropped;
/// a line without any label is an [`PamError::EmptyIdentity`].
pub fn read_identity(path: &Path, separator: char) -> Result<SampleIdentity> {
    let file = File::open(path).map_err(|e| PamError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut raw = Vec::new();
    reader
        .read_until(b'\n', &mut raw)
        .map_err(|e| PamError::io(path, e))?;

    let line = String::from_utf8_lossy(&raw);
    let labels = parse_identity_line(&line, separator);
    if labels.is_empty() {
        return Err(PamError::EmptyIdentity(path.to_path_buf()));
    }
    Ok(SampleIdentity::new(labels))
}

fn parse_identity_line(line: &str, separator: char) -> Vec<String> {
    line.trim_start_matches('\u{feff}')
        .trim_end_matches(['\n', '\r'])
        .split(separator)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Measurement table (header + data lines)
// ---------------------------------------------------------------------------

/// Load and clean the measurement rows of an export.
///
/// Header, metadata and footer positions come from `layout`. Every column
/// with a missing cell anywhere is dropped, so the result holds no gaps.
pub fn load_measurements(path: &Path, layout: &ExportLayout) -> Result<MeasurementTable> {
    let bytes = std::fs::read(path).map_err(|e| PamError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    let mut table = parse_measurements(&text, layout).map_err(|reason| match reason {
        ParseFailure::Layout(reason) => PamError::Layout {
            path: path.to_path_buf(),
            reason,
        },
        ParseFailure::Csv(e) => PamError::Csv(e),
    })?;

    let dropped = table.drop_incomplete_columns();
    if !dropped.is_empty() {
        log::debug!(
            "{}: dropped incomplete columns {:?}",
            path.display(),
            dropped
        );
    }
    Ok(table)
}

enum ParseFailure {
    Layout(String),
    Csv(csv::Error),
}

impl From<csv::Error> for ParseFailure {
    fn from(e: csv::Error) -> Self {
        ParseFailure::Csv(e)
    }
}

fn parse_measurements(text: &str, layout: &ExportLayout) -> std::result::Result<Table, ParseFailure> {
    let delimiter = layout.delimiter_byte().ok_or_else(|| {
        ParseFailure::Layout(format!("delimiter {:?} is not a single ASCII byte", layout.delimiter))
    })?;

    let lines: Vec<&str> = text.lines().collect();
    let total = lines.len();
    let header = lines.get(layout.header_line).ok_or_else(|| {
        ParseFailure::Layout(format!(
            "file has {total} lines, expected a header on line {}",
            layout.header_line + 1
        ))
    })?;

    let names = dedupe_names(split_record(header, delimiter)?);

    let data: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| layout.is_data_line(*i, total) && !line.trim().is_empty())
        .map(|(_, line)| *line)
        .collect();

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::with_capacity(data.len()); names.len()];
    let block = data.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(block.as_bytes());

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > names.len() {
            log::trace!(
                "data row {row_no}: {} fields beyond the header ignored",
                record.len() - names.len()
            );
        }
        for (col_idx, values) in columns.iter_mut().enumerate() {
            values.push(parse_cell(record.get(col_idx).unwrap_or("")));
        }
    }

    Ok(Table::from_columns(
        names
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    ))
}

fn split_record(line: &str, delimiter: u8) -> std::result::Result<Vec<String>, ParseFailure> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(|f| f.trim().to_string()).collect()),
        None => Err(ParseFailure::Layout("header line is empty".to_string())),
    }
}

/// Blank names become `Unnamed: <i>`; repeated names get `.1`, `.2`, ...
fn dedupe_names(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(i, name)| {
            let base = if name.is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let unique = if *count == 0 {
                base.clone()
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

fn parse_cell(raw: &str) -> CellValue {
    if is_na_marker(raw) {
        return CellValue::Missing;
    }
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) => CellValue::Number(v),
        Err(_) => CellValue::Text(trimmed.to_string()),
    }
}
