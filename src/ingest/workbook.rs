use crate::error::AggregateError;
use crate::models::{Cell, Sheet, Workbook};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Upload formats the ingestion layer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Xlsx,
    Xlsm,
    Xlsb,
    Xls,
    Ods,
    Csv,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Result<Self, AggregateError> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "xlsm" => Ok(Self::Xlsm),
            "xlsb" => Ok(Self::Xlsb),
            "xls" => Ok(Self::Xls),
            "ods" => Ok(Self::Ods),
            "csv" => Ok(Self::Csv),
            other => Err(AggregateError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, AggregateError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| AggregateError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }
}

/// Loads every sheet of a spreadsheet file, or a CSV as a single sheet.
pub fn load_path(path: &Path) -> Result<Workbook, AggregateError> {
    let format = FileFormat::from_path(path)?;
    tracing::info!("Loading {:?} workbook from {}", format, path.display());

    match format {
        FileFormat::Csv => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Sheet1");
            let file = std::fs::File::open(path)?;
            read_csv(file, name)
        }
        _ => read_sheets(open_workbook_auto(path)?),
    }
}

/// Same as [`load_path`] for an in-memory upload.
///
/// `name` is only used for CSV input, where it becomes the sheet name.
pub fn load_bytes(
    bytes: Vec<u8>,
    format: FileFormat,
    name: Option<&str>,
) -> Result<Workbook, AggregateError> {
    tracing::info!("Loading {:?} workbook from {} bytes", format, bytes.len());

    match format {
        FileFormat::Csv => read_csv(Cursor::new(bytes), name.unwrap_or("Sheet1")),
        _ => read_sheets(open_workbook_auto_from_rs(Cursor::new(bytes))?),
    }
}

fn header_label(idx: usize, cell: &Data) -> String {
    let label = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    };
    if label.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        label
    }
}

fn to_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Int(*n),
        Data::Bool(b) => Cell::Bool(*b),
        // Dates, durations and error values stay textual
        other => Cell::Text(other.to_string()),
    }
}

fn read_sheets<RS: Read + Seek>(mut sheets: Sheets<RS>) -> Result<Workbook, AggregateError> {
    let mut out = Vec::new();

    for name in sheets.sheet_names() {
        let range = sheets.worksheet_range(&name)?;
        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(header) => header
                .iter()
                .enumerate()
                .map(|(idx, c)| header_label(idx, c))
                .collect(),
            None => Vec::new(),
        };
        let data: Vec<Vec<Cell>> = rows
            .map(|r| r.iter().take(headers.len()).map(to_cell).collect())
            .collect();

        tracing::debug!("Sheet '{}': {} columns, {} rows", name, headers.len(), data.len());
        out.push(Sheet::from_rows(name, headers, data)?);
    }

    Ok(Workbook::new(out))
}

/// Plain numeric fields become numbers so their sign survives; anything
/// else (currency symbols, separators) stays text for the cleanup pass.
fn csv_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Cell::Int(n);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Cell::Number(n),
        _ => Cell::Text(field.to_string()),
    }
}

fn read_csv<R: Read>(reader: R, name: &str) -> Result<Workbook, AggregateError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let h = h.trim();
            if h.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(csv_cell).collect());
    }

    tracing::debug!("CSV '{}': {} columns, {} rows", name, headers.len(), rows.len());
    Ok(Workbook::single(Sheet::from_rows(name, headers, rows)?))
}
