use crate::error::AggregateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw spreadsheet cell, before any numeric coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Int(n)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// One labelled column of a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    #[serde(default)]
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(label: impl Into<String>, values: Vec<Cell>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// A named table, stored column-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Builds a sheet from a header row plus data rows.
    ///
    /// Short rows are padded with empty cells; a row wider than the header
    /// cannot be attributed to any column and is rejected.
    pub fn from_rows(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self, AggregateError> {
        let name = name.into();
        let width = headers.len();
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|label| Column::new(label, Vec::with_capacity(rows.len())))
            .collect();

        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(AggregateError::InvalidInput(format!(
                    "sheet '{}': row {} has {} cells but only {} headers",
                    name,
                    idx + 1,
                    row.len(),
                    width
                )));
            }
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or(Cell::Empty));
            }
        }

        Ok(Self { name, columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.values.len()).max().unwrap_or(0)
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label == label)
    }
}

/// Ordered collection of sheets handed to the aggregator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// Wire form of a sheet: either column-major or header + rows
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetPayload {
    name: String,
    #[serde(default)]
    columns: Option<Vec<Column>>,
    #[serde(default)]
    headers: Option<Vec<String>>,
    #[serde(default)]
    rows: Option<Vec<Vec<Cell>>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorkbookPayload {
    sheets: Vec<SheetPayload>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn single(sheet: Sheet) -> Self {
        Self {
            sheets: vec![sheet],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Parses and validates a JSON workbook.
    ///
    /// Anything that does not describe a set of tables is `InvalidInput`;
    /// cell contents are never inspected here.
    pub fn from_json(value: serde_json::Value) -> Result<Self, AggregateError> {
        let payload: WorkbookPayload = serde_json::from_value(value)
            .map_err(|e| AggregateError::InvalidInput(e.to_string()))?;

        let mut sheets = Vec::with_capacity(payload.sheets.len());
        for sp in payload.sheets {
            let sheet = match (sp.columns, sp.headers, sp.rows) {
                (Some(columns), None, None) => Sheet::new(sp.name, columns),
                (None, Some(headers), rows) => {
                    Sheet::from_rows(sp.name, headers, rows.unwrap_or_default())?
                }
                (None, None, Some(_)) => {
                    return Err(AggregateError::InvalidInput(format!(
                        "sheet '{}': rows given without headers",
                        sp.name
                    )));
                }
                (None, None, None) => Sheet::new(sp.name, Vec::new()),
                (Some(_), _, _) => {
                    return Err(AggregateError::InvalidInput(format!(
                        "sheet '{}': use either columns or headers/rows, not both",
                        sp.name
                    )));
                }
            };
            sheets.push(sheet);
        }

        let workbook = Self { sheets };
        workbook.validate()?;
        Ok(workbook)
    }

    /// Structural checks shared by every entry point
    pub fn validate(&self) -> Result<(), AggregateError> {
        if self.is_empty() {
            return Err(AggregateError::InvalidInput(
                "workbook contains no sheets".to_string(),
            ));
        }
        Ok(())
    }
}
