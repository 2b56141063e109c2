use crate::error::AggregateError;
use crate::models::{AggregateResult, Sheet, Workbook};
use chrono::Local;
use std::fmt::Write;

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Category totals as a markdown table, ready to embed in a report or prompt.
pub fn render_totals_markdown(result: &AggregateResult) -> String {
    let mut out = String::new();
    out.push_str("| Component | Excel Value (₹) | Columns Matched | Cells Zeroed |\n");
    out.push_str("| :--- | ---: | ---: | ---: |\n");
    for t in result.iter() {
        let value = if t.has_data() {
            t.total.to_string()
        } else {
            format!("{} (no matching column)", t.total)
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            escape_md(&t.category),
            value,
            t.matched_columns.len(),
            t.cells_zeroed
        );
    }
    out
}

fn render_sheet(out: &mut String, sheet: &Sheet) {
    let _ = writeln!(out, "\n--- Sheet: {} ---", sheet.name);
    if sheet.columns.is_empty() {
        out.push_str("(empty sheet)\n");
        return;
    }

    out.push_str("| |");
    for c in &sheet.columns {
        let _ = write!(out, " {} |", escape_md(&c.label));
    }
    out.push_str("\n|---:|");
    for _ in &sheet.columns {
        out.push_str(":---|");
    }
    out.push('\n');

    for row in 0..sheet.row_count() {
        let _ = write!(out, "| {} |", row);
        for c in &sheet.columns {
            let cell = c.values.get(row).map(|v| v.to_string()).unwrap_or_default();
            let _ = write!(out, " {} |", escape_md(&cell));
        }
        out.push('\n');
    }
}

/// Every sheet as a markdown table headed by `--- Sheet: <name> ---`.
pub fn render_sheets_markdown(workbook: &Workbook) -> String {
    let mut out = String::new();
    for sheet in &workbook.sheets {
        render_sheet(&mut out, sheet);
    }
    out
}

/// Totals as CSV, one row per category
pub fn totals_to_csv(result: &AggregateResult) -> Result<String, AggregateError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "category",
        "total",
        "matched_columns",
        "cells_summed",
        "cells_blank",
        "cells_zeroed",
    ])?;
    for t in result.iter() {
        wtr.write_record([
            t.category.clone(),
            t.total.to_string(),
            t.matched_columns.len().to_string(),
            t.cells_summed.to_string(),
            t.cells_blank.to_string(),
            t.cells_zeroed.to_string(),
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AggregateError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AggregateError::Io(e.to_string()))
}

/// Full markdown report: header, totals block and optionally the raw sheets.
pub fn render_report(workbook: &Workbook, result: &AggregateResult, include_sheets: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# GSTR-1 Excel Totals\n\nGenerated {} from {} sheet(s).\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        result.sheets_scanned
    );
    out.push_str(&render_totals_markdown(result));

    let missing = result.missing_categories();
    if !missing.is_empty() {
        let _ = writeln!(out, "\nNo matching column for: {}", missing.join(", "));
    }

    if include_sheets {
        out.push_str("\n## Excel Data\n");
        out.push_str(&render_sheets_markdown(workbook));
    }
    out
}
