use crate::error::AggregateError;
use crate::ingest::{self, FileFormat};
use crate::models::{AggregateResult, CategoryTable, Workbook};
use crate::service::{render_report, Aggregator};
use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response body
#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    pub success: bool,
    pub message: String,
    pub result: Option<AggregateResult>,
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    pub include_sheets: bool,
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub format: String,
    pub name: Option<String>,
}

fn status_for(e: &AggregateError) -> StatusCode {
    match e {
        AggregateError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AggregateError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AggregateError::Workbook(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(e: AggregateError) -> Response {
    let response = AggregateResponse {
        success: false,
        message: format!("Error: {}", e),
        result: None,
    };
    (status_for(&e), Json(response)).into_response()
}

fn success_response(result: AggregateResult) -> Response {
    let found = result.iter().filter(|t| t.has_data()).count();
    let response = AggregateResponse {
        success: true,
        message: format!(
            "Aggregated {} sheets, {} of {} categories matched",
            result.sheets_scanned,
            found,
            result.totals.len()
        ),
        result: Some(result),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Current category table and match mode
pub async fn list_categories(State(aggregator): State<Arc<Aggregator>>) -> Json<CategoryTable> {
    Json(aggregator.table().clone())
}

/// Aggregate a JSON workbook
pub async fn aggregate(
    State(aggregator): State<Arc<Aggregator>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    match Workbook::from_json(body).and_then(|wb| aggregator.aggregate(&wb)) {
        Ok(result) => success_response(result),
        Err(e) => error_response(e),
    }
}

/// Aggregate a JSON workbook and return the markdown report
pub async fn aggregate_report(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<ReportParams>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let workbook = match Workbook::from_json(body) {
        Ok(wb) => wb,
        Err(e) => return error_response(e),
    };
    match aggregator.aggregate(&workbook) {
        Ok(result) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            render_report(&workbook, &result, params.include_sheets),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// Aggregate a raw spreadsheet / CSV upload
pub async fn aggregate_upload(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Response {
    let result = FileFormat::from_extension(&params.format)
        .and_then(|format| ingest::load_bytes(body.to_vec(), format, params.name.as_deref()))
        .and_then(|wb| aggregator.aggregate(&wb));

    match result {
        Ok(result) => success_response(result),
        Err(e) => {
            tracing::warn!("Upload rejected: {}", e);
            error_response(e)
        }
    }
}
