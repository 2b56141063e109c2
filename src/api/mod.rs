pub mod handlers;

pub use handlers::*;

use crate::service::Aggregator;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// Builds the HTTP router around a shared aggregator
pub fn router(aggregator: Arc<Aggregator>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/categories", get(list_categories))
        .route("/api/aggregate", post(aggregate))
        .route("/api/aggregate/report", post(aggregate_report))
        .route("/api/aggregate/upload", post(aggregate_upload))
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(max_upload_bytes)))
        .with_state(aggregator)
}
