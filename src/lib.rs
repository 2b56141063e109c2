pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::AggregateError;
pub use models::{AggregateResult, Category, CategoryTable, Workbook};
pub use service::{compute_aggregate, Aggregator};
