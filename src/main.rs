use std::sync::Arc;
use gstr_reco::{api, AppConfig, Aggregator};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging, local timestamps
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // Load config
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config.server);

    // Category table drives column matching
    let table = config.aggregator.category_table()?;
    info!(
        "Category table: {} categories, {:?} matching",
        table.len(),
        table.mode()
    );
    let aggregator = Arc::new(Aggregator::new(table));

    // Build routes
    let app = api::router(aggregator, config.server.max_upload_bytes);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/categories       - category keyword table");
    info!("  POST /api/aggregate        - JSON workbook -> totals");
    info!("  POST /api/aggregate/report - JSON workbook -> markdown report");
    info!("  POST /api/aggregate/upload - xlsx/csv bytes -> totals");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
