use std::sync::Arc;

use streamscout::{
    api::{create_router, AppState},
    config::Config,
    reference::ReferenceData,
    services::SearchService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    streamscout::init_tracing("info");

    let config = Config::from_env()?;
    let reference = ReferenceData::load(&config.platforms_path, &config.countries_path)?;

    // Initialize application state
    let search = SearchService::from_config(&config, Arc::new(reference))?;
    let state = AppState::new(search);

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
