use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use loginregister_server::{AppState, PgStore, Settings};
use std::net::TcpListener;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    // Load configuration
    let config = Settings::new().context("failed to load configuration")?;
    info!("Configuration loaded successfully ({} environment)", config.environment);

    let store = Arc::new(
        PgStore::connect(&config.database)
            .await
            .context("failed to connect to the database")?,
    );
    store.migrate().await.context("failed to run migrations")?;

    let state = AppState::new(config.clone(), store.clone(), store.clone())?;
    let state = web::Data::new(state);

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;
    info!("Starting server at {}:{}", config.server.host, config.server.port);

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(loginregister_server::cors(&cors_config))
            .app_data(state.clone())
            .configure(loginregister_server::configure)
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await?;

    store.close().await;
    info!("Server stopped");

    Ok(())
}
