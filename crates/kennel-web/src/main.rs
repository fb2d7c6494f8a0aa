mod cli;
mod error;
mod routes;
mod telemetry;

use std::sync::Arc;

use clap::Parser;
use kennel_core::{BackgroundLoader, BreedCache, ReqwestHttpClient};
use tokio::net::TcpListener;
use tracing::info;

use crate::cli::Cli;
use crate::error::ServerError;
use crate::routes::AppState;

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

#[tokio::main]
async fn run() -> Result<(), ServerError> {
    let cli = Cli::parse();

    let _log_guards = telemetry::init(&cli.log_dir)?;

    let config = cli.loader_config()?;
    let cors = routes::cors_layer(&cli.cors_origin)?;
    let cache = Arc::new(BreedCache::new());
    let http = Arc::new(ReqwestHttpClient::new());

    let loader = BackgroundLoader::from_config(http, config.clone(), Arc::clone(&cache)).spawn();
    info!(upstream = %config.base_url, "background loading started, API is ready to serve requests");

    let app = routes::build_router(AppState::new(cache, config.items_per_page)).layer(cors);

    let listener = TcpListener::bind(cli.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: cli.bind,
            source,
        })?;
    info!(addr = %cli.bind, "kennel listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    loader.abort();
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
