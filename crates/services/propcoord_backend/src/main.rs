// File: services/propcoord_backend/src/main.rs
use propcoord_backend::{build_router, build_services, StartupError};
use propcoord_config::load_config;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    propcoord_common::logging::init();

    if let Err(err) = run().await {
        error!("startup failed: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = load_config()?;
    info!(
        "serving property '{}' (verify after write: {})",
        config.properties.active, config.booking.verify_after_write
    );

    let services = build_services(&config).await?;
    let app = build_router(&services);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", err);
        // Without a signal handler run until killed
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
