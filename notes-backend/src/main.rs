use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;

mod codec;
mod config;
mod controllers;
mod db;
mod error;
mod models;

use config::Config;
use db::Database;

pub struct AppState {
    pub db: Arc<Database>,
}

/// CORS policy for browser clients served from another origin.
/// No configured origins means any origin may call the API.
fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    log::info!("Opening database at {}", config.database_url);
    let db = Database::open(&config).map_err(|e| {
        log::error!("Failed to open database: {}", e);
        io::Error::other(e)
    })?;
    let db = Arc::new(db);

    let port = config.port;
    let bind_address = config.bind_address.clone();
    let cors_origins = config.cors_allowed_origins.clone();

    log::info!("Starting notes API on {}:{}", bind_address, port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
            }))
            .wrap(Logger::default())
            .wrap(build_cors(&cors_origins))
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
    })
    .bind((bind_address.as_str(), port))?
    .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn Ctrl+C handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop)
            .await
            .is_err()
        {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
