use actix_web::{App, HttpServer, web};
use log::{error, info};

use edge_kv::api;
use edge_kv::app_state::AppState;
use edge_kv::config::{AppConfig, Backend, Credentials};
use edge_kv::logging;

fn invalid_input(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let log_handle = logging::init().map_err(std::io::Error::other)?;
    let config = AppConfig::load().map_err(|e| {
        error!("Cannot load configuration: {}", e);
        invalid_input(e)
    })?;
    logging::apply_file_config(&log_handle, &config.logging.config_file);

    let credentials = match config.backend {
        Backend::Aws => Some(Credentials::from_env().map_err(|e| {
            error!("Cannot start without credentials: {}", e);
            invalid_input(e)
        })?),
        Backend::Mock => None,
    };
    let app_state = AppState::from_config(config.clone(), credentials.as_ref()).map_err(|e| {
        error!("Invalid configuration: {}", e);
        invalid_input(e)
    })?;

    let server = config.server;
    info!("Starting server on {}:{}", server.host, server.port);
    let max_payload_size = server.max_payload_size;
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(data.clone())
            .configure(api::configure)
    })
    .workers(server.workers)
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
