use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod service;
mod utils;

use config::Config;
use db::JsonStore;
use service::LeaveService;

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        addr = %config.server_addr,
        data_file = %config.data_file.display(),
        policy = ?config.policy,
        "Server starting..."
    );

    let service = Data::new(LeaveService::new(
        JsonStore::new(&config.data_file),
        config.policy,
    ));

    // a broken data file only fails the calls that touch it, so just report it here
    match service.snapshot() {
        Ok(store) => info!(
            requests = store.requests.len(),
            blocked = store.blocked.len(),
            "leave data loaded"
        ),
        Err(e) => warn!(error = %e, "leave data not readable at startup"),
    }

    let limiter = Arc::new(routes::build_limiter(config.rate_per_min)?);
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .configure(|cfg| routes::configure(cfg, &api_prefix, limiter.clone()))
    })
    .bind(&config.server_addr)?
    .run()
    .await?;

    Ok(())
}
