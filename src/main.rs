use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

use hrm_attendance::backend::BackendClient;
use hrm_attendance::config::Config;
use hrm_attendance::docs;
use hrm_attendance::routes;
use hrm_attendance::state::AppState;
use tracing::info;
use tracing_appender::rolling;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
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

    info!("Server starting...");

    let client = BackendClient::new(
        &config.backend_url,
        &config.records_path,
        config.backend_timeout,
    )?;
    info!(
        records_url = client.records_url(),
        timezone = %config.org_timezone,
        "Attendance backend configured"
    );

    let state = AppState::new(Arc::new(client), config.org_timezone);
    let limiter = routes::build_limiter(config.rate_view_per_min)?;
    let api_prefix = config.api_prefix.clone();
    let openapi = docs::openapi_for_prefix(&api_prefix);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", openapi.clone()),
            )
            .app_data(Data::new(state.clone()))
            .configure(|cfg| routes::configure(cfg, &api_prefix, limiter.clone()))
    })
    .bind(&config.server_addr)
    .with_context(|| format!("Failed to bind {}", config.server_addr))?
    .run()
    .await
    .context("Server stopped with an error")
}
