// backoffice_server/src/main.rs

mod config;
mod errors;
mod state;
mod views;
mod web;

use crate::config::{startup_log_format, AppConfig, LogFormat};
use crate::state::{AppState, Services};

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // A config that fails to load still gets logged, in the default format.
  let loaded = AppConfig::from_env();
  init_tracing(startup_log_format(&loaded));

  tracing::info!("Starting backoffice server...");

  let app_config = match loaded {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(e).context("loading configuration");
    }
  };
  tracing::info!(
    log_format = ?app_config.log_format,
    cache_capacity = app_config.cache.capacity,
    cache_ttl_secs = app_config.cache.ttl.as_secs(),
    "Application configuration loaded."
  );

  let db_pool = app_config
    .pool
    .connect(&app_config.database_url)
    .await
    .context("connecting to the database")?;

  let app_state = AppState::new(app_config.clone());
  let services = Services::postgres(db_pool, app_state.cache.clone()).context("building record services")?;
  tracing::info!("Record services ready.");

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    let services = services.clone();
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .configure(move |cfg| services.register(cfg))
      .configure(web::configure_app_routes)
      .wrap(tracing_actix_web::TracingLogger::default())
  })
  .bind(&server_address)
  .with_context(|| format!("binding {}", server_address))?
  .run()
  .await
  .context("running the HTTP server")
}
