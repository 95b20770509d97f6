// gateway/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use paygw_mpay24::config::AppConfig;
use paygw_mpay24::services::event_bus::log_events;
use paygw_mpay24::{build_app_state, web};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting mpay24 gateway server...");

  let app_config = AppConfig::from_env().map_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);

  let app_state = build_app_state(app_config).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to initialise the gateway.");
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
  })?;

  tokio::spawn(log_events(app_state.events.subscribe()));

  tracing::info!("Attempting to bind server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
