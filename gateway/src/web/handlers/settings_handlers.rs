// gateway/src/web/handlers/settings_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::{GatewaySettings, RawGatewaySettings};

/// Checks an administrator's settings form before the gateway is enabled.
#[instrument(name = "handler::validate_settings", skip_all)]
pub async fn validate_settings_handler(form: web::Json<RawGatewaySettings>) -> Result<HttpResponse, AppError> {
  let settings = GatewaySettings::validate(&form).map_err(AppError::InvalidSettings)?;
  info!(client_id = %settings.client_id, environment = %settings.environment, "Gateway settings accepted.");
  Ok(HttpResponse::Ok().json(json!({
    "valid": true,
    "brandname": settings.brand_name,
    "clientid": settings.client_id,
    "environment": settings.environment,
  })))
}
