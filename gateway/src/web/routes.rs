// gateway/src/web/routes.rs

use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/mpay24")
          .route(
            "/checkout-config",
            web::post().to(crate::web::handlers::checkout_handlers::checkout_config_handler),
          )
          .route(
            "/settings/validate",
            web::post().to(crate::web::handlers::settings_handlers::validate_settings_handler),
          ),
      ),
  );
}
