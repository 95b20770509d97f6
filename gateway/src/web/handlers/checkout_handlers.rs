// gateway/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use paygw_pipeline::{ContextData, PipelineResult};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{CheckoutRequest, ItemRef};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

/// Returns the configuration the mpay24 checkout widget is initialised with.
///
/// Calling this again for the same item and user keeps the transaction id of the
/// open order; only the price and the tokenizer are fresh.
#[instrument(
  name = "handler::checkout_config",
  skip(app_state, req_payload, auth_user),
  fields(
    user_id = auth_user.user_id,
    component = %req_payload.component,
    payment_area = %req_payload.payment_area,
    item_id = req_payload.item_id,
  )
)]
pub async fn checkout_config_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequest>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let request = req_payload.into_inner();
  if request.component.trim().is_empty() || request.payment_area.trim().is_empty() {
    return Err(AppError::Validation("component and paymentArea are required".to_string()));
  }
  let item = ItemRef::new(request.component, request.payment_area, request.item_id);

  let ctx_data = ContextData::new(CheckoutCtxData::new(app_state.get_ref().clone(), auth_user.user_id, item));

  match app_state.pipelines.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let (config, is_new_order) = ctx_data.with(|c| (c.checkout_config.clone(), c.is_new_order));
      let config = config.ok_or_else(|| {
        warn!("Checkout pipeline completed without a configuration.");
        AppError::Internal("checkout configuration is unavailable".to_string())
      })?;
      info!(transaction_id = %config.transaction_id, is_new_order, "Checkout configuration issued.");
      Ok(HttpResponse::Ok().json(config))
    }
    PipelineResult::Stopped => {
      warn!("Checkout pipeline was stopped by a handler.");
      Err(AppError::Internal("checkout was halted".to_string()))
    }
  }
}
