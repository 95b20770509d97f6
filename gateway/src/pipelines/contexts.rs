// gateway/src/pipelines/contexts.rs

//! Data carried through pipeline runs. Handlers receive it wrapped in
//! `paygw_pipeline::ContextData`.

use crate::models::{CheckoutConfig, GatewaySettings, ItemRef};
use crate::services::{ScheduleOutcome, TokenizerHandle};
use crate::state::AppState;
use rust_decimal::Decimal;

/// State of one `checkout_config` run. Each step fills in its part; the last one
/// folds everything into `checkout_config`.
#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub user_id: i64,
  pub item: ItemRef,
  pub settings: Option<GatewaySettings>,
  pub cost: Option<Decimal>,
  pub currency: Option<String>,
  pub transaction_id: Option<String>,
  pub is_new_order: bool,
  pub tokenizer: Option<TokenizerHandle>,
  pub status_check: Option<ScheduleOutcome>,
  pub checkout_config: Option<CheckoutConfig>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, user_id: i64, item: ItemRef) -> Self {
    Self {
      app_state,
      user_id,
      item,
      settings: None,
      cost: None,
      currency: None,
      transaction_id: None,
      is_new_order: false,
      tokenizer: None,
      status_check: None,
      checkout_config: None,
    }
  }
}
