// gateway/src/models/checkout.rs

use crate::models::gateway_settings::Environment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
  pub component: String,
  pub payment_area: String,
  pub item_id: i64,
}

/// Everything the client-side checkout widget needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfig {
  pub client_id: String,
  pub brand_name: String,
  pub cost: Decimal,
  pub currency: String,
  pub root_url: String,
  pub environment: Environment,
  pub language: String,
  pub token: String,
  pub tokenizer_location: String,
  pub transaction_id: String,
}
