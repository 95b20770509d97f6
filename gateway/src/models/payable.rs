// gateway/src/models/payable.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What the calling component wants to charge for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payable {
  pub amount: Decimal,
  pub currency: String,
  pub account_id: i64,
}

/// Identifies a purchasable item within a calling component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
  pub component: String,
  pub payment_area: String,
  pub item_id: i64,
}

impl ItemRef {
  pub fn new(component: impl Into<String>, payment_area: impl Into<String>, item_id: i64) -> Self {
    Self {
      component: component.into(),
      payment_area: payment_area.into(),
      item_id,
    }
  }
}
