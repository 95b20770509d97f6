// gateway/src/models/pending_order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};

/// Stored as a plain integer; this gateway only ever writes `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[repr(i32)]
pub enum OrderStatus {
  Pending = 0,
  Paid = 1,
  Failed = 2,
}

/// Local record bridging a cart item to a processor transaction.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PendingOrder {
  pub id: i64,
  pub transaction_id: String,
  pub item_id: i64,
  pub user_id: i64,
  pub price: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub modified_at: DateTime<Utc>,
}

impl PendingOrder {
  pub fn is_pending(&self) -> bool {
    self.status == OrderStatus::Pending
  }
}

/// Insert candidate handed to the order store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPendingOrder {
  pub transaction_id: String,
  pub item_id: i64,
  pub user_id: i64,
  pub price: Decimal,
  pub now: DateTime<Utc>,
}

/// Stored prices carry exactly two fractional digits.
pub fn normalize_price(amount: Decimal) -> Decimal {
  let mut price = amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
  price.rescale(2);
  price
}
