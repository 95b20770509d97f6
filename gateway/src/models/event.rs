// gateway/src/models/event.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentEventKind {
  /// A new pending order row was written.
  OrderAdded {
    order_id: i64,
    transaction_id: String,
    user_id: i64,
  },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentEvent {
  pub event_id: Uuid,
  pub occurred_at: DateTime<Utc>,
  #[serde(flatten)]
  pub kind: PaymentEventKind,
}

impl PaymentEvent {
  pub fn new(kind: PaymentEventKind) -> Self {
    Self {
      event_id: Uuid::new_v4(),
      occurred_at: Utc::now(),
      kind,
    }
  }

  pub fn order_added(order_id: i64, transaction_id: impl Into<String>, user_id: i64) -> Self {
    Self::new(PaymentEventKind::OrderAdded {
      order_id,
      transaction_id: transaction_id.into(),
      user_id,
    })
  }

  pub fn name(&self) -> &'static str {
    match self.kind {
      PaymentEventKind::OrderAdded { .. } => "payment_order_added",
    }
  }
}
