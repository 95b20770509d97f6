// gateway/src/services/order_reconciler.rs

use crate::errors::{AppError, Result as AppResult};
use crate::models::{normalize_price, NewPendingOrder, PaymentEvent, PendingOrder};
use crate::services::event_bus::EventBus;
use crate::services::order_store::{PendingOrderStore, ReconcileOutcome};
use crate::services::transaction_id::generate_transaction_id;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};

/// Result of [`OrderReconciler::reconcile_order`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
  pub transaction_id: String,
  pub is_new: bool,
  pub order: PendingOrder,
}

/// Creates or reuses the pending order for a cart line.
///
/// At most one open order exists per `(item_id, user_id)`. A repeat checkout keeps
/// the original transaction id so the processor never sees two orders for the
/// same line; only the price follows the current amount.
#[derive(Clone)]
pub struct OrderReconciler {
  store: Arc<dyn PendingOrderStore>,
  events: EventBus,
}

impl OrderReconciler {
  pub fn new(store: Arc<dyn PendingOrderStore>, events: EventBus) -> Self {
    Self { store, events }
  }

  pub async fn reconcile_order(&self, item_id: i64, user_id: i64, amount: Decimal) -> AppResult<Reconciled> {
    self.reconcile_order_at(item_id, user_id, amount, Utc::now()).await
  }

  #[instrument(name = "OrderReconciler::reconcile_order", skip(self, amount, now), fields(%amount))]
  pub async fn reconcile_order_at(
    &self,
    item_id: i64,
    user_id: i64,
    amount: Decimal,
    now: DateTime<Utc>,
  ) -> AppResult<Reconciled> {
    if item_id <= 0 {
      return Err(AppError::Validation(format!("item id must be positive, got {}", item_id)));
    }
    if user_id <= 0 {
      return Err(AppError::Validation(format!("user id must be positive, got {}", user_id)));
    }
    if amount < Decimal::ZERO {
      return Err(AppError::Validation(format!("amount must not be negative, got {}", amount)));
    }

    let candidate = NewPendingOrder {
      transaction_id: generate_transaction_id(now),
      item_id,
      user_id,
      price: normalize_price(amount),
      now,
    };

    match self.store.insert_or_reuse(candidate).await? {
      ReconcileOutcome::Created(order) => {
        info!(order_id = order.id, transaction_id = %order.transaction_id, "Pending order created.");
        self
          .events
          .publish(PaymentEvent::order_added(order.id, order.transaction_id.clone(), user_id));
        Ok(Reconciled {
          transaction_id: order.transaction_id.clone(),
          is_new: true,
          order,
        })
      }
      ReconcileOutcome::Reused { order, price_changed } => {
        info!(order_id = order.id, transaction_id = %order.transaction_id, price_changed, "Pending order reused.");
        Ok(Reconciled {
          transaction_id: order.transaction_id.clone(),
          is_new: false,
          order,
        })
      }
    }
  }
}
