// gateway/src/services/order_store.rs

//! Persistence of pending orders.
//!
//! The lookup and the insert-or-update that follows it form one atomic unit inside
//! each store, so two concurrent checkouts for the same item and user cannot both
//! create a row.

use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewPendingOrder, OrderStatus, PendingOrder};
use async_trait::async_trait;
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
  /// No open order existed; the candidate was stored.
  Created(PendingOrder),
  /// An open order existed and was kept. Its price was rewritten if it differed.
  Reused { order: PendingOrder, price_changed: bool },
}

#[async_trait]
pub trait PendingOrderStore: Send + Sync {
  /// The open order for `(item_id, user_id)`, if any.
  async fn find_open(&self, item_id: i64, user_id: i64) -> AppResult<Option<PendingOrder>>;

  /// Reuses the open order for the candidate's `(item_id, user_id)` or stores the
  /// candidate. The candidate's transaction id is never used for the lookup.
  async fn insert_or_reuse(&self, candidate: NewPendingOrder) -> AppResult<ReconcileOutcome>;
}

/// Process-local store used by tests and database-less runs.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
  inner: Mutex<InMemoryOrders>,
}

#[derive(Debug, Default)]
struct InMemoryOrders {
  rows: Vec<PendingOrder>,
  next_id: i64,
}

impl InMemoryOrderStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.inner.lock().rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn all(&self) -> Vec<PendingOrder> {
    self.inner.lock().rows.clone()
  }

  /// Moves an order out of the pending state, as the completion handler would.
  pub fn set_status(&self, transaction_id: &str, status: OrderStatus) -> AppResult<()> {
    let mut inner = self.inner.lock();
    let row = inner
      .rows
      .iter_mut()
      .find(|r| r.transaction_id == transaction_id)
      .ok_or_else(|| AppError::NotFound(format!("pending order {}", transaction_id)))?;
    row.status = status;
    Ok(())
  }
}

#[async_trait]
impl PendingOrderStore for InMemoryOrderStore {
  async fn find_open(&self, item_id: i64, user_id: i64) -> AppResult<Option<PendingOrder>> {
    let inner = self.inner.lock();
    Ok(
      inner
        .rows
        .iter()
        .find(|r| r.item_id == item_id && r.user_id == user_id && r.is_pending())
        .cloned(),
    )
  }

  async fn insert_or_reuse(&self, candidate: NewPendingOrder) -> AppResult<ReconcileOutcome> {
    let mut inner = self.inner.lock();

    if let Some(existing) = inner
      .rows
      .iter_mut()
      .find(|r| r.item_id == candidate.item_id && r.user_id == candidate.user_id && r.is_pending())
    {
      let price_changed = existing.price != candidate.price;
      if price_changed {
        existing.price = candidate.price;
        existing.modified_at = candidate.now;
      }
      return Ok(ReconcileOutcome::Reused {
        order: existing.clone(),
        price_changed,
      });
    }

    inner.next_id += 1;
    let order = PendingOrder {
      id: inner.next_id,
      transaction_id: candidate.transaction_id,
      item_id: candidate.item_id,
      user_id: candidate.user_id,
      price: candidate.price,
      status: OrderStatus::Pending,
      created_at: candidate.now,
      modified_at: candidate.now,
    };
    inner.rows.push(order.clone());
    Ok(ReconcileOutcome::Created(order))
  }
}
