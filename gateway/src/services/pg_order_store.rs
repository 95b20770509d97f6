// gateway/src/services/pg_order_store.rs

use crate::errors::Result as AppResult;
use crate::models::{NewPendingOrder, OrderStatus, PendingOrder};
use crate::services::order_store::{PendingOrderStore, ReconcileOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

const ORDER_COLUMNS: &str = "id, transaction_id, item_id, user_id, price, status, created_at, modified_at";

/// Pending orders in the `paygw_mpay24` table.
///
/// A partial unique index on `(item_id, user_id) WHERE status = 0` backs the
/// one-open-order rule; see `migrate::ensure_schema`.
#[derive(Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn lock_open(
    tx: &mut Transaction<'_, Postgres>,
    item_id: i64,
    user_id: i64,
  ) -> Result<Option<PendingOrder>, sqlx::Error> {
    sqlx::query_as::<_, PendingOrder>(&format!(
      "SELECT {ORDER_COLUMNS} FROM paygw_mpay24 \
       WHERE item_id = $1 AND user_id = $2 AND status = $3 \
       ORDER BY id LIMIT 1 FOR UPDATE"
    ))
    .bind(item_id)
    .bind(user_id)
    .bind(OrderStatus::Pending)
    .fetch_optional(&mut **tx)
    .await
  }

  async fn reprice(
    tx: &mut Transaction<'_, Postgres>,
    mut order: PendingOrder,
    price: Decimal,
    now: DateTime<Utc>,
  ) -> Result<ReconcileOutcome, sqlx::Error> {
    if order.price == price {
      return Ok(ReconcileOutcome::Reused {
        order,
        price_changed: false,
      });
    }
    sqlx::query("UPDATE paygw_mpay24 SET price = $1, modified_at = $2 WHERE id = $3")
      .bind(price)
      .bind(now)
      .bind(order.id)
      .execute(&mut **tx)
      .await?;
    order.price = price;
    order.modified_at = now;
    Ok(ReconcileOutcome::Reused {
      order,
      price_changed: true,
    })
  }
}

#[async_trait]
impl PendingOrderStore for PgOrderStore {
  async fn find_open(&self, item_id: i64, user_id: i64) -> AppResult<Option<PendingOrder>> {
    let row = sqlx::query_as::<_, PendingOrder>(&format!(
      "SELECT {ORDER_COLUMNS} FROM paygw_mpay24 WHERE item_id = $1 AND user_id = $2 AND status = $3 ORDER BY id LIMIT 1"
    ))
    .bind(item_id)
    .bind(user_id)
    .bind(OrderStatus::Pending)
    .fetch_optional(&self.pool)
    .await?;
    Ok(row)
  }

  #[instrument(name = "PgOrderStore::insert_or_reuse", skip_all, fields(item_id = candidate.item_id, user_id = candidate.user_id))]
  async fn insert_or_reuse(&self, candidate: NewPendingOrder) -> AppResult<ReconcileOutcome> {
    let mut tx = self.pool.begin().await?;

    if let Some(existing) = Self::lock_open(&mut tx, candidate.item_id, candidate.user_id).await? {
      let outcome = Self::reprice(&mut tx, existing, candidate.price, candidate.now).await?;
      tx.commit().await?;
      return Ok(outcome);
    }

    let inserted = sqlx::query_as::<_, PendingOrder>(&format!(
      "INSERT INTO paygw_mpay24 (transaction_id, item_id, user_id, price, status, created_at, modified_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $6) \
       ON CONFLICT (item_id, user_id) WHERE status = 0 DO NOTHING \
       RETURNING {ORDER_COLUMNS}"
    ))
    .bind(&candidate.transaction_id)
    .bind(candidate.item_id)
    .bind(candidate.user_id)
    .bind(candidate.price)
    .bind(OrderStatus::Pending)
    .bind(candidate.now)
    .fetch_optional(&mut *tx)
    .await?;

    let outcome = match inserted {
      Some(order) => ReconcileOutcome::Created(order),
      None => {
        // A concurrent checkout inserted first; its row is committed and visible now.
        debug!("Insert lost a race, reusing the concurrent order.");
        match Self::lock_open(&mut tx, candidate.item_id, candidate.user_id).await? {
          Some(existing) => Self::reprice(&mut tx, existing, candidate.price, candidate.now).await?,
          None => return Err(sqlx::Error::RowNotFound.into()),
        }
      }
    };
    tx.commit().await?;
    Ok(outcome)
  }
}
