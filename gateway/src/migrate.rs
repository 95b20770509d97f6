// gateway/src/migrate.rs

//! Idempotent schema setup for the Postgres backend.

use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
  r#"
  CREATE TABLE IF NOT EXISTS paygw_mpay24 (
    id BIGSERIAL PRIMARY KEY,
    transaction_id VARCHAR(64) NOT NULL UNIQUE,
    item_id BIGINT NOT NULL,
    user_id BIGINT NOT NULL,
    price NUMERIC(12, 2) NOT NULL,
    status INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL,
    modified_at TIMESTAMPTZ NOT NULL
  )
  "#,
  // At most one open order per cart line.
  r#"
  CREATE UNIQUE INDEX IF NOT EXISTS paygw_mpay24_open_order_idx
    ON paygw_mpay24 (item_id, user_id) WHERE status = 0
  "#,
  r#"
  CREATE TABLE IF NOT EXISTS paygw_mpay24_adhoc_tasks (
    id BIGSERIAL PRIMARY KEY,
    kind VARCHAR(255) NOT NULL,
    user_id BIGINT NOT NULL,
    payload JSONB NOT NULL,
    payload_key TEXT NOT NULL,
    next_run_time TIMESTAMPTZ NOT NULL,
    UNIQUE (kind, user_id, payload_key)
  )
  "#,
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
  for statement in SCHEMA {
    sqlx::query(statement).execute(pool).await?;
  }
  info!("Database schema is up to date.");
  Ok(())
}
