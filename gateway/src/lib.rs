// gateway/src/lib.rs

//! mpay24 payment gateway: order reconciliation, tokenizer issuance and
//! status-check scheduling behind a small HTTP surface.

pub mod config;
pub mod errors;
pub mod migrate;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use crate::services::{
  EventBus, InMemoryOrderStore, InMemoryPaymentHelper, InMemoryTaskQueue, Mpay24Connector, OrderReconciler,
  PaymentHelper, PendingOrderStore, PgOrderStore, PgTaskQueue, TaskScheduler,
};
use crate::state::AppState;
use paygw_pipeline::PipelineRegistry;
use sqlx::PgPool;
use std::sync::Arc;

/// Wires stores, processor client and pipelines for `config`.
///
/// With a `DATABASE_URL` orders and tasks live in Postgres, otherwise in process
/// memory. The payment helper is seeded from `PAYGW_SEED_FILE` when set.
pub async fn build_app_state(config: AppConfig) -> AppResult<AppState> {
  let (store, scheduler): (Arc<dyn PendingOrderStore>, Arc<dyn TaskScheduler>) = match &config.database_url {
    Some(url) => {
      let pool = PgPool::connect(url).await?;
      tracing::info!("Successfully connected to the database.");
      migrate::ensure_schema(&pool).await?;
      (Arc::new(PgOrderStore::new(pool.clone())), Arc::new(PgTaskQueue::new(pool)))
    }
    None => {
      tracing::warn!("DATABASE_URL not set, pending orders and tasks are kept in memory.");
      (Arc::new(InMemoryOrderStore::new()), Arc::new(InMemoryTaskQueue::new()))
    }
  };

  let helper: Arc<dyn PaymentHelper> = match &config.seed_file {
    Some(path) => Arc::new(InMemoryPaymentHelper::from_seed_file(path)?),
    None => Arc::new(InMemoryPaymentHelper::new()),
  };

  let events = EventBus::default();
  let pipelines = Arc::new(PipelineRegistry::<AppError>::new());
  pipelines::register_all_pipelines(&pipelines);

  Ok(AppState {
    reconciler: OrderReconciler::new(store, events.clone()),
    scheduler,
    helper,
    processor: Arc::new(Mpay24Connector::new()?),
    events,
    pipelines,
    config: Arc::new(config),
  })
}
