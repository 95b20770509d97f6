// gateway/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::{EventBus, OrderReconciler, PaymentHelper, ProcessorConnector, TaskScheduler};
use paygw_pipeline::PipelineRegistry;
use std::sync::Arc;

/// Shared by every request handler and every checkout run.
#[derive(Clone)]
pub struct AppState {
  pub reconciler: OrderReconciler,
  pub scheduler: Arc<dyn TaskScheduler>,
  pub helper: Arc<dyn PaymentHelper>,
  pub processor: Arc<dyn ProcessorConnector>,
  pub events: EventBus,
  pub pipelines: Arc<PipelineRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}
