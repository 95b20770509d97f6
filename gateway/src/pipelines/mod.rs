// gateway/src/pipelines/mod.rs

//! Pipelines run by the gateway and their registration.

use crate::errors::AppError;
use paygw_pipeline::PipelineRegistry;

pub mod checkout_pipeline;
pub mod contexts;

/// Registers every gateway pipeline. Called once at startup.
pub fn register_all_pipelines(registry: &PipelineRegistry<AppError>) {
  checkout_pipeline::register_checkout_pipeline(registry);
  tracing::info!("All gateway pipelines registered.");
}
