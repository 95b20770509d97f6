// gateway/src/pipelines/checkout_pipeline.rs

//! The `checkout_config` pipeline: everything between "the user clicked pay" and
//! the configuration object the browser widget is started with.

use crate::errors::{AppError, Result as AppResult};
use crate::models::CheckoutConfig;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::services::payment_helper::{is_supported_currency, rounded_cost, GATEWAY_NAME};
use crate::services::{processor, task_scheduler};
use chrono::Utc;
use paygw_pipeline::{ContextData, Pipeline, PipelineControl, PipelineRegistry, SkipCondition};
use std::time::Duration;
use tracing::{info, instrument, warn};

pub const CHECKOUT_STEPS: &[&str] = &[
  "load_gateway_configuration",
  "compute_cost",
  "reconcile_pending_order",
  "issue_client_token",
  "schedule_status_check",
  "assemble_checkout_config",
];

pub fn build_checkout_pipeline() -> Pipeline<CheckoutCtxData, AppError> {
  let step_defs: Vec<(&str, bool, Option<SkipCondition<CheckoutCtxData>>)> =
    CHECKOUT_STEPS.iter().map(|name| (*name, false, None)).collect();
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&step_defs);

  p.on_root("load_gateway_configuration", load_gateway_configuration);
  p.on_root("compute_cost", compute_cost);
  p.on_root("reconcile_pending_order", reconcile_pending_order);
  p.on_root("issue_client_token", issue_client_token);
  p.on_root("schedule_status_check", schedule_status_check);
  p.on_root("assemble_checkout_config", assemble_checkout_config);
  p
}

pub fn register_checkout_pipeline(registry: &PipelineRegistry<AppError>) {
  registry.register_pipeline(build_checkout_pipeline());
}

fn required<T: Clone>(value: &Option<T>, what: &str) -> AppResult<T> {
  value
    .clone()
    .ok_or_else(|| AppError::Internal(format!("checkout step ran before {} was set", what)))
}

#[instrument(name = "checkout::load_gateway_configuration", skip_all, err(Display))]
async fn load_gateway_configuration(ctx: ContextData<CheckoutCtxData>) -> AppResult<PipelineControl> {
  let (helper, item) = ctx.with(|c| (c.app_state.helper.clone(), c.item.clone()));

  let settings = helper.gateway_configuration(&item, GATEWAY_NAME).await?;
  if !settings.is_complete() {
    warn!(client_id = %settings.client_id, "Gateway settings are incomplete.");
    return Err(AppError::Config(format!(
      "{} settings for {}/{} are incomplete",
      GATEWAY_NAME, item.component, item.payment_area
    )));
  }
  info!(client_id = %settings.client_id, environment = %settings.environment, "Gateway configuration loaded.");
  ctx.write().settings = Some(settings);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::compute_cost", skip_all, err(Display))]
async fn compute_cost(ctx: ContextData<CheckoutCtxData>) -> AppResult<PipelineControl> {
  let (helper, item) = ctx.with(|c| (c.app_state.helper.clone(), c.item.clone()));

  let payable = helper.payable(&item).await?;
  if !is_supported_currency(&payable.currency) {
    return Err(AppError::Validation(format!(
      "currency {} is not supported by {}",
      payable.currency, GATEWAY_NAME
    )));
  }
  let surcharge = helper.surcharge(GATEWAY_NAME).await?;
  let cost = rounded_cost(payable.amount, &payable.currency, surcharge);
  info!(amount = %payable.amount, %surcharge, %cost, currency = %payable.currency, "Cost computed.");

  ctx.update(|c| {
    c.cost = Some(cost);
    c.currency = Some(payable.currency);
  });
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::reconcile_pending_order", skip_all, err(Display))]
async fn reconcile_pending_order(ctx: ContextData<CheckoutCtxData>) -> AppResult<PipelineControl> {
  let (reconciler, item_id, user_id, cost) = {
    let guard = ctx.read();
    (
      guard.app_state.reconciler.clone(),
      guard.item.item_id,
      guard.user_id,
      required(&guard.cost, "the cost")?,
    )
  };

  let reconciled = reconciler.reconcile_order(item_id, user_id, cost).await?;
  ctx.update(|c| {
    c.transaction_id = Some(reconciled.transaction_id);
    c.is_new_order = reconciled.is_new;
  });
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::issue_client_token", skip_all, err(Display))]
async fn issue_client_token(ctx: ContextData<CheckoutCtxData>) -> AppResult<PipelineControl> {
  let (connector, settings, timeout_secs) = {
    let guard = ctx.read();
    (
      guard.app_state.processor.clone(),
      required(&guard.settings, "the gateway configuration")?,
      guard.app_state.config.processor_timeout_secs,
    )
  };

  let handle = processor::issue_client_token(connector.as_ref(), &settings, Duration::from_secs(timeout_secs)).await?;
  ctx.write().tokenizer = Some(handle);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::schedule_status_check", skip_all, err(Display))]
async fn schedule_status_check(ctx: ContextData<CheckoutCtxData>) -> AppResult<PipelineControl> {
  let (scheduler, expiration, user_id, item, transaction_id) = {
    let guard = ctx.read();
    (
      guard.app_state.scheduler.clone(),
      guard.app_state.config.cache_expiration_minutes,
      guard.user_id,
      guard.item.clone(),
      required(&guard.transaction_id, "the transaction id")?,
    )
  };

  let run_at = task_scheduler::status_check_run_time(Utc::now(), expiration);
  let outcome =
    task_scheduler::schedule_status_check(scheduler.as_ref(), user_id, &item, &transaction_id, run_at).await?;
  ctx.write().status_check = Some(outcome);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout::assemble_checkout_config", skip_all, err(Display))]
async fn assemble_checkout_config(ctx: ContextData<CheckoutCtxData>) -> AppResult<PipelineControl> {
  ctx.update(|c| {
    let settings = required(&c.settings, "the gateway configuration")?;
    let tokenizer = required(&c.tokenizer, "the tokenizer")?;
    c.checkout_config = Some(CheckoutConfig {
      client_id: settings.client_id,
      brand_name: settings.brand_name,
      cost: required(&c.cost, "the cost")?,
      currency: required(&c.currency, "the currency")?,
      root_url: c.app_state.config.root_url.clone(),
      environment: settings.environment,
      language: c.app_state.config.language.clone(),
      token: tokenizer.token,
      tokenizer_location: tokenizer.location,
      transaction_id: required(&c.transaction_id, "the transaction id")?,
    });
    Ok::<_, AppError>(())
  })?;
  Ok(PipelineControl::Continue)
}
