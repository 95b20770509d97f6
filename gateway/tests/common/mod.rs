// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use paygw_mpay24::config::AppConfig;
use paygw_mpay24::errors::{AppError, Result as AppResult};
use paygw_mpay24::models::{Environment, GatewaySettings, ItemRef, NewPendingOrder, Payable, PendingOrder};
use paygw_mpay24::pipelines::register_all_pipelines;
use paygw_mpay24::services::processor::PaymentType;
use paygw_mpay24::services::{
  EventBus, InMemoryOrderStore, InMemoryPaymentHelper, InMemoryTaskQueue, OrderReconciler, PendingOrderStore,
  ProcessorConnector, ProcessorSession, ReconcileOutcome, TokenizerHandle,
};
use paygw_mpay24::state::AppState;
use paygw_pipeline::PipelineRegistry;
use rust_decimal::Decimal;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub const ACCOUNT_ID: i64 = 1;

pub fn course_fee() -> ItemRef {
  ItemRef::new("enrol_fee", "fee", 42)
}

pub fn sandbox_settings() -> GatewaySettings {
  GatewaySettings::new("Academy", "91234", "s3cr3t", Environment::Sandbox)
}

pub fn euro(amount: Decimal) -> Payable {
  Payable {
    amount,
    currency: "EUR".to_string(),
    account_id: ACCOUNT_ID,
  }
}

/// What the fake processor saw.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCall {
  pub client_id: String,
  pub environment: Environment,
}

/// Processor stand-in: hands out numbered tokens, or fails / stalls on demand.
#[derive(Default)]
pub struct FakeConnector {
  calls: Mutex<Vec<SessionCall>>,
  failure: Mutex<Option<String>>,
  delay: Mutex<Option<Duration>>,
}

impl FakeConnector {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn calls(&self) -> Vec<SessionCall> {
    self.calls.lock().clone()
  }

  pub fn fail_with(&self, return_code: &str) {
    *self.failure.lock() = Some(return_code.to_string());
  }

  pub fn stall_for(&self, delay: Duration) {
    *self.delay.lock() = Some(delay);
  }
}

impl ProcessorConnector for FakeConnector {
  fn open_session(
    &self,
    client_id: &str,
    _secret: &SecretString,
    environment: Environment,
  ) -> AppResult<Box<dyn ProcessorSession>> {
    let mut calls = self.calls.lock();
    calls.push(SessionCall {
      client_id: client_id.to_string(),
      environment,
    });
    Ok(Box::new(FakeSession {
      serial: calls.len(),
      environment,
      failure: self.failure.lock().clone(),
      delay: *self.delay.lock(),
    }))
  }
}

struct FakeSession {
  serial: usize,
  environment: Environment,
  failure: Option<String>,
  delay: Option<Duration>,
}

#[async_trait]
impl ProcessorSession for FakeSession {
  async fn create_payment_token(&self, payment_type: PaymentType) -> AppResult<TokenizerHandle> {
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    if let Some(code) = &self.failure {
      return Err(AppError::Processor(format!("tokenizer refused: status=ERROR returnCode={}", code)));
    }
    let token = format!("tok-{}-{}", payment_type.code(), self.serial);
    let host = if self.environment.is_test_mode() { "test" } else { "www" };
    Ok(TokenizerHandle {
      location: format!("https://{}.mpay24.com/app/bin/checkout/{}", host, token),
      token,
    })
  }
}

/// Order store whose every call fails, for error propagation checks.
pub struct BrokenStore;

#[async_trait]
impl PendingOrderStore for BrokenStore {
  async fn find_open(&self, _item_id: i64, _user_id: i64) -> AppResult<Option<PendingOrder>> {
    Err(AppError::Storage("connection refused".to_string()))
  }

  async fn insert_or_reuse(&self, _candidate: NewPendingOrder) -> AppResult<ReconcileOutcome> {
    Err(AppError::Storage("connection refused".to_string()))
  }
}

/// A gateway wired entirely in memory, plus handles on its parts.
pub struct TestGateway {
  pub state: AppState,
  pub store: Arc<InMemoryOrderStore>,
  pub queue: Arc<InMemoryTaskQueue>,
  pub helper: Arc<InMemoryPaymentHelper>,
  pub processor: Arc<FakeConnector>,
}

impl TestGateway {
  pub fn new(config: AppConfig) -> Self {
    let store = Arc::new(InMemoryOrderStore::new());
    let queue = Arc::new(InMemoryTaskQueue::new());
    let helper = Arc::new(InMemoryPaymentHelper::new());
    helper.set_account(ACCOUNT_ID, sandbox_settings());
    helper.add_payable(course_fee(), euro(Decimal::new(1000, 2)));
    let processor = FakeConnector::new();

    let events = EventBus::new(16);
    let pipelines = Arc::new(PipelineRegistry::<AppError>::new());
    register_all_pipelines(&pipelines);

    let state = AppState {
      reconciler: OrderReconciler::new(store.clone(), events.clone()),
      scheduler: queue.clone(),
      helper: helper.clone(),
      processor: processor.clone(),
      events,
      pipelines,
      config: Arc::new(config),
    };
    Self {
      state,
      store,
      queue,
      helper,
      processor,
    }
  }
}

impl Default for TestGateway {
  fn default() -> Self {
    Self::new(AppConfig {
      root_url: "https://lms.example.org".to_string(),
      ..AppConfig::default()
    })
  }
}
