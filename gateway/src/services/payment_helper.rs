// gateway/src/services/payment_helper.rs

//! The platform's payment abstraction as seen by this gateway: who is paying for
//! what, how much, and with which account's mpay24 credentials.

use crate::errors::{AppError, Result as AppResult};
use crate::models::{GatewaySettings, ItemRef, Payable, RawGatewaySettings};
use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument};

pub const GATEWAY_NAME: &str = "mpay24";

/// Currencies mpay24 settles in.
const SUPPORTED_CURRENCIES: &[&str] = &[
  "AUD", "BGN", "CAD", "CHF", "CZK", "DKK", "EUR", "GBP", "HKD", "HRK", "HUF", "ISK", "JPY", "NOK", "PLN", "RON",
  "SEK", "SGD", "TRY", "USD",
];

/// Currencies without minor units.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["ISK", "JPY", "KRW", "CLP", "VND"];

pub fn is_supported_currency(code: &str) -> bool {
  SUPPORTED_CURRENCIES.contains(&code)
}

pub fn currency_precision(code: &str) -> u32 {
  if ZERO_DECIMAL_CURRENCIES.contains(&code) {
    0
  } else {
    2
  }
}

/// `amount` plus a percentage surcharge, rounded half-up to the currency's minor unit.
pub fn rounded_cost(amount: Decimal, currency: &str, surcharge_percent: Decimal) -> Decimal {
  let precision = currency_precision(currency);
  let gross = amount + amount * surcharge_percent / Decimal::ONE_HUNDRED;
  let mut cost = gross.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
  cost.rescale(precision);
  cost
}

#[async_trait]
pub trait PaymentHelper: Send + Sync {
  async fn gateway_configuration(&self, item: &ItemRef, gateway: &str) -> AppResult<GatewaySettings>;

  async fn payable(&self, item: &ItemRef) -> AppResult<Payable>;

  /// Surcharge percentage configured for `gateway`; zero when none is set.
  async fn surcharge(&self, gateway: &str) -> AppResult<Decimal>;
}

/// Helper backed by maps, optionally seeded from a JSON file.
#[derive(Debug, Default)]
pub struct InMemoryPaymentHelper {
  payables: RwLock<HashMap<ItemRef, Payable>>,
  accounts: RwLock<HashMap<i64, GatewaySettings>>,
  surcharges: RwLock<HashMap<String, Decimal>>,
}

impl InMemoryPaymentHelper {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_payable(&self, item: ItemRef, payable: Payable) {
    self.payables.write().insert(item, payable);
  }

  pub fn set_account(&self, account_id: i64, settings: GatewaySettings) {
    self.accounts.write().insert(account_id, settings);
  }

  pub fn set_surcharge(&self, gateway: &str, percent: Decimal) {
    self.surcharges.write().insert(gateway.to_string(), percent);
  }

  /// Loads accounts, payables and surcharge from `path`. Accounts are read as stored
  /// platform settings, not as form input.
  #[instrument(name = "InMemoryPaymentHelper::from_seed_file", skip_all, fields(path = %path.display()))]
  pub fn from_seed_file(path: &Path) -> AppResult<Self> {
    let raw = std::fs::read_to_string(path)
      .map_err(|e| AppError::Config(format!("cannot read seed file {}: {}", path.display(), e)))?;
    let helper = Self::from_seed_json(&raw)?;
    info!(
      accounts = helper.accounts.read().len(),
      payables = helper.payables.read().len(),
      "Payment helper seeded."
    );
    Ok(helper)
  }

  pub fn from_seed_json(raw: &str) -> AppResult<Self> {
    let seed: Seed =
      serde_json::from_str(raw).map_err(|e| AppError::Config(format!("invalid seed file: {}", e)))?;
    let helper = Self::new();
    for account in seed.accounts {
      helper.set_account(account.id, GatewaySettings::from_stored(&account.settings));
    }
    for p in seed.payables {
      helper.add_payable(
        ItemRef::new(p.component, p.payment_area, p.item_id),
        Payable {
          amount: p.amount,
          currency: p.currency,
          account_id: p.account_id,
        },
      );
    }
    if let Some(percent) = seed.surcharge {
      helper.set_surcharge(GATEWAY_NAME, percent);
    }
    Ok(helper)
  }
}

#[derive(Deserialize)]
struct Seed {
  #[serde(default)]
  accounts: Vec<SeedAccount>,
  #[serde(default)]
  payables: Vec<SeedPayable>,
  surcharge: Option<Decimal>,
}

#[derive(Deserialize)]
struct SeedAccount {
  id: i64,
  #[serde(flatten)]
  settings: RawGatewaySettings,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedPayable {
  component: String,
  payment_area: String,
  item_id: i64,
  amount: Decimal,
  currency: String,
  account_id: i64,
}

#[async_trait]
impl PaymentHelper for InMemoryPaymentHelper {
  async fn gateway_configuration(&self, item: &ItemRef, gateway: &str) -> AppResult<GatewaySettings> {
    let payable = self.payable(item).await?;
    self.accounts.read().get(&payable.account_id).cloned().ok_or_else(|| {
      AppError::Config(format!(
        "{} is not configured for payment account {}",
        gateway, payable.account_id
      ))
    })
  }

  async fn payable(&self, item: &ItemRef) -> AppResult<Payable> {
    self.payables.read().get(item).cloned().ok_or_else(|| {
      AppError::NotFound(format!(
        "no payable for {}/{} item {}",
        item.component, item.payment_area, item.item_id
      ))
    })
  }

  async fn surcharge(&self, gateway: &str) -> AppResult<Decimal> {
    Ok(self.surcharges.read().get(gateway).copied().unwrap_or(Decimal::ZERO))
  }
}
