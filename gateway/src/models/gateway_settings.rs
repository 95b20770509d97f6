// gateway/src/models/gateway_settings.rs

use crate::errors::FieldError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Processor environment. `Sandbox` talks to the test endpoint.
///
/// Two readings of the configured word exist. The settings form parses it
/// strictly (`FromStr`). Stored account settings go through [`Environment::from_flag`],
/// where anything but `sandbox` means live. Both trim surrounding whitespace and
/// ignore case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
  #[default]
  Live,
  Sandbox,
}

impl Environment {
  /// Reading of a stored flag: `sandbox` in any case, surrounded by any
  /// whitespace, is sandbox; every other value is live.
  pub fn from_flag(flag: &str) -> Self {
    if flag.trim().eq_ignore_ascii_case("sandbox") {
      Environment::Sandbox
    } else {
      Environment::Live
    }
  }

  pub fn is_test_mode(self) -> bool {
    self == Environment::Sandbox
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Environment::Live => "live",
      Environment::Sandbox => "sandbox",
    }
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Environment {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "live" => Ok(Environment::Live),
      "sandbox" => Ok(Environment::Sandbox),
      other => Err(format!("unknown environment '{}'", other)),
    }
  }
}

/// The settings form as submitted by an administrator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGatewaySettings {
  #[serde(default)]
  pub brandname: String,
  #[serde(default)]
  pub clientid: String,
  #[serde(default)]
  pub secret: String,
  #[serde(default)]
  pub environment: String,
}

/// Validated mpay24 settings for one payment account.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
  pub brand_name: String,
  /// mpay24 merchant id.
  pub client_id: String,
  pub secret: SecretString,
  pub environment: Environment,
}

impl GatewaySettings {
  pub fn new(
    brand_name: impl Into<String>,
    client_id: impl Into<String>,
    secret: impl Into<String>,
    environment: Environment,
  ) -> Self {
    Self {
      brand_name: brand_name.into(),
      client_id: client_id.into(),
      secret: SecretString::from(secret.into()),
      environment,
    }
  }

  /// Checks the form and collects every problem rather than stopping at the first.
  pub fn validate(raw: &RawGatewaySettings) -> Result<GatewaySettings, Vec<FieldError>> {
    let mut errors = Vec::new();

    let brand_name = raw.brandname.trim();
    if brand_name.is_empty() {
      errors.push(FieldError::new("brandname", "Brand name is required"));
    }

    let client_id = raw.clientid.trim();
    if client_id.is_empty() {
      errors.push(FieldError::new("clientid", "Merchant id is required"));
    } else if !client_id.chars().all(|c| c.is_ascii_digit()) {
      errors.push(FieldError::new("clientid", "Merchant id must be numeric"));
    }

    if raw.secret.trim().is_empty() {
      errors.push(FieldError::new("secret", "Secret is required"));
    }

    let environment = if raw.environment.trim().is_empty() {
      Environment::Live
    } else {
      match raw.environment.parse::<Environment>() {
        Ok(env) => env,
        Err(msg) => {
          errors.push(FieldError::new("environment", msg));
          Environment::Live
        }
      }
    };

    if !errors.is_empty() {
      return Err(errors);
    }
    Ok(GatewaySettings::new(brand_name, client_id, raw.secret.trim(), environment))
  }

  /// Settings as the platform stored them. Nothing is rejected here; incomplete
  /// settings are caught by [`GatewaySettings::is_complete`] before the processor is called.
  pub fn from_stored(raw: &RawGatewaySettings) -> GatewaySettings {
    GatewaySettings::new(
      raw.brandname.trim(),
      raw.clientid.trim(),
      raw.secret.trim(),
      Environment::from_flag(&raw.environment),
    )
  }

  /// Runtime check: settings that never passed the form must not reach the processor.
  pub fn is_complete(&self) -> bool {
    !self.brand_name.trim().is_empty()
      && !self.client_id.trim().is_empty()
      && !self.secret.expose_secret().trim().is_empty()
  }
}
