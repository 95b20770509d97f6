// gateway/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Absent means the in-memory order store and task queue are used.
  pub database_url: Option<String>,
  /// Public root of the platform, handed to the checkout widget.
  pub root_url: String,
  pub language: String,
  /// Lifetime of a processor token in minutes, drives the status-check delay.
  pub cache_expiration_minutes: Option<i64>,
  pub processor_timeout_secs: u64,
  pub seed_file: Option<PathBuf>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      root_url: "http://127.0.0.1:8080".to_string(),
      language: "en".to_string(),
      cache_expiration_minutes: None,
      processor_timeout_secs: 15,
      seed_file: None,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = match get("SERVER_PORT") {
      Some(raw) => raw
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?,
      None => 8080,
    };
    let database_url = get("DATABASE_URL");
    let root_url = get("APP_ROOT_URL").unwrap_or_else(|| format!("http://{}:{}", server_host, server_port));
    let language = get("APP_LANGUAGE").unwrap_or_else(|| "en".to_string());

    let cache_expiration_minutes = get("PAYGW_CACHE_EXPIRATION_MINUTES")
      .map(|raw| {
        raw
          .parse::<i64>()
          .map_err(|e| AppError::Config(format!("Invalid PAYGW_CACHE_EXPIRATION_MINUTES: {}", e)))
      })
      .transpose()?;

    let processor_timeout_secs = match get("PROCESSOR_TIMEOUT_SECS") {
      Some(raw) => raw
        .parse::<u64>()
        .map_err(|e| AppError::Config(format!("Invalid PROCESSOR_TIMEOUT_SECS: {}", e)))?,
      None => 15,
    };
    if processor_timeout_secs == 0 {
      return Err(AppError::Config("PROCESSOR_TIMEOUT_SECS must be positive".to_string()));
    }

    let seed_file = get("PAYGW_SEED_FILE").map(PathBuf::from);

    tracing::info!(
      server_host = %server_host,
      server_port,
      database = database_url.is_some(),
      "Application configuration loaded."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      root_url,
      language,
      cache_expiration_minutes,
      processor_timeout_secs,
      seed_file,
    })
  }
}
