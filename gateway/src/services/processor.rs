// gateway/src/services/processor.rs

//! mpay24 tokenizer access.
//!
//! Only one processor call is made by this gateway: `CreatePaymentToken`, which
//! returns a tokenizer location and a one-time token for the checkout widget. Card
//! data goes straight from the browser to that location and never reaches us.

use crate::errors::{AppError, Result as AppResult};
use crate::models::{Environment, GatewaySettings};
use async_trait::async_trait;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{info, instrument, warn};

pub const LIVE_ENDPOINT: &str = "https://www.mpay24.com/app/bin/etpproxy_v15";
pub const TEST_ENDPOINT: &str = "https://test.mpay24.com/app/bin/etpproxy_v15";

const ETP_NAMESPACE: &str = "https://www.mpay24.com/soap/etp/1.5/ETP.wsdl";

/// Payment types the tokenizer accepts. Only credit cards are offered here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
  CreditCard,
}

impl PaymentType {
  pub fn code(self) -> &'static str {
    match self {
      PaymentType::CreditCard => "CC",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerHandle {
  pub location: String,
  pub token: String,
}

/// An authenticated conversation with the processor for one merchant.
#[async_trait]
pub trait ProcessorSession: Send + Sync {
  async fn create_payment_token(&self, payment_type: PaymentType) -> AppResult<TokenizerHandle>;
}

/// Opens processor sessions. The production connector talks SOAP over HTTPS;
/// tests plug in fakes.
pub trait ProcessorConnector: Send + Sync {
  fn open_session(
    &self,
    client_id: &str,
    secret: &SecretString,
    environment: Environment,
  ) -> AppResult<Box<dyn ProcessorSession>>;
}

#[derive(Debug, Clone)]
pub struct Mpay24Connector {
  http: reqwest::Client,
  live_endpoint: String,
  test_endpoint: String,
}

impl Mpay24Connector {
  pub fn new() -> AppResult<Self> {
    Self::with_endpoints(LIVE_ENDPOINT, TEST_ENDPOINT)
  }

  pub fn with_endpoints(live_endpoint: impl Into<String>, test_endpoint: impl Into<String>) -> AppResult<Self> {
    let http = reqwest::Client::builder()
      .user_agent(concat!("paygw-mpay24/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self {
      http,
      live_endpoint: live_endpoint.into(),
      test_endpoint: test_endpoint.into(),
    })
  }

  pub fn endpoint_for(&self, environment: Environment) -> &str {
    if environment.is_test_mode() {
      &self.test_endpoint
    } else {
      &self.live_endpoint
    }
  }
}

impl ProcessorConnector for Mpay24Connector {
  fn open_session(
    &self,
    client_id: &str,
    secret: &SecretString,
    environment: Environment,
  ) -> AppResult<Box<dyn ProcessorSession>> {
    Ok(Box::new(Mpay24Session {
      http: self.http.clone(),
      endpoint: self.endpoint_for(environment).to_string(),
      merchant_id: client_id.to_string(),
      secret: secret.clone(),
    }))
  }
}

struct Mpay24Session {
  http: reqwest::Client,
  endpoint: String,
  merchant_id: String,
  secret: SecretString,
}

#[async_trait]
impl ProcessorSession for Mpay24Session {
  #[instrument(name = "Mpay24Session::create_payment_token", skip(self), fields(endpoint = %self.endpoint, merchant_id = %self.merchant_id))]
  async fn create_payment_token(&self, payment_type: PaymentType) -> AppResult<TokenizerHandle> {
    let body = create_token_envelope(&self.merchant_id, payment_type);
    let response = self
      .http
      .post(&self.endpoint)
      .basic_auth(format!("u{}", self.merchant_id), Some(self.secret.expose_secret()))
      .header("Content-Type", "text/xml; charset=utf-8")
      .header("SOAPAction", "CreatePaymentToken")
      .body(body)
      .send()
      .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
      warn!(%status, "Tokenizer request rejected.");
      return Err(AppError::Processor(format!("tokenizer request failed with HTTP {}", status)));
    }
    let handle = parse_create_token_response(&text)?;
    info!("Tokenizer issued.");
    Ok(handle)
  }
}

fn create_token_envelope(merchant_id: &str, payment_type: PaymentType) -> String {
  format!(
    concat!(
      r#"<?xml version="1.0" encoding="UTF-8"?>"#,
      r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:etp="{ns}">"#,
      "<SOAP-ENV:Header/><SOAP-ENV:Body><etp:CreatePaymentToken>",
      "<merchantID>{merchant}</merchantID><pType>{ptype}</pType>",
      "</etp:CreatePaymentToken></SOAP-ENV:Body></SOAP-ENV:Envelope>"
    ),
    ns = ETP_NAMESPACE,
    merchant = quick_xml::escape::escape(merchant_id),
    ptype = payment_type.code(),
  )
}

/// Pulls `status`, `returnCode`, `token` and `location` out of the SOAP reply.
///
/// Element text may arrive in several pieces around entity references, so each
/// field is collected until its closing tag and only then stored.
pub(crate) fn parse_create_token_response(xml: &str) -> AppResult<TokenizerHandle> {
  let mut reader = Reader::from_str(xml);

  let mut current: Option<String> = None;
  let mut text = String::new();
  let mut status = None;
  let mut return_code = None;
  let mut token = None;
  let mut location = None;

  loop {
    match reader.read_event() {
      Ok(Event::Start(e)) => {
        current = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
        text.clear();
      }
      Ok(Event::End(_)) => {
        let value = text.trim().to_string();
        match current.take().as_deref() {
          Some("status") => status = Some(value),
          Some("returnCode") => return_code = Some(value),
          Some("token") => token = Some(value),
          Some("location") => location = Some(value),
          _ => {}
        }
        text.clear();
      }
      Ok(Event::Text(t)) if current.is_some() => {
        let raw = t.decode().map_err(malformed)?;
        text.push_str(&unescape(&raw).map_err(malformed)?);
      }
      Ok(Event::CData(c)) if current.is_some() => {
        text.push_str(&c.decode().map_err(malformed)?);
      }
      Ok(Event::GeneralRef(r)) if current.is_some() => {
        if let Some(ch) = r.resolve_char_ref().map_err(malformed)? {
          text.push(ch);
        } else {
          let name = r.decode().map_err(malformed)?;
          let resolved = resolve_predefined_entity(&name)
            .ok_or_else(|| AppError::Processor(format!("malformed tokenizer response: unknown entity &{};", name)))?;
          text.push_str(resolved);
        }
      }
      Ok(Event::Eof) => break,
      Ok(_) => {}
      Err(e) => return Err(malformed(e)),
    }
  }

  if status.as_deref() != Some("OK") {
    return Err(AppError::Processor(format!(
      "tokenizer refused: status={} returnCode={}",
      status.as_deref().unwrap_or("<missing>"),
      return_code.as_deref().unwrap_or("<missing>")
    )));
  }
  match (location, token) {
    (Some(location), Some(token)) if !location.is_empty() && !token.is_empty() => Ok(TokenizerHandle { location, token }),
    _ => Err(AppError::Processor("tokenizer response lacks token or location".to_string())),
  }
}

fn malformed(e: impl std::fmt::Display) -> AppError {
  AppError::Processor(format!("malformed tokenizer response: {}", e))
}

/// Opens a session for `settings` and requests a credit-card tokenizer.
///
/// The remote call is bounded by `timeout`; nothing is retried.
#[instrument(name = "issue_client_token", skip_all, fields(client_id = %settings.client_id, environment = %settings.environment))]
pub async fn issue_client_token(
  connector: &dyn ProcessorConnector,
  settings: &GatewaySettings,
  timeout: Duration,
) -> AppResult<TokenizerHandle> {
  let session = connector.open_session(&settings.client_id, &settings.secret, settings.environment)?;
  match tokio::time::timeout(timeout, session.create_payment_token(PaymentType::CreditCard)).await {
    Ok(result) => result,
    Err(_) => {
      warn!(timeout_secs = timeout.as_secs(), "Tokenizer request timed out.");
      Err(AppError::ProcessorTimeout(timeout.as_secs()))
    }
  }
}
