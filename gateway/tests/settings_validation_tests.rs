// tests/settings_validation_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use common::*;
use paygw_mpay24::models::{Environment, GatewaySettings, RawGatewaySettings};
use paygw_mpay24::web::configure_app_routes;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

fn form(brandname: &str, clientid: &str, secret: &str, environment: &str) -> RawGatewaySettings {
  RawGatewaySettings {
    brandname: brandname.to_string(),
    clientid: clientid.to_string(),
    secret: secret.to_string(),
    environment: environment.to_string(),
  }
}

#[::core::prelude::v1::test]
fn complete_form_is_accepted() {
  let settings = GatewaySettings::validate(&form(" Academy ", "91234", "s3cr3t", "sandbox")).unwrap();
  assert_eq!(settings.brand_name, "Academy");
  assert_eq!(settings.client_id, "91234");
  assert_eq!(settings.secret.expose_secret(), "s3cr3t");
  assert_eq!(settings.environment, Environment::Sandbox);
}

#[::core::prelude::v1::test]
fn blank_environment_means_live() {
  let settings = GatewaySettings::validate(&form("Academy", "91234", "s3cr3t", "")).unwrap();
  assert_eq!(settings.environment, Environment::Live);
}

#[::core::prelude::v1::test]
fn environment_ignores_case_and_surrounding_whitespace() {
  let settings = GatewaySettings::validate(&form("Academy", "91234", "s3cr3t", " SANDBOX ")).unwrap();
  assert_eq!(settings.environment, Environment::Sandbox);
  assert!(settings.environment.is_test_mode());
  assert_eq!(" Live".parse::<Environment>(), Ok(Environment::Live));
  assert!("sand box".parse::<Environment>().is_err());

  assert_eq!(Environment::from_flag(" SANDBOX "), Environment::Sandbox);
  assert_eq!(Environment::from_flag("sand box"), Environment::Live);
  assert_eq!(Environment::from_flag(""), Environment::Live);
}

#[::core::prelude::v1::test]
fn every_missing_field_is_reported() {
  let errors = GatewaySettings::validate(&form("", "  ", "", "live")).unwrap_err();
  let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
  assert_eq!(fields, vec!["brandname", "clientid", "secret"]);
}

#[::core::prelude::v1::test]
fn merchant_id_must_be_numeric_and_environment_known() {
  let errors = GatewaySettings::validate(&form("Academy", "m-1", "s3cr3t", "staging")).unwrap_err();
  let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
  assert_eq!(fields, vec!["clientid", "environment"]);
}

#[actix_web::test]
async fn validation_endpoint_returns_field_errors() {
  setup_tracing();
  let app = test::init_service(App::new().configure(configure_app_routes)).await;

  let req = test::TestRequest::post()
    .uri("/api/v1/mpay24/settings/validate")
    .set_json(json!({"brandname": "Academy", "clientid": "", "secret": "s3cr3t"}))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["fields"][0]["field"], "clientid");
}

#[actix_web::test]
async fn validation_endpoint_accepts_good_settings_without_echoing_the_secret() {
  setup_tracing();
  let app = test::init_service(App::new().configure(configure_app_routes)).await;

  let req = test::TestRequest::post()
    .uri("/api/v1/mpay24/settings/validate")
    .set_json(json!({"brandname": "Academy", "clientid": "91234", "secret": "s3cr3t", "environment": "sandbox"}))
    .to_request();
  let resp = test::call_service(&app, req).await;

  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["valid"], true);
  assert_eq!(body["environment"], "sandbox");
  assert!(body.get("secret").is_none());
}

#[actix_web::test]
async fn health_check_answers() {
  let app = test::init_service(App::new().configure(configure_app_routes)).await;
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
}
