// gateway/src/web/extractors.rs

use crate::errors::AppError;
use actix_web::{FromRequest, HttpRequest};
use tracing::warn;

pub const USER_ID_HEADER: &str = "X-User-ID";

/// The platform user on whose behalf the request runs.
///
/// Authentication happens upstream; the platform forwards the user id in the
/// `X-User-ID` header and this extractor only checks that it is a positive integer.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: i64,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let user_id = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|raw| raw.trim().parse::<i64>().ok())
      .filter(|id| *id > 0);

    match user_id {
      Some(user_id) => futures_util::future::ready(Ok(AuthenticatedUser { user_id })),
      None => {
        warn!("Missing or invalid {} header.", USER_ID_HEADER);
        futures_util::future::ready(Err(AppError::Auth(format!(
          "a positive user id is required in the {} header",
          USER_ID_HEADER
        ))))
      }
    }
  }
}
