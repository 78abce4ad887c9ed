// backoffice_server/src/web/session.rs

//! Identity as forwarded by the auth proxy in front of the dashboard.
//!
//! The proxy performs the OAuth dance and strips these headers from client
//! requests, so their presence is taken at face value.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{ready, Ready};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::AppError;

pub const USER_HEADER: &str = "X-Auth-Request-User";
pub const PREFERRED_USERNAME_HEADER: &str = "X-Auth-Request-Preferred-Username";
pub const AVATAR_HEADER: &str = "X-Auth-Request-Avatar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedInUser {
  pub id: String,
  pub display_name: String,
  pub avatar_url: Option<String>,
}

/// The visitor of the current request, signed in or not. Extraction never fails.
#[derive(Debug, Clone, Default)]
pub struct Session {
  pub user: Option<SignedInUser>,
}

impl Session {
  pub fn is_signed_in(&self) -> bool {
    self.user.is_some()
  }

  /// A redirect to the sign-in URL when sign-in is required and missing.
  pub fn require_sign_in(&self, config: &AppConfig) -> Option<HttpResponse> {
    if !config.require_sign_in || self.is_signed_in() {
      return None;
    }
    info!("Anonymous visitor sent to sign in.");
    Some(
      HttpResponse::SeeOther()
        .insert_header((header::LOCATION, config.sign_in_url.as_str()))
        .finish(),
    )
  }
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
  req
    .headers()
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_string)
}

impl FromRequest for Session {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let user = header_value(req, USER_HEADER).map(|id| SignedInUser {
      display_name: header_value(req, PREFERRED_USERNAME_HEADER).unwrap_or_else(|| id.clone()),
      avatar_url: header_value(req, AVATAR_HEADER),
      id,
    });
    if user.is_none() {
      debug!("No forwarded identity on request.");
    }
    ready(Ok(Session { user }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  async fn extract(req: TestRequest) -> Session {
    let (req, mut payload) = req.to_http_parts();
    Session::from_request(&req, &mut payload).await.unwrap()
  }

  #[actix_web::test]
  async fn reads_forwarded_identity() {
    let session = extract(
      TestRequest::default()
        .insert_header((USER_HEADER, "1234"))
        .insert_header((PREFERRED_USERNAME_HEADER, "ada"))
        .insert_header((AVATAR_HEADER, "https://avatars.example.com/ada.png")),
    )
    .await;

    assert_eq!(
      session.user,
      Some(SignedInUser {
        id: "1234".to_string(),
        display_name: "ada".to_string(),
        avatar_url: Some("https://avatars.example.com/ada.png".to_string()),
      })
    );
  }

  #[actix_web::test]
  async fn blank_user_header_is_anonymous() {
    let session = extract(TestRequest::default().insert_header((USER_HEADER, "  "))).await;
    assert!(!session.is_signed_in());
  }

  #[actix_web::test]
  async fn sign_in_redirect_only_when_required() {
    let mut config = AppConfig::local();
    assert!(Session::default().require_sign_in(&config).is_none());

    config.require_sign_in = true;
    let redirect = Session::default().require_sign_in(&config).unwrap();
    assert_eq!(redirect.status(), actix_web::http::StatusCode::SEE_OTHER);
    assert_eq!(
      redirect.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
      Some("/oauth2/start")
    );
  }
}
