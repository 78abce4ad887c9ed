// backoffice_server/src/web/handlers/mod.rs

pub mod records;
pub mod view_renderer;

use actix_web::HttpResponse;

use view_renderer::see_other;

/// The users listing doubles as the landing page.
pub async fn root_redirect() -> HttpResponse {
  see_other(backoffice::RecordKind::Users.listing_path())
}

pub async fn health_check() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
